use std::collections::VecDeque;

use rand::{SeedableRng as _, seq::SliceRandom};
use rand_pcg::Pcg32;

/// Seeded bag randomizer over the indices of a shape catalog.
///
/// Every bag holds each shape index exactly once in shuffled order, which
/// bounds the gap between two appearances of the same shape. The queue is
/// refilled whenever it holds a bag or less, so at least one full bag is always
/// visible as preview.
///
/// # Example
///
/// ```
/// use ndtris_engine::PieceBuffer;
///
/// let mut a = PieceBuffer::with_seed(7, 3);
/// let mut b = PieceBuffer::with_seed(7, 3);
/// assert_eq!(a.pop_next(), b.pop_next());
/// assert_eq!(a.pieces_drawn(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    shape_count: usize,
    bag: VecDeque<usize>,
    pieces_drawn: usize,
}

impl PieceBuffer {
    /// Creates a buffer drawing from `shape_count` shapes.
    ///
    /// # Panics
    ///
    /// Panics if `shape_count` is zero.
    #[must_use]
    pub fn with_seed(seed: u64, shape_count: usize) -> Self {
        assert!(shape_count > 0, "piece buffer needs at least one shape");
        let mut this = Self {
            rng: Pcg32::seed_from_u64(seed),
            shape_count,
            bag: VecDeque::with_capacity(shape_count * 2),
            pieces_drawn: 0,
        };
        this.fill_bag();
        this
    }

    fn fill_bag(&mut self) {
        while self.bag.len() <= self.shape_count {
            let mut new_bag = (0..self.shape_count).collect::<Vec<_>>();
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draws the next shape index.
    pub fn pop_next(&mut self) -> usize {
        self.fill_bag();
        let next = self.bag.pop_front().unwrap_or_default();
        self.pieces_drawn += 1;
        next
    }

    /// Upcoming shape indices, next first.
    pub fn next_pieces(&self) -> impl Iterator<Item = usize> + '_ {
        self.bag.iter().copied()
    }

    /// Number of pieces drawn since the buffer was created.
    #[must_use]
    pub fn pieces_drawn(&self) -> usize {
        self.pieces_drawn
    }
}
