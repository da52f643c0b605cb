/// Points per simultaneously cleared layer count; counts past the table end
/// score the last entry per extra layer.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Game statistics: pieces locked, layers cleared and score.
///
/// # Example
///
/// ```
/// use ndtris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 300);
/// assert_eq!(stats.total_cleared_layers(), 2);
/// assert_eq!(stats.layer_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_layers: usize,
    layer_cleared_counter: Vec<usize>,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_layers: 0,
            layer_cleared_counter: Vec::new(),
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Level derived from cleared layers, one per 10 layers.
    #[must_use]
    pub fn level(&self) -> usize {
        self.total_cleared_layers / 10
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_layers(&self) -> usize {
        self.total_cleared_layers
    }

    /// Histogram of locks by the number of layers they cleared.
    ///
    /// Index `n` counts the locks that cleared exactly `n` layers; the vector
    /// grows to the largest count observed.
    #[must_use]
    pub fn layer_cleared_counter(&self) -> &[usize] {
        &self.layer_cleared_counter
    }

    /// Records one locked piece that cleared `cleared_layers` layers.
    pub fn complete_piece_drop(&mut self, cleared_layers: usize) {
        self.completed_pieces += 1;
        self.total_cleared_layers += cleared_layers;
        if self.layer_cleared_counter.len() <= cleared_layers {
            self.layer_cleared_counter.resize(cleared_layers + 1, 0);
        }
        self.layer_cleared_counter[cleared_layers] += 1;
        self.score += match SCORE_TABLE.get(cleared_layers) {
            Some(&points) => points,
            None => SCORE_TABLE[SCORE_TABLE.len() - 1] * (cleared_layers - SCORE_TABLE.len() + 2),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_histogram() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(1);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.total_cleared_layers(), 1);
        assert_eq!(stats.layer_cleared_counter(), &[2, 1]);
        assert_eq!(stats.score(), 100);
    }

    #[test]
    fn test_large_clears_extend_table() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(6);
        assert_eq!(stats.layer_cleared_counter().len(), 7);
        assert_eq!(stats.score(), 800 * 3);
    }

    #[test]
    fn test_level_follows_cleared_layers() {
        let mut stats = GameStats::new();
        for _ in 0..5 {
            stats.complete_piece_drop(3);
        }
        assert_eq!(stats.level(), 1);
    }
}
