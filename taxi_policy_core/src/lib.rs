use serde::{Deserialize, Serialize};

pub mod agent;
pub mod episode;
pub mod navigator;
pub mod observation;

pub use agent::{Agent, TaxiAgent};
pub use episode::{EpisodeState, Phase};
pub use navigator::plan_move;
pub use observation::{
    Action, DecodeError, Direction, OBSERVATION_LEN, ObstacleFlags, Observation,
};

/// Number of candidate stations in every episode.
pub const STATION_COUNT: usize = 4;

/// Represents a grid coordinate as (row, column).
///
/// Rows grow southwards and columns grow eastwards. Coordinates are signed so
/// that any value the environment reports can be compared without overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i64,
    pub col: i64,
}

impl Position {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Returns the manhattan distance between two positions.
    pub fn manhattan_distance(self, other: Position) -> u64 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }
}

impl From<(i64, i64)> for Position {
    fn from((row, col): (i64, i64)) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Position::new(2, 2);
        let b = Position::new(0, 4);
        assert_eq!(a.manhattan_distance(b), 4);
        assert_eq!(b.manhattan_distance(a), 4);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn manhattan_distance_handles_extreme_coordinates() {
        let a = Position::new(i64::MIN, 0);
        let b = Position::new(i64::MAX, i64::MAX);
        assert_eq!(a.manhattan_distance(b), u64::MAX);
    }
}
