use rand::Rng;
use tracing::{debug, trace};

use crate::{
    Position,
    observation::{Direction, ObstacleFlags},
};

/// Chooses a single move from `current` towards `target`.
///
/// Moves that shrink the row gap are preferred over moves that shrink the
/// column gap. If every such move is blocked, the first unblocked direction in
/// `Direction::ALL` order is taken even if it leads away from the target. The
/// planner keeps no memory, so static obstacles can make it oscillate.
///
/// When the taxi is boxed in on all four sides, a direction is drawn uniformly
/// from `rng` so that a valid move is always returned.
pub fn plan_move<R: Rng + ?Sized>(
    current: Position,
    target: Position,
    obstacles: ObstacleFlags,
    rng: &mut R,
) -> Direction {
    let progress = [
        (current.row < target.row, Direction::South),
        (current.row > target.row, Direction::North),
        (current.col < target.col, Direction::East),
        (current.col > target.col, Direction::West),
    ];

    if let Some(&(_, direction)) = progress
        .iter()
        .find(|(closer, direction)| *closer && !obstacles.is_blocked(*direction))
    {
        return direction;
    }

    if let Some(direction) = Direction::ALL
        .into_iter()
        .find(|direction| !obstacles.is_blocked(*direction))
    {
        trace!(?current, ?target, ?direction, "No progressing move, taking fallback");
        return direction;
    }

    let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    debug!(?current, ?direction, "All moves blocked, choosing at random");
    direction
}
