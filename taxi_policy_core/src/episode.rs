use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Position;

/// The two phases of an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No passenger on board; looking for the passenger among the stations.
    /// `visited_empty` holds stations reached this phase without a passenger.
    Searching { visited_empty: HashSet<Position> },
    /// Passenger on board; heading for one of the other stations.
    Delivering { pickup_station: Position },
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Searching {
            visited_empty: HashSet::new(),
        }
    }
}

/// Returns the candidate closest to `from`, the earliest one on ties.
pub fn nearest(from: Position, candidates: impl IntoIterator<Item = Position>) -> Option<Position> {
    candidates
        .into_iter()
        .min_by_key(|station| from.manhattan_distance(*station))
}

/// Everything the policy remembers between steps of one episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeState {
    phase: Phase,
    target: Option<Position>,
}

impl EpisodeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns to the state of a fresh episode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn has_passenger(&self) -> bool {
        matches!(self.phase, Phase::Delivering { .. })
    }

    pub fn pickup_station(&self) -> Option<Position> {
        match self.phase {
            Phase::Delivering { pickup_station } => Some(pickup_station),
            Phase::Searching { .. } => None,
        }
    }

    pub fn target(&self) -> Option<Position> {
        self.target
    }

    /// Stations found without a passenger during the current search.
    /// `None` while delivering.
    pub fn visited_empty(&self) -> Option<&HashSet<Position>> {
        match &self.phase {
            Phase::Searching { visited_empty } => Some(visited_empty),
            Phase::Delivering { .. } => None,
        }
    }

    /// Records a station reached without finding the passenger.
    /// Ignored while delivering.
    pub fn mark_empty(&mut self, station: Position) {
        if let Phase::Searching { visited_empty } = &mut self.phase {
            visited_empty.insert(station);
        }
    }

    /// Switches to delivery after a pickup at `station`.
    pub fn begin_delivery(&mut self, station: Position) {
        self.phase = Phase::Delivering {
            pickup_station: station,
        };
        self.target = None;
    }

    /// Returns the current target, choosing a new one if none is set or the
    /// taxi is standing on it.
    ///
    /// While searching, stations already found empty are skipped. Once all of
    /// them are, the sweep starts over with only the station under the taxi
    /// marked. While delivering, every station except the pickup station is a
    /// candidate.
    ///
    /// Returns `None` only if no station is eligible at all.
    pub fn current_target(&mut self, taxi: Position, stations: &[Position]) -> Option<Position> {
        if let Some(target) = self.target.filter(|target| *target != taxi) {
            return Some(target);
        }

        let target = match &mut self.phase {
            Phase::Searching { visited_empty } => {
                if stations.iter().all(|station| visited_empty.contains(station)) {
                    debug!(?taxi, "Every station visited, starting a new sweep");
                    visited_empty.clear();
                    if stations.contains(&taxi) {
                        visited_empty.insert(taxi);
                    }
                }
                let unvisited = stations
                    .iter()
                    .copied()
                    .filter(|station| !visited_empty.contains(station));
                nearest(taxi, unvisited).or_else(|| nearest(taxi, stations.iter().copied()))
            }
            Phase::Delivering { pickup_station } => {
                let pickup_station = *pickup_station;
                nearest(
                    taxi,
                    stations
                        .iter()
                        .copied()
                        .filter(|station| *station != pickup_station),
                )
            }
        };

        debug!(?taxi, ?target, "Selected new target");
        self.target = target;
        target
    }
}
