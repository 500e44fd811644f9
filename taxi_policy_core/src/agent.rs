use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{
    episode::EpisodeState,
    navigator::plan_move,
    observation::{Action, OBSERVATION_LEN, Observation},
};

/// Trait defining the behavior of an agent.
/// Agents decide which action to take based on the current Observation.
pub trait Agent {
    /// Determines the action to perform this step.
    /// `&mut self` allows the agent to carry state from one step to the next.
    fn get_action(&mut self, observation: &Observation) -> Action;

    /// Forgets everything learned during the current episode.
    fn reset(&mut self);

    /// Raw entry point: a 16-field observation tuple in, an action code out.
    fn get_action_code(&mut self, raw: [i64; OBSERVATION_LEN]) -> u8 {
        self.get_action(&Observation::from_raw(raw)).code()
    }
}

/// A rule-based taxi that searches the stations for the passenger, then
/// heads for the nearest station other than the pickup station.
///
/// Movement is delegated to [`plan_move`]; the random source is only used
/// when the taxi is boxed in.
#[derive(Debug)]
pub struct TaxiAgent<R: Rng = StdRng> {
    state: EpisodeState,
    rng: R,
}

impl TaxiAgent<StdRng> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TaxiAgent<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: EpisodeState::new(),
            rng,
        }
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }
}

impl<R: Rng> Agent for TaxiAgent<R> {
    fn get_action(&mut self, observation: &Observation) -> Action {
        let taxi = observation.taxi;

        match self.state.pickup_station() {
            None => {
                if let Some(station) = observation.station_at(taxi) {
                    if observation.passenger_visible {
                        debug!(?station, "Passenger found, picking up");
                        self.state.begin_delivery(station);
                        return Action::Pickup;
                    }
                    trace!(?station, "No passenger at station");
                    self.state.mark_empty(station);
                }
            }
            Some(pickup_station) => {
                if let Some(station) = observation
                    .station_at(taxi)
                    .filter(|station| *station != pickup_station)
                    .filter(|_| observation.destination_visible)
                {
                    debug!(?station, "Destination reached, dropping off");
                    self.state.reset();
                    return Action::Dropoff;
                }
            }
        }

        // Degenerate station sets leave no candidate; the planner then just
        // takes the first free move.
        let target = self
            .state
            .current_target(taxi, &observation.stations)
            .unwrap_or(taxi);
        plan_move(taxi, target, observation.obstacles, &mut self.rng).into()
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}
