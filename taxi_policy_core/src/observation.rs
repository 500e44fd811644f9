use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Position, STATION_COUNT};

/// Number of scalar fields in a raw observation tuple.
pub const OBSERVATION_LEN: usize = 16;

/// Represents errors that can occur while decoding observations or action codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Observation has {found} fields, expected {expected}")]
    WrongLength { expected: usize, found: usize },
    #[error("Observation field {index} is not an integer: '{token}'")]
    InvalidField { index: usize, token: String },
    #[error("Action code {0} is outside the range 0..=5")]
    UnknownActionCode(u8),
}

/// The four compass moves, in the fixed order used for fallback moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    South,
    North,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::North,
        Direction::East,
        Direction::West,
    ];
}

/// Represents actions the taxi can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move(Direction),
    Pickup,
    Dropoff,
}

impl Action {
    /// Returns the integer action code understood by the environment.
    pub fn code(self) -> u8 {
        match self {
            Action::Move(Direction::South) => 0,
            Action::Move(Direction::North) => 1,
            Action::Move(Direction::East) => 2,
            Action::Move(Direction::West) => 3,
            Action::Pickup => 4,
            Action::Dropoff => 5,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}

impl TryFrom<u8> for Action {
    type Error = DecodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Action::Move(Direction::South)),
            1 => Ok(Action::Move(Direction::North)),
            2 => Ok(Action::Move(Direction::East)),
            3 => Ok(Action::Move(Direction::West)),
            4 => Ok(Action::Pickup),
            5 => Ok(Action::Dropoff),
            other => Err(DecodeError::UnknownActionCode(other)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(direction) => write!(f, "{:?}", direction),
            Action::Pickup => f.write_str("Pickup"),
            Action::Dropoff => f.write_str("Dropoff"),
        }
    }
}

/// Movement restrictions around the taxi. `true` means the move is disallowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleFlags {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl ObstacleFlags {
    pub const NONE: ObstacleFlags = ObstacleFlags {
        north: false,
        south: false,
        east: false,
        west: false,
    };

    pub const ALL: ObstacleFlags = ObstacleFlags {
        north: true,
        south: true,
        east: true,
        west: true,
    };

    #[inline]
    pub fn is_blocked(&self, direction: Direction) -> bool {
        match direction {
            Direction::South => self.south,
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    #[inline]
    pub fn all_blocked(&self) -> bool {
        Direction::ALL.iter().all(|d| self.is_blocked(*d))
    }
}

/// One step's worth of information handed to the policy by the environment.
///
/// Stations are only meaningful as an ordered list of positions; their order
/// decides ties when two stations are equally near.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub taxi: Position,
    pub stations: [Position; STATION_COUNT],
    pub obstacles: ObstacleFlags,
    /// The passenger is detectable at the taxi's position.
    pub passenger_visible: bool,
    /// The destination is detectable at the taxi's position.
    pub destination_visible: bool,
}

impl Observation {
    /// Decodes the raw tuple layout:
    /// `taxi_row, taxi_col, 4 x (station_row, station_col), obstacle_north,
    /// obstacle_south, obstacle_east, obstacle_west, passenger_look, destination_look`.
    ///
    /// Flag fields are true for any non-zero value.
    pub fn from_raw(raw: [i64; OBSERVATION_LEN]) -> Self {
        let station = |i: usize| Position::new(raw[2 + 2 * i], raw[3 + 2 * i]);
        Observation {
            taxi: Position::new(raw[0], raw[1]),
            stations: [station(0), station(1), station(2), station(3)],
            obstacles: ObstacleFlags {
                north: raw[10] != 0,
                south: raw[11] != 0,
                east: raw[12] != 0,
                west: raw[13] != 0,
            },
            passenger_visible: raw[14] != 0,
            destination_visible: raw[15] != 0,
        }
    }

    /// Encodes back into the raw tuple layout, with flags as 0/1.
    pub fn to_raw(&self) -> [i64; OBSERVATION_LEN] {
        let mut raw = [0; OBSERVATION_LEN];
        raw[0] = self.taxi.row;
        raw[1] = self.taxi.col;
        for (i, station) in self.stations.iter().enumerate() {
            raw[2 + 2 * i] = station.row;
            raw[3 + 2 * i] = station.col;
        }
        raw[10] = i64::from(self.obstacles.north);
        raw[11] = i64::from(self.obstacles.south);
        raw[12] = i64::from(self.obstacles.east);
        raw[13] = i64::from(self.obstacles.west);
        raw[14] = i64::from(self.passenger_visible);
        raw[15] = i64::from(self.destination_visible);
        raw
    }

    /// Returns the first station located at `position`, if any.
    pub fn station_at(&self, position: Position) -> Option<Position> {
        self.stations.iter().copied().find(|s| *s == position)
    }
}

impl TryFrom<&[i64]> for Observation {
    type Error = DecodeError;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        let raw: [i64; OBSERVATION_LEN] =
            values.try_into().map_err(|_| DecodeError::WrongLength {
                expected: OBSERVATION_LEN,
                found: values.len(),
            })?;
        Ok(Observation::from_raw(raw))
    }
}

/// Parses a single line of integers separated by commas and/or whitespace.
/// Tuple `( )` or list `[ ]` delimiters around the line are ignored.
impl FromStr for Observation {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .trim()
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);

        let values = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .enumerate()
            .map(|(index, token)| {
                token.parse::<i64>().map_err(|_| DecodeError::InvalidField {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<i64>, DecodeError>>()?;

        Observation::try_from(values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: [i64; OBSERVATION_LEN] = [2, 3, 0, 0, 0, 4, 4, 0, 4, 3, 1, 0, 0, 1, 0, 1];

    #[test]
    fn from_raw_follows_field_order() {
        let obs = Observation::from_raw(RAW);
        assert_eq!(obs.taxi, Position::new(2, 3));
        assert_eq!(
            obs.stations,
            [
                Position::new(0, 0),
                Position::new(0, 4),
                Position::new(4, 0),
                Position::new(4, 3),
            ]
        );
        assert!(obs.obstacles.north);
        assert!(!obs.obstacles.south);
        assert!(!obs.obstacles.east);
        assert!(obs.obstacles.west);
        assert!(!obs.passenger_visible);
        assert!(obs.destination_visible);
        assert_eq!(obs.to_raw(), RAW);
    }

    #[test]
    fn non_zero_flags_count_as_set() {
        let mut raw = RAW;
        raw[11] = 7;
        raw[14] = -1;
        let obs = Observation::from_raw(raw);
        assert!(obs.obstacles.south);
        assert!(obs.passenger_visible);
    }

    #[test]
    fn parses_python_tuple_notation() {
        let line = "(2, 3, 0, 0, 0, 4, 4, 0, 4, 3, 1, 0, 0, 1, 0, 1)";
        let obs: Observation = line.parse().unwrap();
        assert_eq!(obs, Observation::from_raw(RAW));
    }

    #[test]
    fn parses_whitespace_separated_line() {
        let line = "  2 3 0 0 0 4 4 0 4 3 1 0 0 1 0 1\n";
        let obs: Observation = line.parse().unwrap();
        assert_eq!(obs.taxi, Position::new(2, 3));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = "1, 2, 3".parse::<Observation>().unwrap_err();
        assert_eq!(
            err,
            DecodeError::WrongLength {
                expected: OBSERVATION_LEN,
                found: 3
            }
        );

        let err = Observation::try_from(&[0i64; 17][..]).unwrap_err();
        assert!(matches!(err, DecodeError::WrongLength { found: 17, .. }));
    }

    #[test]
    fn rejects_non_integer_field() {
        let err = "2, 3, x, 0".parse::<Observation>().unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidField {
                index: 2,
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn action_codes_match_environment() {
        let expected = [
            (Action::Move(Direction::South), 0),
            (Action::Move(Direction::North), 1),
            (Action::Move(Direction::East), 2),
            (Action::Move(Direction::West), 3),
            (Action::Pickup, 4),
            (Action::Dropoff, 5),
        ];
        for (action, code) in expected {
            assert_eq!(action.code(), code);
            assert_eq!(Action::try_from(code), Ok(action));
        }
        assert_eq!(Action::try_from(6), Err(DecodeError::UnknownActionCode(6)));
    }

    #[test]
    fn action_display_uses_names() {
        assert_eq!(Action::Move(Direction::West).to_string(), "West");
        assert_eq!(Action::Dropoff.to_string(), "Dropoff");
    }

    #[test]
    fn obstacle_flags_map_to_directions() {
        let flags = ObstacleFlags {
            north: true,
            ..ObstacleFlags::NONE
        };
        assert!(flags.is_blocked(Direction::North));
        assert!(!flags.is_blocked(Direction::South));
        assert!(!flags.all_blocked());
        assert!(ObstacleFlags::ALL.all_blocked());
    }
}
