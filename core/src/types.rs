use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cumulative or per-period points for one team.
pub type Points = u16;

/// One of the two teams, which also names the board side its digits are drawn on: the left team
/// owns the row axis and the top team owns the column axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Left,
    Top,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Left, Team::Top];

    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Top,
            Self::Top => Self::Left,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Converts a signed wire value into engine points, rejecting negative or oversized scores.
pub fn points_from_signed(team: Team, value: i64) -> Result<Points> {
    if value < 0 {
        return Err(ScoreFault::NegativeScore { team, value }.into());
    }
    Points::try_from(value).map_err(|_| ScoreFault::ScoreOutOfRange { team, value }.into())
}

/// Last digit of a score, always in `0..=9`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const fn new(value: u8) -> Option<Self> {
        if value < 10 { Some(Self(value)) } else { None }
    }

    /// Last digit of `points`.
    pub const fn of(points: Points) -> Self {
        Self((points % 10) as u8)
    }

    pub(crate) const fn of_sum(summed: u32) -> Self {
        Self((summed % 10) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Digit> {
        (0..10).map(Self)
    }
}

impl TryFrom<u8> for Digit {
    type Error = &'static str;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        Self::new(value).ok_or("digit must be between 0 and 9")
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a cell by its digit pair. Renders and serializes as `"{top}-{left}"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellKey {
    pub top: Digit,
    pub left: Digit,
}

impl CellKey {
    pub const fn new(top: Digit, left: Digit) -> Self {
        Self { top, left }
    }

    /// Key of the cell matching the two scores right now.
    pub const fn from_scores(top: Points, left: Points) -> Self {
        Self::new(Digit::of(top), Digit::of(left))
    }

    pub const fn digit(self, team: Team) -> Digit {
        match team {
            Team::Left => self.left,
            Team::Top => self.top,
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.top, self.left)
    }
}

impl FromStr for CellKey {
    type Err = SquaresError;

    fn from_str(s: &str) -> Result<Self> {
        let parse_digit = |part: &str| {
            part.trim()
                .parse::<u8>()
                .ok()
                .and_then(Digit::new)
                .ok_or_else(|| SquaresError::InvalidCellKey(s.to_string()))
        };

        let (top, left) = s
            .split_once('-')
            .ok_or_else(|| SquaresError::InvalidCellKey(s.to_string()))?;
        Ok(Self::new(parse_digit(top)?, parse_digit(left)?))
    }
}

impl TryFrom<String> for CellKey {
    type Error = SquaresError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CellKey> for String {
    fn from(key: CellKey) -> Self {
        key.to_string()
    }
}

/// Position of a cell on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u8,
    pub col: u8,
}

impl GridPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Self::new((index / GRID_SIDE) as u8, (index % GRID_SIDE) as u8))
        } else {
            None
        }
    }

    /// Row-major index into the flat cell list.
    pub const fn index(self) -> usize {
        self.row as usize * GRID_SIDE + self.col as usize
    }

    /// 1-based square number as printed on paper boards.
    pub const fn square_number(self) -> usize {
        self.index() + 1
    }

    pub(crate) const fn to_nd_index(self) -> [usize; 2] {
        [self.row as usize, self.col as usize]
    }
}
