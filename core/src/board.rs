use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Names owning one cell, in the order they were entered. Duplicates are kept.
pub type Owners = SmallVec<[String; 2]>;

/// Digits printed along one side of the board, one per row or column. `None` marks a slot not
/// yet drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis([Option<Digit>; GRID_SIDE]);

impl Axis {
    pub const fn new(slots: [Option<Digit>; GRID_SIDE]) -> Self {
        Self(slots)
    }

    pub const fn unassigned() -> Self {
        Self([None; GRID_SIDE])
    }

    /// Axis with every slot assigned, in the given order.
    pub fn from_digits(digits: [Digit; GRID_SIDE]) -> Self {
        Self(digits.map(Some))
    }

    /// Natural `0..=9` ordering.
    pub fn identity() -> Self {
        let mut slots = [None; GRID_SIDE];
        for (slot, digit) in slots.iter_mut().zip(Digit::all()) {
            *slot = Some(digit);
        }
        Self(slots)
    }

    pub fn slots(&self) -> &[Option<Digit>; GRID_SIDE] {
        &self.0
    }

    /// Row or column holding `digit`, if it has been drawn.
    pub fn position_of(&self, digit: Digit) -> Option<u8> {
        self.0
            .iter()
            .position(|&slot| slot == Some(digit))
            .map(|pos| pos as u8)
    }

    /// All slots assigned. Together with [`Axis::validate`] this makes the axis a permutation.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn validate(&self, side: Team) -> Result<()> {
        let mut seen = [false; GRID_SIDE];
        for digit in self.0.iter().flatten() {
            let seen_digit = &mut seen[digit.get() as usize];
            if *seen_digit {
                return Err(SquaresError::InvalidAxis {
                    side,
                    digit: *digit,
                });
            }
            *seen_digit = true;
        }
        Ok(())
    }
}

/// Row (left) and column (top) axes used together for one checkpoint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisPair {
    pub left: Axis,
    pub top: Axis,
}

impl AxisPair {
    pub const fn new(left: Axis, top: Axis) -> Self {
        Self { left, top }
    }

    pub const fn side(&self, side: Team) -> &Axis {
        match side {
            Team::Left => &self.left,
            Team::Top => &self.top,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.left.is_complete() && self.top.is_complete()
    }

    pub fn validate(&self) -> Result<()> {
        self.left.validate(Team::Left)?;
        self.top.validate(Team::Top)
    }
}

/// How digits are assigned to rows and columns over the course of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisAssignment {
    /// One assignment for the whole game.
    Static(AxisPair),
    /// Re-drawn per checkpoint. A checkpoint without a pair has no assignment yet.
    Dynamic(BTreeMap<Checkpoint, AxisPair>),
}

impl Default for AxisAssignment {
    fn default() -> Self {
        Self::Static(AxisPair::default())
    }
}

static UNASSIGNED: Axis = Axis::unassigned();

/// Supplies the axis in force for a given checkpoint.
pub trait AxisSource {
    fn axis_for(&self, side: Team, checkpoint: Checkpoint) -> &Axis;
}

impl AxisSource for AxisAssignment {
    fn axis_for(&self, side: Team, checkpoint: Checkpoint) -> &Axis {
        match self {
            Self::Static(pair) => pair.side(side),
            Self::Dynamic(pairs) => pairs
                .get(&checkpoint)
                .map_or(&UNASSIGNED, |pair| pair.side(side)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    axes: AxisAssignment,
    cells: Array2<Owners>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            axes: AxisAssignment::default(),
            cells: Array2::default((GRID_SIDE, GRID_SIDE)),
        }
    }
}

impl Board {
    /// Builds a board from row-major cells. Every axis pair is checked for repeated digits.
    pub fn from_cells(axes: AxisAssignment, cells: Vec<Owners>) -> Result<Self> {
        let actual = cells.len();
        let cells = Array2::from_shape_vec((GRID_SIDE, GRID_SIDE), cells).map_err(|_| {
            SquaresError::InvalidBoardShape {
                expected: CELL_COUNT,
                actual,
            }
        })?;

        let board = Self { axes, cells };
        board.validate()?;
        Ok(board)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cells.dim() != (GRID_SIDE, GRID_SIDE) {
            return Err(SquaresError::InvalidBoardShape {
                expected: CELL_COUNT,
                actual: self.cells.len(),
            });
        }

        match &self.axes {
            AxisAssignment::Static(pair) => pair.validate(),
            AxisAssignment::Dynamic(pairs) => pairs.values().try_for_each(AxisPair::validate),
        }
    }

    pub fn axes(&self) -> &AxisAssignment {
        &self.axes
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.axes, AxisAssignment::Dynamic(_))
    }

    /// Both axes fully drawn for `checkpoint`, so any digit pair maps to a cell.
    pub fn is_complete_for(&self, checkpoint: Checkpoint) -> bool {
        self.axis_for(Team::Left, checkpoint).is_complete()
            && self.axis_for(Team::Top, checkpoint).is_complete()
    }

    pub fn owners(&self, pos: GridPos) -> &[String] {
        &self.cells[pos.to_nd_index()]
    }

    /// Owners of the cell `key` lands on under `checkpoint`'s axes. Empty when nobody owns it or
    /// the axes are not drawn yet.
    pub fn owners_of(&self, key: CellKey, checkpoint: Checkpoint) -> &[String] {
        cell_index_for(key.top, key.left, checkpoint, self)
            .map(|pos| self.owners(pos))
            .unwrap_or_default()
    }

    /// Cells with their owners, in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (GridPos, &[String])> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, owners)| Some((GridPos::from_index(index)?, owners.as_slice())))
    }
}

impl AxisSource for Board {
    fn axis_for(&self, side: Team, checkpoint: Checkpoint) -> &Axis {
        self.axes.axis_for(side, checkpoint)
    }
}

/// Cell at the intersection of `top` and `left` under `checkpoint`'s axes.
///
/// Returns `None` when either digit has not been drawn on its axis yet, which is a normal state
/// for a board still being set up.
pub fn cell_index_for(
    top: Digit,
    left: Digit,
    checkpoint: Checkpoint,
    axes: &impl AxisSource,
) -> Option<GridPos> {
    let col = axes.axis_for(Team::Top, checkpoint).position_of(top)?;
    let row = axes.axis_for(Team::Left, checkpoint).position_of(left)?;
    Some(GridPos::new(row, col))
}
