use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squares_core::{
    Axis, AxisAssignment, AxisPair, Board, Checkpoint, Digit, GRID_SIDE, Owners, Team,
};

use crate::*;

/// Digits along both sides of the board as stored by the pool. `bearsAxis` runs down the left
/// side, `oppAxis` across the top; `null` marks a slot not drawn yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisData {
    pub bears_axis: Vec<Option<i64>>,
    pub opp_axis: Vec<Option<i64>>,
}

impl Default for AxisData {
    fn default() -> Self {
        Self {
            bears_axis: vec![None; GRID_SIDE],
            opp_axis: vec![None; GRID_SIDE],
        }
    }
}

impl AxisData {
    pub fn to_pair(&self) -> Result<AxisPair> {
        Ok(AxisPair::new(
            parse_axis(Team::Left, &self.bears_axis)?,
            parse_axis(Team::Top, &self.opp_axis)?,
        ))
    }
}

fn parse_axis(side: Team, slots: &[Option<i64>]) -> Result<Axis> {
    if slots.len() != GRID_SIDE {
        return Err(ProtocolError::AxisLength {
            side,
            len: slots.len(),
        });
    }

    let mut axis = [None; GRID_SIDE];
    for (slot, (target, value)) in axis.iter_mut().zip(slots).enumerate() {
        let Some(value) = *value else {
            continue;
        };
        let digit = u8::try_from(value).ok().and_then(Digit::new);
        *target = Some(digit.ok_or(ProtocolError::AxisDigit { side, slot, value })?);
    }
    Ok(Axis::new(axis))
}

/// Board record as stored by the pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    #[serde(flatten)]
    pub axes: AxisData,
    /// 100 row-major cells. `null` cells are treated as empty.
    pub squares: Vec<Option<Vec<String>>>,
    #[serde(default)]
    pub is_dynamic: bool,
    /// Per-checkpoint axes for dynamic boards, keyed by checkpoint label.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub quarter_axes: BTreeMap<String, AxisData>,
}

impl Default for BoardData {
    fn default() -> Self {
        Self {
            axes: AxisData::default(),
            squares: vec![Some(Vec::new()); GRID_SIDE * GRID_SIDE],
            is_dynamic: false,
            quarter_axes: BTreeMap::new(),
        }
    }
}

impl BoardData {
    /// Validated engine board.
    ///
    /// Static boards use the base axes. Dynamic boards only use `quarterAxes`; a checkpoint
    /// missing from it has no assignment yet.
    pub fn to_board(&self) -> Result<Board> {
        let axes = if self.is_dynamic {
            let pairs = self
                .quarter_axes
                .iter()
                .map(|(label, data)| -> Result<_> {
                    Ok((label.parse::<Checkpoint>()?, data.to_pair()?))
                })
                .collect::<Result<BTreeMap<_, _>>>()?;
            log::debug!("dynamic board with axes for {} checkpoint(s)", pairs.len());
            AxisAssignment::Dynamic(pairs)
        } else {
            AxisAssignment::Static(self.axes.to_pair()?)
        };

        let cells = self
            .squares
            .iter()
            .map(|names| names.iter().flatten().cloned().collect::<Owners>())
            .collect();

        Ok(Board::from_cells(axes, cells)?)
    }
}
