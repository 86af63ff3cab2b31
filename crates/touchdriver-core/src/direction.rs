//! Scroll directions and axes.
//!
//! A [`PhysicalDirection`] is screen-relative, a [`LogicalDirection`] is
//! content-relative. Conversion between the two goes through a
//! [`PhysicalToLogicalConverter`] chosen by the caller, so mirrored (RTL)
//! layouts can supply their own mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::ActionError;

/// Content-relative direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalDirection {
    Forward,
    Backward,
}

/// Screen-relative direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PhysicalDirection {
    pub const ALL: [PhysicalDirection; 4] = [
        PhysicalDirection::Up,
        PhysicalDirection::Down,
        PhysicalDirection::Left,
        PhysicalDirection::Right,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PhysicalDirection::Up => "up",
            PhysicalDirection::Down => "down",
            PhysicalDirection::Left => "left",
            PhysicalDirection::Right => "right",
        }
    }

    /// The axis this direction moves along.
    pub fn axis(&self) -> Axis {
        match self {
            PhysicalDirection::Up | PhysicalDirection::Down => Axis::Vertical,
            PhysicalDirection::Left | PhysicalDirection::Right => Axis::Horizontal,
        }
    }
}

impl fmt::Display for PhysicalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhysicalDirection {
    type Err = ActionError;

    /// Parses `up`, `down`, `left` or `right` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(PhysicalDirection::Up),
            "down" => Ok(PhysicalDirection::Down),
            "left" => Ok(PhysicalDirection::Left),
            "right" => Ok(PhysicalDirection::Right),
            _ => Err(ActionError::UnknownDirection(s.to_string())),
        }
    }
}

/// A scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

const HORIZONTAL_DIRECTIONS: [PhysicalDirection; 2] =
    [PhysicalDirection::Left, PhysicalDirection::Right];
const VERTICAL_DIRECTIONS: [PhysicalDirection; 2] =
    [PhysicalDirection::Up, PhysicalDirection::Down];

impl Axis {
    /// The two physical directions along this axis, backward-first under the
    /// standard convention.
    pub fn physical_directions(&self) -> &'static [PhysicalDirection; 2] {
        match self {
            Axis::Horizontal => &HORIZONTAL_DIRECTIONS,
            Axis::Vertical => &VERTICAL_DIRECTIONS,
        }
    }
}

/// Maps physical directions to logical ones.
pub trait PhysicalToLogicalConverter: Send + Sync {
    fn to_logical_direction(&self, direction: PhysicalDirection) -> LogicalDirection;
}

/// Standard convention: content flows top-to-bottom and left-to-right.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardConverter;

impl PhysicalToLogicalConverter for StandardConverter {
    fn to_logical_direction(&self, direction: PhysicalDirection) -> LogicalDirection {
        match direction {
            PhysicalDirection::Up | PhysicalDirection::Left => LogicalDirection::Backward,
            PhysicalDirection::Down | PhysicalDirection::Right => LogicalDirection::Forward,
        }
    }
}

/// Right-to-left convention: the horizontal axis is reversed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirroredConverter;

impl PhysicalToLogicalConverter for MirroredConverter {
    fn to_logical_direction(&self, direction: PhysicalDirection) -> LogicalDirection {
        match direction {
            PhysicalDirection::Up | PhysicalDirection::Right => LogicalDirection::Backward,
            PhysicalDirection::Down | PhysicalDirection::Left => LogicalDirection::Forward,
        }
    }
}
