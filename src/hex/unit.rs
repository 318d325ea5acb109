//! This sub-module contains basic types for units that form the hex grid.
//! See the parent module documentation for more info on the coordinate
//! system.

use anyhow::anyhow;
use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, Mul, MulAssign, Neg, Sub,
    SubAssign,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// The six compass directions of a pointy-top hexagonal grid, in clockwise
/// order starting from northeast. Each direction is one unit step in axial
/// space; see [Self::offset].
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HexDir {
    #[display(fmt = "northeast")]
    Northeast,
    #[display(fmt = "east")]
    East,
    #[display(fmt = "southeast")]
    Southeast,
    #[display(fmt = "southwest")]
    Southwest,
    #[display(fmt = "west")]
    West,
    #[display(fmt = "northwest")]
    Northwest,
}

impl HexDir {
    /// All six directions, in clockwise order starting from northeast. The
    /// position of a direction in this list is its index.
    pub const CLOCKWISE: &'static [Self] = &[
        Self::Northeast,
        Self::East,
        Self::Southeast,
        Self::Southwest,
        Self::West,
        Self::Northwest,
    ];

    /// The index of this direction in the clockwise ordering, in `0..6`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look a direction up by clockwise index. Indices wrap around, so this
    /// works for any value.
    pub fn from_index(index: usize) -> Self {
        Self::CLOCKWISE[index % 6]
    }

    /// Rotate this direction clockwise by the given turn.
    pub fn rotated(self, angle: HexAngle) -> Self {
        Self::from_index(self.index() + angle.index())
    }

    /// The axial unit step that moving one tile in this direction applies.
    pub fn offset(self) -> HexCoord {
        match self {
            Self::Northeast => HexCoord::new(1, -1),
            Self::East => HexCoord::new(1, 0),
            Self::Southeast => HexCoord::new(0, 1),
            Self::Southwest => HexCoord::new(-1, 1),
            Self::West => HexCoord::new(-1, 0),
            Self::Northwest => HexCoord::new(0, -1),
        }
    }
}

impl FromStr for HexDir {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::iter()
            .find(|dir| dir.to_string() == s)
            .ok_or_else(|| anyhow!("unknown direction: {:?}", s))
    }
}

/// A turn between two consecutive segments of a pattern, measured in sixths
/// of a full clockwise rotation. The letter form (see [Self::to_char]) is
/// what appears in pattern strings.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HexAngle {
    #[display(fmt = "forward")]
    Forward,
    #[display(fmt = "right")]
    Right,
    #[display(fmt = "right_back")]
    RightBack,
    #[display(fmt = "back")]
    Back,
    #[display(fmt = "left_back")]
    LeftBack,
    #[display(fmt = "left")]
    Left,
}

impl HexAngle {
    /// All six turns, ordered by the amount of clockwise rotation they
    /// apply. The position of a turn in this list is its index.
    pub const CLOCKWISE: &'static [Self] = &[
        Self::Forward,
        Self::Right,
        Self::RightBack,
        Self::Back,
        Self::LeftBack,
        Self::Left,
    ];

    /// The amount of clockwise rotation this turn applies, in `0..6`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look a turn up by rotation amount. Values wrap around, so this works
    /// for any input.
    pub fn from_index(index: usize) -> Self {
        Self::CLOCKWISE[index % 6]
    }

    /// The turn that rotates by the same amount in the opposite direction.
    /// This is negation in the cyclic group of order 6.
    pub fn negated(self) -> Self {
        Self::from_index((6 - self.index()) % 6)
    }

    /// The single-letter form used in pattern strings. The letters are the
    /// left-hand home row of a QWERTY keyboard, which makes patterns easy
    /// to type out by feel.
    pub fn to_char(self) -> char {
        match self {
            Self::Forward => 'w',
            Self::Right => 'e',
            Self::RightBack => 'd',
            Self::Back => 's',
            Self::LeftBack => 'a',
            Self::Left => 'q',
        }
    }

    /// Parse a turn from its single-letter form.
    pub fn from_char(c: char) -> anyhow::Result<Self> {
        Self::iter()
            .find(|angle| angle.to_char() == c)
            .ok_or_else(|| anyhow!("unknown angle character: {:?}", c))
    }
}

/// A position on the hex grid, in axial coordinates. Equality is
/// componentwise.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    Add,
    Sub,
    Neg,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", q, r)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Round an arbitrary screen-space point to the nearest grid position.
    /// This converts to fractional axial coordinates, rounds each component,
    /// then fixes up whichever component drifted less, which is the standard
    /// axial rounding scheme.
    pub fn snap(point: Point2) -> Self {
        let sqrt3 = 3.0_f64.sqrt();
        let qf = sqrt3 / 3.0 * point.x - point.y / 3.0;
        let rf = 2.0 / 3.0 * point.y;

        let q = qf.round();
        let r = rf.round();
        let q_rem = qf - q;
        let r_rem = rf - r;

        if q_rem.abs() >= r_rem.abs() {
            Self::new((q + (q_rem + r_rem / 2.0).round()) as i32, r as i32)
        } else {
            Self::new(q as i32, (r + (r_rem + q_rem / 2.0).round()) as i32)
        }
    }

    /// The screen-space position of this grid point. This is the inverse of
    /// [Self::snap], up to snapping.
    pub fn to_point(self) -> Point2 {
        let sqrt3 = 3.0_f64.sqrt();
        Point2 {
            x: sqrt3 * self.q as f64 + sqrt3 / 2.0 * self.r as f64,
            y: 1.5 * self.r as f64,
        }
    }
}

/// A 2D point in screen space. See module-level docs in [crate::hex] for a
/// description of what screen space means.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_rotation() {
        assert_eq!(
            HexDir::Northeast.rotated(HexAngle::Forward),
            HexDir::Northeast
        );
        assert_eq!(HexDir::Northeast.rotated(HexAngle::Right), HexDir::East);
        assert_eq!(HexDir::West.rotated(HexAngle::Back), HexDir::East);
        assert_eq!(
            HexDir::Northwest.rotated(HexAngle::Right),
            HexDir::Northeast
        );
        assert_eq!(HexDir::East.rotated(HexAngle::Left), HexDir::Northeast);
    }

    #[test]
    fn test_dir_parse() {
        for dir in HexDir::iter() {
            assert_eq!(dir.to_string().parse::<HexDir>().unwrap(), dir);
        }
        assert!("north".parse::<HexDir>().is_err());
        assert!("".parse::<HexDir>().is_err());
    }

    #[test]
    fn test_angle_negation() {
        assert_eq!(HexAngle::Forward.negated(), HexAngle::Forward);
        assert_eq!(HexAngle::Right.negated(), HexAngle::Left);
        assert_eq!(HexAngle::RightBack.negated(), HexAngle::LeftBack);
        assert_eq!(HexAngle::Back.negated(), HexAngle::Back);
        for angle in HexAngle::iter() {
            assert_eq!(angle.negated().negated(), angle);
        }
    }

    #[test]
    fn test_angle_chars() {
        for angle in HexAngle::iter() {
            assert_eq!(HexAngle::from_char(angle.to_char()).unwrap(), angle);
        }
        assert!(HexAngle::from_char('x').is_err());
    }

    #[test]
    fn test_offsets_cancel() {
        // Opposite directions are 3 apart in the clockwise ordering and
        // their unit steps must cancel out
        for dir in HexDir::iter() {
            let opposite = HexDir::from_index(dir.index() + 3);
            assert_eq!(dir.offset() + opposite.offset(), HexCoord::ORIGIN);
        }
    }

    #[test]
    fn test_snap_roundtrip() {
        for q in -4..=4 {
            for r in -4..=4 {
                let coord = HexCoord::new(q, r);
                assert_eq!(HexCoord::snap(coord.to_point()), coord);
            }
        }
    }

    #[test]
    fn test_snap_idempotent() {
        // Snapping a snapped point must not move it
        let points = [
            Point2::new(0.2, -0.3),
            Point2::new(1.9, 1.1),
            Point2::new(-3.7, 2.2),
            Point2::new(10.4, -7.8),
            Point2::new(0.49, 0.51),
        ];
        for point in points {
            let snapped = HexCoord::snap(point);
            assert_eq!(HexCoord::snap(snapped.to_point()), snapped);
        }
    }
}
