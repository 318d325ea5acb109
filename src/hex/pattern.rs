use crate::hex::{HexAngle, HexCoord, HexDir};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A walk on the hex grid: a starting compass direction plus a sequence of
/// turns. The walk starts at the origin, takes one step in the starting
/// direction, then turns and steps once per angle.
///
/// A pattern is an *unlabeled shape*: two patterns are equal iff their turn
/// sequences are equal, regardless of starting direction. The starting
/// direction still matters for [Self::coords] and for the string form, it
/// just doesn't participate in identity.
///
/// ## String form
///
/// `dir,angles`, e.g. `northeast,qaq`. The direction is one of the six
/// full compass words and each angle is one of `w e d s a q` (see
/// [HexAngle::to_char]). [Self::to_string] round-trips through
/// [Self::from_str] exactly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HexPattern {
    start_dir: HexDir,
    angles: Vec<HexAngle>,
}

impl HexPattern {
    pub fn new(start_dir: HexDir, angles: Vec<HexAngle>) -> Self {
        Self { start_dir, angles }
    }

    pub fn start_dir(&self) -> HexDir {
        self.start_dir
    }

    pub fn angles(&self) -> &[HexAngle] {
        &self.angles
    }

    /// The bare angle-letter string, without the starting direction. Since
    /// pattern identity ignores the starting direction, this string is a
    /// complete identity key for the pattern.
    pub fn angle_signature(&self) -> String {
        self.angles.iter().map(|angle| angle.to_char()).collect()
    }

    /// Every grid position the walk visits, in order. The origin is
    /// included, so the output always has `2 + angles.len()` entries.
    pub fn coords(&self) -> Vec<HexCoord> {
        let mut coords = Vec::with_capacity(self.angles.len() + 2);
        let mut pos = HexCoord::ORIGIN;
        let mut dir = self.start_dir;

        coords.push(pos);
        pos = pos + dir.offset();
        coords.push(pos);
        for &angle in &self.angles {
            dir = dir.rotated(angle);
            pos = pos + dir.offset();
            coords.push(pos);
        }
        coords
    }

    /// The same shape walked end-to-start. The turns reverse order and flip
    /// handedness, and the new starting direction is the opposite of the
    /// original walk's final heading.
    pub fn reversed(&self) -> Self {
        let total: usize =
            self.angles.iter().map(|angle| angle.index()).sum();
        Self {
            start_dir: HexDir::from_index(self.start_dir.index() + total + 3),
            angles: self
                .angles
                .iter()
                .rev()
                .map(|angle| angle.negated())
                .collect(),
        }
    }

    /// The shape reflected across the grid's vertical axis. Every turn
    /// flips handedness in place.
    pub fn mirrored(&self) -> Self {
        Self {
            start_dir: HexDir::from_index(5 - self.start_dir.index()),
            angles: self.angles.iter().map(|angle| angle.negated()).collect(),
        }
    }

    /// The same shape started in a rotated direction. This changes nothing
    /// about the pattern's identity.
    pub fn rotated(&self, angle: HexAngle) -> Self {
        Self {
            start_dir: self.start_dir.rotated(angle),
            angles: self.angles.clone(),
        }
    }
}

// A pattern is an unlabeled shape, so the starting direction is excluded
// from identity
impl PartialEq for HexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.angles == other.angles
    }
}

impl Eq for HexPattern {}

impl fmt::Display for HexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start_dir, self.angle_signature())
    }
}

impl FromStr for HexPattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (dir, angles) = s.split_once(',').ok_or_else(|| {
            anyhow!("invalid pattern string {:?}; expected `dir,angles`", s)
        })?;
        let start_dir = dir
            .parse()
            .with_context(|| format!("invalid pattern string {:?}", s))?;
        let angles = angles
            .chars()
            .map(HexAngle::from_char)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("invalid pattern string {:?}", s))?;
        Ok(Self { start_dir, angles })
    }
}
