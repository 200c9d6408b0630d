//! Axes of the ideology space and the primitive types built on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdeomapError;

/// Nominal extent of every axis. Points outside it are still classified.
pub const NOMINAL_LIMIT: f64 = 12.0;

/// One of the three independent dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Collective ownership (-) to laissez-faire (+)
    Economic,
    /// Progressive (-) to traditional (+)
    Culture,
    /// Decentralized (-) to centralized (+)
    Authority,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Economic, Axis::Culture, Axis::Authority];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economic => "economic",
            Self::Culture => "culture",
            Self::Authority => "authority",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Axis {
    type Err = IdeomapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economic" | "econ" | "e" => Ok(Self::Economic),
            "culture" | "cult" | "c" => Ok(Self::Culture),
            "authority" | "auth" | "a" => Ok(Self::Authority),
            _ => Err(IdeomapError::InvalidAxis {
                name: s.to_string(),
            }),
        }
    }
}

/// Closed interval `[min, max]` on a single axis.
///
/// Serialized as a two-element array to match the definition format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Construct without validation; the store rejects `min > max` at load.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Distance from `value` to whichever bound is closer.
    pub fn distance_to_nearest_bound(&self, value: f64) -> f64 {
        (value - self.min).abs().min((value - self.max).abs())
    }
}

impl From<AxisRange> for [f64; 2] {
    fn from(range: AxisRange) -> Self {
        [range.min, range.max]
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// One range per axis: an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRanges {
    pub economic: AxisRange,
    pub culture: AxisRange,
    pub authority: AxisRange,
}

impl AxisRanges {
    pub fn get(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::Economic => self.economic,
            Axis::Culture => self.culture,
            Axis::Authority => self.authority,
        }
    }
}

/// A location in the ideology space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub economic: f64,
    pub culture: f64,
    pub authority: f64,
}

impl Point3 {
    pub const fn new(economic: f64, culture: f64, authority: f64) -> Self {
        Self {
            economic,
            culture,
            authority,
        }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Economic => self.economic,
            Axis::Culture => self.culture,
            Axis::Authority => self.authority,
        }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point3) -> f64 {
        let de = self.economic - other.economic;
        let dc = self.culture - other.culture;
        let da = self.authority - other.authority;
        (de * de + dc * dc + da * da).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.economic.is_finite() && self.culture.is_finite() && self.authority.is_finite()
    }

    pub fn clamp(&self, min: f64, max: f64) -> Self {
        Self {
            economic: self.economic.clamp(min, max),
            culture: self.culture.clamp(min, max),
            authority: self.authority.clamp(min, max),
        }
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2})",
            self.economic, self.culture, self.authority
        )
    }
}
