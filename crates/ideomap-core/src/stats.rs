//! Per-axis distribution counts over a category set.
//!
//! Each axis counts categories against three independent predicates:
//!
//! - low: upper bound below [`LOW_UPPER_BOUND`]
//! - middle: lower bound at least [`MIDDLE_LOWER_BOUND`] and upper bound at
//!   most [`MIDDLE_UPPER_BOUND`]
//! - high: lower bound above [`HIGH_LOWER_BOUND`]
//!
//! The buckets are neither exclusive nor exhaustive: `[-1, 3]` is in none of
//! them and `[-2, -1]` is in both low and middle. Per-axis sums need not equal
//! `total`.

use std::fmt;

use serde::Serialize;

use crate::axis::{Axis, AxisRange};
use crate::category::Category;

pub const LOW_UPPER_BOUND: f64 = 0.0;
pub const MIDDLE_LOWER_BOUND: f64 = -2.0;
pub const MIDDLE_UPPER_BOUND: f64 = 2.0;
pub const HIGH_LOWER_BOUND: f64 = 0.0;

/// Counts for one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AxisStats {
    /// Left / low / libertarian
    pub low: usize,
    /// Center / middle
    pub middle: usize,
    /// Right / high / authoritarian
    pub high: usize,
}

impl AxisStats {
    fn record(&mut self, range: AxisRange) {
        if range.max < LOW_UPPER_BOUND {
            self.low += 1;
        }
        if range.min >= MIDDLE_LOWER_BOUND && range.max <= MIDDLE_UPPER_BOUND {
            self.middle += 1;
        }
        if range.min > HIGH_LOWER_BOUND {
            self.high += 1;
        }
    }

    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.low, self.middle, self.high)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total: usize,
    pub economic: AxisStats,
    pub culture: AxisStats,
    pub authority: AxisStats,
}

impl CategoryStats {
    /// Count every category; order of iteration does not matter
    pub fn compute<'a, I>(categories: I) -> Self
    where
        I: IntoIterator<Item = &'a Category>,
    {
        let mut stats = Self::default();
        for cat in categories {
            stats.total += 1;
            stats.economic.record(cat.ranges.economic);
            stats.culture.record(cat.ranges.culture);
            stats.authority.record(cat.ranges.authority);
        }
        stats
    }

    pub fn axis(&self, axis: Axis) -> AxisStats {
        match axis {
            Axis::Economic => self.economic,
            Axis::Culture => self.culture,
            Axis::Authority => self.authority,
        }
    }
}

impl fmt::Display for CategoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TOTAL_CATEGORIES: {}", self.total)?;
        writeln!(f)?;
        let sections = [
            ("ECON", ["left", "mid", "right"], self.economic),
            ("CULT", ["left", "mid", "right"], self.culture),
            ("POWER", ["freedom", "middle", "authoritarian"], self.authority),
        ];
        for (i, (title, labels, stats)) in sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", title)?;
            writeln!(f, "- {}: {}", labels[0], stats.low)?;
            writeln!(f, "- {}: {}", labels[1], stats.middle)?;
            writeln!(f, "- {}: {}", labels[2], stats.high)?;
        }
        Ok(())
    }
}
