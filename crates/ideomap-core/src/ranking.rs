//! Graded match scores
//!
//! Scores every category against a point so callers can show runner-up
//! categories, not only the single classification result.

use serde::Serialize;

use crate::axis::{Axis, Point3};
use crate::category::{Category, CategoryStore};
use crate::geometry::{center_of, contains};

/// Base score of a category whose box contains the point
pub const CONTAINED_BASE: f64 = 1000.0;
/// Per-axis credit for an in-range coordinate on a partial match
pub const AXIS_HIT: f64 = 100.0;
/// Affinity lost per unit of distance outside an axis range
pub const AFFINITY_FALLOFF: f64 = 10.0;

/// Per-axis affinity, 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisAffinity {
    pub economic: f64,
    pub culture: f64,
    pub authority: f64,
}

impl AxisAffinity {
    fn mean(&self) -> f64 {
        (self.economic + self.culture + self.authority) / 3.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchScore<'a> {
    #[serde(rename = "key", serialize_with = "serialize_key")]
    pub category: &'a Category,
    pub score: f64,
    pub contained: bool,
    pub affinity: AxisAffinity,
}

fn serialize_key<S: serde::Serializer>(
    category: &&Category,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&category.key)
}

/// Score a single category.
///
/// A containing box scores `1000 - distance to its center`. Otherwise every
/// in-range axis adds 100 and the mean affinity is added on top, where an
/// out-of-range axis has affinity `max(0, 100 - 10 * distance to the nearest bound)`.
pub fn score(point: Point3, category: &Category) -> MatchScore<'_> {
    if contains(point, category) {
        let distance = point.distance(&center_of(category));
        return MatchScore {
            category,
            score: CONTAINED_BASE - distance,
            contained: true,
            affinity: AxisAffinity {
                economic: AXIS_HIT,
                culture: AXIS_HIT,
                authority: AXIS_HIT,
            },
        };
    }

    let mut hits = 0u32;
    let mut affinity_of = |axis: Axis| {
        let range = category.range(axis);
        let value = point.get(axis);
        if range.contains(value) {
            hits += 1;
            AXIS_HIT
        } else {
            (AXIS_HIT - range.distance_to_nearest_bound(value) * AFFINITY_FALLOFF).max(0.0)
        }
    };
    let affinity = AxisAffinity {
        economic: affinity_of(Axis::Economic),
        culture: affinity_of(Axis::Culture),
        authority: affinity_of(Axis::Authority),
    };

    MatchScore {
        category,
        score: f64::from(hits) * AXIS_HIT + affinity.mean(),
        contained: false,
        affinity,
    }
}

/// All categories ranked by descending score; equal scores keep declaration order
pub fn rank(point: Point3, store: &CategoryStore) -> Vec<MatchScore<'_>> {
    let mut scores: Vec<_> = store.iter().map(|cat| score(point, cat)).collect();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}
