//! Geometry Engine
//!
//! Box centers, point containment and classification of points against the
//! ordered category set, plus derived artifacts (box vertices, 2D projections).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::axis::{Axis, Point3};
use crate::category::{Category, CategoryStore};
use crate::error::{IdeomapError, Result};

/// Coordinates are clamped to this magnitude in nearest mode
pub const NEAREST_CLAMP: f64 = 10.0;

/// Midpoint of each axis range
pub fn center_of(category: &Category) -> Point3 {
    let r = &category.ranges;
    Point3::new(
        r.economic.midpoint(),
        r.culture.midpoint(),
        r.authority.midpoint(),
    )
}

/// True iff every coordinate lies in its closed interval
pub fn contains(point: Point3, category: &Category) -> bool {
    Axis::ALL
        .iter()
        .all(|&axis| category.range(axis).contains(point.get(axis)))
}

/// First category in iteration order whose box contains `point`.
///
/// `None` means the point is unclassified, which is an expected outcome.
pub fn classify<'a, I>(point: Point3, categories: I) -> Option<&'a Category>
where
    I: IntoIterator<Item = &'a Category>,
{
    categories.into_iter().find(|cat| contains(point, cat))
}

/// Strategy for resolving a point to a category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMode {
    /// First containing box in declaration order (default)
    #[default]
    FirstMatch,
    /// Closest center among containing boxes, or among all boxes when none
    /// contains the (clamped) point
    Nearest,
}

impl ClassificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstMatch => "first-match",
            Self::Nearest => "nearest",
        }
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClassificationMode {
    type Err = IdeomapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "first-match" | "first" => Ok(Self::FirstMatch),
            "nearest" => Ok(Self::Nearest),
            _ => Err(IdeomapError::InvalidMode {
                name: s.to_string(),
            }),
        }
    }
}

/// Box vertex indices joined by each of the 12 edges
pub const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Box vertex indices of each face: bottom, top, front, back, left, right
pub const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 3, 7, 4],
    [1, 2, 6, 5],
];

/// The eight corners of a category box.
///
/// Vertices 0-3 lie on the authority minimum, 4-7 on the maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBox {
    pub key: String,
    pub vertices: [Point3; 8],
}

impl CategoryBox {
    pub fn of(category: &Category) -> Self {
        let r = &category.ranges;
        let (e0, e1) = (r.economic.min, r.economic.max);
        let (c0, c1) = (r.culture.min, r.culture.max);
        let (a0, a1) = (r.authority.min, r.authority.max);

        Self {
            key: category.key.clone(),
            vertices: [
                Point3::new(e0, c0, a0),
                Point3::new(e1, c0, a0),
                Point3::new(e1, c1, a0),
                Point3::new(e0, c1, a0),
                Point3::new(e0, c0, a1),
                Point3::new(e1, c0, a1),
                Point3::new(e1, c1, a1),
                Point3::new(e0, c1, a1),
            ],
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        BOX_EDGES
            .iter()
            .map(|&[a, b]| (self.vertices[a], self.vertices[b]))
    }

    pub fn faces(&self) -> impl Iterator<Item = [Point3; 4]> + '_ {
        BOX_FACES.iter().map(|face| face.map(|i| self.vertices[i]))
    }
}

/// A category box flattened onto two axes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub key: String,
    pub axes: (Axis, Axis),
    /// Lower-left corner
    pub origin: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub center: (f64, f64),
}

impl Projection {
    pub fn of(category: &Category, horizontal: Axis, vertical: Axis) -> Self {
        let h = category.range(horizontal);
        let v = category.range(vertical);
        Self {
            key: category.key.clone(),
            axes: (horizontal, vertical),
            origin: (h.min, v.min),
            width: h.width(),
            height: v.width(),
            center: (h.midpoint(), v.midpoint()),
        }
    }
}

/// Classification and geometry over a loaded store, with centers cached in
/// declaration order
#[derive(Debug, Clone)]
pub struct GeometryEngine<'a> {
    store: &'a CategoryStore,
    centers: Vec<Point3>,
}

impl<'a> GeometryEngine<'a> {
    pub fn new(store: &'a CategoryStore) -> Self {
        let centers = store.iter().map(center_of).collect();
        Self { store, centers }
    }

    pub fn store(&self) -> &'a CategoryStore {
        self.store
    }

    /// Cached center of a category
    pub fn center(&self, name: &str) -> Result<Point3> {
        let position = self
            .store
            .position(name)
            .ok_or_else(|| IdeomapError::CategoryNotFound {
                name: name.to_string(),
            })?;
        Ok(self.centers[position])
    }

    /// Every category with its center, in declaration order
    pub fn centers(&self) -> impl Iterator<Item = (&'a Category, Point3)> + '_ {
        self.store.iter().zip(self.centers.iter().copied())
    }

    /// First-match classification
    pub fn classify(&self, point: Point3) -> Option<&'a Category> {
        self.classify_with(point, ClassificationMode::FirstMatch)
    }

    pub fn classify_with(&self, point: Point3, mode: ClassificationMode) -> Option<&'a Category> {
        let result = match mode {
            ClassificationMode::FirstMatch => classify(point, self.store),
            ClassificationMode::Nearest => self.nearest(point),
        };

        match result {
            Some(cat) => debug!(%point, %mode, category = %cat.key, "classified"),
            None => debug!(%point, %mode, "unclassified"),
        }
        result
    }

    fn nearest(&self, point: Point3) -> Option<&'a Category> {
        if !point.is_finite() {
            return None;
        }
        let point = point.clamp(-NEAREST_CLAMP, NEAREST_CLAMP);

        let containing = self.closest(point, |cat| contains(point, cat));
        if containing.is_some() {
            return containing;
        }
        trace!(%point, "no containing box, falling back to closest center");
        self.closest(point, |_| true)
    }

    /// Closest center among categories passing `filter`; earliest wins ties
    fn closest<F>(&self, point: Point3, filter: F) -> Option<&'a Category>
    where
        F: Fn(&Category) -> bool,
    {
        let mut best: Option<(&'a Category, f64)> = None;
        for (cat, center) in self.centers() {
            if !filter(cat) {
                continue;
            }
            let d = point.distance(&center);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((cat, d));
            }
        }
        best.map(|(cat, _)| cat)
    }

    pub fn box_of(&self, name: &str) -> Result<CategoryBox> {
        self.store.get(name).map(CategoryBox::of)
    }

    /// Projections of every category onto the given axis pair, in declaration order
    pub fn project(&self, horizontal: Axis, vertical: Axis) -> Vec<Projection> {
        self.store
            .iter()
            .map(|cat| Projection::of(cat, horizontal, vertical))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{AxisRange, AxisRanges};

    fn cat(key: &str, e: (f64, f64), c: (f64, f64), a: (f64, f64)) -> Category {
        Category::new(
            key,
            AxisRanges {
                economic: AxisRange::new(e.0, e.1),
                culture: AxisRange::new(c.0, c.1),
                authority: AxisRange::new(a.0, a.1),
            },
        )
    }

    fn left_right() -> CategoryStore {
        CategoryStore::from_categories(vec![
            cat("left", (-10.0, -1.0), (-10.0, 10.0), (-10.0, 10.0)),
            cat("right", (1.0, 10.0), (-10.0, 10.0), (-10.0, 10.0)),
        ])
        .unwrap()
    }

    fn key_of(result: Option<&Category>) -> Option<&str> {
        result.map(|c| c.key.as_str())
    }

    #[test]
    fn test_left_right_scenario() {
        let store = left_right();
        let engine = GeometryEngine::new(&store);
        assert_eq!(key_of(engine.classify(Point3::new(-5.0, 0.0, 0.0))), Some("left"));
        assert_eq!(key_of(engine.classify(Point3::new(5.0, 0.0, 0.0))), Some("right"));
        assert_eq!(key_of(engine.classify(Point3::new(0.0, 0.0, 0.0))), None);
    }

    #[test]
    fn test_center_of() {
        let c = cat("c", (-4.0, 8.0), (-2.0, 8.0), (7.0, 10.0));
        assert_eq!(center_of(&c), Point3::new(2.0, 3.0, 8.5));
    }

    #[test]
    fn test_centers_inside_own_box() {
        let store = CategoryStore::builtin().unwrap();
        for cat in store.iter() {
            assert!(
                contains(center_of(cat), cat),
                "center of {} outside its box",
                cat.key
            );
        }
    }

    #[test]
    fn test_boundary_points_belong() {
        let c = cat("c", (-2.0, 2.0), (0.0, 4.0), (-6.0, -1.0));
        assert!(contains(Point3::new(-2.0, 0.0, -6.0), &c));
        assert!(contains(Point3::new(2.0, 4.0, -1.0), &c));
        assert!(!contains(Point3::new(2.0 + 1e-9, 4.0, -1.0), &c));
    }

    #[test]
    fn test_shared_boundary_goes_to_first_declared() {
        let store = CategoryStore::from_categories(vec![
            cat("west", (-5.0, 0.0), (-5.0, 5.0), (-5.0, 5.0)),
            cat("east", (0.0, 5.0), (-5.0, 5.0), (-5.0, 5.0)),
        ])
        .unwrap();
        let p = Point3::new(0.0, 1.0, 1.0);
        assert_eq!(key_of(classify(p, &store)), Some("west"));

        let reversed: Vec<&Category> = store.iter().rev().collect();
        assert_eq!(key_of(classify(p, reversed)), Some("east"));
    }

    #[test]
    fn test_overlap_precedence_nested_and_identical() {
        let store = CategoryStore::from_categories(vec![
            cat("broad", (-10.0, 10.0), (-10.0, 10.0), (-10.0, 10.0)),
            cat("narrow", (-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0)),
            cat("twin", (-10.0, 10.0), (-10.0, 10.0), (-10.0, 10.0)),
        ])
        .unwrap();
        let engine = GeometryEngine::new(&store);
        assert_eq!(key_of(engine.classify(Point3::default())), Some("broad"));
        assert_eq!(key_of(engine.classify(Point3::new(9.0, 9.0, 9.0))), Some("broad"));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let store = CategoryStore::builtin().unwrap();
        let engine = GeometryEngine::new(&store);
        let p = Point3::new(-8.0, -2.0, 5.0);
        let first = key_of(engine.classify(p));
        for _ in 0..10 {
            assert_eq!(key_of(engine.classify(p)), first);
        }
        assert_eq!(first, Some("orthodox_marxism"));
    }

    #[test]
    fn test_out_of_nominal_range() {
        let store = CategoryStore::from_categories(vec![cat(
            "huge",
            (-20.0, 20.0),
            (-20.0, 20.0),
            (-20.0, 20.0),
        )])
        .unwrap();
        assert_eq!(key_of(classify(Point3::new(15.0, -13.0, 0.0), &store)), Some("huge"));

        let builtin = CategoryStore::builtin().unwrap();
        assert_eq!(key_of(classify(Point3::new(11.0, 11.0, 11.0), &builtin)), None);
    }

    #[test]
    fn test_builtin_scenarios() {
        let store = CategoryStore::builtin().unwrap();
        let engine = GeometryEngine::new(&store);
        assert_eq!(key_of(engine.classify(Point3::new(0.0, 0.0, 0.0))), Some("keynesianism"));
        assert_eq!(key_of(engine.classify(Point3::new(5.0, 5.0, 3.0))), Some("conservatism"));
        assert_eq!(
            key_of(engine.classify(Point3::new(6.0, 0.0, -8.0))),
            Some("anarcho_capitalism")
        );
    }

    #[test]
    fn test_nearest_prefers_closest_containing_center() {
        let store = CategoryStore::from_categories(vec![
            cat("broad", (-10.0, 10.0), (-10.0, 10.0), (-10.0, 10.0)),
            cat("corner", (4.0, 8.0), (4.0, 8.0), (4.0, 8.0)),
        ])
        .unwrap();
        let engine = GeometryEngine::new(&store);
        let p = Point3::new(6.0, 6.0, 6.0);
        assert_eq!(key_of(engine.classify(p)), Some("broad"));
        assert_eq!(
            key_of(engine.classify_with(p, ClassificationMode::Nearest)),
            Some("corner")
        );
    }

    #[test]
    fn test_nearest_falls_back_to_closest_center() {
        let store = left_right();
        let engine = GeometryEngine::new(&store);
        assert_eq!(
            key_of(engine.classify_with(Point3::new(0.5, 0.0, 0.0), ClassificationMode::Nearest)),
            Some("right")
        );
        // equidistant from both centers: earliest declaration wins
        assert_eq!(
            key_of(engine.classify_with(Point3::default(), ClassificationMode::Nearest)),
            Some("left")
        );
    }

    #[test]
    fn test_nearest_clamps_coordinates() {
        let store = CategoryStore::from_categories(vec![
            cat("edge", (9.0, 10.0), (-1.0, 1.0), (-1.0, 1.0)),
            cat("far", (30.0, 40.0), (-1.0, 1.0), (-1.0, 1.0)),
        ])
        .unwrap();
        let engine = GeometryEngine::new(&store);
        // 35 clamps to 10, which sits inside "edge"
        assert_eq!(
            key_of(engine.classify_with(Point3::new(35.0, 0.0, 0.0), ClassificationMode::Nearest)),
            Some("edge")
        );
    }

    #[test]
    fn test_nearest_on_empty_store() {
        let store = CategoryStore::default();
        let engine = GeometryEngine::new(&store);
        assert!(engine
            .classify_with(Point3::default(), ClassificationMode::Nearest)
            .is_none());
    }

    #[test]
    fn test_nearest_rejects_non_finite_point() {
        let store = left_right();
        let engine = GeometryEngine::new(&store);
        for point in [
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(0.0, f64::INFINITY, 0.0),
            Point3::new(5.0, 0.0, f64::NEG_INFINITY),
        ] {
            assert!(engine
                .classify_with(point, ClassificationMode::Nearest)
                .is_none());
            assert!(engine.classify(point).is_none());
        }
    }

    #[test]
    fn test_engine_center_lookup() {
        let store = left_right();
        let engine = GeometryEngine::new(&store);
        assert_eq!(engine.center("left").unwrap(), Point3::new(-5.5, 0.0, 0.0));
        assert_eq!(engine.center("right").unwrap(), Point3::new(5.5, 0.0, 0.0));
        assert!(engine.center("up").is_err());
        assert_eq!(engine.centers().count(), 2);
    }

    #[test]
    fn test_box_vertices_edges_faces() {
        let c = cat("c", (0.0, 1.0), (0.0, 2.0), (0.0, 3.0));
        let b = CategoryBox::of(&c);
        assert_eq!(b.vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(b.vertices[6], Point3::new(1.0, 2.0, 3.0));
        assert_eq!(b.edges().count(), 12);
        assert_eq!(b.faces().count(), 6);
        for (a, z) in b.edges() {
            let differing = Axis::ALL.iter().filter(|&&ax| a.get(ax) != z.get(ax)).count();
            assert_eq!(differing, 1, "edge {} -> {} is not axis-aligned", a, z);
        }
    }

    #[test]
    fn test_projection() {
        let store = left_right();
        let engine = GeometryEngine::new(&store);
        let projections = engine.project(Axis::Economic, Axis::Authority);
        assert_eq!(projections.len(), 2);
        let left = &projections[0];
        assert_eq!(left.key, "left");
        assert_eq!(left.origin, (-10.0, -10.0));
        assert_eq!(left.width, 9.0);
        assert_eq!(left.height, 20.0);
        assert_eq!(left.center, (-5.5, 0.0));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "first-match".parse::<ClassificationMode>().unwrap(),
            ClassificationMode::FirstMatch
        );
        assert_eq!(
            "nearest".parse::<ClassificationMode>().unwrap(),
            ClassificationMode::Nearest
        );
        assert!("random".parse::<ClassificationMode>().is_err());
    }
}
