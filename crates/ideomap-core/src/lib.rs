pub mod axis;
pub mod category;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ranking;
pub mod stats;
pub mod submission;

pub use axis::{Axis, AxisRange, AxisRanges, Point3, NOMINAL_LIMIT};
pub use config::Config;
pub use error::{IdeomapError, Result};
pub use geometry::{
    center_of, classify, contains, CategoryBox, ClassificationMode, GeometryEngine, Projection,
};
pub use ranking::{rank, AxisAffinity, MatchScore};
pub use stats::{AxisStats, CategoryStats};
pub use submission::{SocialClass, Submission, SubmissionIdGenerator};

// Category system
pub use category::{Category, CategoryStore, BUILTIN_DEFINITIONS, DEFAULT_DEFINITIONS_FILE};
