//! Survey submissions: identifiers and social-class labels.
//!
//! Storage of submissions is left to the caller.

use std::fmt;

use chrono::{Local, Utc};
use serde::Serialize;

/// Format of the human-readable submission timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Class label derived from a self-reported income tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialClass {
    WorkingClass,
    MiddleClass,
    CapitalistClass,
    Unknown,
}

impl SocialClass {
    /// `low`, `middle` and `high` map to a class; anything else is `Unknown`
    pub fn from_income(income: &str) -> Self {
        match income {
            "low" => Self::WorkingClass,
            "middle" => Self::MiddleClass,
            "high" => Self::CapitalistClass,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkingClass => "working_class",
            Self::MiddleClass => "middle_class",
            Self::CapitalistClass => "capitalist_class",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SocialClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issues millisecond-timestamp ids that strictly increase.
///
/// When the clock has not advanced past the previous id (or went backwards),
/// the previous id plus one is issued instead.
#[derive(Debug, Default)]
pub struct SubmissionIdGenerator {
    last: Option<i64>,
}

impl SubmissionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    /// Issue an id given the current time in epoch milliseconds
    pub fn next_id_at(&mut self, now_millis: i64) -> i64 {
        let id = match self.last {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last = Some(id);
        id
    }
}

/// An accepted survey submission
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub ip: String,
    pub province: String,
    pub name: String,
    pub social_class: SocialClass,
    pub timestamp: String,
}

impl Submission {
    pub fn new(
        ids: &mut SubmissionIdGenerator,
        ip: impl Into<String>,
        province: impl Into<String>,
        name: impl Into<String>,
        income: &str,
    ) -> Self {
        Self {
            id: ids.next_id(),
            ip: ip.into(),
            province: province.into(),
            name: name.into(),
            social_class: SocialClass::from_income(income),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
