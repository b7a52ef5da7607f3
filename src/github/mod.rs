pub mod client;
pub mod collector;
pub mod search;

use crate::error::{Result, StandupError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of developer activity surfaced from GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Commit,
    PullRequest,
    Issue,
    Review,
}

impl ActivityKind {
    /// All kinds, in the order they are collected and reported
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Commit,
        ActivityKind::PullRequest,
        ActivityKind::Issue,
        ActivityKind::Review,
    ];

    /// Plural label used in status lines and error context
    pub fn plural(&self) -> &'static str {
        match self {
            ActivityKind::Commit => "commits",
            ActivityKind::PullRequest => "pull requests",
            ActivityKind::Issue => "issues",
            ActivityKind::Review => "reviews",
        }
    }
}

/// One unit of developer work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    /// owner/name, empty when the API omits it
    pub repository: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Per-kind activity counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub commits: usize,
    pub pull_requests: usize,
    pub issues: usize,
    pub reviews: usize,
}

impl ActivityCounts {
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut counts = Self::default();
        for activity in activities {
            match activity.kind {
                ActivityKind::Commit => counts.commits += 1,
                ActivityKind::PullRequest => counts.pull_requests += 1,
                ActivityKind::Issue => counts.issues += 1,
                ActivityKind::Review => counts.reviews += 1,
            }
        }
        counts
    }
}

impl fmt::Display for ActivityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} commits, {} pull requests, {} issues, {} reviews",
            self.commits, self.pull_requests, self.issues, self.reviews
        )
    }
}

/// Date window for the activity search
#[derive(Debug, Clone)]
pub struct Timespan {
    /// Start date (inclusive)
    pub start: DateTime<Utc>,
    /// End date (inclusive)
    pub end: DateTime<Utc>,
}

impl Timespan {
    /// Create a timespan from days back from now. Zero or negative values are kept as is.
    pub fn days_back(days: i64) -> Result<Self> {
        let end = Utc::now();
        let start = Duration::try_days(days)
            .and_then(|window| end.checked_sub_signed(window))
            .ok_or_else(|| StandupError::config("--days is out of range"))?;
        Ok(Self { start, end })
    }

    /// Search range in `YYYY-MM-DD..YYYY-MM-DD` form
    pub fn search_range(&self) -> String {
        format!(
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
