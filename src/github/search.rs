use crate::github::Timespan;
use std::fmt;

/// A GitHub search expression, built from space-separated clauses
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    clauses: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `key:value` clause
    pub fn qualifier(mut self, key: &str, value: &str) -> Self {
        self.clauses.push(format!("{}:{}", key, value));
        self
    }

    /// Add a `field:start..end` date clause
    pub fn date_range(self, field: &str, timespan: &Timespan) -> Self {
        let range = timespan.search_range();
        self.qualifier(field, &range)
    }

    /// Restrict to one repository, if given
    pub fn repo(self, repo: Option<&str>) -> Self {
        match repo {
            Some(repo) if !repo.is_empty() => self.qualifier("repo", repo),
            _ => self,
        }
    }

    /// `type:pr` or `type:issue`
    pub fn item_type(self, kind: &str) -> Self {
        self.qualifier("type", kind)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(" "))
    }
}
