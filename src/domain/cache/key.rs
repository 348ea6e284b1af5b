//! Query cache keys

use serde::{Deserialize, Serialize};

use crate::domain::project::ProjectRef;

/// Key of one cached query
///
/// Keys are derived from project scope so that a writer and every reader of
/// the same collection arrive at the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    const SEPARATOR: char = ':';

    /// Key of a project's API key list
    pub fn api_keys_list(project: &ProjectRef) -> Self {
        Self::from_parts(&["projects", project.as_str(), "api-keys", "list"])
    }

    fn from_parts(parts: &[&str]) -> Self {
        Self(parts.join(&Self::SEPARATOR.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
