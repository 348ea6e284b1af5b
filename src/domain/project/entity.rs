//! Project reference type

use serde::{Deserialize, Serialize};

use super::validation::{validate_project_ref, ProjectValidationError};

/// Project reference - the scope every API key and cached list belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectRef(String);

impl ProjectRef {
    /// Create a new ProjectRef after validation
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectValidationError> {
        let value = value.into();
        validate_project_ref(&value)?;
        Ok(Self(value))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectRef {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectRef> for String {
    fn from(project: ProjectRef) -> Self {
        project.0
    }
}

impl std::str::FromStr for ProjectRef {
    type Err = ProjectValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_ref_valid() {
        let project = ProjectRef::new("abcdefghijklmnopqrst").unwrap();
        assert_eq!(project.as_str(), "abcdefghijklmnopqrst");
        assert_eq!(project.to_string(), "abcdefghijklmnopqrst");
    }

    #[test]
    fn test_project_ref_invalid() {
        assert!(ProjectRef::new("").is_err());
        assert!(ProjectRef::new("UPPER").is_err());
        assert!("has space".parse::<ProjectRef>().is_err());
    }

    #[test]
    fn test_project_ref_serde() {
        let project: ProjectRef = serde_json::from_str("\"my-project\"").unwrap();
        assert_eq!(project.as_str(), "my-project");
        assert_eq!(serde_json::to_string(&project).unwrap(), "\"my-project\"");

        let invalid: Result<ProjectRef, _> = serde_json::from_str("\"Bad Ref\"");
        assert!(invalid.is_err());
    }
}
