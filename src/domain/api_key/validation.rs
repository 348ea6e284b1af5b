//! Role binding rules for secret keys

use thiserror::Error;

/// Privileged role that skips row-level security on every request
pub const SERVICE_ROLE: &str = "service_role";

/// Postgres identifiers are truncated past 63 bytes
pub const MAX_ROLE_LENGTH: usize = 63;

/// Errors that can occur during role validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoleValidationError {
    #[error("Role cannot be empty")]
    Empty,

    #[error("Role exceeds maximum length of {0} characters")]
    TooLong(usize),
}

/// Whether a key bound to `role` bypasses row-level security.
///
/// Surrounding whitespace is ignored, matching how the role is sent.
pub fn bypasses_row_level_security(role: &str) -> bool {
    role.trim() == SERVICE_ROLE
}

/// Validate a role binding
///
/// Rules:
/// - Cannot be empty after trimming
/// - Maximum 63 characters after trimming
pub fn validate_role(role: &str) -> Result<(), RoleValidationError> {
    let role = role.trim();

    if role.is_empty() {
        return Err(RoleValidationError::Empty);
    }

    if role.chars().count() > MAX_ROLE_LENGTH {
        return Err(RoleValidationError::TooLong(MAX_ROLE_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_role_bypasses_rls() {
        assert!(bypasses_row_level_security("service_role"));
        assert!(bypasses_row_level_security("  service_role "));
        assert!(bypasses_row_level_security("service_role\n"));
    }

    #[test]
    fn test_other_roles_do_not_bypass_rls() {
        let roles = ["authenticated", "anon", "service_role_2", "Service_Role", "service role", ""];
        for role in roles {
            assert!(!bypasses_row_level_security(role), "{role:?}");
        }
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("authenticated").is_ok());
        assert!(validate_role(" service_role ").is_ok());
        assert_eq!(validate_role(""), Err(RoleValidationError::Empty));
        assert_eq!(validate_role("   "), Err(RoleValidationError::Empty));
        assert_eq!(
            validate_role(&"r".repeat(64)),
            Err(RoleValidationError::TooLong(MAX_ROLE_LENGTH))
        );
        assert!(validate_role(&"r".repeat(63)).is_ok());
    }
}
