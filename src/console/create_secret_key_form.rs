//! Create secret API key form
//!
//! Holds the two inputs of the creation dialog, validates them and hands a
//! packaged request to the create mutation. The form performs no request of
//! its own and keeps no network state.

use std::borrow::Cow;
use std::collections::BTreeMap;

use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::api_key::{
    bypasses_row_level_security, validate_role, ApiKeyRecord, CreateApiKeyRequest,
    CreateApiKeyVariables, RoleValidationError, SERVICE_ROLE,
};
use crate::domain::project::ProjectRef;
use crate::domain::DomainError;
use crate::infrastructure::services::{CreateApiKeyMutation, MutationCallbacks};

pub const DIALOG_TITLE: &str = "Create new secret API key";
pub const DIALOG_DESCRIPTION: &str = "Secret API keys are used to authorize requests to your project from servers, functions, workers or other backend components of your application. Keep them secret, don't publish them online and don't check them in source code.";
pub const ROLE_LABEL: &str = "Postgres Role for RLS";
pub const ROLE_HELP: &str = "API calls to your project will use this Postgres role to authorize requests.";
pub const DESCRIPTION_LABEL: &str = "Description";
pub const DESCRIPTION_HELP: &str = "Provide a description about what this key is used for.";
pub const DESCRIPTION_PLACEHOLDER: &str = "(Optional)";
pub const SUBMIT_LABEL: &str = "Create API key";

/// Non-dismissable warning shown while the role bypasses row-level security
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RlsBypassWarning {
    pub title: &'static str,
    pub message: &'static str,
}

impl RlsBypassWarning {
    pub const SERVICE_ROLE: Self = Self {
        title: "Row-Level Security Bypass",
        message: "Using service_role will bypass all RLS policies on your project. Use with care!",
    };
}

/// Warning for the current role value, if any.
///
/// A pure function of the input; callers re-evaluate it on every change.
pub fn rls_bypass_warning(role: &str) -> Option<RlsBypassWarning> {
    bypasses_row_level_security(role).then_some(RlsBypassWarning::SERVICE_ROLE)
}

/// Form schema, shared by validation and submission
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SecretKeyFormValues {
    #[validate(custom(function = "validate_role_field"))]
    pub role: String,
    pub description: String,
}

impl Default for SecretKeyFormValues {
    fn default() -> Self {
        Self {
            role: SERVICE_ROLE.to_string(),
            description: String::new(),
        }
    }
}

impl SecretKeyFormValues {
    fn trimmed(&self) -> Self {
        Self {
            role: self.role.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

fn validate_role_field(role: &str) -> Result<(), ValidationError> {
    validate_role(role).map_err(|e| {
        let code = match e {
            RoleValidationError::Empty => "required",
            RoleValidationError::TooLong(_) => "length",
        };
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Owned(e.to_string()));
        error
    })
}

/// Field-level validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn clear_field(&mut self, name: &str) {
        self.0.remove(name);
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }

        Self(fields)
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;

        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }

        Ok(())
    }
}

/// Why a submission did not produce a key
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Blocked before reaching the network
    #[error("Invalid form: {0}")]
    Validation(FormErrors),

    #[error(transparent)]
    Request(#[from] DomainError),
}

/// State of the create-secret-key dialog
#[derive(Debug, Clone, Default)]
pub struct SecretKeyForm {
    values: SecretKeyFormValues,
    errors: FormErrors,
}

impl SecretKeyForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &SecretKeyFormValues {
        &self.values
    }

    pub fn role(&self) -> &str {
        &self.values.role
    }

    pub fn description(&self) -> &str {
        &self.values.description
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.values.role = role.into();
        self.errors.clear_field("role");
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.values.description = description.into();
        self.errors.clear_field("description");
    }

    /// Errors recorded by the last failed submission
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn rls_warning(&self) -> Option<RlsBypassWarning> {
        rls_bypass_warning(&self.values.role)
    }

    /// Validate the current values, returning them trimmed
    pub fn validate(&self) -> Result<SecretKeyFormValues, FormErrors> {
        let values = self.values.trimmed();
        values.validate().map_err(FormErrors::from)?;
        Ok(values)
    }

    /// Package the current values into a create request
    pub fn to_request(&self) -> Result<CreateApiKeyRequest, FormErrors> {
        let values = self.validate()?;
        Ok(CreateApiKeyRequest::secret(
            &values.description,
            Some(&values.role),
        ))
    }

    /// Validate and hand the request to `mutation`.
    ///
    /// Validation failures are stored on the form and never reach the
    /// network. Request failures are reported by the mutation.
    pub async fn submit(
        &mut self,
        project: &ProjectRef,
        mutation: &CreateApiKeyMutation,
        callbacks: MutationCallbacks,
    ) -> Result<ApiKeyRecord, SubmitError> {
        let request = match self.to_request() {
            Ok(request) => request,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(SubmitError::Validation(errors));
            }
        };

        self.errors = FormErrors::default();

        let variables = CreateApiKeyVariables::new(project.clone(), request);
        Ok(mutation.mutate_with(variables, callbacks).await?)
    }
}
