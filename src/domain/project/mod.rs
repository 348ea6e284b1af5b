//! Project scope
//!
//! Every API key belongs to exactly one project. The project reference is the
//! scope used to address the management API and to derive cache keys.

mod entity;
mod validation;

pub use entity::ProjectRef;
pub use validation::{validate_project_ref, ProjectValidationError};
