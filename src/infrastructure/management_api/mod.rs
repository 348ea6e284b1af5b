//! Management API client
//!
//! HTTP access to the project API key endpoints of the platform management
//! API. Error responses and transport failures are both normalized into
//! `DomainError::Request`.

mod client;
mod error;

pub use client::{ManagementApiClient, ManagementApiConfig};
pub use error::ErrorPayload;
