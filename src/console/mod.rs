//! API keys console
//!
//! Screen-level models for the secret keys section: the key list table and
//! the creation form, wired to the shared query and mutation services.

pub mod create_secret_key_form;
pub mod secret_keys_table;
mod state;

pub use create_secret_key_form::{
    rls_bypass_warning, FormErrors, RlsBypassWarning, SecretKeyForm, SecretKeyFormValues,
    SubmitError,
};
pub use secret_keys_table::{
    ConsoleGates, CreateAction, EmptyState, SecretKeyRow, SecretKeysTable, TableBody,
};
pub use state::ConsoleState;
