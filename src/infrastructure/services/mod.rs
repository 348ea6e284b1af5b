//! Infrastructure services

mod api_keys_query;
mod create_api_key_mutation;

pub use api_keys_query::{ApiKeysQuery, ApiKeysWatch};
pub use create_api_key_mutation::{CreateApiKeyMutation, MutationCallbacks};
