//! Create command - creates a key and prints the refreshed table

use std::sync::Arc;

use clap::Args;
use tracing::debug;

use crate::console::{ConsoleGates, ConsoleState, SecretKeyForm, SubmitError};
use crate::domain::api_key::{ApiKeyRecord, ApiKeyType, CreateApiKeyRequest, CreateApiKeyVariables};
use crate::domain::notification::{Notification, Notifier};
use crate::domain::project::ProjectRef;
use crate::infrastructure::services::MutationCallbacks;
use crate::infrastructure::ConsoleNotifier;

/// Arguments for the create command
#[derive(Args, Clone)]
pub struct CreateArgs {
    /// Project reference
    #[arg(long)]
    pub project: ProjectRef,

    /// Key type
    #[arg(long = "type", default_value = "secret")]
    pub key_type: ApiKeyType,

    /// Postgres role for RLS (secret keys only, defaults to service_role)
    #[arg(long)]
    pub role: Option<String>,

    /// What the key is used for
    #[arg(long)]
    pub description: Option<String>,
}

/// Create a key, then print the project's secret keys
pub async fn run(args: CreateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new());
    let state = crate::create_console_state(&config, notifier.clone())?;

    let created = match args.key_type {
        ApiKeyType::Secret => create_secret(&state, &args, notifier).await?,
        ApiKeyType::Publishable => create_publishable(&state, &args, notifier).await?,
    };
    debug!("Created key {} ({})", created.id(), created.api_key());

    let table = state
        .secret_keys_table(&args.project, ConsoleGates::default())
        .await?;
    print!("{}", table);

    Ok(())
}

async fn create_secret(
    state: &ConsoleState,
    args: &CreateArgs,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<ApiKeyRecord> {
    let mut form = SecretKeyForm::new();
    if let Some(role) = &args.role {
        form.set_role(role.as_str());
    }
    if let Some(description) = &args.description {
        form.set_description(description.as_str());
    }

    if let Some(warning) = form.rls_warning() {
        eprintln!("{}: {}", warning.title, warning.message);
    }

    let callbacks = MutationCallbacks::new().on_success(move |record, _| {
        notifier.notify(Notification::success(format!(
            "Created secret API key {}",
            record.id()
        )));
    });

    match form.submit(&args.project, &state.create_api_key, callbacks).await {
        Ok(record) => Ok(record),
        Err(SubmitError::Validation(errors)) => {
            for (field, messages) in errors.fields() {
                for message in messages {
                    eprintln!("{}: {}", field, message);
                }
            }
            anyhow::bail!("Invalid secret key form")
        }
        Err(SubmitError::Request(e)) => Err(e.into()),
    }
}

async fn create_publishable(
    state: &ConsoleState,
    args: &CreateArgs,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<ApiKeyRecord> {
    if args.role.is_some() {
        eprintln!("Ignoring --role: publishable keys carry no role");
    }

    let request = CreateApiKeyRequest::publishable(args.description.as_deref().unwrap_or(""));
    let variables = CreateApiKeyVariables::new(args.project.clone(), request);

    let callbacks = MutationCallbacks::new().on_success(move |record, _| {
        notifier.notify(Notification::success(format!(
            "Created publishable API key {}",
            record.id()
        )));
    });

    Ok(state.create_api_key.mutate_with(variables, callbacks).await?)
}
