//! List command - prints the secret keys table

use std::sync::Arc;

use clap::Args;

use crate::console::ConsoleGates;
use crate::domain::project::ProjectRef;
use crate::infrastructure::ConsoleNotifier;

/// Arguments for the list command
#[derive(Args, Clone)]
pub struct ListArgs {
    /// Project reference
    #[arg(long)]
    pub project: ProjectRef,
}

/// Print the secret keys table
pub async fn run(args: ListArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let state = crate::create_console_state(&config, Arc::new(ConsoleNotifier::new()))?;

    let table = state
        .secret_keys_table(&args.project, ConsoleGates::default())
        .await?;
    print!("{}", table);

    Ok(())
}
