use api_key_console::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List(args) => cli::list::run(args).await,
        Command::Create(args) => cli::create::run(args).await,
    }
}
