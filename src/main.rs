//! Entry point for the `markethub-i18n` command.

use std::process::ExitCode;

use clap::Parser;
use markethub_i18n::cli::{
    self,
    Cli,
    Outcome,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(writer)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli::run(cli, &mut stdout).await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::ProblemsFound) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(%err, "Command failed");
            ExitCode::from(2)
        }
    }
}
