mod cli;
mod commands;
mod observability;
mod output;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use authproxy_client::{CancellationToken, SettingsOverrides, SharedConfig, load_settings};
use authproxy_core::Diagnostics;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    observability::init_tracing_with_level("warn");
    match run().await {
        Ok(diagnostics) if !diagnostics.has_error() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            print_error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<Diagnostics> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    if let Commands::Apply(args) = &cli.command
        && args.dry_run
    {
        return commands::apply::dry_run(args, format);
    }

    let overrides = SettingsOverrides {
        endpoint: cli.endpoint.clone(),
        username: cli.username.clone(),
        password: cli.password.clone(),
    };
    let settings =
        load_settings(cli.config.as_deref(), &overrides).context("Failed to load settings")?;
    observability::apply_logging_level(&settings.logging.level);
    let shared = make_shared(&settings)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling in-flight request");
            on_interrupt.cancel();
        }
    });

    match &cli.command {
        Commands::Tenant(args) => {
            commands::tenant::run(shared, &cancel, &args.command, format).await
        }
        Commands::Role(args) => commands::role::run(shared, &cancel, &args.command, format).await,
        Commands::Apply(args) => commands::apply::apply(shared, &cancel, args, format).await,
    }
}

fn make_shared(settings: &authproxy_client::ProviderSettings) -> Result<Arc<SharedConfig>> {
    Ok(SharedConfig::from_settings(settings)
        .context("Invalid admin API settings")?
        .into_shared())
}
