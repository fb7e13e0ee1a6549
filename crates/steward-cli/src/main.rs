mod cli;
mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use steward_cli::config::loader::load_config;
use steward_cli::observability::init_tracing_with_level;
use steward_cli::state::{load_gateway, save_gateway};
use steward_core::Lifecycle;
use steward_core::resources::{PolicyAdapter, ResourceSetAdapter};
use steward_gateway::{DynGateway, TracedGateway};

use cli::{Cli, KindArg};
use output::{describe_error, print_error};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&describe_error(&e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();
    let cfg = load_config(cli.config.as_deref()).map_err(anyhow::Error::msg)?;
    init_tracing_with_level(&cfg.logging.level);

    let Some(kind) = cli.command.kind() else {
        return commands::config::show(&cfg, cli.config.as_deref());
    };

    let state_file = &cfg.gateway.state_file;
    let gateway = Arc::new(TracedGateway::new(load_gateway(
        state_file,
        cfg.gateway.options(),
    )?));
    let shared: DynGateway = gateway.clone();
    let settings = cfg.reconcile.clone();

    let outcome = match kind {
        KindArg::Policy => {
            let lifecycle = Lifecycle::with_settings(shared, PolicyAdapter, settings);
            commands::crud::run(&lifecycle, &cli.command, format).await
        }
        KindArg::ResourceSet => {
            let lifecycle = Lifecycle::with_settings(shared, ResourceSetAdapter, settings);
            commands::crud::run(&lifecycle, &cli.command, format).await
        }
    };

    // Failed creates may have compensated, so state is saved either way.
    if cli.command.is_mutating() {
        let saved = save_gateway(state_file, gateway.inner());
        return outcome.and(saved);
    }
    outcome
}
