// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use clap::Parser;
use tracing::error;

use shopfront::dispatch::ApiClient;
use shopfront::error::ApiError;
use shopfront::session::SessionStore;

mod commands;
mod config;

use config::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);
    let _ = rustls::crypto::ring::default_provider().install_default();

    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_auth_expired) {
                eprintln!("session expired; run `shopfront login`");
                std::process::exit(2);
            }
            error!("fatal: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    match cli.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).init();
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Every invocation rehydrates from the credentials file and exits;
    // long-running embedders of the library run a `SessionWatcher` to
    // track out-of-band changes instead.
    let session = Arc::new(SessionStore::new(Some(cli.credentials_path())));
    let client = ApiClient::new(&cli.api_url, session);
    commands::run(&client, cli.command).await
}
