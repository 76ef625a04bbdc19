//! # labeldeck: label printer operator console
//!
//! Composition root that wires the adapters together and runs the console.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialise tracing (stderr, so logs do not mix with the rendered panels)
//! - Construct the HTTP client (driven adapter) and the application core
//! - Start the renderer and the poller, then hand stdin to the console loop
//! - Stop the poller on `quit`, end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use labeldeck_adapter_http_reqwest::HttpPrinterApi;
use labeldeck_adapter_terminal::{ConsoleInput, render};
use labeldeck_app::dashboard::Dashboard;
use labeldeck_app::dispatcher::CommandDispatcher;
use labeldeck_app::poller::Poller;
use labeldeck_app::ports::SystemClock;
use labeldeck_app::refresher::Refresher;

use crate::config::Config;
use crate::console::Session;

/// Operator console for a networked label printer service.
#[derive(Debug, Parser)]
#[command(name = "labeldeck", version, about)]
struct Args {
    /// Configuration file (defaults to `labeldeck.toml` when present).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Printer service origin, overrides the configuration.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config =
        Config::load(args.config.as_deref(), args.base_url).context("cannot load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let api = Arc::new(
        HttpPrinterApi::new(config.backend.clone()).context("cannot build HTTP client")?,
    );
    tracing::info!(base_url = api.base_url(), "labeldeck starting");

    let dashboard = Dashboard::with_form(config.banner_lifetime(), config.print_form());
    let refresher = Refresher::new(Arc::clone(&api), dashboard.clone());
    let dispatcher = Arc::new(CommandDispatcher::new(
        refresher.clone(),
        SystemClock,
        config.dispatcher_config(),
    ));

    let renderer = tokio::spawn(render::run(dashboard.subscribe()));

    let mut session = Session {
        dispatcher,
        poller: Poller::new(refresher, config.poll_interval()),
        input: ConsoleInput::stdin(),
    };
    session.poller.startup();
    session.run().await;

    renderer.abort();
    tracing::info!("labeldeck stopped");
    Ok(())
}
