use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{HttpSessionApi, SessionController};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{dispatch, parse_command, ConsoleCommand, HELP};
use render::EventPrinter;

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the team-management training simulation")]
struct Args {
    /// Base URL of the session API.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    log_filter: Option<String>,
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)?;
    if let Some(raw) = &args.server_url {
        settings.server_url = config::parse_server_url(raw)?;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    if let Some(filter) = args.log_filter {
        settings.log_filter = filter;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(server_url = %settings.server_url, "console: starting");
    let api = HttpSessionApi::with_timeout(
        settings.server_url.clone(),
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let controller = SessionController::new(Arc::new(api));

    let mut events = BroadcastStream::new(controller.subscribe_events());
    let printer = tokio::spawn(async move {
        let mut printer = EventPrinter::default();
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    if let Some(text) = printer.render(&event) {
                        println!("{text}");
                    }
                }
                Err(err) => warn!("console: dropped events: {err}"),
            }
        }
    });

    println!("{HELP}");
    let mut in_flight = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        // Reap finished remote commands so the set stays small.
        while in_flight.try_join_next().is_some() {}
        let Some(command) = parse_command(&line) else {
            continue;
        };
        match command {
            ConsoleCommand::Start | ConsoleCommand::Refresh | ConsoleCommand::Submit(_) => {
                let controller = Arc::clone(&controller);
                in_flight.spawn(async move {
                    let _ = dispatch(&controller, command).await;
                });
            }
            other => {
                if dispatch(&controller, other).await.is_break() {
                    break;
                }
            }
        }
    }

    // Teardown drops any response still in flight, so aborting is safe.
    controller.teardown().await;
    in_flight.shutdown().await;
    printer.abort();
    Ok(())
}
