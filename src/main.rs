use std::rc::Rc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::ledger::LedgerClient;
use commands::{Console, Flow};
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr so they never interleave with the screen
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ledger_console=info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("📒 Starting ledger console...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let client = LedgerClient::new(config.api_url.clone(), config.api_key.clone());
    info!("Using ledger service at {}", client.base_url());

    let local = LocalSet::new();
    local.run_until(run(client, config)).await;

    info!("Ledger console stopped");
}

async fn run(client: LedgerClient, config: Config) {
    let base_url = client.base_url().to_string();
    let mut console = Console::new(Rc::new(client), &base_url, config.credentials());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", console.render());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                match console.handle_line(&line).await {
                    Flow::Print(output) => println!("{}", output),
                    Flow::Quit => break,
                    Flow::Nothing => {}
                }
            }
            Some(event) = console.next_event() => {
                if console.apply(event) {
                    println!("{}", console.render());
                } else {
                    debug!("Background update did not change the screen");
                }
            }
        }
    }

    debug!("Waiting for requests still in flight");
    console.settle().await;
}
