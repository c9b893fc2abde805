use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stockdesk::{load_config, Runtime, DEFAULT_CONFIG_PATH};
use stockdesk_a2a::{cards, create_app, serve, A2aClient, AppState, Supervisor};
use stockdesk_models::Domain;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "stockdesk-a2a",
    about = "Serve stockdesk specialists over HTTP, one process per agent"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve a single specialist
    Serve {
        /// Agent id (market_intel, ml_analyst, tech_signal, strategy_trade,
        /// forex, risk, cross_strategy) or domain key
        #[arg(long)]
        agent: Domain,

        /// Defaults to the agent's slot after the configured base port
        #[arg(long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,
    },
    /// Start a server process for every specialist and watch them
    LaunchAll,
    /// Read a running server's card, then send it one question
    Ask {
        /// Server root, e.g. http://localhost:5005
        #[arg(long)]
        url: String,

        /// Question text
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    stockdesk::init_tracing(config.agents.verbose);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
            cancel.cancel();
        });
    }

    match cli.command {
        Command::Serve { agent, port, host } => {
            let port = match port {
                Some(port) => port,
                None => cards::default_port(agent, config.a2a.base_port)?,
            };
            let host = host.unwrap_or_else(|| config.a2a.host.clone());
            let step_timeout = Duration::from_secs(config.agents.step_timeout_seconds);

            let runtime = Runtime::new(config).context("Failed to build agent runtime")?;
            let specialist = Arc::new(runtime.specialist(agent));
            let state = AppState::new(agent, port, specialist, step_timeout);
            info!(
                agent = %state.card.name,
                card = %format!("http://{host}:{port}/.well-known/agent.json"),
                "Starting A2A server"
            );

            serve(&format!("{host}:{port}"), create_app(state), cancel)
                .await
                .map_err(|e| anyhow::anyhow!("A2A server error: {e}"))?;
        }
        Command::LaunchAll => {
            let program = std::env::current_exe().context("Failed to locate own executable")?;
            let mut supervisor = Supervisor::from_config(&config.a2a);
            supervisor
                .launch_all(&program, &config.a2a, &cli.config)
                .await
                .map_err(|e| anyhow::anyhow!("Launch failed: {e}"))?;

            for server in supervisor.servers() {
                info!(
                    agent = %server.name,
                    url = %format!("http://localhost:{}/a2a", server.port),
                    pid = ?server.pid(),
                    "Agent running"
                );
            }
            println!("All agents running. Press Ctrl+C to stop.");

            supervisor.run_until(cancel).await;
            println!("All agents stopped.");
        }
        Command::Ask { url, text } => {
            let timeout = Duration::from_secs(config.agents.step_timeout_seconds);
            let client = A2aClient::new(&url, timeout)?;
            let card = client.discover().await?;
            let skills: Vec<&str> = card.skills.iter().map(|s| s.name.as_str()).collect();
            println!("Agent: {} ({})", card.name, client.base_url());
            println!("Skills: {}", skills.join(", "));

            let reply = client.send(&text).await?;
            println!("\n{}", reply.text());
        }
    }

    Ok(())
}
