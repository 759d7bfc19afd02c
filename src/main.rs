use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use rostrum::agent::AgentName;
use rostrum::client::HttpInferenceClient;
use rostrum::config::{DebateSettings, DEFAULT_ROUNDS};
use rostrum::orchestrator::{DebateOrchestrator, DebateOutcome};
use rostrum::server;
use rostrum::transcript::Phase;

/// Topic used when none is given on the command line.
const DEFAULT_TOPIC: &str =
    "Does 'The Grand Inquisitor' claim that freedom is a burden rather than a gift?";

#[derive(Parser)]
#[command(name = "rostrum", about = "Moderated two-debater LLM debate orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a debate in the terminal and print a summary of the transcript.
    Run {
        /// Number of debate rounds.
        #[arg(long, default_value_t = DEFAULT_ROUNDS)]
        rounds: u32,
        /// Debate topic, as trailing words.
        #[arg(trailing_var_arg = true)]
        topic: Vec<String>,
    },
    /// Serve the streaming debate API over HTTP/SSE.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run { rounds, topic } => {
            let topic = if topic.is_empty() {
                DEFAULT_TOPIC.to_string()
            } else {
                topic.join(" ")
            };
            let mut settings = DebateSettings::from_env()?;
            settings.rounds = rounds;
            info!(
                a = %settings.agent_a.base_url,
                b = %settings.agent_b.base_url,
                mediator = %settings.mediator.base_url,
                "agent endpoints configured"
            );

            let orchestrator = DebateOrchestrator::new(settings, HttpInferenceClient::new());
            let outcome = orchestrator.run(&topic).await?;
            print_summary(&outcome);
        }
        Command::Serve { port } => {
            let settings = DebateSettings::from_env()?;
            let orchestrator = Arc::new(DebateOrchestrator::new(
                settings,
                HttpInferenceClient::new(),
            ));
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            server::serve(addr, orchestrator).await?;
        }
    }
    Ok(())
}

fn print_summary(outcome: &DebateOutcome) {
    println!("Debate complete.");
    println!("Topic: {}", outcome.topic);
    println!("Transcript entries: {}", outcome.transcript.len());
    println!();

    for entry in &outcome.transcript {
        match (entry.role, entry.phase) {
            (AgentName::Mediator, Phase::ModeratorNote | Phase::RoundRecap) => {
                println!("Round {} - Mediator:", entry.round);
                println!("{}", entry.text);
                println!();
            }
            (AgentName::A | AgentName::B, _) => {
                println!("Round {} - Agent {}:", entry.round, entry.role);
                println!("{}", entry.text);
                if !entry.citations.is_empty() {
                    println!("Citations: {}", entry.citations.len());
                }
                println!();
            }
            _ => {}
        }
    }
}
