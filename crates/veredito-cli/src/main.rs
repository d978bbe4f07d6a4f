mod check;
mod config;
mod display;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use veredito_ai::DecisionProtocol;
use veredito_core::PolicyCorpus;

use config::{Cli, Command, ReasonerArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init_tracing(cli.logging.log_json, cli.logging.log_level);
    info!("veredito v{}", env!("CARGO_PKG_VERSION"));

    let corpus = PolicyCorpus::load(cli.policies.as_deref()).context("loading policy corpus")?;

    match cli.command {
        Command::Serve { bind, reasoner } => {
            server::serve(bind, protocol(corpus, &reasoner)).await
        }
        Command::Check {
            path,
            json,
            reasoner,
        } => check::run(&path, json, &protocol(corpus, &reasoner)).await,
        Command::Policies => {
            println!("{}", corpus.render_as_text());
            Ok(())
        }
    }
}

fn protocol(corpus: PolicyCorpus, args: &ReasonerArgs) -> DecisionProtocol {
    let protocol =
        DecisionProtocol::new(Arc::new(corpus), Arc::new(args.reasoner()), args.options());
    let options = protocol.options();
    info!(
        model = %args.model,
        url = %args.base_url,
        temperature = options.temperature,
        max_concurrency = options.max_concurrency,
        timeout_secs = options.timeout.as_secs(),
        transport_retries = options.transport_retries,
        "reasoning service configured"
    );
    protocol
}
