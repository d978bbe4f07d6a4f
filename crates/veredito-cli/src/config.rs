//! Command-line and environment configuration.
//!
//! Every reasoning-service setting can come from a flag or an environment
//! variable; `main` loads a `.env` file first so the API key can live there.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use veredito_ai::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiReasoner, ProtocolOptions};

#[derive(Debug, Parser)]
#[command(
    name = "veredito",
    version,
    about = "Checks judicial processes against the credit-purchase policies"
)]
pub struct Cli {
    /// JSON file overriding the built-in policy corpus.
    #[arg(long, env = "VEREDITO_POLICIES", global = true)]
    pub policies: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service (POST /verificar, GET /health).
    Serve {
        #[arg(long, env = "VEREDITO_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,

        #[command(flatten)]
        reasoner: ReasonerArgs,
    },
    /// Evaluate the process (or array of processes) in a JSON file.
    Check {
        path: PathBuf,

        /// Print decisions as JSON instead of cards.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        reasoner: ReasonerArgs,
    },
    /// Print the policy corpus exactly as it is embedded in prompts.
    Policies,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Default verbosity when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: tracing::Level,

    /// Emit newline-delimited JSON logs.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Args)]
pub struct ReasonerArgs {
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "VEREDITO_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "VEREDITO_REASONER_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "VEREDITO_TEMPERATURE", default_value_t = 0.1, value_parser = parse_temperature)]
    pub temperature: f32,

    /// Upper bound on simultaneous reasoning-service calls.
    #[arg(long, env = "VEREDITO_MAX_CONCURRENCY", default_value_t = 4, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_concurrency: u64,

    #[arg(long, env = "VEREDITO_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Extra attempts after a transport failure.
    #[arg(long, env = "VEREDITO_TRANSPORT_RETRIES", default_value_t = 1)]
    pub transport_retries: u32,
}

impl ReasonerArgs {
    pub fn options(&self) -> ProtocolOptions {
        ProtocolOptions {
            temperature: self.temperature,
            max_concurrency: usize::try_from(self.max_concurrency).unwrap_or(usize::MAX),
            timeout: Duration::from_secs(self.timeout_secs),
            transport_retries: self.transport_retries,
        }
    }

    pub fn reasoner(&self) -> GeminiReasoner {
        GeminiReasoner::new(
            self.base_url.clone(),
            self.model.clone(),
            self.api_key.clone(),
        )
    }
}

fn parse_temperature(s: &str) -> Result<f32, String> {
    let t: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=2.0).contains(&t) {
        Ok(t)
    } else {
        Err(format!("temperature must be between 0.0 and 2.0, got {t}"))
    }
}
