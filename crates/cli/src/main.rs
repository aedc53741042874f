//! commercetools metrics CLI - aggregate report totals.
//!
//! # Usage
//!
//! ```bash
//! # Anonymous carts for the default reporting week
//! ct-metrics run --mode ANONYMOUS_CART
//!
//! # First-time buyers over a custom range, as JSON
//! ct-metrics run --mode first-time-buyers \
//!     --from 2026-03-01T00:00:00Z --to 2026-03-08T00:00:00Z --format json
//!
//! # List report modes
//! ct-metrics modes
//! ```
//!
//! # Commands
//!
//! - `run` - Compute one report total (mode also read from `MODE`)
//! - `modes` - List supported modes and how each is evaluated
//!
//! Connection settings come from the `CT_*` environment variables, see
//! `ct_metrics_reporter::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use ct_metrics_core::MetricMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::report::OutputFormat;

/// Start of the default reporting week.
const DEFAULT_FROM: &str = "2026-02-02T00:00:00.000Z";
/// End of the default reporting week.
const DEFAULT_TO: &str = "2026-02-08T23:59:00.000Z";

#[derive(Parser)]
#[command(name = "ct-metrics")]
#[command(author, version, about = "commercetools metrics reporter")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the total for one report mode over a date range
    Run {
        /// Report mode (e.g. `CART_TOTAL`, `first-time-buyers`)
        #[arg(short, long, env = "MODE")]
        mode: MetricMode,

        /// Range start (RFC 3339, inclusive)
        #[arg(long, env = "REPORT_FROM", default_value = DEFAULT_FROM)]
        from: DateTime<Utc>,

        /// Range end (RFC 3339, exclusive)
        #[arg(long, env = "REPORT_TO", default_value = DEFAULT_TO)]
        to: DateTime<Utc>,

        /// Output format for the total
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List supported report modes
    Modes,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env before parsing so MODE and REPORT_* can come from it
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Install the global subscriber. Logs go to stderr so stdout carries only the report.
fn init_tracing(json: bool) {
    // Defaults to info level if RUST_LOG is not set
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run {
            mode,
            from,
            to,
            format,
        } => commands::report::run(mode, from, to, format).await?,
        Commands::Modes => commands::modes::list(),
    }
    Ok(())
}
