//! Painel server binary
//!
//! Serves the interactive dashboard page and the JSON report API.

use std::path::PathBuf;

use clap::Parser;
use painel::api::{run_api_server, ApiConfig};
use painel::config::PainelConfig;
use painel::logging::{init_tracing, DEFAULT_FILTER};

#[derive(Parser, Debug)]
#[command(name = "painel-server")]
#[command(version)]
#[command(about = "Painel Server - interactive indicators dashboard over HTTP")]
#[command(long_about = r#"
Painel Server - interactive indicators dashboard

Pages:
  - GET  /                 - Dashboard (?cidade=X&cidade=Y to filter)
  - GET  /logo             - Banner image

JSON endpoints:
  - GET  /api/v1/report    - Totals, per-city groups and trend
  - GET  /api/v1/cities    - Cities available to the filter
  - GET  /health           - Health check
  - GET  /version          - Server version and active profile

Features:
  - Workbook sheets cached per process, reloaded when the file changes
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - Tracing and structured logging (RUST_LOG)

Example usage:
  painel-server                               # Start on localhost:8080
  painel-server --host 0.0.0.0 --port 3000
  painel-server --profile habi --workbook dados.xlsx

  curl 'http://localhost:8080/api/v1/report?cidade=Recife'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PAINEL_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "PAINEL_PORT")]
    port: u16,

    /// YAML configuration file
    #[arg(long, env = "PAINEL_CONFIG")]
    config: Option<PathBuf>,

    /// Built-in profile: bbt or habi
    #[arg(long)]
    profile: Option<String>,

    /// Workbook path
    #[arg(short, long)]
    workbook: Option<PathBuf>,

    /// Banner image path
    #[arg(long)]
    logo: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(DEFAULT_FILTER);

    let painel = PainelConfig::resolve(
        args.config.as_deref(),
        args.profile.as_deref(),
        args.workbook,
        args.logo,
    )?;

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config, painel).await
}
