use clap::{Args, Parser, Subcommand};
use painel::cli;
use painel::config::PainelConfig;
use painel::error::PainelResult;
use painel::logging::init_tracing;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "painel")]
#[command(about = "Sales/shipment indicators dashboard from an Excel workbook.")]
#[command(long_about = "Painel - Indicators dashboard from an Excel workbook
Totals, per-city stacked bars and a monthly volume trend.

COMMANDS:
  report  - Print totals and the per-city table
  html    - Write the dashboard page to a file
  export  - Write the report to Excel (.xlsx)
  cities  - List the cities available to the filter
  trend   - Print the monthly series in calendar order
  watch   - Regenerate the page whenever the workbook changes

PROFILES:
  bbt   - BASE/COMP sheets, notes counted (default)
  habi  - HABI/COMP sheets, notes summed, per-inhabitant total

EXAMPLES:
  painel report                                  # All cities
  painel report -c Recife -c Olinda              # Two cities
  painel html painel.html --workbook dados.xlsx
  painel export resumo.xlsx --profile habi
  painel watch painel.html

Serve the interactive page with painel-server.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the data comes from and which cities are selected
#[derive(Args)]
struct Source {
    /// YAML configuration file (workbook, logo and a full profile)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in profile: bbt or habi
    #[arg(short, long)]
    profile: Option<String>,

    /// Workbook path (default: "PAINEL DE CONTROLE - BBT V3.xlsx")
    #[arg(short, long)]
    workbook: Option<PathBuf>,

    /// Banner image path (default: BBT.png)
    #[arg(long)]
    logo: Option<PathBuf>,

    /// City to include (repeatable); all cities when omitted
    #[arg(short = 'c', long = "city")]
    cities: Vec<String>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Source {
    fn resolve(&self) -> PainelResult<PainelConfig> {
        PainelConfig::resolve(
            self.config.as_deref(),
            self.profile.as_deref(),
            self.workbook.clone(),
            self.logo.clone(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print totals and the per-city table
    Report {
        #[command(flatten)]
        source: Source,
    },

    #[command(long_about = "Write the dashboard page to a self-contained HTML file.

The page has the header, logo banner, the metric callouts, the stacked
per-city bar chart and the monthly trend line. The sidebar shows the
selection used; it is read-only in the file (use painel-server for the
interactive filter).

EXAMPLE:
  painel html painel.html -c Recife")]
    /// Write the dashboard page to a file
    Html {
        /// Output HTML file
        output: PathBuf,

        #[command(flatten)]
        source: Source,
    },

    #[command(long_about = "Export the computed report to Excel .xlsx format.

Worksheets:
  Resumo   - totals (raw and formatted), selected cities, profile
  Cidades  - per-city weight and notes
  Mensal   - monthly volume in calendar order

EXAMPLE:
  painel export resumo.xlsx --profile habi")]
    /// Export the report to Excel (.xlsx)
    Export {
        /// Output Excel file (.xlsx)
        output: PathBuf,

        #[command(flatten)]
        source: Source,
    },

    /// List the cities available to the filter
    Cities {
        #[command(flatten)]
        source: Source,
    },

    /// Print the monthly series in calendar order
    Trend {
        #[command(flatten)]
        source: Source,
    },

    #[command(long_about = "Watch the workbook and regenerate the dashboard page on save.

Changes are debounced (200ms) so a single save from a spreadsheet
application triggers one rebuild. Cached sheets are dropped on every
change before the workbook is read again.

Press Ctrl+C to stop.")]
    /// Regenerate the page whenever the workbook changes
    Watch {
        /// Output HTML file
        output: PathBuf,

        #[command(flatten)]
        source: Source,
    },
}

fn main() -> PainelResult<()> {
    let cli = Cli::parse();
    init_tracing("painel=warn");

    match cli.command {
        Commands::Report { source } => {
            let config = source.resolve()?;
            cli::report(&config, source.cities, source.verbose)
        }

        Commands::Html { output, source } => {
            let config = source.resolve()?;
            cli::html(&config, source.cities, output, source.verbose)
        }

        Commands::Export { output, source } => {
            let config = source.resolve()?;
            cli::export(&config, source.cities, output, source.verbose)
        }

        Commands::Cities { source } => cli::cities(&source.resolve()?),

        Commands::Trend { source } => {
            let config = source.resolve()?;
            cli::trend(&config, source.verbose)
        }

        Commands::Watch { output, source } => {
            let config = source.resolve()?;
            cli::watch(&config, source.cities, output, source.verbose)
        }
    }
}
