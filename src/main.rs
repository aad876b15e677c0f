use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tableau_metadata_extractor::cli;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Tableau Metadata Extractor: pulls dashboards, their upstream tables and
/// custom SQL out of the Tableau Metadata API as NDJSON
#[derive(Parser)]
#[command(name = "tabmeta", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// YAML configuration file; TABLEAU_* environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test authorization to a Tableau site
    Auth,

    /// Extract dashboard names, descriptions and URLs
    Dashboards {
        /// NDJSON file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the tables each dashboard reads from
    DashboardTables {
        /// NDJSON file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract file- and connection-backed tables
    ExternalTables {
        /// NDJSON file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the last modification time of each dashboard
    LastModified {
        /// NDJSON file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract custom SQL queries used by dashboards
    Queries {
        /// NDJSON file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // A missing dotenv file is fine: credentials may come from the environment or --config
    let dotenv = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = dotenv {
        log::debug!("Skipping dotenv file {}: {}", cli.env.bright_black(), e);
    }

    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Auth => {
            log::info!("Testing authorization to {}", config.host.bright_black());
            let site_id = cli::test_auth(&config).await?;
            log::info!("✓ Signed in, site id {}", site_id.cyan());
        }
        Commands::Dashboards { output } => {
            log::info!("Extracting {}", "dashboards".cyan());
            cli::extract_dashboards(&config, output.as_deref()).await?;
        }
        Commands::DashboardTables { output } => {
            log::info!("Extracting {}", "dashboard tables".cyan());
            cli::extract_dashboard_tables(&config, output.as_deref()).await?;
        }
        Commands::ExternalTables { output } => {
            log::info!("Extracting {}", "external tables".cyan());
            cli::extract_external_tables(&config, output.as_deref()).await?;
        }
        Commands::LastModified { output } => {
            log::info!("Extracting {}", "last modified timestamps".cyan());
            cli::extract_last_modified(&config, output.as_deref()).await?;
        }
        Commands::Queries { output } => {
            log::info!("Extracting {}", "custom SQL queries".cyan());
            cli::extract_queries(&config, output.as_deref()).await?;
        }
    }

    Ok(())
}
