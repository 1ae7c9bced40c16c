// Entrypoint for the CLI application.
// - Parses flags, sets up logging, then hands over to the UI.
// - Returns `anyhow::Result` so setup failures are reported with context.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pubmed_sheet::api::{EntrezClient, DEFAULT_BASE_URL};
use pubmed_sheet::config::{default_profile_path, Config};
use pubmed_sheet::ui::{self, Screen};
use pubmed_sheet::Session;

#[derive(Parser, Debug)]
#[command(name = "pubmed-sheet")]
#[command(about = "Collect PubMed articles into an .xlsx spreadsheet")]
#[command(version)]
struct Cli {
    /// Contact email sent to NCBI with each request
    #[arg(long, env = "ENTREZ_EMAIL")]
    email: Option<String>,

    /// NCBI API key (optional, raises the rate limit)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// E-utilities base URL
    #[arg(long, env = "ENTREZ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Name of the sheet (and of the saved file); prompted for when omitted
    #[arg(long)]
    sheet_name: Option<String>,

    /// Save into this directory instead of opening a folder picker
    #[arg(long, env = "PMSHEET_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Do not clear the terminal between steps
    #[arg(long)]
    no_clear: bool,

    /// Log level (trace, debug, info, warn, error)
    /// (`RUST_LOG` takes precedence when set)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            base_url: self.base_url,
            email: self.email,
            api_key: self.api_key,
            sheet_name: self.sheet_name,
            output_dir: self.output_dir,
            clear_screen: !self.no_clear,
            profile_path: default_profile_path(),
        }
    }
}

/// Logs go to stderr so they do not interleave with the prompts.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);
    let config = cli.into_config();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        "starting"
    );

    let screen = Screen::new(config.clear_screen);
    screen.clear()?;
    println!("{}", ui::welcome_message());

    let email = ui::resolve_email(&config, &screen)?;
    let api = EntrezClient::new(&config, email)?;
    tracing::debug!(email = api.email(), "Entrez client ready");
    let sheet = ui::prompt_sheet(&config, &screen)?;
    screen.clear()?;

    // Blocks until the user confirms `exit`.
    ui::main_menu(Session::new(api, sheet), &config, &screen)?;
    Ok(())
}
