use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use glance_core::handoff::OverlayRequest;
use glance_core::secret::Credentials;
use glance_core::session::Mode;
use glance_infrastructure::config_service::ConfigService;
use glance_infrastructure::paths::GlancePaths;
use glance_infrastructure::secret_service::SecretServiceImpl;
use url::Url;

mod host;
mod logging;
mod render;
mod repl;
mod surface;

use host::Host;

/// Load target the terminal panel is mounted under.
const PANEL_URL: &str = "glance://panel/chat";

#[derive(Parser)]
#[command(name = "glance")]
#[command(about = "Glance - explain selected text with a language model", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text to explain; opens a panel right away
    question: Vec<String>,

    /// Answer length: short or long
    #[arg(short, long, default_value_t = Mode::Long)]
    mode: Mode,

    /// Overlay handoff query, e.g. "q=hyponatremia&mode=short"
    #[arg(long, conflicts_with = "question")]
    query: Option<String>,

    /// Configuration directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the API key and project id
    Configure {
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        project_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = cli.config_dir.as_deref();

    let logs_dir = GlancePaths::new(base).logs_dir()?;
    let _log_guard = logging::init_logging(&logs_dir)?;

    let secrets = SecretServiceImpl::new(base)?;
    let config_service = ConfigService::new(base)?;

    if let Some(Commands::Configure {
        api_key,
        project_id,
    }) = cli.command
    {
        secrets.save(&Credentials::new(api_key, project_id))?;
        config_service.ensure_config_file()?;
        println!(
            "{}",
            format!("Credentials saved to {}", secrets.path().display()).bright_green()
        );
        return Ok(());
    }

    let config = config_service
        .get_config()
        .with_context(|| format!("Invalid config at {}", config_service.path().display()))?;
    tracing::info!(model = %config.completion.model, "Glance starting");

    let panel_url = Url::parse(PANEL_URL)?;
    let mut host = Host::new(config, secrets, panel_url);

    let initial = match cli.query {
        Some(query) => Some(OverlayRequest::from_query(&query)?),
        None if !cli.question.is_empty() => {
            Some(OverlayRequest::new(cli.question.join(" "), cli.mode))
        }
        None => None,
    };
    if let Some(request) = initial {
        host.open(&request.question, request.mode).await?;
    }

    repl::run(&mut host).await
}
