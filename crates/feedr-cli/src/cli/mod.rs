//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use feedr_core::api::ApiClient;
use feedr_core::config::Config;
use feedr_core::gate::{self, Decision, Route};
use feedr_core::session::SessionStore;
use feedr_core::store::KvStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "feedr")]
#[command(version = "0.1")]
#[command(about = "Command-line client for a feed-reading service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the API base URL from config
    #[arg(long, value_name = "URL", env = "FEEDR_API_URL", global = true)]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in to the feed service (password read from stdin)
    Login {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show the user of the current session
    Whoami,

    /// List aggregated posts from followed feeds
    Posts {
        /// Number of posts per page
        #[arg(long, value_name = "N")]
        page_size: Option<u32>,
    },

    /// Manage feed sources
    Feeds {
        #[command(subcommand)]
        command: FeedCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum FeedCommands {
    /// Register a new feed source
    Add {
        /// RSS feed URL (validated by the server, not locally)
        #[arg(value_name = "URL")]
        url: String,
    },
    /// List registered feed sources
    List {
        /// Number of feeds per page
        #[arg(long, value_name = "N")]
        page_size: Option<u32>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the API base URL in the config file
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;

    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    match cli.command {
        Commands::Login { email } => {
            let mut session = open_session(&config)?;
            commands::auth::login(&mut session, &email).await
        }

        Commands::Logout => {
            let mut session = open_session(&config)?;
            commands::auth::logout(&mut session)
        }

        Commands::Whoami => {
            let session = open_session(&config)?;
            admit(Route::Posts, &session)?;
            commands::auth::whoami(&session)
        }

        Commands::Posts { page_size } => {
            let session = open_session(&config)?;
            admit(Route::Posts, &session)?;
            commands::posts::list(&session, page_size.unwrap_or(config.page_size)).await
        }

        Commands::Feeds { command } => match command {
            FeedCommands::Add { url } => {
                let session = open_session(&config)?;
                admit(Route::Posts, &session)?;
                commands::feeds::add(&session, &url).await
            }
            FeedCommands::List { page_size } => {
                let session = open_session(&config)?;
                commands::feeds::list(&session, page_size.unwrap_or(config.page_size)).await
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}

/// Constructs the session store for this invocation.
///
/// The persistent store doubles as the credential source: the request client
/// re-reads it per call, so login/logout take effect immediately.
fn open_session(config: &Config) -> Result<SessionStore> {
    let store = KvStore::open();
    let api = ApiClient::new(config.base_url()?, Arc::new(store.clone()))?;
    Ok(SessionStore::new(api, store))
}

/// Evaluates the access gate for `route`, turning a redirect into the CLI's
/// version of one: a failure pointing at the login entry point.
fn admit(route: Route, session: &SessionStore) -> Result<()> {
    match gate::evaluate(route, session) {
        Decision::Render(_) => Ok(()),
        Decision::Redirect(to) => {
            tracing::debug!(from = route.path(), to = to.path(), "gate redirected");
            anyhow::bail!(
                "Not logged in (redirected to {}). Run `feedr login --email <EMAIL>` first.",
                to.path()
            )
        }
    }
}
