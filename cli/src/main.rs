//! `olahub-cli` command-line client.
//!
//! Drives the same `SessionManager` and `HubApi` the browser front end uses,
//! with a token file in place of `localStorage`. Every invocation restores
//! the stored session first, then runs one command and prints JSON.


use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use olahub::api::ReqwestTransport;
use olahub::error::TransportError;
use olahub::hub::{CatalogPage, CatalogQuery, DEFAULT_PAGE_SIZE, ItemKind, SortKey};
use olahub::storage::FileTokenStore;
use olahub::{ApiClient, ApiError, ClientConfig, ConfigError, HubApi, SessionError, SessionManager, StorageError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("http client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("{}", describe_api(.0))]
    Api(#[from] ApiError),
    #[error("{}", describe_session(.0))]
    Session(#[from] SessionError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not signed in")]
    NotSignedIn,
}

impl CliError {
    /// Follow-up advice printed under the error, if any.
    fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotSignedIn => Some("run `olahub-cli login` first"),
            Self::Session(SessionError::Api(err)) if err.is_unauthorized() => Some("check the email and password"),
            Self::Api(ApiError::Network(_)) => Some("check --api-url / OLAHUB_API_URL and that the hub is running"),
            _ => None,
        }
    }
}

/// API error text with the server's own message appended when it sent one.
fn describe_api(err: &ApiError) -> String {
    match err.server_message() {
        Some(message) => format!("{err}: {message}"),
        None => err.to_string(),
    }
}

fn describe_session(err: &SessionError) -> String {
    match err {
        SessionError::Api(api) => describe_api(api),
        other => other.to_string(),
    }
}

#[derive(Parser, Debug)]
#[command(name = "olahub-cli", about = "Olahub model and dataset hub CLI")]
struct Cli {
    /// Hub API base address, e.g. `https://hub.example.com/api`.
    #[arg(long, env = "OLAHUB_API_URL")]
    api_url: Option<String>,

    /// Token file; defaults to the platform config dir.
    #[arg(long, env = "OLAHUB_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token.
    Login {
        email: String,
        #[arg(long, env = "OLAHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        username: String,
        email: String,
        #[arg(long, env = "OLAHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Site-wide counters.
    Stats,
    Models(CatalogCommand),
    Datasets(CatalogCommand),
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Subcommand, Debug)]
enum CatalogSubcommand {
    List(ListArgs),
    Trending,
    Show { id: String },
    Star { id: String },
    Unstar { id: String },
    /// Request a download link for one file.
    Download { id: String, file: String },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, short = 'q', default_value = "")]
    search: String,
    #[arg(long, default_value = "downloads", value_parser = parse_sort)]
    sort: SortKey,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: u32,
    /// Task filter; repeat for several.
    #[arg(long = "task")]
    tasks: Vec<String>,
    /// Language filter; repeat for several.
    #[arg(long = "language")]
    languages: Vec<String>,
}

impl From<ListArgs> for CatalogQuery {
    fn from(args: ListArgs) -> Self {
        Self {
            page: args.page.max(1),
            limit: args.limit.max(1),
            search: args.search,
            sort: args.sort,
            tasks: args.tasks,
            languages: args.languages,
        }
    }
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    Show { username: String },
    Models { username: String },
    Datasets { username: String },
    Follow { username: String },
    Unfollow { username: String },
}

fn parse_sort(raw: &str) -> Result<SortKey, String> {
    SortKey::parse(raw).ok_or_else(|| {
        let valid = SortKey::ALL.iter().map(|key| key.as_str()).collect::<Vec<_>>().join(", ");
        format!("unknown sort `{raw}` (expected one of: {valid})")
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        eprintln!("warning: .env not loaded: {err}");
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(hint) = err.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "olahub=debug,olahub_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Environment config with an optional `--api-url` override.
fn resolve_config(api_url: Option<&str>) -> Result<ClientConfig, CliError> {
    config_from(api_url, |key| std::env::var(key).ok())
}

/// With an explicit address only the timeouts come from `lookup`, so a stale
/// `OLAHUB_API_URL` cannot fail a run that overrides it.
fn config_from<F>(api_url: Option<&str>, lookup: F) -> Result<ClientConfig, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    match api_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            let timeouts = ClientConfig::from_lookup(|key| if key == "OLAHUB_API_URL" { None } else { lookup(key) })?
                .timeouts;
            Ok(ClientConfig { timeouts, ..ClientConfig::with_api_url(url)? })
        }
        None => Ok(ClientConfig::from_lookup(lookup)?),
    }
}

fn token_store(path: Option<PathBuf>) -> Result<FileTokenStore, CliError> {
    match path {
        Some(path) => Ok(FileTokenStore::new(path)),
        None => Ok(FileTokenStore::default_location()?),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(cli.api_url.as_deref())?;
    let tokens = token_store(cli.token_file)?;
    tracing::debug!(api_url = %config.api_url, token_file = %tokens.path().display(), "starting");

    let transport = ReqwestTransport::new(config.timeouts)?;
    let client = ApiClient::new(&config, Arc::new(transport), Arc::new(tokens));
    let session = SessionManager::new(client.clone());
    client.on_unauthorized(|event| {
        eprintln!("session expired ({} {}); run `olahub-cli login` to sign in again", event.method, event.path);
    });
    let hub = HubApi::new(client);

    // Logout needs no round trip; everything else starts from the stored session.
    if matches!(cli.command, Command::Logout) {
        session.logout();
        eprintln!("signed out");
        return Ok(());
    }
    session.restore().await;

    match cli.command {
        Command::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            print_json(&json!(user))
        }
        Command::Register { username, email, password } => {
            let user = session.register(&username, &email, &password).await?;
            print_json(&json!(user))
        }
        Command::Logout => Ok(()),
        Command::Whoami => {
            let user = session.current_user().ok_or(CliError::NotSignedIn)?;
            print_json(&json!(user))
        }
        Command::Stats => print_json(&json!(hub.stats().await?)),
        Command::Models(catalog) => run_catalog(&hub, ItemKind::Model, catalog).await,
        Command::Datasets(catalog) => run_catalog(&hub, ItemKind::Dataset, catalog).await,
        Command::Users(users) => run_users(&hub, users).await,
    }
}

async fn run_catalog(hub: &HubApi, kind: ItemKind, catalog: CatalogCommand) -> Result<(), CliError> {
    match catalog.command {
        CatalogSubcommand::List(args) => {
            let query = CatalogQuery::from(args);
            let page = hub.list(kind, &query).await?;
            print_json(&page_json(&query, &page))
        }
        CatalogSubcommand::Trending => print_json(&json!(hub.trending(kind).await?)),
        CatalogSubcommand::Show { id } => print_json(&json!(hub.detail(kind, &id).await?)),
        CatalogSubcommand::Star { id } => {
            hub.star(kind, &id).await?;
            eprintln!("starred {kind} {id}");
            Ok(())
        }
        CatalogSubcommand::Unstar { id } => {
            hub.unstar(kind, &id).await?;
            eprintln!("unstarred {kind} {id}");
            Ok(())
        }
        CatalogSubcommand::Download { id, file } => print_json(&hub.request_download(kind, &id, &file).await?),
    }
}

async fn run_users(hub: &HubApi, users: UsersCommand) -> Result<(), CliError> {
    match users.command {
        UsersSubcommand::Show { username } => print_json(&json!(hub.user_profile(&username).await?)),
        UsersSubcommand::Models { username } => {
            print_json(&json!(hub.user_items(&username, ItemKind::Model).await?))
        }
        UsersSubcommand::Datasets { username } => {
            print_json(&json!(hub.user_items(&username, ItemKind::Dataset).await?))
        }
        UsersSubcommand::Follow { username } => {
            hub.follow(&username).await?;
            eprintln!("following {username}");
            Ok(())
        }
        UsersSubcommand::Unfollow { username } => {
            hub.unfollow(&username).await?;
            eprintln!("unfollowed {username}");
            Ok(())
        }
    }
}

/// One catalog page plus the paging context needed to ask for the next.
fn page_json(query: &CatalogQuery, page: &CatalogPage) -> Value {
    json!({
        "page": query.page,
        "limit": query.limit,
        "pages": query.page_count(page.total),
        "total": page.total,
        "items": page.items,
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
