use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use songkey::config::{
    Credentials, ProviderConfig, DEFAULT_API_URL, DEFAULT_REQUESTS_PER_SECOND,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_URL,
};
use songkey::{FallbackCatalog, MetadataClient, SongKeyResolver};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "songkey",
    version,
    about = "Answer questions like \"What's the key of Let It Be by The Beatles?\""
)]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ProviderArgs {
    /// Metadata provider client id
    #[arg(long, env = "SONGKEY_CLIENT_ID", hide_env_values = true, global = true)]
    client_id: Option<String>,

    /// Metadata provider client secret
    #[arg(long, env = "SONGKEY_CLIENT_SECRET", hide_env_values = true, global = true)]
    client_secret: Option<String>,

    /// Token endpoint for client-credential authentication
    #[arg(long, env = "SONGKEY_TOKEN_URL", default_value = DEFAULT_TOKEN_URL, global = true)]
    token_url: String,

    /// Base URL of the provider's catalog API
    #[arg(long, env = "SONGKEY_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Give up on a provider request after this many seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Maximum provider requests per second
    #[arg(long, default_value_t = DEFAULT_REQUESTS_PER_SECOND, global = true)]
    requests_per_second: u32,
}

impl ProviderArgs {
    fn into_config(self) -> ProviderConfig {
        ProviderConfig {
            credentials: Credentials::from_parts(self.client_id, self.client_secret),
            token_url: self.token_url,
            api_url: self.api_url,
            timeout: Duration::from_secs(self.timeout_secs),
            requests_per_second: self.requests_per_second,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer a single question and exit
    Ask {
        /// The question, e.g. what's the key of Hey Jude by The Beatles?
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Serve the HTTP endpoint
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
    /// List the songs known to the local fallback catalog
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_logging(cli.verbose)?;

    let catalog = FallbackCatalog::new();

    match cli.command {
        Command::Catalog => {
            for entry in catalog.entries() {
                println!("{:<24} {:<10} {}", entry.title, entry.key, entry.artist);
            }
            Ok(())
        }
        Command::Ask { question } => {
            let client = MetadataClient::new(cli.provider.into_config())?;
            let resolver = SongKeyResolver::new(client, catalog);

            let question = question.join(" ");
            match resolver.answer(Some(&question)).await {
                Ok(sentence) => {
                    println!("{}", sentence);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("Query rejected: {}", e);
                    anyhow::bail!(e.public_message())
                }
            }
        }
        Command::Serve { bind } => {
            let client = MetadataClient::new(cli.provider.into_config())?;
            let resolver = Arc::new(SongKeyResolver::new(client, catalog));
            songkey::server::run(resolver, bind).await
        }
    }
}

/// File-based logging under the data directory; stdout stays reserved for answers
fn init_logging(verbose: bool) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = songkey::paths::get_log_dir()?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "songkey.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = verbose.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songkey=debug,reqwest=warn,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(stderr_layer)
        .init();

    Ok(guard)
}
