//! Search Gateway - Entry Point

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use search_gateway::config::{AwsCredentials, BackendKind, CloudSearchConfig, Config, defaults};
use search_gateway::server::GatewayServer;

#[derive(Parser, Debug)]
#[command(name = "search-gateway")]
#[command(about = "HTTP gateway for gist search and GitHub OAuth code exchange")]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = defaults::BIND_ADDR, env = "BIND_ADDR")]
    bind: SocketAddr,

    /// GitHub OAuth application client id
    #[arg(long, default_value = "", env = "GITHUB_APPLICATION_CLIENT_ID")]
    client_id: String,

    /// GitHub OAuth application client secret
    #[arg(long, default_value = "", env = "GITHUB_APPLICATION_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// OAuth code exchange endpoint
    #[arg(long, default_value = defaults::OAUTH_TOKEN_URL, env = "GITHUB_OAUTH_TOKEN_URL")]
    oauth_token_url: String,

    /// Search backend: service or cloudsearch
    #[arg(long, value_enum, default_value = "service", env = "SEARCH_BACKEND")]
    backend: BackendKind,

    /// Base URL of the search/submission service
    #[arg(long, default_value = defaults::SEARCH_SERVICE_URL, env = "SEARCH_SERVICE_URL")]
    search_service_url: String,

    /// CloudSearch search endpoint (cloudsearch backend)
    #[arg(long, env = "CLOUDSEARCH_SEARCH_ENDPOINT")]
    cloudsearch_search_endpoint: Option<String>,

    /// CloudSearch document endpoint (cloudsearch backend)
    #[arg(long, env = "CLOUDSEARCH_DOCUMENT_ENDPOINT")]
    cloudsearch_document_endpoint: Option<String>,

    /// AWS region of the CloudSearch domain
    #[arg(long, default_value = defaults::AWS_REGION, env = "AWS_REGION")]
    region: String,

    /// Directory of generated static assets
    #[arg(long, default_value = defaults::STATIC_DIR, env = "STATIC_DIR")]
    static_dir: PathBuf,

    /// Directory holding github_callback.html
    #[arg(long, default_value = defaults::TEMPLATE_DIR, env = "TEMPLATE_DIR")]
    template_dir: PathBuf,

    /// Retries for transient search failures (0 disables)
    #[arg(long, default_value_t = defaults::MAX_RETRIES, env = "UPSTREAM_MAX_RETRIES")]
    max_retries: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = Config {
            bind_addr: self.bind,
            oauth_token_url: self.oauth_token_url,
            search_service_url: self.search_service_url,
            static_dir: self.static_dir,
            template_dir: self.template_dir,
            max_retries: self.max_retries,
            ..Config::new(self.client_id, self.client_secret)
        };

        if self.backend == BackendKind::Cloudsearch {
            let (Some(search_endpoint), Some(document_endpoint)) =
                (self.cloudsearch_search_endpoint, self.cloudsearch_document_endpoint)
            else {
                anyhow::bail!(
                    "cloudsearch backend requires CLOUDSEARCH_SEARCH_ENDPOINT and CLOUDSEARCH_DOCUMENT_ENDPOINT"
                );
            };
            config = config.with_cloudsearch(CloudSearchConfig {
                search_endpoint,
                document_endpoint,
                region: self.region,
                credentials: AwsCredentials::from_env()?,
            });
        }

        Ok(config)
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let config = cli.into_config()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend,
        "Starting search gateway"
    );
    tracing::info!(
        client_id = %config.github_client_id,
        client_secret_len = config.github_client_secret.len(),
        "GitHub OAuth application"
    );
    if !config.has_client_secret() {
        tracing::warn!("GITHUB_APPLICATION_CLIENT_SECRET is not set; code exchange will fail");
    }

    let server = GatewayServer::new(&config)?;
    server.run(config.bind_addr).await
}
