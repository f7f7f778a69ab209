//! Configuration for the search gateway.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Upstream and server defaults.
pub mod defaults {
    use std::time::Duration;

    /// Address the gateway listens on.
    pub const BIND_ADDR: &str = "0.0.0.0:8080";

    /// Base URL of the search/submission service.
    pub const SEARCH_SERVICE_URL: &str = "http://localhost:8081";

    /// GitHub OAuth code-for-token exchange endpoint.
    pub const OAUTH_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

    /// Directory of generated front-end assets.
    pub const STATIC_DIR: &str = "generated";

    /// Directory holding `github_callback.html`.
    pub const TEMPLATE_DIR: &str = "templates";

    /// AWS region used when none is configured.
    pub const AWS_REGION: &str = "us-east-1";

    /// Number of results requested from the backend per search.
    pub const SEARCH_PAGE_SIZE: u32 = 30;

    /// Upstream request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Upstream connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Transient-failure retries per search query. Off unless configured.
    pub const MAX_RETRIES: u32 = 0;

    /// Maximum keepalive connections per upstream host.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Name of the cookie carrying the OAuth client id to the front end.
pub const CLIENT_ID_COOKIE: &str = "stemcstudio-github-application-client-id";

/// Which search backend the gateway forwards to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    /// The HTTP search/submission service
    #[default]
    Service,
    /// An AWS CloudSearch domain, addressed directly
    Cloudsearch,
}

impl BackendKind {
    /// Stable lowercase name, as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Cloudsearch => "cloudsearch",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "service" | "sdk" => Ok(Self::Service),
            "cloudsearch" => Ok(Self::Cloudsearch),
            other => anyhow::bail!("unknown search backend '{other}'"),
        }
    }
}

/// AWS credentials used to sign CloudSearch requests.
#[derive(Clone)]
pub struct AwsCredentials {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Create credentials without a session token.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Load credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`,
    /// and optionally `AWS_SESSION_TOKEN`.
    pub fn from_env() -> anyhow::Result<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .context("AWS_ACCESS_KEY_ID environment variable not set")?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .context("AWS_SECRET_ACCESS_KEY environment variable not set")?;
        let session_token = std::env::var("AWS_SESSION_TOKEN").ok();

        Ok(Self { access_key_id, secret_access_key, session_token })
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("has_session_token", &self.session_token.is_some())
            .finish()
    }
}

/// Settings for a CloudSearch domain.
#[derive(Debug, Clone)]
pub struct CloudSearchConfig {
    /// Search endpoint, e.g. `https://search-gists-xyz.us-east-1.cloudsearch.amazonaws.com`.
    pub search_endpoint: String,
    /// Document endpoint, e.g. `https://doc-gists-xyz.us-east-1.cloudsearch.amazonaws.com`.
    pub document_endpoint: String,
    /// AWS region of the domain.
    pub region: String,
    /// Signing credentials.
    pub credentials: AwsCredentials,
}

impl CloudSearchConfig {
    /// Read `CLOUDSEARCH_SEARCH_ENDPOINT`, `CLOUDSEARCH_DOCUMENT_ENDPOINT`,
    /// `AWS_REGION` and the AWS credential variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let search_endpoint = std::env::var("CLOUDSEARCH_SEARCH_ENDPOINT")
            .context("CLOUDSEARCH_SEARCH_ENDPOINT environment variable not set")?;
        let document_endpoint = std::env::var("CLOUDSEARCH_DOCUMENT_ENDPOINT")
            .context("CLOUDSEARCH_DOCUMENT_ENDPOINT environment variable not set")?;
        let region =
            std::env::var("AWS_REGION").unwrap_or_else(|_| defaults::AWS_REGION.to_string());

        Ok(Self { search_endpoint, document_endpoint, region, credentials: AwsCredentials::from_env()? })
    }
}

/// Gateway configuration.
#[derive(Clone)]
pub struct Config {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// GitHub OAuth application client id (sent to browsers as a cookie).
    pub github_client_id: String,

    /// GitHub OAuth application client secret (never leaves the server).
    pub github_client_secret: String,

    /// OAuth token exchange URL (overridable for mock servers).
    pub oauth_token_url: String,

    /// Selected search backend.
    pub backend: BackendKind,

    /// Base URL of the search/submission service.
    pub search_service_url: String,

    /// CloudSearch settings, required when `backend` is `Cloudsearch`.
    pub cloudsearch: Option<CloudSearchConfig>,

    /// Directory of generated static assets.
    pub static_dir: PathBuf,

    /// Directory holding the callback template.
    pub template_dir: PathBuf,

    /// Results requested per search.
    pub search_page_size: u32,

    /// Upstream request timeout.
    pub request_timeout: Duration,

    /// Upstream connection timeout.
    pub connect_timeout: Duration,

    /// Transient-failure retries per search query (0 disables).
    ///
    /// Submissions and code exchanges are always sent once.
    pub max_retries: u32,
}

impl Config {
    /// Create a configuration with the given OAuth application credentials and
    /// defaults for everything else.
    #[must_use]
    pub fn new(github_client_id: impl Into<String>, github_client_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            github_client_id: github_client_id.into(),
            github_client_secret: github_client_secret.into(),
            oauth_token_url: defaults::OAUTH_TOKEN_URL.to_string(),
            backend: BackendKind::Service,
            search_service_url: defaults::SEARCH_SERVICE_URL.to_string(),
            cloudsearch: None,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            template_dir: PathBuf::from(defaults::TEMPLATE_DIR),
            search_page_size: defaults::SEARCH_PAGE_SIZE,
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
            max_retries: defaults::MAX_RETRIES,
        }
    }

    /// Create a test configuration pointing every upstream at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            oauth_token_url: format!("{}/login/oauth/access_token", base_url),
            search_service_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0, // No retries in tests
            ..Self::new("test-client-id", "test-client-secret")
        }
    }

    /// Point the gateway at a CloudSearch domain.
    #[must_use]
    pub fn with_cloudsearch(mut self, cloudsearch: CloudSearchConfig) -> Self {
        self.backend = BackendKind::Cloudsearch;
        self.cloudsearch = Some(cloudsearch);
        self
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is malformed, or if the CloudSearch backend
    /// is selected without its endpoints and credentials.
    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = std::env::var("GITHUB_APPLICATION_CLIENT_ID").unwrap_or_default();
        let client_secret = std::env::var("GITHUB_APPLICATION_CLIENT_SECRET").unwrap_or_default();
        let mut config = Self::new(client_id, client_secret);

        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr.parse().with_context(|| format!("invalid BIND_ADDR '{addr}'"))?;
        }
        if let Ok(url) = std::env::var("GITHUB_OAUTH_TOKEN_URL") {
            config.oauth_token_url = url;
        }
        if let Ok(url) = std::env::var("SEARCH_SERVICE_URL") {
            config.search_service_url = url;
        }
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("TEMPLATE_DIR") {
            config.template_dir = PathBuf::from(dir);
        }
        if let Ok(retries) = std::env::var("UPSTREAM_MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .with_context(|| format!("invalid UPSTREAM_MAX_RETRIES '{retries}'"))?;
        }
        if let Ok(backend) = std::env::var("SEARCH_BACKEND") {
            config.backend = backend.parse()?;
        }
        if config.backend == BackendKind::Cloudsearch {
            config.cloudsearch = Some(CloudSearchConfig::from_env()?);
        }

        Ok(config)
    }

    /// Check if an OAuth client secret is configured.
    #[must_use]
    pub fn has_client_secret(&self) -> bool {
        !self.github_client_secret.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("github_client_id", &self.github_client_id)
            .field("github_client_secret_len", &self.github_client_secret.len())
            .field("oauth_token_url", &self.oauth_token_url)
            .field("backend", &self.backend)
            .field("search_service_url", &self.search_service_url)
            .field("cloudsearch", &self.cloudsearch)
            .field("static_dir", &self.static_dir)
            .field("template_dir", &self.template_dir)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
