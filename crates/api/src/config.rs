use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the flat JSON collection files.
    pub data_dir: PathBuf,
    /// Directory holding uploaded submission photos (served as `/images`).
    pub image_dir: PathBuf,
    /// Telegram bot token; the bot (and `/webhook`) is disabled when unset.
    pub bot_token: Option<String>,
    /// Externally reachable base URL, used for the webhook registration and
    /// for forwarding located-product submissions to the catalog endpoint.
    pub public_url: String,
    /// Pending-submission TTL in seconds; `0` disables expiry.
    pub pending_ttl_secs: u64,
    /// Timeout for forwarding a located product to the catalog endpoint.
    pub forward_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATA_DIR`             | `data`                     |
    /// | `IMAGE_DIR`            | `images`                   |
    /// | `BOT_TOKEN`            | unset (bot disabled)       |
    /// | `PUBLIC_URL`           | `http://127.0.0.1:3000`    |
    /// | `PENDING_TTL_SECS`     | `3600` (`0` disables)      |
    /// | `FORWARD_TIMEOUT_SECS` | `10`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));
        let image_dir =
            PathBuf::from(std::env::var("IMAGE_DIR").unwrap_or_else(|_| "images".into()));

        let bot_token = std::env::var("BOT_TOKEN").ok().filter(|t| !t.is_empty());

        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".into())
            .trim_end_matches('/')
            .to_string();

        let pending_ttl_secs: u64 = std::env::var("PENDING_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("PENDING_TTL_SECS must be a valid u64");

        let forward_timeout_secs: u64 = std::env::var("FORWARD_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("FORWARD_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            data_dir,
            image_dir,
            bot_token,
            public_url,
            pending_ttl_secs,
            forward_timeout_secs,
        }
    }

    /// Pending TTL as a duration; `None` when expiry is disabled.
    pub fn pending_ttl(&self) -> Option<Duration> {
        (self.pending_ttl_secs > 0).then(|| Duration::from_secs(self.pending_ttl_secs))
    }

    /// Catalog endpoint located-product submissions are forwarded to.
    pub fn add_product_url(&self) -> String {
        format!("{}/api/add-product", self.public_url)
    }

    /// Webhook URL registered with the Telegram Bot API.
    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.public_url)
    }
}
