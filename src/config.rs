//! Runtime settings read from the process environment.
//!
//! Everything is read once in [`load_from_env`] and checked before any
//! connection is opened.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | built from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` |
//! | `LISTEN` | `0.0.0.0:$PORT`, or `0.0.0.0:3000` |
//! | `BASE_URL` | `http://localhost:3000` |
//! | `RUST_LOG` | `info` |
//! | `LOG_FORMAT` | `text` (`text` or `json`) |
//! | `CORS_ALLOWED_ORIGINS` | `*` (comma-separated) |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_CONNECT_TIMEOUT`, `DB_IDLE_TIMEOUT`, `DB_MAX_LIFETIME` | `30`, `600`, `1800` seconds |

use anyhow::{Context, Result, anyhow, bail, ensure};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
        }
    }
}

/// Connection pool limits.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PoolConfig {
    fn from_env() -> Self {
        Self {
            max_connections: parsed_var("DB_MAX_CONNECTIONS", 10),
            acquire_timeout: seconds_var("DB_CONNECT_TIMEOUT", 30),
            idle_timeout: seconds_var("DB_IDLE_TIMEOUT", 600),
            max_lifetime: seconds_var("DB_MAX_LIFETIME", 1800),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// `host:port` the HTTP listener binds to.
    pub listen_addr: String,
    /// Public origin short links are served from, without the code.
    pub base_url: String,
    /// `EnvFilter` directive, e.g. `info` or `tinylink=debug,sqlx=warn`.
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Browser origins allowed to call the API. Empty or `*` means any.
    pub cors_allowed_origins: Vec<String>,
    pub pool: PoolConfig,
}

impl Config {
    /// Reads every setting from the environment.
    ///
    /// # Errors
    ///
    /// Fails if neither `DATABASE_URL` nor the `DB_*` parts are available,
    /// or if `LOG_FORMAT` is not recognised.
    pub fn from_env() -> Result<Self> {
        let database_url = database_url().context("Database settings are incomplete")?;

        let cors_allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(raw) => split_list(&raw),
            Err(_) => vec!["*".to_string()],
        };

        Ok(Self {
            database_url,
            listen_addr: listen_addr(),
            base_url: var_or("BASE_URL", "http://localhost:3000"),
            log_filter: var_or("RUST_LOG", "info"),
            log_format: var_or("LOG_FORMAT", "text").parse()?,
            cors_allowed_origins,
            pool: PoolConfig::from_env(),
        })
    }

    /// Rejects settings the server could not start with.
    ///
    /// # Errors
    ///
    /// Returns the first problem found among the listen address, database
    /// URL scheme, base URL and pool limits.
    pub fn validate(&self) -> Result<()> {
        let port = self
            .listen_addr
            .rsplit_once(':')
            .map(|(_, port)| port.parse::<u16>());
        ensure!(
            matches!(port, Some(Ok(_))),
            "LISTEN must be 'host:port', got '{}'",
            self.listen_addr
        );

        let db = Url::parse(&self.database_url).context("DATABASE_URL is not a valid URL")?;
        ensure!(
            matches!(db.scheme(), "postgres" | "postgresql"),
            "DATABASE_URL must use the postgres:// or postgresql:// scheme, got '{}'",
            redact(&self.database_url)
        );

        let base = Url::parse(&self.base_url)
            .with_context(|| format!("BASE_URL is not a valid URL: '{}'", self.base_url))?;
        ensure!(
            matches!(base.scheme(), "http" | "https"),
            "BASE_URL must be an http or https URL, got '{}'",
            self.base_url
        );

        ensure!(
            self.pool.max_connections > 0,
            "DB_MAX_CONNECTIONS must be at least 1"
        );
        ensure!(
            !self.pool.acquire_timeout.is_zero(),
            "DB_CONNECT_TIMEOUT must be positive"
        );

        Ok(())
    }

    /// Logs the effective settings with credentials masked.
    pub fn log_summary(&self) {
        tracing::info!(
            listen = %self.listen_addr,
            base_url = %self.base_url,
            database = %redact(&self.database_url),
            pool_size = self.pool.max_connections,
            log_filter = %self.log_filter,
            log_format = ?self.log_format,
            cors = %self.cors_allowed_origins.join(","),
            "Configuration loaded"
        );
    }
}

/// `DATABASE_URL` if set, otherwise a URL assembled from the `DB_*` parts.
///
/// The user, password and database name are percent-encoded, so they may
/// contain URL delimiters such as `@`, `/`, `?` or `#`.
fn database_url() -> Result<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    let required = |key: &str| {
        env::var(key).with_context(|| format!("{key} is required when DATABASE_URL is unset"))
    };

    let user = required("DB_USER")?;
    let password = required("DB_PASSWORD")?;
    let name = required("DB_NAME")?;
    let host = var_or("DB_HOST", "localhost");
    let port = var_or("DB_PORT", "5432");

    let mut url = Url::parse(&format!("postgres://{host}:{port}/"))
        .with_context(|| format!("DB_HOST and DB_PORT do not form an address: '{host}:{port}'"))?;
    url.set_username(&user)
        .map_err(|()| anyhow!("DB_USER cannot be set on '{host}:{port}'"))?;
    url.set_password(Some(&password))
        .map_err(|()| anyhow!("DB_PASSWORD cannot be set on '{host}:{port}'"))?;
    url.path_segments_mut()
        .map_err(|()| anyhow!("DB_NAME cannot be set on '{host}:{port}'"))?
        .pop_if_empty()
        .push(&name);

    Ok(url.into())
}

fn listen_addr() -> String {
    env::var("LISTEN").unwrap_or_else(|_| {
        let port = var_or("PORT", "3000");
        format!("0.0.0.0:{port}")
    })
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset or unparsable values fall back to `default`.
fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn seconds_var(key: &str, default: u64) -> Duration {
    Duration::from_secs(parsed_var(key, default))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Replaces the password of a connection URL with `***`.
fn redact(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparsable>".to_string(),
    }
}

/// Reads and validates configuration.
///
/// Expects `.env` to have been loaded already, see `main.rs`.
///
/// # Errors
///
/// Returns an error if required variables are missing or a check fails.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
