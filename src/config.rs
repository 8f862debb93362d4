//! Service configuration read from the environment.
//!
//! Settings are grouped by the part of the service they drive:
//!
//! | Group | Variables |
//! |---|---|
//! | server | `LISTEN` (`0.0.0.0:3000`), `RUST_LOG` (`info`), `LOG_FORMAT` (`text`\|`json`), `BEHIND_PROXY` |
//! | auth | `TOKEN_SIGNING_SECRET` (required) |
//! | [`DatabaseConfig`] | `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`; `DB_MAX_CONNECTIONS` (10), `DB_CONNECT_TIMEOUT` (30), `DB_IDLE_TIMEOUT` (600), `DB_MAX_LIFETIME` (1800) |
//! | cache | `REDIS_URL`, or `REDIS_HOST`/`REDIS_PORT`/`REDIS_PASSWORD`/`REDIS_DB`; caching is off when neither is set |
//! | [`FeedConfig`] | `PUBLIC_BASE_URL` (`http://localhost:3000`), `FEED_CACHE_TTL_SECONDS` (300) |
//! | [`AggregatorConfig`] | `AGGREGATOR_ENDPOINT` (dry-run when unset), `AGGREGATOR_TIMEOUT_SECONDS` (30) |
//!
//! Blank variables count as unset. A numeric variable that is set but does
//! not parse is an error rather than a silent fallback to the default.
//!
//! Binaries load `.env` with `dotenvy` before calling [`load_from_env`].

use anyhow::{Context, Result, bail};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// PostgreSQL connection and pool sizing.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// How long to wait for a pooled connection.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Reads the database group; shared by the server and the admin CLI.
    ///
    /// # Errors
    ///
    /// Fails when neither `DATABASE_URL` nor the `DB_USER`/`DB_PASSWORD`/`DB_NAME`
    /// components are set, or when a pool setting is not a number.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: database_url()?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            connect_timeout: seconds_var("DB_CONNECT_TIMEOUT", 30)?,
            idle_timeout: seconds_var("DB_IDLE_TIMEOUT", 600)?,
            max_lifetime: seconds_var("DB_MAX_LIFETIME", 1800)?,
        })
    }

    /// Pool options carrying these limits; call `.connect(&self.url)` on the result.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

/// How feeds are addressed and cached.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Origin that item links point at, without a trailing slash.
    pub public_base_url: String,
    /// Lifetime of the cached public feed; ignored without Redis.
    pub cache_ttl_seconds: u64,
}

/// Where single-release feeds are submitted.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// `None` selects the dry-run submitter.
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Take client IPs from `X-Forwarded-For` / `X-Real-IP` when rate limiting.
    /// Only safe behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// HMAC key for API token hashes.
    pub token_signing_secret: String,
    pub database: DatabaseConfig,
    pub redis_url: Option<String>,
    pub feed: FeedConfig,
    pub aggregator: AggregatorConfig,
}

impl Config {
    /// Reads every group from the environment without validating values.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or a typed one does not parse.
    pub fn from_env() -> Result<Self> {
        let database = DatabaseConfig::from_env().context("Invalid database configuration")?;

        let public_base_url = var("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            listen_addr: var("LISTEN").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            log_level: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: parse_var("LOG_FORMAT", LogFormat::Text)?,
            behind_proxy: flag_var("BEHIND_PROXY"),
            token_signing_secret: var("TOKEN_SIGNING_SECRET")
                .context("TOKEN_SIGNING_SECRET must be set")?,
            database,
            redis_url: redis_url(),
            feed: FeedConfig {
                public_base_url,
                cache_ttl_seconds: parse_var("FEED_CACHE_TTL_SECONDS", 300)?,
            },
            aggregator: AggregatorConfig {
                endpoint: var("AGGREGATOR_ENDPOINT"),
                timeout: seconds_var("AGGREGATOR_TIMEOUT_SECONDS", 30)?,
            },
        })
    }

    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            bail!("LISTEN must be 'host:port', got '{}'", self.listen_addr);
        }

        if !has_scheme(&self.database.url, &["postgres", "postgresql"]) {
            bail!(
                "DATABASE_URL must be a postgres:// or postgresql:// URL, got '{}'",
                mask_credentials(&self.database.url)
            );
        }
        if self.database.max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.database.connect_timeout.is_zero() {
            bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        if let Some(redis_url) = &self.redis_url
            && !has_scheme(redis_url, &["redis", "rediss"])
        {
            bail!(
                "REDIS_URL must be a redis:// or rediss:// URL, got '{}'",
                mask_credentials(redis_url)
            );
        }

        if !has_scheme(&self.feed.public_base_url, &["http", "https"]) {
            bail!(
                "PUBLIC_BASE_URL must be an http(s) URL, got '{}'",
                self.feed.public_base_url
            );
        }
        if self.feed.cache_ttl_seconds == 0 {
            bail!("FEED_CACHE_TTL_SECONDS must be greater than 0");
        }

        if let Some(endpoint) = &self.aggregator.endpoint
            && !has_scheme(endpoint, &["http", "https"])
        {
            bail!("AGGREGATOR_ENDPOINT must be an http(s) URL, got '{endpoint}'");
        }
        if self.aggregator.timeout.is_zero() {
            bail!("AGGREGATOR_TIMEOUT_SECONDS must be greater than 0");
        }

        if self.token_signing_secret.is_empty() {
            bail!("TOKEN_SIGNING_SECRET must not be empty");
        }

        Ok(())
    }

    /// Logs the effective configuration with credentials masked.
    pub fn print_summary(&self) {
        tracing::info!(
            listen = %self.listen_addr,
            log_level = %self.log_level,
            log_format = %self.log_format,
            behind_proxy = self.behind_proxy,
            "Server configuration"
        );
        tracing::info!(
            url = %mask_credentials(&self.database.url),
            max_connections = self.database.max_connections,
            "Database configuration"
        );

        match &self.redis_url {
            Some(url) => tracing::info!(url = %mask_credentials(url), "Feed cache: redis"),
            None => tracing::info!("Feed cache: disabled"),
        }

        tracing::info!(
            public_base_url = %self.feed.public_base_url,
            cache_ttl_seconds = self.feed.cache_ttl_seconds,
            "Feed configuration"
        );

        match &self.aggregator.endpoint {
            Some(endpoint) => tracing::info!(
                endpoint = %mask_credentials(endpoint),
                timeout_seconds = self.aggregator.timeout.as_secs(),
                "Aggregator submission enabled"
            ),
            None => tracing::info!("Aggregator not configured, submissions are dry runs"),
        }
    }
}

/// Reads and validates the whole configuration.
///
/// # Errors
///
/// Returns an error if a variable is missing, malformed or fails validation.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

/// Non-blank value of `name`.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} is invalid: {e}")),
        None => Ok(default),
    }
}

fn seconds_var(name: &str, default: u64) -> Result<Duration> {
    parse_var(name, default).map(Duration::from_secs)
}

fn flag_var(name: &str) -> bool {
    var(name).is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

/// `DATABASE_URL`, else a URL assembled from the `DB_*` components.
fn database_url() -> Result<String> {
    if let Some(url) = var("DATABASE_URL") {
        return Ok(url);
    }

    let required = |name: &str| {
        var(name).with_context(|| format!("{name} must be set when DATABASE_URL is not"))
    };
    let user = required("DB_USER")?;
    let password = required("DB_PASSWORD")?;
    let name = required("DB_NAME")?;
    let host = var("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = var("DB_PORT").unwrap_or_else(|| "5432".to_string());

    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}

/// `REDIS_URL`, else a URL assembled from `REDIS_HOST` and friends, else `None`.
fn redis_url() -> Option<String> {
    if let Some(url) = var("REDIS_URL") {
        return Some(url);
    }

    let host = var("REDIS_HOST")?;
    let port = var("REDIS_PORT").unwrap_or_else(|| "6379".to_string());
    let db = var("REDIS_DB").unwrap_or_else(|| "0".to_string());

    Some(match var("REDIS_PASSWORD") {
        Some(password) => format!("redis://:{password}@{host}:{port}/{db}"),
        None => format!("redis://{host}:{port}/{db}"),
    })
}

fn has_scheme(value: &str, schemes: &[&str]) -> bool {
    url::Url::parse(value).is_ok_and(|u| schemes.contains(&u.scheme()) && u.has_host())
}

/// Replaces the password of a URL with `***` for logging.
fn mask_credentials(value: &str) -> String {
    match url::Url::parse(value) {
        Ok(mut parsed) if parsed.password().is_some() => {
            // Only fails for URLs that cannot carry credentials.
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => value.to_string(),
    }
}
