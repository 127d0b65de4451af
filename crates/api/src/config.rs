//! Server configuration loaded from environment variables.
//!
//! Assembled once at process start and passed by `Arc` into handlers
//! and background tasks; nothing else reads the environment.

/// Deployment mode. Drives the signature-verification boot guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_env() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("production") => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }
}

/// Slack credentials. All optional: absent bot token/channel means
/// "notifications disabled", absent signing secret is only tolerated
/// outside production.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: Option<String>,
    pub channel_id: Option<String>,
    pub signing_secret: Option<String>,
}

/// External HR directory settings.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    /// Hours between scheduled sync runs.
    pub sync_interval_hours: u64,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deployment mode from `APP_ENV` (default: development).
    pub env: AppEnv,
    pub slack: SlackConfig,
    pub directory: DirectoryConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `APP_ENV`                | `development`           |
    /// | `SLACK_BOT_TOKEN`        | unset                   |
    /// | `SLACK_CHANNEL_ID`       | unset                   |
    /// | `SLACK_SIGNING_SECRET`   | unset                   |
    /// | `DIRECTORY_BASE_URL`     | unset                   |
    /// | `DIRECTORY_ACCESS_TOKEN` | unset                   |
    /// | `DIRECTORY_SYNC_HOURS`   | `24`                    |
    ///
    /// Panics when `APP_ENV=production` and no Slack signing secret is
    /// configured: serving production traffic with webhook signature
    /// verification disabled is a misconfiguration, not a mode.
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

        let env = AppEnv::from_env();

        let slack = SlackConfig {
            bot_token: env_opt("SLACK_BOT_TOKEN"),
            channel_id: env_opt("SLACK_CHANNEL_ID"),
            signing_secret: env_opt("SLACK_SIGNING_SECRET"),
        };

        let directory = DirectoryConfig {
            base_url: env_opt("DIRECTORY_BASE_URL"),
            access_token: env_opt("DIRECTORY_ACCESS_TOKEN"),
            sync_interval_hours: std::env::var("DIRECTORY_SYNC_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse()
                .expect("DIRECTORY_SYNC_HOURS must be a valid u64"),
        };

        if env == AppEnv::Production && slack.signing_secret.is_none() {
            panic!(
                "Refusing to start: APP_ENV=production requires SLACK_SIGNING_SECRET \
                 (webhook signature verification must not be disabled in production)"
            );
        }

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            env,
            slack,
            directory,
        }
    }

    /// Whether unverified webhook requests may be accepted.
    /// Only true in development, and only meaningful without a secret.
    pub fn allow_unverified_webhooks(&self) -> bool {
        self.env == AppEnv::Development
    }
}

/// Read an env var, mapping unset and empty both to `None`.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
