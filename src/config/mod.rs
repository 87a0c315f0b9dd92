use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
    /// Env overrides that could not be applied. Loading runs before the
    /// tracing subscriber exists, so the binary logs these after init.
    #[serde(skip)]
    pub ignored_overrides: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL; always ends with '/' so relative joins keep its path
    pub base_url: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub login_failed_ms: u64,
    pub car_deleted_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub default_filter: String,
}

impl NotificationConfig {
    pub fn login_failed(&self) -> Duration {
        Duration::from_millis(self.login_failed_ms)
    }

    pub fn car_deleted(&self) -> Duration {
        Duration::from_millis(self.car_deleted_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            login_failed_ms: 3000,
            car_deleted_ms: 2000,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("CARSHOP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("CARSHOP_SERVER_URL") {
            self.apply_server_override(&v);
        }

        if let Ok(v) = env::var("CARSHOP_LOGIN_TOAST_MS") {
            if let Some(ms) = self.parse_millis("CARSHOP_LOGIN_TOAST_MS", &v) {
                self.notifications.login_failed_ms = ms;
            }
        }
        if let Ok(v) = env::var("CARSHOP_DELETE_TOAST_MS") {
            if let Some(ms) = self.parse_millis("CARSHOP_DELETE_TOAST_MS", &v) {
                self.notifications.car_deleted_ms = ms;
            }
        }

        if let Ok(v) = env::var("CARSHOP_LOG") {
            if !v.trim().is_empty() {
                self.logging.default_filter = v;
            }
        }

        self
    }

    /// Use `raw` as the server URL, or keep the current one and note why not
    pub fn apply_server_override(&mut self, raw: &str) {
        match normalize_base_url(raw) {
            Ok(url) => self.server.base_url = url,
            Err(e) => self
                .ignored_overrides
                .push(format!("Ignoring CARSHOP_SERVER_URL '{}': {}", raw, e)),
        }
    }

    fn parse_millis(&mut self, name: &str, raw: &str) -> Option<u64> {
        match raw.trim().parse() {
            Ok(ms) => Some(ms),
            Err(e) => {
                self.ignored_overrides
                    .push(format!("Ignoring {} '{}': {}", name, raw, e));
                None
            }
        }
    }

    /// Replace the server URL, e.g. from a `--server` flag
    pub fn with_server_url(mut self, raw: &str) -> Result<Self, url::ParseError> {
        self.server.base_url = normalize_base_url(raw)?;
        Ok(self)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                base_url: default_url("http://localhost:8080/"),
            },
            notifications: NotificationConfig::default(),
            logging: LoggingConfig {
                default_filter: "carshop_client=debug,warn".to_string(),
            },
            ignored_overrides: Vec::new(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                base_url: default_url("https://carshop.example.com/"),
            },
            notifications: NotificationConfig::default(),
            logging: LoggingConfig {
                default_filter: "warn".to_string(),
            },
            ignored_overrides: Vec::new(),
        }
    }
}

/// Parse a base URL and make sure it ends with '/'.
///
/// `Url::join` drops the last path segment of a base without a trailing
/// slash, so `http://host/shop` would otherwise resolve `api/cars` to
/// `http://host/api/cars`.
pub fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_url(raw: &str) -> Url {
    // Presets are compile-time literals
    Url::parse(raw).unwrap_or_else(|_| unreachable!("invalid preset url {raw}"))
}

// Global singleton config - initialized on first access, so after dotenv
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub fn config() -> &'static ClientConfig {
    &CONFIG
}
