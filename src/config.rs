use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use url::Url;

use crate::registration_backend::dispatch::dispatcher::SinkConfig;
use crate::utils::http::HttpTimeouts;

/// Gates whether internal error detail is echoed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    pub fn exposes_error_detail(self) -> bool {
        self == RuntimeMode::Development
    }
}

impl FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            other => Err(format!("unknown runtime mode {:?}", other)),
        }
    }
}

impl Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeMode::Development => f.write_str("development"),
            RuntimeMode::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_host: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    pub pool_size: u32,
    pub port: u16,
    pub mode: RuntimeMode,
    database_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            db_host: try_load(&lookup, "DB_HOST", "localhost")?,
            db_user: try_load(&lookup, "DB_USER", "root")?,
            db_pass: lookup("DB_PASS").unwrap_or_default(),
            db_name: try_load(&lookup, "DB_NAME", "customer_registration")?,
            pool_size: try_load(&lookup, "DB_POOL_SIZE", "10")?,
            port: try_load(&lookup, "PORT", "3000")?,
            mode: try_load(&lookup, "APP_ENV", "development")?,
            database_url: lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()),
        })
    }

    /// `DATABASE_URL` when given, otherwise a MySQL URL composed from the
    /// `DB_*` settings with credentials percent-encoded.
    pub fn database_url(&self) -> Result<String, String> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }

        let mut url = Url::parse("mysql://localhost").map_err(|e| e.to_string())?;
        url.set_host(Some(&self.db_host))
            .map_err(|e| format!("Invalid DB_HOST {:?}: {}", self.db_host, e))?;
        url.set_username(&self.db_user)
            .map_err(|_| "Invalid DB_USER".to_string())?;
        if !self.db_pass.is_empty() {
            url.set_password(Some(&self.db_pass))
                .map_err(|_| "Invalid DB_PASS".to_string())?;
        }
        url.set_path(&self.db_name);

        Ok(url.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub spreadsheet_webhook_url: Option<Url>,
    pub sinks: SinkConfig,
    pub autofill_display: Duration,
    pub http_timeouts: HttpTimeouts,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sinks = SinkConfig {
            registration_api: try_load(&lookup, "SAVE_TO_DATABASE", "true")?,
            spreadsheet: try_load(&lookup, "SAVE_TO_SHEETS", "true")?,
        };

        let api_base: String =
            try_load(&lookup, "REGISTRATION_API_URL", "http://localhost:3000")?;
        let api_base_url = base_url(&api_base)?;

        let spreadsheet_webhook_url = match lookup("SPREADSHEET_WEBHOOK_URL")
            .filter(|u| !u.trim().is_empty())
        {
            Some(raw) => Some(
                Url::parse(raw.trim())
                    .map_err(|e| format!("Invalid SPREADSHEET_WEBHOOK_URL: {}", e))?,
            ),
            None => None,
        };
        let display_ms: u64 = try_load(&lookup, "AUTOFILL_DISPLAY_MS", "2000")?;
        let connect_ms: u64 = try_load(&lookup, "HTTP_CONNECT_TIMEOUT_MS", "5000")?;
        let request_ms: u64 = try_load(&lookup, "HTTP_TIMEOUT_MS", "15000")?;

        Ok(Self {
            api_base_url,
            spreadsheet_webhook_url,
            sinks,
            autofill_display: Duration::from_millis(display_ms),
            http_timeouts: HttpTimeouts {
                connect: Duration::from_millis(connect_ms),
                request: Duration::from_millis(request_ms),
            },
        })
    }

    /// Submitting needs a webhook URL whenever the spreadsheet sink is on;
    /// lookups never do.
    pub fn validate_sinks(&self) -> Result<(), String> {
        if self.sinks.spreadsheet && self.spreadsheet_webhook_url.is_none() {
            return Err(
                "SPREADSHEET_WEBHOOK_URL must be set when SAVE_TO_SHEETS is enabled".to_string(),
            );
        }
        Ok(())
    }
}

// Trailing slash so relative joins land under the base path.
fn base_url(raw: &str) -> Result<Url, String> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| format!("Invalid REGISTRATION_API_URL: {}", e))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| format!("Invalid {key} value {raw:?}: {e}"))
}
