//! Server configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::TimeDelta;
use currency_atlas_registry::domain::palette::Palette;

use crate::error::AppError;

/// Default cap on upload bodies: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default admin session lifetime: 12 hours.
pub const DEFAULT_SESSION_TTL_SECS: u32 = 12 * 60 * 60;

/// Which `EventStore` backend to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory; lost on restart.
    Memory,
    /// A single JSON array file.
    File(PathBuf),
    /// `PostgreSQL` at the given URL.
    Postgres(String),
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Event store backend.
    pub store_backend: StoreBackend,
    /// The single admin identity.
    pub admin_email: String,
    /// Password for credential login.
    pub admin_password: String,
    /// Directory uploaded blobs are written to and served from.
    pub upload_dir: PathBuf,
    /// Prefix for blob URLs handed back to clients.
    pub public_base_url: String,
    /// Largest accepted upload body.
    pub max_upload_bytes: usize,
    /// How long a login token stays valid.
    pub session_ttl: TimeDelta,
    /// Optional palette file replacing the standard palette.
    pub palette_path: Option<PathBuf>,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| AppError::Config(format!("{name} environment variable must be set")))
        };

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        let store_backend = match var("STORE_BACKEND").as_deref().unwrap_or("file") {
            "memory" => StoreBackend::Memory,
            "file" => StoreBackend::File(
                var("EVENTS_PATH").map_or_else(|| PathBuf::from("events.json"), PathBuf::from),
            ),
            "postgres" => StoreBackend::Postgres(required("DATABASE_URL")?),
            other => {
                return Err(AppError::Config(format!(
                    "STORE_BACKEND must be memory, file or postgres, got {other:?}"
                )));
            }
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("MAX_UPLOAD_BYTES must be a byte count: {e}")))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let session_ttl_secs: u32 = match var("SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("SESSION_TTL_SECS must be a number of seconds: {e}")))?,
            None => DEFAULT_SESSION_TTL_SECS,
        };
        if session_ttl_secs == 0 {
            return Err(AppError::Config("SESSION_TTL_SECS must be positive".into()));
        }

        Ok(Self {
            store_backend,
            admin_email: required("ADMIN_EMAIL")?,
            admin_password: required("ADMIN_PASSWORD")?,
            upload_dir: var("UPLOAD_DIR").map_or_else(|| PathBuf::from("uploads"), PathBuf::from),
            public_base_url: var("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            max_upload_bytes,
            session_ttl: TimeDelta::seconds(i64::from(session_ttl_secs)),
            palette_path: var("PALETTE_PATH").map(PathBuf::from),
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
            host,
            port,
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Loads the palette file if one is configured, else the standard palette.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or parsed.
    pub fn load_palette(&self) -> Result<Palette, AppError> {
        let Some(path) = &self.palette_path else {
            return Ok(Palette::standard());
        };
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        Palette::from_json(&json)
            .map_err(|e| AppError::Config(format!("invalid palette {}: {e}", path.display())))
    }
}
