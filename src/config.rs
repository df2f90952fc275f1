// config.rs
use crate::db::connection::Database;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_DATA_PATH: &str = "data_jabar_umkm.csv";
const DEFAULT_DB_PATH: &str = "umkm.sqlite3";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub workers: usize,
    /// Only needed to refresh data; the dashboard works without it.
    pub zenrows_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_path = lookup("UMKM_DATA_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
        let db_path = lookup("UMKM_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        Self {
            data_path: PathBuf::from(data_path),
            db_path: PathBuf::from(db_path),
            bind_addr: parse_or_default(&lookup, "UMKM_BIND_ADDR", DEFAULT_BIND_ADDR),
            workers: parse_or_default(&lookup, "UMKM_WORKERS", &DEFAULT_WORKERS.to_string()),
            zenrows_api_key: lookup("ZENROWS_API_KEY").filter(|v| !v.trim().is_empty()),
        }
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: &str) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(v) => return v,
            Err(_) => log::warn!("Ignoring malformed {key}={raw:?}, using {default}"),
        }
    }

    match default.parse() {
        Ok(v) => v,
        Err(_) => unreachable!("built-in default for {key} must parse"),
    }
}

/// Everything a request handler needs, passed down explicitly.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let db = Database::new(config.db_path.to_string_lossy().into_owned());
        Self { config, db }
    }
}
