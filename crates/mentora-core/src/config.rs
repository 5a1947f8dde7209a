//! Configuration module
//!
//! All runtime configuration is loaded once from the environment at startup
//! and injected explicitly into the services that need it. Nothing below the
//! HTTP layer reads ambient process state.

use std::env;
use std::time::Duration;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_AI_SERVICE_TIMEOUT_SECS: u64 = 300;
const DEFAULT_DOCUMENT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;
const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 900;
const DEFAULT_TASK_QUEUE_MAX_WORKERS: usize = 4;
const DEFAULT_TASK_QUEUE_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_TASK_QUEUE_MAX_RETRIES: i32 = 3;
// Task timeout must exceed the AI call timeout so the client-side deadline
// fires first and is classified as a connection timeout.
const DEFAULT_TASK_TIMEOUT_SECS: i32 = 360;

/// Which storage backend to build at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackendKind {
    S3,
    Local,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,

    pub storage_backend: StorageBackendKind,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,

    pub document_max_file_size: usize,
    pub presign_expiry_secs: u64,

    pub ai_service_url: String,
    pub ai_service_timeout_secs: u64,

    pub task_queue_max_workers: usize,
    pub task_queue_poll_interval_ms: u64,
    pub task_queue_max_retries: i32,
    pub task_timeout_seconds: i32,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let ai_service_url = env::var("AI_SERVICE_URL")
            .map_err(|_| anyhow::anyhow!("AI_SERVICE_URL must be set"))?;

        let storage_backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("local") => StorageBackendKind::Local,
            Ok("s3") | Err(_) => StorageBackendKind::S3,
            Ok(other) => {
                return Err(anyhow::anyhow!("Unknown STORAGE_BACKEND: {}", other));
            }
        };

        let config = Self {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cors_origins: env_list("CORS_ORIGINS"),
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            document_max_file_size: env_parse(
                "DOCUMENT_MAX_FILE_SIZE",
                DEFAULT_DOCUMENT_MAX_FILE_SIZE,
            ),
            presign_expiry_secs: env_parse("PRESIGN_EXPIRY_SECS", DEFAULT_PRESIGN_EXPIRY_SECS),
            ai_service_url,
            ai_service_timeout_secs: env_parse(
                "AI_SERVICE_TIMEOUT_SECS",
                DEFAULT_AI_SERVICE_TIMEOUT_SECS,
            ),
            task_queue_max_workers: env_parse(
                "TASK_QUEUE_MAX_WORKERS",
                DEFAULT_TASK_QUEUE_MAX_WORKERS,
            ),
            task_queue_poll_interval_ms: env_parse(
                "TASK_QUEUE_POLL_INTERVAL_MS",
                DEFAULT_TASK_QUEUE_POLL_INTERVAL_MS,
            ),
            task_queue_max_retries: env_parse(
                "TASK_QUEUE_MAX_RETRIES",
                DEFAULT_TASK_QUEUE_MAX_RETRIES,
            ),
            task_timeout_seconds: env_parse("TASK_TIMEOUT_SECONDS", DEFAULT_TASK_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackendKind::S3 => {
                if self.s3_bucket.is_none() || self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET and S3_REGION must be set when STORAGE_BACKEND=s3"
                    ));
                }
            }
            StorageBackendKind::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
                    ));
                }
            }
        }
        if self.task_queue_max_retries < 1 {
            return Err(anyhow::anyhow!("TASK_QUEUE_MAX_RETRIES must be at least 1"));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn ai_service_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_service_timeout_secs)
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_to_default() {
        assert_eq!(env_parse("MENTORA_TEST_UNSET_VAR", 42_u32), 42);
    }

    #[test]
    fn env_list_splits_and_trims() {
        std::env::set_var("MENTORA_TEST_LIST", "a, b ,c,");
        assert_eq!(env_list("MENTORA_TEST_LIST"), vec!["a", "b", "c"]);
        std::env::remove_var("MENTORA_TEST_LIST");
    }
}
