//! Configuration module
//!
//! Env-driven configuration for the API server and the backing stores.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Object storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectStorageBackend {
    /// In-memory recording backend (development and tests)
    Memory,
    /// S3 or an S3-compatible provider
    S3,
}

impl ObjectStorageBackend {
    fn parse(s: &str) -> Result<Self, anyhow::Error> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(ObjectStorageBackend::Memory),
            "s3" => Ok(ObjectStorageBackend::S3),
            other => Err(anyhow::anyhow!(
                "Unknown object storage backend '{}', expected 'memory' or 's3'",
                other
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub storage_backend: ObjectStorageBackend,
    /// AWS region for the S3 backend (ignored for memory)
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    /// Maximum number of identifiers accepted by one bulk edit / delete request
    pub max_batch_size: usize,
}

impl Config {
    /// Load configuration from the environment (and .env if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => ObjectStorageBackend::parse(&s)?,
            Err(_) => ObjectStorageBackend::Memory,
        };

        let s3_region = env::var("S3_REGION").ok();
        let s3_endpoint = env::var("S3_ENDPOINT").ok();

        if storage_backend == ObjectStorageBackend::S3 && s3_region.is_none() {
            return Err(anyhow::anyhow!(
                "S3_REGION is required when STORAGE_BACKEND=s3"
            ));
        }

        let max_batch_size = env::var("MAX_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BATCH_SIZE)
            .max(1);

        Ok(Config {
            server_port,
            cors_origins,
            environment,
            storage_backend,
            s3_region,
            s3_endpoint,
            max_batch_size,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: DEFAULT_SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            storage_backend: ObjectStorageBackend::Memory,
            s3_region: None,
            s3_endpoint: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}
