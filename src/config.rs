//! Application Configuration
//!
//! This module provides configuration management for the application,
//! supporting YAML configuration files with sensible defaults and
//! environment variable overrides for the storage connection.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Object store backend types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StorageBackend {
    S3,
    Mock,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::S3
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "mock" => Ok(StorageBackend::Mock),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Object store connection configuration
    pub storage: StorageConfig,
    /// Directory listing configuration
    pub listing: ListingConfig,
    /// Protected route configuration
    pub auth: AuthConfig,
    /// Download link configuration
    pub download: DownloadConfig,
    /// Search traversal configuration
    pub search: SearchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
}

/// Object store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type
    pub backend: StorageBackend,
    /// Endpoint URL, e.g. `https://s3.us-east-1.amazonaws.com` or a
    /// MinIO address
    pub endpoint: String,
    /// Region name; arbitrary for most S3-compatible stores
    pub region: String,
    /// Bucket name
    pub bucket: String,
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Use path-style URLs; required by most non-AWS endpoints
    pub path_style: bool,
    /// Directory inside the bucket to treat as the hierarchy root
    pub root_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            endpoint: "http://127.0.0.1:9000".to_string(),
            region: "us-east-1".to_string(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            path_style: true,
            root_prefix: "/".to_string(),
        }
    }
}

/// Directory listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Maximum number of rows requested per listing page
    pub page_size: usize,
    /// Cache lifetime in seconds for responses on unprotected routes
    pub cache_ttl_secs: u64,
}

/// Protected route configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path prefixes gated behind a secret, matched case-insensitively
    /// in declaration order
    pub protected_routes: Vec<String>,
    /// Name of the secret-bearing marker object inside each protected
    /// prefix
    pub marker_filename: String,
}

/// Download link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Lifetime in seconds of presigned download URLs
    pub presign_ttl_secs: u32,
    /// Files up to this size may be proxied inline instead of redirected
    pub proxy_max_bytes: u64,
}

/// Search traversal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Upper bound on returned results; also the limit applied when the
    /// caller does not supply one
    pub max_results: usize,
    /// Number of sibling directories visited concurrently; 1 keeps the
    /// walk fully sequential
    pub fanout: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Path to log configuration file
    pub config_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9810,
                workers: 4,
            },
            storage: StorageConfig::default(),
            listing: ListingConfig {
                page_size: 1000,
                cache_ttl_secs: 30,
            },
            auth: AuthConfig {
                protected_routes: Vec::new(),
                marker_filename: ".password".to_string(),
            },
            download: DownloadConfig {
                presign_ttl_secs: 3600,
                proxy_max_bytes: 4194304, // 4 MiB
            },
            search: SearchConfig {
                max_results: 50,
                fanout: 1,
            },
            logging: LoggingConfig {
                config_file: "server_log.yaml".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.yaml`, falling back to defaults
    /// when the file is absent, then apply environment overrides.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::load_from("config.yaml")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from an explicit file path, using defaults if
    /// it does not exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: AppConfig = serde_yaml::from_str(&content)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            warn!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Environment variables take precedence over file values for the
    /// storage connection, so credentials can stay out of the YAML.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(backend_str) = env::var("STORAGE_BACKEND") {
            match backend_str.parse::<StorageBackend>() {
                Ok(backend) => {
                    info!("Using storage backend from environment: {:?}", backend);
                    self.storage.backend = backend;
                }
                Err(e) => {
                    warn!("Invalid storage backend in environment: {}. Keeping configured value.", e);
                }
            }
        }
        if let Ok(endpoint) = env::var("S3_ENDPOINT") {
            self.storage.endpoint = endpoint;
        }
        if let Ok(region) = env::var("S3_REGION") {
            self.storage.region = region;
        }
        if let Ok(bucket) = env::var("S3_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Ok(access_key) = env::var("S3_ACCESS_KEY_ID") {
            self.storage.access_key = access_key;
        }
        if let Ok(secret_key) = env::var("S3_SECRET_ACCESS_KEY") {
            self.storage.secret_key = secret_key;
        }
        if let Ok(root) = env::var("S3_ROOT_DIRECTORY") {
            self.storage.root_prefix = root;
        }
    }
}
