//! Application State Management
//!
//! This module provides the application state that wires every service
//! to the single shared object store gateway, following the dependency
//! injection pattern: the gateway is constructed once at startup and
//! passed explicitly into each component.

use log::info;
use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::error::Result;
use crate::gateway::mock_store::MockObjectStore;
use crate::gateway::s3_store::S3ObjectStore;
use crate::gateway::ObjectStoreGateway;
use crate::service::{AuthGate, DirectoryLister, DownloadService, SearchEngine};

/// Application state containing all services and their dependencies
#[derive(Clone)]
pub struct AppState {
    pub lister: Arc<DirectoryLister>,
    pub auth_gate: Arc<AuthGate>,
    pub downloads: Arc<DownloadService>,
    pub search: Arc<SearchEngine>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from loaded configuration. A config file
    /// that exists but cannot be parsed aborts startup.
    pub fn new() -> Result<Self> {
        let config = AppConfig::load().expect("Failed to load configuration");
        Self::from_config(config)
    }

    /// Create application state from configuration, constructing the
    /// configured gateway backend.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        info!("Initializing application state with configuration");

        let gateway: Arc<dyn ObjectStoreGateway> = match config.storage.backend {
            StorageBackend::S3 => {
                info!(
                    "Using S3 storage backend at {} bucket {} root {:?}",
                    config.storage.endpoint, config.storage.bucket, config.storage.root_prefix
                );
                Arc::new(S3ObjectStore::from_config(&config.storage)?)
            }
            StorageBackend::Mock => {
                info!("Using mock storage backend");
                Arc::new(MockObjectStore::new())
            }
        };

        Ok(Self::with_gateway(config, gateway))
    }

    /// Assemble all services around an existing gateway instance. Tests
    /// use this to inject a pre-seeded mock store.
    pub fn with_gateway(config: AppConfig, gateway: Arc<dyn ObjectStoreGateway>) -> Self {
        let lister = Arc::new(DirectoryLister::new(
            gateway.clone(),
            config.listing.page_size,
        ));
        let auth_gate = Arc::new(AuthGate::new(
            gateway.clone(),
            config.auth.protected_routes.clone(),
            config.auth.marker_filename.clone(),
        ));
        let downloads = Arc::new(DownloadService::new(
            gateway.clone(),
            config.download.presign_ttl_secs,
            config.download.proxy_max_bytes,
        ));
        let search = Arc::new(SearchEngine::new(
            gateway,
            config.listing.page_size,
            config.search.fanout,
        ));

        info!("Application state initialized successfully");
        Self {
            lister,
            auth_gate,
            downloads,
            search,
            config,
        }
    }

    /// Create application state for testing with an empty mock backend.
    pub fn new_for_testing() -> Self {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Mock;
        Self::with_gateway(config, Arc::new(MockObjectStore::new()))
    }
}
