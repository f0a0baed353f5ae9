use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{InMemoryVersioningBackend, S3Config, S3VersioningClient},
    domain::models::KeyMatch,
    ports::storage::VersioningBackend,
    services::VersioningServiceImpl,
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub key_match: KeyMatch,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            key_match: KeyMatch::Prefix,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    S3(S3Config),
}

/// Application services container
pub struct AppServices {
    pub versioning_service: VersioningServiceImpl,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
    backend: Option<Arc<dyn VersioningBackend>>,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            backend: None,
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    pub fn with_key_match(mut self, key_match: KeyMatch) -> Self {
        self.config.key_match = key_match;
        self
    }

    /// Use an already constructed backend instead of building one from the config
    pub fn with_backend(mut self, backend: Arc<dyn VersioningBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let backend = match self.backend {
            Some(backend) => backend,
            None => create_backend(&self.config.storage_backend).await?,
        };

        let versioning_service =
            VersioningServiceImpl::new(backend).with_key_match(self.config.key_match);

        Ok(AppServices { versioning_service })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the backend client based on configuration
async fn create_backend(
    backend: &StorageBackend,
) -> Result<Arc<dyn VersioningBackend>, AppError> {
    match backend {
        StorageBackend::InMemory => {
            Ok(Arc::new(InMemoryVersioningBackend::with_auto_create()))
        }
        StorageBackend::S3(config) => {
            let client = S3VersioningClient::connect(config.clone())
                .await
                .map_err(|e| AppError::StorageInit {
                    message: e.to_string(),
                })?;
            Ok(Arc::new(client))
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .build()
        .await
}

/// Create an S3-backed application. Unset fields of `config` are resolved
/// through the AWS provider chain.
pub async fn create_s3_app(config: S3Config) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::S3(config))
        .build()
        .await
}
