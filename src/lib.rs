pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - value objects, models and errors
pub use domain::{
    BucketName, KeyMatch, ObjectKey, StorageError, StorageResult, ValidationError,
    VersionComparison, VersionId, VersionRecord, VersionSequence, VersioningAck,
    VersioningStatus,
};

// Port types - interfaces for external systems
pub use ports::{VersioningBackend, VersioningService};

// Service implementations
pub use services::VersioningServiceImpl;

// Application factory and configuration
pub use app::{
    create_in_memory_app, create_s3_app, AppBuilder, AppConfig, AppError, AppServices,
    StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{InMemoryVersioningBackend, S3Config, S3VersioningClient};
