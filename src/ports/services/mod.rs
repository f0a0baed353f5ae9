mod versioning_service;

pub use versioning_service::VersioningService;
