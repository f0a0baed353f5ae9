mod versioning_backend;

pub use versioning_backend::VersioningBackend;
