mod versioning_service_impl;

pub use versioning_service_impl::VersioningServiceImpl;
