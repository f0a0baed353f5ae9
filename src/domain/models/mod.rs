pub mod comparison;
pub mod version;

pub use comparison::{KeyMatch, VersionComparison};
pub use version::{
    ListObjectVersionsRequest, PutBucketVersioningRequest, VersionRecord, VersionSequence,
    VersioningAck, VersioningStatus,
};
