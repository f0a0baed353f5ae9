//! S3 versioning backend speaking the REST API directly.
//!
//! Requests are signed with AWS Signature Version 4 and bodies are encoded
//! with quick-xml. Region, endpoint and credentials come from the standard
//! AWS provider chain (environment, shared config and credentials files,
//! SSO, container and instance roles); anything set on [`S3Config`] takes
//! precedence. Custom endpoints (MinIO and friends) are addressed path-style.

pub mod client;
pub mod signing;
pub mod xml;

pub use client::S3VersioningClient;
pub use signing::Credentials;

use aws_config::{profile::profile_file::ProfileFiles, BehaviorVersion, Region, SdkConfig};

use crate::adapters::outbound::storage::error::StoreError;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Overrides for the S3 versioning backend.
///
/// Every field left unset is resolved by the AWS provider chain when the
/// client connects.
#[derive(Clone, Default, bon::Builder)]
pub struct S3Config {
    #[builder(into)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible servers such as MinIO
    #[builder(into)]
    pub endpoint: Option<String>,
    /// Named profile from the shared config files
    #[builder(into)]
    pub profile: Option<String>,
    #[builder(into)]
    pub access_key: Option<String>,
    #[builder(into)]
    pub secret_key: Option<String>,
    #[builder(into)]
    pub session_token: Option<String>,
    /// Read these config and credentials files instead of `~/.aws/*`
    pub profile_files: Option<ProfileFiles>,
    /// Address buckets as `/{bucket}` instead of `{bucket}.{host}`
    #[builder(default)]
    pub force_path_style: bool,
}

impl S3Config {
    /// Explicit key pair, if one was given. Half a pair is an error.
    pub fn static_credentials(
        &self,
    ) -> Result<Option<aws_credential_types::Credentials>, StoreError> {
        match (&self.access_key, &self.secret_key) {
            (Some(access_key), Some(secret_key)) => Ok(Some(aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                self.session_token.clone(),
                None,
                "S3Config",
            ))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(StoreError::MissingCredentials(
                "an access key was given without a secret key".to_string(),
            )),
            (None, Some(_)) => Err(StoreError::MissingCredentials(
                "a secret key was given without an access key".to_string(),
            )),
        }
    }

    /// Run the AWS provider chain with these overrides applied
    pub async fn load_sdk_config(&self) -> Result<SdkConfig, StoreError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(files) = &self.profile_files {
            loader = loader.profile_files(files.clone());
        }
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        if let Some(credentials) = self.static_credentials()? {
            loader = loader.credentials_provider(credentials);
        }

        Ok(loader.load().await)
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("profile", &self.profile)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("profile_files", &self.profile_files)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}
