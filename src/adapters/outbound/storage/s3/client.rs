use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use chrono::Utc;
use http::Method;
use reqwest::{Client, Response, Url};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::signing::{self, CanonicalRequest, Credentials};
use super::xml;
use super::{S3Config, DEFAULT_REGION};
use crate::{
    adapters::outbound::storage::error::StoreError,
    domain::{
        errors::StorageResult,
        models::{
            ListObjectVersionsRequest, PutBucketVersioningRequest, VersionSequence, VersioningAck,
        },
        value_objects::BucketName,
    },
    ports::storage::VersioningBackend,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_ID_HEADER: &str = "x-amz-request-id";

/// Where a bucket-level request goes
#[derive(Debug, Clone, PartialEq)]
struct BucketTarget {
    scheme: String,
    /// Host plus a non-default port, exactly as sent in the `Host` header
    host: String,
    /// Encoded request path, including any path prefix of the endpoint
    path: String,
}

/// Client for the S3 bucket versioning and version listing APIs
pub struct S3VersioningClient {
    client: Client,
    credentials: SharedCredentialsProvider,
    region: String,
    endpoint: Url,
    virtual_hosting: bool,
}

impl S3VersioningClient {
    /// Resolve region, endpoint and credentials through the AWS provider
    /// chain, with the overrides in `config` applied first
    pub async fn connect(config: S3Config) -> Result<Self, StoreError> {
        let sdk_config = config.load_sdk_config().await?;
        Self::from_sdk_config(&sdk_config, config.force_path_style)
    }

    /// Build a client from an already loaded AWS configuration
    pub fn from_sdk_config(
        sdk_config: &SdkConfig,
        force_path_style: bool,
    ) -> Result<Self, StoreError> {
        let credentials = sdk_config.credentials_provider().ok_or_else(|| {
            StoreError::MissingCredentials("no credentials provider is configured".to_string())
        })?;
        let region = sdk_config
            .region()
            .map(|region| region.as_ref().to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let endpoint_url = match sdk_config.endpoint_url() {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://s3.{}.amazonaws.com", region),
        };
        let endpoint = Url::parse(&endpoint_url)
            .map_err(|e| StoreError::InvalidEndpoint(format!("{}: {}", endpoint_url, e)))?;
        if endpoint.host_str().is_none() {
            return Err(StoreError::InvalidEndpoint(format!(
                "{}: missing host",
                endpoint_url
            )));
        }
        if endpoint.query().is_some() {
            return Err(StoreError::InvalidEndpoint(format!(
                "{}: query strings are not supported",
                endpoint_url
            )));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            credentials,
            region,
            virtual_hosting: !force_path_style && sdk_config.endpoint_url().is_none(),
            endpoint,
        })
    }

    /// Region requests are signed for
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ask the provider chain for the current key pair
    pub async fn signing_credentials(&self) -> Result<Credentials, StoreError> {
        let resolved = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| StoreError::MissingCredentials(e.to_string()))?;
        Ok(Credentials::from(&resolved))
    }

    fn bucket_target(&self, bucket: &BucketName) -> BucketTarget {
        // Checked when the client is built
        let endpoint_host = self.endpoint.host_str().unwrap_or_default();
        let port = self
            .endpoint
            .port()
            .map(|port| format!(":{}", port))
            .unwrap_or_default();
        let base_path = self.endpoint.path().trim_end_matches('/');

        if self.virtual_hosting && bucket.is_dns_compatible() {
            BucketTarget {
                scheme: self.endpoint.scheme().to_string(),
                host: format!("{}.{}{}", bucket, endpoint_host, port),
                path: format!("{}/", base_path),
            }
        } else {
            BucketTarget {
                scheme: self.endpoint.scheme().to_string(),
                host: format!("{}{}", endpoint_host, port),
                path: format!("{}/{}", base_path, signing::uri_encode(bucket.as_str())),
            }
        }
    }

    /// Sign and send a bucket-level request, turning non-2xx answers into errors
    async fn send(
        &self,
        method: Method,
        bucket: &BucketName,
        query: &[(&str, &str)],
        body: Bytes,
        content_md5: Option<String>,
    ) -> Result<Response, StoreError> {
        let credentials = self.signing_credentials().await?;
        let target = self.bucket_target(bucket);
        let query = signing::canonical_query_string(query);
        let payload_hash = signing::sha256_hex(&body);
        let now = Utc::now();

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), target.host.clone());
        headers.insert("x-amz-content-sha256".to_string(), payload_hash.clone());
        headers.insert("x-amz-date".to_string(), signing::amz_date(&now));
        if let Some(content_md5) = content_md5 {
            headers.insert("content-md5".to_string(), content_md5);
        }
        if let Some(token) = &credentials.session_token {
            headers.insert("x-amz-security-token".to_string(), token.clone());
        }

        let canonical = CanonicalRequest {
            method: method.as_str(),
            uri: &target.path,
            query: &query,
            headers: &headers,
            payload_hash: &payload_hash,
        };
        let authorization =
            signing::authorization_header(&credentials, &self.region, &canonical, &now);

        let url = format!("{}://{}{}?{}", target.scheme, target.host, target.path, query);
        debug!(%method, %url, "Sending S3 request");

        // reqwest derives Host from the URL
        let mut request = self
            .client
            .request(method, url)
            .header(http::header::AUTHORIZATION, authorization);
        for (name, value) in headers.iter().filter(|(name, _)| name.as_str() != "host") {
            request = request.header(name.as_str(), value.as_str());
        }
        if !body.is_empty() {
            request = request.header(http::header::CONTENT_TYPE, "application/xml");
        }

        let response = request.body(body).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }
}

fn request_id(response: &Response) -> Option<String> {
    response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Build an error from a failed response, keeping the backend's code and message
async fn api_error(response: Response) -> StoreError {
    let status = response.status();
    let header_request_id = request_id(&response);
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let body = response.text().await.unwrap_or_default();

    match xml::parse_error_body(&body) {
        Some(error) => StoreError::Api {
            status: status.as_u16(),
            code: error.code,
            message: error.message.unwrap_or_else(|| reason.to_string()),
            request_id: error.request_id.or(header_request_id),
        },
        None => StoreError::Api {
            status: status.as_u16(),
            code: reason.replace(' ', ""),
            message: format!("HTTP {}", status),
            request_id: header_request_id,
        },
    }
}

#[async_trait]
impl VersioningBackend for S3VersioningClient {
    async fn put_bucket_versioning(
        &self,
        request: &PutBucketVersioningRequest,
    ) -> StorageResult<VersioningAck> {
        let body = xml::versioning_configuration_xml(request.status)?;
        // PutBucketVersioning is rejected without an integrity header
        let content_md5 = BASE64.encode(md5::compute(body.as_bytes()).0);

        let response = self
            .send(
                Method::PUT,
                &request.bucket,
                &[("versioning", "")],
                Bytes::from(body),
                Some(content_md5),
            )
            .await?;

        Ok(VersioningAck {
            status_code: response.status().as_u16(),
            request_id: request_id(&response),
        })
    }

    async fn list_object_versions(
        &self,
        request: &ListObjectVersionsRequest,
    ) -> StorageResult<VersionSequence> {
        let response = self
            .send(
                Method::GET,
                &request.bucket,
                &[("versions", ""), ("prefix", request.prefix.as_str())],
                Bytes::new(),
                None,
            )
            .await?;

        let body = response.text().await.map_err(StoreError::from)?;
        Ok(xml::parse_list_versions(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::{BehaviorVersion, Region};
    use aws_credential_types::provider::{error::CredentialsError, future};

    fn sdk_config(region: &str, endpoint: Option<&str>) -> SdkConfig {
        let builder = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(SharedCredentialsProvider::new(
                aws_credential_types::Credentials::new(
                    "AKIDEXAMPLE",
                    "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
                    None,
                    None,
                    "test",
                ),
            ));
        match endpoint {
            Some(endpoint) => builder.endpoint_url(endpoint).build(),
            None => builder.build(),
        }
    }

    #[derive(Debug)]
    struct NoCredentials;

    impl ProvideCredentials for NoCredentials {
        fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
        where
            Self: 'a,
        {
            future::ProvideCredentials::ready(Err(CredentialsError::not_loaded(
                "no providers in chain provided credentials",
            )))
        }
    }

    #[test]
    fn test_virtual_hosted_target() {
        let client = S3VersioningClient::from_sdk_config(&sdk_config("eu-west-1", None), false)
            .unwrap();
        assert_eq!(client.region(), "eu-west-1");

        let target = client.bucket_target(&BucketName::new("my-bucket").unwrap());
        assert_eq!(target.scheme, "https");
        assert_eq!(target.host, "my-bucket.s3.eu-west-1.amazonaws.com");
        assert_eq!(target.path, "/");

        // Dotted names break TLS on the wildcard certificate
        let target = client.bucket_target(&BucketName::new("my.bucket").unwrap());
        assert_eq!(target.host, "s3.eu-west-1.amazonaws.com");
        assert_eq!(target.path, "/my.bucket");
    }

    #[test]
    fn test_force_path_style_on_aws() {
        let client =
            S3VersioningClient::from_sdk_config(&sdk_config("eu-west-1", None), true).unwrap();

        let target = client.bucket_target(&BucketName::new("my-bucket").unwrap());
        assert_eq!(target.host, "s3.eu-west-1.amazonaws.com");
        assert_eq!(target.path, "/my-bucket");
    }

    #[test]
    fn test_path_style_target_keeps_port() {
        let client = S3VersioningClient::from_sdk_config(
            &sdk_config("us-east-1", Some("http://localhost:9000")),
            false,
        )
        .unwrap();

        let target = client.bucket_target(&BucketName::new("my-bucket").unwrap());
        assert_eq!(target.scheme, "http");
        assert_eq!(target.host, "localhost:9000");
        assert_eq!(target.path, "/my-bucket");
    }

    #[test]
    fn test_endpoint_path_prefix_is_kept() {
        let client = S3VersioningClient::from_sdk_config(
            &sdk_config("us-east-1", Some("http://gw:8080/s3/")),
            false,
        )
        .unwrap();

        let target = client.bucket_target(&BucketName::new("my-bucket").unwrap());
        assert_eq!(target.host, "gw:8080");
        assert_eq!(target.path, "/s3/my-bucket");
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let result = S3VersioningClient::from_sdk_config(
            &sdk_config("us-east-1", Some("not a url")),
            false,
        );
        assert!(matches!(result, Err(StoreError::InvalidEndpoint(_))));

        let result = S3VersioningClient::from_sdk_config(
            &sdk_config("us-east-1", Some("http://gw/?a=b")),
            false,
        );
        assert!(matches!(result, Err(StoreError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_requires_credentials_provider() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let result = S3VersioningClient::from_sdk_config(&sdk_config, false);
        assert!(matches!(result, Err(StoreError::MissingCredentials(_))));
    }

    #[tokio::test]
    async fn test_unresolvable_credentials_fail_before_sending() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            // Nothing listens here; the request must not get that far
            .endpoint_url("http://127.0.0.1:9")
            .credentials_provider(SharedCredentialsProvider::new(NoCredentials))
            .build();
        let client = S3VersioningClient::from_sdk_config(&sdk_config, false).unwrap();

        let err = client
            .put_bucket_versioning(&PutBucketVersioningRequest::enable(
                BucketName::new("my-bucket").unwrap(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::domain::errors::StorageError::ConfigurationError { .. }
        ));
    }
}
