//! Command-line and environment configuration shared by both binaries

use clap::{builder::FalseyValueParser, ArgAction, Args, ValueEnum};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::{
    adapters::outbound::storage::S3Config,
    app::{AppConfig, StorageBackend},
    domain::models::KeyMatch,
};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// An S3-compatible HTTP endpoint
    S3,
    /// An empty in-memory backend, for dry runs
    Memory,
}

/// Backend and logging options
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Storage backend type
    #[arg(long, env = "S3_VERSIONING_BACKEND", value_enum, default_value_t = BackendKind::S3)]
    pub backend: BackendKind,

    /// Endpoint URL for S3-compatible servers [default: from the AWS config chain]
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Region used for signing [default: from the AWS config chain, else us-east-1]
    #[arg(long)]
    pub region: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(long)]
    pub profile: Option<String>,

    /// Access key ID, overriding the AWS credential chain
    #[arg(long, requires = "secret_key")]
    pub access_key: Option<String>,

    /// Secret access key, overriding the AWS credential chain
    #[arg(long, requires = "access_key")]
    pub secret_key: Option<String>,

    /// Session token for temporary credentials given with --access-key
    #[arg(long, requires = "access_key")]
    pub session_token: Option<String>,

    /// Address buckets by path instead of by host name
    #[arg(
        long,
        env = "S3_FORCE_PATH_STYLE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub path_style: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl BackendArgs {
    pub fn s3_config(&self) -> S3Config {
        S3Config::builder()
            .maybe_region(self.region.clone())
            .maybe_endpoint(self.endpoint.clone())
            .maybe_profile(self.profile.clone())
            .maybe_access_key(self.access_key.clone())
            .maybe_secret_key(self.secret_key.clone())
            .maybe_session_token(self.session_token.clone())
            .force_path_style(self.path_style)
            .build()
    }

    pub fn to_app_config(&self, key_match: KeyMatch) -> AppConfig {
        let storage_backend = match self.backend {
            BackendKind::S3 => StorageBackend::S3(self.s3_config()),
            BackendKind::Memory => StorageBackend::InMemory,
        };

        AppConfig {
            storage_backend,
            key_match,
        }
    }

    /// Install the global subscriber. Logs go to stderr so stdout only
    /// carries the report lines.
    pub fn init_logging(&self) {
        let level = self
            .log_level
            .parse::<LevelFilter>()
            .unwrap_or(LevelFilter::INFO);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(level),
            )
            .init();
    }
}
