use anyhow::{Context, Result};
use clap::Parser;
use s3_versioning_tools::{
    app::AppBuilder, config::BackendArgs, domain::models::KeyMatch, BucketName,
    VersioningService,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "enable-versioning")]
#[command(about = "Enable versioning on a storage bucket", long_about = None)]
struct Cli {
    /// Bucket to enable versioning on
    #[arg(short, long, env = "S3_BUCKET", default_value = "your-s3-bucket-name")]
    bucket: String,

    #[command(flatten)]
    backend: BackendArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.backend.init_logging();

    let bucket = BucketName::new(cli.bucket.clone()).context("Invalid bucket name")?;

    let services = AppBuilder::new()
        .with_config(cli.backend.to_app_config(KeyMatch::default()))
        .build()
        .await
        .context("Failed to build application")?;

    let ack = services
        .versioning_service
        .enable_versioning(&bucket, &mut std::io::stdout())
        .await?;

    info!(status_code = ack.status_code, request_id = ?ack.request_id, "Done");
    Ok(())
}
