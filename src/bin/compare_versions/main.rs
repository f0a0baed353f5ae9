use anyhow::{Context, Result};
use clap::Parser;
use s3_versioning_tools::{
    app::AppBuilder, config::BackendArgs, domain::models::KeyMatch, BucketName, ObjectKey,
    VersioningService,
};

#[derive(Parser, Debug)]
#[command(name = "compare-versions")]
#[command(about = "Print the two most recent version IDs of an object", long_about = None)]
struct Cli {
    /// Bucket holding the object
    #[arg(short, long, env = "S3_BUCKET", default_value = "your-s3-bucket-name")]
    bucket: String,

    /// Object key, used as a listing prefix
    #[arg(short, long, env = "S3_OBJECT_KEY", default_value = "path/to/your/file.jpg")]
    key: String,

    /// Ignore versions of other keys that share the prefix
    #[arg(long)]
    exact: bool,

    #[command(flatten)]
    backend: BackendArgs,
}

impl Cli {
    fn key_match(&self) -> KeyMatch {
        if self.exact {
            KeyMatch::Exact
        } else {
            KeyMatch::Prefix
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.backend.init_logging();

    let bucket = BucketName::new(cli.bucket.clone()).context("Invalid bucket name")?;
    let key = ObjectKey::new(cli.key.clone()).context("Invalid object key")?;

    let services = AppBuilder::new()
        .with_config(cli.backend.to_app_config(cli.key_match()))
        .build()
        .await
        .context("Failed to build application")?;

    services
        .versioning_service
        .compare_versions(&bucket, &key, &mut std::io::stdout())
        .await?;

    Ok(())
}
