use std::sync::Arc;
use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_lambda_events::firehose::{KinesisFirehoseEvent, KinesisFirehoseResponse};
use dotenvy::dotenv;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use tagstream::config::LogTransformConfig;
use tagstream::enrich::Enricher;
use tagstream::firehose;
use tagstream::log_transform::LogTransformer;
use tagstream::naming::Prefixes;
use tagstream::s3_sink::S3BulkStore;
use tagstream::tag_api::{AwsCapacitySource, AwsTagSource};
use tagstream::tag_cache::{CapacityCache, TagCache};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenv();
    init_tracing();

    let cfg = LogTransformConfig::from_env()?;
    info!("starting log transform for environment {}", cfg.environment);

    let aws_cfg = create_aws_config().await;
    let enricher = Enricher::new(
        Prefixes::for_environment(cfg.environment),
        cfg.region.clone(),
        cfg.account_id.clone(),
        TagCache::new(Arc::new(AwsTagSource::new(&aws_cfg))),
        CapacityCache::new(Arc::new(AwsCapacitySource::new(&aws_cfg))),
    );
    let store = Arc::new(S3BulkStore::new(
        aws_sdk_s3::Client::new(&aws_cfg),
        cfg.bucket.clone(),
    ));
    let transformer = Arc::new(LogTransformer::new(enricher, store));

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<KinesisFirehoseEvent>| {
            let transformer = transformer.clone();
            async move { handler(&transformer, event).await }
        },
    ))
    .await
}

async fn handler(
    transformer: &LogTransformer,
    event: LambdaEvent<KinesisFirehoseEvent>,
) -> Result<KinesisFirehoseResponse, Error> {
    let records = firehose::inbound_records(event.payload);
    let out = transformer.process_batch(records).await?;
    Ok(firehose::response(out))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();
}

async fn create_aws_config() -> aws_config::SdkConfig {
    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(10))
        .operation_timeout(Duration::from_secs(30))
        .build();

    aws_config::defaults(BehaviorVersion::latest())
        .timeout_config(timeout_config)
        .load()
        .await
}
