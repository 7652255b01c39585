use std::sync::Arc;
use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_lambda_events::cloudwatch_events::CloudWatchEvent;
use dotenvy::dotenv;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use tagstream::config::ProvisionerConfig;
use tagstream::naming::Prefixes;
use tagstream::subscribe::{
    CloudWatchSubscriptionApi, CreateLogGroupDetail, SubscriptionProvisioner,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenv();
    init_tracing();

    let cfg = ProvisionerConfig::from_env()?;
    info!(
        "starting subscription provisioner for environment {}",
        cfg.environment
    );

    let aws_cfg = create_aws_config().await;
    let api = Arc::new(CloudWatchSubscriptionApi::new(
        aws_sdk_cloudwatchlogs::Client::new(&aws_cfg),
    ));
    let provisioner = Arc::new(SubscriptionProvisioner::new(
        api,
        &Prefixes::for_environment(cfg.environment),
        cfg.firehose_arn.clone(),
        cfg.role_arn.clone(),
    ));

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<CloudWatchEvent<CreateLogGroupDetail>>| {
            let provisioner = provisioner.clone();
            async move { handler(&provisioner, event).await }
        },
    ))
    .await
}

async fn handler(
    provisioner: &SubscriptionProvisioner,
    event: LambdaEvent<CloudWatchEvent<CreateLogGroupDetail>>,
) -> Result<(), Error> {
    let detail = event.payload.detail.unwrap_or_default();
    provisioner
        .handle_created_log_group(detail.log_group_name())
        .await?;
    Ok(())
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
