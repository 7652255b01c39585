use std::env;

use anyhow::Result;

use crate::naming::Environment;

/// Configuration for the log transform pipeline. All values come from the
/// execution environment; a missing required value aborts the invocation
/// before any record is touched.
#[derive(Debug, Clone)]
pub struct LogTransformConfig {
    pub environment: Environment,
    pub region: String,
    pub account_id: String,
    pub bucket: String,
}

impl LogTransformConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: environment_from_env()?,
            region: env_required("AWS_REGION")?,
            account_id: env_required("ACCOUNT_ID")?,
            bucket: env_required("S3_BUCKET_NAME")?,
        })
    }
}

/// Configuration for the metric transform pipeline.
#[derive(Debug, Clone)]
pub struct MetricTransformConfig {
    pub environment: Environment,
    pub region: String,
    pub account_id: String,
}

impl MetricTransformConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: environment_from_env()?,
            region: env_required("AWS_REGION")?,
            account_id: env_required("ACCOUNT_ID")?,
        })
    }
}

/// Configuration for the subscription provisioner.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    pub environment: Environment,
    pub firehose_arn: String,
    pub role_arn: String,
}

impl ProvisionerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: environment_from_env()?,
            firehose_arn: env_required("FIREHOSE_ARN")?,
            role_arn: env_required("ROLE_ARN")?,
        })
    }
}

pub fn environment_from_env() -> Result<Environment> {
    env_required("ENVIRONMENT")?.parse()
}

fn env_required(key: &str) -> Result<String> {
    let val = env::var(key).unwrap_or_default();
    if val.trim().is_empty() {
        anyhow::bail!("{key} is required");
    }
    Ok(val)
}
