//! Reactive provisioner: on a control-plane "log group created" event,
//! attach a delivery subscription when the group belongs to the managed
//! database family for this environment.

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use aws_sdk_cloudwatchlogs::error::ProvideErrorMetadata;

use crate::naming::Prefixes;

pub const FILTER_NAME: &str = "firehose_for_opensearch";
const FILTER_PATTERN: &str = "";

/// CloudTrail `CreateLogGroup` detail as delivered via the event bus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogGroupDetail {
    #[serde(default)]
    pub request_parameters: Option<CreateLogGroupParameters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogGroupParameters {
    #[serde(default)]
    pub log_group_name: Option<String>,
}

impl CreateLogGroupDetail {
    pub fn log_group_name(&self) -> Option<&str> {
        self.request_parameters.as_ref()?.log_group_name.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutFilterOutcome {
    Created,
    AlreadyExists,
}

#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    async fn put_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
        filter_pattern: &str,
        destination_arn: &str,
        role_arn: &str,
    ) -> Result<PutFilterOutcome>;
}

pub struct CloudWatchSubscriptionApi {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchSubscriptionApi {
    pub fn new(client: aws_sdk_cloudwatchlogs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubscriptionApi for CloudWatchSubscriptionApi {
    async fn put_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
        filter_pattern: &str,
        destination_arn: &str,
        role_arn: &str,
    ) -> Result<PutFilterOutcome> {
        match self
            .client
            .put_subscription_filter()
            .log_group_name(log_group)
            .filter_name(filter_name)
            .filter_pattern(filter_pattern)
            .destination_arn(destination_arn)
            .role_arn(role_arn)
            .send()
            .await
        {
            Ok(_) => Ok(PutFilterOutcome::Created),
            Err(err) => {
                let err = err.into_service_error();
                if err.code() == Some("ResourceAlreadyExistsException") {
                    Ok(PutFilterOutcome::AlreadyExists)
                } else {
                    Err(err.into())
                }
            }
        }
    }
}

pub struct SubscriptionProvisioner {
    api: Arc<dyn SubscriptionApi>,
    log_group_prefix: String,
    destination_arn: String,
    role_arn: String,
}

impl SubscriptionProvisioner {
    pub fn new(
        api: Arc<dyn SubscriptionApi>,
        prefixes: &Prefixes,
        destination_arn: impl Into<String>,
        role_arn: impl Into<String>,
    ) -> Self {
        Self {
            api,
            log_group_prefix: prefixes.db_log_group_prefix(),
            destination_arn: destination_arn.into(),
            role_arn: role_arn.into(),
        }
    }

    pub async fn handle_created_log_group(&self, log_group_name: Option<&str>) -> Result<()> {
        let Some(name) = log_group_name else {
            info!("log group creation event carried no name, nothing to do");
            return Ok(());
        };
        if !name.starts_with(&self.log_group_prefix) {
            info!("log group {name} does not apply");
            return Ok(());
        }

        match self
            .api
            .put_subscription_filter(
                name,
                FILTER_NAME,
                FILTER_PATTERN,
                &self.destination_arn,
                &self.role_arn,
            )
            .await?
        {
            PutFilterOutcome::Created => {
                info!("subscription filter made for {name}");
                Ok(())
            }
            // Provisioning fires once per created log group; a collision
            // means something upstream re-triggered unexpectedly.
            PutFilterOutcome::AlreadyExists => {
                bail!("subscription filter already exists for {name}")
            }
        }
    }
}
