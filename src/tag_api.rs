//! AWS-backed implementations of the tag and capacity lookups.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::classify::ResourceLocator;
use crate::tag_cache::{CapacitySource, TagSource};
use crate::types::TagMap;

pub struct AwsTagSource {
    s3: aws_sdk_s3::Client,
    es: aws_sdk_elasticsearch::Client,
    rds: aws_sdk_rds::Client,
}

impl AwsTagSource {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            s3: aws_sdk_s3::Client::new(config),
            es: aws_sdk_elasticsearch::Client::new(config),
            rds: aws_sdk_rds::Client::new(config),
        }
    }
}

#[async_trait]
impl TagSource for AwsTagSource {
    async fn fetch_tags(&self, locator: &ResourceLocator) -> Result<TagMap> {
        match locator {
            ResourceLocator::Bucket { name } => {
                let resp = self
                    .s3
                    .get_bucket_tagging()
                    .bucket(name)
                    .send()
                    .await
                    .context("get_bucket_tagging")?;
                Ok(resp
                    .tag_set()
                    .iter()
                    .map(|tag| (tag.key().to_string(), tag.value().to_string()))
                    .collect())
            }
            ResourceLocator::SearchDomain { arn } => {
                let resp = self
                    .es
                    .list_tags()
                    .arn(arn)
                    .send()
                    .await
                    .context("list_tags")?;
                Ok(resp
                    .tag_list()
                    .iter()
                    .map(|tag| (tag.key().to_string(), tag.value().to_string()))
                    .collect())
            }
            ResourceLocator::DbInstance { arn, .. } => {
                let resp = self
                    .rds
                    .list_tags_for_resource()
                    .resource_name(arn)
                    .send()
                    .await
                    .context("list_tags_for_resource")?;
                Ok(resp
                    .tag_list()
                    .iter()
                    .filter_map(|tag| Some((tag.key()?.to_string(), tag.value()?.to_string())))
                    .collect())
            }
        }
    }
}

pub struct AwsCapacitySource {
    rds: aws_sdk_rds::Client,
}

impl AwsCapacitySource {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            rds: aws_sdk_rds::Client::new(config),
        }
    }
}

#[async_trait]
impl CapacitySource for AwsCapacitySource {
    async fn allocated_storage_gb(&self, db_name: &str) -> Result<Option<i32>> {
        let resp = self
            .rds
            .describe_db_instances()
            .db_instance_identifier(db_name)
            .send()
            .await
            .context("describe_db_instances")?;
        Ok(resp
            .db_instances()
            .first()
            .and_then(|db| db.allocated_storage()))
    }
}
