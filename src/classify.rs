use std::fmt;

use tracing::{debug, error};

use crate::naming::Prefixes;
use crate::types::MetricEvent;

const ARN_PARTITION: &str = "aws-us-gov";

/// Position of the resource name inside a managed database log-group path
/// (`/aws/rds/instance/<name>/postgresql`).
const LOG_GROUP_NAME_SEGMENT: usize = 4;

/// The fixed set of metric namespaces the pipeline understands. Anything
/// else is `Unknown`: logged loudly and never matched, so incomplete
/// coverage shows up in the logs instead of as silently vanishing metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    S3,
    Es,
    Rds,
    Unknown,
}

impl Namespace {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "AWS/S3" => Namespace::S3,
            "AWS/ES" => Namespace::Es,
            "AWS/RDS" => Namespace::Rds,
            _ => Namespace::Unknown,
        }
    }
}

/// Fully-qualified identity of a cloud resource for tag lookup. Doubles as
/// the tag-cache key, so lookups for the same resource via different record
/// types share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceLocator {
    Bucket { name: String },
    SearchDomain { arn: String },
    DbInstance { arn: String, name: String },
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocator::Bucket { name } => write!(f, "bucket {name}"),
            ResourceLocator::SearchDomain { arn } => write!(f, "search domain {arn}"),
            ResourceLocator::DbInstance { arn, .. } => write!(f, "db instance {arn}"),
        }
    }
}

pub fn db_instance_arn(region: &str, account_id: &str, name: &str) -> String {
    format!("arn:{ARN_PARTITION}:rds:{region}:{account_id}:db:{name}")
}

pub fn search_domain_arn(region: &str, account_id: &str, name: &str) -> String {
    format!("arn:{ARN_PARTITION}:es:{region}:{account_id}:domain/{name}")
}

/// Attribute a log group to a managed database instance. A log group
/// without a name segment is not resource-attributable; a name outside the
/// environment prefix belongs to some other environment. Both are ordinary
/// no-matches, not errors.
pub fn classify_log(
    log_group: &str,
    prefixes: &Prefixes,
    region: &str,
    account_id: &str,
) -> Option<ResourceLocator> {
    let name = log_group.split('/').nth(LOG_GROUP_NAME_SEGMENT)?;
    if name.is_empty() || !name.starts_with(&prefixes.db_instance) {
        debug!("log group {log_group} is out of scope for this environment");
        return None;
    }
    Some(ResourceLocator::DbInstance {
        arn: db_instance_arn(region, account_id, name),
        name: name.to_string(),
    })
}

/// Attribute a metric event to a resource via its namespace-specific
/// dimension key.
pub fn classify_metric(
    metric: &MetricEvent,
    prefixes: &Prefixes,
    region: &str,
    account_id: &str,
) -> Option<ResourceLocator> {
    match Namespace::parse(&metric.namespace) {
        Namespace::S3 => {
            let name = metric.dimensions.get("BucketName")?;
            if !name.starts_with(&prefixes.bucket) {
                debug!("bucket {name} is out of scope for this environment");
                return None;
            }
            Some(ResourceLocator::Bucket { name: name.clone() })
        }
        Namespace::Es => {
            let name = metric.dimensions.get("DomainName")?;
            if !name.starts_with(&prefixes.search_domain) {
                debug!("search domain {name} is out of scope for this environment");
                return None;
            }
            Some(ResourceLocator::SearchDomain {
                arn: search_domain_arn(region, account_id, name),
            })
        }
        Namespace::Rds => {
            let name = metric.dimensions.get("DBInstanceIdentifier")?;
            if !name.starts_with(&prefixes.db_instance) {
                debug!("db instance {name} is out of scope for this environment");
                return None;
            }
            Some(ResourceLocator::DbInstance {
                arn: db_instance_arn(region, account_id, name),
                name: name.clone(),
            })
        }
        Namespace::Unknown => {
            error!(
                "unhandled metric namespace {}: extend the classifier before its metrics can be enriched",
                metric.namespace
            );
            None
        }
    }
}
