//! Tests for resource classification.

use std::collections::BTreeMap;

use tagstream::classify::{classify_log, classify_metric, Namespace, ResourceLocator};
use tagstream::naming::{Environment, Prefixes};
use tagstream::types::MetricEvent;

const REGION: &str = "us-gov-west-1";
const ACCOUNT: &str = "123456";

fn dev_prefixes() -> Prefixes {
    Prefixes::for_environment(Environment::Development)
}

fn metric(namespace: &str, metric_name: &str, dimensions: &[(&str, &str)]) -> MetricEvent {
    MetricEvent {
        namespace: namespace.to_string(),
        metric_name: metric_name.to_string(),
        dimensions: dimensions
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        tags: None,
        extra: serde_json::Map::new(),
    }
}

#[test]
fn test_namespace_parse() {
    assert_eq!(Namespace::parse("AWS/S3"), Namespace::S3);
    assert_eq!(Namespace::parse("AWS/ES"), Namespace::Es);
    assert_eq!(Namespace::parse("AWS/RDS"), Namespace::Rds);
    assert_eq!(Namespace::parse("AWS/Lambda"), Namespace::Unknown);
    assert_eq!(Namespace::parse(""), Namespace::Unknown);
}

#[test]
fn test_classify_log_matching_group() {
    let locator = classify_log(
        "/aws/rds/instance/cg-aws-broker-dev-test/postgresql",
        &dev_prefixes(),
        REGION,
        ACCOUNT,
    )
    .unwrap();

    match locator {
        ResourceLocator::DbInstance { arn, name } => {
            assert_eq!(name, "cg-aws-broker-dev-test");
            assert_eq!(
                arn,
                "arn:aws-us-gov:rds:us-gov-west-1:123456:db:cg-aws-broker-dev-test"
            );
        }
        other => panic!("unexpected locator {other:?}"),
    }
}

#[test]
fn test_classify_log_foreign_environment_is_no_match() {
    let locator = classify_log(
        "/aws/rds/instance/cg-aws-broker-prod-live/postgresql",
        &dev_prefixes(),
        REGION,
        ACCOUNT,
    );
    assert!(locator.is_none());
}

#[test]
fn test_classify_log_without_name_segment_is_no_match() {
    assert!(classify_log("/aws/lambda", &dev_prefixes(), REGION, ACCOUNT).is_none());
    assert!(classify_log("", &dev_prefixes(), REGION, ACCOUNT).is_none());
}

#[test]
fn test_classify_metric_bucket() {
    let event = metric("AWS/S3", "BucketSizeBytes", &[("BucketName", "development-cg-data")]);
    let locator = classify_metric(&event, &dev_prefixes(), REGION, ACCOUNT).unwrap();
    assert_eq!(
        locator,
        ResourceLocator::Bucket {
            name: "development-cg-data".to_string()
        }
    );
}

#[test]
fn test_classify_metric_bucket_prefix_mismatch() {
    let event = metric("AWS/S3", "BucketSizeBytes", &[("BucketName", "some-other-bucket")]);
    assert!(classify_metric(&event, &dev_prefixes(), REGION, ACCOUNT).is_none());
}

#[test]
fn test_classify_metric_search_domain() {
    let event = metric("AWS/ES", "ClusterStatus.green", &[("DomainName", "cg-broker-dev-main")]);
    let locator = classify_metric(&event, &dev_prefixes(), REGION, ACCOUNT).unwrap();
    assert_eq!(
        locator,
        ResourceLocator::SearchDomain {
            arn: "arn:aws-us-gov:es:us-gov-west-1:123456:domain/cg-broker-dev-main".to_string()
        }
    );
}

#[test]
fn test_classify_metric_db_instance() {
    let event = metric(
        "AWS/RDS",
        "FreeStorageSpace",
        &[("DBInstanceIdentifier", "cg-aws-broker-dev-test")],
    );
    let locator = classify_metric(&event, &dev_prefixes(), REGION, ACCOUNT).unwrap();
    match locator {
        ResourceLocator::DbInstance { name, .. } => assert_eq!(name, "cg-aws-broker-dev-test"),
        other => panic!("unexpected locator {other:?}"),
    }
}

#[test]
fn test_classify_metric_missing_dimension_is_no_match() {
    let event = metric("AWS/RDS", "FreeStorageSpace", &[("ClientId", "123456")]);
    assert!(classify_metric(&event, &dev_prefixes(), REGION, ACCOUNT).is_none());
}

#[test]
fn test_classify_metric_unknown_namespace_is_no_match() {
    let event = metric("AWS/Lambda", "Invocations", &[("FunctionName", "cg-fn")]);
    assert!(classify_metric(&event, &dev_prefixes(), REGION, ACCOUNT).is_none());
}

#[test]
fn test_classify_metric_empty_dimensions() {
    let mut event = metric("AWS/S3", "BucketSizeBytes", &[]);
    event.dimensions = BTreeMap::new();
    assert!(classify_metric(&event, &dev_prefixes(), REGION, ACCOUNT).is_none());
}
