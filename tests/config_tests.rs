//! Tests for environment-variable configuration loading. Env vars are
//! process-global, so these run serially.

use std::env;

use serial_test::serial;
use tagstream::config::{LogTransformConfig, MetricTransformConfig, ProvisionerConfig};
use tagstream::naming::Environment;

const ALL_KEYS: [&str; 6] = [
    "ENVIRONMENT",
    "AWS_REGION",
    "ACCOUNT_ID",
    "S3_BUCKET_NAME",
    "FIREHOSE_ARN",
    "ROLE_ARN",
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

fn set_common() {
    env::set_var("ENVIRONMENT", "development");
    env::set_var("AWS_REGION", "us-gov-west-1");
    env::set_var("ACCOUNT_ID", "123456");
}

#[test]
#[serial]
fn test_log_transform_config_from_env() {
    clear_env();
    set_common();
    env::set_var("S3_BUCKET_NAME", "test-bucket");

    let cfg = LogTransformConfig::from_env().unwrap();
    assert_eq!(cfg.environment, Environment::Development);
    assert_eq!(cfg.region, "us-gov-west-1");
    assert_eq!(cfg.account_id, "123456");
    assert_eq!(cfg.bucket, "test-bucket");
}

#[test]
#[serial]
fn test_log_transform_config_requires_bucket() {
    clear_env();
    set_common();

    let err = LogTransformConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("S3_BUCKET_NAME"));
}

#[test]
#[serial]
fn test_missing_environment_fails() {
    clear_env();
    env::set_var("AWS_REGION", "us-gov-west-1");
    env::set_var("ACCOUNT_ID", "123456");

    let err = MetricTransformConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("ENVIRONMENT"));
}

#[test]
#[serial]
fn test_invalid_environment_fails() {
    clear_env();
    set_common();
    env::set_var("ENVIRONMENT", "qa");

    let err = MetricTransformConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("invalid environment"));
}

#[test]
#[serial]
fn test_metric_transform_config_from_env() {
    clear_env();
    set_common();

    let cfg = MetricTransformConfig::from_env().unwrap();
    assert_eq!(cfg.environment, Environment::Development);
    assert_eq!(cfg.region, "us-gov-west-1");
}

#[test]
#[serial]
fn test_provisioner_config_from_env() {
    clear_env();
    env::set_var("ENVIRONMENT", "staging");
    env::set_var("FIREHOSE_ARN", "arn:aws-us-gov:firehose:us-gov-west-1:123456:deliverystream/logs");
    env::set_var("ROLE_ARN", "arn:aws-us-gov:iam::123456:role/subscriber");

    let cfg = ProvisionerConfig::from_env().unwrap();
    assert_eq!(cfg.environment, Environment::Staging);
    assert!(cfg.firehose_arn.contains("deliverystream"));
    assert!(cfg.role_arn.contains("role"));
}

#[test]
#[serial]
fn test_provisioner_config_requires_role_arn() {
    clear_env();
    env::set_var("ENVIRONMENT", "staging");
    env::set_var("FIREHOSE_ARN", "arn:aws-us-gov:firehose:us-gov-west-1:123456:deliverystream/logs");

    let err = ProvisionerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("ROLE_ARN"));
}
