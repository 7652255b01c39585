//! Tagstream - ownership-tag enrichment for streamed cloud telemetry.

pub mod classify;
pub mod codec;
pub mod config;
pub mod enrich;
pub mod firehose;
pub mod log_transform;
pub mod metric_transform;
pub mod naming;
pub mod s3_sink;
pub mod subscribe;
pub mod tag_api;
pub mod tag_cache;
pub mod types;
