use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tag key to tag value. An empty mapping means "no usable tags" and the
/// owning record is dropped rather than enriched.
pub type TagMap = BTreeMap<String, String>;

/// One delivery-stream record after transport decoding.
#[derive(Debug, Clone)]
pub struct InboundRecord {
    pub record_id: String,
    pub data: Vec<u8>,
}

/// Per-record processing outcome reported back to the delivery stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ok,
    Dropped,
    ProcessingFailed,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::Ok => "Ok",
            Disposition::Dropped => "Dropped",
            Disposition::ProcessingFailed => "ProcessingFailed",
        }
    }
}

/// Output record, one per input record, in input order.
#[derive(Debug, Clone)]
pub struct OutboundRecord {
    pub record_id: String,
    pub disposition: Disposition,
    pub data: Vec<u8>,
}

/// One decoded line of a CloudWatch Logs subscription payload. All entries
/// in a batch belong to the same log group, so tags are resolved once per
/// batch rather than once per entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LogBatch {
    #[serde(rename = "logGroup")]
    pub log_group: String,
    #[serde(rename = "logStream")]
    pub log_stream: String,
    #[serde(rename = "logEvents")]
    pub events: Vec<LogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: i64,
    pub message: String,
}

/// Bulk-storage output line for the log pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedLogEntry {
    #[serde(rename = "logGroup")]
    pub log_group: String,
    #[serde(rename = "logStream")]
    pub log_stream: String,
    pub message: String,
    pub timestamp: i64,
    #[serde(rename = "Tags")]
    pub tags: TagMap,
}

/// One decoded line of a metric-stream payload. Fields the pipeline does
/// not interpret ride along in `extra` and are re-emitted unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEvent {
    pub namespace: String,
    pub metric_name: String,
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagMap>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
