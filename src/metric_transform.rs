//! Batch transform driver for the metric pipeline. Unlike the log variant
//! there is no shared bulk-storage side effect: each record's survivors
//! become that record's own output payload.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::codec;
use crate::enrich::Enricher;
use crate::types::{Disposition, InboundRecord, MetricEvent, OutboundRecord};

/// Metric-stream envelope keys stripped before any further processing.
pub const STREAM_ENVELOPE_KEYS: [&str; 3] = ["metric_stream_name", "account_id", "region"];

/// Internal dimension excluded from emitted records. The pop happens after
/// enrichment, so classification still sees it.
const CLIENT_ID_DIMENSION: &str = "ClientId";

pub struct MetricTransformer {
    enricher: Enricher,
}

impl MetricTransformer {
    pub fn new(enricher: Enricher) -> Self {
        Self { enricher }
    }

    /// One pass over the inbound batch. Output preserves input order and
    /// count.
    pub async fn process_batch(&self, records: Vec<InboundRecord>) -> Result<Vec<OutboundRecord>> {
        let mut out = Vec::with_capacity(records.len());

        for record in records {
            match self.process_record(&record).await {
                Ok(Some(data)) => {
                    out.push(OutboundRecord {
                        record_id: record.record_id,
                        disposition: Disposition::Ok,
                        data,
                    });
                }
                Ok(None) => {
                    out.push(OutboundRecord {
                        record_id: record.record_id,
                        disposition: Disposition::Dropped,
                        data: record.data,
                    });
                }
                Err(err) => {
                    warn!("error processing record {}: {err:?}", record.record_id);
                    out.push(OutboundRecord {
                        record_id: record.record_id,
                        disposition: Disposition::ProcessingFailed,
                        data: record.data,
                    });
                }
            }
        }

        Ok(out)
    }

    async fn process_record(&self, record: &InboundRecord) -> Result<Option<Vec<u8>>> {
        let text = std::str::from_utf8(&record.data).context("record payload is not utf-8")?;

        let mut survivors: Vec<MetricEvent> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut metric: MetricEvent = match serde_json::from_str(line) {
                Ok(metric) => metric,
                Err(err) => {
                    warn!("skipping undecodable metric line: {err}");
                    continue;
                }
            };
            for key in STREAM_ENVELOPE_KEYS {
                metric.extra.remove(key);
            }
            if let Some(mut enriched) = self.enricher.enrich_metric(metric).await {
                enriched.dimensions.remove(CLIENT_ID_DIMENSION);
                survivors.push(enriched);
            }
        }

        info!(
            "record {}: {} enriched metrics",
            record.record_id,
            survivors.len()
        );
        if survivors.is_empty() {
            return Ok(None);
        }
        codec::ndjson(&survivors).map(Some)
    }
}
