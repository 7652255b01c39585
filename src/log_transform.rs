//! Batch transform driver for the log pipeline: decode each delivery-stream
//! record, enrich its log events, aggregate survivors into one bulk-storage
//! object and report per-record dispositions.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::codec;
use crate::enrich::Enricher;
use crate::s3_sink::{batch_key, BulkStore};
use crate::types::{Disposition, EnrichedLogEntry, InboundRecord, LogBatch, OutboundRecord};

pub struct LogTransformer {
    enricher: Enricher,
    store: Arc<dyn BulkStore>,
}

impl LogTransformer {
    pub fn new(enricher: Enricher, store: Arc<dyn BulkStore>) -> Self {
        Self { enricher, store }
    }

    /// One pass over the inbound batch. Output preserves input order and
    /// count; past the per-record loop the only fatal failure is the bulk
    /// write.
    pub async fn process_batch(&self, records: Vec<InboundRecord>) -> Result<Vec<OutboundRecord>> {
        let mut out = Vec::with_capacity(records.len());
        let mut aggregated: Vec<EnrichedLogEntry> = Vec::new();

        for record in records {
            match self.process_record(&record).await {
                Ok(entries) if !entries.is_empty() => {
                    info!(
                        "record {}: {} enriched log entries",
                        record.record_id,
                        entries.len()
                    );
                    aggregated.extend(entries);
                    out.push(OutboundRecord {
                        record_id: record.record_id,
                        disposition: Disposition::Ok,
                        data: Vec::new(),
                    });
                }
                Ok(_) => {
                    out.push(OutboundRecord {
                        record_id: record.record_id,
                        disposition: Disposition::Dropped,
                        data: Vec::new(),
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

        if !aggregated.is_empty() {
            let body = codec::gzip_ndjson(&aggregated)?;
            let key = batch_key(chrono::Utc::now());
            // Ok-marked records exist only in this object; a failed write
            // must fail the invocation so the runtime reprocesses them.
            self.store
                .put_batch(&key, body)
                .await
                .context("writing enriched batch to bulk storage")?;
            info!("pushed {} enriched entries to {key}", aggregated.len());
        }

        Ok(out)
    }

    async fn process_record(&self, record: &InboundRecord) -> Result<Vec<EnrichedLogEntry>> {
        let payload = codec::gunzip(&record.data)?;
        let text = String::from_utf8(payload).context("record payload is not utf-8")?;

        let mut entries = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let batch: LogBatch = match serde_json::from_str(line) {
                Ok(batch) => batch,
                Err(err) => {
                    warn!("skipping undecodable log line: {err}");
                    continue;
                }
            };
            if let Some(enriched) = self.enricher.enrich_log_batch(batch).await {
                entries.extend(enriched);
            }
        }
        Ok(entries)
    }
}
