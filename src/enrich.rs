use crate::classify::{self, ResourceLocator};
use crate::naming::Prefixes;
use crate::tag_cache::{CapacityCache, TagCache};
use crate::types::{EnrichedLogEntry, LogBatch, MetricEvent};

/// Storage-capacity gauge that triggers the synthesized `db_size` tag.
pub const DB_FREE_STORAGE_METRIC: &str = "FreeStorageSpace";
pub const DB_SIZE_TAG: &str = "db_size";

/// Per-event enrichment: classify, resolve tags through the cache, attach.
/// Returning `None` means the caller drops the event; nothing in here is
/// ever fatal for the batch.
pub struct Enricher {
    prefixes: Prefixes,
    region: String,
    account_id: String,
    tags: TagCache,
    capacity: CapacityCache,
}

impl Enricher {
    pub fn new(
        prefixes: Prefixes,
        region: impl Into<String>,
        account_id: impl Into<String>,
        tags: TagCache,
        capacity: CapacityCache,
    ) -> Self {
        Self {
            prefixes,
            region: region.into(),
            account_id: account_id.into(),
            tags,
            capacity,
        }
    }

    /// One tag lookup covers every entry in the batch: a subscription batch
    /// always belongs to a single log group.
    pub async fn enrich_log_batch(&self, batch: LogBatch) -> Option<Vec<EnrichedLogEntry>> {
        let locator =
            classify::classify_log(&batch.log_group, &self.prefixes, &self.region, &self.account_id)?;
        let tags = self.tags.get_tags(&locator).await;
        if tags.is_empty() {
            return None;
        }

        let entries = batch
            .events
            .into_iter()
            .map(|event| EnrichedLogEntry {
                log_group: batch.log_group.clone(),
                log_stream: batch.log_stream.clone(),
                message: event.message,
                timestamp: event.timestamp,
                tags: tags.clone(),
            })
            .collect();
        Some(entries)
    }

    pub async fn enrich_metric(&self, mut metric: MetricEvent) -> Option<MetricEvent> {
        let locator =
            classify::classify_metric(&metric, &self.prefixes, &self.region, &self.account_id)?;

        // The cache hands back a copy, so the db_size merge below never
        // touches the cached base mapping.
        let mut tags = self.tags.get_tags(&locator).await;
        if tags.is_empty() {
            return None;
        }

        if let ResourceLocator::DbInstance { name, .. } = &locator {
            if metric.metric_name == DB_FREE_STORAGE_METRIC {
                if let Some(size) = self.capacity.allocated_storage_gb(name).await {
                    tags.insert(DB_SIZE_TAG.to_string(), size.to_string());
                }
            }
        }

        metric.tags = Some(tags);
        Some(metric)
    }
}
