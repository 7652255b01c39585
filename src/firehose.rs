//! Conversion between the delivery-stream envelope and internal records.
//! Transport base64 is handled by the envelope types, so everything past
//! this module works on raw payload bytes.

use aws_lambda_events::encodings::Base64Data;
use aws_lambda_events::firehose::{
    KinesisFirehoseEvent, KinesisFirehoseResponse, KinesisFirehoseResponseRecord,
    KinesisFirehoseResponseRecordMetadata,
};

use crate::types::{InboundRecord, OutboundRecord};

pub fn inbound_records(event: KinesisFirehoseEvent) -> Vec<InboundRecord> {
    event
        .records
        .into_iter()
        .map(|record| InboundRecord {
            record_id: record.record_id.unwrap_or_default(),
            data: record.data.0,
        })
        .collect()
}

pub fn response(records: Vec<OutboundRecord>) -> KinesisFirehoseResponse {
    KinesisFirehoseResponse {
        records: records
            .into_iter()
            .map(|record| KinesisFirehoseResponseRecord {
                record_id: Some(record.record_id),
                result: Some(record.disposition.as_str().to_string()),
                data: Base64Data(record.data),
                metadata: KinesisFirehoseResponseRecordMetadata {
                    partition_keys: Default::default(),
                },
            })
            .collect(),
    }
}
