use std::io::{Read, Write};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;

pub fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .context("decompressing record payload")?;
    Ok(out)
}

/// Newline-delimited JSON, one line per item, no compression.
pub fn ndjson<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(items.len() * 256);
    for item in items {
        serde_json::to_writer(&mut out, item).context("serializing output line")?;
        out.push(b'\n');
    }
    Ok(out)
}

/// Newline-delimited JSON, gzip-compressed, for bulk-storage objects.
pub fn gzip_ndjson<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    for item in items {
        serde_json::to_writer(&mut encoder, item).context("serializing output line")?;
        encoder.write_all(b"\n").context("compressing output line")?;
    }
    encoder.finish().context("finishing gzip stream")
}
