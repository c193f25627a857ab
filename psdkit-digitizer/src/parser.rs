//! Digitizer file decoder.

use crate::layout::{decode_record, PREAMBLE_SIZE, RECORD_SIZE};
use crate::{Error, Result};
use psdkit_core::RawEventRecord;
use serde::{Deserialize, Serialize};
use std::slice::ChunksExact;

/// Configuration for the record decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Bytes skipped at the start of the buffer before the first record.
    pub preamble_len: usize,
    /// Stop after this many records.
    pub max_records: Option<usize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            preamble_len: PREAMBLE_SIZE,
            max_records: None,
        }
    }
}

impl DecoderConfig {
    /// Creates a decoder configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preamble length.
    #[must_use]
    pub fn with_preamble_len(mut self, len: usize) -> Self {
        self.preamble_len = len;
        self
    }

    /// Limits the number of decoded records.
    #[must_use]
    pub fn with_max_records(mut self, max: Option<usize>) -> Self {
        self.max_records = max;
        self
    }
}

/// Shape of a buffer as seen by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeSummary {
    /// Total input length in bytes.
    pub input_len: usize,
    /// Number of complete records after the preamble.
    pub record_count: usize,
    /// Bytes after the last complete record. These are ignored.
    pub trailing_bytes: usize,
}

/// Lazy iterator over the complete records of a buffer.
///
/// Created by [`RecordDecoder::records`]. A trailing partial record is never yielded.
pub struct Records<'a> {
    chunks: std::iter::Take<ChunksExact<'a, u8>>,
}

impl Iterator for Records<'_> {
    type Item = RawEventRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        // `chunks_exact` only yields RECORD_SIZE-long slices.
        let buf: &[u8; RECORD_SIZE] = chunk.try_into().ok()?;
        Some(decode_record(buf))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Records<'_> {}

/// Decoder for digitizer event files.
#[derive(Debug, Clone, Default)]
pub struct RecordDecoder {
    config: DecoderConfig,
}

impl RecordDecoder {
    /// Creates a new decoder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DecoderConfig::default(),
        }
    }

    /// Creates a new decoder with the given configuration.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Returns the decoder configuration.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    fn body<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        data.get(self.config.preamble_len..)
            .ok_or(Error::TruncatedPreamble {
                len: data.len(),
                preamble: self.config.preamble_len,
            })
    }

    /// Describes how `data` splits into preamble, records and trailing bytes.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedPreamble`] if `data` is shorter than the preamble.
    pub fn summarize(&self, data: &[u8]) -> Result<DecodeSummary> {
        let body = self.body(data)?;
        let complete = body.len() / RECORD_SIZE;
        let record_count = self
            .config
            .max_records
            .map_or(complete, |max| complete.min(max));
        Ok(DecodeSummary {
            input_len: data.len(),
            record_count,
            trailing_bytes: body.len() % RECORD_SIZE,
        })
    }

    /// Returns a lazy iterator over the records in `data`.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedPreamble`] if `data` is shorter than the preamble.
    pub fn records<'a>(&self, data: &'a [u8]) -> Result<Records<'a>> {
        let body = self.body(data)?;
        let limit = self.config.max_records.unwrap_or(usize::MAX);
        Ok(Records {
            chunks: body.chunks_exact(RECORD_SIZE).take(limit),
        })
    }

    /// Decodes all records in `data`.
    ///
    /// The preamble is skipped without inspection and a trailing span shorter
    /// than one record is dropped.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedPreamble`] if `data` is shorter than the preamble.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<RawEventRecord>> {
        let summary = self.summarize(data)?;
        if summary.trailing_bytes > 0 {
            log::debug!(
                "ignoring {} trailing bytes after {} records",
                summary.trailing_bytes,
                summary.record_count
            );
        }
        Ok(self.records(data)?.collect())
    }
}

/// Decodes `data` with the default layout (8-byte preamble, 50-byte records).
///
/// # Errors
/// Returns [`Error::TruncatedPreamble`] if `data` is shorter than the preamble.
pub fn decode(data: &[u8]) -> Result<Vec<RawEventRecord>> {
    RecordDecoder::new().decode(data)
}
