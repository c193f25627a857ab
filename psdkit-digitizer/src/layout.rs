//! Byte layout of a digitizer event record.
//!
//! Records are 50 bytes, little-endian, packed without padding:
//!
//! | offset | width | field |
//! |-------:|------:|-------|
//! | 0  | 4 × u8 | title |
//! | 4  | u32 | device id |
//! | 8  | u16 | channel id |
//! | 10 | u64 | timestamp |
//! | 18 | 4 × i16 | cfd_y1, cfd_y2, height, baseline |
//! | 26 | 2 × i32 | q_long, q_short |
//! | 34 | i16 | psd value |
//! | 36 | 2 × u32 | event counter, event counter PSD |
//! | 44 | u16 | decimation factor |
//! | 46 | 4 × u8 | postfix |

use psdkit_core::RawEventRecord;

/// Size of one encoded record in bytes.
pub const RECORD_SIZE: usize = 50;

/// Length of the opaque file preamble in bytes.
pub const PREAMBLE_SIZE: usize = 8;

/// Sequential little-endian reader over one record.
struct FieldReader<'a> {
    buf: &'a [u8; RECORD_SIZE],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8; RECORD_SIZE]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    #[inline]
    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    #[inline]
    fn i16(&mut self) -> i16 {
        i16::from_le_bytes(self.take())
    }

    #[inline]
    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    #[inline]
    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }

    #[inline]
    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }
}

/// Decodes one record from its fixed-size byte span.
///
/// Every 50-byte pattern is a valid record, so this cannot fail.
#[must_use]
pub fn decode_record(buf: &[u8; RECORD_SIZE]) -> RawEventRecord {
    let mut r = FieldReader::new(buf);
    RawEventRecord {
        title: r.take(),
        device_id: r.u32(),
        channel_id: r.u16(),
        timestamp: r.u64(),
        cfd_y1: r.i16(),
        cfd_y2: r.i16(),
        height: r.i16(),
        baseline: r.i16(),
        q_long: r.i32(),
        q_short: r.i32(),
        psd_value: r.i16(),
        event_counter: r.u32(),
        event_counter_psd: r.u32(),
        decimation_factor: r.u16(),
        postfix: r.take(),
    }
}

/// Encodes a record into the on-disk layout. Inverse of [`decode_record`].
#[must_use]
pub fn encode_record(record: &RawEventRecord) -> [u8; RECORD_SIZE] {
    let mut out = [0u8; RECORD_SIZE];
    let fields: [&[u8]; 15] = [
        &record.title,
        &record.device_id.to_le_bytes(),
        &record.channel_id.to_le_bytes(),
        &record.timestamp.to_le_bytes(),
        &record.cfd_y1.to_le_bytes(),
        &record.cfd_y2.to_le_bytes(),
        &record.height.to_le_bytes(),
        &record.baseline.to_le_bytes(),
        &record.q_long.to_le_bytes(),
        &record.q_short.to_le_bytes(),
        &record.psd_value.to_le_bytes(),
        &record.event_counter.to_le_bytes(),
        &record.event_counter_psd.to_le_bytes(),
        &record.decimation_factor.to_le_bytes(),
        &record.postfix,
    ];

    let mut pos = 0;
    for field in fields {
        out[pos..pos + field.len()].copy_from_slice(field);
        pos += field.len();
    }
    out
}
