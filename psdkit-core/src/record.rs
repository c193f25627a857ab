//! Raw digitizer event records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column names of the record table, in record field order.
///
/// The spelling (including `heigth`) is part of the exported table format.
pub const RECORD_FIELD_NAMES: [&str; 21] = [
    "title1_4",
    "title2_4",
    "title3_4",
    "title4_4",
    "deviceId",
    "channelId",
    "timestamp",
    "cfd_y1",
    "cfd_y2",
    "heigth",
    "baseline",
    "qLong",
    "qShort",
    "psdValue",
    "eventCounter",
    "eventCounterPSD",
    "decimationFactor",
    "postfix1",
    "postfix2",
    "postfix3",
    "postfix4",
];

/// One event record as written by the digitizer.
///
/// Records are created once by the decoder and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawEventRecord {
    /// Leading tag bytes.
    pub title: [u8; 4],
    /// Digitizer serial/device identifier.
    pub device_id: u32,
    /// Input channel on the digitizer.
    pub channel_id: u16,
    /// Trigger timestamp in digitizer clock ticks.
    pub timestamp: u64,
    /// First CFD sample used for timing interpolation.
    pub cfd_y1: i16,
    /// Second CFD sample used for timing interpolation.
    pub cfd_y2: i16,
    /// Pulse height above baseline.
    pub height: i16,
    /// Pre-trigger baseline level.
    pub baseline: i16,
    /// Charge integrated over the long gate.
    pub q_long: i32,
    /// Charge integrated over the short gate.
    pub q_short: i32,
    /// PSD value as computed by the digitizer firmware.
    pub psd_value: i16,
    /// Running event counter.
    pub event_counter: u32,
    /// Running counter of events that passed the firmware PSD cut.
    pub event_counter_psd: u32,
    /// Sample-rate decimation setting.
    pub decimation_factor: u16,
    /// Trailing tag bytes.
    pub postfix: [u8; 4],
}

impl RawEventRecord {
    /// Returns the record's fields as table cells, ordered like [`RECORD_FIELD_NAMES`].
    #[must_use]
    pub fn table_row(&self) -> [String; 21] {
        [
            self.title[0].to_string(),
            self.title[1].to_string(),
            self.title[2].to_string(),
            self.title[3].to_string(),
            self.device_id.to_string(),
            self.channel_id.to_string(),
            self.timestamp.to_string(),
            self.cfd_y1.to_string(),
            self.cfd_y2.to_string(),
            self.height.to_string(),
            self.baseline.to_string(),
            self.q_long.to_string(),
            self.q_short.to_string(),
            self.psd_value.to_string(),
            self.event_counter.to_string(),
            self.event_counter_psd.to_string(),
            self.decimation_factor.to_string(),
            self.postfix[0].to_string(),
            self.postfix[1].to_string(),
            self.postfix[2].to_string(),
            self.postfix[3].to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_row_order() {
        let record = RawEventRecord {
            title: [1, 2, 3, 4],
            device_id: 7,
            channel_id: 1,
            timestamp: 123_456_789,
            height: -12,
            q_long: 1000,
            q_short: 300,
            event_counter: 5,
            event_counter_psd: 6,
            decimation_factor: 2,
            postfix: [9, 8, 7, 6],
            ..RawEventRecord::default()
        };

        let row = record.table_row();
        assert_eq!(row.len(), RECORD_FIELD_NAMES.len());
        assert_eq!(row[0..4], ["1", "2", "3", "4"]);
        assert_eq!(row[4], "7");
        assert_eq!(row[6], "123456789");
        assert_eq!(row[9], "-12");
        assert_eq!(row[11], "1000");
        assert_eq!(row[12], "300");
        assert_eq!(row[16], "2");
        assert_eq!(row[17..21], ["9", "8", "7", "6"]);
    }

    #[test]
    fn test_field_names_are_unique() {
        for (i, a) in RECORD_FIELD_NAMES.iter().enumerate() {
            for b in &RECORD_FIELD_NAMES[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(RECORD_FIELD_NAMES[11], "qLong");
        assert_eq!(RECORD_FIELD_NAMES[12], "qShort");
    }
}
