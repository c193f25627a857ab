#![allow(clippy::cast_possible_truncation)]
use psdkit_digitizer::{decode, RawEventRecord, RecordDecoder, PREAMBLE_SIZE, RECORD_SIZE};

// Hand-assembled record, independent of `encode_record`.
fn scenario_bytes() -> Vec<u8> {
    let mut data = vec![0u8; PREAMBLE_SIZE];
    data.extend_from_slice(&[1, 2, 3, 4]); // title
    data.extend_from_slice(&7u32.to_le_bytes()); // deviceId
    data.extend_from_slice(&1u16.to_le_bytes()); // channelId
    data.extend_from_slice(&123_456_789u64.to_le_bytes()); // timestamp
    data.extend_from_slice(&[0u8; 8]); // cfd_y1, cfd_y2, height, baseline
    data.extend_from_slice(&1000i32.to_le_bytes()); // qLong
    data.extend_from_slice(&300i32.to_le_bytes()); // qShort
    data.extend_from_slice(&0i16.to_le_bytes()); // psdValue
    data.extend_from_slice(&1u32.to_le_bytes()); // eventCounter
    data.extend_from_slice(&1u32.to_le_bytes()); // eventCounterPSD
    data.extend_from_slice(&1u16.to_le_bytes()); // decimationFactor
    data.extend_from_slice(&[0, 0, 0, 0]); // postfix
    data
}

#[test]
fn test_single_record_scenario() {
    let data = scenario_bytes();
    assert_eq!(data.len(), PREAMBLE_SIZE + RECORD_SIZE);

    let records = decode(&data).unwrap();
    assert_eq!(records.len(), 1);

    let expected = RawEventRecord {
        title: [1, 2, 3, 4],
        device_id: 7,
        channel_id: 1,
        timestamp: 123_456_789,
        cfd_y1: 0,
        cfd_y2: 0,
        height: 0,
        baseline: 0,
        q_long: 1000,
        q_short: 300,
        psd_value: 0,
        event_counter: 1,
        event_counter_psd: 1,
        decimation_factor: 1,
        postfix: [0, 0, 0, 0],
    };
    assert_eq!(records[0], expected);
}

#[test]
fn test_record_count_independent_of_tail() {
    let record = scenario_bytes();
    let body = &record[PREAMBLE_SIZE..];

    for n in 0..4 {
        for k in [0, 1, 13, RECORD_SIZE - 1] {
            let mut data = vec![0xAB; PREAMBLE_SIZE];
            for _ in 0..n {
                data.extend_from_slice(body);
            }
            data.extend((0..k).map(|i| i as u8));
            assert_eq!(decode(&data).unwrap().len(), n, "n = {n}, k = {k}");
        }
    }
}

#[test]
fn test_decode_is_deterministic() {
    let mut data = scenario_bytes();
    data.extend_from_slice(&scenario_bytes()[PREAMBLE_SIZE..]);
    data.extend_from_slice(&[9, 9, 9]);

    let decoder = RecordDecoder::new();
    let a = decoder.decode(&data).unwrap();
    let b = decoder.decode(&data).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}

#[test]
fn test_preamble_is_not_inspected() {
    let mut data = scenario_bytes();
    data[..PREAMBLE_SIZE].copy_from_slice(&[0xFF; PREAMBLE_SIZE]);
    let records = decode(&data).unwrap();
    assert_eq!(records[0].device_id, 7);
}
