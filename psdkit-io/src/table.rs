//! Re-import of exported record tables.
//!
//! Only the `qLong` and `qShort` columns are read. Rows that cannot be parsed
//! (missing columns, non-integer cells, wrong field count) are skipped and
//! counted; parsed rows go through the same validation as decoded records.

use crate::Result;
use psdkit_analysis::DecodedDataset;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Deserialize)]
struct ChargeRow {
    #[serde(rename = "qLong")]
    q_long: i32,
    #[serde(rename = "qShort")]
    q_short: i32,
}

/// Events re-derived from a record table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableImport {
    /// Validated events; carries no raw records.
    pub dataset: DecodedDataset,
    /// Data rows seen, excluding the header.
    pub rows: usize,
    /// Rows skipped because they could not be parsed.
    pub skipped_rows: usize,
}

/// Reads a record table from any reader.
///
/// # Errors
/// Returns an error only if the underlying reader fails. Malformed rows are
/// counted in [`TableImport::skipped_rows`] instead.
pub fn read_record_table<R: Read>(reader: R) -> Result<TableImport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut charges = Vec::new();
    let mut rows = 0usize;
    let mut skipped_rows = 0usize;

    for row in csv_reader.deserialize::<ChargeRow>() {
        rows += 1;
        match row {
            Ok(row) => charges.push((row.q_long, row.q_short)),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::debug!("skipping table row {rows}: {e}");
                skipped_rows += 1;
            }
        }
    }

    if skipped_rows > 0 {
        log::warn!("skipped {skipped_rows} of {rows} malformed table rows");
    }

    Ok(TableImport {
        dataset: DecodedDataset::from_charges(charges),
        rows,
        skipped_rows,
    })
}

/// Reads a record table from a file.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn read_record_table_file<P: AsRef<Path>>(path: P) -> Result<TableImport> {
    let file = File::open(path)?;
    read_record_table(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::CsvExporter;
    use psdkit_analysis::load;
    use psdkit_core::{Exporter, RawEventRecord};
    use psdkit_digitizer::{encode_record, PREAMBLE_SIZE};

    const HEADER: &str = "title1_4,title2_4,title3_4,title4_4,deviceId,channelId,timestamp,\
                          cfd_y1,cfd_y2,heigth,baseline,qLong,qShort,psdValue,eventCounter,\
                          eventCounterPSD,decimationFactor,postfix1,postfix2,postfix3,postfix4";

    #[test]
    fn test_skips_and_counts_malformed_rows() {
        let table = format!(
            "{HEADER}\n\
             1,2,3,4,7,1,10,0,0,0,0,1000,300,0,1,1,1,0,0,0,0\n\
             1,2,3,4,7,1,11,0,0,0,0,abc,300,0,1,1,1,0,0,0,0\n\
             1,2,3,4,7,1,12,0,0,0,0,,300,0,1,1,1,0,0,0,0\n\
             1,2,3,4,7,1,13\n\
             1,2,3,4,7,1,14,0,0,0,0,2000,500,0,1,1,1,0,0,0,0\n"
        );

        let import = read_record_table(table.as_bytes()).unwrap();
        assert_eq!(import.rows, 5);
        assert_eq!(import.skipped_rows, 3);
        assert_eq!(import.dataset.events().q_long, vec![1000, 2000]);
        assert!(import.dataset.records().is_empty());
    }

    #[test]
    fn test_positivity_applies_to_table_rows() {
        let table = "qLong,qShort\n1000,300\n0,300\n-5,1\n1000,-1\n";
        let import = read_record_table(table.as_bytes()).unwrap();
        assert_eq!(import.skipped_rows, 0);
        assert_eq!(import.dataset.events().len(), 1);
        assert_eq!(import.dataset.validity().non_finite, 1);
        assert_eq!(import.dataset.validity().non_positive, 2);
    }

    #[test]
    fn test_missing_columns_skip_every_row() {
        let table = "a,b\n1,2\n3,4\n";
        let import = read_record_table(table.as_bytes()).unwrap();
        assert_eq!(import.rows, 2);
        assert_eq!(import.skipped_rows, 2);
        assert!(import.dataset.events().is_empty());
    }

    #[test]
    fn test_matches_direct_decode_path() {
        let records: Vec<RawEventRecord> = [(1000, 300), (0, 1), (4000, 3900), (12, 12)]
            .into_iter()
            .map(|(q_long, q_short)| RawEventRecord {
                q_long,
                q_short,
                ..RawEventRecord::default()
            })
            .collect();

        let mut data = vec![0u8; PREAMBLE_SIZE];
        for record in &records {
            data.extend_from_slice(&encode_record(record));
        }
        let direct = load(&data).unwrap();

        let mut exporter = CsvExporter::new(Vec::new());
        exporter.export_records(&records).unwrap();
        let csv_bytes = exporter.into_inner().unwrap();
        let import = read_record_table(csv_bytes.as_slice()).unwrap();

        assert_eq!(import.skipped_rows, 0);
        assert_eq!(import.dataset.events(), direct.events());
        assert_eq!(import.dataset.validity(), direct.validity());
    }
}
