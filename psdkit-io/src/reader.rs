//! Memory-mapped file readers.
//!

use crate::{Error, Result};
use memmap2::Mmap;
use psdkit_analysis::{load_with, DecodedDataset};
use psdkit_core::RawEventRecord;
use psdkit_digitizer::{DecodeSummary, DecoderConfig, RecordDecoder, Records};
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying the whole file
/// into a buffer first.
pub struct MappedFileReader {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| Error::MmapError(format!("{}: {e}", path.display())))?;
        Ok(Self {
            mmap,
            path: path.to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Returns the path the reader was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A digitizer event file reader with memory-mapped I/O.
pub struct DigitizerFileReader {
    reader: MappedFileReader,
    config: DecoderConfig,
}

impl DigitizerFileReader {
    /// Opens a digitizer file for reading with default configuration.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = MappedFileReader::open(path)?;
        Ok(Self {
            reader,
            config: DecoderConfig::default(),
        })
    }

    /// Sets the decoder configuration.
    #[must_use]
    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    fn decoder(&self) -> RecordDecoder {
        RecordDecoder::with_config(self.config)
    }

    /// Describes the file layout: record count and ignored trailing bytes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file is shorter than the preamble.
    pub fn summary(&self) -> Result<DecodeSummary> {
        self.decoder()
            .summarize(self.reader.as_bytes())
            .map_err(|e| self.invalid(&e))
    }

    /// Returns the number of complete records in the file.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file is shorter than the preamble.
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.summary()?.record_count)
    }

    /// Returns the number of bytes after the last complete record.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file is shorter than the preamble.
    pub fn trailing_bytes(&self) -> Result<usize> {
        Ok(self.summary()?.trailing_bytes)
    }

    /// Returns a lazy iterator over the records.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file is shorter than the preamble.
    pub fn iter_records(&self) -> Result<Records<'_>> {
        self.decoder()
            .records(self.reader.as_bytes())
            .map_err(|e| self.invalid(&e))
    }

    /// Reads and decodes all records.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file is shorter than the preamble.
    pub fn read_records(&self) -> Result<Vec<RawEventRecord>> {
        self.decoder()
            .decode(self.reader.as_bytes())
            .map_err(|e| self.invalid(&e))
    }

    /// Decodes the file and computes validated events.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file is shorter than the preamble.
    pub fn load_dataset(&self) -> Result<DecodedDataset> {
        let dataset = load_with(&self.config, self.reader.as_bytes()).map_err(|e| match e {
            psdkit_analysis::Error::Decode(e) => self.invalid(&e),
            other => Error::Analysis(other),
        })?;
        log::info!(
            "loaded {} records ({} valid events) from {}",
            dataset.records().len(),
            dataset.validity().valid,
            self.path().display()
        );
        Ok(dataset)
    }

    fn invalid(&self, err: &psdkit_digitizer::Error) -> Error {
        Error::InvalidFormat(format!("{err} (file: {})", self.path().display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psdkit_digitizer::{encode_record, PREAMBLE_SIZE, RECORD_SIZE};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(records: usize, trailing: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; PREAMBLE_SIZE]).unwrap();
        for i in 0..records {
            let record = RawEventRecord {
                q_long: 1000,
                q_short: i32::try_from(i).unwrap() * 100,
                ..RawEventRecord::default()
            };
            file.write_all(&encode_record(&record)).unwrap();
        }
        file.write_all(&vec![0xCD; trailing]).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_mapped_file_reader() {
        let mut file = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..64).collect();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        let reader = MappedFileReader::open(file.path()).unwrap();
        assert_eq!(reader.len(), 64);
        assert!(!reader.is_empty());
        assert_eq!(reader.as_bytes(), &data[..]);
    }

    #[test]
    fn test_digitizer_file_reader() {
        let file = write_file(3, 17);
        let reader = DigitizerFileReader::open(file.path()).unwrap();

        assert_eq!(reader.file_size(), PREAMBLE_SIZE + 3 * RECORD_SIZE + 17);
        assert_eq!(reader.record_count().unwrap(), 3);
        assert_eq!(reader.trailing_bytes().unwrap(), 17);
        assert_eq!(reader.iter_records().unwrap().count(), 3);

        let records = reader.read_records().unwrap();
        assert_eq!(records[2].q_short, 200);
    }

    #[test]
    fn test_load_dataset() {
        // q_short = 0, 100, ..., 1100: the last one gives psd < 0 but stays valid.
        let file = write_file(12, 0);
        let dataset = DigitizerFileReader::open(file.path())
            .unwrap()
            .load_dataset()
            .unwrap();
        assert_eq!(dataset.records().len(), 12);
        assert_eq!(dataset.events().len(), 12);
    }

    #[test]
    fn test_empty_file_is_invalid_format() {
        let file = NamedTempFile::new().unwrap();
        let reader = DigitizerFileReader::open(file.path()).unwrap();
        assert_eq!(reader.file_size(), 0);
        assert!(matches!(reader.read_records(), Err(Error::InvalidFormat(_))));
        assert!(matches!(reader.load_dataset(), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            DigitizerFileReader::open("/nonexistent/run.bin"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_custom_preamble() {
        let file = write_file(2, 0);
        let reader = DigitizerFileReader::open(file.path())
            .unwrap()
            .with_config(DecoderConfig::new().with_preamble_len(PREAMBLE_SIZE + RECORD_SIZE));
        assert_eq!(reader.record_count().unwrap(), 1);
    }
}
