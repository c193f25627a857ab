//! Command-line front end for decoding digitizer files and building PSD tables.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use clap::{Parser, Subcommand};

use psdkit_analysis::{
    recompute_with, AnalysisConfig, DecodedDataset, Histograms, PsdFilter, ValidityCounts,
};
use psdkit_core::{HistogramBin, HistogramTable};
use psdkit_digitizer::{DecodeSummary, DecoderConfig};
use psdkit_io::{
    read_record_table_file, records_csv_path, write_psd_csv, write_records_csv,
    write_spectrum_csv, DigitizerFileReader, TableImport,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    PsdkitIo(#[from] psdkit_io::Error),

    #[error("Analysis error: {0}")]
    Analysis(#[from] psdkit_analysis::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pulse-shape discrimination for digitizer event files.
#[derive(Parser)]
#[command(name = "psdkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a digitizer file
    Info {
        /// Input digitizer file
        input: PathBuf,

        /// Only inspect the first N records
        #[arg(long)]
        limit: Option<usize>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a digitizer file into a CSV record table
    Decode {
        /// Input digitizer file
        input: PathBuf,

        /// Output CSV path (default: input with .csv extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the energy spectrum and PSD histogram
    Analyze {
        /// Input digitizer file, or a record table with --from-table
        input: PathBuf,

        /// Read events from a previously exported record table
        #[arg(long)]
        from_table: bool,

        /// JSON analysis configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// PSD threshold (events with psd > threshold pass)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Disable the PSD threshold
        #[arg(long)]
        no_filter: bool,

        /// Write the spectrum (BinCenter, Count) to this CSV file
        #[arg(long)]
        spectrum_out: Option<PathBuf>,

        /// Write the filtered PSD values to this CSV file
        #[arg(long)]
        psd_out: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct InfoSummary<'a> {
    file: &'a Path,
    size_bytes: usize,
    records: usize,
    trailing_bytes: usize,
    validity: ValidityCounts,
    channels: Vec<u16>,
    timestamp_range: Option<(u64, u64)>,
}

#[derive(Serialize)]
struct TableSummary {
    total_count: u64,
    excluded: u64,
    peak_bin_center: Option<f64>,
}

impl TableSummary {
    fn of(table: &HistogramTable) -> Self {
        let peak = table
            .bins()
            .iter()
            .filter(|bin| bin.count > 0)
            .max_by_key(|bin| bin.count);
        Self {
            total_count: table.total_count(),
            excluded: table.excluded(),
            peak_bin_center: peak.map(HistogramBin::center),
        }
    }
}

/// Events loaded for `analyze`, from either a digitizer file or a record table.
struct Ingest {
    dataset: DecodedDataset,
    /// Decoded records, or data rows for a table.
    records: usize,
    /// Set only for tables.
    skipped_rows: Option<usize>,
}

impl Ingest {
    fn from_file(dataset: DecodedDataset) -> Self {
        Self {
            records: dataset.records().len(),
            skipped_rows: None,
            dataset,
        }
    }

    fn from_table(import: TableImport) -> Self {
        Self {
            records: import.rows,
            skipped_rows: Some(import.skipped_rows),
            dataset: import.dataset,
        }
    }
}

#[derive(Serialize)]
struct AnalyzeSummary<'a> {
    input: &'a Path,
    records: usize,
    skipped_rows: Option<usize>,
    validity: ValidityCounts,
    filter: PsdFilter,
    filtered_events: usize,
    spectrum: TableSummary,
    psd: TableSummary,
    elapsed_s: f64,
}

impl<'a> AnalyzeSummary<'a> {
    fn new(
        input: &'a Path,
        ingest: &Ingest,
        config: &AnalysisConfig,
        histograms: &Histograms,
        elapsed_s: f64,
    ) -> Self {
        Self {
            input,
            records: ingest.records,
            skipped_rows: ingest.skipped_rows,
            validity: ingest.dataset.validity(),
            filter: config.filter,
            filtered_events: histograms.filtered.len(),
            spectrum: TableSummary::of(&histograms.spectrum),
            psd: TableSummary::of(&histograms.psd),
            elapsed_s,
        }
    }
}

/// Config file (or defaults), then `--threshold`, then `--no-filter`.
fn resolve_config(
    config: Option<&Path>,
    threshold: Option<f64>,
    no_filter: bool,
) -> Result<AnalysisConfig> {
    let mut analysis = match config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(threshold) = threshold {
        analysis.filter = PsdFilter::with_threshold(threshold);
    }
    if no_filter {
        analysis.filter.enabled = false;
    }
    Ok(analysis)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn print_info(summary: &InfoSummary<'_>) {
    println!("File: {}", summary.file.display());
    println!(
        "Size: {} bytes ({:.2} MB)",
        summary.size_bytes,
        summary.size_bytes as f64 / 1_000_000.0
    );
    println!("Records: {}", summary.records);
    if summary.trailing_bytes > 0 {
        println!("Trailing bytes (ignored): {}", summary.trailing_bytes);
    }
    println!(
        "Valid events: {} (non-finite: {}, non-positive: {})",
        summary.validity.valid, summary.validity.non_finite, summary.validity.non_positive
    );
    if !summary.channels.is_empty() {
        println!("Channels: {:?}", summary.channels);
    }
    if let Some((first, last)) = summary.timestamp_range {
        println!("Timestamp range: {} - {}", first, last);
    }
}

fn print_analysis(summary: &AnalyzeSummary<'_>) {
    println!("Input: {}", summary.input.display());
    if let Some(skipped) = summary.skipped_rows {
        println!("Table rows: {} ({} skipped)", summary.records, skipped);
    } else {
        println!("Records: {}", summary.records);
    }
    println!(
        "Valid events: {} (non-finite: {}, non-positive: {})",
        summary.validity.valid, summary.validity.non_finite, summary.validity.non_positive
    );
    if summary.filter.enabled {
        println!("PSD filter: psd > {}", summary.filter.threshold);
    } else {
        println!("PSD filter: disabled");
    }
    println!("Filtered events: {}", summary.filtered_events);
    println!(
        "Spectrum: {} counts ({} out of range)",
        summary.spectrum.total_count, summary.spectrum.excluded
    );
    println!(
        "PSD histogram: {} counts ({} out of range)",
        summary.psd.total_count, summary.psd.excluded
    );
    if let Some(center) = summary.psd.peak_bin_center {
        println!("PSD peak at: {:.4}", center);
    }
    println!("Processed in {:.2}s", summary.elapsed_s);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input, limit, json } => {
            let reader = DigitizerFileReader::open(&input)?
                .with_config(DecoderConfig::new().with_max_records(limit));
            let DecodeSummary {
                record_count,
                trailing_bytes,
                ..
            } = reader.summary()?;

            let records = reader.read_records()?;
            let mut channels: Vec<u16> = records.iter().map(|r| r.channel_id).collect();
            channels.sort_unstable();
            channels.dedup();
            let timestamp_range = records
                .iter()
                .map(|r| r.timestamp)
                .min()
                .zip(records.iter().map(|r| r.timestamp).max());
            let dataset = DecodedDataset::from_records(records);

            let summary = InfoSummary {
                file: &input,
                size_bytes: reader.file_size(),
                records: record_count,
                trailing_bytes,
                validity: dataset.validity(),
                channels,
                timestamp_range,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_info(&summary);
            }
        }

        Commands::Decode { input, output } => {
            let start = Instant::now();
            let output = output.unwrap_or_else(|| records_csv_path(&input));

            let reader = DigitizerFileReader::open(&input)?;
            let records = reader.read_records()?;
            log::info!("decoded {} records from {}", records.len(), input.display());

            write_records_csv(&output, &records)?;

            println!(
                "Wrote {} records to {} in {:.2}s",
                records.len(),
                output.display(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Analyze {
            input,
            from_table,
            config,
            threshold,
            no_filter,
            spectrum_out,
            psd_out,
            json,
        } => {
            let start = Instant::now();

            let analysis = resolve_config(config.as_deref(), threshold, no_filter)?;

            let ingest = if from_table {
                Ingest::from_table(read_record_table_file(&input)?)
            } else {
                let reader = DigitizerFileReader::open(&input)?.with_config(analysis.decoder);
                Ingest::from_file(reader.load_dataset()?)
            };

            let histograms = recompute_with(&ingest.dataset, &analysis);

            if let Some(path) = &spectrum_out {
                write_spectrum_csv(path, &histograms.spectrum)?;
                log::info!("wrote spectrum to {}", path.display());
            }
            if let Some(path) = &psd_out {
                write_psd_csv(path, histograms.psd_values())?;
                log::info!("wrote PSD values to {}", path.display());
            }

            let summary = AnalyzeSummary::new(
                &input,
                &ingest,
                &analysis,
                &histograms,
                start.elapsed().as_secs_f64(),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_analysis(&summary);
            }
        }
    }

    Ok(())
}
