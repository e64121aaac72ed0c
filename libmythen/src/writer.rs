use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::error::WriterError;
use super::processed_data::ProcessedDataPoint;

/// Write rows in the processed data format, one `angle count error` row per line.
///
/// Floats are written with the shortest representation that reads back to the same value,
/// so the file can be re-read by the reader without loss.
pub fn save_processed_data_file(
    points: &[ProcessedDataPoint],
    path: &Path,
) -> Result<(), WriterError> {
    let to_error = |source: std::io::Error| WriterError::IOError {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
    for point in points {
        writeln!(writer, "{} {} {}", point.angle, point.count, point.error).map_err(to_error)?;
    }
    writer.flush().map_err(to_error)?;
    Ok(())
}

/// Somewhere summed data can be persisted
pub trait DataSink {
    fn save(&mut self, points: &[ProcessedDataPoint], path: &Path) -> Result<(), WriterError>;
}

/// Persists data as a processed data file on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

impl DataSink for FileSink {
    fn save(&mut self, points: &[ProcessedDataPoint], path: &Path) -> Result<(), WriterError> {
        save_processed_data_file(points, path)
    }
}
