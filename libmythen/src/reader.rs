use std::path::{Path, PathBuf};

use super::constants::COLUMNS_PER_ROW;
use super::error::ReaderError;
use super::processed_data::{ProcessedDataPoint, ProcessedDataset};

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Parse a single row of a processed data file
fn parse_row(row: &str, path: &Path, line: usize) -> Result<ProcessedDataPoint, ReaderError> {
    let entries: Vec<&str> = row.split(is_delimiter).filter(|e| !e.is_empty()).collect();
    if entries.len() != COLUMNS_PER_ROW {
        return Err(ReaderError::MalformedData {
            path: path.to_path_buf(),
            line,
            reason: format!(
                "expected {COLUMNS_PER_ROW} columns (angle, count, error) but found {}",
                entries.len()
            ),
        });
    }

    let mut values = [0.0; COLUMNS_PER_ROW];
    for (value, entry) in values.iter_mut().zip(entries) {
        *value = match entry.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(ReaderError::MalformedData {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("field '{entry}' is not a finite number"),
                })
            }
        };
    }

    Ok(ProcessedDataPoint::new(values[0], values[1], values[2]))
}

/// Read a single processed data file.
///
/// Each non-blank line is one channel: `angle count error`, separated by whitespace or commas.
/// There is no header, and the order of the rows is the channel order.
pub fn read_processed_data_file(path: &Path) -> Result<ProcessedDataset, ReaderError> {
    let contents = std::fs::read(path).map_err(|source| ReaderError::IOError {
        path: path.to_path_buf(),
        source,
    })?;

    // Decoded per line so that corrupt bytes are reported where they are
    let mut points: Vec<ProcessedDataPoint> = Vec::new();
    for (idx, bytes) in contents.split(|b| *b == b'\n').enumerate() {
        let line = idx + 1;
        let row = std::str::from_utf8(bytes).map_err(|e| ReaderError::MalformedData {
            path: path.to_path_buf(),
            line,
            reason: format!("row is not valid text: {e}"),
        })?;
        if row.trim().is_empty() {
            continue;
        }
        points.push(parse_row(row, path, line)?);
    }

    Ok(ProcessedDataset::new(path, points))
}

/// Read a batch of processed data files. The result is in the same order as the paths.
///
/// The first file that fails aborts the whole batch.
pub fn read_processed_data_files(paths: &[PathBuf]) -> Result<Vec<ProcessedDataset>, ReaderError> {
    paths
        .iter()
        .map(|path| read_processed_data_file(path))
        .collect()
}
