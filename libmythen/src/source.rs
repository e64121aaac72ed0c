use std::path::{Path, PathBuf};

use super::bad_channels::{BadChannelList, BadChannelProvider};
use super::constants::{DETECTOR_FILE_TAG, PROCESSED_EXTENSION, SUMMED_FILE_TAG};
use super::error::SourceError;

/// Build a processed data file name using the detector convention `{scan}-mythen-{tag}.dat`
pub fn build_processed_filename(scan_number: i32, tag: &str) -> String {
    format!("{scan_number}-{DETECTOR_FILE_TAG}-{tag}.{PROCESSED_EXTENSION}")
}

/// Anything which can hand over the processed data of a completed scan for summing
pub trait ProcessedDataSource {
    /// Processed data files for every point of the scan, in point order
    fn processed_files_for_scan(&self) -> Result<Vec<PathBuf>, SourceError>;

    fn module_count(&self) -> usize;

    fn bad_channel_provider(&self) -> &dyn BadChannelProvider;

    /// Directory the summed data should be written to
    fn data_directory(&self) -> &Path;

    /// Name of the summed data file
    fn summed_filename(&self) -> String;
}

/// A directory of processed data files from a single scan.
///
/// Point files are expected to follow `{scan}-mythen-{point}.dat`; the summed file for the
/// scan lives next to them but is never considered a point.
#[derive(Debug, Clone)]
pub struct ScanDirectory {
    data_directory: PathBuf,
    scan_number: i32,
    module_count: usize,
    bad_channels: BadChannelList,
}

impl ScanDirectory {
    pub fn new(
        data_directory: &Path,
        scan_number: i32,
        module_count: usize,
        bad_channels: BadChannelList,
    ) -> Result<Self, SourceError> {
        if !data_directory.is_dir() {
            return Err(SourceError::BadDataDirectory(data_directory.to_path_buf()));
        }
        Ok(Self {
            data_directory: data_directory.to_path_buf(),
            scan_number,
            module_count,
            bad_channels,
        })
    }

    pub fn scan_number(&self) -> i32 {
        self.scan_number
    }

    /// Get the point number from a file name, if it is a point file for this scan
    fn point_number(&self, file_name: &str) -> Option<u32> {
        let prefix = format!("{}-{DETECTOR_FILE_TAG}-", self.scan_number);
        let suffix = format!(".{PROCESSED_EXTENSION}");
        file_name
            .strip_prefix(&prefix)?
            .strip_suffix(&suffix)?
            .parse()
            .ok()
    }
}

impl ProcessedDataSource for ScanDirectory {
    fn processed_files_for_scan(&self) -> Result<Vec<PathBuf>, SourceError> {
        let mut points: Vec<(u32, PathBuf)> = Vec::new();
        for item in self.data_directory.read_dir()? {
            let item_path = item?.path();
            let point = item_path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| self.point_number(name));
            if let Some(point) = point {
                points.push((point, item_path));
            }
        }

        if points.is_empty() {
            return Err(SourceError::NoMatchingFiles(self.scan_number));
        }

        // Numeric sort, so point 10 comes after point 9
        points.sort_by_key(|(point, _)| *point);
        Ok(points.into_iter().map(|(_, path)| path).collect())
    }

    fn module_count(&self) -> usize {
        self.module_count
    }

    fn bad_channel_provider(&self) -> &dyn BadChannelProvider {
        &self.bad_channels
    }

    fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    fn summed_filename(&self) -> String {
        build_processed_filename(self.scan_number, SUMMED_FILE_TAG)
    }
}
