use std::path::{Path, PathBuf};

/// One row of a processed data file: the angle of a channel, its count, and the error on the count
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessedDataPoint {
    pub angle: f64,
    pub count: f64,
    pub error: f64,
}

impl ProcessedDataPoint {
    pub fn new(angle: f64, count: f64, error: f64) -> Self {
        Self {
            angle,
            count,
            error,
        }
    }
}

/// The processed data from a single scan point.
///
/// Points are stored in detector channel order, which is not necessarily increasing angle
/// as each module carries its own angular calibration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessedDataset {
    filename: PathBuf,
    points: Vec<ProcessedDataPoint>,
}

impl ProcessedDataset {
    pub fn new(filename: &Path, points: Vec<ProcessedDataPoint>) -> Self {
        Self {
            filename: filename.to_path_buf(),
            points,
        }
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn points(&self) -> &[ProcessedDataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn angles(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.angle).collect()
    }

    pub fn counts(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.count).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.error).collect()
    }
}

/// The result of summing several processed datasets.
///
/// Each row is an angular bin (bin angle, total count, combined error), sorted by
/// ascending angle. Only bins which received at least one contribution are present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummedDataset {
    bins: Vec<ProcessedDataPoint>,
}

impl SummedDataset {
    /// Bins must already be sorted by angle
    pub(crate) fn from_sorted_bins(bins: Vec<ProcessedDataPoint>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[ProcessedDataPoint] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn angles(&self) -> Vec<f64> {
        self.bins.iter().map(|p| p.angle).collect()
    }

    pub fn counts(&self) -> Vec<f64> {
        self.bins.iter().map(|p| p.count).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.bins.iter().map(|p| p.error).collect()
    }
}
