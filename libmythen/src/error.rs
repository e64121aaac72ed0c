use std::path::PathBuf;
use thiserror::Error;

use super::processed_data::SummedDataset;
use super::status::SumStatus;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Could not read processed data file {path:?}: {source}")]
    IOError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed processed data in {path:?} at line {line}: {reason}")]
    MalformedData {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Could not write processed data file {path:?}: {source}")]
    IOError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SumError {
    #[error("Invalid angle step {0}; the step must be a finite value greater than zero")]
    InvalidStep(f64),
    #[error("Invalid module count {0}; at least one module is required")]
    InvalidModuleCount(usize),
    #[error("Dataset {index} has {channels} channels which cannot be split across {modules} modules")]
    InconsistentChannelCount {
        index: usize,
        channels: usize,
        modules: usize,
    },
    #[error("Angle {angle} is too far from zero to be binned with a step of {step}")]
    AngleOutOfRange { angle: f64, step: f64 },
}

#[derive(Debug, Error)]
pub enum BadChannelError {
    #[error("Could not open bad channel file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("BadChannelList failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("BadChannelList failed to parse an integer at line {line}: {source}")]
    ParsingError {
        line: usize,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("BadChannelList was given a file with the incorrect format at line {0}; expected module,channel or a global channel")]
    BadFileFormat(usize),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not access data directory {0:?}")]
    BadDataDirectory(PathBuf),
    #[error("ScanDirectory failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("No processed data files found for scan {0}")]
    NoMatchingFiles(i32),
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Display collaborator is no longer listening")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("You have not specified which panel the data should be plotted in")]
    MissingPanelName,
    #[error("Task failed due to data source error: {0}")]
    SourceError(#[from] SourceError),
    #[error("Task failed due to reader error: {0}")]
    ReaderError(#[from] ReaderError),
    #[error("Task failed due to summing error: {0}")]
    SumError(#[from] SumError),
    #[error("Unable to save summed data to {path:?}, but all individual data files have been saved successfully: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: WriterError,
        summed: Box<SummedDataset>,
    },
    #[error("Summed data was saved to {path:?} but could not be displayed: {source}")]
    Display {
        path: PathBuf,
        #[source]
        source: DisplayError,
        summed: Box<SummedDataset>,
    },
}

impl TaskError {
    /// Recover the summed data from a failed save or display, so the sum need not be
    /// recomputed
    pub fn into_summed(self) -> Option<SummedDataset> {
        match self {
            Self::Save { summed, .. } | Self::Display { summed, .. } => Some(*summed),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to BadChannelList error: {0}")]
    BadChannelError(#[from] BadChannelError),
    #[error("Processor failed due to data source error: {0}")]
    SourceError(#[from] SourceError),
    #[error("Processor failed due to reader error: {0}")]
    ReaderError(#[from] ReaderError),
    #[error("Processor failed due to summing error: {0}")]
    SumError(#[from] SumError),
    #[error("Processor failed due to Task error: {0}")]
    TaskError(#[from] TaskError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<SumStatus>),
}
