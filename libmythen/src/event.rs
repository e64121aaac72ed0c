use std::path::PathBuf;
use std::sync::mpsc::Sender;

use super::error::DisplayError;

/// Notification that a data file is ready to be plotted.
///
/// Sent on a channel registered by whoever displays the data; the receiver reads the file
/// itself. If `clear_first` is set, previously plotted data should be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotDataFileEvent {
    pub filename: PathBuf,
    pub clear_first: bool,
}

impl PlotDataFileEvent {
    pub fn new(filename: PathBuf, clear_first: bool) -> Self {
        Self {
            filename,
            clear_first,
        }
    }
}

/// A single curve handed to a display collaborator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotData {
    pub panel_name: String,
    pub name: String,
    pub x_axis_name: String,
    pub y_axis_name: String,
    pub angles: Vec<f64>,
    pub counts: Vec<f64>,
    /// Error bars on the counts
    pub errors: Vec<f64>,
    pub clear_first: bool,
}

/// Something which can show plot data, typically a plotting panel owned by a UI
pub trait DisplaySink {
    fn display(&mut self, plot: PlotData) -> Result<(), DisplayError>;
}

impl DisplaySink for Sender<PlotData> {
    fn display(&mut self, plot: PlotData) -> Result<(), DisplayError> {
        self.send(plot).map_err(|_| DisplayError::Disconnected)
    }
}

/// Display that drops everything; for runs with nobody watching
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl DisplaySink for NoDisplay {
    fn display(&mut self, _plot: PlotData) -> Result<(), DisplayError> {
        Ok(())
    }
}
