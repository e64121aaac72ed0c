use std::path::{Path, PathBuf};

use super::bad_channels::BadChannelProvider;
use super::constants::{DEFAULT_STEP, DEFAULT_X_AXIS_NAME, DEFAULT_Y_AXIS_NAME};
use super::error::TaskError;
use super::event::{DisplaySink, PlotData};
use super::processed_data::{ProcessedDataset, SummedDataset};
use super::reader::read_processed_data_files;
use super::source::ProcessedDataSource;
use super::summation::{sum, validate_parameters};
use super::writer::DataSink;

/// Load and sum a list of processed data files.
///
/// The parameters are checked before any file is touched.
pub fn sum_processed_files<B: BadChannelProvider + ?Sized>(
    paths: &[PathBuf],
    module_count: usize,
    bad_channels: &B,
    step: f64,
) -> Result<SummedDataset, TaskError> {
    validate_parameters(module_count, step)?;
    let datasets = read_processed_data_files(paths)?;
    Ok(sum(&datasets, module_count, bad_channels, step)?)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// What a successful summing run produced
#[derive(Debug, Clone)]
pub struct SummingReport {
    pub summed: SummedDataset,
    pub summed_path: PathBuf,
    pub n_files: usize,
}

/// The end of scan task: sum every point of the scan, save the result next to the point
/// files, and show it.
#[derive(Debug, Clone)]
pub struct SummingTask {
    pub step: f64,
    pub panel_name: Option<String>,
    pub x_axis_name: String,
    pub y_axis_name: String,
}

impl Default for SummingTask {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            panel_name: None,
            x_axis_name: String::from(DEFAULT_X_AXIS_NAME),
            y_axis_name: String::from(DEFAULT_Y_AXIS_NAME),
        }
    }
}

impl SummingTask {
    pub fn new(panel_name: &str, step: f64) -> Self {
        Self {
            step,
            panel_name: Some(panel_name.to_string()),
            ..Default::default()
        }
    }

    /// The task cannot do anything sensible without a panel to plot to or a positive step
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.panel_name.as_deref().map_or(true, str::is_empty) {
            return Err(TaskError::MissingPanelName);
        }
        validate_parameters(1, self.step)?;
        Ok(())
    }

    /// Run the whole task against a data source
    pub fn run(
        &self,
        source: &dyn ProcessedDataSource,
        data_sink: &mut dyn DataSink,
        display: &mut dyn DisplaySink,
    ) -> Result<SummingReport, TaskError> {
        self.validate()?;
        validate_parameters(source.module_count(), self.step)?;

        let files = source.processed_files_for_scan()?;
        log::info!("Going to sum {} dataset(s)", files.len());
        let total_size: u64 = files
            .iter()
            .filter_map(|path| path.metadata().ok())
            .map(|meta| meta.len())
            .sum();
        log::info!(
            "Loading processed data ({})...",
            human_bytes::human_bytes(total_size as f64)
        );
        let datasets = read_processed_data_files(&files)?;
        log::info!("Done");

        self.sum_loaded(source, &datasets, data_sink, display)
    }

    /// Sum, save and display datasets which have already been loaded from the source
    pub fn sum_loaded(
        &self,
        source: &dyn ProcessedDataSource,
        datasets: &[ProcessedDataset],
        data_sink: &mut dyn DataSink,
        display: &mut dyn DisplaySink,
    ) -> Result<SummingReport, TaskError> {
        let summed = self.sum_datasets(source, datasets)?;
        self.publish(source, summed, datasets.len(), data_sink, display)
    }

    /// Sum datasets which have already been loaded from the source
    pub fn sum_datasets(
        &self,
        source: &dyn ProcessedDataSource,
        datasets: &[ProcessedDataset],
    ) -> Result<SummedDataset, TaskError> {
        self.validate()?;

        log::info!("Summing data...");
        let summed = sum(
            datasets,
            source.module_count(),
            source.bad_channel_provider(),
            self.step,
        )?;
        log::info!("Done");
        if summed.is_empty() {
            log::warn!("No channels contributed to the sum; the summed data is empty");
        }
        Ok(summed)
    }

    /// Save the summed data next to the point files and hand it to the display.
    ///
    /// On failure the summed data travels with the error.
    pub fn publish(
        &self,
        source: &dyn ProcessedDataSource,
        summed: SummedDataset,
        n_files: usize,
        data_sink: &mut dyn DataSink,
        display: &mut dyn DisplaySink,
    ) -> Result<SummingReport, TaskError> {
        let summed_path = source.data_directory().join(source.summed_filename());
        log::info!("Saving summed data to {}", summed_path.display());
        if let Err(e) = data_sink.save(summed.bins(), &summed_path) {
            log::error!(
                "Unable to save summed data to {}, but all individual data files have been saved successfully",
                summed_path.display()
            );
            return Err(TaskError::Save {
                path: summed_path,
                source: e,
                summed: Box::new(summed),
            });
        }
        log::info!("Summed data saved successfully");

        let plot = PlotData {
            panel_name: self.panel_name.clone().unwrap_or_default(),
            name: file_name_of(&summed_path),
            x_axis_name: self.x_axis_name.clone(),
            y_axis_name: self.y_axis_name.clone(),
            angles: summed.angles(),
            counts: summed.counts(),
            errors: summed.errors(),
            clear_first: true,
        };
        if let Err(e) = display.display(plot) {
            return Err(TaskError::Display {
                path: summed_path,
                source: e,
                summed: Box::new(summed),
            });
        }

        Ok(SummingReport {
            summed,
            summed_path,
            n_files,
        })
    }
}

/// The end of point task: show the data of the point which just finished
#[derive(Debug, Clone)]
pub struct PlotLastPointTask {
    pub panel_name: Option<String>,
    pub x_axis_name: String,
    pub y_axis_name: String,
}

impl Default for PlotLastPointTask {
    fn default() -> Self {
        Self {
            panel_name: None,
            x_axis_name: String::from(DEFAULT_X_AXIS_NAME),
            y_axis_name: String::from(DEFAULT_Y_AXIS_NAME),
        }
    }
}

impl PlotLastPointTask {
    pub fn new(panel_name: &str) -> Self {
        Self {
            panel_name: Some(panel_name.to_string()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        if self.panel_name.as_deref().map_or(true, str::is_empty) {
            return Err(TaskError::MissingPanelName);
        }
        Ok(())
    }

    /// Forward a point to the display. A failed plot is not worth stopping a scan for, so it
    /// is only logged.
    pub fn run(
        &self,
        filename: &str,
        data: &ProcessedDataset,
        clear_first: bool,
        display: &mut dyn DisplaySink,
    ) {
        let panel_name = self.panel_name.clone().unwrap_or_default();
        let plot = PlotData {
            panel_name: panel_name.clone(),
            name: filename.to_string(),
            x_axis_name: self.x_axis_name.clone(),
            y_axis_name: self.y_axis_name.clone(),
            angles: data.angles(),
            counts: data.counts(),
            errors: data.errors(),
            clear_first,
        };
        if let Err(e) = display.display(plot) {
            log::error!("Failed to plot {filename} to panel {panel_name}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bad_channels::{BadChannelList, NoBadChannels};
    use crate::error::{DisplayError, SumError, WriterError};
    use crate::event::NoDisplay;
    use crate::processed_data::ProcessedDataPoint;
    use crate::writer::save_processed_data_file;
    use std::sync::mpsc;
    use tempfile::tempdir;

    struct FixedSource {
        files: Vec<PathBuf>,
        directory: PathBuf,
        bad_channels: BadChannelList,
    }

    impl ProcessedDataSource for FixedSource {
        fn processed_files_for_scan(&self) -> Result<Vec<PathBuf>, crate::error::SourceError> {
            Ok(self.files.clone())
        }

        fn module_count(&self) -> usize {
            1
        }

        fn bad_channel_provider(&self) -> &dyn BadChannelProvider {
            &self.bad_channels
        }

        fn data_directory(&self) -> &Path {
            &self.directory
        }

        fn summed_filename(&self) -> String {
            String::from("1-mythen-summed.dat")
        }
    }

    struct FailingSink;

    impl DataSink for FailingSink {
        fn save(&mut self, _points: &[ProcessedDataPoint], path: &Path) -> Result<(), WriterError> {
            Err(WriterError::IOError {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only"),
            })
        }
    }

    fn write_points(dir: &Path) -> Vec<PathBuf> {
        let first = dir.join("1-mythen-1.dat");
        let second = dir.join("1-mythen-2.dat");
        save_processed_data_file(
            &[
                ProcessedDataPoint::new(0.0, 10.0, 3.16),
                ProcessedDataPoint::new(0.004, 20.0, 4.47),
            ],
            &first,
        )
        .unwrap();
        save_processed_data_file(
            &[
                ProcessedDataPoint::new(0.0, 5.0, 2.24),
                ProcessedDataPoint::new(0.004, 0.0, 0.0),
            ],
            &second,
        )
        .unwrap();
        vec![first, second]
    }

    #[test]
    fn test_sum_processed_files() {
        let dir = tempdir().unwrap();
        let files = write_points(dir.path());
        let summed = sum_processed_files(&files, 1, &NoBadChannels, 0.004).unwrap();
        assert_eq!(summed.counts(), vec![15.0, 20.0]);
    }

    #[test]
    fn test_invalid_step_before_io() {
        let missing = vec![PathBuf::from("/no/such/file.dat")];
        assert!(matches!(
            sum_processed_files(&missing, 1, &NoBadChannels, -1.0),
            Err(TaskError::SumError(SumError::InvalidStep(_)))
        ));
        assert!(matches!(
            sum_processed_files(&missing, 1, &NoBadChannels, 0.004),
            Err(TaskError::ReaderError(_))
        ));
    }

    #[test]
    fn test_summing_task_saves_and_displays() {
        let dir = tempdir().unwrap();
        let source = FixedSource {
            files: write_points(dir.path()),
            directory: dir.path().to_path_buf(),
            bad_channels: BadChannelList::new(),
        };
        let (mut tx, rx) = mpsc::channel::<PlotData>();
        let task = SummingTask::new("Mythen", 0.004);
        let report = task
            .run(&source, &mut crate::writer::FileSink, &mut tx)
            .unwrap();

        assert_eq!(report.n_files, 2);
        assert_eq!(report.summed_path, dir.path().join("1-mythen-summed.dat"));
        let reread = crate::reader::read_processed_data_file(&report.summed_path).unwrap();
        assert_eq!(reread.points(), report.summed.bins());

        let plot = rx.recv().unwrap();
        assert_eq!(plot.panel_name, "Mythen");
        assert_eq!(plot.name, "1-mythen-summed.dat");
        assert_eq!(plot.x_axis_name, "angle");
        assert_eq!(plot.counts, vec![15.0, 20.0]);
        assert_eq!(plot.errors, report.summed.errors());
        assert!(plot.clear_first);
    }

    #[test]
    fn test_failed_display_keeps_summed_data() {
        let dir = tempdir().unwrap();
        let source = FixedSource {
            files: write_points(dir.path()),
            directory: dir.path().to_path_buf(),
            bad_channels: BadChannelList::new(),
        };
        let (mut tx, rx) = mpsc::channel::<PlotData>();
        drop(rx);
        let task = SummingTask::new("Mythen", 0.004);
        let err = task
            .run(&source, &mut crate::writer::FileSink, &mut tx)
            .unwrap_err();
        match &err {
            TaskError::Display { path, source, .. } => {
                assert_eq!(path, &dir.path().join("1-mythen-summed.dat"));
                assert!(matches!(source, DisplayError::Disconnected));
            }
            other => panic!("unexpected error {other:?}"),
        }
        // The file was still written before the display went away
        assert!(dir.path().join("1-mythen-summed.dat").exists());
        let summed = err.into_summed().unwrap();
        assert_eq!(summed.counts(), vec![15.0, 20.0]);
    }

    #[test]
    fn test_failed_save_keeps_summed_data() {
        let dir = tempdir().unwrap();
        let mut bad_channels = BadChannelList::new();
        bad_channels.insert(0, 1);
        let source = FixedSource {
            files: write_points(dir.path()),
            directory: dir.path().to_path_buf(),
            bad_channels,
        };
        let task = SummingTask::new("Mythen", 0.004);
        let err = task
            .run(&source, &mut FailingSink, &mut NoDisplay)
            .unwrap_err();
        assert!(matches!(err, TaskError::Save { .. }));
        let summed = err.into_summed().unwrap();
        assert_eq!(summed.counts(), vec![15.0]);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            SummingTask::default().validate(),
            Err(TaskError::MissingPanelName)
        ));
        assert!(matches!(
            SummingTask::new("Mythen", 0.0).validate(),
            Err(TaskError::SumError(SumError::InvalidStep(_)))
        ));
        assert!(SummingTask::new("Mythen", 0.004).validate().is_ok());
        assert!(PlotLastPointTask::new("").validate().is_err());
        assert!(PlotLastPointTask::new("Mythen").validate().is_ok());
    }

    #[test]
    fn test_plot_last_point() {
        let (mut tx, rx) = mpsc::channel::<PlotData>();
        let task = PlotLastPointTask::new("Mythen");
        let data = ProcessedDataset::new(
            Path::new("1-mythen-3.dat"),
            vec![ProcessedDataPoint::new(0.5, 7.0, 2.6)],
        );
        task.run("1-mythen-3.dat", &data, false, &mut tx);
        let plot = rx.recv().unwrap();
        assert_eq!(plot.name, "1-mythen-3.dat");
        assert_eq!(plot.angles, vec![0.5]);
        assert_eq!(plot.errors, vec![2.6]);
        assert!(!plot.clear_first);

        // A display which went away must not panic the task
        drop(rx);
        task.run("1-mythen-3.dat", &data, true, &mut tx);
    }
}
