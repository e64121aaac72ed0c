use std::sync::mpsc::Sender;

use super::bad_channels::BadChannelList;
use super::config::Config;
use super::error::{ProcessorError, SumError};
use super::event::{DisplaySink, PlotDataFileEvent};
use super::processed_data::ProcessedDataset;
use super::reader::read_processed_data_file;
use super::source::{ProcessedDataSource, ScanDirectory};
use super::status::{SumStage, SumStatus};
use super::task::SummingReport;
use super::writer::FileSink;

/// Load the bad channels named in the config, or an empty list if there are none
fn load_bad_channels(config: &Config) -> Result<BadChannelList, ProcessorError> {
    if !config.has_bad_channels() {
        log::info!("No bad channel file given, all channels will be summed");
        return Ok(BadChannelList::new());
    }
    match config.get_bad_channel_path()? {
        Some(path) => {
            let list = BadChannelList::read_file(&path)?;
            log::info!(
                "Loaded {} bad channel(s) from {}",
                list.len(),
                path.display()
            );
            Ok(list)
        }
        None => Ok(BadChannelList::new()),
    }
}

/// Load every point of the scan, reporting progress as each file is read.
///
/// If the config asks for it, each point is also forwarded to the display as it is loaded.
fn load_points<D: DisplaySink>(
    config: &Config,
    source: &ScanDirectory,
    tx: &Sender<SumStatus>,
    display: &mut D,
) -> Result<Vec<ProcessedDataset>, ProcessorError> {
    let files = source.processed_files_for_scan()?;
    let total_size: u64 = files
        .iter()
        .filter_map(|path| path.metadata().ok())
        .map(|meta| meta.len())
        .sum();
    log::info!(
        "Loading {} processed data file(s) with total size: {}",
        files.len(),
        human_bytes::human_bytes(total_size as f64)
    );

    let last_point = config.last_point_task();
    let mut datasets: Vec<ProcessedDataset> = Vec::with_capacity(files.len());
    tx.send(SumStatus::new(0.0, config.scan_number, SumStage::Loading))?;
    for (idx, path) in files.iter().enumerate() {
        let dataset = read_processed_data_file(path)?;
        if config.plot_points {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            last_point.run(&name, &dataset, idx == 0, display);
        }
        datasets.push(dataset);
        tx.send(SumStatus::new(
            (idx + 1) as f32 / files.len() as f32,
            config.scan_number,
            SumStage::Loading,
        ))?;
    }
    log::info!("Done loading processed data.");
    Ok(datasets)
}

/// The main entry point of the summing process.
///
/// This takes in a config, a progress channel, a display, and optionally a channel to notify when the
/// summed file has been written. Typically run on its own thread.
pub fn process<D: DisplaySink>(
    config: Config,
    tx: Sender<SumStatus>,
    mut display: D,
    events: Option<Sender<PlotDataFileEvent>>,
) -> Result<SummingReport, ProcessorError> {
    // Fail on bad parameters before touching any files
    if !config.is_step_valid() {
        return Err(ProcessorError::SumError(SumError::InvalidStep(config.step)));
    }
    if !config.is_module_count_valid() {
        return Err(ProcessorError::SumError(SumError::InvalidModuleCount(
            config.module_count,
        )));
    }
    let task = config.summing_task();
    task.validate()?;

    let bad_channels = load_bad_channels(&config)?;
    let data_directory = config.get_data_directory()?;
    let source = ScanDirectory::new(
        &data_directory,
        config.scan_number,
        config.module_count,
        bad_channels,
    )?;

    log::info!("Processing scan {}...", source.scan_number());
    let datasets = load_points(&config, &source, &tx, &mut display)?;

    tx.send(SumStatus::new(0.0, config.scan_number, SumStage::Summing))?;
    let summed = task.sum_datasets(&source, &datasets)?;
    tx.send(SumStatus::new(1.0, config.scan_number, SumStage::Summing))?;

    tx.send(SumStatus::new(0.0, config.scan_number, SumStage::Saving))?;
    let report = task.publish(&source, summed, datasets.len(), &mut FileSink, &mut display)?;
    tx.send(SumStatus::new(1.0, config.scan_number, SumStage::Saving))?;

    if let Some(events) = events {
        if events
            .send(PlotDataFileEvent::new(report.summed_path.clone(), true))
            .is_err()
        {
            log::warn!("Nobody is listening for plot events, skipping notification");
        }
    }

    tx.send(SumStatus::new(1.0, config.scan_number, SumStage::Done))?;
    log::info!(
        "Finished processing scan {}: {} bins from {} file(s).",
        config.scan_number,
        report.summed.len(),
        report.n_files
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{NoDisplay, PlotData};
    use crate::processed_data::ProcessedDataPoint;
    use crate::reader::read_processed_data_file;
    use crate::writer::save_processed_data_file;
    use std::sync::mpsc;
    use tempfile::tempdir;

    #[test]
    fn test_process_scan() {
        let dir = tempdir().unwrap();
        for point in 1..=3 {
            save_processed_data_file(
                &[
                    ProcessedDataPoint::new(0.0, point as f64, 1.0),
                    ProcessedDataPoint::new(0.004, 1.0, 1.0),
                ],
                &dir.path().join(format!("5-mythen-{point}.dat")),
            )
            .unwrap();
        }
        let bad_path = dir.path().join("bad.csv");
        std::fs::write(&bad_path, "module,channel\n1,0\n").unwrap();

        let config = Config {
            data_path: dir.path().to_path_buf(),
            scan_number: 5,
            module_count: 2,
            bad_channel_path: Some(bad_path),
            plot_points: true,
            ..Default::default()
        };
        let (tx, rx) = mpsc::channel::<SumStatus>();
        let (plot_tx, plot_rx) = mpsc::channel::<PlotData>();
        let (event_tx, event_rx) = mpsc::channel::<PlotDataFileEvent>();
        let report = process(config, tx, plot_tx, Some(event_tx)).unwrap();

        // Second module is bad, so only the first channel of every point survives
        assert_eq!(report.n_files, 3);
        assert_eq!(report.summed.angles(), vec![0.0]);
        assert_eq!(report.summed.counts(), vec![6.0]);

        let event = event_rx.recv().unwrap();
        assert_eq!(event.filename, dir.path().join("5-mythen-summed.dat"));
        assert!(event.clear_first);
        let reread = read_processed_data_file(&event.filename).unwrap();
        assert_eq!(reread.points(), report.summed.bins());

        // Three points and then the sum
        let plots: Vec<PlotData> = plot_rx.try_iter().collect();
        assert_eq!(plots.len(), 4);
        assert!(plots[0].clear_first);
        assert!(!plots[1].clear_first);
        assert_eq!(plots[3].name, "5-mythen-summed.dat");

        // Stages arrive in order, with saving announced before the file is written
        let statuses: Vec<SumStatus> = rx.try_iter().collect();
        let mut stages: Vec<SumStage> = statuses.iter().map(|s| s.stage).collect();
        stages.dedup();
        assert_eq!(
            stages,
            vec![
                SumStage::Loading,
                SumStage::Summing,
                SumStage::Saving,
                SumStage::Done
            ]
        );
        let first_saving = statuses
            .iter()
            .find(|s| s.stage == SumStage::Saving)
            .unwrap();
        assert_eq!(first_saving.progress, 0.0);
    }

    #[test]
    fn test_invalid_step_fails_first() {
        let config = Config {
            step: 0.0,
            ..Default::default()
        };
        let (tx, _rx) = mpsc::channel::<SumStatus>();
        assert!(matches!(
            process(config, tx, NoDisplay, None),
            Err(ProcessorError::SumError(SumError::InvalidStep(_)))
        ));
    }
}
