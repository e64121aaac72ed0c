//! # mythen_cli
//!
//! Part of the libmythen crate family.
//!
//! Sums the processed data of a Mythen scan from the command line.
//!
//! ## Use
//!
//! Make a template configuration file with
//!
//! ```bash
//! mythen_cli new -p config.yml
//! ```
//!
//! fill it out, and then sum the scan with
//!
//! ```bash
//! mythen_cli -p config.yml
//! ```
use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use libmythen::config::Config;
use libmythen::event::{PlotData, PlotDataFileEvent};
use libmythen::process::process;
use libmythen::reader::read_processed_data_file;
use libmythen::status::{SumStage, SumStatus};

fn make_template_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config)?;
    let mut file = File::create(path)?;
    file.write_all(yaml_str.as_bytes())?;
    Ok(())
}

/// Stand-in for a plotting panel: report what would be drawn
fn log_plot(plot: &PlotData) {
    let total: f64 = plot.counts.iter().sum();
    match (plot.angles.first(), plot.angles.last()) {
        (Some(first), Some(last)) => log::info!(
            "[{}] {}: {} points from {first} to {last} {}, total {} {total}",
            plot.panel_name,
            plot.name,
            plot.angles.len(),
            plot.x_axis_name,
            plot.y_axis_name
        ),
        _ => log::info!("[{}] {}: nothing to plot", plot.panel_name, plot.name),
    }
}

/// Re-read a file announced by the processor, as a live plot would
fn handle_plot_event(event: &PlotDataFileEvent) {
    match read_processed_data_file(&event.filename) {
        Ok(data) => log::info!(
            "Plot event for {} (clear first: {}): {} rows",
            event.filename.display(),
            event.clear_first,
            data.len()
        ),
        Err(e) => log::error!("Unable to plot data from data file: {e}"),
    }
}

fn stage_message(stage: &SumStage) -> &'static str {
    match stage {
        SumStage::Loading => "Loading",
        SumStage::Summing => "Summing",
        SumStage::Saving => "Saving",
        SumStage::Done => "Done",
    }
}

fn main() {
    // Create a cli
    let matches = Command::new("mythen_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return;
    }

    // Parse the cli
    let is_new = matches!(matches.subcommand(), Some(("new", _)));
    let path_arg = match matches.subcommand() {
        Some(("new", sub_matches)) => sub_matches.get_one::<String>("path"),
        _ => None,
    }
    .or_else(|| matches.get_one::<String>("path"));
    let config_path = match path_arg {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required, use -p <path>");
            return;
        }
    };

    if is_new {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        match make_template_config(&config_path) {
            Ok(()) => log::info!("Done."),
            Err(e) => log::error!("Could not write template config: {e}"),
        }
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Data Path: {}", config.data_path.to_string_lossy());
    log::info!(
        "Bad Channel Path: {}",
        config
            .bad_channel_path
            .as_deref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or(String::from("None"))
    );
    log::info!("Scan Number: {}", config.scan_number);
    log::info!("Number of Modules: {}", config.module_count);
    log::info!("Angle Step: {}", config.step);

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(100));
    if let Ok(style) = ProgressStyle::with_template("{msg:>8} [{bar:40}] {pos:>3}%") {
        pb.set_style(style);
    }
    let (status_tx, status_rx) = mpsc::channel::<SumStatus>();
    let (plot_tx, plot_rx) = mpsc::channel::<PlotData>();
    let (event_tx, event_rx) = mpsc::channel::<PlotDataFileEvent>();

    // Spawn the task!
    let handle = std::thread::spawn(move || process(config, status_tx, plot_tx, Some(event_tx)));

    loop {
        // No UI here, so check in on the worker a few times a second
        std::thread::sleep(std::time::Duration::from_millis(200));
        for status in status_rx.try_iter() {
            pb.set_message(stage_message(&status.stage));
            pb.set_position((status.progress * 100.0) as u64);
        }
        for plot in plot_rx.try_iter() {
            log_plot(&plot);
        }
        for event in event_rx.try_iter() {
            handle_plot_event(&event);
        }

        if handle.is_finished() {
            match handle.join() {
                Ok(result) => match result {
                    Ok(report) => log::info!(
                        "Successfully summed data to {}",
                        report.summed_path.display()
                    ),
                    Err(e) => log::error!("Summing failed with error: {e}"),
                },
                Err(_) => log::error!("Failed to join summing task!"),
            }
            break;
        }
    }

    // Anything sent right before the worker finished
    for plot in plot_rx.try_iter() {
        log_plot(&plot);
    }
    for event in event_rx.try_iter() {
        handle_plot_event(&event);
    }

    pb.finish();

    log::info!("Done.");
}
