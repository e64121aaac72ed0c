//! # libmythen
//!
//! libmythen sums the processed data of a Mythen strip detector, written in Rust. A scan
//! with the Mythen produces one processed data file per scan point. Each file holds the
//! angle, count, and error of every detector channel. libmythen loads all of the points of
//! a scan, bins them onto a common angular grid while excluding bad channels, and writes a
//! single summed file in the same format.
//!
//! ## Building & Install
//!
//! To build and install the CLI use `cargo install --path ./mythen_cli` from the top level
//! repository. To use the CLI see the `mythen_cli` documentation.
//!
//! ## Configuration
//!
//! The CLI is configured with a YAML file. A template can be generated with
//! `mythen_cli new -p config.yml`. The format is as follows:
//!
//! ```yml
//! data_path: None
//! scan_number: 0
//! module_count: 1
//! bad_channel_path: null
//! step: 0.004
//! plot_points: false
//! panel_name: Mythen
//! x_axis_name: angle
//! y_axis_name: counts
//! ```
//!
//! - `data_path`: directory containing the processed point files of the scan. The summed
//! file is written here as well.
//! - `scan_number`: the scan to sum. Point files are named `{scan}-mythen-{point}.dat`
//! and the summed file is `{scan}-mythen-summed.dat`.
//! - `module_count`: number of detector modules. Every file must split evenly across the
//! modules.
//! - `bad_channel_path`: optional CSV of bad channels (see below). If `null`, every
//! channel is summed.
//! - `step`: width of the angular bins in degrees. Must be greater than zero.
//! - `plot_points`: forward every point to the display as it is loaded.
//! - `panel_name`, `x_axis_name`, `y_axis_name`: labels handed to the display.
//!
//! ### Bad Channel Format
//!
//! The bad channel file is a CSV file with a header and the columns
//!
//! ```csv
//! module,channel
//! ```
//!
//! where `channel` is the index of the channel within its module. A row holding a single
//! number is read as a global channel number instead, with 1280 channels per module.
//!
//! ## Processed Data Format
//!
//! Processed files are plain text with no header, one row per channel in channel order:
//!
//! ```text
//! angle count error
//! ```
//!
//! Fields may be separated by whitespace or commas. Summed files use the same format, with
//! one row per populated angular bin in ascending angle.
//!
//! ## Summing
//!
//! Bins have a fixed width `step` and start from an angle of zero; bin `n` covers
//! `[n * step, (n + 1) * step)` and is reported at the angle `n * step`. Counts in a bin are
//! added together, and errors are added in quadrature. A channel flagged as bad does not
//! contribute to any bin.
pub mod bad_channels;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod process;
pub mod processed_data;
pub mod reader;
pub mod source;
pub mod status;
pub mod summation;
pub mod task;
pub mod writer;
