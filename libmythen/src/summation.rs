//! Summing of processed Mythen data onto a common angular grid.
//!
//! The angular axis is partitioned into bins of width `step` anchored at zero, so bin `n`
//! covers `[n * step, (n + 1) * step)` and is reported at the angle `n * step`. Because the
//! origin is fixed, the same angle always lands in the same bin no matter which file or module
//! measured it. Counts in a bin are summed, and errors are combined in quadrature.
use std::collections::BTreeMap;

use super::bad_channels::BadChannelProvider;
use super::constants::BIN_EDGE_TOLERANCE;
use super::error::SumError;
use super::processed_data::{ProcessedDataPoint, ProcessedDataset, SummedDataset};

/// Running totals for a single angular bin
#[derive(Debug, Clone, Copy, Default)]
struct BinAccumulator {
    count: f64,
    error_squared: f64,
}

impl BinAccumulator {
    fn add(&mut self, point: &ProcessedDataPoint) {
        self.count += point.count;
        self.error_squared += point.error * point.error;
    }
}

/// Resolve a position in a dataset to its (module, channel) address
pub fn module_and_channel(position: usize, channels_per_module: usize) -> (usize, usize) {
    (
        position / channels_per_module,
        position % channels_per_module,
    )
}

/// Find the bin an angle falls into.
///
/// Quotients within tolerance of an integer are snapped to it first, otherwise an angle such as
/// 0.012 with a step of 0.004 would fall into the bin below its own. An angle too large for its
/// bin number to be represented is an error.
pub fn bin_index(angle: f64, step: f64) -> Result<i64, SumError> {
    let quotient = angle / step;
    if !quotient.is_finite() || quotient.abs() >= i64::MAX as f64 {
        return Err(SumError::AngleOutOfRange { angle, step });
    }
    let nearest = quotient.round();
    if (quotient - nearest).abs() < BIN_EDGE_TOLERANCE {
        Ok(nearest as i64)
    } else {
        Ok(quotient.floor() as i64)
    }
}

/// Check the summing parameters which do not depend on the data
pub fn validate_parameters(module_count: usize, step: f64) -> Result<(), SumError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(SumError::InvalidStep(step));
    }
    if module_count < 1 {
        return Err(SumError::InvalidModuleCount(module_count));
    }
    Ok(())
}

fn validate(datasets: &[ProcessedDataset], module_count: usize, step: f64) -> Result<(), SumError> {
    validate_parameters(module_count, step)?;
    for (index, dataset) in datasets.iter().enumerate() {
        if dataset.len() % module_count != 0 {
            return Err(SumError::InconsistentChannelCount {
                index,
                channels: dataset.len(),
                modules: module_count,
            });
        }
    }
    Ok(())
}

/// Sum a collection of processed datasets into a single dataset.
///
/// Each dataset is split evenly across `module_count` modules. Channels flagged by
/// `bad_channels` are skipped entirely. The result holds one row per populated bin in
/// ascending angle; if nothing contributes the result is empty.
pub fn sum<B: BadChannelProvider + ?Sized>(
    datasets: &[ProcessedDataset],
    module_count: usize,
    bad_channels: &B,
    step: f64,
) -> Result<SummedDataset, SumError> {
    validate(datasets, module_count, step)?;

    let mut bins: BTreeMap<i64, BinAccumulator> = BTreeMap::new();
    let mut n_skipped: usize = 0;
    for dataset in datasets {
        let channels_per_module = dataset.len() / module_count;
        for (position, point) in dataset.points().iter().enumerate() {
            let (module, channel) = module_and_channel(position, channels_per_module);
            if bad_channels.is_bad(module, channel) {
                n_skipped += 1;
                continue;
            }
            bins.entry(bin_index(point.angle, step)?)
                .or_default()
                .add(point);
        }
    }
    log::debug!(
        "Summed {} dataset(s) into {} bins, skipping {} bad channel readings",
        datasets.len(),
        bins.len(),
        n_skipped
    );

    let rows = bins
        .into_iter()
        .map(|(index, acc)| {
            ProcessedDataPoint::new(index as f64 * step, acc.count, acc.error_squared.sqrt())
        })
        .collect();

    Ok(SummedDataset::from_sorted_bins(rows))
}
