// Mythen hardware
pub const CHANNELS_PER_MODULE: usize = 1280;

// Summing
pub const DEFAULT_STEP: f64 = 0.004;
/// Quotients this close to an integer are treated as lying on the bin edge
pub const BIN_EDGE_TOLERANCE: f64 = 1.0e-9;

// Processed data files
pub const COLUMNS_PER_ROW: usize = 3;
pub const PROCESSED_EXTENSION: &str = "dat";
pub const DETECTOR_FILE_TAG: &str = "mythen";
pub const SUMMED_FILE_TAG: &str = "summed";

// Plotting
pub const DEFAULT_X_AXIS_NAME: &str = "angle";
pub const DEFAULT_Y_AXIS_NAME: &str = "counts";
