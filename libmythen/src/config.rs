use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::constants::{DEFAULT_STEP, DEFAULT_X_AXIS_NAME, DEFAULT_Y_AXIS_NAME};
use super::error::ConfigError;
use super::task::{PlotLastPointTask, SummingTask};

/// Structure representing the application configuration. Contains pathing and summing information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_path: PathBuf,
    pub scan_number: i32,
    pub module_count: usize,
    pub bad_channel_path: Option<PathBuf>,
    pub step: f64,
    pub plot_points: bool,
    pub panel_name: String,
    pub x_axis_name: String,
    pub y_axis_name: String,
}

impl Default for Config {
    /// Generate a new Config object. Paths will be empty/invalid
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("None"),
            scan_number: 0,
            module_count: 1,
            bad_channel_path: None,
            step: DEFAULT_STEP,
            plot_points: false,
            panel_name: String::from("Mythen"),
            x_axis_name: String::from(DEFAULT_X_AXIS_NAME),
            y_axis_name: String::from(DEFAULT_Y_AXIS_NAME),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Get the directory holding the processed point files. The summed file is written here too
    pub fn get_data_directory(&self) -> Result<PathBuf, ConfigError> {
        if self.data_path.exists() {
            Ok(self.data_path.clone())
        } else {
            Err(ConfigError::BadFilePath(self.data_path.clone()))
        }
    }

    /// Get the bad channel file, if one is configured
    pub fn get_bad_channel_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        match &self.bad_channel_path {
            None => Ok(None),
            Some(path) if path.exists() => Ok(Some(path.clone())),
            Some(path) => Err(ConfigError::BadFilePath(path.clone())),
        }
    }

    pub fn is_step_valid(&self) -> bool {
        self.step.is_finite() && self.step > 0.0
    }

    pub fn is_module_count_valid(&self) -> bool {
        self.module_count >= 1
    }

    pub fn has_bad_channels(&self) -> bool {
        self.bad_channel_path.is_some()
    }

    /// Build the end of scan summing task described by this config
    pub fn summing_task(&self) -> SummingTask {
        SummingTask {
            step: self.step,
            panel_name: Some(self.panel_name.clone()),
            x_axis_name: self.x_axis_name.clone(),
            y_axis_name: self.y_axis_name.clone(),
        }
    }

    /// Build the end of point plotting task described by this config
    pub fn last_point_task(&self) -> PlotLastPointTask {
        PlotLastPointTask {
            panel_name: Some(self.panel_name.clone()),
            x_axis_name: self.x_axis_name.clone(),
            y_axis_name: self.y_axis_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let config = Config {
            data_path: dir.path().to_path_buf(),
            scan_number: 1234,
            module_count: 24,
            ..Default::default()
        };
        std::fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();

        let read = Config::read_config_file(&path).unwrap();
        assert_eq!(read.scan_number, 1234);
        assert_eq!(read.module_count, 24);
        assert_eq!(read.step, DEFAULT_STEP);
        assert_eq!(read.get_data_directory().unwrap(), dir.path());
        assert!(read.get_bad_channel_path().unwrap().is_none());
    }

    #[test]
    fn test_missing_config() {
        assert!(matches!(
            Config::read_config_file(Path::new("/no/such/config.yml")),
            Err(ConfigError::BadFilePath(_))
        ));
    }

    #[test]
    fn test_validity() {
        let mut config = Config::default();
        assert!(config.is_step_valid());
        assert!(config.is_module_count_valid());
        config.step = -0.004;
        config.module_count = 0;
        assert!(!config.is_step_valid());
        assert!(!config.is_module_count_valid());
        config.bad_channel_path = Some(PathBuf::from("/no/such/bad.csv"));
        assert!(config.has_bad_channels());
        assert!(config.get_bad_channel_path().is_err());
    }

    #[test]
    fn test_tasks_from_config() {
        let config = Config::default();
        let task = config.summing_task();
        assert!(task.validate().is_ok());
        assert_eq!(task.step, DEFAULT_STEP);
        assert!(config.last_point_task().validate().is_ok());
    }
}
