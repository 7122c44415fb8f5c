use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_LANE_COUNT, DEFAULT_ROW_COUNT, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
    MAX_RUNGS_PER_GAP, MIN_RUNGS_PER_GAP,
};
use crate::error::LadderError;
use crate::topology::{validate_rung_bounds, validate_shape};

const CONFIG_FILE_VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported config version {0}")]
    UnsupportedVersion(u8),
    #[error(transparent)]
    Invalid(#[from] LadderError),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LadderConfig {
    pub lane_count: usize,
    pub row_count: usize,
    pub min_rungs_per_gap: usize,
    pub max_rungs_per_gap: usize,
    pub viewport: Viewport,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            row_count: DEFAULT_ROW_COUNT,
            min_rungs_per_gap: MIN_RUNGS_PER_GAP,
            max_rungs_per_gap: MAX_RUNGS_PER_GAP,
            viewport: Viewport::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    version: u8,
    #[serde(flatten)]
    config: LadderConfig,
}

impl LadderConfig {
    pub fn validate(&self) -> Result<(), LadderError> {
        validate_shape(self.lane_count, self.row_count)?;
        validate_rung_bounds(self.row_count, self.min_rungs_per_gap, self.max_rungs_per_gap)?;
        let Viewport { width, height } = self.viewport;
        if !width.is_finite() || width < 0.0 || !height.is_finite() || height < 0.0 {
            return Err(LadderError::invalid(format!(
                "invalid viewport {width}x{height}"
            )));
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let parsed: ConfigFile = serde_json::from_str(text)?;
        if parsed.version != CONFIG_FILE_VERSION {
            return Err(ConfigError::UnsupportedVersion(parsed.version));
        }
        parsed.config.validate()?;
        Ok(parsed.config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let unique = format!(
            "{}-{}-{}",
            name,
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        std::env::temp_dir().join(unique).join("ladder.json")
    }

    #[test]
    fn default_config_is_valid() {
        let config = LadderConfig::default();
        assert_eq!(config.lane_count, 6);
        assert_eq!(config.row_count, 10);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = LadderConfig::from_json(r#"{ "version": 1, "laneCount": 4 }"#)
            .expect("valid config");
        assert_eq!(config.lane_count, 4);
        assert_eq!(config.row_count, 10);
        assert_eq!(config.min_rungs_per_gap, 2);
        assert_eq!(config.max_rungs_per_gap, 8);
        assert_eq!(config.viewport, Viewport::default());
    }

    #[test]
    fn full_config_round_trips_from_json() {
        let raw = r#"{
  "version": 1,
  "laneCount": 3,
  "rowCount": 6,
  "minRungsPerGap": 1,
  "maxRungsPerGap": 3,
  "viewport": { "width": 320.0, "height": 480.0 }
}"#;
        let config = LadderConfig::from_json(raw).expect("valid config");
        assert_eq!(config.row_count, 6);
        assert_eq!(config.max_rungs_per_gap, 3);
        assert_eq!(config.viewport.height, 480.0);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        assert!(matches!(
            LadderConfig::from_json(r#"{ "version": 2 }"#),
            Err(ConfigError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn invalid_values_surface_as_configuration_errors() {
        assert!(matches!(
            LadderConfig::from_json(r#"{ "version": 1, "laneCount": 1 }"#),
            Err(ConfigError::Invalid(LadderError::InvalidConfiguration(_)))
        ));
        assert!(matches!(
            LadderConfig::from_json(r#"{ "version": 1, "rowCount": 4 }"#),
            Err(ConfigError::Invalid(LadderError::InvalidConfiguration(_)))
        ));
        assert!(matches!(
            LadderConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let path = temp_file("ghost-leg-config");
        let parent = path.parent().expect("parent exists").to_path_buf();
        fs::create_dir_all(&parent).expect("create dir");
        fs::write(&path, r#"{ "version": 1, "laneCount": 9 }"#).expect("write file");

        let config = LadderConfig::load(&path).expect("valid config");
        assert_eq!(config.lane_count, 9);

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&parent);
        assert!(matches!(LadderConfig::load(&path), Err(ConfigError::Io(_))));
    }
}
