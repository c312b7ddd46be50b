//! Configuration loading functionality.
//!
//! This module provides YAML file loading for [`EngineConfig`] and a shared
//! helper used by the achievement catalog loader.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and parses a YAML file into any deserializable type.
///
/// Shared by the engine-config and achievement-catalog loaders so both
/// report missing files and parse failures the same way.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}

/// Loads an [`EngineConfig`] from a YAML file and validates it.
///
/// Missing fields fall back to the canonical defaults, so a partial file is
/// fine.
///
/// # Errors
///
/// Returns an error if the file is missing (`ConfigNotFound`), fails to
/// parse (`ConfigParseError`), or contains inconsistent values
/// (`InvalidConfig`).
///
/// # Example
///
/// ```no_run
/// use shift_engine::config::load_config;
///
/// let config = load_config("./config/engine.yaml")?;
/// # Ok::<(), shift_engine::error::EngineError>(())
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> EngineResult<EngineConfig> {
    let config: EngineConfig = load_yaml(path.as_ref())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = load_config("/definitely/missing/engine.yaml");

        match result.unwrap_err() {
            EngineError::ConfigNotFound { path } => {
                assert_eq!(path, "/definitely/missing/engine.yaml");
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_reports_parse_error() {
        let path = write_temp("shift_engine_bad_config.yaml", "thresholds: [not, a, map]");

        let result = load_config(&path);
        assert!(matches!(
            result.unwrap_err(),
            EngineError::ConfigParseError { .. }
        ));
    }

    #[test]
    fn test_loads_partial_config_with_defaults() {
        let path = write_temp(
            "shift_engine_partial_config.yaml",
            "include_job_bonuses: true\n",
        );

        let config = load_config(&path).unwrap();
        assert!(config.include_job_bonuses);
        assert_eq!(config.thresholds, super::super::ShiftTypeThresholds::default());
    }

    #[test]
    fn test_inconsistent_config_rejected() {
        let path = write_temp(
            "shift_engine_inverted_config.yaml",
            "thresholds:\n  overtime_above_hours: 2\n  regular_min_hours: 6\n",
        );

        let result = load_config(&path);
        assert!(matches!(
            result.unwrap_err(),
            EngineError::InvalidConfig { .. }
        ));
    }
}
