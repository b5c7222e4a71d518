use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::LoadOptions;
use crate::synthetic::SyntheticParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User configuration, typically read from a JSON file. Missing sections
/// and fields fall back to their defaults.
///
/// ```json
/// { "load": { "gather_statistics": false }, "synthetic": { "threads": 4 } }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProflogConfig {
    pub load: LoadOptions,
    pub synthetic: SyntheticParams,
}

impl ProflogConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ProflogConfig =
            serde_json::from_str(r#"{"synthetic":{"threads":4}}"#).unwrap_or_default();
        assert_eq!(config.synthetic.threads, 4);
        assert_eq!(config.synthetic.frames_per_thread, 100);
        assert!(config.load.gather_statistics);
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("proflog.json");
        std::fs::write(&path, r#"{"load":{"gather_statistics":false}}"#).expect("write");

        let config = ProflogConfig::from_json_file(&path).expect("config");
        assert!(!config.load.gather_statistics);
    }

    #[test]
    fn reports_bad_json_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ nope").expect("write");

        let err = ProflogConfig::from_json_file(&path).expect_err("should fail");
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
