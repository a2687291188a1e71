use crate::command::DEFAULT_HISTORY_LIMIT;
use crate::error::{ConfigError, ConfigResult};
use crate::export::{ExportOptions, MAX_QUALITY, MIN_QUALITY};
use crate::file_handler::UploadLimits;
use crate::particles::ParticleSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TEXT_BEHIND_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "text-behind.json";

/// Settings read at startup. Every field has a default, so a partial file
/// (or none at all) is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub upload: UploadLimits,
    /// Snapshots kept for undo
    pub history_limit: usize,
    /// TTF/OTF used for the "Inter" family; the bundled font otherwise
    pub font_path: Option<PathBuf>,
    /// Where exports are written; the working directory otherwise
    pub export_dir: Option<PathBuf>,
    /// Initial export dialog settings
    pub export: ExportOptions,
    pub particles: ParticleSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            upload: UploadLimits::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            font_path: None,
            export_dir: None,
            export: ExportOptions::default(),
            particles: ParticleSettings::default(),
        }
    }
}

impl EditorConfig {
    /// The config path from the environment, or the default file name.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Reads and validates `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Like [`EditorConfig::load`], but falls back to the defaults on error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::error!("Ignoring config {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("historyLimit must be at least 1".into()));
        }
        if self.upload.max_bytes == 0 {
            return Err(ConfigError::Invalid("upload.maxBytes must be at least 1".into()));
        }
        if self.upload.accepted_types.is_empty() {
            return Err(ConfigError::Invalid("upload.acceptedTypes is empty".into()));
        }
        let quality = self.export.quality;
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(ConfigError::Invalid(format!(
                "export.quality {quality} is outside {MIN_QUALITY}..={MAX_QUALITY}"
            )));
        }
        if self.export.padding < 0.0 || self.export.border_radius < 0.0 {
            return Err(ConfigError::Invalid("export padding and radius must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = EditorConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.json");
        let mut config = EditorConfig::default();
        config.history_limit = 7;
        config.export.filename = "poster".into();
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "historyLimit": 5, "upload": { "maxBytes": 1024 } }"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.upload.max_bytes, 1024);
        assert_eq!(config.upload.accepted_types.len(), 3);
        assert_eq!(config.particles.max_particles, 100);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "historyLimit": 0 }"#).unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Invalid(_))));
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::SerializationError(_))));
    }
}
