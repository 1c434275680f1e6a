//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Record store settings
    pub database: DatabaseConfig,
    /// OCR settings
    pub ocr: OcrSettings,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Region stored when a plate is registered without one
    pub default_region: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_region: "REGION UNKNOWN".to_string(),
        }
    }
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; defaults to `plates.db` in the data directory
    pub path: Option<PathBuf>,
    /// Table holding motorcycle records
    pub table: String,
    /// How long a blocked operation waits before failing
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            table: "motorcycles".to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Configured path, or `plates.db` under `data_dir`
    pub fn resolve_path(&self, data_dir: &Path) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir.join("plates.db"))
    }
}

/// OCR-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Extension of the saved provider response stored next to each image
    pub response_extension: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            response_extension: "json".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.general.default_region, "REGION UNKNOWN");

        assert!(config.database.path.is_none());
        assert_eq!(config.database.table, "motorcycles");
        assert_eq!(config.database.busy_timeout_ms, 5000);

        assert_eq!(config.ocr.response_extension, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.database.path = Some(PathBuf::from("/var/lib/plates/plates.db"));
        config.database.busy_timeout_ms = 250;
        config.general.default_region = "NCR".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.database.path, Some(PathBuf::from("/var/lib/plates/plates.db")));
        assert_eq!(parsed.database.busy_timeout_ms, 250);
        assert_eq!(parsed.general.default_region, "NCR");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str("[database]\ntable = \"plates\"\n").unwrap();
        assert_eq!(parsed.database.table, "plates");
        assert_eq!(parsed.database.busy_timeout_ms, 5000);
        assert_eq!(parsed.general.default_region, "REGION UNKNOWN");
    }

    #[test]
    fn test_resolve_database_path() {
        let data_dir = Path::new("/data");
        let mut db = DatabaseConfig::default();
        assert_eq!(db.resolve_path(data_dir), PathBuf::from("/data/plates.db"));

        db.path = Some(PathBuf::from("/elsewhere/x.db"));
        assert_eq!(db.resolve_path(data_dir), PathBuf::from("/elsewhere/x.db"));
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config.database.table, loaded.database.table);
        assert_eq!(config.logging.level, loaded.logging.level);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
