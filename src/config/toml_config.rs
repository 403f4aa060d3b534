use crate::core::ConfigProvider;
use crate::utils::error::{GymError, Result};
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GymConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub members_file: String,
    pub classes_file: String,
    pub enrollments_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            members_file: "members.csv".to_string(),
            classes_file: "classes.csv".to_string(),
            enrollments_file: "enrollments.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: LogFormat,
}

impl GymConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GymError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GymError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GymError::ConfigError {
            message: format!("TOML serialization error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GYM_DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GymError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn with_data_dir(mut self, data_dir: Option<String>) -> Self {
        if let Some(data_dir) = data_dir {
            self.storage.data_dir = data_dir;
        }
        self
    }
}

impl Validate for GymConfig {
    fn validate(&self) -> Result<()> {
        let storage = &self.storage;
        validate_path("storage.data_dir", &storage.data_dir)?;
        validate_path("storage.members_file", &storage.members_file)?;
        validate_path("storage.classes_file", &storage.classes_file)?;
        validate_path("storage.enrollments_file", &storage.enrollments_file)?;

        validate_file_extension("storage.members_file", &storage.members_file, &["csv"])?;
        validate_file_extension("storage.classes_file", &storage.classes_file, &["csv"])?;
        validate_file_extension(
            "storage.enrollments_file",
            &storage.enrollments_file,
            &["json"],
        )?;

        if storage.members_file == storage.classes_file {
            return Err(GymError::validation(
                "storage.classes_file",
                &storage.classes_file,
                "Members and classes must be stored in different files",
            ));
        }

        if let Some(level) = &self.logging.level {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.as_str()) {
                return Err(GymError::validation(
                    "logging.level",
                    level,
                    format!("Unsupported level. Valid levels: {}", valid_levels.join(", ")),
                ));
            }
        }

        Ok(())
    }
}

impl ConfigProvider for GymConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn members_file(&self) -> &str {
        &self.storage.members_file
    }

    fn classes_file(&self) -> &str {
        &self.storage.classes_file
    }

    fn enrollments_file(&self) -> &str {
        &self.storage.enrollments_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GymConfig::from_toml_str("").unwrap();

        assert_eq!(config, GymConfig::default());
        assert_eq!(config.data_dir(), "data");
        assert_eq!(config.enrollments_file(), "enrollments.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_storage_section() {
        let config = GymConfig::from_toml_str(
            r#"
[storage]
data_dir = "info"
members_file = "miembros.csv"

[logging]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir(), "info");
        assert_eq!(config.members_file(), "miembros.csv");
        assert_eq!(config.classes_file(), "classes.csv");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GYM_RECORDS_TEST_DIR", "/tmp/gym");
        let config = GymConfig::from_toml_str(
            r#"
[storage]
data_dir = "${GYM_RECORDS_TEST_DIR}"
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir(), "/tmp/gym");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let config = GymConfig::from_toml_str(
            r#"
[storage]
data_dir = "${GYM_RECORDS_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir(), "${GYM_RECORDS_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = GymConfig::from_toml_str("[storage\ndata_dir = 1").unwrap_err();
        assert!(matches!(err, GymError::ConfigError { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_files() {
        let mut config = GymConfig::default();
        config.storage.members_file = "members.json".to_string();
        assert!(config.validate().is_err());

        let mut config = GymConfig::default();
        config.storage.enrollments_file = "enrollments.csv".to_string();
        assert!(config.validate().is_err());

        let mut config = GymConfig::default();
        config.storage.classes_file = config.storage.members_file.clone();
        assert!(config.validate().is_err());

        let mut config = GymConfig::default();
        config.logging.level = Some("loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_data_dir_override_and_round_trip() {
        let config = GymConfig::default().with_data_dir(Some("elsewhere".to_string()));
        assert_eq!(config.data_dir(), "elsewhere");

        let text = config.to_toml_string().unwrap();
        assert_eq!(GymConfig::from_toml_str(&text).unwrap(), config);
    }
}
