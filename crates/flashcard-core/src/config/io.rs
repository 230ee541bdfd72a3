use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("Parsing config tables")?;
    Ok(tables.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, ThemeMode};

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = parse_config("").expect("empty config parses");
        assert_eq!(cfg.theme, ThemeMode::Day);
        assert_eq!(cfg.cache_dir, ".cache");
        assert!(!cfg.strict_bounds);
        assert!((cfg.headword_rate - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn sectioned_tables_override_fields() {
        let cfg = parse_config(
            r#"
[appearance]
theme = "night"
font_size = 40

[dataset]
path = "words/es.json"

[navigation]
strict_bounds = true

[logging]
log_level = "warn"

[tts]
initial_rate = 0.5
"#,
        )
        .expect("config parses");

        assert_eq!(cfg.theme, ThemeMode::Night);
        assert_eq!(cfg.font_size, 40);
        assert_eq!(cfg.dataset_path.as_deref(), Some("words/es.json"));
        assert!(cfg.strict_bounds);
        assert_eq!(cfg.log_level, LogLevel::Warn);
        assert!((cfg.initial_rate - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(parse_config("[appearance\ntheme = ").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let cfg = load_config(&dir.path().join("absent.toml"));
        assert_eq!(cfg.log_level, LogLevel::Debug);
    }
}
