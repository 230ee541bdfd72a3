use super::defaults;
use super::models::{AppConfig, LogLevel, ThemeMode};
use serde::{Deserialize};

/// Sectioned on-disk layout of `config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct ConfigTables {
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    dataset: DatasetConfig,
    #[serde(default)]
    navigation: NavigationConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    tts: TtsConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            theme: tables.appearance.theme,
            font_size: tables.appearance.font_size,
            window_width: tables.appearance.window_width,
            window_height: tables.appearance.window_height,
            dataset_path: tables.dataset.path,
            cache_dir: tables.dataset.cache_dir,
            strict_bounds: tables.navigation.strict_bounds,
            initial_rate: tables.tts.initial_rate,
            headword_rate: tables.tts.headword_rate,
            tts_model_path: tables.tts.tts_model_path,
            tts_espeak_path: tables.tts.tts_espeak_path,
            log_level: tables.logging.log_level,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AppearanceConfig {
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default = "defaults::default_font_size")]
    font_size: u32,
    #[serde(default = "defaults::default_window_width")]
    window_width: f32,
    #[serde(default = "defaults::default_window_height")]
    window_height: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            font_size: defaults::default_font_size(),
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetConfig {
    #[serde(default)]
    path: Option<String>,
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            cache_dir: defaults::default_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct NavigationConfig {
    #[serde(default)]
    strict_bounds: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TtsConfig {
    #[serde(default = "defaults::default_tts_model")]
    tts_model_path: String,
    #[serde(default = "defaults::default_tts_espeak_path")]
    tts_espeak_path: String,
    #[serde(default = "defaults::default_initial_rate")]
    initial_rate: f32,
    #[serde(default = "defaults::default_headword_rate")]
    headword_rate: f32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            tts_model_path: defaults::default_tts_model(),
            tts_espeak_path: defaults::default_tts_espeak_path(),
            initial_rate: defaults::default_initial_rate(),
            headword_rate: defaults::default_headword_rate(),
        }
    }
}
