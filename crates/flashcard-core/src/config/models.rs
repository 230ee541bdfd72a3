use serde::{Deserialize, Serialize};

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_font_size")]
    pub font_size: u32,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default)]
    pub dataset_path: Option<String>,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_tts_model")]
    pub tts_model_path: String,
    #[serde(default = "crate::config::defaults::default_tts_espeak_path")]
    pub tts_espeak_path: String,
    #[serde(default = "crate::config::defaults::default_initial_rate")]
    pub initial_rate: f32,
    #[serde(default = "crate::config::defaults::default_headword_rate")]
    pub headword_rate: f32,
    /// Stop navigation on the last entry instead of one past it.
    #[serde(default)]
    pub strict_bounds: bool,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::Day,
            font_size: crate::config::defaults::default_font_size(),
            window_width: crate::config::defaults::default_window_width(),
            window_height: crate::config::defaults::default_window_height(),
            dataset_path: None,
            cache_dir: crate::config::defaults::default_cache_dir(),
            tts_model_path: crate::config::defaults::default_tts_model(),
            tts_espeak_path: crate::config::defaults::default_tts_espeak_path(),
            initial_rate: crate::config::defaults::default_initial_rate(),
            headword_rate: crate::config::defaults::default_headword_rate(),
            strict_bounds: false,
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Day,
    Night,
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
