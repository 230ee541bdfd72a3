pub(crate) fn default_font_size() -> u32 {
    28
}

pub(crate) fn default_window_width() -> f32 {
    900.0
}

pub(crate) fn default_window_height() -> f32 {
    640.0
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_tts_model() -> String {
    "/usr/share/piper-voices/es/es_ES/davefx/medium/es_ES-davefx-medium.onnx".to_string()
}

pub(crate) fn default_tts_espeak_path() -> String {
    "/usr/share".to_string()
}

pub(crate) fn default_initial_rate() -> f32 {
    1.0
}

pub(crate) fn default_headword_rate() -> f32 {
    0.2
}

pub(crate) fn default_log_level() -> super::models::LogLevel {
    super::models::LogLevel::Debug
}
