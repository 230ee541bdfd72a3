//! Entry point for the flashcard viewer.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Load the word list (bundled or from disk).
//! - Launch the GUI application with the loaded words and config.

mod app;
mod tts;

use crate::app::run_app;
use anyhow::{Context, Result, anyhow};
use flashcard_core::config::load_config;
use flashcard_core::{WordList, load_word_list, parse_word_list};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const BUNDLED_WORDS: &str = include_str!("../assets/words.json");
const BUNDLED_DATASET_ID: &str = "bundled:words.json";
const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config_path: Option<PathBuf>,
    dataset_path: Option<PathBuf>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_config(&config_path);
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        config = %config_path.display(),
        level = %config.log_level,
        "Starting flashcard viewer"
    );
    info!(
        model = %config.tts_model_path,
        espeak = %config.tts_espeak_path,
        initial_rate = config.initial_rate,
        "Active TTS configuration"
    );

    let dataset_path = args
        .dataset_path
        .or_else(|| config.dataset_path.as_ref().map(PathBuf::from));
    let (words, dataset_id) = load_words(dataset_path.as_deref())?;
    if words.is_empty() {
        warn!(dataset = %dataset_id, "Word list is empty");
    }

    run_app(words, dataset_id, config).context("Failed to start the GUI")?;
    Ok(())
}

fn load_words(path: Option<&Path>) -> Result<(WordList, String)> {
    match path {
        Some(path) => {
            let words = load_word_list(path)?;
            let id = path
                .canonicalize()
                .unwrap_or_else(|_| path.to_path_buf())
                .to_string_lossy()
                .to_string();
            Ok((words, id))
        }
        None => {
            let words = parse_word_list(BUNDLED_WORDS).context("Parsing bundled word list")?;
            info!(entries = words.len(), "Using bundled word list");
            Ok((words, BUNDLED_DATASET_ID.to_string()))
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("Usage: flashcard-viewer [--config <path>] [<words.json>]"))?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => {
                return Err(anyhow!("Unknown option: {flag}"));
            }
            _ => {
                if parsed.dataset_path.is_some() {
                    return Err(anyhow!("Only one word list may be given"));
                }
                let path = PathBuf::from(arg);
                if !path.exists() {
                    return Err(anyhow!("File not found: {}", path.display()));
                }
                parsed.dataset_path = Some(path);
            }
        }
    }
    Ok(parsed)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_uses_defaults() {
        assert_eq!(parse_args(args(&[])).expect("parses"), CliArgs::default());
    }

    #[test]
    fn config_flag_takes_a_path() {
        let parsed = parse_args(args(&["--config", "alt.toml"])).expect("parses");
        assert_eq!(parsed.config_path, Some(PathBuf::from("alt.toml")));
        assert!(parse_args(args(&["--config"])).is_err());
    }

    #[test]
    fn rejects_unknown_flags_and_missing_files() {
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["/definitely/not/here.json"])).is_err());
    }

    #[test]
    fn bundled_word_list_starts_with_title_row() {
        let (words, id) = load_words(None).expect("bundled list parses");
        assert_eq!(id, BUNDLED_DATASET_ID);
        assert!(words.len() > 2);
        assert!(words.get(1).is_some());
    }
}
