//! Text-to-speech backend using `piper-rs` for synthesis and `rodio` for
//! playback. Each utterance is synthesized to a WAV under the cache directory
//! (keyed by model, text and rate) so repeated cards play instantly.

use anyhow::{Context, Result, anyhow, bail};
use flashcard_core::{SpeechEngine, Utterance};
use piper_rs::from_config_path;
use piper_rs::synth::{AudioOutputConfig, PiperSpeechSynthesizer};
use rodio::{Decoder, OutputStream, Sink};
use sha2::{Digest, Sha256};
use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use tracing::{debug, info, warn};

struct SpeechRequest {
    text: String,
    rate: f32,
    generation: u64,
}

/// Speed range Piper's sonic stage accepts; its 0-100 rate percent spans it.
const PIPER_SPEED_RANGE: (f32, f32) = (0.5, 5.5);

/// Shared between the UI handle and the audio thread. Only the audio thread
/// appends to `sink`.
struct Playback {
    sink: Sink,
    generation: AtomicU64,
    pending: AtomicUsize,
}

/// Handle to the audio thread. Requests play in submission order; `cancel`
/// drops everything queued or playing.
pub struct TtsEngine {
    requests: mpsc::Sender<SpeechRequest>,
    playback: Arc<Playback>,
}

impl TtsEngine {
    pub fn new(model_path: PathBuf, espeak_path: PathBuf, cache_root: PathBuf) -> Result<Self> {
        let espeak_path = sanitize_espeak_root(espeak_path);
        if env::var_os("PIPER_ESPEAKNG_DATA_DIRECTORY").is_none() {
            // Safe because we set a deterministic value before the audio thread starts.
            unsafe {
                env::set_var("PIPER_ESPEAKNG_DATA_DIRECTORY", &espeak_path);
            }
        }
        info!(
            model = %model_path.display(),
            espeak_root = %espeak_path.display(),
            cache = %cache_root.display(),
            "Initializing TTS engine"
        );

        let config_path = resolve_piper_config(&model_path);
        if !config_path.exists() {
            bail!(
                "Piper config not found at {} (expected from {})",
                config_path.display(),
                model_path.display()
            );
        }
        let model = from_config_path(&config_path).context("Loading Piper model")?;

        let (ready_tx, ready_rx) = mpsc::channel::<Result<Arc<Playback>>>();
        let (requests, request_rx) = mpsc::channel::<SpeechRequest>();
        thread::Builder::new()
            .name("tts-audio".to_string())
            .spawn(move || {
                let piper = match PiperSpeechSynthesizer::new(model)
                    .context("Preparing Piper synthesizer")
                {
                    Ok(piper) => piper,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let (_stream, handle) = match OutputStream::try_default()
                    .context("Opening audio output")
                {
                    Ok(pair) => pair,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let sink = match Sink::try_new(&handle).context("Creating sink") {
                    Ok(sink) => sink,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let playback = Arc::new(Playback {
                    sink,
                    generation: AtomicU64::new(0),
                    pending: AtomicUsize::new(0),
                });
                if ready_tx.send(Ok(Arc::clone(&playback))).is_err() {
                    return;
                }
                run_audio_loop(&piper, &model_path, &cache_root, &playback, request_rx);
                debug!("TTS audio thread exiting");
            })
            .context("Spawning TTS audio thread")?;

        let playback = ready_rx
            .recv()
            .map_err(|err| anyhow!("TTS audio thread exited during startup: {err}"))??;
        Ok(Self { requests, playback })
    }
}

impl SpeechEngine for TtsEngine {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        if utterance.text.trim().is_empty() {
            return Ok(());
        }
        let generation = self.playback.generation.load(Ordering::Acquire);
        self.playback.pending.fetch_add(1, Ordering::AcqRel);
        let request = SpeechRequest {
            text: utterance.text.clone(),
            rate: utterance.rate,
            generation,
        };
        if self.requests.send(request).is_err() {
            self.playback.pending.fetch_sub(1, Ordering::AcqRel);
            bail!("TTS audio thread is not running");
        }
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.playback.generation.fetch_add(1, Ordering::AcqRel);
        self.playback.sink.stop();
        debug!("Cancelled speech");
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.playback.pending.load(Ordering::Acquire) > 0 || !self.playback.sink.empty()
    }
}

fn run_audio_loop(
    piper: &PiperSpeechSynthesizer,
    model_path: &Path,
    cache_root: &Path,
    playback: &Playback,
    requests: mpsc::Receiver<SpeechRequest>,
) {
    for request in requests {
        if request.generation == playback.generation.load(Ordering::Acquire) {
            match prepare_clip(piper, model_path, cache_root, &request) {
                Ok(path) => append_clip(playback, &path, request.generation),
                Err(err) => warn!("Failed to synthesize utterance: {err:#}"),
            }
        } else {
            debug!("Dropping cancelled utterance");
        }
        playback.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

fn prepare_clip(
    piper: &PiperSpeechSynthesizer,
    model_path: &Path,
    cache_root: &Path,
    request: &SpeechRequest,
) -> Result<PathBuf> {
    let path = cache_path(cache_root, model_path, &request.text, request.rate);
    if path.exists() {
        return Ok(path);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Creating TTS cache directory")?;
    }
    debug!(
        path = %path.display(),
        rate = request.rate,
        chars = request.text.len(),
        "Synthesizing utterance with Piper"
    );
    let output_config = if (request.rate - 1.0).abs() <= f32::EPSILON {
        None
    } else {
        Some(AudioOutputConfig {
            rate: Some(rate_to_percent(request.rate)),
            volume: None,
            pitch: None,
            appended_silence_ms: None,
        })
    };
    piper
        .synthesize_to_file(&path, request.text.clone(), output_config)
        .context("Synthesizing audio")?;
    Ok(path)
}

fn append_clip(playback: &Playback, path: &Path, generation: u64) {
    let source = match File::open(path)
        .context("Opening cached clip")
        .and_then(|file| Decoder::new(BufReader::new(file)).context("Decoding cached clip"))
    {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %path.display(), "Skipping unplayable clip: {err:#}");
            return;
        }
    };
    let sink = &playback.sink;
    let queued = enqueue_if_current(
        &playback.generation,
        generation,
        || {
            sink.append(source);
            sink.play();
        },
        || sink.stop(),
    );
    if !queued {
        debug!("Utterance cancelled during synthesis");
    }
}

/// Append only while `generation` is current. A cancel that lands between the
/// check and the append is caught by the second check, which stops the sink.
fn enqueue_if_current(
    current: &AtomicU64,
    generation: u64,
    append: impl FnOnce(),
    stop: impl FnOnce(),
) -> bool {
    if generation != current.load(Ordering::Acquire) {
        return false;
    }
    append();
    if generation != current.load(Ordering::Acquire) {
        stop();
        return false;
    }
    true
}

fn cache_path(base: &Path, model_path: &Path, text: &str, rate: f32) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(model_path.as_os_str().to_string_lossy().as_bytes());
    hasher.update(text.as_bytes());
    hasher.update(rate.to_le_bytes());
    let hash = format!("{:x}", hasher.finalize());
    base.join(format!("tts-{hash}.wav"))
}

/// Piper expects the parent directory that contains `espeak-ng-data/phonindex`.
/// Users often point directly at `.../espeak-ng-data`; trim that to avoid
/// duplicated segments like `/espeak-ng-data/espeak-ng-data/phonindex`.
fn sanitize_espeak_root(path: PathBuf) -> PathBuf {
    if path
        .file_name()
        .map(|n| n == "espeak-ng-data")
        .unwrap_or(false)
    {
        if let Some(parent) = path.parent() {
            debug!(
                original = %path.display(),
                sanitized = %parent.display(),
                "Trimming espeak-ng-data suffix"
            );
            return parent.to_path_buf();
        }
    }
    path
}

fn resolve_piper_config(model_path: &Path) -> PathBuf {
    if model_path
        .extension()
        .map(|ext| ext == "onnx")
        .unwrap_or(false)
    {
        return model_path.with_extension("onnx.json");
    }
    model_path.to_path_buf()
}

/// Map a speed multiplier onto Piper's rate percent. Piper plays percent `p`
/// at `0.5 + p / 100 * 5`, so anything slower than x0.5 plays at x0.5.
fn rate_to_percent(rate: f32) -> u8 {
    let (min, max) = PIPER_SPEED_RANGE;
    let clamped = rate.clamp(min, max);
    let percent = ((clamped - min) / (max - min)) * 100.0;
    percent.round().clamp(0.0, 100.0) as u8
}
