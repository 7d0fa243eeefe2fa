//! Runtime configuration from `SMOOTHIE_*` environment variables
//!
//! `SMOOTHIE_API_URL`, `SMOOTHIE_DICTIONARY` and `SMOOTHIE_STORAGE` override
//! the endpoint, the dictionary location and the storage file. The
//! `SMOOTHIE_*_MS` variables override the [`Timing`] delays. A malformed value
//! is logged and the default kept.

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{debug, warn};

use crate::dictionary::DictionarySource;
use crate::lookup::DEFAULT_API_URL;

pub const DEFAULT_DICTIONARY: &str = "ressources/js/ingredients.json";
pub const DEFAULT_STORAGE: &str = ".smoothie-mixer.json";

/// Delays driving the progress choreography
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// One animation frame
    pub frame: Duration,
    /// How long the pulse cue stays on after 100%
    pub pulse: Duration,
    /// Wait before replaying the stored name, lets layout settle
    pub replay_delay: Duration,
    /// Give up on an image preload after this long
    pub preload_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            frame: Duration::from_millis(16),
            pulse: Duration::from_millis(600),
            replay_delay: Duration::from_millis(300),
            preload_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub dictionary: DictionarySource,
    pub storage_path: PathBuf,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            dictionary: DictionarySource::parse(DEFAULT_DICTIONARY),
            storage_path: PathBuf::from(DEFAULT_STORAGE),
            timing: Timing::default(),
        }
    }
}

impl Config {
    /// Read `SMOOTHIE_*` environment variables over the defaults
    pub fn load() -> Self {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Same as [`Config::load`] with an injectable variable source
    pub fn load_from<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let millis = |key: &str, default: Duration| {
            Duration::from_millis(try_load(&var, key, default.as_millis() as u64))
        };

        Config {
            api_url: var("SMOOTHIE_API_URL").unwrap_or(defaults.api_url),
            dictionary: var("SMOOTHIE_DICTIONARY")
                .map(|location| DictionarySource::parse(&location))
                .unwrap_or(defaults.dictionary),
            storage_path: var("SMOOTHIE_STORAGE")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            timing: Timing {
                frame: millis("SMOOTHIE_FRAME_MS", defaults.timing.frame),
                pulse: millis("SMOOTHIE_PULSE_MS", defaults.timing.pulse),
                replay_delay: millis("SMOOTHIE_REPLAY_DELAY_MS", defaults.timing.replay_delay),
                preload_timeout: millis(
                    "SMOOTHIE_PRELOAD_TIMEOUT_MS",
                    defaults.timing.preload_timeout,
                ),
            },
        }
    }
}

fn try_load<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        None => {
            debug!("{key} not set, using default: {default}");
            default
        }
    }
}
