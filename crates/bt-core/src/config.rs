//! Fixed invocation and scraper defaults.
//!
//! There is no config file, no environment input, and no CLI knob feeding
//! these values; behavior is fully determined by the defaults below. The
//! structs exist so tests can construct variants.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The build invocation the diagnoser runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Program to execute.
    pub program: String,

    /// Fixed argument vector, never interpreted by a shell.
    pub args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "./gradlew".to_string(),
            args: vec!["assembleDebug".to_string()],
        }
    }
}

/// Image scraper behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Root directory downloads land in; images go to `<output_dir>/<query>/`.
    pub output_dir: PathBuf,

    /// Keep the search engine's safe-search filter on.
    pub safe_search: bool,

    /// Overwrite files that already exist on disk.
    pub force_replace: bool,

    /// Per-item download timeout in seconds.
    pub timeout_secs: u64,

    /// Result-page size when walking the search index.
    pub page_size: usize,

    /// Print per-image progress while downloading.
    pub verbose: bool,
}

impl ScrapeConfig {
    /// Per-item timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("scraped_images"),
            safe_search: true,
            force_replace: false,
            timeout_secs: 60,
            page_size: 35,
            verbose: true,
        }
    }
}
