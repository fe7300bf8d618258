//! Error type for the few fallible engine operations.
//!
//! Per-frame work never fails: malformed colors fall back, bad scroll
//! samples are just numbers. Errors only come from mounting an effect
//! without somewhere to draw, and from loading tuning files.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The host had no drawing surface or rendering context to give.
    #[error("no drawing surface available for {effect}")]
    MissingSurface { effect: &'static str },

    #[error("failed to read config {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
