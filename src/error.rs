//! Error types for fretlib.
//!
//! Every failure in this crate degrades to "no visual change" plus a log
//! line at the host bridge. The variants below let callers of the fallible
//! `try_*` APIs tell the three failure classes apart:
//! - malformed external input (`MalformedInput`, `InvalidConfig`, `Io`)
//! - unknown identifiers (`UnknownString`, `UnknownPosition`, `UnknownScale`, `UnknownPitch`)
//! - geometric precondition violations (`InvalidBend`, `FretOutOfRange`, `StringOutOfRange`)

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FretError {
    /// A serialized payload from the host could not be decoded.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A string label that is not part of the tuning.
    #[error("Unknown string '{0}'")]
    UnknownString(String),

    /// A position name not defined on the current scale.
    #[error("Position '{position}' not found on scale '{scale}'")]
    UnknownPosition { scale: String, position: String },

    /// A scale name that is not in the built-in library.
    #[error("Unknown scale '{0}'")]
    UnknownScale(String),

    /// A pitch-class name outside the sharps-only 12-tone cycle.
    #[error("Unknown pitch class '{0}'")]
    UnknownPitch(String),

    #[error("Fret {fret} out of range (0..={max})")]
    FretOutOfRange { fret: i64, max: u8 },

    #[error("String index {index} out of range (0..{count})")]
    StringOutOfRange { index: i64, count: usize },

    /// A bend whose magnitude/string combination has no valid target.
    #[error("Invalid bend on string {string_index} fret {fret}: {reason}")]
    InvalidBend {
        string_index: i64,
        fret: i64,
        reason: String,
    },

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A rendered document did not contain a readable grid layout.
    #[error("Layout error: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, FretError>;

impl From<serde_json::Error> for FretError {
    fn from(e: serde_json::Error) -> Self {
        FretError::MalformedInput(e.to_string())
    }
}
