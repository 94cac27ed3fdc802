//! Board configuration.
//!
//! All fields have defaults, so a host may pass `{}` or only the keys it
//! wants to override:
//!
//! ```
//! use fretlib::FretboardConfig;
//!
//! let config = FretboardConfig::from_json(r#"{"num_frets": 12, "bend": {"overlap": 0.5}}"#).unwrap();
//! assert_eq!(config.num_frets, 12);
//! assert_eq!(config.bend.overlap, 0.5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::TimingCurve;
use crate::error::{FretError, Result};
use crate::model::Tuning;

/// Highest fret count the board will draw.
pub const MAX_FRETS: u8 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FretboardConfig {
    /// Number of fretted cells drawn after the nut
    pub num_frets: u8,
    /// Width of the first fret in SVG units
    pub fret_width_base: f64,
    /// Each fret is this fraction of the width of the one before it
    pub fret_width_multiplier: f64,
    /// Height of one string row
    pub row_height: f64,
    /// Width of the open-string label column
    pub label_width: f64,
    /// How far past the last fret the virtual saddle sits
    pub virtual_saddle_distance: f64,
    pub tuning: Tuning,
    pub bend: BendConfig,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Default for FretboardConfig {
    fn default() -> Self {
        Self {
            num_frets: 15,
            fret_width_base: 80.0,
            fret_width_multiplier: 0.97,
            row_height: 36.0,
            label_width: 44.0,
            virtual_saddle_distance: 10_000.0,
            tuning: Tuning::default(),
            bend: BendConfig::default(),
            title: None,
            subtitle: None,
        }
    }
}

/// Timing of a bend gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendConfig {
    /// Duration of the bend phase (and of the release phase)
    pub bend_duration_ms: f64,
    /// Duration of the hold phase
    pub hold_duration_ms: f64,
    /// Fraction of the bend phase the secondary string waits before moving
    pub overlap: f64,
    pub curve: TimingCurve,
}

impl Default for BendConfig {
    fn default() -> Self {
        Self {
            bend_duration_ms: 300.0,
            hold_duration_ms: 500.0,
            overlap: 0.3,
            curve: TimingCurve::EaseOut,
        }
    }
}

impl FretboardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FretboardConfig = serde_json::from_str(json)
            .map_err(|e| FretError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| FretError::Io(format!("Failed to read '{}': {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_frets == 0 || self.num_frets > MAX_FRETS {
            return Err(FretError::InvalidConfig(format!(
                "num_frets must be in 1..={MAX_FRETS}, got {}",
                self.num_frets
            )));
        }
        if !(self.fret_width_base > 0.0) {
            return Err(FretError::InvalidConfig("fret_width_base must be positive".into()));
        }
        if !(self.fret_width_multiplier > 0.0 && self.fret_width_multiplier <= 1.0) {
            return Err(FretError::InvalidConfig(
                "fret_width_multiplier must be in (0, 1]".into(),
            ));
        }
        if !(self.row_height > 0.0 && self.label_width > 0.0) {
            return Err(FretError::InvalidConfig("row_height and label_width must be positive".into()));
        }
        if !(self.virtual_saddle_distance > 0.0) {
            return Err(FretError::InvalidConfig(
                "virtual_saddle_distance must be positive".into(),
            ));
        }
        self.bend.validate()
    }
}

impl BendConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.bend_duration_ms > 0.0) {
            return Err(FretError::InvalidConfig("bend_duration_ms must be positive".into()));
        }
        if !(self.hold_duration_ms >= 0.0) {
            return Err(FretError::InvalidConfig("hold_duration_ms must not be negative".into()));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(FretError::InvalidConfig("overlap must be in [0, 1)".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_gives_defaults() {
        let config = FretboardConfig::from_json("{}").unwrap();
        assert_eq!(config, FretboardConfig::default());
    }

    #[test]
    fn partial_bend_override_keeps_other_defaults() {
        let config = FretboardConfig::from_json(r#"{"bend": {"hold_duration_ms": 1000}}"#).unwrap();
        assert_eq!(config.bend.hold_duration_ms, 1000.0);
        assert_eq!(config.bend.bend_duration_ms, 300.0);
        assert_eq!(config.bend.overlap, 0.3);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(FretboardConfig::from_json(r#"{"num_frets": 0}"#).is_err());
        assert!(FretboardConfig::from_json(r#"{"num_frets": 30}"#).is_err());
        assert!(FretboardConfig::from_json(r#"{"fret_width_multiplier": 1.5}"#).is_err());
        assert!(FretboardConfig::from_json(r#"{"bend": {"overlap": 1.0}}"#).is_err());
        assert!(FretboardConfig::from_json(r#"{"bend": {"bend_duration_ms": 0}}"#).is_err());
    }

    #[test]
    fn rejects_bad_tuning() {
        let json = r##"{"tuning": [
            {"label": "e", "open": "E", "open_midi": 64, "stroke_width": 2.0, "color": "#aaa"}
        ]}"##;
        assert!(matches!(
            FretboardConfig::from_json(json),
            Err(FretError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FretboardConfig::from_file("/nonexistent/fretlib.json").unwrap_err();
        assert!(matches!(err, FretError::Io(_)));
    }
}
