//! Bend animation: tween timelines, bend plans and the per-string scheduler.
//!
//! A bend runs through four phases on one timeline:
//!   Bend (d1) → Hold (d2) → Release (d1, the Bend played backwards) → Settle
//!
//! The host drives time: [`Animator::tick`] is called with the current
//! clock and writes the interpolated push points and glyph offsets into the
//! board, which the renderer then serializes like any other state.

mod bend;
mod timeline;

use serde::{Deserialize, Serialize};

pub use bend::{plan_bend, validate_bend, Animator, BendPlan, Phase, StringMotion};
pub use timeline::{Timeline, Tween};

/// Easing applied to a tween's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingCurve {
    Linear,
    /// Slow start
    EaseIn,
    /// Slow end
    #[default]
    EaseOut,
    EaseInOut,
}

impl TimingCurve {
    /// Map linear progress `t` in [0, 1] onto the curve. Input is clamped.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingCurve::Linear => t,
            TimingCurve::EaseIn => t * t,
            TimingCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            TimingCurve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [TimingCurve; 4] = [
        TimingCurve::Linear,
        TimingCurve::EaseIn,
        TimingCurve::EaseOut,
        TimingCurve::EaseInOut,
    ];

    #[test]
    fn curves_pin_endpoints() {
        for curve in CURVES {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?}");
            assert_eq!(curve.apply(1.0), 1.0, "{curve:?}");
            assert_eq!(curve.apply(-3.0), 0.0);
            assert_eq!(curve.apply(7.0), 1.0);
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in CURVES {
            let samples: Vec<f64> = (0..=50).map(|i| curve.apply(i as f64 / 50.0)).collect();
            assert!(samples.windows(2).all(|w| w[1] >= w[0]), "{curve:?}");
        }
    }

    #[test]
    fn ease_shapes() {
        assert!(TimingCurve::EaseOut.apply(0.25) > 0.25);
        assert!(TimingCurve::EaseIn.apply(0.25) < 0.25);
        assert_eq!(TimingCurve::EaseInOut.apply(0.5), 0.5);
    }

    #[test]
    fn timing_curve_serde() {
        let curves = [
            (TimingCurve::Linear, "\"linear\""),
            (TimingCurve::EaseIn, "\"ease_in\""),
            (TimingCurve::EaseOut, "\"ease_out\""),
            (TimingCurve::EaseInOut, "\"ease_in_out\""),
        ];
        for (curve, json) in curves {
            assert_eq!(serde_json::to_string(&curve).unwrap(), json);
            assert_eq!(serde_json::from_str::<TimingCurve>(json).unwrap(), curve);
        }
    }
}
