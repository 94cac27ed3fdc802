//! Tween timelines: when each string's displacement changes and how.

use serde::Serialize;

use super::TimingCurve;

/// Interpolation of one string's displacement over a time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tween {
    pub string_index: usize,
    pub from: f64,
    pub to: f64,
    /// Start time relative to the beginning of the timeline
    pub start_ms: f64,
    pub duration_ms: f64,
    pub curve: TimingCurve,
    /// Played backwards: the curve is mirrored in time
    pub reversed: bool,
}

impl Tween {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// Value at `t` (timeline time). Clamped to `from`/`to` outside the window.
    pub fn value_at(&self, t: f64) -> f64 {
        let progress = if self.duration_ms > 0.0 {
            (t - self.start_ms) / self.duration_ms
        } else if t >= self.start_ms {
            1.0
        } else {
            0.0
        };
        let eased = if self.reversed {
            1.0 - self.curve.apply(1.0 - progress.clamp(0.0, 1.0))
        } else {
            self.curve.apply(progress)
        };
        self.from + (self.to - self.from) * eased
    }

    /// The exact time reversal of this tween, starting at `start_ms`.
    pub fn reversal(&self, start_ms: f64) -> Self {
        Self {
            from: self.to,
            to: self.from,
            start_ms,
            reversed: !self.reversed,
            ..*self
        }
    }
}

/// All tweens of one bend, ordered by start time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tween: Tween) {
        let at = self.tweens.partition_point(|t| t.start_ms <= tween.start_ms);
        self.tweens.insert(at, tween);
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn for_string(&self, string_index: usize) -> impl Iterator<Item = &Tween> {
        self.tweens.iter().filter(move |t| t.string_index == string_index)
    }

    /// End of the last tween.
    pub fn duration_ms(&self) -> f64 {
        self.tweens.iter().map(Tween::end_ms).fold(0.0, f64::max)
    }

    /// Displacement of `string_index` at `t`: the latest tween that has
    /// started decides; before any has started the first one's `from` holds.
    pub fn value_at(&self, string_index: usize, t: f64) -> f64 {
        let mut tweens = self.for_string(string_index).peekable();
        let Some(first) = tweens.peek().copied() else {
            return 0.0;
        };
        let current = tweens.filter(|tw| tw.start_ms <= t).last().unwrap_or(first);
        current.value_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bend(curve: TimingCurve) -> Tween {
        Tween {
            string_index: 2,
            from: 0.0,
            to: 60.0,
            start_ms: 0.0,
            duration_ms: 300.0,
            curve,
            reversed: false,
        }
    }

    #[test]
    fn tween_clamps_outside_window() {
        let tw = bend(TimingCurve::Linear);
        assert_eq!(tw.value_at(-10.0), 0.0);
        assert_eq!(tw.value_at(150.0), 30.0);
        assert_eq!(tw.value_at(1000.0), 60.0);
    }

    #[test]
    fn reversal_mirrors_in_time() {
        let tw = bend(TimingCurve::EaseOut);
        let back = tw.reversal(800.0);
        for step in 0..=30 {
            let t = step as f64 * 10.0;
            let forward = tw.value_at(300.0 - t);
            let backward = back.value_at(800.0 + t);
            assert!((forward - backward).abs() < 1e-9, "t={t}: {forward} vs {backward}");
        }
        assert_eq!(back.value_at(1100.0), 0.0);
    }

    #[test]
    fn timeline_holds_between_tweens() {
        let tw = bend(TimingCurve::EaseOut);
        let mut timeline = Timeline::new();
        timeline.push(tw.reversal(800.0));
        timeline.push(tw);
        assert_eq!(timeline.tweens()[0].start_ms, 0.0);
        assert_eq!(timeline.duration_ms(), 1100.0);
        assert_eq!(timeline.value_at(2, 500.0), 60.0);
        assert_eq!(timeline.value_at(2, 1100.0), 0.0);
        assert_eq!(timeline.value_at(3, 500.0), 0.0);
    }
}
