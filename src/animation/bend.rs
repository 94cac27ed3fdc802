//! Bend plans and the scheduler that plays them against the board.

use log::debug;
use serde::Serialize;

use crate::board::BoardState;
use crate::config::BendConfig;
use crate::error::{FretError, Result};
use crate::model::{BendMagnitude, BendRequest};
use crate::renderer::geometry::{FretboardGeometry, Point};
use super::timeline::{Timeline, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Bend,
    Hold,
    Release,
    /// Past the end of the timeline; strings and glyphs go back to rest
    Settle,
}

/// Check a raw host request against the board before anything moves.
pub fn validate_bend(
    string_index: i64,
    fret: i64,
    halftones: i64,
    num_strings: usize,
    num_frets: u8,
) -> Result<BendRequest> {
    let invalid = |reason: &str| FretError::InvalidBend {
        string_index,
        fret,
        reason: reason.to_string(),
    };

    if string_index < 0 || string_index as usize >= num_strings {
        return Err(FretError::StringOutOfRange {
            index: string_index,
            count: num_strings,
        });
    }
    if fret < 1 || fret > num_frets as i64 {
        return Err(FretError::FretOutOfRange { fret, max: num_frets });
    }
    let magnitude = BendMagnitude::from_halftones(halftones)
        .ok_or_else(|| invalid(&format!("unsupported bend of {halftones} halftones")))?;

    // Bends push toward the lower-pitched neighbours, which must exist.
    let below = num_strings - 1 - string_index as usize;
    if below < magnitude.spacings() {
        return Err(invalid(match magnitude {
            BendMagnitude::HalfTone => "no lower string to bend toward",
            BendMagnitude::WholeTone => "whole-tone bend needs two lower strings",
        }));
    }

    Ok(BendRequest {
        string_index: string_index as usize,
        fret: fret as u8,
        magnitude,
    })
}

/// Where one string is pushed and how far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StringMotion {
    pub string_index: usize,
    /// Fret whose glyph rides along with the string
    pub fret: u8,
    pub push_x: f64,
    pub rest_y: f64,
    /// Peak downward displacement
    pub displacement: f64,
}

impl StringMotion {
    fn new(geometry: &FretboardGeometry, string_index: usize, fret: u8, spacings: usize) -> Option<Self> {
        let center = geometry.note_center(string_index, fret)?;
        Some(Self {
            string_index,
            fret,
            push_x: center.x,
            rest_y: center.y,
            displacement: geometry.displacement(string_index, spacings)?,
        })
    }

    fn push_point(&self, offset: f64) -> Point {
        Point::new(self.push_x, self.rest_y + offset)
    }
}

/// A fully resolved bend: the motions involved and their timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BendPlan {
    pub request: BendRequest,
    pub primary: StringMotion,
    /// The neighbouring string dragged along by a whole-tone bend
    pub secondary: Option<StringMotion>,
    pub timeline: Timeline,
    bend_ms: f64,
    hold_ms: f64,
}

impl BendPlan {
    pub fn new(request: BendRequest, geometry: &FretboardGeometry, timing: &BendConfig) -> Result<Self> {
        let missing = || FretError::InvalidBend {
            string_index: request.string_index as i64,
            fret: request.fret as i64,
            reason: "outside the board geometry".into(),
        };
        let d1 = timing.bend_duration_ms;
        let d2 = timing.hold_duration_ms;

        let primary = StringMotion::new(geometry, request.string_index, request.fret, request.magnitude.spacings())
            .ok_or_else(missing)?;
        let secondary = match request.magnitude {
            BendMagnitude::HalfTone => None,
            BendMagnitude::WholeTone => Some(
                StringMotion::new(geometry, request.string_index + 1, request.fret, 1).ok_or_else(missing)?,
            ),
        };

        let mut timeline = Timeline::new();
        let mut add = |motion: &StringMotion, delay: f64| {
            let bend = Tween {
                string_index: motion.string_index,
                from: 0.0,
                to: motion.displacement,
                start_ms: delay,
                duration_ms: d1 - delay,
                curve: timing.curve,
                reversed: false,
            };
            // Reversal maps bend time t onto release time d1 + d2 + (d1 - t).
            timeline.push(bend.reversal(d1 + d2));
            timeline.push(bend);
        };
        add(&primary, 0.0);
        if let Some(ref secondary) = secondary {
            add(secondary, timing.overlap * d1);
        }

        Ok(Self {
            request,
            primary,
            secondary,
            timeline,
            bend_ms: d1,
            hold_ms: d2,
        })
    }

    pub fn motions(&self) -> impl Iterator<Item = &StringMotion> {
        std::iter::once(&self.primary).chain(self.secondary.as_ref())
    }

    /// Strings this bend deforms.
    pub fn strings(&self) -> Vec<usize> {
        self.motions().map(|m| m.string_index).collect()
    }

    pub fn touches(&self, string_index: usize) -> bool {
        self.motions().any(|m| m.string_index == string_index)
    }

    pub fn duration_ms(&self) -> f64 {
        self.timeline.duration_ms()
    }

    pub fn phase_at(&self, elapsed_ms: f64) -> Phase {
        if elapsed_ms < self.bend_ms {
            Phase::Bend
        } else if elapsed_ms < self.bend_ms + self.hold_ms {
            Phase::Hold
        } else if elapsed_ms < self.duration_ms() {
            Phase::Release
        } else {
            Phase::Settle
        }
    }

    fn apply(&self, board: &mut BoardState, elapsed_ms: f64) {
        for motion in self.motions() {
            let offset = self.timeline.value_at(motion.string_index, elapsed_ms);
            board.set_push_point(motion.string_index, motion.push_point(offset));
            board.set_glyph_motion(motion.string_index, motion.fret, offset, true);
        }
    }

    fn restore(&self, board: &mut BoardState) {
        for motion in self.motions() {
            board.reset_string_path(motion.string_index);
            board.set_glyph_motion(motion.string_index, motion.fret, 0.0, false);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Scheduler
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct Running {
    plan: BendPlan,
    /// `None` until the first tick after a deferred start.
    started_ms: Option<f64>,
}

impl Running {
    fn elapsed(&self, now_ms: f64) -> f64 {
        self.started_ms.map_or(0.0, |start| (now_ms - start).max(0.0))
    }
}

/// Plays bends against the board. At most one bend owns a string at a time.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    running: Vec<Running>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `plan` at `now_ms`, first cancelling any bend that touches one
    /// of its strings.
    pub fn start(&mut self, plan: BendPlan, now_ms: f64, board: &mut BoardState) {
        self.schedule(plan, Some(now_ms), board);
    }

    /// Start `plan` at whatever time the next `tick` reports. Used when the
    /// host clock may be stale because no frames were requested while idle.
    pub fn start_on_next_tick(&mut self, plan: BendPlan, board: &mut BoardState) {
        self.schedule(plan, None, board);
    }

    fn schedule(&mut self, plan: BendPlan, started_ms: Option<f64>, board: &mut BoardState) {
        for string_index in plan.strings() {
            self.cancel(string_index, board);
        }
        debug!(
            "bend start: strings {:?} fret {} ({:?}) at {:?}ms",
            plan.strings(),
            plan.request.fret,
            plan.request.magnitude,
            started_ms
        );
        plan.apply(board, 0.0);
        self.running.push(Running { plan, started_ms });
    }

    /// Cancel the bend touching `string_index`, restoring its strings at once.
    /// Returns whether anything was cancelled.
    pub fn cancel(&mut self, string_index: usize, board: &mut BoardState) -> bool {
        let Some(i) = self.running.iter().position(|r| r.plan.touches(string_index)) else {
            return false;
        };
        let cancelled = self.running.remove(i);
        cancelled.plan.restore(board);
        debug!("bend on strings {:?} cancelled", cancelled.plan.strings());
        true
    }

    pub fn cancel_all(&mut self, board: &mut BoardState) {
        for running in self.running.drain(..) {
            running.plan.restore(board);
        }
    }

    /// Advance every running bend to `now_ms`. Finished bends settle and are
    /// removed. Returns true while anything is still moving.
    pub fn tick(&mut self, now_ms: f64, board: &mut BoardState) -> bool {
        self.running.retain_mut(|running| {
            let start = *running.started_ms.get_or_insert(now_ms);
            let elapsed = (now_ms - start).max(0.0);
            match running.plan.phase_at(elapsed) {
                Phase::Settle => {
                    running.plan.restore(board);
                    debug!("bend on strings {:?} settled", running.plan.strings());
                    false
                }
                _ => {
                    running.plan.apply(board, elapsed);
                    true
                }
            }
        });
        !self.running.is_empty()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    pub fn is_running(&self, string_index: usize) -> bool {
        self.running.iter().any(|r| r.plan.touches(string_index))
    }

    /// Phase of the bend owning `string_index` at `now_ms`.
    pub fn phase(&self, string_index: usize, now_ms: f64) -> Option<Phase> {
        self.running
            .iter()
            .find(|r| r.plan.touches(string_index))
            .map(|r| r.plan.phase_at(r.elapsed(now_ms)))
    }

    pub fn plans(&self) -> impl Iterator<Item = &BendPlan> {
        self.running.iter().map(|r| &r.plan)
    }
}

/// Validate a raw host request and plan it against the board's geometry.
pub fn plan_bend(board: &BoardState, string_index: i64, fret: i64, halftones: i64) -> Result<BendPlan> {
    let request = validate_bend(string_index, fret, halftones, board.tuning().len(), board.num_frets())?;
    BendPlan::new(request, board.geometry(), &board.config().bend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FretboardConfig;
    use crate::tuning::c_major_pentatonic;
    use pretty_assertions::assert_eq;

    fn board() -> BoardState {
        let mut board = BoardState::new(FretboardConfig::default()).unwrap();
        board.render_scale(&c_major_pentatonic());
        board
    }

    fn plan(board: &BoardState, string_index: i64, fret: i64, halftones: i64) -> BendPlan {
        plan_bend(board, string_index, fret, halftones).unwrap()
    }

    #[test]
    fn rejects_bend_on_lowest_string() {
        let err = validate_bend(5, 10, 1, 6, 15).unwrap_err();
        assert!(matches!(err, FretError::InvalidBend { string_index: 5, .. }));
    }

    #[test]
    fn rejects_out_of_range_requests() {
        assert!(matches!(validate_bend(6, 3, 1, 6, 15), Err(FretError::StringOutOfRange { .. })));
        assert!(matches!(validate_bend(-1, 3, 1, 6, 15), Err(FretError::StringOutOfRange { .. })));
        assert!(matches!(validate_bend(0, 0, 1, 6, 15), Err(FretError::FretOutOfRange { .. })));
        assert!(matches!(validate_bend(0, 16, 1, 6, 15), Err(FretError::FretOutOfRange { .. })));
        assert!(matches!(validate_bend(0, 3, 3, 6, 15), Err(FretError::InvalidBend { .. })));
        assert!(matches!(validate_bend(4, 3, 2, 6, 15), Err(FretError::InvalidBend { .. })));
        assert!(validate_bend(3, 3, 2, 6, 15).is_ok());
        assert!(validate_bend(4, 3, 1, 6, 15).is_ok());
    }

    #[test]
    fn whole_tone_secondary_starts_late_and_ends_together() {
        let board = board();
        let plan = plan(&board, 2, 9, 2);
        let d1 = board.config().bend.bend_duration_ms;
        assert_eq!(plan.strings(), vec![2, 3]);

        let primary: Vec<&Tween> = plan.timeline.for_string(2).collect();
        let secondary: Vec<&Tween> = plan.timeline.for_string(3).collect();
        assert_eq!(primary[0].start_ms, 0.0);
        assert!((secondary[0].start_ms - 0.3 * d1).abs() < 1e-9);
        assert!((primary[0].end_ms() - d1).abs() < 1e-9);
        assert!((secondary[0].end_ms() - d1).abs() < 1e-9);

        let geometry = board.geometry();
        assert_eq!(primary[0].to, geometry.displacement(2, 2).unwrap());
        assert_eq!(secondary[0].to, geometry.displacement(3, 1).unwrap());
        assert_eq!(plan.timeline.value_at(3, 0.2 * d1), 0.0);
        assert!(plan.timeline.value_at(2, 0.2 * d1) > 0.0);
    }

    #[test]
    fn phases_follow_the_timeline() {
        let board = board();
        let plan = plan(&board, 0, 5, 1);
        let bend = &board.config().bend;
        let (d1, d2) = (bend.bend_duration_ms, bend.hold_duration_ms);
        assert_eq!(plan.phase_at(0.0), Phase::Bend);
        assert_eq!(plan.phase_at(d1 + 1.0), Phase::Hold);
        assert_eq!(plan.phase_at(d1 + d2 + 1.0), Phase::Release);
        assert_eq!(plan.phase_at(2.0 * d1 + d2), Phase::Settle);
        assert_eq!(plan.duration_ms(), 2.0 * d1 + d2);
    }

    #[test]
    fn tick_deforms_then_settles() {
        let mut board = board();
        let mut animator = Animator::new();
        // G string fret 7 is D, drawn in C major pentatonic
        let plan = plan(&board, 2, 7, 1);
        let spacing = board.geometry().displacement(2, 1).unwrap();
        let rest_y = board.geometry().string_y[2];
        animator.start(plan, 1000.0, &mut board);

        assert!(animator.tick(1000.0 + 400.0, &mut board));
        let path = board.string_path(2).unwrap().to_vec();
        assert_eq!(path.len(), 3);
        assert_eq!(path[1].y, rest_y + spacing);
        assert_eq!(path[1].x, board.geometry().note_center(2, 7).unwrap().x);
        let glyph = board.glyphs().placed(2, 7).unwrap();
        assert_eq!(glyph.offset_y, spacing);
        assert!(glyph.elevated);
        assert_eq!(animator.phase(2, 1400.0), Some(Phase::Hold));

        assert!(!animator.tick(1000.0 + 5000.0, &mut board));
        assert_eq!(board.string_path(2).unwrap(), board.rest_path(2).unwrap().as_slice());
        let glyph = board.glyphs().placed(2, 7).unwrap();
        assert_eq!(glyph.offset_y, 0.0);
        assert!(!glyph.elevated);
        assert!(animator.is_idle());
    }

    #[test]
    fn deferred_start_anchors_on_first_tick() {
        let mut board = board();
        let mut animator = Animator::new();
        let d1 = board.config().bend.bend_duration_ms;
        animator.start_on_next_tick(plan(&board, 2, 7, 1), &mut board);
        assert_eq!(animator.phase(2, 1_000_000.0), Some(Phase::Bend));

        // However late the first frame arrives, the bend plays from its start
        assert!(animator.tick(10_016.0, &mut board));
        assert_eq!(animator.phase(2, 10_016.0), Some(Phase::Bend));
        assert!(animator.tick(10_016.0 + d1 + 1.0, &mut board));
        assert_eq!(animator.phase(2, 10_016.0 + d1 + 1.0), Some(Phase::Hold));
        assert!(!animator.tick(20_000.0, &mut board));
        assert!(animator.is_idle());
    }

    #[test]
    fn release_mirrors_bend() {
        let board = board();
        let plan = plan(&board, 1, 3, 1);
        let bend = &board.config().bend;
        let (d1, d2) = (bend.bend_duration_ms, bend.hold_duration_ms);
        for t in [0.0, 50.0, 120.0, 299.0] {
            let going = plan.timeline.value_at(1, t);
            let coming = plan.timeline.value_at(1, d1 + d2 + (d1 - t));
            assert!((going - coming).abs() < 1e-9);
        }
    }

    #[test]
    fn new_bend_on_same_string_restarts() {
        let mut board = board();
        let mut animator = Animator::new();
        animator.start(plan(&board, 2, 9, 2), 0.0, &mut board);
        animator.tick(200.0, &mut board);
        assert!(animator.is_running(3));

        // Half-tone on string 3 takes it over; string 2 goes back to rest.
        animator.start(plan(&board, 3, 5, 1), 200.0, &mut board);
        assert!(!animator.is_running(2));
        assert!(animator.is_running(3));
        assert_eq!(animator.plans().count(), 1);
        assert_eq!(board.string_path(2).unwrap(), board.rest_path(2).unwrap().as_slice());
        assert_eq!(animator.phase(3, 200.0), Some(Phase::Bend));
    }

    #[test]
    fn independent_strings_run_together() {
        let mut board = board();
        let mut animator = Animator::new();
        animator.start(plan(&board, 0, 3, 1), 0.0, &mut board);
        animator.start(plan(&board, 3, 5, 1), 0.0, &mut board);
        assert_eq!(animator.plans().count(), 2);
        animator.cancel_all(&mut board);
        assert!(animator.is_idle());
        assert_eq!(board.string_path(0).unwrap().len(), 2);
    }

    #[test]
    fn bend_without_glyph_still_moves_string() {
        let mut board = BoardState::new(FretboardConfig::default()).unwrap();
        let mut animator = Animator::new();
        animator.start(plan(&board, 0, 1, 1), 0.0, &mut board);
        animator.tick(150.0, &mut board);
        assert_eq!(board.string_path(0).unwrap().len(), 3);
    }
}
