//! Session state and core simulation types
//!
//! Everything the frame loop mutates besides the physics world lives in
//! `Session`. Components get it passed in explicitly; nothing is global.

use crate::config::{CueConfig, GestureConfig};
use crate::pose::Joint;
use crate::scene::ColorCue;

/// The four player limbs that exist as kinematic colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limb {
    LeftKnee,
    RightKnee,
    LeftFoot,
    RightFoot,
}

impl Limb {
    pub const ALL: [Limb; 4] = [Limb::LeftKnee, Limb::RightKnee, Limb::LeftFoot, Limb::RightFoot];

    /// Stable array slot (0..4)
    pub fn slot(self) -> usize {
        match self {
            Limb::LeftKnee => 0,
            Limb::RightKnee => 1,
            Limb::LeftFoot => 2,
            Limb::RightFoot => 3,
        }
    }

    /// Landmark that drives this limb
    pub fn joint(self) -> Joint {
        match self {
            Limb::LeftKnee => Joint::LeftKnee,
            Limb::RightKnee => Joint::RightKnee,
            Limb::LeftFoot => Joint::LeftFootIndex,
            Limb::RightFoot => Joint::RightFootIndex,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Limb::LeftKnee => "left_knee",
            Limb::RightKnee => "right_knee",
            Limb::LeftFoot => "left_foot",
            Limb::RightFoot => "right_foot",
        }
    }
}

/// Leg for knee → foot line drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegSide {
    Left = 0,
    Right = 1,
}

impl LegSide {
    pub const BOTH: [LegSide; 2] = [LegSide::Left, LegSide::Right];

    pub fn knee(self) -> Limb {
        match self {
            LegSide::Left => Limb::LeftKnee,
            LegSide::Right => Limb::RightKnee,
        }
    }

    pub fn foot(self) -> Limb {
        match self {
            LegSide::Left => Limb::LeftFoot,
            LegSide::Right => Limb::RightFoot,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LegSide::Left => "left",
            LegSide::Right => "right",
        }
    }
}

/// Why the ball was put back at a spawn point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// Ball reached the ground
    Drop,
    /// Ball escaped the play area (physics anomaly, not the player's fault)
    OutOfBounds,
    /// Player held a T-pose
    Gesture,
}

impl ResetKind {
    pub fn cue(self) -> ColorCue {
        match self {
            ResetKind::Drop => ColorCue::Drop,
            ResetKind::OutOfBounds => ColorCue::OutOfBounds,
            ResetKind::Gesture => ColorCue::GestureReset,
        }
    }

    /// Whether this reset costs the player their streak
    pub fn clears_score(self) -> bool {
        !matches!(self, ResetKind::OutOfBounds)
    }
}

/// T-pose hold phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldPhase {
    Idle,
    Holding { since_ms: f64 },
}

/// What a gesture update did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    /// Nothing changed
    None,
    /// Detection came on, hold timer started
    Started,
    /// Still holding, threshold not reached
    Continuing,
    /// Detection dropped before the threshold
    Cancelled,
    /// Pose tracking lost mid-hold
    Lost,
    /// Held long enough: reset now
    Triggered,
    /// Inside the post-trigger lockout
    CoolingDown,
}

/// Hold tracking for the reset gesture
#[derive(Debug, Clone)]
pub struct GestureState {
    pub phase: HoldPhase,
    /// Lockout end time after a trigger
    pub cooldown_until: Option<f64>,
}

impl Default for GestureState {
    fn default() -> Self {
        Self {
            phase: HoldPhase::Idle,
            cooldown_until: None,
        }
    }
}

impl GestureState {
    pub fn is_held(&self) -> bool {
        matches!(self.phase, HoldPhase::Holding { .. })
    }

    pub fn cooldown_active(&self, now_ms: f64) -> bool {
        self.cooldown_until.is_some_and(|until| now_ms < until)
    }

    /// Advance the hold machine.
    ///
    /// `detected` is `None` when no pose is being tracked at all, otherwise
    /// the per-frame T-pose result.
    pub fn update(&mut self, detected: Option<bool>, now_ms: f64, config: &GestureConfig) -> HoldEvent {
        if let Some(until) = self.cooldown_until {
            if now_ms < until {
                self.phase = HoldPhase::Idle;
                return HoldEvent::CoolingDown;
            }
            self.cooldown_until = None;
        }

        match (self.phase, detected) {
            (HoldPhase::Holding { .. }, None) => {
                self.phase = HoldPhase::Idle;
                HoldEvent::Lost
            }
            (HoldPhase::Holding { .. }, Some(false)) => {
                self.phase = HoldPhase::Idle;
                HoldEvent::Cancelled
            }
            (HoldPhase::Holding { since_ms }, Some(true)) => {
                if now_ms - since_ms >= config.hold_ms {
                    self.phase = HoldPhase::Idle;
                    self.cooldown_until = Some(now_ms + config.cooldown_ms);
                    HoldEvent::Triggered
                } else {
                    HoldEvent::Continuing
                }
            }
            (HoldPhase::Idle, Some(true)) => {
                self.phase = HoldPhase::Holding { since_ms: now_ms };
                HoldEvent::Started
            }
            (HoldPhase::Idle, _) => HoldEvent::None,
        }
    }
}

/// An active ball color flash
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub cue: ColorCue,
    pub expires_at: f64,
}

/// Per-session game state, owned by the frame loop
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Current keep-up streak
    pub score: u32,
    /// Best streak this session (not persisted)
    pub best_score: u32,
    /// Set by a scoring touch, cleared once the ball heads down again
    pub hit_latched: bool,
    pub gesture: GestureState,
    /// Flash currently showing, if any
    pub flash: Option<Flash>,
    /// Frame timestamp (ms), set at the start of each frame
    pub now_ms: f64,
    /// Frames run so far
    pub frames: u64,
    /// Color change the scene has not been told about yet
    pending_color: Option<(ColorCue, f64)>,
    score_dirty: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            score_dirty: true,
            ..Default::default()
        }
    }

    /// Count a keep-up
    pub fn add_point(&mut self) {
        self.score += 1;
        self.score_dirty = true;
        if self.score > self.best_score {
            self.best_score = self.score;
        }
    }

    pub fn clear_score(&mut self) {
        if self.score > 0 {
            log::info!("Streak ended at {} (best {})", self.score, self.best_score);
        }
        self.score = 0;
        self.score_dirty = true;
    }

    /// Start a flash, preempting whatever is showing
    pub fn flash(&mut self, cue: ColorCue, duration_ms: f64) {
        self.flash = Some(Flash {
            cue,
            expires_at: self.now_ms + duration_ms,
        });
        self.pending_color = Some((cue, duration_ms));
    }

    /// End an expired flash, queueing the base color once
    pub fn expire_flash(&mut self) {
        if let Some(flash) = self.flash {
            if self.now_ms >= flash.expires_at {
                self.flash = None;
                self.pending_color = Some((ColorCue::Base, 0.0));
            }
        }
    }

    /// Score, latch and flash bookkeeping for a ball reset.
    /// Moving the ball itself is up to the caller.
    pub fn register_reset(&mut self, kind: ResetKind, cues: &CueConfig) {
        if kind.clears_score() {
            self.clear_score();
        }
        self.hit_latched = false;
        let duration = match kind {
            ResetKind::Drop => cues.drop_ms,
            ResetKind::OutOfBounds => cues.out_of_bounds_ms,
            ResetKind::Gesture => cues.gesture_reset_ms,
        };
        self.flash(kind.cue(), duration);
        log::info!("Ball reset: {:?}", kind);
    }

    pub fn take_pending_color(&mut self) -> Option<(ColorCue, f64)> {
        self.pending_color.take()
    }

    /// Score to publish, if it changed since the last call
    pub fn take_score_update(&mut self) -> Option<u32> {
        if self.score_dirty {
            self.score_dirty = false;
            Some(self.score)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Feed `detected` at `times`; count triggers
    fn run(state: &mut GestureState, times: &[f64], detected: Option<bool>) -> usize {
        let config = GestureConfig::default();
        times
            .iter()
            .filter(|&&t| state.update(detected, t, &config) == HoldEvent::Triggered)
            .count()
    }

    #[test]
    fn test_hold_exactly_threshold_triggers_once() {
        let mut state = GestureState::default();
        let mut times: Vec<f64> = (0..42).map(|i| 1000.0 + i as f64 * FRAME_MS).collect();
        times.push(1700.0);
        assert_eq!(run(&mut state, &times, Some(true)), 1);
        assert!(state.cooldown_active(1700.0));
    }

    #[test]
    fn test_hold_just_short_does_not_trigger() {
        let mut state = GestureState::default();
        let config = GestureConfig::default();
        let mut times: Vec<f64> = (0..41).map(|i| 1000.0 + i as f64 * FRAME_MS).collect();
        times.push(1699.0);
        assert_eq!(run(&mut state, &times, Some(true)), 0);
        assert!(state.is_held());

        assert_eq!(state.update(Some(false), 1710.0, &config), HoldEvent::Cancelled);
        assert!(!state.is_held());
    }

    #[test]
    fn test_cooldown_blocks_second_trigger() {
        let mut state = GestureState::default();
        // Continuous detection for 2.5s at 60 fps, starting at t=0
        let times: Vec<f64> = (0..=150).map(|i| i as f64 * FRAME_MS).collect();
        assert_eq!(run(&mut state, &times, Some(true)), 1);

        // Trigger at ~700ms, lockout until ~2700ms
        assert!(state.cooldown_active(2500.0));
        assert!(!state.is_held());
    }

    #[test]
    fn test_retrigger_after_cooldown() {
        let mut state = GestureState::default();
        let times: Vec<f64> = (0..=400).map(|i| i as f64 * 10.0).collect();
        // Triggers at 700, locked until 2700, holds again from 2700, triggers at 3400
        assert_eq!(run(&mut state, &times, Some(true)), 2);
    }

    #[test]
    fn test_pose_lost_cancels_without_trigger() {
        let mut state = GestureState::default();
        let config = GestureConfig::default();
        assert_eq!(state.update(Some(true), 0.0, &config), HoldEvent::Started);
        assert_eq!(state.update(None, 500.0, &config), HoldEvent::Lost);
        assert_eq!(state.phase, HoldPhase::Idle);

        // A later detection starts a fresh hold
        assert_eq!(state.update(Some(true), 800.0, &config), HoldEvent::Started);
        assert_eq!(state.update(Some(true), 1400.0, &config), HoldEvent::Continuing);
    }

    #[test]
    fn test_score_and_best() {
        let mut session = Session::new();
        assert_eq!(session.take_score_update(), Some(0));
        assert_eq!(session.take_score_update(), None);

        session.add_point();
        session.add_point();
        assert_eq!(session.take_score_update(), Some(2));

        session.register_reset(ResetKind::Drop, &CueConfig::default());
        assert_eq!(session.score, 0);
        assert_eq!(session.best_score, 2);
        assert_eq!(session.take_score_update(), Some(0));
    }

    #[test]
    fn test_out_of_bounds_keeps_score() {
        let mut session = Session::new();
        session.add_point();
        session.hit_latched = true;
        session.register_reset(ResetKind::OutOfBounds, &CueConfig::default());
        assert_eq!(session.score, 1);
        assert!(!session.hit_latched);
        assert_eq!(
            session.take_pending_color(),
            Some((ColorCue::OutOfBounds, CueConfig::default().out_of_bounds_ms))
        );
    }

    #[test]
    fn test_flash_preempt_and_expire() {
        let mut session = Session::new();
        session.now_ms = 100.0;
        session.flash(ColorCue::Hit, 150.0);
        session.now_ms = 120.0;
        session.flash(ColorCue::Drop, 600.0);
        assert_eq!(session.take_pending_color(), Some((ColorCue::Drop, 600.0)));
        assert_eq!(session.flash.unwrap().expires_at, 720.0);

        // Old hit flash end time passes: nothing happens
        session.now_ms = 300.0;
        session.expire_flash();
        assert!(session.take_pending_color().is_none());

        session.now_ms = 720.0;
        session.expire_flash();
        assert_eq!(session.take_pending_color(), Some((ColorCue::Base, 0.0)));
        assert!(session.flash.is_none());

        // Only once
        session.expire_flash();
        assert!(session.take_pending_color().is_none());
    }
}
