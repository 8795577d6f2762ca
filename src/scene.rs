//! Interface to the external renderer and UI
//!
//! The core never draws anything. It tells a `Scene` what changed each frame
//! and the host (three.js page, native viewer, test double) does the rest.

use glam::{Quat, Vec3};

use crate::sim::state::{LegSide, Limb};

/// Ball flash colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCue {
    /// Resting color, restored when a flash expires
    Base,
    /// Scoring touch
    Hit,
    /// Ball hit the ground
    Drop,
    /// Ball escaped the play area
    OutOfBounds,
    /// T-pose reset fired
    GestureReset,
}

impl ColorCue {
    /// Packed 0xRRGGBB
    pub fn rgb(&self) -> u32 {
        match self {
            ColorCue::Base => 0xffffff,
            ColorCue::Hit => 0x00ff66,
            ColorCue::Drop => 0xff2020,
            ColorCue::OutOfBounds => 0xffd000,
            ColorCue::GestureReset => 0x3399ff,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorCue::Base => "base",
            ColorCue::Hit => "hit",
            ColorCue::Drop => "drop",
            ColorCue::OutOfBounds => "out_of_bounds",
            ColorCue::GestureReset => "gesture_reset",
        }
    }
}

/// Side effects the core drives on the renderer/UI
pub trait Scene {
    fn set_limb_marker_visible(&mut self, limb: Limb, visible: bool);
    fn set_limb_marker_position(&mut self, limb: Limb, position: Vec3);
    fn set_leg_line(&mut self, side: LegSide, from: Vec3, to: Vec3, visible: bool);
    fn set_ball_transform(&mut self, position: Vec3, rotation: Quat);
    fn set_ball_color(&mut self, cue: ColorCue, duration_ms: f64);
    fn set_score_text(&mut self, score: u32);
    fn set_gesture_indicator_visible(&mut self, visible: bool);
}

/// Scene that discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullScene;

impl Scene for NullScene {
    fn set_limb_marker_visible(&mut self, _limb: Limb, _visible: bool) {}
    fn set_limb_marker_position(&mut self, _limb: Limb, _position: Vec3) {}
    fn set_leg_line(&mut self, _side: LegSide, _from: Vec3, _to: Vec3, _visible: bool) {}
    fn set_ball_transform(&mut self, _position: Vec3, _rotation: Quat) {}
    fn set_ball_color(&mut self, _cue: ColorCue, _duration_ms: f64) {}
    fn set_score_text(&mut self, _score: u32) {}
    fn set_gesture_indicator_visible(&mut self, _visible: bool) {}
}
