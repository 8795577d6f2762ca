//! Game configuration
//!
//! Start-time tuning values. Not reloadable at runtime: a `Game` copies the
//! config it was built with.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Physics world tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity along y (negative is down)
    pub gravity_y: f32,
    /// Ground top surface height
    pub ground_y: f32,
    /// Upward impulse applied to the ball on a scoring touch
    pub hit_impulse_y: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -8.0,
            ground_y: -0.5,
            hit_impulse_y: 0.7,
        }
    }
}

/// How normalized landmarks land in world space
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// World width covered by the full camera frame
    pub world_width: f32,
    /// World height covered by the full camera frame
    pub world_height: f32,
    /// Added to mapped y
    pub vertical_offset: f32,
    /// Landmarks below this visibility are treated as missing
    pub min_visibility: f32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            world_width: 6.0,
            world_height: 4.0,
            vertical_offset: -0.5,
            min_visibility: 0.3,
        }
    }
}

/// T-pose detection and hold timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Arm joints must be strictly above this visibility
    pub min_visibility: f32,
    /// Max normalized vertical offset between neighbouring arm joints
    pub level_tolerance: f32,
    /// Min normalized horizontal reach per arm segment
    pub min_extension: f32,
    /// Continuous hold needed to trigger a reset (ms)
    pub hold_ms: f64,
    /// Lockout after a triggered reset (ms)
    pub cooldown_ms: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_visibility: 0.4,
            level_tolerance: 0.1,
            min_extension: 0.05,
            hold_ms: 700.0,
            cooldown_ms: 2000.0,
        }
    }
}

/// Post-step corrections and play-area bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Upward speed cap
    pub max_up_velocity: f32,
    /// Hit latch clears once vy falls below this
    pub latch_release_vy: f32,
    /// Hit latch clears once the ball is below this height
    pub latch_release_height: f32,
    /// Per-frame multiplier on z velocity
    pub depth_damping: f32,
    /// Pull toward z = 0, proportional to z
    pub depth_correction: f32,
    /// Ball above this height is out of bounds
    pub max_height: f32,
    /// Ball beyond |x| is out of bounds
    pub max_abs_x: f32,
    /// Ball beyond |z| is out of bounds
    pub max_abs_z: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            max_up_velocity: 5.0,
            latch_release_vy: -0.1,
            latch_release_height: 0.5,
            depth_damping: 0.8,
            depth_correction: 0.1,
            max_height: 8.0,
            max_abs_x: 5.0,
            max_abs_z: 2.0,
        }
    }
}

/// Ball flash durations (ms)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    pub hit_ms: f64,
    pub drop_ms: f64,
    pub out_of_bounds_ms: f64,
    pub gesture_reset_ms: f64,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            hit_ms: 150.0,
            drop_ms: 600.0,
            out_of_bounds_ms: 400.0,
            gesture_reset_ms: 400.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub mapping: MappingConfig,
    pub gesture: GestureConfig,
    pub stabilizer: StabilizerConfig,
    pub cues: CueConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid game config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the simulation meaningless
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        ensure!(
            p.gravity_y.is_finite() && p.gravity_y < 0.0,
            "gravity_y must be finite and negative, got {}",
            p.gravity_y
        );
        ensure!(p.ground_y.is_finite(), "ground_y must be finite");
        ensure!(
            p.hit_impulse_y.is_finite() && p.hit_impulse_y >= 0.0,
            "hit_impulse_y must be finite and non-negative"
        );

        let m = &self.mapping;
        ensure!(
            m.world_width > 0.0 && m.world_height > 0.0,
            "world mapping dimensions must be positive"
        );
        ensure!(
            (0.0..=1.0).contains(&m.min_visibility),
            "mapping.min_visibility must be in [0, 1]"
        );

        let g = &self.gesture;
        ensure!(
            (0.0..=1.0).contains(&g.min_visibility),
            "gesture.min_visibility must be in [0, 1]"
        );
        ensure!(
            g.hold_ms >= 0.0 && g.cooldown_ms >= 0.0,
            "gesture durations must be non-negative"
        );

        let s = &self.stabilizer;
        ensure!(s.max_up_velocity > 0.0, "max_up_velocity must be positive");
        ensure!(
            (0.0..=1.0).contains(&s.depth_damping),
            "depth_damping must be in [0, 1]"
        );
        ensure!(
            s.max_height > p.ground_y,
            "max_height must be above the ground"
        );
        Ok(())
    }
}
