//! Post-step corrections
//!
//! Things the physics parameters alone can't express: an upward speed cap,
//! releasing the hit latch, keeping the ball near the z = 0 play plane, and
//! putting the ball back when it lands or escapes.

use super::physics::PhysicsCore;
use super::state::{ResetKind, Session};
use crate::config::GameConfig;
use crate::consts::{BALL_RADIUS, DEFAULT_SPAWN};

/// Run once per frame after the step and collision interpretation.
/// Returns the reset performed, if any.
pub fn stabilize(physics: &mut PhysicsCore, session: &mut Session, config: &GameConfig) -> Option<ResetKind> {
    let s = &config.stabilizer;
    let ball = physics.ball_state();
    let mut vel = ball.linvel;
    let pos = ball.position;

    // Resonance between bounces and hit impulses can pump the ball skyward
    if vel.y > s.max_up_velocity {
        vel.y = s.max_up_velocity;
    }

    if session.hit_latched && (vel.y < s.latch_release_vy || pos.y < s.latch_release_height) {
        session.hit_latched = false;
    }

    // Spring-damper toward the play plane
    vel.z = vel.z * s.depth_damping - pos.z * s.depth_correction;

    physics.set_ball_linvel(vel);

    let drop_line = physics.ground_y() + BALL_RADIUS;
    let reset = if pos.y < drop_line && !session.gesture.cooldown_active(session.now_ms) {
        Some(ResetKind::Drop)
    } else if !pos.is_finite()
        || !vel.is_finite()
        || pos.y > s.max_height
        || pos.x.abs() > s.max_abs_x
        || pos.z.abs() > s.max_abs_z
    {
        Some(ResetKind::OutOfBounds)
    } else {
        None
    };

    if let Some(kind) = reset {
        physics.respawn_ball(DEFAULT_SPAWN);
        session.register_reset(kind, &config.cues);
    }
    reset
}
