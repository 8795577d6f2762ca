//! Collision interpretation: ball–limb contacts become keep-ups
//!
//! Scoring is latched globally, not per limb. A knee and a foot touching the
//! ball in the same step still count once; the latch is released by the
//! stabilizer when the ball is on its way down again.

use glam::Vec3;

use super::physics::{ContactEvent, PhysicsCore};
use super::state::{Limb, Session};
use crate::config::GameConfig;
use crate::scene::ColorCue;

/// A scoring touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub limb: Limb,
    pub impulse: Vec3,
    /// Score after this touch
    pub score: u32,
}

/// Walk one step's events in order and score at most one touch.
pub fn interpret_contacts(
    events: &[ContactEvent],
    physics: &mut PhysicsCore,
    session: &mut Session,
    config: &GameConfig,
) -> Option<Hit> {
    let ball = physics.ball_collider();
    let mut scored = None;

    for event in events {
        if !event.started || session.hit_latched {
            continue;
        }
        let Some(limb) = event.other(ball).and_then(|h| physics.limb_for_collider(h)) else {
            continue;
        };

        session.add_point();
        session.hit_latched = true;

        let impulse = Vec3::new(0.0, config.physics.hit_impulse_y, 0.0);
        physics.apply_ball_impulse(impulse);
        session.flash(ColorCue::Hit, config.cues.hit_ms);

        log::debug!("Keep-up #{} off {}", session.score, limb.as_str());
        scored = Some(Hit {
            limb,
            impulse,
            score: session.score,
        });
    }

    scored
}
