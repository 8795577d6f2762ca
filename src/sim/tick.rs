//! Per-frame orchestration
//!
//! One call per rendered frame, never re-entered. Order matters:
//! gesture → limbs → physics step → scoring → publish ball → stabilize.

use glam::Vec3;

use super::collision::{Hit, interpret_contacts};
use super::physics::PhysicsCore;
use super::stabilizer::stabilize;
use super::state::{HoldEvent, LegSide, Limb, ResetKind, Session};
use crate::config::{GameConfig, MappingConfig};
use crate::consts::{DEFAULT_SPAWN, SHOULDER_SPAWN_LIFT};
use crate::pose::{Joint, PoseSnapshot, detect_t_pose, map_landmark};
use crate::scene::Scene;

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub score: u32,
    pub hit: Option<Hit>,
    pub reset: Option<ResetKind>,
    pub hold: HoldEvent,
    /// Collision start/stop events the step produced
    pub contacts: usize,
}

/// Advance the game by one frame.
///
/// `pose` is the latest completed inference, possibly stale, or `None` when
/// nothing is tracked. `now_ms` should be monotonic; a timestamp that goes
/// backwards is treated as no time passing.
pub fn frame(
    physics: &mut PhysicsCore,
    session: &mut Session,
    pose: Option<&PoseSnapshot>,
    now_ms: f64,
    config: &GameConfig,
    scene: &mut dyn Scene,
) -> FrameReport {
    let first_frame = session.frames == 0;
    session.frames += 1;
    session.now_ms = if first_frame { now_ms } else { now_ms.max(session.now_ms) };
    session.expire_flash();

    // 1. Reset gesture
    let was_held = session.gesture.is_held();
    let detected = pose.map(|p| detect_t_pose(p, &config.gesture));
    let hold = session.gesture.update(detected, session.now_ms, &config.gesture);
    let mut reset = None;
    if hold == HoldEvent::Triggered {
        let spawn = pose
            .and_then(|p| shoulder_spawn(p, &config.mapping))
            .unwrap_or(DEFAULT_SPAWN);
        physics.respawn_ball(spawn);
        session.register_reset(ResetKind::Gesture, &config.cues);
        reset = Some(ResetKind::Gesture);
    }
    let held = session.gesture.is_held();
    if first_frame || held != was_held {
        scene.set_gesture_indicator_visible(held);
    }

    // 2. Limbs follow the pose, or leave the stage
    let mut points = [None; 4];
    for limb in Limb::ALL {
        let point = pose.and_then(|p| map_landmark(Some(p.get(limb.joint())), &config.mapping));
        physics.set_limb_target(limb, point);
        scene.set_limb_marker_visible(limb, point.is_some());
        if let Some(p) = point {
            scene.set_limb_marker_position(limb, p);
        }
        points[limb.slot()] = point;
    }
    for side in LegSide::BOTH {
        match (points[side.knee().slot()], points[side.foot().slot()]) {
            (Some(knee), Some(foot)) => scene.set_leg_line(side, knee, foot, true),
            _ => scene.set_leg_line(side, Vec3::ZERO, Vec3::ZERO, false),
        }
    }

    // 3. Step and score
    let events = physics.step();
    let hit = interpret_contacts(&events, physics, session, config);

    // 4. Publish
    let ball = physics.ball_state();
    scene.set_ball_transform(ball.position, ball.rotation);

    // 5. Corrections
    if let Some(kind) = stabilize(physics, session, config) {
        reset = Some(kind);
    }

    if let Some((cue, duration_ms)) = session.take_pending_color() {
        scene.set_ball_color(cue, duration_ms);
    }
    if let Some(score) = session.take_score_update() {
        scene.set_score_text(score);
    }

    FrameReport {
        score: session.score,
        hit,
        reset,
        hold,
        contacts: events.len(),
    }
}

/// Respawn point above the player's shoulders, if both shoulders map
fn shoulder_spawn(pose: &PoseSnapshot, mapping: &MappingConfig) -> Option<Vec3> {
    let left = map_landmark(Some(pose.get(Joint::LeftShoulder)), mapping)?;
    let right = map_landmark(Some(pose.get(Joint::RightShoulder)), mapping)?;
    Some((left + right) * 0.5 + Vec3::new(0.0, SHOULDER_SPAWN_LIFT, 0.0))
}
