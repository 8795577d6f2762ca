//! Pose Keep-Ups - webcam-driven keep-ups game core
//!
//! Core modules:
//! - `pose`: Landmark types, world mapping, T-pose detection, pose mailbox
//! - `sim`: Physics world, session state, collision scoring, stabilizer, frame loop
//! - `scene`: Interface to the external renderer/UI
//! - `config`: Start-time tuning values
//! - `game`: Owner that wires everything together for a host

pub mod config;
pub mod game;
pub mod pose;
pub mod scene;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::GameConfig;
pub use game::Game;

/// Fixed engine constants (not tunable at startup)
pub mod consts {
    use glam::Vec3;

    /// Physics timestep (one step per rendered frame)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;

    /// Ball sphere radius
    pub const BALL_RADIUS: f32 = 0.25;
    pub const BALL_RESTITUTION: f32 = 0.6;
    pub const BALL_DENSITY: f32 = 1.1;
    pub const BALL_LINEAR_DAMPING: f32 = 0.1;
    pub const BALL_ANGULAR_DAMPING: f32 = 0.3;

    /// Limb proxy sphere radius (knees and feet)
    pub const LIMB_RADIUS: f32 = 0.13;

    /// Ground slab half extents (top surface sits at the configured ground y)
    pub const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(10.0, 0.5, 10.0);

    /// Where the ball appears after a drop or out-of-bounds reset
    pub const DEFAULT_SPAWN: Vec3 = Vec3::new(0.0, 4.0, 0.0);
    /// Height above the shoulder midpoint for a gesture respawn
    pub const SHOULDER_SPAWN_LIFT: f32 = 1.0;

    /// Parking spot for limb proxies without a landmark, far below the ground
    pub const OFFSTAGE: Vec3 = Vec3::new(0.0, -100.0, 0.0);

    /// Minimum landmarks in a pose frame (MediaPipe Pose layout)
    pub const POSE_LANDMARK_COUNT: usize = 33;
}
