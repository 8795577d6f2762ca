//! Simulation module
//!
//! All gameplay logic lives here and runs on the single frame callback:
//! - Physics world with the ball, ground and kinematic limbs
//! - Session state (score, hit latch, gesture hold, flashes)
//! - Contact → score interpretation
//! - Post-step stabilization and resets
//! - The per-frame sequence tying it together
//!
//! No rendering or platform dependencies; side effects go through `Scene`.

pub mod collision;
pub mod physics;
pub mod stabilizer;
pub mod state;
pub mod tick;

pub use collision::{Hit, interpret_contacts};
pub use physics::{BallState, ContactEvent, PhysicsCore};
pub use stabilizer::stabilize;
pub use state::{
    Flash, GestureState, HoldEvent, HoldPhase, LegSide, Limb, ResetKind, Session,
};
pub use tick::{FrameReport, frame};
