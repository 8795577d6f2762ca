//! Pose input
//!
//! Everything between the external pose model and the simulation:
//! - Landmark types and named joints
//! - Mapping landmarks into world space
//! - T-pose reset gesture detection
//! - The latest-wins mailbox the capture pipeline writes into

pub mod gesture;
pub mod landmark;
pub mod mailbox;
pub mod mapper;

pub use gesture::detect_t_pose;
pub use landmark::{Joint, Landmark, PoseSnapshot};
pub use mailbox::PoseMailbox;
pub use mapper::map_landmark;
