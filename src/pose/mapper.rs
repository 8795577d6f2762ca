//! Landmark → world mapping
//!
//! Depth is left at zero here; the stabilizer keeps the ball near z = 0 so
//! the limbs only need to live on that plane.

use glam::Vec3;

use super::landmark::Landmark;
use crate::config::MappingConfig;

/// Map a normalized landmark to a world-space point.
///
/// Returns `None` for a missing landmark, one below the visibility
/// threshold, or one with non-finite image coordinates. The result never
/// goes below the floor (y >= 0).
pub fn map_landmark(landmark: Option<&Landmark>, mapping: &MappingConfig) -> Option<Vec3> {
    let lm = landmark?;
    if !(lm.visibility >= mapping.min_visibility) || !lm.x.is_finite() || !lm.y.is_finite() {
        return None;
    }

    // Mirror so the player sees themselves as in a mirror, then center
    let x = ((1.0 - lm.x) - 0.5) * mapping.world_width;
    let y = (1.0 - lm.y) * mapping.world_height + mapping.vertical_offset;
    Some(Vec3::new(x, y.max(0.0), 0.0))
}
