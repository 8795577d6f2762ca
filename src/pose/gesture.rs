//! T-pose detection (reset gesture)
//!
//! Stateless per-frame check. How long the pose has been held is tracked by
//! `sim::state::GestureState`.

use super::landmark::{Joint, Landmark, PoseSnapshot};
use crate::config::GestureConfig;

/// Joints that must all be confidently visible for the check to run
pub const ARM_JOINTS: [Joint; 6] = [
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftWrist,
    Joint::RightWrist,
];

/// Whether both arms are held out level and extended
pub fn detect_t_pose(pose: &PoseSnapshot, config: &GestureConfig) -> bool {
    if ARM_JOINTS
        .iter()
        .any(|&j| !(pose.get(j).visibility > config.min_visibility))
    {
        return false;
    }

    let left_shoulder = pose.get(Joint::LeftShoulder);
    let right_shoulder = pose.get(Joint::RightShoulder);
    let center_x = (left_shoulder.x + right_shoulder.x) * 0.5;

    arm_extended(
        left_shoulder,
        pose.get(Joint::LeftElbow),
        pose.get(Joint::LeftWrist),
        center_x,
        config,
    ) && arm_extended(
        right_shoulder,
        pose.get(Joint::RightElbow),
        pose.get(Joint::RightWrist),
        center_x,
        config,
    )
}

/// One arm: level, reaching, and moving outward joint by joint.
///
/// "Outward" is measured as distance from the shoulder midline on the
/// shoulder's side, so it holds whichever way the camera mirrors.
fn arm_extended(
    shoulder: &Landmark,
    elbow: &Landmark,
    wrist: &Landmark,
    center_x: f32,
    config: &GestureConfig,
) -> bool {
    let level = (elbow.y - shoulder.y).abs() <= config.level_tolerance
        && (wrist.y - elbow.y).abs() <= config.level_tolerance;

    let reaching = (elbow.x - shoulder.x).abs() > config.min_extension
        && (wrist.x - elbow.x).abs() > config.min_extension;

    let side = (shoulder.x - center_x).signum();
    let reach = |l: &Landmark| (l.x - center_x) * side;
    let outward = side != 0.0
        && reach(shoulder) > 0.0
        && reach(elbow) > reach(shoulder)
        && reach(wrist) > reach(elbow);

    level && reaching && outward
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Build a frame with the given arm joints; everything else invisible
    fn frame(arms: [(Joint, f32, f32, f32); 6]) -> PoseSnapshot {
        let mut landmarks = vec![Landmark::default(); 33];
        for (joint, x, y, vis) in arms {
            landmarks[joint.index()] = Landmark::new(x, y, 0.0, vis);
        }
        PoseSnapshot::new(landmarks).unwrap()
    }

    fn t_pose() -> PoseSnapshot {
        // Raw camera frame: the subject's left arm appears on the image right
        frame([
            (Joint::LeftShoulder, 0.58, 0.30, 0.9),
            (Joint::RightShoulder, 0.42, 0.30, 0.9),
            (Joint::LeftElbow, 0.70, 0.31, 0.9),
            (Joint::RightElbow, 0.30, 0.31, 0.9),
            (Joint::LeftWrist, 0.82, 0.30, 0.9),
            (Joint::RightWrist, 0.18, 0.29, 0.9),
        ])
    }

    #[test]
    fn test_detects_t_pose() {
        assert!(detect_t_pose(&t_pose(), &GestureConfig::default()));
    }

    #[test]
    fn test_detects_under_opposite_mirroring() {
        // Same pose delivered by a pipeline that already mirrors the image
        let mirrored = frame([
            (Joint::LeftShoulder, 0.42, 0.30, 0.9),
            (Joint::RightShoulder, 0.58, 0.30, 0.9),
            (Joint::LeftElbow, 0.30, 0.31, 0.9),
            (Joint::RightElbow, 0.70, 0.31, 0.9),
            (Joint::LeftWrist, 0.18, 0.30, 0.9),
            (Joint::RightWrist, 0.82, 0.29, 0.9),
        ]);
        assert!(detect_t_pose(&mirrored, &GestureConfig::default()));
    }

    #[test]
    fn test_arms_down_rejected() {
        let arms_down = frame([
            (Joint::LeftShoulder, 0.58, 0.30, 0.9),
            (Joint::RightShoulder, 0.42, 0.30, 0.9),
            (Joint::LeftElbow, 0.62, 0.45, 0.9),
            (Joint::RightElbow, 0.38, 0.45, 0.9),
            (Joint::LeftWrist, 0.63, 0.60, 0.9),
            (Joint::RightWrist, 0.37, 0.60, 0.9),
        ]);
        assert!(!detect_t_pose(&arms_down, &GestureConfig::default()));
    }

    #[test]
    fn test_folded_arm_rejected() {
        // Right wrist folded back across the elbow toward the body
        let folded = frame([
            (Joint::LeftShoulder, 0.58, 0.30, 0.9),
            (Joint::RightShoulder, 0.42, 0.30, 0.9),
            (Joint::LeftElbow, 0.70, 0.31, 0.9),
            (Joint::RightElbow, 0.30, 0.31, 0.9),
            (Joint::LeftWrist, 0.82, 0.30, 0.9),
            (Joint::RightWrist, 0.38, 0.30, 0.9),
        ]);
        assert!(!detect_t_pose(&folded, &GestureConfig::default()));
    }

    #[test]
    fn test_short_reach_rejected() {
        let tucked = frame([
            (Joint::LeftShoulder, 0.58, 0.30, 0.9),
            (Joint::RightShoulder, 0.42, 0.30, 0.9),
            (Joint::LeftElbow, 0.60, 0.30, 0.9),
            (Joint::RightElbow, 0.40, 0.30, 0.9),
            (Joint::LeftWrist, 0.62, 0.30, 0.9),
            (Joint::RightWrist, 0.38, 0.30, 0.9),
        ]);
        assert!(!detect_t_pose(&tucked, &GestureConfig::default()));
    }

    #[test]
    fn test_visibility_at_threshold_rejected() {
        let config = GestureConfig::default();
        for joint in ARM_JOINTS {
            let mut landmarks = t_pose().landmarks().to_vec();
            landmarks[joint.index()].visibility = 0.4;
            let pose = PoseSnapshot::new(landmarks).unwrap();
            assert!(!detect_t_pose(&pose, &config), "{joint:?} at 0.4 should fail");
        }
    }

    proptest! {
        #[test]
        fn prop_low_visibility_never_detects(
            which in 0usize..6,
            vis in 0.0f32..=0.4,
        ) {
            let mut landmarks = t_pose().landmarks().to_vec();
            landmarks[ARM_JOINTS[which].index()].visibility = vis;
            let pose = PoseSnapshot::new(landmarks).unwrap();
            prop_assert!(!detect_t_pose(&pose, &GestureConfig::default()));
        }

        #[test]
        fn prop_symmetric_under_mirror(
            coords in proptest::collection::vec((0.0f32..=1.0, 0.0f32..=1.0), 6),
            vis in 0.0f32..=1.0,
        ) {
            let arms: Vec<_> = ARM_JOINTS
                .iter()
                .zip(coords)
                .map(|(&j, (x, y))| (j, x, y, vis))
                .collect();
            let pose = frame([arms[0], arms[1], arms[2], arms[3], arms[4], arms[5]]);
            let config = GestureConfig::default();
            prop_assert_eq!(
                detect_t_pose(&pose, &config),
                detect_t_pose(&pose.mirrored(), &config)
            );
        }

        #[test]
        fn prop_jittered_t_pose_still_detected(
            dy in proptest::collection::vec(-0.02f32..0.02, 6),
        ) {
            let mut landmarks = t_pose().landmarks().to_vec();
            for (joint, d) in ARM_JOINTS.iter().zip(dy) {
                landmarks[joint.index()].y += d;
            }
            let pose = PoseSnapshot::new(landmarks).unwrap();
            prop_assert!(detect_t_pose(&pose, &GestureConfig::default()));
            prop_assert!(detect_t_pose(&pose.mirrored(), &GestureConfig::default()));
        }
    }
}
