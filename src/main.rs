//! Pose Keep-Ups entry point
//!
//! The real game runs in the browser (see `web.rs`). Natively this runs a
//! headless session driven by a scripted pose: a player juggling with the
//! right foot for a while, then holding a T-pose to reset.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use pose_keepups::pose::{Joint, Landmark, PoseSnapshot};
    use pose_keepups::scene::NullScene;
    use pose_keepups::sim::ResetKind;
    use pose_keepups::{Game, GameConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pose Keep-Ups (native, headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            GameConfig::from_json(&json)?
        }
        None => GameConfig::default(),
    };
    let mut game = Game::new(config)?;
    let mailbox = game.mailbox();
    let mut scene = NullScene;

    let standing = |foot_y: f32, arms_out: bool| {
        let mut landmarks = vec![Landmark::default(); 33];
        let mut set = |joint: Joint, x: f32, y: f32| {
            landmarks[joint.index()] = Landmark::new(x, y, 0.0, 0.95);
        };
        set(Joint::LeftShoulder, 0.58, 0.30);
        set(Joint::RightShoulder, 0.42, 0.30);
        if arms_out {
            set(Joint::LeftElbow, 0.70, 0.30);
            set(Joint::RightElbow, 0.30, 0.30);
            set(Joint::LeftWrist, 0.82, 0.30);
            set(Joint::RightWrist, 0.18, 0.30);
        } else {
            set(Joint::LeftElbow, 0.60, 0.45);
            set(Joint::RightElbow, 0.40, 0.45);
            set(Joint::LeftWrist, 0.61, 0.58);
            set(Joint::RightWrist, 0.39, 0.58);
        }
        set(Joint::LeftKnee, 0.54, 0.75);
        set(Joint::RightKnee, 0.46, 0.75);
        set(Joint::LeftFootIndex, 0.55, 0.95);
        set(Joint::RightFootIndex, 0.5, foot_y);
        PoseSnapshot::new(landmarks)
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    let (mut hits, mut drops, mut resets) = (0u32, 0u32, 0u32);

    for i in 0..1200u32 {
        let now = f64::from(i) * FRAME_MS;
        // Pose inference at ~20 Hz, every third frame
        if i % 3 == 0 {
            let juggling = i < 900;
            let foot_y = if juggling { 0.625 } else { 0.95 };
            match standing(foot_y, !juggling) {
                Some(pose) => mailbox.post(pose),
                None => mailbox.report_failure("short landmark list"),
            }
        }

        let report = game.frame(now, &mut scene);
        if report.hit.is_some() {
            hits += 1;
        }
        match report.reset {
            Some(ResetKind::Drop) => drops += 1,
            Some(_) => resets += 1,
            None => {}
        }
    }

    let session = game.session();
    log::info!(
        "Done: {} touches, {} drops, {} other resets, best streak {}",
        hits,
        drops,
        resets,
        session.best_score
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web entry point is `WebGame` in the library
}
