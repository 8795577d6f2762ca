//! Game owner
//!
//! Holds the config, physics world, session and pose mailbox for a host
//! (browser bindings or the native demo) and runs one frame at a time.

use anyhow::{Context, Result};

use crate::config::GameConfig;
use crate::pose::PoseMailbox;
use crate::scene::Scene;
use crate::sim::{FrameReport, PhysicsCore, Session, frame};

pub struct Game {
    config: GameConfig,
    physics: PhysicsCore,
    session: Session,
    mailbox: PoseMailbox,
}

impl Game {
    /// Build a game. Fails on an invalid config or if the physics world
    /// can't be created; the host should surface that and stop.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().context("invalid game configuration")?;
        let physics = PhysicsCore::new(&config.physics).context("failed to initialize physics")?;
        log::info!("Game initialized");
        Ok(Self {
            config,
            physics,
            session: Session::new(),
            mailbox: PoseMailbox::new(),
        })
    }

    /// Handle for the pose pipeline to post results into
    pub fn mailbox(&self) -> PoseMailbox {
        self.mailbox.clone()
    }

    /// Run one frame with whatever pose finished most recently
    pub fn frame(&mut self, now_ms: f64, scene: &mut dyn Scene) -> FrameReport {
        let pose = self.mailbox.latest();
        let best_before = self.session.best_score;
        let report = frame(
            &mut self.physics,
            &mut self.session,
            pose.as_deref(),
            now_ms,
            &self.config,
            scene,
        );
        if self.session.best_score > best_before {
            log::info!("New session best: {}", self.session.best_score);
        }
        report
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn physics(&self) -> &PhysicsCore {
        &self.physics
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Joint, Landmark, PoseSnapshot};
    use crate::scene::NullScene;
    use crate::sim::Limb;

    #[test]
    fn test_invalid_config_fails_startup() {
        let mut config = GameConfig::default();
        config.mapping.world_width = 0.0;
        assert!(Game::new(config).is_err());
    }

    #[test]
    fn test_uses_latest_mailbox_pose() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let mailbox = game.mailbox();
        let mut scene = NullScene;

        game.frame(0.0, &mut scene);
        assert_eq!(game.physics().limb_target(Limb::LeftKnee), None);

        let mut landmarks = vec![Landmark::default(); 33];
        landmarks[Joint::LeftKnee.index()] = Landmark::new(0.5, 0.7, 0.0, 0.9);
        mailbox.post(PoseSnapshot::new(landmarks).unwrap());

        game.frame(16.0, &mut scene);
        assert!(game.physics().limb_target(Limb::LeftKnee).is_some());

        // A failed inference keeps the previous pose in play
        mailbox.report_failure("dropped frame");
        game.frame(32.0, &mut scene);
        assert!(game.physics().limb_target(Limb::LeftKnee).is_some());
        assert_eq!(game.session().frames, 3);
    }
}
