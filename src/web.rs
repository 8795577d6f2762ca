//! Browser bindings
//!
//! The page owns the webcam, the pose model and the three.js scene. It hands
//! us a scene object with the methods below, posts pose results as flat
//! `Float32Array`s and calls `frame` from `requestAnimationFrame`.

use glam::{Quat, Vec3};
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::Game;
use crate::pose::{PoseMailbox, PoseSnapshot};
use crate::scene::{ColorCue, Scene};
use crate::sim::{LegSide, Limb};

#[wasm_bindgen]
extern "C" {
    /// Duck-typed JS scene object
    pub type SceneBridge;

    #[wasm_bindgen(method, js_name = setLimbMarkerVisible)]
    fn js_set_limb_marker_visible(this: &SceneBridge, limb: &str, visible: bool);

    #[wasm_bindgen(method, js_name = setLimbMarkerPosition)]
    fn js_set_limb_marker_position(this: &SceneBridge, limb: &str, x: f32, y: f32, z: f32);

    #[wasm_bindgen(method, js_name = setLegLineEndpoints)]
    fn js_set_leg_line_endpoints(this: &SceneBridge, side: &str, from: Vec<f32>, to: Vec<f32>, visible: bool);

    #[wasm_bindgen(method, js_name = setBallTransform)]
    fn js_set_ball_transform(this: &SceneBridge, position: Vec<f32>, rotation: Vec<f32>);

    #[wasm_bindgen(method, js_name = setBallColor)]
    fn js_set_ball_color(this: &SceneBridge, cue: &str, rgb: u32, duration_ms: f64);

    #[wasm_bindgen(method, js_name = setScoreText)]
    fn js_set_score_text(this: &SceneBridge, score: u32);

    #[wasm_bindgen(method, js_name = setGestureIndicatorVisible)]
    fn js_set_gesture_indicator_visible(this: &SceneBridge, visible: bool);
}

impl Scene for SceneBridge {
    fn set_limb_marker_visible(&mut self, limb: Limb, visible: bool) {
        self.js_set_limb_marker_visible(limb.as_str(), visible);
    }

    fn set_limb_marker_position(&mut self, limb: Limb, p: Vec3) {
        self.js_set_limb_marker_position(limb.as_str(), p.x, p.y, p.z);
    }

    fn set_leg_line(&mut self, side: LegSide, from: Vec3, to: Vec3, visible: bool) {
        self.js_set_leg_line_endpoints(side.as_str(), from.to_array().to_vec(), to.to_array().to_vec(), visible);
    }

    fn set_ball_transform(&mut self, position: Vec3, rotation: Quat) {
        self.js_set_ball_transform(position.to_array().to_vec(), rotation.to_array().to_vec());
    }

    fn set_ball_color(&mut self, cue: ColorCue, duration_ms: f64) {
        self.js_set_ball_color(cue.as_str(), cue.rgb(), duration_ms);
    }

    fn set_score_text(&mut self, score: u32) {
        self.js_set_score_text(score);
    }

    fn set_gesture_indicator_visible(&mut self, visible: bool) {
        self.js_set_gesture_indicator_visible(visible);
    }
}

/// Surface a startup failure as a JS `Error` for the page's status line
fn startup_error(error: anyhow::Error) -> JsValue {
    log::error!("Startup failed: {error:#}");
    js_sys::Error::new(&format!("{error:#}")).into()
}

/// Game instance exported to JS
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    mailbox: PoseMailbox,
    scene: SceneBridge,
}

#[wasm_bindgen]
impl WebGame {
    /// `config_json` may be empty for defaults. Errors are startup-fatal:
    /// the page should show them and stop.
    #[wasm_bindgen(constructor)]
    pub fn new(scene: SceneBridge, config_json: &str) -> Result<WebGame, JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Pose Keep-Ups starting...");

        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json).map_err(startup_error)?
        };
        let game = Game::new(config).map_err(startup_error)?;
        let mailbox = game.mailbox();

        Ok(WebGame {
            game,
            mailbox,
            scene,
        })
    }

    /// Post a pose result: `[x, y, z, visibility]` per landmark
    pub fn submit_pose(&self, data: &[f32]) {
        match PoseSnapshot::from_flat(data) {
            Some(snapshot) => self.mailbox.post(snapshot),
            None => self
                .mailbox
                .report_failure(format!("malformed pose payload ({} floats)", data.len())),
        }
    }

    /// Pose model threw or returned nothing; keep using the last result
    pub fn report_pose_error(&self, message: &str) {
        self.mailbox.report_failure(message);
    }

    /// Camera stopped or the player left the frame
    pub fn clear_pose(&self) {
        self.mailbox.clear();
    }

    /// Run one frame; `now_ms` from `requestAnimationFrame`
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        self.game.frame(now_ms, &mut self.scene).score
    }

    pub fn score(&self) -> u32 {
        self.game.session().score
    }

    pub fn best_score(&self) -> u32 {
        self.game.session().best_score
    }
}
