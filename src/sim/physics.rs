//! Rapier physics world: ground, ball and four kinematic limb proxies
//!
//! Positions cross this boundary as `glam` types; everything inside is
//! Rapier/nalgebra.

use std::sync::Mutex;

use anyhow::{Result, ensure};
use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

use super::state::Limb;
use crate::config::PhysicsConfig;
use crate::consts::*;

/// A collision start/stop between two colliders, as reported by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub collider1: ColliderHandle,
    pub collider2: ColliderHandle,
    /// `true` when contact began, `false` when it ended
    pub started: bool,
}

impl ContactEvent {
    /// The collider on the other side of `handle`, if `handle` is part of this pair
    pub fn other(&self, handle: ColliderHandle) -> Option<ColliderHandle> {
        if self.collider1 == handle {
            Some(self.collider2)
        } else if self.collider2 == handle {
            Some(self.collider1)
        } else {
            None
        }
    }
}

/// Snapshot of the ball body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
}

impl BallState {
    /// At rest at `position`
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
        }
    }
}

/// Collects collision events during a step. Rapier requires `Sync`.
#[derive(Default)]
struct ContactCollector {
    events: Mutex<Vec<ContactEvent>>,
}

impl ContactCollector {
    fn drain(&self) -> Vec<ContactEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let contact = ContactEvent {
            collider1: event.collider1(),
            collider2: event.collider2(),
            started: event.started(),
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(contact);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// A kinematic limb collider and what it was last told to follow
#[derive(Debug, Clone, Copy)]
struct LimbProxy {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    target: Option<Vec3>,
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// The simulation world
pub struct PhysicsCore {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collector: ContactCollector,

    ground_y: f32,
    ground_collider: ColliderHandle,
    ball_body: RigidBodyHandle,
    ball_collider: ColliderHandle,
    limbs: [LimbProxy; 4],
}

impl PhysicsCore {
    /// Build the world: ground slab, ball at the default spawn, limbs parked
    pub fn new(config: &PhysicsConfig) -> Result<Self> {
        ensure!(
            config.gravity_y.is_finite() && config.ground_y.is_finite(),
            "physics config must be finite"
        );

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Ground: top surface at ground_y
        let ground = RigidBodyBuilder::fixed()
            .translation(vector![0.0, config.ground_y - GROUND_HALF_EXTENTS.y, 0.0])
            .build();
        let ground_body = bodies.insert(ground);
        let ground_collider = colliders.insert_with_parent(
            ColliderBuilder::cuboid(
                GROUND_HALF_EXTENTS.x,
                GROUND_HALF_EXTENTS.y,
                GROUND_HALF_EXTENTS.z,
            )
            .build(),
            ground_body,
            &mut bodies,
        );

        // Ball: must never sleep, it is polled every frame
        let ball = RigidBodyBuilder::dynamic()
            .translation(to_vector(DEFAULT_SPAWN))
            .linear_damping(BALL_LINEAR_DAMPING)
            .angular_damping(BALL_ANGULAR_DAMPING)
            .can_sleep(false)
            .ccd_enabled(true)
            .build();
        let ball_body = bodies.insert(ball);
        let ball_collider = colliders.insert_with_parent(
            ColliderBuilder::ball(BALL_RADIUS)
                .restitution(BALL_RESTITUTION)
                .density(BALL_DENSITY)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            ball_body,
            &mut bodies,
        );

        // Limbs: position-driven, solid (not sensors) so the ball bounces off them
        let limbs = Limb::ALL.map(|_| {
            let body = bodies.insert(
                RigidBodyBuilder::kinematic_position_based()
                    .translation(to_vector(OFFSTAGE))
                    .build(),
            );
            let collider = colliders.insert_with_parent(
                ColliderBuilder::ball(LIMB_RADIUS)
                    .active_events(ActiveEvents::COLLISION_EVENTS)
                    .build(),
                body,
                &mut bodies,
            );
            LimbProxy {
                body,
                collider,
                target: None,
            }
        });

        let integration_parameters = IntegrationParameters {
            dt: PHYSICS_DT,
            ..IntegrationParameters::default()
        };

        log::info!(
            "Physics world ready (gravity {}, ground {})",
            config.gravity_y,
            config.ground_y
        );

        Ok(Self {
            gravity: vector![0.0, config.gravity_y, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collector: ContactCollector::default(),
            ground_y: config.ground_y,
            ground_collider,
            ball_body,
            ball_collider,
            limbs,
        })
    }

    /// Drive a limb toward `target` for the next step, or park it off-stage.
    ///
    /// Appearing and disappearing are teleports: a proxy jumping in from the
    /// parking spot must not carry that jump as velocity into the ball.
    pub fn set_limb_target(&mut self, limb: Limb, target: Option<Vec3>) {
        let proxy = &mut self.limbs[limb.slot()];
        let was_visible = proxy.target.is_some();
        proxy.target = target;

        let body = &mut self.bodies[proxy.body];
        match target {
            Some(p) if was_visible => body.set_next_kinematic_translation(to_vector(p)),
            Some(p) => body.set_translation(to_vector(p), true),
            None if was_visible => body.set_translation(to_vector(OFFSTAGE), true),
            None => {}
        }
    }

    /// Advance one frame; returns the collision starts/stops it produced
    pub fn step(&mut self) -> Vec<ContactEvent> {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &self.collector,
        );
        self.collector.drain()
    }

    pub fn ball_state(&self) -> BallState {
        let body = &self.bodies[self.ball_body];
        let q = body.rotation().coords;
        BallState {
            position: from_vector(body.translation()),
            rotation: Quat::from_xyzw(q.x, q.y, q.z, q.w),
            linvel: from_vector(body.linvel()),
            angvel: from_vector(body.angvel()),
        }
    }

    pub fn set_ball_state(&mut self, state: &BallState) {
        let body = &mut self.bodies[self.ball_body];
        let r = state.rotation.normalize();
        body.set_translation(to_vector(state.position), true);
        body.set_rotation(
            UnitQuaternion::from_quaternion(Quaternion::new(r.w, r.x, r.y, r.z)),
            true,
        );
        body.set_linvel(to_vector(state.linvel), true);
        body.set_angvel(to_vector(state.angvel), true);
    }

    /// Overwrite only the linear velocity
    pub fn set_ball_linvel(&mut self, linvel: Vec3) {
        self.bodies[self.ball_body].set_linvel(to_vector(linvel), true);
    }

    pub fn apply_ball_impulse(&mut self, impulse: Vec3) {
        self.bodies[self.ball_body].apply_impulse(to_vector(impulse), true);
    }

    /// Put the ball at `position`, motionless and unrotated
    pub fn respawn_ball(&mut self, position: Vec3) {
        self.set_ball_state(&BallState::at_rest(position));
    }

    pub fn ball_collider(&self) -> ColliderHandle {
        self.ball_collider
    }

    pub fn ground_collider(&self) -> ColliderHandle {
        self.ground_collider
    }

    pub fn limb_collider(&self, limb: Limb) -> ColliderHandle {
        self.limbs[limb.slot()].collider
    }

    /// Which limb, if any, owns this collider
    pub fn limb_for_collider(&self, handle: ColliderHandle) -> Option<Limb> {
        Limb::ALL
            .into_iter()
            .find(|&limb| self.limbs[limb.slot()].collider == handle)
    }

    /// Last target given to a limb (`None` = parked)
    pub fn limb_target(&self, limb: Limb) -> Option<Vec3> {
        self.limbs[limb.slot()].target
    }

    /// Current limb body position
    pub fn limb_position(&self, limb: Limb) -> Vec3 {
        from_vector(self.bodies[self.limbs[limb.slot()].body].translation())
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn ball_mass(&self) -> f32 {
        self.bodies[self.ball_body].mass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsCore {
        PhysicsCore::new(&PhysicsConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_non_finite_gravity() {
        let config = PhysicsConfig {
            gravity_y: f32::NAN,
            ..PhysicsConfig::default()
        };
        assert!(PhysicsCore::new(&config).is_err());
    }

    #[test]
    fn test_ball_falls() {
        let mut world = world();
        let start = world.ball_state();
        assert_eq!(start.position, DEFAULT_SPAWN);

        for _ in 0..10 {
            world.step();
        }

        let state = world.ball_state();
        assert!(state.position.y < start.position.y);
        assert!(state.linvel.y < 0.0);
    }

    #[test]
    fn test_ball_settles_on_ground() {
        let mut world = world();
        for _ in 0..600 {
            world.step();
        }
        let y = world.ball_state().position.y;
        let rest = world.ground_y() + BALL_RADIUS;
        assert!((y - rest).abs() < 0.05, "ball at {y}, expected ~{rest}");
    }

    #[test]
    fn test_limbs_start_parked() {
        let world = world();
        for limb in Limb::ALL {
            assert_eq!(world.limb_target(limb), None);
            assert_eq!(world.limb_position(limb), OFFSTAGE);
        }
    }

    #[test]
    fn test_limb_target_and_park() {
        let mut world = world();
        let knee = Vec3::new(0.5, 1.0, 0.0);

        // Appearing teleports straight to the target
        world.set_limb_target(Limb::LeftKnee, Some(knee));
        assert_eq!(world.limb_position(Limb::LeftKnee), knee);

        // Following moves on the next step
        let next = Vec3::new(0.6, 1.1, 0.0);
        world.set_limb_target(Limb::LeftKnee, Some(next));
        world.step();
        assert!((world.limb_position(Limb::LeftKnee) - next).length() < 1e-4);

        // Missing landmark parks it
        world.set_limb_target(Limb::LeftKnee, None);
        world.step();
        assert_eq!(world.limb_target(Limb::LeftKnee), None);
        assert!((world.limb_position(Limb::LeftKnee) - OFFSTAGE).length() < 1e-4);
    }

    #[test]
    fn test_ball_limb_contact_reported() {
        let mut world = world();
        world.respawn_ball(Vec3::new(0.0, 1.6, 0.0));
        world.set_limb_target(Limb::RightFoot, Some(Vec3::new(0.0, 1.0, 0.0)));

        let ball = world.ball_collider();
        let foot = world.limb_collider(Limb::RightFoot);

        let mut touched = false;
        for _ in 0..60 {
            world.set_limb_target(Limb::RightFoot, Some(Vec3::new(0.0, 1.0, 0.0)));
            let events = world.step();
            if events
                .iter()
                .any(|e| e.started && e.other(ball) == Some(foot))
            {
                touched = true;
                break;
            }
        }
        assert!(touched, "ball never reported touching the foot");
        assert_eq!(world.limb_for_collider(foot), Some(Limb::RightFoot));
        assert_eq!(world.limb_for_collider(world.ground_collider()), None);
    }

    #[test]
    fn test_impulse_pushes_ball_up() {
        let mut world = world();
        world.step();
        let before = world.ball_state().linvel.y;
        world.apply_ball_impulse(Vec3::new(0.0, 0.7, 0.0));
        let after = world.ball_state().linvel.y;
        let expected = 0.7 / world.ball_mass();
        assert!((after - before - expected).abs() < 1e-3);
    }

    #[test]
    fn test_set_ball_state_roundtrip() {
        let mut world = world();
        let state = BallState {
            position: Vec3::new(1.0, 2.0, -0.5),
            rotation: Quat::from_rotation_y(0.5),
            linvel: Vec3::new(0.5, 3.0, 0.1),
            angvel: Vec3::new(0.0, 1.0, 0.0),
        };
        world.set_ball_state(&state);
        let read = world.ball_state();
        assert!((read.position - state.position).length() < 1e-5);
        assert!((read.linvel - state.linvel).length() < 1e-5);
        assert!(read.rotation.angle_between(state.rotation) < 1e-4);

        world.respawn_ball(DEFAULT_SPAWN);
        let read = world.ball_state();
        assert_eq!(read.linvel, Vec3::ZERO);
        assert_eq!(read.position, DEFAULT_SPAWN);
    }
}
