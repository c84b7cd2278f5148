//! Rigid-body world wrapper
//!
//! Owns the rapier2d pipeline state: gravity, a static ground plane, and the
//! dynamic plank bodies. Screen coordinates (y grows downward), so gravity
//! points at +y. Engine mutations are best-effort: removing an absent handle
//! and disposing twice are no-ops.

use glam::Vec2;
use rapier2d::prelude::*;

use crate::consts::*;

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    disposed: bool,
}

impl PhysicsWorld {
    /// Build a world with a static ground cuboid just below the stage floor.
    pub fn new(container_width: f32, stage_height: f32) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = SIM_DT;

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Ground sits 40px below the visible floor, twice the container wide
        // so planks sliding sideways still land on it.
        let ground = RigidBodyBuilder::fixed()
            .translation(vector![container_width / 2.0, stage_height + 40.0])
            .build();
        let ground_collider = ColliderBuilder::cuboid(container_width, 40.0)
            .friction(1.0)
            .restitution(0.01)
            .build();
        let ground_handle = bodies.insert(ground);
        colliders.insert_with_parent(ground_collider, ground_handle, &mut bodies);

        Self {
            gravity: vector![0.0, GRAVITY],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            disposed: false,
        }
    }

    /// Advance the world by one fixed tick.
    pub fn step(&mut self) {
        if self.disposed {
            return;
        }
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    /// Insert a dynamic plank body with a cuboid collider.
    pub fn add_plank(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        angle: f32,
        density: f32,
        friction: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![x, y])
            .rotation(angle)
            .linear_damping(0.03)
            .angular_damping(1.0)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(width / 2.0, ITEM_HEIGHT / 2.0)
            .density(density)
            .friction(friction)
            .restitution(0.02)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Detach a body. Removing an already-removed handle is a no-op.
    pub fn remove(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Post-step pose of a live body, if it is still in the world.
    pub fn pose(&self, handle: RigidBodyHandle) -> Option<(Vec2, f32)> {
        let body = self.bodies.get(handle)?;
        let t = body.translation();
        Some((Vec2::new(t.x, t.y), body.rotation().angle()))
    }

    /// Dynamic bodies currently in the world (excludes the ground).
    pub fn dynamic_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_dynamic()).count()
    }

    /// Drop every body and collider. Safe to call repeatedly; the host glue
    /// is responsible for cancelling its own stepping loop first.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.islands = IslandManager::new();
        self.disposed = true;
    }
}
