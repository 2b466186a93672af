// scene2d/src/physics.rs
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::math::Vec2;
use crate::world::EntityId;

// Rapier is private implementation detail: do NOT re-export it.
use rapier2d::prelude::*;

/// Engine-facing rigid body type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigidBodyType {
    Dynamic,
    Fixed,
}

/// Engine-facing collider shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Box { hx: f32, hy: f32 },
    Circle { radius: f32 },
}

/// Material for solid colliders.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.0,
            restitution: 0.0,
        }
    }
}

/// Engine-facing collision event. Uses EntityId only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicsEvent {
    CollisionEnter { a: EntityId, b: EntityId },
    CollisionExit { a: EntityId, b: EntityId },
    TriggerEnter { a: EntityId, b: EntityId },
    TriggerExit { a: EntityId, b: EntityId },
}

/// Collision world backing the scene's bodies.
///
/// Bodies are only used to detect contacts and to keep dynamic bodies out of
/// walls; gameplay reads positions back and sets velocities each tick.
pub struct PhysicsWorld {
    // --- rapier internals ---
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    // Event channels
    event_recv_collision: crossbeam_channel::Receiver<CollisionEvent>,
    event_recv_contact_force: crossbeam_channel::Receiver<ContactForceEvent>,
    event_handler: ChannelEventCollector,

    // --- mappings (engine <-> rapier) ---
    entity_to_body: HashMap<EntityId, RigidBodyHandle>,
    body_to_entity: HashMap<RigidBodyHandle, EntityId>,

    gravity: Vec2,

    // Collected engine-facing events since the last drain
    pending_events: Vec<PhysicsEvent>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Top-down world: no gravity.
    pub fn new() -> Self {
        Self::with_gravity(Vec2::ZERO)
    }

    pub fn with_gravity(gravity: Vec2) -> Self {
        let (send_col, recv_col) = crossbeam_channel::unbounded();
        let (send_force, recv_force) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector::new(send_col, send_force);

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),

            event_recv_collision: recv_col,
            event_recv_contact_force: recv_force,
            event_handler,

            entity_to_body: HashMap::new(),
            body_to_entity: HashMap::new(),

            gravity,
            pending_events: Vec::new(),
        }
    }

    /// Drop every body, collider and queued event, keeping gravity.
    pub fn clear(&mut self) {
        let gravity = self.gravity;
        *self = Self::with_gravity(gravity);
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Create/replace a body for an entity.
    pub fn create_body(&mut self, entity: EntityId, body_type: RigidBodyType, position: Vec2) {
        // Remove existing body if any (keeps invariant 1 body per entity).
        self.remove_body(entity);

        let rb_type = match body_type {
            RigidBodyType::Dynamic => rapier2d::prelude::RigidBodyType::Dynamic,
            RigidBodyType::Fixed => rapier2d::prelude::RigidBodyType::Fixed,
        };

        let mut builder =
            RigidBodyBuilder::new(rb_type).translation(vector![position.x, position.y]);

        // Top-down actors never spin.
        if matches!(body_type, RigidBodyType::Dynamic) {
            builder = builder.lock_rotations().ccd_enabled(true);
        }

        let handle = self.rigid_bodies.insert(builder.build());
        self.entity_to_body.insert(entity, handle);
        self.body_to_entity.insert(handle, entity);
    }

    /// Remove a body (and its colliders) for an entity. Returns whether one existed.
    pub fn remove_body(&mut self, entity: EntityId) -> bool {
        if let Some(handle) = self.entity_to_body.remove(&entity) {
            self.rigid_bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
            self.body_to_entity.remove(&handle);
            true
        } else {
            false
        }
    }

    /// Add a solid collider that reports collision events.
    pub fn add_collider(
        &mut self,
        entity: EntityId,
        shape: ColliderShape,
        material: Material,
    ) -> Result<()> {
        let body = self.body_handle(entity)?;

        let collider = ColliderBuilder::new(to_rapier_shape(shape))
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution)
            .sensor(false)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        self.colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);

        Ok(())
    }

    /// Add a sensor (trigger volume).
    pub fn add_sensor(&mut self, entity: EntityId, shape: ColliderShape) -> Result<()> {
        let body = self.body_handle(entity)?;

        let collider = ColliderBuilder::new(to_rapier_shape(shape))
            .sensor(true)
            // ensure we get collision events for sensors:
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        self.colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);

        Ok(())
    }

    /// Step simulation by `dt` seconds and collect contact events.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        let gravity = vector![self.gravity.x, self.gravity.y];
        let hooks = &();

        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            hooks,
            &self.event_handler,
        );

        self.query_pipeline
            .update(&self.island_manager, &self.rigid_bodies, &self.colliders);

        self.collect_events();
    }

    /// Drain physics events collected since last drain.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ------------------------------
    // Per-entity body queries/actions
    // ------------------------------

    pub fn body_position(&self, entity: EntityId) -> Option<Vec2> {
        let h = *self.entity_to_body.get(&entity)?;
        let b = self.rigid_bodies.get(h)?;
        let t = b.translation();
        Some(Vec2::new(t.x, t.y))
    }

    pub fn set_body_position(&mut self, entity: EntityId, pos: Vec2) {
        if let Some(h) = self.entity_to_body.get(&entity).copied() {
            if let Some(b) = self.rigid_bodies.get_mut(h) {
                b.set_translation(vector![pos.x, pos.y], true);
            }
        }
    }

    pub fn set_linear_velocity(&mut self, entity: EntityId, vel: Vec2) {
        if let Some(h) = self.entity_to_body.get(&entity).copied() {
            if let Some(b) = self.rigid_bodies.get_mut(h) {
                b.set_linvel(vector![vel.x, vel.y], true);
            }
        }
    }

    /// Get linear velocity for an entity's body.
    pub fn linear_velocity(&self, entity: EntityId) -> Option<Vec2> {
        let h = *self.entity_to_body.get(&entity)?;
        let b = self.rigid_bodies.get(h)?;
        let v = b.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    /// Return true if an entity currently has a physics body.
    pub fn has_body(&self, entity: EntityId) -> bool {
        self.entity_to_body.contains_key(&entity)
    }

    /// Number of bodies in the world.
    pub fn body_count(&self) -> usize {
        self.entity_to_body.len()
    }

    // ------------------------------
    // Private helpers
    // ------------------------------

    fn body_handle(&self, entity: EntityId) -> Result<RigidBodyHandle> {
        self.entity_to_body
            .get(&entity)
            .copied()
            .ok_or_else(|| anyhow!("Entity {:?} has no physics body", entity))
    }

    fn collect_events(&mut self) {
        while let Ok(ev) = self.event_recv_collision.try_recv() {
            match ev {
                CollisionEvent::Started(c1, c2, _) => {
                    if let Some((a, b, is_trigger)) = self.map_pair(c1, c2) {
                        let e = if is_trigger {
                            PhysicsEvent::TriggerEnter { a, b }
                        } else {
                            PhysicsEvent::CollisionEnter { a, b }
                        };
                        self.pending_events.push(e);
                    }
                }
                CollisionEvent::Stopped(c1, c2, _) => {
                    if let Some((a, b, is_trigger)) = self.map_pair(c1, c2) {
                        let e = if is_trigger {
                            PhysicsEvent::TriggerExit { a, b }
                        } else {
                            PhysicsEvent::CollisionExit { a, b }
                        };
                        self.pending_events.push(e);
                    }
                }
            }
        }

        // Contact forces are not used; keep the channel from growing.
        while self.event_recv_contact_force.try_recv().is_ok() {}
    }

    fn map_pair(
        &self,
        c1: ColliderHandle,
        c2: ColliderHandle,
    ) -> Option<(EntityId, EntityId, bool)> {
        let col1 = self.colliders.get(c1)?;
        let col2 = self.colliders.get(c2)?;
        let b1 = col1.parent()?;
        let b2 = col2.parent()?;
        let e1 = *self.body_to_entity.get(&b1)?;
        let e2 = *self.body_to_entity.get(&b2)?;

        // sensor if either collider is a sensor
        let is_trigger = col1.is_sensor() || col2.is_sensor();
        Some((e1, e2, is_trigger))
    }
}

fn to_rapier_shape(s: ColliderShape) -> SharedShape {
    match s {
        ColliderShape::Box { hx, hy } => SharedShape::cuboid(hx, hy),
        ColliderShape::Circle { radius } => SharedShape::ball(radius),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Entities;

    const DT: f32 = 1.0 / 60.0;

    fn dynamic_box(world: &mut PhysicsWorld, entity: EntityId, pos: Vec2) {
        world.create_body(entity, RigidBodyType::Dynamic, pos);
        let shape = ColliderShape::Box { hx: 16.0, hy: 16.0 };
        world
            .add_collider(entity, shape, Material::default())
            .unwrap();
    }

    #[test]
    fn collider_needs_a_body() {
        let mut entities = Entities::new();
        let mut world = PhysicsWorld::new();
        let e = entities.spawn();
        let shape = ColliderShape::Circle { radius: 1.0 };
        assert!(world.add_collider(e, shape, Material::default()).is_err());
    }

    #[test]
    fn velocity_moves_dynamic_body() {
        let mut entities = Entities::new();
        let mut world = PhysicsWorld::new();
        let e = entities.spawn();
        dynamic_box(&mut world, e, Vec2::new(100.0, 100.0));
        world.set_linear_velocity(e, Vec2::new(60.0, 0.0));
        world.step(DT);
        let pos = world.body_position(e).unwrap();
        assert!(pos.x > 100.0);
        assert!((pos.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn overlapping_solids_report_collision_enter() {
        let mut entities = Entities::new();
        let mut world = PhysicsWorld::new();
        let a = entities.spawn();
        let b = entities.spawn();
        dynamic_box(&mut world, a, Vec2::new(100.0, 100.0));
        dynamic_box(&mut world, b, Vec2::new(110.0, 100.0));
        world.step(DT);

        let events = world.drain_events();
        assert!(events.iter().any(|e| matches!(
            *e,
            PhysicsEvent::CollisionEnter { a: x, b: y } if (x == a && y == b) || (x == b && y == a)
        )));
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn sensor_overlap_reports_trigger_enter() {
        let mut entities = Entities::new();
        let mut world = PhysicsWorld::new();
        let mover = entities.spawn();
        let pickup = entities.spawn();
        dynamic_box(&mut world, mover, Vec2::new(50.0, 50.0));
        world.create_body(pickup, RigidBodyType::Fixed, Vec2::new(52.0, 50.0));
        world
            .add_sensor(pickup, ColliderShape::Circle { radius: 4.0 })
            .unwrap();
        world.step(DT);

        let events = world.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, PhysicsEvent::TriggerEnter { .. })));
    }

    #[test]
    fn clear_removes_everything() {
        let mut entities = Entities::new();
        let mut world = PhysicsWorld::new();
        let e = entities.spawn();
        dynamic_box(&mut world, e, Vec2::ZERO);
        assert_eq!(world.body_count(), 1);
        world.clear();
        assert_eq!(world.body_count(), 0);
        assert!(!world.has_body(e));
    }
}
