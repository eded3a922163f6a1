use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::EntityId;
use crate::components::entity::Side;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra and back
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Never moves.
    Static,
    /// Moved only by its velocity; ignores forces and gravity.
    Kinematic,
    /// Fully simulated.
    Dynamic,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
            BodyType::Dynamic => RigidBodyType::Dynamic,
        }
    }

    fn from_rapier(body_type: RigidBodyType) -> Self {
        match body_type {
            RigidBodyType::Fixed => BodyType::Static,
            RigidBodyType::Dynamic => BodyType::Dynamic,
            RigidBodyType::KinematicVelocityBased | RigidBodyType::KinematicPositionBased => {
                BodyType::Kinematic
            }
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
    /// A line segment in body-local coordinates.
    Segment { a: Vec2, b: Vec2 },
}

impl ColliderDesc {
    /// Box collider for a `width` x `height` entity.
    pub fn cuboid(width: f32, height: f32) -> Self {
        ColliderDesc::Cuboid {
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    /// Circle collider inscribed in a `width` x `height` entity.
    pub fn ball(width: f32, height: f32) -> Self {
        ColliderDesc::Ball {
            radius: width.max(height) / 2.0,
        }
    }

    /// Same shape family, rebuilt for a new entity size.
    pub fn resized(&self, width: f32, height: f32) -> Self {
        match self {
            ColliderDesc::Ball { .. } => ColliderDesc::ball(width, height),
            ColliderDesc::Cuboid { .. } => ColliderDesc::cuboid(width, height),
            ColliderDesc::Segment { a, b } => {
                let half = (*b - *a).normalize_or_zero() * width / 2.0;
                ColliderDesc::Segment { a: -half, b: half }
            }
        }
    }

    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
            ColliderDesc::Segment { a, b } => ColliderBuilder::segment(
                nalgebra::Point2::new(a.x, a.y),
                nalgebra::Point2::new(b.x, b.y),
            ),
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
    pub ccd: bool,
    pub sensor: bool,
    pub collider: ColliderDesc,
}

impl BodyDesc {
    fn with_type(body_type: BodyType, collider: ColliderDesc) -> Self {
        Self {
            body_type,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            fixed_rotation: false,
            ccd: false,
            sensor: false,
            collider,
        }
    }

    /// A dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self::with_type(BodyType::Dynamic, collider)
    }

    /// A kinematic body description with the given collider shape.
    pub fn kinematic(collider: ColliderDesc) -> Self {
        Self::with_type(BodyType::Kinematic, collider)
    }

    /// A static body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            gravity_scale: 0.0,
            fixed_rotation: true,
            ..Self::with_type(BodyType::Static, collider)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Sensors report overlaps but never push back.
    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// Handle to a joint in the physics simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointHandle(pub(crate) ImpulseJointHandle);

/// Two entities whose colliders began touching during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
}

impl CollisionPair {
    fn same_pair(&self, other: &CollisionPair) -> bool {
        (self.entity_a == other.entity_a && self.entity_b == other.entity_b)
            || (self.entity_a == other.entity_b && self.entity_b == other.entity_a)
    }
}

/// Per-entity contact suppression, evaluated by the physics hooks before the
/// solver runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactRules {
    /// Entities sharing a nonzero group never collide.
    pub pass_through: u32,
    /// Only approaches toward this face produce a contact.
    pub one_sided: Option<Side>,
}

impl ContactRules {
    /// Whether a pair is suppressed entirely (no response, no event).
    pub fn passes_through(&self, other: &ContactRules) -> bool {
        self.pass_through != 0 && self.pass_through == other.pass_through
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        // Only begin-contact matters; ends are dropped here.
        if event.started() {
            if let Ok(mut events) = self.collisions.lock() {
                events.push(event);
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// Pre-solve hooks
// ---------------------------------------------------------------------------

fn entity_of(bodies: &RigidBodySet, colliders: &ColliderSet, handle: ColliderHandle) -> Option<EntityId> {
    let collider = colliders.get(handle)?;
    let body = bodies.get(collider.parent()?)?;
    match body.user_data {
        0 => None,
        data => Some(EntityId(data as u32)),
    }
}

struct ContactRuleHooks<'a> {
    rules: &'a HashMap<EntityId, ContactRules>,
}

impl ContactRuleHooks<'_> {
    fn rules_for(&self, bodies: &RigidBodySet, colliders: &ColliderSet, handle: ColliderHandle) -> ContactRules {
        entity_of(bodies, colliders, handle)
            .and_then(|id| self.rules.get(&id).copied())
            .unwrap_or_default()
    }

    fn suppressed(&self, context: &PairFilterContext) -> bool {
        let a = self.rules_for(context.bodies, context.colliders, context.collider1);
        let b = self.rules_for(context.bodies, context.colliders, context.collider2);
        a.passes_through(&b)
    }
}

impl PhysicsHooks for ContactRuleHooks<'_> {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        if self.suppressed(context) {
            None
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }

    fn filter_intersection_pair(&self, context: &PairFilterContext) -> bool {
        !self.suppressed(context)
    }

    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let a = self.rules_for(context.bodies, context.colliders, context.collider1);
        let b = self.rules_for(context.bodies, context.colliders, context.collider2);

        // Exactly one participant may declare a face.
        let (side, other) = match (a.one_sided, b.one_sided) {
            (Some(side), None) => (side, context.rigid_body2),
            (None, Some(side)) => (side, context.rigid_body1),
            _ => return,
        };
        let Some(other) = other.and_then(|h| context.bodies.get(h)) else {
            return;
        };

        let wrong_way = context
            .solver_contacts
            .iter()
            .any(|c| side.disables_contact(na_to_vec2(&other.velocity_at_point(&c.point))));
        if wrong_way {
            context.solver_contacts.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct owned by a level.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    contact_rules: HashMap<EntityId, ContactRules>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// The world is Y-up: use negative Y for downward gravity.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            contact_rules: HashMap::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vec2_to_na(gravity);
    }

    pub fn gravity(&self) -> Vec2 {
        na_to_vec2(&self.gravity)
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(vec2_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .ccd_enabled(desc.ccd)
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);
        let collider_handle = self.attach_collider(body_handle, &desc.collider, desc.sensor, material);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    fn attach_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        shape: &ColliderDesc,
        sensor: bool,
        material: ColliderMaterial,
    ) -> ColliderHandle {
        let collider = shape
            .build_collider()
            .sensor(sensor)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(
                ActiveHooks::FILTER_CONTACT_PAIRS
                    | ActiveHooks::FILTER_INTERSECTION_PAIR
                    | ActiveHooks::MODIFY_SOLVER_CONTACTS,
            )
            .build();

        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies)
    }

    /// Swap a body's collider for a new shape, keeping sensor flag and
    /// material. The body itself (velocity, rotation, damping) is untouched.
    pub fn replace_collider(&mut self, body: &mut PhysicsBody, shape: ColliderDesc) {
        let (sensor, material) = match self.colliders.get(body.collider_handle) {
            Some(c) => (
                c.is_sensor(),
                ColliderMaterial {
                    restitution: c.restitution(),
                    friction: c.friction(),
                    density: c.density(),
                },
            ),
            None => (false, ColliderMaterial::default()),
        };
        self.colliders.remove(
            body.collider_handle,
            &mut self.island_manager,
            &mut self.bodies,
            true,
        );
        body.collider_handle = self.attach_collider(body.body_handle, &shape, sensor, material);
    }

    /// Step the simulation and collect begin-contact pairs into the provided Vec.
    /// A pair is reported at most once per step.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        let hooks = ContactRuleHooks {
            rules: &self.contact_rules,
        };
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &hooks,
            &self.event_collector,
        );

        let first_new = collision_events.len();
        for event in self.event_collector.drain_collisions() {
            let (h1, h2) = (event.collider1(), event.collider2());
            let entity_a = entity_of(&self.bodies, &self.colliders, h1);
            let entity_b = entity_of(&self.bodies, &self.colliders, h2);

            if let (Some(a), Some(b)) = (entity_a, entity_b) {
                let pair = CollisionPair {
                    entity_a: a,
                    entity_b: b,
                };
                if !collision_events[first_new..].iter().any(|p| p.same_pair(&pair)) {
                    collision_events.push(pair);
                }
            }
        }
    }

    /// Register pass-through / one-sided rules for an entity.
    pub fn set_contact_rules(&mut self, id: EntityId, rules: ContactRules) {
        if rules == ContactRules::default() {
            self.contact_rules.remove(&id);
        } else {
            self.contact_rules.insert(id, rules);
        }
    }

    pub fn contact_rules(&self, id: EntityId) -> ContactRules {
        self.contact_rules.get(&id).copied().unwrap_or_default()
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Teleport a body.
    pub fn set_transform(&mut self, body: &PhysicsBody, pos: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(nalgebra::Isometry2::new(vec2_to_na(pos), rotation), true);
        }
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    pub fn body_type(&self, body: &PhysicsBody) -> BodyType {
        self.bodies
            .get(body.body_handle)
            .map(|rb| BodyType::from_rapier(rb.body_type()))
            .unwrap_or(BodyType::Static)
    }

    pub fn set_body_type(&mut self, body: &PhysicsBody, body_type: BodyType) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_body_type(body_type.to_rapier(), true);
        }
    }

    pub fn set_gravity_scale(&mut self, body: &PhysicsBody, scale: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_gravity_scale(scale, true);
        }
    }

    pub fn set_linear_damping(&mut self, body: &PhysicsBody, damping: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linear_damping(damping);
        }
    }

    /// Enable or disable a body. Disabled bodies leave the simulation
    /// entirely: no motion, no contacts, no events.
    pub fn set_enabled(&mut self, body: &PhysicsBody, enabled: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.is_enabled())
            .unwrap_or(false)
    }

    pub fn set_material(&mut self, body: &PhysicsBody, material: ColliderMaterial) {
        if let Some(c) = self.colliders.get_mut(body.collider_handle) {
            c.set_restitution(material.restitution);
            c.set_friction(material.friction);
            c.set_density(material.density);
        }
    }

    pub fn set_sensor(&mut self, body: &PhysicsBody, sensor: bool) {
        if let Some(c) = self.colliders.get_mut(body.collider_handle) {
            c.set_sensor(sensor);
        }
    }

    pub fn is_sensor(&self, body: &PhysicsBody) -> bool {
        self.colliders
            .get(body.collider_handle)
            .map(|c| c.is_sensor())
            .unwrap_or(false)
    }

    /// Query the collider shape of a physics body.
    /// Returns `None` if the collider no longer exists or has an unsupported shape.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let collider = self.colliders.get(body.collider_handle)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ColliderDesc::Ball { radius: ball.radius })
        } else if let Some(cuboid) = shape.as_cuboid() {
            Some(ColliderDesc::Cuboid {
                half_width: cuboid.half_extents.x,
                half_height: cuboid.half_extents.y,
            })
        } else if let Some(segment) = shape.as_segment() {
            Some(ColliderDesc::Segment {
                a: Vec2::new(segment.a.x, segment.a.y),
                b: Vec2::new(segment.b.x, segment.b.y),
            })
        } else {
            None
        }
    }

    /// Entities whose colliders contain a world point, as of the last step.
    pub fn entities_at(&self, point: Vec2) -> Vec<EntityId> {
        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_point(
            &self.bodies,
            &self.colliders,
            &nalgebra::Point2::new(point.x, point.y),
            QueryFilter::default(),
            |handle| {
                if let Some(id) = entity_of(&self.bodies, &self.colliders, handle) {
                    hits.push(id);
                }
                true
            },
        );
        hits
    }

    /// Rigidly attach body B to body A at the given local anchors.
    pub fn weld(
        &mut self,
        body_a: &PhysicsBody,
        body_b: &PhysicsBody,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> JointHandle {
        let joint = FixedJointBuilder::new()
            .local_anchor1(nalgebra::Point2::new(anchor_a.x, anchor_a.y))
            .local_anchor2(nalgebra::Point2::new(anchor_b.x, anchor_b.y))
            .build();
        JointHandle(
            self.impulse_joints
                .insert(body_a.body_handle, body_b.body_handle, joint, true),
        )
    }

    /// Remove a joint from the simulation.
    pub fn remove_joint(&mut self, handle: JointHandle) {
        self.impulse_joints.remove(handle.0, true);
    }

    /// Number of joints in the simulation.
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
