//! Cameras and their swappable control behaviors.
//!
//! A camera is backed by three nodes in its own [`SceneGraph`]:
//!
//! ```text
//! origin topology          target topology
//!
//! root                     root
//!  └─ master                └─ master
//!      └─ origin                └─ target
//!          └─ target                └─ origin
//! ```
//!
//! Moving the parent drags the child along. Behaviors pick the topology on
//! activation and only ever move nodes through [`CameraRig::set_position`]
//! and [`CameraRig::set_target_position`], which notify camera listeners.

mod behavior;

use std::fmt;

use glam::Vec3;
use lumen_core::{ensure_finite, CameraConfig, CameraNode, GfxError, GfxResult, SharedBackend};

use crate::node::{NodeId, SceneGraph};

pub use behavior::{
    BehaviorKind, CameraBehavior, FixedBehavior, FpsBehavior, FreeflyBehavior, RtsBehavior,
    TargetBehavior, TpsBehavior,
};

/// Distance used when origin and target coincide.
const DEFAULT_DISTANCE: f32 = 1.0;

/// Euler orientation in radians.
///
/// Yaw 0 looks down +Z, positive yaw turns toward +X, positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Rotation about the vertical axis.
    pub yaw: f32,
    /// Rotation above/below the horizon.
    pub pitch: f32,
    /// Rotation about the view axis.
    pub roll: f32,
}

impl Rotation {
    /// Unit view direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Unit view direction flattened onto the ground plane.
    #[must_use]
    pub fn ground_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(sy, 0.0, cy)
    }

    /// Unit right vector on the ground plane.
    #[must_use]
    pub fn ground_right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    /// Yaw and pitch that look along `direction`, keeping `roll`.
    ///
    /// Returns None for a zero or non-finite direction.
    #[must_use]
    pub fn looking_along(direction: Vec3, roll: f32) -> Option<Self> {
        let dir = direction.try_normalize()?;
        Some(Self {
            yaw: dir.x.atan2(dir.z),
            pitch: dir.y.clamp(-1.0, 1.0).asin(),
            roll,
        })
    }
}

/// Which node hangs off the master node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Origin under master, target under origin.
    Origin,
    /// Target under master, origin under target.
    Target,
}

/// Sent to camera listeners whenever a node is moved.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraEvent {
    /// Camera name.
    pub camera: String,
    /// Node that was moved.
    pub node: CameraNode,
    /// Its new world position.
    pub position: Vec3,
}

/// Boxed camera listener callback.
pub type CameraListener = Box<dyn FnMut(&CameraEvent)>;

/// Camera state mutated by behaviors.
pub struct CameraRig {
    name: String,
    graph: SceneGraph,
    master: NodeId,
    origin: NodeId,
    target: NodeId,
    topology: Topology,
    rotation: Rotation,
    relative_position: Vec3,
    offset: Vec3,
    near_clip: f32,
    far_clip: f32,
    config: CameraConfig,
    listeners: Vec<CameraListener>,
    backend: SharedBackend,
}

impl CameraRig {
    fn new(name: String, config: CameraConfig, backend: SharedBackend) -> GfxResult<Self> {
        validate_clip(config.near_clip, config.far_clip)?;

        let mut graph = SceneGraph::new();
        let master = graph.create_node(SceneGraph::ROOT, Vec3::ZERO)?;
        let origin = graph.create_node(master, Vec3::ZERO)?;
        let target = graph.create_node(origin, Vec3::Z * DEFAULT_DISTANCE)?;

        let rig = Self {
            name,
            graph,
            master,
            origin,
            target,
            topology: Topology::Origin,
            rotation: Rotation::default(),
            relative_position: Vec3::NEG_Z * DEFAULT_DISTANCE,
            offset: Vec3::ZERO,
            near_clip: config.near_clip,
            far_clip: config.far_clip,
            config,
            listeners: Vec::new(),
            backend,
        };
        rig.backend
            .set_node_position_impl(&rig.name, CameraNode::Master, Vec3::ZERO);
        rig.push_nodes()?;
        rig.backend
            .set_clip_distances_impl(&rig.name, rig.near_clip, rig.far_clip);
        Ok(rig)
    }

    /// Camera name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defaults this camera was created with.
    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Current node topology.
    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Current orientation.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Replaces the stored orientation without moving any node.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Maximum absolute pitch, in radians.
    #[must_use]
    pub fn pitch_limit(&self) -> f32 {
        self.config.pitch_limit_degrees.to_radians()
    }

    /// Origin placement relative to the target.
    #[must_use]
    pub fn relative_position(&self) -> Vec3 {
        self.relative_position
    }

    /// Extra displacement added when placing the origin relative to the target.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Near clip distance.
    #[must_use]
    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    /// Far clip distance.
    #[must_use]
    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    /// World position of the origin (the eye).
    pub fn position(&self) -> GfxResult<Vec3> {
        self.graph.world_position(self.origin)
    }

    /// World position of the target (the look-at point).
    pub fn target_position(&self) -> GfxResult<Vec3> {
        self.graph.world_position(self.target)
    }

    /// World position of the master node.
    pub fn master_position(&self) -> GfxResult<Vec3> {
        self.graph.world_position(self.master)
    }

    /// Parent of a camera node within the camera's graph.
    #[must_use]
    pub fn parent_of(&self, node: CameraNode) -> Option<CameraNode> {
        let id = self.node_id(node);
        let parent = self.graph.parent(id)?;
        [CameraNode::Master, CameraNode::Origin, CameraNode::Target]
            .into_iter()
            .find(|&n| self.node_id(n) == parent)
    }

    /// Eye-to-target distance, never zero.
    pub fn distance(&self) -> GfxResult<f32> {
        let d = self.position()?.distance(self.target_position()?);
        Ok(if d > f32::EPSILON { d } else { DEFAULT_DISTANCE })
    }

    /// Hangs origin off master and target off origin, keeping world positions.
    pub fn init_origin(&mut self) -> GfxResult<()> {
        self.graph.attach(self.origin, self.master)?;
        self.graph.attach(self.target, self.origin)?;
        self.topology = Topology::Origin;
        Ok(())
    }

    /// Hangs target off master and origin off target, keeping world positions.
    pub fn init_target(&mut self) -> GfxResult<()> {
        self.graph.attach(self.target, self.master)?;
        self.graph.attach(self.origin, self.target)?;
        self.topology = Topology::Target;
        Ok(())
    }

    /// Moves the origin. Under the origin topology the target moves along.
    pub fn set_position(&mut self, position: Vec3) -> GfxResult<()> {
        self.graph.set_world_position(self.origin, position)?;
        self.after_move(CameraNode::Origin, position)
    }

    /// Moves the target. Under the target topology the origin moves along.
    pub fn set_target_position(&mut self, position: Vec3) -> GfxResult<()> {
        self.graph.set_world_position(self.target, position)?;
        self.after_move(CameraNode::Target, position)
    }

    /// Points the camera at `point` without moving the origin.
    pub fn look_at(&mut self, point: Vec3) -> GfxResult<()> {
        let eye = self.position()?;
        self.set_target_position(point)?;
        if self.topology == Topology::Target {
            // The origin hangs off the target; put it back.
            self.graph.set_world_position(self.origin, eye)?;
            self.push_nodes()?;
        }
        if let Some(rotation) = Rotation::looking_along(point - eye, self.rotation.roll) {
            self.rotation = rotation;
        }
        self.relative_position = eye - point;
        Ok(())
    }

    /// Places the target in front of the origin along the current rotation.
    pub fn aim(&mut self) -> GfxResult<()> {
        let eye = self.position()?;
        let distance = self.distance()?;
        self.set_target_position(eye + self.rotation.forward() * distance)?;
        if self.topology == Topology::Target {
            self.graph.set_world_position(self.origin, eye)?;
            self.push_nodes()?;
        }
        self.relative_position = -self.rotation.forward() * distance;
        Ok(())
    }

    /// Swings the origin around the target to match the current rotation.
    pub fn orbit(&mut self) -> GfxResult<()> {
        let center = self.target_position()?;
        let distance = self.distance()?;
        self.relative_position = -self.rotation.forward() * distance;
        self.set_position(center + self.relative_position)
    }

    /// Places the origin at `position` and faces the target from there.
    pub fn place_origin(&mut self, position: Vec3) -> GfxResult<()> {
        let center = self.target_position()?;
        self.set_position(position)?;
        if self.topology == Topology::Origin {
            self.graph.set_world_position(self.target, center)?;
            self.push_nodes()?;
        }
        self.face(center - position);
        self.relative_position = position - center;
        Ok(())
    }

    /// Places the origin at `target + relative + offset`.
    pub fn set_relative_position(&mut self, relative: Vec3) -> GfxResult<()> {
        self.relative_position = relative;
        let center = self.target_position()?;
        let eye = center + relative + self.offset;
        self.set_position(eye)?;
        if self.topology == Topology::Origin {
            self.graph.set_world_position(self.target, center)?;
            self.push_nodes()?;
        }
        self.face(center - eye);
        Ok(())
    }

    fn face(&mut self, direction: Vec3) {
        if let Some(rotation) = Rotation::looking_along(direction, self.rotation.roll) {
            self.rotation = rotation;
        }
    }

    fn node_id(&self, node: CameraNode) -> NodeId {
        match node {
            CameraNode::Master => self.master,
            CameraNode::Origin => self.origin,
            CameraNode::Target => self.target,
        }
    }

    fn after_move(&mut self, node: CameraNode, position: Vec3) -> GfxResult<()> {
        self.push_nodes()?;
        let event = CameraEvent {
            camera: self.name.clone(),
            node,
            position,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
        Ok(())
    }

    fn push_nodes(&self) -> GfxResult<()> {
        for node in [CameraNode::Origin, CameraNode::Target] {
            let world = self.graph.world_position(self.node_id(node))?;
            self.backend.set_node_position_impl(&self.name, node, world);
        }
        Ok(())
    }
}

impl fmt::Debug for CameraRig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraRig")
            .field("name", &self.name)
            .field("topology", &self.topology)
            .field("rotation", &self.rotation)
            .field("relative_position", &self.relative_position)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn validate_clip(near: f32, far: f32) -> GfxResult<()> {
    if !near.is_finite() || near <= 0.0 {
        return Err(GfxError::invalid("near clip", format!("{near} must be positive")));
    }
    if !far.is_finite() || far <= near {
        return Err(GfxError::invalid(
            "far clip",
            format!("{far} must exceed near clip {near}"),
        ));
    }
    Ok(())
}

/// A camera with a swappable behavior.
///
/// All inputs are checked for finiteness before the behavior sees them.
/// Behaviors may silently ignore an operation; that is not an error.
#[derive(Debug)]
pub struct Camera {
    rig: CameraRig,
    behavior: Box<dyn CameraBehavior>,
}

impl Camera {
    /// Creates a camera and activates `behavior`.
    pub fn new(
        name: impl Into<String>,
        config: CameraConfig,
        backend: SharedBackend,
        behavior: BehaviorKind,
    ) -> GfxResult<Self> {
        let mut camera = Self {
            rig: CameraRig::new(name.into(), config, backend)?,
            behavior: behavior.create(),
        };
        camera.behavior.initialise(&mut camera.rig)?;
        Ok(camera)
    }

    /// Camera name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.rig.name()
    }

    /// Read access to the camera state.
    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Active behavior.
    #[must_use]
    pub fn behavior_kind(&self) -> BehaviorKind {
        self.behavior.kind()
    }

    /// Replaces the behavior with a fresh one of `kind` and initialises it.
    pub fn change_behavior(&mut self, kind: BehaviorKind) -> GfxResult<()> {
        self.set_behavior(kind.create())
    }

    /// Replaces the behavior wholesale and initialises it.
    pub fn set_behavior(&mut self, behavior: Box<dyn CameraBehavior>) -> GfxResult<()> {
        tracing::debug!(
            camera = %self.rig.name,
            from = self.behavior.kind().as_str(),
            to = behavior.kind().as_str(),
            "camera behavior changed"
        );
        self.behavior = behavior;
        self.behavior.initialise(&mut self.rig)
    }

    /// Moves the camera as the behavior sees fit.
    pub fn move_by(&mut self, delta: Vec3) -> GfxResult<()> {
        ensure_finite("delta", delta)?;
        self.behavior.move_by(&mut self.rig, delta)
    }

    /// Points the camera at a world position.
    pub fn look_at(&mut self, point: Vec3) -> GfxResult<()> {
        ensure_finite("look-at point", point)?;
        self.behavior.look_at(&mut self.rig, point)
    }

    /// Places the camera at a world position.
    pub fn set_position(&mut self, position: Vec3) -> GfxResult<()> {
        ensure_finite("position", position)?;
        self.behavior.set_position(&mut self.rig, position)
    }

    /// Rotates by the given deltas, in radians.
    pub fn rotate(&mut self, yaw: f32, pitch: f32, roll: f32) -> GfxResult<()> {
        ensure_finite("rotation", Vec3::new(yaw, pitch, roll))?;
        self.behavior.rotate(&mut self.rig, yaw, pitch, roll)
    }

    /// Places the camera relative to its target.
    pub fn set_relative_position(&mut self, relative: Vec3) -> GfxResult<()> {
        ensure_finite("relative position", relative)?;
        self.behavior.set_relative_position(&mut self.rig, relative)
    }

    /// Sets the displacement added to relative placements.
    pub fn set_offset(&mut self, offset: Vec3) -> GfxResult<()> {
        ensure_finite("offset", offset)?;
        self.rig.offset = offset;
        Ok(())
    }

    /// Sets the clip planes. Requires `0 < near < far`.
    pub fn set_clip_distances(&mut self, near: f32, far: f32) -> GfxResult<()> {
        validate_clip(near, far)?;
        self.rig.near_clip = near;
        self.rig.far_clip = far;
        self.rig
            .backend
            .set_clip_distances_impl(&self.rig.name, near, far);
        Ok(())
    }

    /// Registers a listener notified whenever a camera node moves.
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&CameraEvent) + 'static,
    {
        self.rig.listeners.push(Box::new(listener));
    }

    /// World position of the eye.
    pub fn position(&self) -> GfxResult<Vec3> {
        self.rig.position()
    }

    /// World position of the look-at point.
    pub fn target_position(&self) -> GfxResult<Vec3> {
        self.rig.target_position()
    }

    /// Current orientation.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rig.rotation
    }

    pub(crate) fn backend(&self) -> &SharedBackend {
        &self.rig.backend
    }
}
