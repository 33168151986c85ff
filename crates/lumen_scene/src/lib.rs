//! # LUMEN Scene
//!
//! Scene decoration over a native renderer:
//! - Cameras backed by a master/origin/target node triple
//! - Six control behaviors, swappable at runtime
//! - Lights that drag their lens flares along
//! - Billboards with validated sizes
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SCENE CONTEXT                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Camera ── CameraBehavior ──► CameraRig ──► SceneGraph        │
//! │  Light ──► LensFlare*                                          │
//! │  Billboard                                                     │
//! │        └──────────── RenderBackend hooks ─────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let mut scene = Scene::headless();
//! let camera = scene.create_camera("main", BehaviorKind::Tps)?;
//! camera.move_by(Vec3::new(0.0, 0.0, 2.0))?;
//!
//! scene.create_light("lamp", LightKind::Point { attenuation: 20.0 }, Vec3::Y)?;
//! scene.attach_flare("lamp", "glare")?;
//! scene.light_mut("lamp").unwrap().set_position(Vec3::new(4.0, 2.0, 0.0))?;
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod billboard;
pub mod camera;
pub mod light;
pub mod node;
pub mod scene;

pub use billboard::Billboard;
pub use camera::{
    BehaviorKind, Camera, CameraBehavior, CameraEvent, CameraListener, CameraRig, FixedBehavior,
    FpsBehavior, FreeflyBehavior, RtsBehavior, Rotation, TargetBehavior, Topology, TpsBehavior,
};
pub use light::{LensFlare, Light, LightKind, LightUniform, MAX_LIGHTS};
pub use node::{NodeId, SceneGraph};
pub use scene::Scene;

pub use lumen_core::{CameraConfig, CameraNode, Color, GfxError, GfxResult, Material};
