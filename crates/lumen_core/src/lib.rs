//! # LUMEN Core
//!
//! Shared plumbing for the GUI and scene-decoration crates:
//! - Error taxonomy (validation, duplicate names, unsupported operations)
//! - Scoped name registries, one per context instead of global singletons
//! - The render-hook boundary into the native engine
//! - TOML configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   register/unregister   ┌──────────────┐
//! │ lumen_ui::Gui │ ───────────────────────► │ NameRegistry │
//! │ lumen_scene   │ ──────┐                  └──────────────┘
//! └───────────────┘       │ *_impl hooks     ┌──────────────┐
//!                         └────────────────► │ RenderBackend│
//!                                            └──────────────┘
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod config;
pub mod error;
pub mod registry;
pub mod style;

pub use backend::{CameraNode, NullBackend, RecordingBackend, RenderBackend, RenderCall, SharedBackend};
pub use config::{CameraConfig, EngineConfig, GuiConfig};
pub use error::{ensure_finite, GfxError, GfxResult};
pub use registry::{EntityKind, NameRegistry};
pub use style::{Color, Font, Material};
