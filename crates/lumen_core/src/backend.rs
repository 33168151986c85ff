//! Render-hook boundary.
//!
//! GUI and scene objects never draw. After validating and committing a
//! change they forward the new value to a [`RenderBackend`], which applies
//! it to the native scene. Hooks return nothing; a backend that cannot
//! apply a value is broken, not recoverable.
//!
//! ```text
//! builder / setter ──validate──► commit state ──► RenderBackend::*_impl
//! ```

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use crate::registry::EntityKind;
use crate::style::{Color, Font, Material};

/// One of the three scene nodes backing a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraNode {
    /// Root-attached anchor, never moved by behaviors.
    Master,
    /// The camera's physical position.
    Origin,
    /// The look-at point.
    Target,
}

/// Hooks into the native rendering engine.
///
/// Every hook defaults to doing nothing so a backend only implements what
/// it renders. GUI hooks receive absolute screen coordinates.
pub trait RenderBackend {
    /// Moves a widget or container (absolute screen pixels).
    fn set_position_impl(&self, _kind: EntityKind, _name: &str, _x: i32, _y: i32) {}

    /// Resizes a widget or container.
    fn set_size_impl(&self, _kind: EntityKind, _name: &str, _width: u32, _height: u32) {}

    /// Shows or hides any named object.
    fn set_visible_impl(&self, _kind: EntityKind, _name: &str, _visible: bool) {}

    /// Replaces the text of a text-bearing widget.
    fn set_text_impl(&self, _kind: EntityKind, _name: &str, _text: &str) {}

    /// Changes the font of a text-bearing widget.
    fn set_font_impl(&self, _kind: EntityKind, _name: &str, _font: &Font) {}

    /// Swaps the displayed material.
    fn set_material_impl(&self, _kind: EntityKind, _name: &str, _material: &Material) {}

    /// Tints any named object.
    fn set_color_impl(&self, _kind: EntityKind, _name: &str, _color: Color) {}

    /// Moves one of a camera's scene nodes (world space).
    fn set_node_position_impl(&self, _camera: &str, _node: CameraNode, _position: Vec3) {}

    /// Updates a camera's clip planes.
    fn set_clip_distances_impl(&self, _camera: &str, _near: f32, _far: f32) {}

    /// Moves a light.
    fn set_light_position_impl(&self, _light: &str, _position: Vec3) {}

    /// Points a light (normalized direction).
    fn set_direction_impl(&self, _light: &str, _direction: Vec3) {}

    /// Moves a lens flare.
    fn set_flare_position_impl(&self, _flare: &str, _position: Vec3) {}

    /// Moves a billboard.
    fn set_billboard_position_impl(&self, _billboard: &str, _position: Vec3) {}

    /// Resizes a billboard (both dimensions positive).
    fn set_billboard_size_impl(&self, _billboard: &str, _width: f32, _height: f32) {}

    /// Destroys the native counterpart of a deleted object.
    fn remove_impl(&self, _kind: EntityKind, _name: &str) {}
}

/// Shared backend handle held by every GUI and scene object.
pub type SharedBackend = Arc<dyn RenderBackend>;

/// Backend that ignores every hook (headless runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl RenderBackend for NullBackend {}

/// A hook invocation captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    /// [`RenderBackend::set_position_impl`].
    Position { kind: EntityKind, name: String, x: i32, y: i32 },
    /// [`RenderBackend::set_size_impl`].
    Size { kind: EntityKind, name: String, width: u32, height: u32 },
    /// [`RenderBackend::set_visible_impl`].
    Visible { kind: EntityKind, name: String, visible: bool },
    /// [`RenderBackend::set_text_impl`].
    Text { kind: EntityKind, name: String, text: String },
    /// [`RenderBackend::set_font_impl`].
    Font { kind: EntityKind, name: String, font: Font },
    /// [`RenderBackend::set_material_impl`].
    Material { kind: EntityKind, name: String, material: Material },
    /// [`RenderBackend::set_color_impl`].
    Color { kind: EntityKind, name: String, color: Color },
    /// [`RenderBackend::set_node_position_impl`].
    NodePosition { camera: String, node: CameraNode, position: Vec3 },
    /// [`RenderBackend::set_clip_distances_impl`].
    ClipDistances { camera: String, near: f32, far: f32 },
    /// [`RenderBackend::set_light_position_impl`].
    LightPosition { light: String, position: Vec3 },
    /// [`RenderBackend::set_direction_impl`].
    Direction { light: String, direction: Vec3 },
    /// [`RenderBackend::set_flare_position_impl`].
    FlarePosition { flare: String, position: Vec3 },
    /// [`RenderBackend::set_billboard_position_impl`].
    BillboardPosition { billboard: String, position: Vec3 },
    /// [`RenderBackend::set_billboard_size_impl`].
    BillboardSize { billboard: String, width: f32, height: f32 },
    /// [`RenderBackend::remove_impl`].
    Remove { kind: EntityKind, name: String },
}

/// Backend that records every hook call in order.
///
/// Used by tests and debug tooling to observe what reached the renderer.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder already wrapped for sharing.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns a copy of all calls so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Drains the recorded calls.
    pub fn take(&self) -> Vec<RenderCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// Counts calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    /// Returns true if no hook has been called since the last [`take`](Self::take).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    fn push(&self, call: RenderCall) {
        self.calls.lock().push(call);
    }
}

impl RenderBackend for RecordingBackend {
    fn set_position_impl(&self, kind: EntityKind, name: &str, x: i32, y: i32) {
        self.push(RenderCall::Position { kind, name: name.to_owned(), x, y });
    }

    fn set_size_impl(&self, kind: EntityKind, name: &str, width: u32, height: u32) {
        self.push(RenderCall::Size { kind, name: name.to_owned(), width, height });
    }

    fn set_visible_impl(&self, kind: EntityKind, name: &str, visible: bool) {
        self.push(RenderCall::Visible { kind, name: name.to_owned(), visible });
    }

    fn set_text_impl(&self, kind: EntityKind, name: &str, text: &str) {
        self.push(RenderCall::Text { kind, name: name.to_owned(), text: text.to_owned() });
    }

    fn set_font_impl(&self, kind: EntityKind, name: &str, font: &Font) {
        self.push(RenderCall::Font { kind, name: name.to_owned(), font: font.clone() });
    }

    fn set_material_impl(&self, kind: EntityKind, name: &str, material: &Material) {
        self.push(RenderCall::Material {
            kind,
            name: name.to_owned(),
            material: material.clone(),
        });
    }

    fn set_color_impl(&self, kind: EntityKind, name: &str, color: Color) {
        self.push(RenderCall::Color { kind, name: name.to_owned(), color });
    }

    fn set_node_position_impl(&self, camera: &str, node: CameraNode, position: Vec3) {
        self.push(RenderCall::NodePosition { camera: camera.to_owned(), node, position });
    }

    fn set_clip_distances_impl(&self, camera: &str, near: f32, far: f32) {
        self.push(RenderCall::ClipDistances { camera: camera.to_owned(), near, far });
    }

    fn set_light_position_impl(&self, light: &str, position: Vec3) {
        self.push(RenderCall::LightPosition { light: light.to_owned(), position });
    }

    fn set_direction_impl(&self, light: &str, direction: Vec3) {
        self.push(RenderCall::Direction { light: light.to_owned(), direction });
    }

    fn set_flare_position_impl(&self, flare: &str, position: Vec3) {
        self.push(RenderCall::FlarePosition { flare: flare.to_owned(), position });
    }

    fn set_billboard_position_impl(&self, billboard: &str, position: Vec3) {
        self.push(RenderCall::BillboardPosition { billboard: billboard.to_owned(), position });
    }

    fn set_billboard_size_impl(&self, billboard: &str, width: f32, height: f32) {
        self.push(RenderCall::BillboardSize { billboard: billboard.to_owned(), width, height });
    }

    fn remove_impl(&self, kind: EntityKind, name: &str) {
        self.push(RenderCall::Remove { kind, name: name.to_owned() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_order() {
        let backend = RecordingBackend::new();
        backend.set_light_position_impl("sun", Vec3::ONE);
        backend.set_flare_position_impl("glare", Vec3::ONE);

        let calls = backend.take();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], RenderCall::LightPosition { .. }));
        assert!(matches!(calls[1], RenderCall::FlarePosition { .. }));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_null_backend_accepts_everything() {
        let backend: SharedBackend = Arc::new(NullBackend);
        backend.set_visible_impl(EntityKind::Widget, "ok", false);
        backend.remove_impl(EntityKind::Widget, "ok");
    }
}
