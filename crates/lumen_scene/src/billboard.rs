//! Camera-facing textured planes.

use std::fmt;

use glam::Vec3;
use lumen_core::{ensure_finite, Color, EntityKind, GfxError, GfxResult, Material, SharedBackend};

/// A sized, positioned plane that always faces the camera.
pub struct Billboard {
    name: String,
    position: Vec3,
    width: f32,
    height: f32,
    color: Color,
    material: Option<Material>,
    visible: bool,
    backend: SharedBackend,
}

impl Billboard {
    pub(crate) fn new(
        name: String,
        position: Vec3,
        width: f32,
        height: f32,
        backend: SharedBackend,
    ) -> GfxResult<Self> {
        validate_size(width, height)?;
        ensure_finite("position", position)?;

        let billboard = Self {
            name,
            position,
            width,
            height,
            color: Color::WHITE,
            material: None,
            visible: true,
            backend,
        };
        billboard
            .backend
            .set_billboard_position_impl(&billboard.name, position);
        billboard
            .backend
            .set_billboard_size_impl(&billboard.name, width, height);
        Ok(billboard)
    }

    /// Billboard name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Width and height in world units.
    #[must_use]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Tint.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Displayed material, if any.
    #[must_use]
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Visibility flag.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Resizes the billboard. Both dimensions must be positive.
    ///
    /// On error nothing changes and the backend is not called.
    pub fn set_size(&mut self, width: f32, height: f32) -> GfxResult<()> {
        validate_size(width, height)?;
        self.width = width;
        self.height = height;
        self.backend
            .set_billboard_size_impl(&self.name, width, height);
        Ok(())
    }

    /// Moves the billboard. The position must be finite.
    pub fn set_position(&mut self, position: Vec3) -> GfxResult<()> {
        ensure_finite("position", position)?;
        self.position = position;
        self.backend
            .set_billboard_position_impl(&self.name, position);
        Ok(())
    }

    /// Changes the tint.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.backend
            .set_color_impl(EntityKind::Billboard, &self.name, color);
    }

    /// Changes the displayed material.
    pub fn set_material(&mut self, material: Material) {
        self.backend
            .set_material_impl(EntityKind::Billboard, &self.name, &material);
        self.material = Some(material);
    }

    /// Shows or hides the billboard.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.backend
            .set_visible_impl(EntityKind::Billboard, &self.name, visible);
    }
}

impl fmt::Debug for Billboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Billboard")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

fn validate_size(width: f32, height: f32) -> GfxResult<()> {
    // NaN fails both comparisons, so test for the valid range.
    if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        Ok(())
    } else {
        Err(GfxError::InvalidSize { width, height })
    }
}
