//! Lights and the lens flares that ride on them.
//!
//! A light owns its flares. [`Light::set_position`] is the single entry
//! point that moves them: the light commits, calls its hook, then moves each
//! flare in attach order before returning.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use lumen_core::{ensure_finite, Color, EntityKind, GfxError, GfxResult, SharedBackend};

/// Maximum number of lights packed per frame.
pub const MAX_LIGHTS: usize = 256;

/// What kind of light, with its kind-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Omnidirectional light fading over `attenuation` world units.
    Point {
        /// Falloff range.
        attenuation: f32,
    },
    /// Cone light with a mutable direction.
    Spot {
        /// Unit direction.
        direction: Vec3,
        /// Cone half-angle (radians).
        angle: f32,
    },
    /// Infinitely distant light; position is meaningless.
    Directional {
        /// Unit direction.
        direction: Vec3,
    },
}

impl LightKind {
    /// Short lowercase name for logs and errors.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Point { .. } => "point light",
            Self::Spot { .. } => "spot light",
            Self::Directional { .. } => "directional light",
        }
    }

    const fn tag(&self) -> u32 {
        match self {
            Self::Point { .. } => 0,
            Self::Spot { .. } => 1,
            Self::Directional { .. } => 2,
        }
    }

    /// Normalizes directions and checks parameters.
    pub(crate) fn validated(self) -> GfxResult<Self> {
        match self {
            Self::Point { attenuation } => {
                if !attenuation.is_finite() || attenuation <= 0.0 {
                    return Err(GfxError::invalid(
                        "attenuation",
                        format!("{attenuation} must be positive"),
                    ));
                }
                Ok(self)
            }
            Self::Spot { direction, angle } => {
                if !angle.is_finite() || angle <= 0.0 || angle >= std::f32::consts::PI {
                    return Err(GfxError::invalid(
                        "spot angle",
                        format!("{angle} must be within (0, pi)"),
                    ));
                }
                Ok(Self::Spot {
                    direction: unit_direction(direction)?,
                    angle,
                })
            }
            Self::Directional { direction } => Ok(Self::Directional {
                direction: unit_direction(direction)?,
            }),
        }
    }
}

fn unit_direction(direction: Vec3) -> GfxResult<Vec3> {
    ensure_finite("direction", direction)?;
    direction
        .try_normalize()
        .ok_or_else(|| GfxError::invalid("direction", "must not be zero"))
}

/// A decoration that follows a light.
pub struct LensFlare {
    name: String,
    position: Vec3,
    backend: SharedBackend,
}

impl LensFlare {
    /// Flare name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current world position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.backend.set_flare_position_impl(&self.name, position);
    }
}

/// A named light source.
pub struct Light {
    name: String,
    kind: LightKind,
    position: Vec3,
    color: Color,
    intensity: f32,
    flares: Vec<LensFlare>,
    backend: SharedBackend,
}

impl Light {
    pub(crate) fn new(
        name: String,
        kind: LightKind,
        position: Vec3,
        backend: SharedBackend,
    ) -> GfxResult<Self> {
        let kind = kind.validated()?;
        ensure_finite("position", position)?;
        let position = if matches!(kind, LightKind::Directional { .. }) {
            Vec3::ZERO
        } else {
            position
        };

        let light = Self {
            name,
            kind,
            position,
            color: Color::WHITE,
            intensity: 1.0,
            flares: Vec::new(),
            backend,
        };
        light.backend.set_light_position_impl(&light.name, position);
        if let Some(direction) = light.direction() {
            light.backend.set_direction_impl(&light.name, direction);
        }
        light
            .backend
            .set_color_impl(EntityKind::Light, &light.name, light.color);
        Ok(light)
    }

    /// Light name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind and parameters.
    #[must_use]
    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    /// World position (always zero for directional lights).
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Direction for spot and directional lights.
    #[must_use]
    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Spot { direction, .. } | LightKind::Directional { direction } => {
                Some(direction)
            }
            LightKind::Point { .. } => None,
        }
    }

    /// Light color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Brightness multiplier.
    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Attached flares in attach order.
    #[must_use]
    pub fn flares(&self) -> &[LensFlare] {
        &self.flares
    }

    /// Gets an attached flare by name.
    #[must_use]
    pub fn flare(&self, name: &str) -> Option<&LensFlare> {
        self.flares.iter().find(|f| f.name == name)
    }

    /// Moves the light and every attached flare.
    ///
    /// Directional lights have no position; the call is ignored.
    pub fn set_position(&mut self, position: Vec3) -> GfxResult<()> {
        ensure_finite("position", position)?;
        if matches!(self.kind, LightKind::Directional { .. }) {
            return Ok(());
        }

        self.position = position;
        self.backend.set_light_position_impl(&self.name, position);
        for flare in &mut self.flares {
            flare.set_position(position);
        }
        tracing::trace!(
            light = %self.name,
            flares = self.flares.len(),
            "light moved"
        );
        Ok(())
    }

    /// Re-points a spot light. Other kinds fail with `Unsupported`.
    pub fn set_direction(&mut self, direction: Vec3) -> GfxResult<()> {
        let LightKind::Spot { direction: current, .. } = &mut self.kind else {
            return Err(GfxError::Unsupported {
                kind: self.kind.label(),
                operation: "set_direction",
            });
        };
        let unit = unit_direction(direction)?;
        *current = unit;
        self.backend.set_direction_impl(&self.name, unit);
        Ok(())
    }

    /// Changes the light color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.backend.set_color_impl(EntityKind::Light, &self.name, color);
    }

    /// Changes the brightness multiplier. Must be non-negative.
    pub fn set_intensity(&mut self, intensity: f32) -> GfxResult<()> {
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(GfxError::invalid(
                "intensity",
                format!("{intensity} must be non-negative"),
            ));
        }
        self.intensity = intensity;
        Ok(())
    }

    /// Attaches a flare at the light's position. The caller owns name registration.
    pub(crate) fn attach_flare(&mut self, name: String) {
        let mut flare = LensFlare {
            name,
            position: self.position,
            backend: self.backend.clone(),
        };
        flare.set_position(self.position);
        self.flares.push(flare);
    }

    /// Detaches a flare, returning it if it was attached.
    pub(crate) fn detach_flare(&mut self, name: &str) -> Option<LensFlare> {
        let index = self.flares.iter().position(|f| f.name == name)?;
        Some(self.flares.remove(index))
    }

    /// Removes every flare, for cascade deletion.
    pub(crate) fn take_flares(&mut self) -> Vec<LensFlare> {
        std::mem::take(&mut self.flares)
    }

    /// GPU-ready form.
    #[must_use]
    pub fn uniform(&self) -> LightUniform {
        let (radius, direction, spot_angle) = match self.kind {
            LightKind::Point { attenuation } => (attenuation, Vec3::ZERO, 0.0),
            LightKind::Spot { direction, angle } => (0.0, direction, angle),
            LightKind::Directional { direction } => (0.0, direction, 0.0),
        };
        LightUniform {
            position: self.position.to_array(),
            radius,
            color: [self.color.r, self.color.g, self.color.b],
            intensity: self.intensity,
            direction: direction.to_array(),
            spot_angle,
            kind: self.kind.tag(),
            _pad: [0; 3],
        }
    }
}

impl fmt::Debug for LensFlare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LensFlare")
            .field("name", &self.name)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Light")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("color", &self.color)
            .field("flares", &self.flares)
            .finish_non_exhaustive()
    }
}

/// One light packed for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// Position in world space.
    pub position: [f32; 3],
    /// Point light range (0 for other kinds).
    pub radius: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Brightness multiplier.
    pub intensity: f32,
    /// Unit direction (zero for point lights).
    pub direction: [f32; 3],
    /// Spot cone half-angle (0 for other kinds).
    pub spot_angle: f32,
    /// 0 point, 1 spot, 2 directional.
    pub kind: u32,
    /// Padding for 16-byte alignment.
    pub _pad: [u32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{NullBackend, RecordingBackend, RenderCall};
    use std::sync::Arc;

    fn point(backend: SharedBackend) -> Light {
        Light::new("lamp".into(), LightKind::Point { attenuation: 10.0 }, Vec3::ZERO, backend).unwrap()
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
        assert_eq!(std::mem::size_of::<LightUniform>() % 16, 0);
    }

    #[test]
    fn test_flares_follow_in_attach_order() {
        let backend = RecordingBackend::shared();
        let mut light = point(backend.clone());
        light.attach_flare("a".into());
        light.attach_flare("b".into());
        backend.take();

        let p = Vec3::new(1.0, 2.0, 3.0);
        light.set_position(p).unwrap();

        assert!(light.flares().iter().all(|f| f.position() == p));
        assert_eq!(
            backend.calls(),
            vec![
                RenderCall::LightPosition { light: "lamp".into(), position: p },
                RenderCall::FlarePosition { flare: "a".into(), position: p },
                RenderCall::FlarePosition { flare: "b".into(), position: p },
            ]
        );
    }

    #[test]
    fn test_directional_ignores_position() {
        let mut light = Light::new(
            "sun".into(),
            LightKind::Directional { direction: Vec3::new(0.0, -2.0, 0.0) },
            Vec3::ONE,
            Arc::new(NullBackend),
        )
        .unwrap();
        assert_eq!(light.position(), Vec3::ZERO);
        assert_eq!(light.direction(), Some(Vec3::NEG_Y));

        light.set_position(Vec3::new(5.0, 5.0, 5.0)).unwrap();
        assert_eq!(light.position(), Vec3::ZERO);
    }

    #[test]
    fn test_set_direction_only_for_spots() {
        let mut lamp = point(Arc::new(NullBackend));
        assert!(matches!(
            lamp.set_direction(Vec3::X),
            Err(GfxError::Unsupported { operation: "set_direction", .. })
        ));

        let mut spot = Light::new(
            "spot".into(),
            LightKind::Spot { direction: Vec3::Z, angle: 0.5 },
            Vec3::ZERO,
            Arc::new(NullBackend),
        )
        .unwrap();
        assert!(spot.set_direction(Vec3::ZERO).is_err());
        assert_eq!(spot.direction(), Some(Vec3::Z));
        spot.set_direction(Vec3::new(3.0, 0.0, 0.0)).unwrap();
        assert_eq!(spot.direction(), Some(Vec3::X));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let backend: SharedBackend = Arc::new(NullBackend);
        assert!(Light::new("a".into(), LightKind::Point { attenuation: 0.0 }, Vec3::ZERO, backend.clone()).is_err());
        assert!(Light::new(
            "b".into(),
            LightKind::Spot { direction: Vec3::Z, angle: 4.0 },
            Vec3::ZERO,
            backend.clone()
        )
        .is_err());
        assert!(Light::new(
            "c".into(),
            LightKind::Directional { direction: Vec3::ZERO },
            Vec3::ZERO,
            backend
        )
        .is_err());
    }

    #[test]
    fn test_uniform_packs_kind_fields() {
        let mut lamp = point(Arc::new(NullBackend));
        lamp.set_color(Color::rgb(1.0, 0.5, 0.25));
        let u = lamp.uniform();
        assert_eq!(u.kind, 0);
        assert_eq!(u.radius, 10.0);
        assert_eq!(u.color, [1.0, 0.5, 0.25]);
        assert_eq!(bytemuck::bytes_of(&u).len(), 64);
    }
}
