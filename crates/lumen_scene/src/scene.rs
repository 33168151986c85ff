//! The scene-decoration context.
//!
//! A [`Scene`] owns every camera, light and billboard created through it,
//! registers their names in its [`NameRegistry`] and releases them on
//! deletion. Objects are kept in creation order.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use lumen_core::{
    CameraConfig, EntityKind, GfxError, GfxResult, NameRegistry, NullBackend, SharedBackend,
};

use crate::billboard::Billboard;
use crate::camera::{BehaviorKind, Camera};
use crate::light::{Light, LightKind, LightUniform, MAX_LIGHTS};

/// Cameras, lights and billboards sharing one registry and one backend.
pub struct Scene {
    config: CameraConfig,
    registry: NameRegistry,
    backend: SharedBackend,
    cameras: Vec<Camera>,
    lights: Vec<Light>,
    billboards: Vec<Billboard>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(config: CameraConfig, registry: NameRegistry, backend: SharedBackend) -> Self {
        tracing::debug!(
            near = config.near_clip,
            far = config.far_clip,
            "scene created"
        );
        Self {
            config,
            registry,
            backend,
            cameras: Vec::new(),
            lights: Vec::new(),
            billboards: Vec::new(),
        }
    }

    /// Creates a scene with default camera settings, a private registry and no renderer.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(CameraConfig::default(), NameRegistry::new(), Arc::new(NullBackend))
    }

    /// Settings new cameras start from.
    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// The registry names are reserved in.
    #[must_use]
    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    // ---------------------------------------------------------------------
    // Cameras
    // ---------------------------------------------------------------------

    /// Creates a camera driven by `behavior`.
    pub fn create_camera(&mut self, name: &str, behavior: BehaviorKind) -> GfxResult<&mut Camera> {
        self.registry.register(EntityKind::Camera, name)?;
        let camera = match Camera::new(name, self.config, self.backend.clone(), behavior) {
            Ok(camera) => camera,
            Err(err) => {
                self.registry.unregister(EntityKind::Camera, name);
                return Err(err);
            }
        };
        tracing::debug!(camera = name, behavior = behavior.as_str(), "camera created");
        self.cameras.push(camera);
        let index = self.cameras.len() - 1;
        Ok(&mut self.cameras[index])
    }

    /// Looks a camera up by name.
    #[must_use]
    pub fn camera(&self, name: &str) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.name() == name)
    }

    /// Mutable camera lookup.
    pub fn camera_mut(&mut self, name: &str) -> Option<&mut Camera> {
        self.cameras.iter_mut().find(|c| c.name() == name)
    }

    /// All cameras in creation order.
    pub fn cameras(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.iter()
    }

    /// Deletes a camera and frees its name.
    pub fn delete_camera(&mut self, name: &str) -> GfxResult<()> {
        let index = self
            .cameras
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| GfxError::UnknownElement(name.to_owned()))?;
        let camera = self.cameras.remove(index);
        camera.backend().remove_impl(EntityKind::Camera, name);
        self.registry.unregister(EntityKind::Camera, name);
        tracing::debug!(camera = name, "camera deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Lights and lens flares
    // ---------------------------------------------------------------------

    /// Creates a light. Directional lights ignore `position`.
    pub fn create_light(
        &mut self,
        name: &str,
        kind: LightKind,
        position: Vec3,
    ) -> GfxResult<&mut Light> {
        // Validate before the name is taken.
        let kind = kind.validated()?;
        lumen_core::ensure_finite("position", position)?;
        self.registry.register(EntityKind::Light, name)?;
        let light = match Light::new(name.to_owned(), kind, position, self.backend.clone()) {
            Ok(light) => light,
            Err(err) => {
                self.registry.unregister(EntityKind::Light, name);
                return Err(err);
            }
        };
        tracing::debug!(light = name, kind = light.kind().label(), "light created");
        self.lights.push(light);
        let index = self.lights.len() - 1;
        Ok(&mut self.lights[index])
    }

    /// Looks a light up by name.
    #[must_use]
    pub fn light(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.name() == name)
    }

    /// Mutable light lookup.
    pub fn light_mut(&mut self, name: &str) -> Option<&mut Light> {
        self.lights.iter_mut().find(|l| l.name() == name)
    }

    /// All lights in creation order.
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    /// Deletes a light together with its lens flares, freeing all their names.
    ///
    /// Returns the number of flares removed with it.
    pub fn delete_light(&mut self, name: &str) -> GfxResult<usize> {
        let index = self
            .lights
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| GfxError::UnknownElement(name.to_owned()))?;
        let mut light = self.lights.remove(index);

        let flares = light.take_flares();
        for flare in &flares {
            self.backend.remove_impl(EntityKind::LensFlare, flare.name());
            self.registry.unregister(EntityKind::LensFlare, flare.name());
        }
        self.backend.remove_impl(EntityKind::Light, name);
        self.registry.unregister(EntityKind::Light, name);
        tracing::debug!(light = name, flares = flares.len(), "light deleted");
        Ok(flares.len())
    }

    /// Attaches a new lens flare to `light`. The flare starts at the light's position.
    pub fn attach_flare(&mut self, light: &str, flare: &str) -> GfxResult<()> {
        let index = self
            .lights
            .iter()
            .position(|l| l.name() == light)
            .ok_or_else(|| GfxError::UnknownElement(light.to_owned()))?;
        self.registry.register(EntityKind::LensFlare, flare)?;
        self.lights[index].attach_flare(flare.to_owned());
        tracing::trace!(light, flare, "lens flare attached");
        Ok(())
    }

    /// Detaches and deletes a lens flare.
    pub fn detach_flare(&mut self, light: &str, flare: &str) -> GfxResult<()> {
        let removed = self
            .light_mut(light)
            .ok_or_else(|| GfxError::UnknownElement(light.to_owned()))?
            .detach_flare(flare)
            .ok_or_else(|| GfxError::UnknownElement(flare.to_owned()))?;
        self.backend.remove_impl(EntityKind::LensFlare, removed.name());
        self.registry.unregister(EntityKind::LensFlare, removed.name());
        Ok(())
    }

    /// GPU-ready light records, in creation order.
    ///
    /// Lights beyond [`MAX_LIGHTS`] are dropped.
    #[must_use]
    pub fn light_uniforms(&self) -> Vec<LightUniform> {
        if self.lights.len() > MAX_LIGHTS {
            tracing::warn!(
                lights = self.lights.len(),
                max = MAX_LIGHTS,
                "light buffer full, extra lights dropped"
            );
        }
        self.lights
            .iter()
            .take(MAX_LIGHTS)
            .map(Light::uniform)
            .collect()
    }

    /// [`Scene::light_uniforms`] as raw bytes for upload.
    #[must_use]
    pub fn light_buffer_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.light_uniforms()).to_vec()
    }

    // ---------------------------------------------------------------------
    // Billboards
    // ---------------------------------------------------------------------

    /// Creates a billboard. Width and height must be positive.
    pub fn create_billboard(
        &mut self,
        name: &str,
        width: f32,
        height: f32,
        position: Vec3,
    ) -> GfxResult<&mut Billboard> {
        self.registry.register(EntityKind::Billboard, name)?;
        let billboard =
            match Billboard::new(name.to_owned(), position, width, height, self.backend.clone()) {
                Ok(billboard) => billboard,
                Err(err) => {
                    self.registry.unregister(EntityKind::Billboard, name);
                    return Err(err);
                }
            };
        self.billboards.push(billboard);
        let index = self.billboards.len() - 1;
        Ok(&mut self.billboards[index])
    }

    /// Looks a billboard up by name.
    #[must_use]
    pub fn billboard(&self, name: &str) -> Option<&Billboard> {
        self.billboards.iter().find(|b| b.name() == name)
    }

    /// Mutable billboard lookup.
    pub fn billboard_mut(&mut self, name: &str) -> Option<&mut Billboard> {
        self.billboards.iter_mut().find(|b| b.name() == name)
    }

    /// Deletes a billboard and frees its name.
    pub fn delete_billboard(&mut self, name: &str) -> GfxResult<()> {
        let index = self
            .billboards
            .iter()
            .position(|b| b.name() == name)
            .ok_or_else(|| GfxError::UnknownElement(name.to_owned()))?;
        self.billboards.remove(index);
        self.backend.remove_impl(EntityKind::Billboard, name);
        self.registry.unregister(EntityKind::Billboard, name);
        Ok(())
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("config", &self.config)
            .field("cameras", &self.cameras)
            .field("lights", &self.lights)
            .field("billboards", &self.billboards)
            .finish_non_exhaustive()
    }
}
