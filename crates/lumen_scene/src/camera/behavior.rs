//! Camera control behaviors.
//!
//! | Behavior | Topology | move                  | rotate              | relative |
//! |----------|----------|-----------------------|---------------------|----------|
//! | FREEFLY  | origin   | view space            | yaw, pitch, roll    | no-op    |
//! | FPS      | origin   | ground plane          | yaw, clamped pitch  | no-op    |
//! | TPS      | target   | target on ground      | orbit               | yes      |
//! | RTS      | origin   | pan + clamped height  | yaw only            | no-op    |
//! | FIXED    | origin   | no-op                 | no-op               | no-op    |
//! | TARGET   | target   | target in world space | orbit               | yes      |
//!
//! FIXED accepts one position write and one look-at, then ignores both.

use std::fmt;

use glam::Vec3;
use lumen_core::GfxResult;

use super::{CameraRig, Rotation};

/// Identifies a built-in behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    /// Free flight in view space.
    Freefly,
    /// First person, walking on the ground plane.
    Fps,
    /// Third person, following a target.
    Tps,
    /// Top-down strategy view.
    Rts,
    /// Placed once, then immovable.
    Fixed,
    /// Orbiting a tracked point.
    Target,
}

impl BehaviorKind {
    /// Every built-in behavior.
    pub const ALL: [Self; 6] = [
        Self::Freefly,
        Self::Fps,
        Self::Tps,
        Self::Rts,
        Self::Fixed,
        Self::Target,
    ];

    /// Creates a fresh behavior of this kind.
    #[must_use]
    pub fn create(self) -> Box<dyn CameraBehavior> {
        match self {
            Self::Freefly => Box::new(FreeflyBehavior),
            Self::Fps => Box::new(FpsBehavior),
            Self::Tps => Box::new(TpsBehavior),
            Self::Rts => Box::new(RtsBehavior),
            Self::Fixed => Box::<FixedBehavior>::default(),
            Self::Target => Box::new(TargetBehavior),
        }
    }

    /// Upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Freefly => "FREEFLY",
            Self::Fps => "FPS",
            Self::Tps => "TPS",
            Self::Rts => "RTS",
            Self::Fixed => "FIXED",
            Self::Target => "TARGET",
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps high-level camera commands to node mutations.
///
/// Inputs are already validated as finite. Implementations move nodes only
/// through the rig so listeners stay informed.
pub trait CameraBehavior: fmt::Debug {
    /// Which built-in this is.
    fn kind(&self) -> BehaviorKind;

    /// Runs once when the behavior becomes active. Picks the topology.
    fn initialise(&mut self, rig: &mut CameraRig) -> GfxResult<()>;

    /// Moves by a delta whose frame depends on the behavior.
    fn move_by(&mut self, rig: &mut CameraRig, delta: Vec3) -> GfxResult<()>;

    /// Points the camera at a world position.
    fn look_at(&mut self, rig: &mut CameraRig, point: Vec3) -> GfxResult<()> {
        rig.look_at(point)
    }

    /// Places the eye at a world position.
    fn set_position(&mut self, rig: &mut CameraRig, position: Vec3) -> GfxResult<()> {
        rig.set_position(position)
    }

    /// Rotates by yaw, pitch and roll deltas (radians).
    fn rotate(&mut self, rig: &mut CameraRig, yaw: f32, pitch: f32, roll: f32) -> GfxResult<()>;

    /// Places the eye relative to the target. Ignored by default.
    fn set_relative_position(&mut self, _rig: &mut CameraRig, _relative: Vec3) -> GfxResult<()> {
        Ok(())
    }
}

/// Adds deltas to the rig's rotation, clamping pitch to the configured limit.
fn turned(rig: &CameraRig, yaw: f32, pitch: f32, roll: f32) -> Rotation {
    let current = rig.rotation();
    let limit = rig.pitch_limit();
    Rotation {
        yaw: current.yaw + yaw,
        pitch: (current.pitch + pitch).clamp(-limit, limit),
        roll: current.roll + roll,
    }
}

/// Free flight: moves along the view axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeflyBehavior;

impl CameraBehavior for FreeflyBehavior {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Freefly
    }

    fn initialise(&mut self, rig: &mut CameraRig) -> GfxResult<()> {
        rig.init_origin()
    }

    /// `delta` is (right, up, forward) in view space.
    fn move_by(&mut self, rig: &mut CameraRig, delta: Vec3) -> GfxResult<()> {
        let forward = rig.rotation().forward();
        let right = Vec3::Y.cross(forward).try_normalize().unwrap_or(Vec3::X);
        let up = forward.cross(right);
        let world = right * delta.x + up * delta.y + forward * delta.z;
        let eye = rig.position()?;
        rig.set_position(eye + world)
    }

    fn rotate(&mut self, rig: &mut CameraRig, yaw: f32, pitch: f32, roll: f32) -> GfxResult<()> {
        let rotation = turned(rig, yaw, pitch, roll);
        rig.set_rotation(rotation);
        rig.aim()
    }
}

/// First person: walks on the ground plane, never rolls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsBehavior;

impl CameraBehavior for FpsBehavior {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Fps
    }

    fn initialise(&mut self, rig: &mut CameraRig) -> GfxResult<()> {
        rig.init_origin()?;
        let rotation = rig.rotation();
        if rotation.roll != 0.0 || rotation.pitch.abs() > rig.pitch_limit() {
            let upright = turned(rig, 0.0, 0.0, -rotation.roll);
            rig.set_rotation(upright);
            rig.aim()?;
        }
        Ok(())
    }

    /// `delta` is (strafe, ignored, walk) relative to the heading.
    fn move_by(&mut self, rig: &mut CameraRig, delta: Vec3) -> GfxResult<()> {
        let rotation = rig.rotation();
        let world = rotation.ground_right() * delta.x + rotation.ground_forward() * delta.z;
        let eye = rig.position()?;
        rig.set_position(eye + world)
    }

    fn look_at(&mut self, rig: &mut CameraRig, point: Vec3) -> GfxResult<()> {
        rig.look_at(point)?;
        let rotation = rig.rotation();
        if rotation.pitch.abs() > rig.pitch_limit() {
            let clamped = turned(rig, 0.0, 0.0, 0.0);
            rig.set_rotation(clamped);
            rig.aim()?;
        }
        Ok(())
    }

    fn rotate(&mut self, rig: &mut CameraRig, yaw: f32, pitch: f32, _roll: f32) -> GfxResult<()> {
        let rotation = turned(rig, yaw, pitch, 0.0);
        rig.set_rotation(rotation);
        rig.aim()
    }
}

/// Third person: follows the target from a relative placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct TpsBehavior;

impl CameraBehavior for TpsBehavior {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Tps
    }

    fn initialise(&mut self, rig: &mut CameraRig) -> GfxResult<()> {
        rig.init_target()?;
        let relative = Vec3::from(rig.config().default_relative_position);
        rig.set_relative_position(relative)
    }

    /// Moves the followed target on the ground plane; the eye follows.
    fn move_by(&mut self, rig: &mut CameraRig, delta: Vec3) -> GfxResult<()> {
        let rotation = rig.rotation();
        let world = rotation.ground_right() * delta.x + rotation.ground_forward() * delta.z;
        let target = rig.target_position()?;
        rig.set_target_position(target + world)
    }

    /// Moves the followed target to `point`, keeping the relative placement.
    fn look_at(&mut self, rig: &mut CameraRig, point: Vec3) -> GfxResult<()> {
        rig.set_target_position(point)
    }

    fn set_position(&mut self, rig: &mut CameraRig, position: Vec3) -> GfxResult<()> {
        rig.place_origin(position)
    }

    fn rotate(&mut self, rig: &mut CameraRig, yaw: f32, pitch: f32, _roll: f32) -> GfxResult<()> {
        let rotation = turned(rig, yaw, pitch, 0.0);
        rig.set_rotation(rotation);
        rig.orbit()
    }

    fn set_relative_position(&mut self, rig: &mut CameraRig, relative: Vec3) -> GfxResult<()> {
        rig.set_relative_position(relative)
    }
}

/// Strategy view: pans over the ground at a bounded height.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtsBehavior;

impl RtsBehavior {
    fn clamp_height(rig: &CameraRig, mut position: Vec3) -> Vec3 {
        let config = rig.config();
        position.y = position.y.clamp(config.rts_min_height, config.rts_max_height);
        position
    }
}

impl CameraBehavior for RtsBehavior {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Rts
    }

    fn initialise(&mut self, rig: &mut CameraRig) -> GfxResult<()> {
        rig.init_origin()?;
        let eye = rig.position()?;
        let clamped = Self::clamp_height(rig, eye);
        if clamped != eye {
            rig.set_position(clamped)?;
        }
        Ok(())
    }

    /// `delta` is (pan right, height change, pan forward).
    fn move_by(&mut self, rig: &mut CameraRig, delta: Vec3) -> GfxResult<()> {
        let rotation = rig.rotation();
        let pan = rotation.ground_right() * delta.x + rotation.ground_forward() * delta.z;
        let eye = rig.position()?;
        let next = Self::clamp_height(rig, eye + pan + Vec3::Y * delta.y);
        rig.set_position(next)
    }

    fn set_position(&mut self, rig: &mut CameraRig, position: Vec3) -> GfxResult<()> {
        let clamped = Self::clamp_height(rig, position);
        rig.set_position(clamped)
    }

    /// Only yaw applies; the view swings around the vertical axis.
    fn rotate(&mut self, rig: &mut CameraRig, yaw: f32, _pitch: f32, _roll: f32) -> GfxResult<()> {
        let mut rotation = rig.rotation();
        rotation.yaw += yaw;
        rig.set_rotation(rotation);
        rig.aim()
    }
}

/// Placed once, then immovable.
///
/// The first position write and the first look-at each latch. Later calls
/// are ignored without error. A position latched after the look-at keeps
/// the camera aimed at the locked point.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBehavior {
    position_locked: bool,
    target_locked: bool,
    locked_target: Option<Vec3>,
}

impl FixedBehavior {
    /// Whether the position latch has closed.
    #[must_use]
    pub fn is_position_locked(&self) -> bool {
        self.position_locked
    }

    /// Whether the look-at latch has closed.
    #[must_use]
    pub fn is_target_locked(&self) -> bool {
        self.target_locked
    }
}

impl CameraBehavior for FixedBehavior {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Fixed
    }

    fn initialise(&mut self, rig: &mut CameraRig) -> GfxResult<()> {
        rig.init_origin()
    }

    fn move_by(&mut self, _rig: &mut CameraRig, _delta: Vec3) -> GfxResult<()> {
        Ok(())
    }

    fn look_at(&mut self, rig: &mut CameraRig, point: Vec3) -> GfxResult<()> {
        if self.target_locked {
            return Ok(());
        }
        rig.look_at(point)?;
        self.target_locked = true;
        self.locked_target = Some(point);
        Ok(())
    }

    fn set_position(&mut self, rig: &mut CameraRig, position: Vec3) -> GfxResult<()> {
        if self.position_locked {
            return Ok(());
        }
        rig.set_position(position)?;
        self.position_locked = true;
        if let Some(point) = self.locked_target {
            rig.look_at(point)?;
        }
        Ok(())
    }

    fn rotate(&mut self, _rig: &mut CameraRig, _yaw: f32, _pitch: f32, _roll: f32) -> GfxResult<()> {
        Ok(())
    }
}

/// Orbits a tracked point.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetBehavior;

impl CameraBehavior for TargetBehavior {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Target
    }

    fn initialise(&mut self, rig: &mut CameraRig) -> GfxResult<()> {
        rig.init_target()
    }

    /// Moves the tracked point in world space; the eye follows.
    fn move_by(&mut self, rig: &mut CameraRig, delta: Vec3) -> GfxResult<()> {
        let target = rig.target_position()?;
        rig.set_target_position(target + delta)
    }

    fn set_position(&mut self, rig: &mut CameraRig, position: Vec3) -> GfxResult<()> {
        rig.place_origin(position)
    }

    fn rotate(&mut self, rig: &mut CameraRig, yaw: f32, pitch: f32, roll: f32) -> GfxResult<()> {
        let rotation = turned(rig, yaw, pitch, roll);
        rig.set_rotation(rotation);
        rig.orbit()
    }

    fn set_relative_position(&mut self, rig: &mut CameraRig, relative: Vec3) -> GfxResult<()> {
        rig.set_relative_position(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, Topology};
    use lumen_core::{CameraConfig, NullBackend};
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;

    const EPS: f32 = 1e-4;

    fn camera(kind: BehaviorKind) -> Camera {
        Camera::new("cam", CameraConfig::default(), Arc::new(NullBackend), kind).unwrap()
    }

    #[test]
    fn test_every_kind_creates_itself() {
        for kind in BehaviorKind::ALL {
            assert_eq!(kind.create().kind(), kind);
            assert_eq!(camera(kind).behavior_kind(), kind);
        }
    }

    #[test]
    fn test_topology_per_behavior() {
        for (kind, topology) in [
            (BehaviorKind::Freefly, Topology::Origin),
            (BehaviorKind::Fps, Topology::Origin),
            (BehaviorKind::Tps, Topology::Target),
            (BehaviorKind::Rts, Topology::Origin),
            (BehaviorKind::Fixed, Topology::Origin),
            (BehaviorKind::Target, Topology::Target),
        ] {
            assert_eq!(camera(kind).rig().topology(), topology, "{kind}");
        }
    }

    #[test]
    fn test_freefly_moves_in_view_space() {
        let mut cam = camera(BehaviorKind::Freefly);
        cam.rotate(FRAC_PI_2, 0.0, 0.0).unwrap();
        // Facing +X now: forward 2 is +X, right 1 is -Z.
        cam.move_by(Vec3::new(1.0, 0.0, 2.0)).unwrap();
        assert!(cam.position().unwrap().abs_diff_eq(Vec3::new(2.0, 0.0, -1.0), EPS));
        // Target travels with the eye.
        let ahead = cam.target_position().unwrap() - cam.position().unwrap();
        assert!(ahead.normalize().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn test_freefly_pitch_clamped_roll_kept() {
        let mut cam = camera(BehaviorKind::Freefly);
        cam.rotate(0.0, 10.0, 0.25).unwrap();
        let limit = CameraConfig::default().pitch_limit_degrees.to_radians();
        assert!((cam.rotation().pitch - limit).abs() < EPS);
        assert!((cam.rotation().roll - 0.25).abs() < EPS);
    }

    #[test]
    fn test_fps_ignores_vertical_and_roll() {
        let mut cam = camera(BehaviorKind::Fps);
        cam.rotate(0.0, 0.5, 1.0).unwrap();
        cam.move_by(Vec3::new(0.0, 5.0, 3.0)).unwrap();

        let eye = cam.position().unwrap();
        assert!(eye.y.abs() < EPS);
        assert!((eye.z - 3.0).abs() < EPS);
        assert_eq!(cam.rotation().roll, 0.0);
    }

    #[test]
    fn test_tps_follows_target() {
        let mut cam = camera(BehaviorKind::Tps);
        let relative = Vec3::from(CameraConfig::default().default_relative_position);
        let target = cam.target_position().unwrap();
        assert!((cam.position().unwrap() - target).abs_diff_eq(relative, EPS));

        cam.look_at(Vec3::new(10.0, 0.0, 10.0)).unwrap();
        let eye = cam.position().unwrap();
        assert!((eye - Vec3::new(10.0, 0.0, 10.0)).abs_diff_eq(relative, EPS));
    }

    #[test]
    fn test_tps_orbit_keeps_distance() {
        let mut cam = camera(BehaviorKind::Tps);
        let before = cam.rig().distance().unwrap();
        cam.rotate(1.0, 0.2, 0.0).unwrap();
        let after = cam.rig().distance().unwrap();
        assert!((before - after).abs() < EPS);
    }

    #[test]
    fn test_rts_height_clamped() {
        let config = CameraConfig::default();
        let mut cam = camera(BehaviorKind::Rts);
        assert!((cam.position().unwrap().y - config.rts_min_height).abs() < EPS);

        cam.move_by(Vec3::new(0.0, 10_000.0, 0.0)).unwrap();
        assert!((cam.position().unwrap().y - config.rts_max_height).abs() < EPS);

        cam.set_position(Vec3::new(4.0, -50.0, 4.0)).unwrap();
        assert!(cam.position().unwrap().abs_diff_eq(Vec3::new(4.0, config.rts_min_height, 4.0), EPS));
    }

    #[test]
    fn test_rts_rotate_is_yaw_only() {
        let mut cam = camera(BehaviorKind::Rts);
        cam.rotate(0.5, 1.0, 1.0).unwrap();
        assert!((cam.rotation().yaw - 0.5).abs() < EPS);
        assert_eq!(cam.rotation().pitch, 0.0);
        assert_eq!(cam.rotation().roll, 0.0);
    }

    #[test]
    fn test_fixed_latches_position_and_look_at_independently() {
        let mut cam = camera(BehaviorKind::Fixed);
        let p1 = Vec3::new(1.0, 2.0, 3.0);
        let p2 = Vec3::new(9.0, 9.0, 9.0);
        cam.set_position(p1).unwrap();
        cam.set_position(p2).unwrap();
        assert_eq!(cam.position().unwrap(), p1);

        let t1 = Vec3::new(1.0, 2.0, 10.0);
        cam.look_at(t1).unwrap();
        cam.look_at(Vec3::new(-5.0, 0.0, 0.0)).unwrap();
        assert_eq!(cam.target_position().unwrap(), t1);

        cam.move_by(Vec3::ONE).unwrap();
        cam.rotate(1.0, 1.0, 1.0).unwrap();
        cam.set_relative_position(Vec3::ONE).unwrap();
        assert_eq!(cam.position().unwrap(), p1);
        assert_eq!(cam.target_position().unwrap(), t1);
    }

    #[test]
    fn test_fixed_look_at_survives_later_position_latch() {
        let mut cam = camera(BehaviorKind::Fixed);
        let t = Vec3::new(0.0, 0.0, 20.0);
        cam.look_at(t).unwrap();
        cam.set_position(Vec3::new(5.0, 0.0, 0.0)).unwrap();
        assert_eq!(cam.target_position().unwrap(), t);
    }

    #[test]
    fn test_fixed_latches_reset_on_reactivation() {
        let mut cam = camera(BehaviorKind::Fixed);
        cam.set_position(Vec3::X).unwrap();
        cam.change_behavior(BehaviorKind::Fixed).unwrap();
        cam.set_position(Vec3::Y).unwrap();
        assert_eq!(cam.position().unwrap(), Vec3::Y);
    }

    #[test]
    fn test_target_look_at_keeps_eye() {
        let mut cam = camera(BehaviorKind::Target);
        cam.set_position(Vec3::new(0.0, 0.0, -5.0)).unwrap();
        cam.look_at(Vec3::new(3.0, 0.0, 0.0)).unwrap();
        assert!(cam.position().unwrap().abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), EPS));

        cam.move_by(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(cam.target_position().unwrap().abs_diff_eq(Vec3::new(3.0, 1.0, 0.0), EPS));
        assert!(cam.position().unwrap().abs_diff_eq(Vec3::new(0.0, 1.0, -5.0), EPS));
    }

    #[test]
    fn test_relative_position_ignored_outside_orbit_behaviors() {
        for kind in [BehaviorKind::Freefly, BehaviorKind::Fps, BehaviorKind::Rts] {
            let mut cam = camera(kind);
            let eye = cam.position().unwrap();
            cam.set_relative_position(Vec3::new(0.0, 10.0, 0.0)).unwrap();
            assert_eq!(cam.position().unwrap(), eye, "{kind}");
        }
    }
}
