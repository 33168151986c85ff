//! Scene-level behavior: camera latches and topology switches, light/flare
//! propagation, billboard validation, name lifetimes.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use lumen_core::{CameraConfig, EntityKind, NameRegistry, RecordingBackend, RenderCall};
use lumen_scene::{BehaviorKind, CameraEvent, CameraNode, GfxError, LightKind, Scene, Topology};

fn recording_scene() -> (Scene, std::sync::Arc<RecordingBackend>) {
    let backend = RecordingBackend::shared();
    let scene = Scene::new(CameraConfig::default(), NameRegistry::new(), backend.clone());
    (scene, backend)
}

fn assert_close(a: Vec3, b: Vec3) {
    assert!(a.abs_diff_eq(b, 1e-4), "{a:?} != {b:?}");
}

// =============================================================================
// FIXED camera
// =============================================================================

#[test]
fn test_fixed_camera_latches_position_once() {
    let (mut scene, backend) = recording_scene();
    let camera = scene.create_camera("cctv", BehaviorKind::Fixed).unwrap();

    camera.set_position(Vec3::new(1.0, 2.0, 3.0)).unwrap();
    backend.take();

    camera.set_position(Vec3::new(9.0, 9.0, 9.0)).unwrap();
    camera.move_by(Vec3::ONE).unwrap();
    camera.rotate(0.5, 0.2, 0.1).unwrap();

    assert_close(camera.position().unwrap(), Vec3::new(1.0, 2.0, 3.0));
    assert!(backend.is_empty(), "absorbed calls must not reach the renderer");
}

#[test]
fn test_fixed_camera_keeps_locked_look_at_after_position_latch() {
    let mut scene = Scene::headless();
    let camera = scene.create_camera("cctv", BehaviorKind::Fixed).unwrap();

    camera.look_at(Vec3::new(0.0, 0.0, 20.0)).unwrap();
    camera.set_position(Vec3::new(5.0, 5.0, 0.0)).unwrap();
    assert_close(camera.target_position().unwrap(), Vec3::new(0.0, 0.0, 20.0));
    assert_close(camera.position().unwrap(), Vec3::new(5.0, 5.0, 0.0));

    // Second look-at is ignored.
    camera.look_at(Vec3::new(-50.0, 0.0, 0.0)).unwrap();
    assert_close(camera.target_position().unwrap(), Vec3::new(0.0, 0.0, 20.0));
}

// =============================================================================
// Behavior switches
// =============================================================================

#[test]
fn test_switch_between_topologies_preserves_world_positions() {
    let mut scene = Scene::headless();
    let camera = scene.create_camera("main", BehaviorKind::Freefly).unwrap();
    camera.set_position(Vec3::new(1.0, 2.0, 3.0)).unwrap();
    camera.look_at(Vec3::new(1.0, 2.0, 13.0)).unwrap();
    assert_eq!(camera.rig().topology(), Topology::Origin);

    camera.change_behavior(BehaviorKind::Target).unwrap();
    assert_eq!(camera.rig().topology(), Topology::Target);
    assert_eq!(camera.rig().parent_of(CameraNode::Origin), Some(CameraNode::Target));
    assert_close(camera.position().unwrap(), Vec3::new(1.0, 2.0, 3.0));
    assert_close(camera.target_position().unwrap(), Vec3::new(1.0, 2.0, 13.0));

    camera.change_behavior(BehaviorKind::Fps).unwrap();
    assert_eq!(camera.rig().topology(), Topology::Origin);
    assert_eq!(camera.rig().parent_of(CameraNode::Target), Some(CameraNode::Origin));
    assert_close(camera.position().unwrap(), Vec3::new(1.0, 2.0, 3.0));
    assert_close(camera.target_position().unwrap(), Vec3::new(1.0, 2.0, 13.0));
}

#[test]
fn test_parent_node_drags_child() {
    let mut scene = Scene::headless();

    let target_cam = scene.create_camera("follow", BehaviorKind::Target).unwrap();
    let eye = target_cam.position().unwrap();
    target_cam.move_by(Vec3::new(4.0, 0.0, 0.0)).unwrap();
    assert_close(target_cam.position().unwrap(), eye + Vec3::new(4.0, 0.0, 0.0));

    let free = scene.create_camera("free", BehaviorKind::Freefly).unwrap();
    let target = free.target_position().unwrap();
    free.set_position(Vec3::new(0.0, 10.0, 0.0)).unwrap();
    assert_close(free.target_position().unwrap(), target + Vec3::new(0.0, 10.0, 0.0));
}

#[test]
fn test_rts_height_stays_in_band() {
    let mut scene = Scene::headless();
    let config = *scene.config();
    let camera = scene.create_camera("overview", BehaviorKind::Rts).unwrap();
    assert!((camera.position().unwrap().y - config.rts_min_height).abs() < 1e-4);

    camera.move_by(Vec3::new(0.0, 1000.0, 0.0)).unwrap();
    assert!((camera.position().unwrap().y - config.rts_max_height).abs() < 1e-4);

    camera.set_position(Vec3::new(3.0, -40.0, 3.0)).unwrap();
    assert_close(camera.position().unwrap(), Vec3::new(3.0, config.rts_min_height, 3.0));
}

#[test]
fn test_non_finite_input_rejected_before_behavior() {
    let mut scene = Scene::headless();
    let camera = scene.create_camera("main", BehaviorKind::Freefly).unwrap();
    let before = camera.position().unwrap();

    let err = camera.move_by(Vec3::new(f32::NAN, 0.0, 0.0)).unwrap_err();
    assert!(matches!(err, GfxError::InvalidValue { .. }));
    assert!(camera.rotate(f32::INFINITY, 0.0, 0.0).is_err());
    assert_eq!(camera.position().unwrap(), before);
}

#[test]
fn test_invalid_clip_distances_leave_camera_unchanged() {
    let (mut scene, backend) = recording_scene();
    let camera = scene.create_camera("main", BehaviorKind::Freefly).unwrap();
    backend.take();

    assert!(camera.set_clip_distances(0.0, 10.0).is_err());
    assert!(camera.set_clip_distances(5.0, 5.0).is_err());
    assert!(backend.is_empty());

    camera.set_clip_distances(0.5, 50.0).unwrap();
    assert_eq!(camera.rig().near_clip(), 0.5);
    assert_eq!(
        backend.calls(),
        vec![RenderCall::ClipDistances { camera: "main".into(), near: 0.5, far: 50.0 }]
    );
}

// =============================================================================
// Listeners
// =============================================================================

#[test]
fn test_listeners_see_every_node_move() {
    let mut scene = Scene::headless();
    let camera = scene.create_camera("main", BehaviorKind::Target).unwrap();

    let seen: Rc<RefCell<Vec<CameraEvent>>> = Rc::default();
    let sink = Rc::clone(&seen);
    camera.add_listener(move |event| sink.borrow_mut().push(event.clone()));

    camera.move_by(Vec3::new(0.0, 0.0, 1.0)).unwrap();
    camera.set_position(Vec3::new(0.0, 5.0, -5.0)).unwrap();

    let events = seen.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].camera, "main");
    assert_eq!(events[0].node, CameraNode::Target);
    assert_eq!(events[1].node, CameraNode::Origin);
    assert_close(events[1].position, Vec3::new(0.0, 5.0, -5.0));
}

// =============================================================================
// Lights and lens flares
// =============================================================================

#[test]
fn test_flares_follow_light_in_the_same_call() {
    let (mut scene, backend) = recording_scene();
    scene
        .create_light("lamp", LightKind::Point { attenuation: 15.0 }, Vec3::ZERO)
        .unwrap();
    scene.attach_flare("lamp", "glare").unwrap();
    scene.attach_flare("lamp", "halo").unwrap();
    backend.take();

    let p = Vec3::new(3.0, 4.0, 5.0);
    let light = scene.light_mut("lamp").unwrap();
    light.set_position(p).unwrap();

    assert!(light.flares().iter().all(|f| f.position() == p));
    assert_eq!(
        backend.calls(),
        vec![
            RenderCall::LightPosition { light: "lamp".into(), position: p },
            RenderCall::FlarePosition { flare: "glare".into(), position: p },
            RenderCall::FlarePosition { flare: "halo".into(), position: p },
        ]
    );
}

#[test]
fn test_directional_light_ignores_position() {
    let (mut scene, backend) = recording_scene();
    let light = scene
        .create_light("sun", LightKind::Directional { direction: Vec3::new(0.0, -2.0, 0.0) }, Vec3::ONE)
        .unwrap();
    assert_eq!(light.position(), Vec3::ZERO);
    assert_eq!(light.direction(), Some(Vec3::NEG_Y));
    backend.take();

    light.set_position(Vec3::new(7.0, 7.0, 7.0)).unwrap();
    assert_eq!(light.position(), Vec3::ZERO);
    assert!(backend.is_empty());

    let err = light.set_direction(Vec3::X).unwrap_err();
    assert!(matches!(err, GfxError::Unsupported { .. }));
}

#[test]
fn test_deleted_light_frees_flare_names() {
    let mut scene = Scene::headless();
    scene
        .create_light("lamp", LightKind::Spot { direction: Vec3::Z, angle: 0.4 }, Vec3::ZERO)
        .unwrap();
    scene.attach_flare("lamp", "glare").unwrap();
    assert!(matches!(
        scene.attach_flare("lamp", "glare"),
        Err(GfxError::DuplicateName { kind: EntityKind::LensFlare, .. })
    ));

    scene.delete_light("lamp").unwrap();
    assert_eq!(scene.registry().len(EntityKind::LensFlare), 0);

    scene
        .create_light("other", LightKind::Point { attenuation: 1.0 }, Vec3::ZERO)
        .unwrap();
    scene.attach_flare("other", "glare").unwrap();
}

// =============================================================================
// Billboards
// =============================================================================

#[test]
fn test_billboard_bad_size_is_rejected_atomically() {
    let (mut scene, backend) = recording_scene();
    scene
        .create_billboard("sign", 2.0, 1.0, Vec3::new(0.0, 1.0, 0.0))
        .unwrap();
    backend.take();

    let billboard = scene.billboard_mut("sign").unwrap();
    let err = billboard.set_size(0.0, 3.0).unwrap_err();
    assert_eq!(err, GfxError::InvalidSize { width: 0.0, height: 3.0 });
    assert_eq!(billboard.size(), (2.0, 1.0));
    assert_eq!(backend.count(|c| matches!(c, RenderCall::BillboardSize { .. })), 0);
}

// =============================================================================
// Registries
// =============================================================================

#[test]
fn test_scenes_sharing_a_registry_collide() {
    let registry = NameRegistry::new();
    let backend = RecordingBackend::shared();
    let mut a = Scene::new(CameraConfig::default(), registry.clone(), backend.clone());
    let mut b = Scene::new(CameraConfig::default(), registry.clone(), backend);

    a.create_camera("main", BehaviorKind::Fps).unwrap();
    assert!(b.create_camera("main", BehaviorKind::Fps).is_err());

    // Private registries do not.
    let mut c = Scene::headless();
    c.create_camera("main", BehaviorKind::Fps).unwrap();

    a.delete_camera("main").unwrap();
    b.create_camera("main", BehaviorKind::Tps).unwrap();
    assert_eq!(registry.len(EntityKind::Camera), 1);
}
