use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use scrollstage_engine::prelude::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn key_down(key: KeyCode) -> InputEvent {
    InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
}

fn key_up(key: KeyCode) -> InputEvent {
    InputEvent::KeyUp { key, modifiers: Modifiers::NONE }
}

fn solid(width: i32, height: i32, x: i32, y: i32) -> GameObject {
    GameObject::new(width, height).at(x, y).with_collision(true)
}

/// Panics if two colliding objects on the same z share area.
fn assert_no_overlap(scene: &Scene) {
    let objects = scene.objects();
    for (i, a) in objects.iter().enumerate() {
        for b in &objects[i + 1..] {
            if !a.has_collision() || !b.has_collision() || a.z() != b.z() {
                continue;
            }
            assert!(
                !a.bounds().intersects(&b.bounds()),
                "{} at {:?} overlaps {} at {:?}",
                a.id(),
                a.bounds(),
                b.id(),
                b.bounds()
            );
        }
    }
}

//=========================================================================
// Coordinate Authority
//=========================================================================

#[test]
fn closed_borders_contain_objects() {
    let mut scene = Scene::new(Size::new(800, 600));
    let id = scene.add_object(GameObject::new(50, 50).at(100, 100));

    let mut hero = scene.object_mut(id).unwrap();
    assert!(hero.set_x(740));
    assert!(!hero.set_x(751));
    assert!(!hero.set_y(-1));
    assert_eq!(hero.get().position(), Point::new(740, 100));

    let stopped: Vec<_> = scene.bus().read::<ObjectEvent>().iter().map(|e| e.kind).collect();
    assert!(stopped.contains(&ObjectEventKind::LeftStage { side: Side::Right }));
    assert!(stopped.contains(&ObjectEventKind::LeftStage { side: Side::Top }));
}

#[test]
fn open_borders_let_objects_leave() {
    let mut scene = Scene::new(Size::new(800, 600)).with_closed_borders(false);
    let id = scene.add_object(GameObject::new(50, 50).at(100, 100));

    assert!(scene.object_mut(id).unwrap().set_x(900));
    assert_eq!(scene.object(id).unwrap().x(), 900);
}

#[test]
fn approach_into_neighbour_is_rejected() {
    let mut scene = Scene::new(Size::new(800, 600));
    let a = scene.add_object(solid(50, 50, 0, 0));
    let b = scene.add_object(solid(50, 50, 60, 0));

    assert!(!scene.object_mut(a).unwrap().right(20));
    assert_eq!(scene.object(a).unwrap().x(), 0);

    let events = scene.bus().read::<ObjectEvent>();
    assert_eq!(
        events.last().map(|e| e.kind),
        Some(ObjectEventKind::Collision { side: Side::Right, other: b })
    );

    // Flush against the neighbour is fine.
    assert!(scene.object_mut(a).unwrap().right(10));
    assert_eq!(scene.object(a).unwrap().bounds().right, 60);
}

#[test]
fn layers_on_other_z_pass_through() {
    let mut scene = Scene::new(Size::new(800, 600));
    let a = scene.add_object(solid(50, 50, 0, 0));
    scene.add_object(solid(50, 50, 60, 0).with_z(1));

    assert!(scene.object_mut(a).unwrap().right(40));
    assert_eq!(scene.object(a).unwrap().x(), 40);
}

#[test]
fn wandering_objects_never_clip() {
    let mut scene = Scene::new(Size::new(800, 600));
    let ids: Vec<ObjectId> = (0..12)
        .map(|i| scene.add_object(solid(30 + (i % 3) * 10, 30, (i % 4) * 200, (i / 4) * 200)))
        .collect();
    assert_no_overlap(&scene);

    // xorshift keeps the walk deterministic.
    let mut state: u32 = 0x9E37_79B9;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    for _ in 0..3000 {
        let id = ids[next() as usize % ids.len()];
        let px = (next() % 40) as i32 + 1;
        let mut object = scene.object_mut(id).unwrap();
        match next() % 4 {
            0 => object.right(px),
            1 => object.left(px),
            2 => object.up(px),
            _ => object.down(px),
        };
        assert_no_overlap(&scene);
    }
}

//=========================================================================
// Gravity
//=========================================================================

#[test]
fn falling_object_rests_on_floor() {
    let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
    let floor = screen.scene_mut().add_object(solid(800, 20, 0, 300));
    let body = screen
        .scene_mut()
        .add_object(solid(50, 50, 100, 100).with_gravity(true));

    screen.frame(&[], ms(1000));

    let body = screen.scene().object(body).unwrap();
    assert_eq!(body.y() + body.height(), 300);
    assert_eq!(screen.scene().object(floor).unwrap().y(), 300);
}

#[test]
fn stopping_gravity_twice_is_harmless() {
    let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
    let body = screen
        .scene_mut()
        .add_object(GameObject::new(10, 10).at(0, 0).with_gravity(true));

    screen.scene_mut().stop_gravity();
    screen.scene_mut().stop_gravity();
    assert!(!screen.scene().is_gravity_running());

    screen.frame(&[], ms(100));
    assert_eq!(screen.scene().object(body).unwrap().y(), 0);
}

#[test]
fn grounded_only_when_support_is_flush() {
    let mut scene = Scene::new(Size::new(800, 600));
    let hero = scene.add_object(solid(20, 20, 100, 100));
    assert!(!scene.request_jump(hero));

    let ledge = scene.add_object(solid(100, 10, 50, 121));
    assert!(!scene.request_jump(hero), "one pixel of air");

    assert!(scene.object_mut(ledge).unwrap().up(1));
    assert!(scene.request_jump(hero));
}

//=========================================================================
// Controls Through the Screen
//=========================================================================

#[test]
fn wsad_stops_flush_against_wall() {
    let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
    let hero = screen.scene_mut().add_object(solid(50, 50, 0, 0));
    screen.scene_mut().add_object(solid(20, 50, 100, 0));

    let wsad = screen.attach_control(WsadControl::new(hero)).unwrap();
    screen.set_control_active(wsad, true).unwrap();

    screen.frame(&[key_down(KeyCode::KeyD)], ms(200));
    assert_eq!(screen.scene().object(hero).unwrap().x(), 50);

    screen.frame(&[key_up(KeyCode::KeyD)], ms(50));
    assert!(!screen.control::<WsadControl>(wsad).unwrap().is_moving(Direction::Right));
}

#[test]
fn controls_start_inactive_and_toggle_from_a_click() {
    let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
    let hero = screen.scene_mut().add_object(GameObject::new(40, 40).at(100, 100));
    let controls = screen.attach_standard_controls(hero).unwrap();
    let wsad = controls.wsad;

    screen.frame(&[key_down(KeyCode::KeyD)], ms(20));
    screen.frame(&[key_up(KeyCode::KeyD)], ms(0));
    assert_eq!(screen.scene().object(hero).unwrap().x(), 100, "inactive control ignored the key");

    let clicks = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&clicks);
    screen.listen_mouse(MouseEventKind::Click, MouseTarget::Object(hero), move |ctx, _| {
        seen.fetch_add(1, Ordering::SeqCst);
        ctx.set_control_active(wsad, true);
    });

    let click = [
        InputEvent::MouseMoved { x: 120.0, y: 120.0 },
        InputEvent::MouseButtonDown { button: MouseButton::Left, modifiers: Modifiers::NONE },
        InputEvent::MouseButtonUp { button: MouseButton::Left, modifiers: Modifiers::NONE },
    ];
    screen.frame(&click, ms(0));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
    assert_eq!(screen.is_control_active(wsad), Some(true));

    screen.frame(&[key_down(KeyCode::KeyD)], ms(20));
    assert_eq!(screen.scene().object(hero).unwrap().x(), 110);

    screen.set_control_active(wsad, false).unwrap();
    screen.frame(&[], ms(20));
    assert_eq!(screen.scene().object(hero).unwrap().x(), 110, "deactivation halts the run");
}

#[test]
fn jump_needs_ground() {
    let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
    screen.scene_mut().add_object(solid(800, 20, 0, 300));
    let grounded = screen.scene_mut().add_object(solid(20, 20, 100, 280).with_gravity(true));
    let floating = screen.scene_mut().add_object(solid(20, 20, 400, 100));

    for hero in [grounded, floating] {
        let jump = screen.attach_control(JumpYControl::new(hero)).unwrap();
        screen.set_control_active(jump, true).unwrap();
    }

    screen.frame(&[key_down(KeyCode::Space)], ms(30));

    assert!(screen.scene().object(grounded).unwrap().y() < 280);
    assert_eq!(screen.scene().object(floating).unwrap().y(), 100);

    screen.frame(&[key_up(KeyCode::Space)], ms(2000));
    let landed = screen.scene().object(grounded).unwrap();
    assert_eq!(landed.y() + landed.height(), 300);
}

#[test]
fn ad_reports_running_status() {
    let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
    let hero = screen.scene_mut().add_object(GameObject::new(20, 20).at(100, 100));
    let ad = screen.attach_control(AdControl::new(hero)).unwrap();
    screen.set_control_active(ad, true).unwrap();

    screen.frame(&[key_down(KeyCode::KeyA)], ms(10));
    let statuses: Vec<_> = screen.scene().bus().read::<ControlStatus>().iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![RunningStatus::Active]);
    assert_eq!(screen.scene().object(hero).unwrap().x(), 95);

    screen.frame(&[key_up(KeyCode::KeyA)], ms(10));
    let statuses: Vec<_> = screen.scene().bus().read::<ControlStatus>().iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![RunningStatus::Inactive]);
}

//=========================================================================
// Camera & Platforms
//=========================================================================

#[test]
fn camera_follows_past_the_centre() {
    let scene = Scene::new(Size::new(2000, 600)).with_camera(Camera::new(Size::new(800, 600)));
    let mut screen = GameScreen::new(scene);
    let hero = screen.scene_mut().add_object(GameObject::new(20, 20).at(390, 500));
    screen.scene_mut().attach_camera(Some(hero)).unwrap();
    assert_eq!(screen.scene().camera().unwrap().x(), 0);

    let wsad = screen.attach_control(WsadControl::new(hero)).unwrap();
    screen.set_control_active(wsad, true).unwrap();
    screen.frame(&[key_down(KeyCode::KeyD)], ms(100));

    assert_eq!(screen.scene().object(hero).unwrap().x(), 440);
    assert_eq!(screen.scene().camera().unwrap().x(), 50);
}

#[test]
fn platform_chunks_cull_with_the_camera() {
    let mut scene = Scene::new(Size::new(800, 600)).with_camera(Camera::new(Size::new(800, 600)));
    let platform = scene.create_platform(0);
    let chunks: Vec<ObjectId> = (0..20)
        .map(|_| scene.add_chunk(platform, GameObject::new(100, 40)).unwrap())
        .collect();

    assert_eq!(scene.stage().width, 2000);
    assert_eq!(scene.platform(platform).unwrap().width(), 2000);
    assert_eq!(scene.object(chunks[3]).unwrap().position(), Point::new(300, 560));
    assert!(scene.object(chunks[10]).unwrap().is_visible());
    assert!(!scene.object(chunks[11]).unwrap().is_visible());

    scene.update_camera(|camera| camera.set_x(1000));
    assert!(scene.object(chunks[19]).unwrap().is_visible());
    assert!(!scene.object(chunks[0]).unwrap().is_visible());
}

#[test]
fn switching_scenes_drops_listeners_and_controls() {
    let mut screen = GameScreen::new(Scene::new(Size::new(800, 600)));
    let hero = screen.scene_mut().add_object(GameObject::new(20, 20));
    screen.attach_standard_controls(hero).unwrap();
    screen.listen_keyboard(KeyboardEventKind::Down, KeyCode::Escape, |_, _| {});
    assert!(screen.listener_count() > 1);

    let old = screen.set_active_scene(Scene::new(Size::new(400, 300)));

    assert_eq!(screen.listener_count(), 0);
    assert!(!old.is_gravity_running());
    assert!(screen.scene().is_gravity_running());
    assert!(old.contains(hero));
}
