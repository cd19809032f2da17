use std::cell::RefCell;
use std::rc::Rc;

use impulse2d_engine::{BodyOptions, ConstraintOptions, Engine, EngineOptions, EventSource, LogLevel, Vector};

const DT: f64 = 1000.0 / 60.0;

fn rect(width: f64, height: f64) -> Vec<Vector> {
    let (w, h) = (width / 2.0, height / 2.0);
    vec![
        Vector::new(-w, -h),
        Vector::new(w, -h),
        Vector::new(w, h),
        Vector::new(-w, h),
    ]
}

fn quiet_engine(options: EngineOptions) -> Engine {
    Engine::new(EngineOptions {
        log_level: LogLevel::None,
        ..options
    })
}

fn ground_and_box(engine: &mut Engine) -> (impulse2d_engine::BodyHandle, impulse2d_engine::BodyHandle) {
    let ground = engine
        .add_body(&BodyOptions {
            position: Vector::new(400.0, 600.0),
            vertices: Some(rect(800.0, 40.0)),
            is_static: true,
            ..BodyOptions::default()
        })
        .unwrap();
    let crate_box = engine
        .add_body(&BodyOptions {
            position: Vector::new(400.0, 560.0),
            vertices: Some(rect(40.0, 40.0)),
            ..BodyOptions::default()
        })
        .unwrap();
    (ground, crate_box)
}

#[test]
fn box_comes_to_rest_on_static_ground() {
    let mut engine = quiet_engine(EngineOptions::default());
    let (ground, crate_box) = ground_and_box(&mut engine);

    for _ in 0..300 {
        engine.update(DT);
    }

    let body = engine.body(crate_box);
    assert!(body.position.y > 555.0 && body.position.y < 565.0, "y = {}", body.position.y);
    assert!((body.position.x - 400.0).abs() < 1.0, "x = {}", body.position.x);
    assert!(body.speed < 0.5, "speed = {}", body.speed);
    assert_eq!(engine.body(ground).position, Vector::new(400.0, 600.0));
    assert_eq!(engine.pairs().len(), 1);
}

#[test]
fn resting_box_falls_asleep_and_wakes_on_demand() {
    let mut engine = quiet_engine(EngineOptions {
        enable_sleeping: true,
        ..EngineOptions::default()
    });
    let (_, crate_box) = ground_and_box(&mut engine);
    let box_id = engine.body(crate_box).id;

    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let log = log.clone();
        engine.events.sleep_start.on(move |e| log.borrow_mut().push((e.name, e.data.body_id)));
    }
    {
        let log = log.clone();
        engine.events.sleep_end.on(move |e| log.borrow_mut().push((e.name, e.data.body_id)));
    }

    for _ in 0..600 {
        engine.update(DT);
        if engine.body(crate_box).is_sleeping {
            break;
        }
    }
    let body = engine.body(crate_box);
    assert!(body.is_sleeping);
    assert_eq!(body.speed, 0.0);
    assert_eq!(body.angular_speed, 0.0);
    assert_eq!(body.motion, 0.0);
    assert_eq!(*log.borrow(), vec![("sleepStart", box_id)]);

    // a sleeping body keeps its contact pair
    let resting = engine.body(crate_box).position;
    engine.update(DT);
    assert_eq!(engine.body(crate_box).position, resting);
    assert_eq!(engine.pairs().len(), 1);

    // any force wakes it on the next update
    engine.apply_force(crate_box, resting, Vector::new(0.0, -0.01));
    engine.update(DT);
    assert!(!engine.body(crate_box).is_sleeping);
    assert_eq!(*log.borrow(), vec![("sleepStart", box_id), ("sleepEnd", box_id)]);
}

fn regular_polygon(sides: usize, radius: f64) -> Vec<Vector> {
    let theta = 2.0 * std::f64::consts::PI / sides as f64;
    (0..sides)
        .map(|i| {
            let angle = theta * 0.5 + i as f64 * theta;
            Vector::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

#[test]
fn circle_settles_on_ground() {
    let mut engine = quiet_engine(EngineOptions::default());
    engine
        .add_body(&BodyOptions {
            position: Vector::new(0.0, 10.0),
            vertices: Some(rect(400.0, 20.0)),
            is_static: true,
            ..BodyOptions::default()
        })
        .unwrap();
    let ball = engine
        .add_body(&BodyOptions {
            position: Vector::new(0.0, -40.0),
            vertices: Some(regular_polygon(10, 10.0)),
            circle_radius: Some(10.0),
            ..BodyOptions::default()
        })
        .unwrap();

    for _ in 0..300 {
        engine.update(DT);
    }

    let body = engine.body(ball);
    assert!((body.position.y + 10.0).abs() < 1.0, "y = {}", body.position.y);
    assert!(body.speed < 0.05, "speed = {}", body.speed);
}

#[test]
fn zero_length_pin_keeps_body_on_the_point() {
    let mut engine = quiet_engine(EngineOptions::default());
    let body = engine
        .add_body(&BodyOptions {
            position: Vector::new(50.0, 0.0),
            ..BodyOptions::default()
        })
        .unwrap();
    let body_id = engine.body(body).id;
    engine
        .add_constraint(&ConstraintOptions {
            point_a: Some(Vector::ZERO),
            body_b: Some(body_id),
            length: Some(0.0),
            stiffness: Some(1.0),
            ..ConstraintOptions::default()
        })
        .unwrap();

    for _ in 0..600 {
        engine.update(DT);
        let distance = engine.body(body).position.magnitude();
        assert!(distance < 0.01, "distance = {distance}");
    }
}

#[test]
fn sensor_overlap_reports_start_active_and_end() {
    let mut engine = quiet_engine(EngineOptions::default());
    engine.set_gravity(0.0, 0.0, 0.001);
    engine
        .add_body(&BodyOptions {
            vertices: Some(rect(40.0, 40.0)),
            is_static: true,
            is_sensor: true,
            ..BodyOptions::default()
        })
        .unwrap();
    let visitor = engine
        .add_body(&BodyOptions {
            position: Vector::new(30.0, 0.0),
            vertices: Some(rect(40.0, 40.0)),
            ..BodyOptions::default()
        })
        .unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    for observers in [
        &mut engine.events.collision_start,
        &mut engine.events.collision_active,
        &mut engine.events.collision_end,
    ] {
        let log = log.clone();
        observers.on(move |e| {
            assert_eq!(e.source, EventSource::Engine);
            assert_eq!(e.data.pairs.len(), 1);
            log.borrow_mut().push(e.name);
        });
    }

    engine.update(DT);
    engine.update(DT);
    // sensors are never pushed apart
    assert_eq!(engine.body(visitor).position, Vector::new(30.0, 0.0));

    engine
        .world_mut()
        .bodies
        .set_position(visitor, Vector::new(500.0, 0.0), false);
    engine.update(DT);
    assert!(engine.pairs().is_empty());

    engine
        .world_mut()
        .bodies
        .set_position(visitor, Vector::new(30.0, 0.0), false);
    engine.update(DT);

    assert_eq!(
        *log.borrow(),
        vec!["collisionStart", "collisionActive", "collisionEnd", "collisionStart"]
    );
}

#[test]
fn pin_constraint_holds_a_pendulum_at_length() {
    let mut engine = quiet_engine(EngineOptions::default());
    let bob = engine
        .add_body(&BodyOptions {
            position: Vector::new(100.0, 0.0),
            vertices: Some(rect(20.0, 20.0)),
            ..BodyOptions::default()
        })
        .unwrap();
    let bob_id = engine.body(bob).id;
    let pin = engine
        .add_constraint(&ConstraintOptions {
            body_b: Some(bob_id),
            point_a: Some(Vector::ZERO),
            ..ConstraintOptions::default()
        })
        .unwrap();
    assert_eq!(engine.world().constraints[pin].length, 100.0);
    assert_eq!(engine.world().constraints[pin].stiffness, 1.0);

    let mut lowest = 0.0_f64;
    for _ in 0..240 {
        engine.update(DT);
        let position = engine.body(bob).position;
        let length = position.magnitude();
        assert!(length > 95.0 && length < 105.0, "length = {length}");
        lowest = lowest.max(position.y);
    }
    // it swung through the bottom of the arc
    assert!(lowest > 90.0, "lowest = {lowest}");
}

#[test]
fn constraint_with_unknown_body_is_rejected() {
    let mut engine = quiet_engine(EngineOptions::default());
    let result = engine.add_constraint(&ConstraintOptions {
        body_a: Some(42),
        ..ConstraintOptions::default()
    });
    assert_eq!(result.unwrap_err(), impulse2d_engine::EngineError::UnknownBody { id: 42 });
}

#[test]
fn compound_body_sums_its_parts() {
    let mut engine = quiet_engine(EngineOptions::default());
    let part = |x: f64| BodyOptions {
        position: Vector::new(x, 0.0),
        vertices: Some(rect(40.0, 40.0)),
        ..BodyOptions::default()
    };
    let handle = engine
        .add_body(&BodyOptions {
            parts: vec![part(-20.0), part(20.0)],
            ..BodyOptions::default()
        })
        .unwrap();

    let body = engine.body(handle);
    assert!(body.is_compound());
    assert_eq!(body.parts.len(), 3);
    assert!((body.mass - 3.2).abs() < 1e-9, "mass = {}", body.mass);
    assert!(body.position.magnitude() < 1e-9);

    // only the parent is a member of the world
    let root = engine.world().root();
    assert_eq!(engine.world_mut().all_bodies(root), vec![handle]);
}

#[test]
fn composite_events_fire_around_adds() {
    let mut engine = quiet_engine(EngineOptions::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    let events = &mut engine.world_mut().events;
    for observers in [&mut events.before_add, &mut events.after_add] {
        let log = log.clone();
        observers.on(move |e| log.borrow_mut().push((e.name, e.data.objects.len())));
    }

    engine.add_body(&BodyOptions::default()).unwrap();
    assert_eq!(*log.borrow(), vec![("beforeAdd", 1), ("afterAdd", 1)]);
}
