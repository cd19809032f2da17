#![cfg(target_arch = "wasm32")]

use impulse2d_engine::Simulation;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn simulation_steps_from_json() {
    let mut sim = Simulation::from_json(r#"{"positionIterations":8}"#.to_string()).unwrap();
    let id = sim
        .add_body(r#"{"position":{"x":10,"y":20}}"#.to_string())
        .unwrap();
    sim.step(1000.0 / 60.0);

    let flat = sim.positions();
    assert_eq!(flat.len(), 4);
    assert_eq!(flat[0], id as f64);
    assert!(flat[2] > 20.0);
    assert!(sim.add_body(r#"{"density":-1}"#.to_string()).is_err());
}
