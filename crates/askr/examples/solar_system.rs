//! Scene hierarchy — solar system demo.
//!
//! Builds a Sun → Earth → Moon chain, attaches a custom `Drift` component
//! to the Sun, and steps the scene a few frames. Watch the Moon's world
//! position follow the Sun while its local values never change.
//!
//! Run with: `cargo run -p askr --example solar_system`

use std::cell::Cell;

use askr::prelude::*;
use serde_json::{Value, json};

// ── Drift component ──────────────────────────────────────────────────────

/// Moves its node a fixed velocity per second along the local axes.
#[derive(Default)]
struct Drift {
    owner: OwnerLink,
    velocity: Cell<Vec3>,
}

impl Component for Drift {
    fn owner_link(&self) -> &OwnerLink {
        &self.owner
    }

    fn type_name(&self) -> &'static str {
        "Drift"
    }

    fn update(&self, dt: f32) {
        if let Some(node) = self.owner.node() {
            if let Some(transform) = node.transform() {
                let v = self.velocity.get();
                transform.translate_local(Vec3::new(v.x * dt, v.y * dt, v.z * dt));
            }
        }
    }

    fn serialize(&self) -> Value {
        json!({"velocity": self.velocity.get()})
    }

    fn deserialize(&self, data: &Value) -> Result<(), SceneError> {
        let velocity = data
            .get("velocity")
            .ok_or(SceneError::MissingField("velocity"))?;
        self.velocity.set(Vec3::from_value(velocity)?);
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::new();

    let sun = scene.create_node("Sun");
    let earth = scene.create_child_node(&sun, "Earth");
    let moon = scene.create_child_node(&earth, "Moon");

    earth
        .transform()
        .unwrap()
        .set_local_position(Vec3::new(10.0, 0.0, 0.0));
    moon.transform()
        .unwrap()
        .set_local_position(Vec3::new(2.0, 0.0, 0.0));

    let drift = sun.add_component(Drift::default());
    drift.velocity.set(Vec3::new(1.0, 0.0, 0.0));

    for frame in 0..5 {
        scene.update(1.0);
        let pos = moon.transform().unwrap().world_position();
        println!("frame {frame}: moon at ({}, {}, {})", pos.x, pos.y, pos.z);
    }

    // the moon never moved locally; the whole chain carried it
    let local = moon.transform().unwrap().local_position();
    println!("moon local position: ({}, {}, {})", local.x, local.y, local.z);
}
