//! Scene documents — save and reload a scene with a custom component.
//!
//! Registers a `Tint` component, saves the scene to JSON, loads it into a
//! fresh scene, and prints what came back. Unregistered component types in
//! a document are logged and dropped rather than failing the load; run
//! with `RUST_LOG=warn` to see that in action.
//!
//! Run with: `cargo run -p askr --example round_trip`

use std::cell::Cell;

use askr::prelude::*;
use serde_json::{Value, json};

// ── Tint component ───────────────────────────────────────────────────────

#[derive(Default)]
struct Tint {
    owner: OwnerLink,
    rgb: Cell<(f32, f32, f32)>,
}

impl Component for Tint {
    fn owner_link(&self) -> &OwnerLink {
        &self.owner
    }

    fn type_name(&self) -> &'static str {
        "Tint"
    }

    fn serialize(&self) -> Value {
        let (r, g, b) = self.rgb.get();
        json!({"r": r, "g": g, "b": b})
    }

    fn deserialize(&self, data: &Value) -> Result<(), SceneError> {
        let channel = |key: &'static str| -> Result<f32, SceneError> {
            data.get(key)
                .and_then(Value::as_f64)
                .map(|v| v as f32)
                .ok_or(SceneError::MissingField(key))
        };
        self.rgb.set((channel("r")?, channel("g")?, channel("b")?));
        Ok(())
    }
}

fn main() -> Result<(), SceneError> {
    env_logger::init();

    let mut scene = Scene::new();
    scene.registry_mut().register::<Tint>();

    let stage = scene.create_node("Stage");
    let lamp = scene.create_child_node(&stage, "Lamp");
    lamp.transform()
        .unwrap()
        .set_local_position(Vec3::new(0.0, 3.0, 0.0));
    let tint = lamp.add_component(Tint::default());
    tint.rgb.set((1.0, 0.85, 0.6));

    let text = scene.to_json()?;
    println!("saved document:\n{text}\n");

    // A fresh scene needs Tint registered too, or its tag gets dropped.
    let mut restored = Scene::new();
    restored.registry_mut().register::<Tint>();
    restored.load_json(&text)?;

    restored.for_each_node(|node| {
        let pos = node
            .transform()
            .map(|t| t.world_position())
            .unwrap_or(Vec3::ZERO);
        println!(
            "restored node \"{}\" at ({}, {}, {}), {} component(s)",
            node.name(),
            pos.x,
            pos.y,
            pos.z,
            node.component_count(),
        );
    });

    let lamp = restored
        .find_node_by_name("Lamp")
        .expect("Lamp should survive the round trip");
    let (r, g, b) = lamp
        .get_component::<Tint>()
        .map(|t| t.rgb.get())
        .unwrap_or_default();
    println!("lamp tint: ({r}, {g}, {b})");
    Ok(())
}
