#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use swaggerize::{describe, DrainConfig, DrainMode, Generator, Reflect};

#[derive(Reflect)]
pub struct Leaf {
    pub value: f64,
}

#[derive(Reflect)]
pub struct Twig {
    pub leaves: Vec<Leaf>,
}

#[derive(Reflect)]
pub struct Branch {
    pub twigs: Vec<Twig>,
    pub parent: Option<Box<Branch>>,
}

#[derive(Reflect)]
pub struct Tree {
    pub trunk: Branch,
    pub crown: Vec<Branch>,
    pub fallen: Vec<Leaf>,
}

fn definitions(config: DrainConfig) -> (serde_json::Value, Generator) {
    let generator = Generator::new().with_drain_config(config);
    generator.parse_definition(&describe::<Tree>()).unwrap();
    let defs = serde_json::to_value(generator.document().unwrap().definitions).unwrap();
    (defs, generator)
}

#[test]
fn test_parallel_drain_reaches_fixed_point() {
    let (defs, generator) = definitions(DrainConfig::default());

    assert_eq!(generator.definitions_len(), 4);
    assert_eq!(
        defs["Branch"]["properties"]["parent"],
        json!({"$ref": "#/definitions/Branch"})
    );
    assert_eq!(
        defs["Twig"]["properties"]["leaves"]["items"],
        json!({"$ref": "#/definitions/Leaf"})
    );

    let metrics = generator.drain_metrics();
    assert_eq!(metrics.rounds(), 2);
    assert_eq!(metrics.dispatched(), 3);
    assert_eq!(metrics.dispatched(), metrics.completed());
}

#[test]
fn test_modes_produce_identical_definitions() {
    let (parallel, _) = definitions(DrainConfig::default());
    let (sequential, _) = definitions(DrainConfig::sequential());
    assert_eq!(parallel, sequential);
}

#[test]
fn test_custom_stack_size() {
    let config = DrainConfig {
        mode: DrainMode::Parallel,
        stack_size: 0x10000,
    };
    let (defs, _) = definitions(config);
    assert_eq!(defs["Leaf"]["properties"]["value"]["format"], "double");
}

mod east {
    use swaggerize::Reflect;

    #[derive(Reflect)]
    pub struct Item {
        pub alpha: i64,
    }
}

mod west {
    use swaggerize::Reflect;

    #[derive(Reflect)]
    pub struct Item {
        pub beta: String,
    }
}

#[derive(Reflect)]
pub struct EastHolder {
    pub item: east::Item,
}

#[derive(Reflect)]
pub struct WestHolder {
    pub item: west::Item,
}

#[derive(Reflect)]
pub struct Warehouse {
    pub east: EastHolder,
    pub west: WestHolder,
}

#[test]
fn test_contested_name_owner_is_stable() {
    let west_name = std::any::type_name::<west::Item>();
    for config in [DrainConfig::default(), DrainConfig::sequential()] {
        for _ in 0..100 {
            let generator = Generator::new().with_drain_config(config);
            generator.parse_definition(&describe::<Warehouse>()).unwrap();
            let defs = serde_json::to_value(generator.document().unwrap().definitions).unwrap();

            assert!(defs["Item"]["properties"].get("alpha").is_some());
            assert!(defs[west_name]["properties"].get("beta").is_some());
            assert_eq!(
                defs["WestHolder"]["properties"]["item"],
                json!({"$ref": format!("#/definitions/{west_name}")})
            );
        }
    }
}
