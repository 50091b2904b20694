#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::Method;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use swaggerize::model::{ApiKeyLocation, OAuth2Flow};
use swaggerize::{
    describe, DrainConfig, Generator, PathItemInfo, Reflect, SchemaError, SecurityDefinition,
    ServiceType,
};

fn generator() -> Generator {
    Generator::new().with_drain_config(DrainConfig::sequential())
}

fn document(generator: &Generator) -> Value {
    serde_json::from_slice(&generator.gen_document().unwrap()).unwrap()
}

#[derive(Reflect)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

#[derive(Reflect)]
pub struct ItemParams {
    #[swagger(path = "id")]
    pub id: i64,
}

#[derive(Reflect)]
pub struct NewItem {
    pub name: String,
}

#[derive(Reflect)]
pub struct Empty {
    secret: String,
}

#[test]
fn test_list_operation_document() {
    let mut generator = generator();
    generator
        .set_host("api.example.com")
        .set_base_path("v1")
        .set_info("Items", "Item store", "", "1.0.0");
    generator
        .set_path_item(
            &PathItemInfo::new("/items", Method::GET)
                .title("List items")
                .description("Every item")
                .tag("items"),
            None,
            None,
            Some(&describe::<Vec<Item>>()),
        )
        .unwrap();

    assert_eq!(
        document(&generator),
        json!({
            "swagger": "2.0",
            "info": {
                "title": "Items",
                "description": "Item store",
                "termsOfService": "",
                "contact": {"name": "", "email": ""},
                "license": {"name": ""},
                "version": "1.0.0"
            },
            "host": "api.example.com",
            "basePath": "/v1",
            "schemes": ["http", "https"],
            "paths": {
                "/items": {
                    "get": {
                        "tags": ["items"],
                        "summary": "List items",
                        "description": "Every item",
                        "responses": {
                            "200": {
                                "description": "request success",
                                "schema": {
                                    "type": "array",
                                    "items": {"$ref": "#/definitions/Item"}
                                }
                            }
                        }
                    }
                }
            },
            "definitions": {
                "Item": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "format": "int64"},
                        "name": {"type": "string"}
                    }
                }
            }
        })
    );
}

#[test]
fn test_params_body_and_null_response() {
    let generator = generator();
    generator
        .set_path_item(
            &PathItemInfo::new("/items/{id:[0-9]+}", Method::PUT),
            Some(&describe::<ItemParams>()),
            Some(&describe::<NewItem>()),
            None,
        )
        .unwrap();

    let doc = document(&generator);
    let put = &doc["paths"]["/items/{id}"]["put"];
    assert_eq!(
        put["parameters"],
        json!([
            {"name": "id", "in": "path", "type": "integer", "format": "int64", "required": true},
            {
                "name": "body",
                "in": "body",
                "required": true,
                "schema": {"$ref": "#/definitions/NewItem"}
            }
        ])
    );
    assert_eq!(put["responses"]["200"]["schema"], json!({"type": "null"}));
    assert!(doc["definitions"]["NewItem"].is_object());
}

#[test]
fn test_empty_body_is_dropped() {
    let generator = generator();
    generator
        .set_path_item(
            &PathItemInfo::new("/ping", Method::POST),
            None,
            Some(&describe::<Empty>()),
            None,
        )
        .unwrap();

    let doc = document(&generator);
    assert!(doc["paths"]["/ping"]["post"].get("parameters").is_none());
    assert!(doc["definitions"].get("Empty").is_none());
}

#[derive(Reflect)]
pub struct Labels(pub HashMap<String, String>);

#[test]
fn test_map_body_is_dropped() {
    let generator = generator();
    generator
        .set_path_item(
            &PathItemInfo::new("/labels", Method::PUT),
            None,
            Some(&describe::<Labels>()),
            None,
        )
        .unwrap();

    let doc = document(&generator);
    assert!(doc["paths"]["/labels"]["put"].get("parameters").is_none());
    assert!(doc["definitions"].get("Labels").is_none());
}

#[test]
fn test_empty_body_keeps_definition_registered_earlier() {
    let generator = generator();
    generator.parse_definition(&describe::<Empty>()).unwrap();
    generator
        .set_path_item(
            &PathItemInfo::new("/ping", Method::POST),
            None,
            Some(&describe::<Empty>()),
            None,
        )
        .unwrap();

    let doc = document(&generator);
    assert!(doc["paths"]["/ping"]["post"].get("parameters").is_none());
    assert_eq!(doc["definitions"]["Empty"], json!({"type": "object"}));
}

#[test]
fn test_duplicate_registration_is_ignored() {
    let generator = generator();
    let info = PathItemInfo::new("/items", Method::GET).title("first");
    generator
        .set_path_item(&info, None, None, Some(&describe::<Item>()))
        .unwrap();
    generator
        .set_path_item(
            &PathItemInfo::new("/items", Method::GET).title("second"),
            None,
            None,
            None,
        )
        .unwrap();

    let doc = generator.document().unwrap();
    let get = doc.paths["/items"].operation(&Method::GET).unwrap();
    assert_eq!(get.summary, "first");
}

#[test]
fn test_methods_share_path_item() {
    let generator = generator();
    for method in [Method::GET, Method::DELETE, Method::PATCH, Method::HEAD] {
        generator
            .set_path_item(&PathItemInfo::new("/items/{id}", method), None, None, None)
            .unwrap();
    }
    let doc = document(&generator);
    let item = doc["paths"]["/items/{id}"].as_object().unwrap();
    let mut methods: Vec<_> = item.keys().cloned().collect();
    methods.sort();
    assert_eq!(methods, vec!["delete", "get", "head", "patch"]);
}

#[test]
fn test_unsupported_method_is_recoverable() {
    let generator = generator();
    let err = generator
        .set_path_item(&PathItemInfo::new("/items", Method::CONNECT), None, None, None)
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedMethod { .. }));
    assert!(document(&generator)["paths"].as_object().unwrap().is_empty());
}

#[test]
fn test_json_rpc_keeps_only_post() {
    let mut generator = generator();
    generator.set_service_type(ServiceType::JsonRpc);
    generator
        .set_path_item(&PathItemInfo::new("/rpc", Method::POST), None, None, None)
        .unwrap();
    generator
        .set_path_item(&PathItemInfo::new("/rpc", Method::GET), None, None, None)
        .unwrap();
    generator
        .set_path_item(&PathItemInfo::new("/health", Method::GET), None, None, None)
        .unwrap();

    let doc = document(&generator);
    assert_eq!(doc["x-service-type"], "json-rpc");
    let paths = doc["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);
    let rpc = paths["/rpc"].as_object().unwrap();
    assert!(rpc.contains_key("post"));
    assert!(!rpc.contains_key("get"));
}

#[test]
fn test_extensions_and_security() {
    let mut generator = generator();
    generator
        .add_extended_field("x-custom", json!({"team": "platform"}))
        .add_security_definition(
            "api_key",
            SecurityDefinition::api_key("X-API-Key", ApiKeyLocation::Header),
        )
        .add_security_definition(
            "oauth",
            SecurityDefinition::oauth2(
                OAuth2Flow::Implicit,
                "https://auth.example.com/authorize",
                "",
                BTreeMap::from([("read".to_string(), "Read access".to_string())]),
            ),
        );
    generator
        .set_path_item(
            &PathItemInfo::new("/secure", Method::GET)
                .security("api_key")
                .security_oauth2("oauth", vec!["read".to_string()])
                .deprecated(true)
                .extension("x-internal", true),
            None,
            None,
            None,
        )
        .unwrap();

    let doc = document(&generator);
    assert_eq!(doc["x-custom"], json!({"team": "platform"}));
    assert_eq!(
        doc["securityDefinitions"]["api_key"],
        json!({"type": "apiKey", "in": "header", "name": "X-API-Key"})
    );
    assert_eq!(doc["securityDefinitions"]["oauth"]["flow"], "implicit");

    let get = &doc["paths"]["/secure"]["get"];
    assert_eq!(get["deprecated"], true);
    assert_eq!(get["x-internal"], true);
    assert_eq!(
        get["security"],
        json!([{"api_key": []}, {"oauth": ["read"]}])
    );
}

#[test]
fn test_contact_and_license() {
    let mut generator = generator();
    generator
        .set_contact("API Team", "https://example.com", "api@example.com")
        .set_license("MIT", "https://opensource.org/licenses/MIT")
        .set_info("Title", "", "", "2.0.0");

    let doc = document(&generator);
    assert_eq!(
        doc["info"]["contact"],
        json!({"name": "API Team", "url": "https://example.com", "email": "api@example.com"})
    );
    assert_eq!(
        doc["info"]["license"],
        json!({"name": "MIT", "url": "https://opensource.org/licenses/MIT"})
    );
}

#[test]
fn test_request_rust_type_extension() {
    let mut generator = generator();
    generator.reflect_rust_types(true);
    generator
        .set_path_item(
            &PathItemInfo::new("/items", Method::POST),
            None,
            Some(&describe::<NewItem>()),
            None,
        )
        .unwrap();

    let doc = document(&generator);
    assert_eq!(
        doc["paths"]["/items"]["post"]["x-request-rust-type"],
        std::any::type_name::<NewItem>()
    );
    assert_eq!(
        doc["definitions"]["NewItem"]["x-rust-type"],
        std::any::type_name::<NewItem>()
    );
}

#[test]
fn test_indented_output() {
    let mut generator = generator();
    generator.indent_json(true);
    let text = String::from_utf8(generator.gen_document().unwrap()).unwrap();
    assert!(text.starts_with("{\n  \"swagger\": \"2.0\""));
}

#[test]
fn test_reset_paths_keeps_definitions() {
    let generator = generator();
    generator
        .set_path_item(
            &PathItemInfo::new("/items", Method::GET),
            None,
            None,
            Some(&describe::<Item>()),
        )
        .unwrap();
    generator.reset_paths();

    let doc = document(&generator);
    assert!(doc["paths"].as_object().unwrap().is_empty());
    assert!(doc["definitions"]["Item"].is_object());
}

#[test]
fn test_concurrent_registration() {
    let generator = Generator::new();
    std::thread::scope(|scope| {
        for i in 0..8 {
            let generator = &generator;
            scope.spawn(move || {
                generator
                    .set_path_item(
                        &PathItemInfo::new(format!("/items{i}"), Method::GET),
                        Some(&describe::<ItemParams>()),
                        None,
                        Some(&describe::<Vec<Item>>()),
                    )
                    .unwrap();
            });
        }
    });

    let doc = generator.document().unwrap();
    assert_eq!(doc.paths.len(), 8);
    assert_eq!(doc.definitions.len(), 1);
}
