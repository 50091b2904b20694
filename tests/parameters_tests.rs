#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::json;
use swaggerize::model::ParamObject;
use swaggerize::{
    describe, DrainConfig, Generator, ParamLocation, Reflect, SchemaError, SwaggerParameters,
};

fn generator() -> Generator {
    Generator::new().with_drain_config(DrainConfig::sequential())
}

#[derive(Serialize, Reflect)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sort {
    NameAsc,
    NameDesc,
}

#[derive(Reflect)]
pub struct Nested {
    pub value: i32,
}

#[derive(Reflect)]
pub struct SearchParams {
    #[swagger(path = "tenant")]
    pub tenant: String,
    /// Free-text query
    #[swagger(param = "q")]
    pub query: String,
    #[swagger(param = "sort", required = false)]
    pub sort: Option<Sort>,
    #[swagger(param = "ids", required = false)]
    pub ids: Vec<u32>,
    #[swagger(param = "X-Trace", location = "header", required = false)]
    pub trace: String,
    #[swagger(param = "since", required = false)]
    pub since: Option<NaiveDateTime>,
    #[swagger(param = "page", required = false, default = "1")]
    pub page: u32,
    pub not_a_param: String,
    #[swagger(param = "secret")]
    secret: String,
    #[swagger(flatten)]
    pub nested: Nested,
}

#[test]
fn test_parameters_from_fields() {
    let (name, params) = generator()
        .parse_parameter(&describe::<SearchParams>())
        .unwrap();
    assert_eq!(name, "SearchParams");

    assert_eq!(
        serde_json::to_value(&params).unwrap(),
        json!([
            {"name": "tenant", "in": "path", "type": "string", "required": true},
            {
                "name": "q",
                "in": "query",
                "type": "string",
                "description": "Free-text query",
                "required": true
            },
            {
                "name": "sort",
                "in": "query",
                "type": "string",
                "enum": ["NAME_ASC", "NAME_DESC"],
                "x-enum-names": ["NameAsc", "NameDesc"]
            },
            {
                "name": "ids",
                "in": "query",
                "type": "array",
                "items": {"type": "integer", "format": "int64"},
                "collectionFormat": "multi"
            },
            {"name": "X-Trace", "in": "header", "type": "string"},
            {"name": "since", "in": "query", "type": "string", "format": "date-time"},
            {
                "name": "page",
                "in": "query",
                "type": "integer",
                "format": "int64",
                "default": 1
            }
        ])
    );
}

#[derive(Reflect)]
pub struct BigIdParams {
    #[swagger(path = "id")]
    pub id: u32,
}

#[test]
fn test_u32_parameter_is_int64() {
    let (_, params) = generator()
        .parse_parameter(&describe::<BigIdParams>())
        .unwrap();
    assert_eq!(params[0].param_type, "integer");
    assert_eq!(params[0].format, "int64");
    assert_eq!(params[0].location, ParamLocation::Path);
}

#[derive(Reflect)]
pub struct CounterParams {
    #[swagger(param, default = "4294967295")]
    pub limit: u32,
    #[swagger(param, default = "2147483648")]
    pub offset: u32,
}

#[derive(Reflect)]
pub struct Counter {
    #[swagger(default = "4294967295")]
    pub max: u32,
    #[swagger(default = "2147483648")]
    pub past_int32: u32,
}

#[test]
fn test_u32_values_beyond_int32_range() {
    let (_, params) = generator()
        .parse_parameter(&describe::<CounterParams>())
        .unwrap();
    assert_eq!(params[0].format, "int64");
    assert_eq!(params[0].default, Some(json!(4294967295u64)));
    assert_eq!(params[1].default, Some(json!(2147483648u64)));

    let generator = generator();
    generator.parse_definition(&describe::<Counter>()).unwrap();
    let defs = serde_json::to_value(generator.document().unwrap().definitions).unwrap();
    assert_eq!(
        defs["Counter"]["properties"],
        json!({
            "max": {"type": "integer", "format": "int64", "default": 4294967295u64},
            "past_int32": {"type": "integer", "format": "int64", "default": 2147483648u64}
        })
    );
    assert_eq!(
        defs["Counter"]["properties"]["past_int32"]["default"].as_u64(),
        Some(2147483648)
    );
}

#[test]
fn test_non_struct_source_fails() {
    let err = generator().parse_parameter(&describe::<i64>()).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidParameterSource { .. }));
    assert!(!err.is_fatal());

    let err = generator()
        .parse_parameter(&describe::<Vec<SearchParams>>())
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidParameterSource { .. }));
}

#[test]
fn test_pointer_source_is_followed() {
    let (name, params) = generator()
        .parse_parameter(&describe::<Option<Box<BigIdParams>>>())
        .unwrap();
    assert_eq!(name, "BigIdParams");
    assert_eq!(params.len(), 1);
}

#[derive(Reflect)]
pub struct StructParam {
    #[swagger(param = "filter")]
    pub filter: Nested,
}

#[derive(Reflect)]
pub struct NestedArrayParam {
    #[swagger(param = "matrix")]
    pub matrix: Vec<Vec<i32>>,
}

#[derive(Reflect)]
pub struct StructArrayParam {
    #[swagger(param = "filters")]
    pub filters: Vec<Nested>,
}

#[derive(Reflect)]
pub struct UntypedParam {
    #[swagger(param = "anything")]
    pub anything: serde_json::Value,
}

#[test]
fn test_invalid_parameter_shapes() {
    let generator = generator();
    for desc in [
        describe::<StructParam>(),
        describe::<NestedArrayParam>(),
        describe::<StructArrayParam>(),
        describe::<UntypedParam>(),
    ] {
        let err = generator.parse_parameter(&desc).unwrap_err();
        assert!(
            matches!(err, SchemaError::InvalidParameterShape { .. }),
            "{}: {err}",
            desc.qualified_name
        );
        assert!(err.is_fatal());
    }
    // Parameter resolution never registers or queues definitions.
    assert_eq!(generator.definitions_len(), 0);
}

#[derive(Reflect)]
pub struct OverrideParams {
    #[swagger(param = "upload", schema_type = "file", location = "formData")]
    pub upload: Vec<u8>,
}

#[test]
fn test_schema_type_override() {
    let (_, params) = generator()
        .parse_parameter(&describe::<OverrideParams>())
        .unwrap();
    assert_eq!(
        serde_json::to_value(&params[0]).unwrap(),
        json!({"name": "upload", "in": "formData", "type": "file", "required": true})
    );
}

#[derive(Reflect)]
#[swagger(parameters)]
pub struct Paging;

impl SwaggerParameters for Paging {
    fn swagger_parameters() -> anyhow::Result<(String, Vec<ParamObject>)> {
        Ok((
            "Paging".to_string(),
            vec![ParamObject {
                name: "cursor".to_string(),
                param_type: "string".to_string(),
                ..Default::default()
            }],
        ))
    }
}

#[derive(Reflect)]
#[swagger(parameters)]
pub struct Unavailable;

impl SwaggerParameters for Unavailable {
    fn swagger_parameters() -> anyhow::Result<(String, Vec<ParamObject>)> {
        anyhow::bail!("parameters not configured")
    }
}

#[test]
fn test_custom_parameters_are_used_verbatim() {
    let generator = generator();
    let (name, params) = generator.parse_parameter(&describe::<Paging>()).unwrap();
    assert_eq!(name, "Paging");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "cursor");
    assert!(!params[0].required);

    let err = generator
        .parse_parameter(&describe::<Unavailable>())
        .unwrap_err();
    assert!(matches!(err, SchemaError::CustomParameters { .. }));
}

#[test]
fn test_parameter_rust_type_extensions() {
    let mut generator = generator();
    generator.reflect_rust_types(true);
    let (_, params) = generator
        .parse_parameter(&describe::<BigIdParams>())
        .unwrap();
    let value = serde_json::to_value(&params[0]).unwrap();
    assert_eq!(value["x-rust-name"], "id");
    assert_eq!(value["x-rust-type"], "u32");
}
