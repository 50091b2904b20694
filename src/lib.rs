//! # swaggerize
//!
//! **swaggerize** derives [Swagger 2.0](https://swagger.io/specification/v2/) schema definitions
//! and a complete API document from Rust type declarations.
//!
//! ## Overview
//!
//! Types describe their shape through [`Reflect`], normally with `#[derive(Reflect)]`. Operations
//! are registered on a [`Generator`] with the types of their parameters, request body and
//! response; every named struct, array or map met along the way becomes a definition, and other
//! types are described in place. The document can be emitted as JSON or served over HTTP.
//!
//! ## Architecture
//!
//! - **[`reflect`]** - Static type descriptors standing in for runtime reflection
//! - **[`model`]** - Swagger 2.0 document types
//! - **[`resolver`]** - Type to schema resolution and parameter derivation
//! - **[`registry`]** - Definition registry and the queue of types awaiting resolution
//! - **[`worker_pool`]** - Drains the queue, one `may` coroutine per pending type
//! - **[`generator`]** - Registration API and document assembly
//! - **[`serve`]** - HTTP response carrying the document
//! - **[`config`]** - File and environment configuration
//! - **[`global`]** - Process-wide generator
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use swaggerize::{describe, Generator, PathItemInfo, Reflect};
//!
//! #[derive(Reflect)]
//! pub struct GetPetParams {
//!     #[swagger(path = "id")]
//!     pub id: i64,
//! }
//!
//! #[derive(Reflect)]
//! pub struct Pet {
//!     pub id: i64,
//!     /// Name given by the owner
//!     pub name: String,
//!     pub tags: Vec<String>,
//! }
//!
//! let generator = Generator::new();
//! generator
//!     .set_path_item(
//!         &PathItemInfo::new("/pets/{id:[0-9]+}", Method::GET).title("Get a pet"),
//!         Some(&describe::<GetPetParams>()),
//!         None,
//!         Some(&describe::<Pet>()),
//!     )
//!     .unwrap();
//!
//! let doc = generator.document().unwrap();
//! assert!(doc.paths.contains_key("/pets/{id}"));
//! assert_eq!(doc.definitions["Pet"].properties["id"].format, "int64");
//! ```
//!
//! ## Runtime Considerations
//!
//! Nested named types are resolved in rounds; by default each pending type of a round runs in
//! its own `may` coroutine. Set `SWAGGERIZE_DRAIN_MODE=sequential` to resolve on the calling
//! thread instead, and `SWAGGERIZE_DRAIN_STACK_SIZE` to size coroutine stacks.

extern crate self as swaggerize;

pub mod common_types;
pub mod config;
pub mod error;
pub mod generator;
pub mod global;
pub mod logging;
pub mod model;
pub mod path;
pub mod reflect;
pub mod registry;
pub mod resolver;
pub mod serve;
pub mod worker_pool;

pub use swaggerize_macros::Reflect;

pub use common_types::CommonName;
pub use config::{CorsConfig, GeneratorConfig};
pub use error::{Result, SchemaError};
pub use generator::Generator;
pub use model::{
    Document, EnumValues, Extensions, OperationObject, ParamLocation, ParamObject, PathItem,
    ResponseObject, SchemaObject, SecurityDefinition, ServiceType,
};
pub use path::PathItemInfo;
pub use reflect::{
    describe, FieldConfig, FieldDescriptor, Kind, Reflect, SwaggerDefinition, SwaggerEnum,
    SwaggerParameters, TypeDescriptor, TypeRef,
};
pub use worker_pool::{DrainConfig, DrainMode};
