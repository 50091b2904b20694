//! # Generator Module
//!
//! [`Generator`] is the registration API: configure document metadata, register operations
//! with their parameter, body and response types, then emit the Swagger 2.0 document.
//!
//! ## Usage Example
//!
//! ```rust
//! use http::Method;
//! use swaggerize::{describe, Generator, PathItemInfo, Reflect};
//!
//! #[derive(Reflect)]
//! pub struct Pet {
//!     pub id: i64,
//!     pub name: String,
//! }
//!
//! let mut generator = Generator::new();
//! generator.set_info("Pet Store", "Example API", "", "1.0.0");
//! generator
//!     .set_path_item(
//!         &PathItemInfo::new("/pets", Method::GET).tag("pets"),
//!         None,
//!         None,
//!         Some(&describe::<Vec<Pet>>()),
//!     )
//!     .unwrap();
//!
//! let doc = generator.document().unwrap();
//! assert!(doc.definitions.contains_key("Pet"));
//! ```
//!
//! ## Concurrency
//!
//! Configuration methods take `&mut self`. Registration and emission take `&self` and may be
//! called from several threads at once; definitions, the resolution queue and the path table
//! each have their own lock.

use crate::error::{Result, SchemaError};
use crate::model::{
    ContactObject, Document, InfoObject, LicenseObject, OperationObject, ParamLocation,
    ParamObject, PathItem, ResponseObject, SchemaObject, SecurityDefinition, ServiceType,
};
use crate::path::{normalize_path, PathItemInfo};
use crate::reflect::{Reflect, TypeDescriptor, TypeRef};
use crate::resolver::Resolver;
use crate::worker_pool::{self, DrainConfig, DrainMetrics};
use http::Method;
use parking_lot::RwLock;
use serde_json::Value;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Allowed request headers advertised by the CORS headers unless more are added.
pub const DEFAULT_CORS_ALLOW_HEADERS: [&str; 3] = ["Content-Type", "api_key", "Authorization"];

/// Builds a Swagger 2.0 document from registered operations.
pub struct Generator {
    doc: Document,
    host: String,
    cors_enabled: bool,
    cors_allow_headers: Vec<String>,
    indent_json: bool,
    resolver: Arc<Resolver>,
    paths: RwLock<BTreeMap<String, PathItem>>,
    drain_config: DrainConfig,
    drain_metrics: DrainMetrics,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator with an empty document.
    ///
    /// The document declares Swagger `2.0`, base path `/` and the `http` and `https`
    /// schemes. The drain configuration is read from the environment
    /// (see [`DrainConfig::from_env`]).
    pub fn new() -> Self {
        let doc = Document {
            version: "2.0".to_string(),
            base_path: "/".to_string(),
            schemes: vec!["http".to_string(), "https".to_string()],
            ..Default::default()
        };

        Self {
            doc,
            host: String::new(),
            cors_enabled: false,
            cors_allow_headers: DEFAULT_CORS_ALLOW_HEADERS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            indent_json: false,
            resolver: Arc::new(Resolver::new()),
            paths: RwLock::new(BTreeMap::new()),
            drain_config: DrainConfig::from_env(),
            drain_metrics: DrainMetrics::new(),
        }
    }

    /// Replace the drain configuration.
    pub fn with_drain_config(mut self, config: DrainConfig) -> Self {
        self.drain_config = config;
        self
    }

    /// Host (`host[:port]`) of the API. Left empty, the document has no `host`.
    pub fn set_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.host = host.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Base path of the API, normalized to a single leading slash and no trailing slash.
    pub fn set_base_path(&mut self, base_path: &str) -> &mut Self {
        self.doc.base_path = format!("/{}", base_path.trim_matches('/'));
        self
    }

    /// Title, description, terms of service and version of the API.
    ///
    /// Contact and license information already set is kept.
    pub fn set_info(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        terms_of_service: impl Into<String>,
        version: impl Into<String>,
    ) -> &mut Self {
        self.doc.info = InfoObject {
            title: title.into(),
            description: description.into(),
            terms_of_service: terms_of_service.into(),
            version: version.into(),
            contact: std::mem::take(&mut self.doc.info.contact),
            license: std::mem::take(&mut self.doc.info.license),
        };
        self
    }

    pub fn set_contact(
        &mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        email: impl Into<String>,
    ) -> &mut Self {
        self.doc.info.contact = ContactObject {
            name: name.into(),
            url: url.into(),
            email: email.into(),
        };
        self
    }

    pub fn set_license(&mut self, name: impl Into<String>, url: impl Into<String>) -> &mut Self {
        self.doc.info.license = LicenseObject {
            name: name.into(),
            url: url.into(),
        };
        self
    }

    /// Add a vendor extension field to the document root.
    pub fn add_extended_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.doc.extensions.insert(name, value);
        self
    }

    pub fn add_security_definition(
        &mut self,
        name: impl Into<String>,
        definition: SecurityDefinition,
    ) -> &mut Self {
        self.doc.security_definitions.insert(name.into(), definition);
        self
    }

    /// Mark the document as describing a REST or a JSON-RPC service.
    ///
    /// JSON-RPC documents only emit POST operations.
    pub fn set_service_type(&mut self, service_type: ServiceType) -> &mut Self {
        self.add_extended_field(ServiceType::EXTENSION_KEY, service_type)
    }

    /// Describe every occurrence of `Src` as if it were `Dst`.
    pub fn add_type_map<Src: Reflect, Dst: Reflect>(&mut self) -> &mut Self {
        self.resolver
            .add_type_map(TypeId::of::<Src>(), Dst::descriptor);
        self
    }

    /// Describe every occurrence of the type `source` with `target`.
    pub fn add_type_map_descriptor(&mut self, source: TypeId, target: TypeRef) -> &mut Self {
        self.resolver.add_type_map(source, target);
        self
    }

    /// Pretty-print emitted JSON with two-space indentation.
    pub fn indent_json(&mut self, enabled: bool) -> &mut Self {
        self.indent_json = enabled;
        self
    }

    /// Emit `x-rust-type`, `x-rust-property-*` and related extensions.
    pub fn reflect_rust_types(&mut self, enabled: bool) -> &mut Self {
        self.resolver.set_reflect_types(enabled);
        self
    }

    /// Add CORS headers to HTTP responses, allowing `allow_headers` on top of the defaults.
    pub fn enable_cors<I, S>(&mut self, enabled: bool, allow_headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_enabled = enabled;
        self.cors_allow_headers
            .extend(allow_headers.into_iter().map(Into::into));
        self
    }

    pub(crate) fn cors(&self) -> Option<&[String]> {
        self.cors_enabled.then_some(self.cors_allow_headers.as_slice())
    }

    pub fn drain_metrics(&self) -> &DrainMetrics {
        &self.drain_metrics
    }

    /// Number of registered definitions.
    pub fn definitions_len(&self) -> usize {
        self.resolver.registry.len()
    }

    /// Resolve a type into a schema, registering every definition it needs.
    ///
    /// Named structs, arrays and maps come back as references to their definitions.
    ///
    /// # Errors
    ///
    /// See [`SchemaError`]; fatal errors leave the definitions in an unspecified state.
    pub fn parse_definition(&self, desc: &TypeDescriptor) -> Result<SchemaObject> {
        self.resolver.plan_names(desc);
        let schema = self.resolver.resolve(desc)?;
        self.drain()?;
        Ok(schema)
    }

    /// Operation parameters described by the fields of a struct.
    ///
    /// # Returns
    ///
    /// The struct name and its parameters.
    pub fn parse_parameter(&self, desc: &TypeDescriptor) -> Result<(String, Vec<ParamObject>)> {
        self.resolver.parameters(desc)
    }

    fn drain(&self) -> Result<()> {
        worker_pool::drain(&self.resolver, &self.drain_config, &self.drain_metrics)
    }

    /// Register an operation.
    ///
    /// Router-style patterns are stripped from the path (`{id:[0-9]+}` becomes `{id}`).
    /// Registering a (path, method) pair a second time does nothing.
    ///
    /// # Arguments
    ///
    /// * `info` - Path, method and operation metadata
    /// * `params` - Struct whose fields describe the query, path and header parameters
    /// * `body` - Request body type; an empty body type is not documented
    /// * `response` - Type of the `200` response; `None` documents a `null` response
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnsupportedMethod`] for methods a path item cannot hold
    /// - any resolution error of the given types
    pub fn set_path_item(
        &self,
        info: &PathItemInfo,
        params: Option<&TypeDescriptor>,
        body: Option<&TypeDescriptor>,
        response: Option<&TypeDescriptor>,
    ) -> Result<()> {
        let path = normalize_path(&info.path);

        if !PathItem::supports(&info.method) {
            return Err(SchemaError::UnsupportedMethod {
                method: info.method.to_string(),
                path,
            });
        }

        if self
            .paths
            .read()
            .get(&path)
            .is_some_and(|item| item.has_method(&info.method))
        {
            debug!(path = %path, method = %info.method, "operation already registered");
            return Ok(());
        }

        let mut operation = OperationObject {
            summary: info.title.clone(),
            description: info.description.clone(),
            deprecated: info.deprecated,
            security: info.security_requirements(),
            extensions: info.extensions.clone(),
            ..Default::default()
        };
        if !info.tag.is_empty() {
            operation.tags = vec![info.tag.clone()];
        }

        if let Some(params) = params {
            if self.resolver.reflect_types() {
                operation
                    .extensions
                    .insert("x-request-rust-type", params.qualified_name);
            }
            let (_, parameters) = self.resolver.parameters(params)?;
            operation.parameters = parameters;
        }

        operation.responses = self.responses(response)?;

        if let Some(body) = body {
            if self.resolver.reflect_types() {
                operation
                    .extensions
                    .insert("x-request-rust-type", body.qualified_name);
            }
            self.add_body(&mut operation, body)?;
        }

        let mut paths = self.paths.write();
        let item = paths.entry(path.clone()).or_default();
        // A concurrent registration of the same pair may have won the race.
        if !item.has_method(&info.method) {
            item.set_operation(&info.method, operation);
            debug!(path = %path, method = %info.method, "operation registered");
        }
        Ok(())
    }

    fn responses(&self, response: Option<&TypeDescriptor>) -> Result<BTreeMap<String, ResponseObject>> {
        let schema = match response {
            Some(desc) => self.parse_definition(desc)?,
            None => SchemaObject::from_type_name("null"),
        };
        Ok(BTreeMap::from([(
            "200".to_string(),
            ResponseObject {
                description: "request success".to_string(),
                schema: Some(schema),
                ..Default::default()
            },
        )]))
    }

    /// Append the `body` parameter, or forget the body definition when it describes nothing.
    fn add_body(&self, operation: &mut OperationObject, body: &TypeDescriptor) -> Result<()> {
        let known_before = self
            .resolver
            .registry
            .name_of(body.id)
            .is_some_and(|name| self.resolver.registry.exists(&name));

        let schema = self.parse_definition(body)?;

        if !self.resolver.is_schema_empty(&schema) {
            operation.parameters.push(ParamObject {
                name: "body".to_string(),
                location: ParamLocation::Body,
                required: true,
                schema: Some(schema),
                ..Default::default()
            });
        } else if let Some(name) = schema.referenced_name() {
            // Definitions registered before this call may be referenced elsewhere.
            if !known_before {
                debug!(definition = %name, "dropping empty body definition");
                self.resolver.registry.delete(name);
            }
        }
        Ok(())
    }

    /// Assemble the document.
    ///
    /// Pending definitions are resolved first. JSON-RPC documents keep only paths with a POST
    /// operation, and only that operation.
    pub fn document(&self) -> Result<Document> {
        self.document_for_host(&self.host)
    }

    pub(crate) fn document_for_host(&self, host: &str) -> Result<Document> {
        self.drain()?;

        let mut doc = self.doc.clone();
        doc.definitions = self.resolver.registry.export();
        doc.host = host.to_string();

        let json_rpc = doc.extensions.get(ServiceType::EXTENSION_KEY)
            == Some(&Value::from(ServiceType::JsonRpc));

        let paths = self.paths.read();
        doc.paths = paths
            .iter()
            .filter(|(_, item)| !json_rpc || item.has_method(&Method::POST))
            .map(|(path, item)| {
                let mut item = item.clone();
                if json_rpc {
                    item.retain_only_post();
                }
                (path.clone(), item)
            })
            .collect();

        Ok(doc)
    }

    /// The document as JSON bytes.
    pub fn gen_document(&self) -> Result<Vec<u8>> {
        let doc = self.document()?;
        self.encode(&doc)
    }

    pub(crate) fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let bytes = if self.indent_json {
            serde_json::to_vec_pretty(doc)?
        } else {
            serde_json::to_vec(doc)?
        };
        Ok(bytes)
    }

    /// Forget every definition and queued type. Registered paths are kept.
    pub fn reset_definitions(&self) {
        self.resolver.reset();
    }

    /// Forget every registered path.
    pub fn reset_paths(&self) {
        self.paths.write().clear();
    }
}
