use super::{Extensions, SchemaObject};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Root of a Swagger 2.0 document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "swagger")]
    pub version: String,
    pub info: InfoObject,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(rename = "basePath")]
    pub base_path: String,
    pub schemes: Vec<String>,
    pub paths: BTreeMap<String, PathItem>,
    pub definitions: BTreeMap<String, SchemaObject>,
    #[serde(
        rename = "securityDefinitions",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub security_definitions: BTreeMap<String, SecurityDefinition>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoObject {
    pub title: String,
    pub description: String,
    #[serde(rename = "termsOfService")]
    pub terms_of_service: String,
    pub contact: ContactObject,
    pub license: LicenseObject,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactObject {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseObject {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// Operations available on a single path template, one slot per HTTP method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(rename = "$ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<OperationObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OperationObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<OperationObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationObject>,
    /// Parameters shared by every operation on the path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamObject>,
}

impl PathItem {
    fn slot(&self, method: &Method) -> Option<&Option<OperationObject>> {
        match *method {
            Method::GET => Some(&self.get),
            Method::PUT => Some(&self.put),
            Method::POST => Some(&self.post),
            Method::DELETE => Some(&self.delete),
            Method::OPTIONS => Some(&self.options),
            Method::HEAD => Some(&self.head),
            Method::PATCH => Some(&self.patch),
            _ => None,
        }
    }

    fn slot_mut(&mut self, method: &Method) -> Option<&mut Option<OperationObject>> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::PUT => Some(&mut self.put),
            Method::POST => Some(&mut self.post),
            Method::DELETE => Some(&mut self.delete),
            Method::OPTIONS => Some(&mut self.options),
            Method::HEAD => Some(&mut self.head),
            Method::PATCH => Some(&mut self.patch),
            _ => None,
        }
    }

    /// Whether a path item can hold an operation for `method` at all.
    pub fn supports(method: &Method) -> bool {
        PathItem::default().slot(method).is_some()
    }

    pub fn has_method(&self, method: &Method) -> bool {
        matches!(self.slot(method), Some(Some(_)))
    }

    pub fn operation(&self, method: &Method) -> Option<&OperationObject> {
        self.slot(method).and_then(Option::as_ref)
    }

    /// Store `operation` under `method`.
    ///
    /// Returns `false`, leaving the item untouched, when the method has no slot.
    pub fn set_operation(&mut self, method: &Method, operation: OperationObject) -> bool {
        match self.slot_mut(method) {
            Some(slot) => {
                *slot = Some(operation);
                true
            }
            None => false,
        }
    }

    /// Drop every operation except POST.
    pub fn retain_only_post(&mut self) {
        self.get = None;
        self.put = None;
        self.delete = None;
        self.options = None;
        self.head = None;
        self.patch = None;
    }

    pub fn is_empty(&self) -> bool {
        self.get.is_none()
            && self.put.is_none()
            && self.post.is_none()
            && self.delete.is_none()
            && self.options.is_none()
            && self.head.is_none()
            && self.patch.is_none()
    }
}

/// Security requirement: scheme name mapped to the scopes it needs.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationObject {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamObject>,
    pub responses: BTreeMap<String, ResponseObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamLocation {
    #[default]
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "formData")]
    FormData,
    #[serde(rename = "body")]
    Body,
}

impl ParamLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Path => "path",
            ParamLocation::FormData => "formData",
            ParamLocation::Body => "body",
        }
    }
}

impl std::str::FromStr for ParamLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(ParamLocation::Query),
            "header" => Ok(ParamLocation::Header),
            "path" => Ok(ParamLocation::Path),
            "formData" | "formdata" => Ok(ParamLocation::FormData),
            "body" => Ok(ParamLocation::Body),
            other => Err(format!("unknown parameter location `{other}`")),
        }
    }
}

/// Allowed values of an enumerated parameter, with optional display names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValues {
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
    #[serde(rename = "x-enum-names", default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

impl EnumValues {
    /// String values paired with their display names.
    pub fn from_strings<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let (values, names) = pairs
            .into_iter()
            .map(|(value, name)| (Value::from(value), name.to_string()))
            .unzip();
        EnumValues { values, names }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamObject {
    #[serde(rename = "$ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ParamItemObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaObject>,
    #[serde(
        rename = "collectionFormat",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub collection_format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(flatten)]
    pub enum_values: EnumValues,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Element description of an array parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamItemObject {
    #[serde(rename = "$ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParamItemObject>>,
    #[serde(
        rename = "collectionFormat",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub collection_format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    #[serde(rename = "$ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiKeyLocation {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OAuth2Flow {
    #[serde(rename = "implicit")]
    Implicit,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "application")]
    Application,
    #[serde(rename = "accessCode")]
    AccessCode,
}

/// A security scheme declared in `securityDefinitions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityDefinition {
    #[serde(rename = "type")]
    pub scheme_type: SecurityType,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ApiKeyLocation>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<OAuth2Flow>,
    #[serde(
        rename = "authorizationUrl",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub authorization_url: String,
    #[serde(rename = "tokenUrl", default, skip_serializing_if = "String::is_empty")]
    pub token_url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scopes: BTreeMap<String, String>,
}

impl SecurityDefinition {
    pub fn basic() -> Self {
        SecurityDefinition {
            scheme_type: SecurityType::Basic,
            location: None,
            name: String::new(),
            flow: None,
            authorization_url: String::new(),
            token_url: String::new(),
            scopes: BTreeMap::new(),
        }
    }

    pub fn api_key(name: impl Into<String>, location: ApiKeyLocation) -> Self {
        SecurityDefinition {
            scheme_type: SecurityType::ApiKey,
            location: Some(location),
            name: name.into(),
            ..SecurityDefinition::basic()
        }
    }

    pub fn oauth2(
        flow: OAuth2Flow,
        authorization_url: impl Into<String>,
        token_url: impl Into<String>,
        scopes: BTreeMap<String, String>,
    ) -> Self {
        SecurityDefinition {
            scheme_type: SecurityType::OAuth2,
            flow: Some(flow),
            authorization_url: authorization_url.into(),
            token_url: token_url.into(),
            scopes,
            ..SecurityDefinition::basic()
        }
    }
}

/// Kind of service a document describes, stored under the `x-service-type` extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[default]
    #[serde(rename = "rest")]
    Rest,
    /// Only POST operations are emitted.
    #[serde(rename = "json-rpc")]
    JsonRpc,
}

impl ServiceType {
    pub const EXTENSION_KEY: &'static str = "x-service-type";

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Rest => "rest",
            ServiceType::JsonRpc => "json-rpc",
        }
    }
}

impl From<ServiceType> for Value {
    fn from(value: ServiceType) -> Self {
        Value::String(value.as_str().to_string())
    }
}
