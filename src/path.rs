//! Path registration descriptor and path template normalization.

use crate::model::{Extensions, SecurityRequirement};
use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Matches `{name}` and `{name:pattern}` placeholders in a path template.
static PATH_PARAMETER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^}:]+)(:[^/]+)?\}").expect("path parameter regex should be valid")
});

/// Strip router-style patterns from path placeholders.
///
/// `/users/{id:[0-9]+}/posts/{slug}` becomes `/users/{id}/posts/{slug}`. Placeholders
/// without a pattern are left as they are.
pub fn normalize_path(path: &str) -> String {
    PATH_PARAMETER_REGEX
        .replace_all(path, |caps: &regex::Captures<'_>| {
            if caps.get(2).is_some() {
                format!("{{{}}}", &caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Describes one operation to register on the document.
///
/// # Example
///
/// ```
/// use swaggerize::PathItemInfo;
/// use http::Method;
///
/// let info = PathItemInfo::new("/pets/{id:[0-9]+}", Method::GET)
///     .title("Get a pet")
///     .tag("pets")
///     .security("api_key");
/// assert_eq!(info.path, "/pets/{id:[0-9]+}");
/// ```
#[derive(Debug, Clone)]
pub struct PathItemInfo {
    pub path: String,
    pub method: Method,
    /// Becomes the operation summary
    pub title: String,
    pub description: String,
    /// Single tag the operation is grouped under; empty for none
    pub tag: String,
    pub deprecated: bool,
    /// Names of security definitions required without scopes
    pub security: Vec<String>,
    /// Names of OAuth2 security definitions mapped to the scopes they require
    pub security_oauth2: BTreeMap<String, Vec<String>>,
    /// Vendor extensions copied onto the operation
    pub extensions: Extensions,
}

impl PathItemInfo {
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        PathItemInfo {
            path: path.into(),
            method,
            title: String::new(),
            description: String::new(),
            tag: String::new(),
            deprecated: false,
            security: Vec::new(),
            security_oauth2: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn security(mut self, name: impl Into<String>) -> Self {
        self.security.push(name.into());
        self
    }

    pub fn security_oauth2(mut self, name: impl Into<String>, scopes: Vec<String>) -> Self {
        self.security_oauth2.insert(name.into(), scopes);
        self
    }

    pub fn extension(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.insert(name, value);
        self
    }

    /// Security requirements of the operation, one per named scheme.
    pub fn security_requirements(&self) -> Vec<SecurityRequirement> {
        let plain = self
            .security
            .iter()
            .map(|name| BTreeMap::from([(name.clone(), Vec::new())]));
        let scoped = self
            .security_oauth2
            .iter()
            .map(|(name, scopes)| BTreeMap::from([(name.clone(), scopes.clone())]));
        plain.chain(scoped).collect()
    }
}
