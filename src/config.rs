//! # Configuration Module
//!
//! File-based configuration of a [`Generator`], with environment overrides.
//!
//! ## File Formats
//!
//! The format follows the file extension:
//!
//! - `.yaml` / `.yml`: YAML
//! - `.toml`: TOML
//! - anything else: JSON
//!
//! ## Environment Variables
//!
//! Applied after the file is read, so they win over it:
//!
//! - `SWAGGERIZE_HOST`: API host (`host[:port]`)
//! - `SWAGGERIZE_BASE_PATH`: API base path
//! - `SWAGGERIZE_INDENT_JSON`: `true`/`1` to pretty-print the document
//!
//! ## Example
//!
//! ```yaml
//! host: api.example.com
//! base_path: /v1
//! info:
//!   title: Pet Store
//!   version: 1.0.0
//! service_type: rest
//! cors:
//!   enabled: true
//!   allow_headers: [X-Request-Id]
//! security_definitions:
//!   api_key:
//!     type: apiKey
//!     in: header
//!     name: X-API-Key
//! extensions:
//!   x-owner: platform
//! ```

use crate::generator::Generator;
use crate::model::{ContactObject, InfoObject, LicenseObject, SecurityDefinition, ServiceType};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// CORS settings of the served document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Headers allowed on top of the defaults
    pub allow_headers: Vec<String>,
}

/// Everything a [`Generator`] can be configured with, short of type mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub host: String,
    pub base_path: Option<String>,
    pub info: InfoObject,
    pub contact: Option<ContactObject>,
    pub license: Option<LicenseObject>,
    pub service_type: Option<ServiceType>,
    pub indent_json: bool,
    pub reflect_rust_types: bool,
    pub cors: CorsConfig,
    pub security_definitions: BTreeMap<String, SecurityDefinition>,
    /// Vendor extensions added to the document root
    pub extensions: BTreeMap<String, Value>,
}

impl GeneratorConfig {
    /// Load configuration from a file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse in the format its
    /// extension implies.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut config: GeneratorConfig = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML config {}", path.display()))?,
            "toml" => toml::from_str(&content)
                .with_context(|| format!("invalid TOML config {}", path.display()))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON config {}", path.display()))?,
        };

        config.apply_env_overrides();
        debug!(path = %path.display(), "generator config loaded");
        Ok(config)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Override fields from `SWAGGERIZE_*` environment variables that are set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SWAGGERIZE_HOST") {
            self.host = host;
        }
        if let Ok(base_path) = std::env::var("SWAGGERIZE_BASE_PATH") {
            self.base_path = Some(base_path);
        }
        if let Some(indent) = std::env::var("SWAGGERIZE_INDENT_JSON")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            self.indent_json = indent;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Generator {
    /// Generator configured from `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut generator = Generator::new();
        generator
            .set_host(config.host.clone())
            .set_info(
                config.info.title.clone(),
                config.info.description.clone(),
                config.info.terms_of_service.clone(),
                config.info.version.clone(),
            )
            .indent_json(config.indent_json)
            .reflect_rust_types(config.reflect_rust_types)
            .enable_cors(config.cors.enabled, config.cors.allow_headers.iter().cloned());

        if let Some(base_path) = &config.base_path {
            generator.set_base_path(base_path);
        }
        if let Some(contact) = &config.contact {
            generator.set_contact(
                contact.name.clone(),
                contact.url.clone(),
                contact.email.clone(),
            );
        }
        if let Some(license) = &config.license {
            generator.set_license(license.name.clone(), license.url.clone());
        }
        if let Some(service_type) = config.service_type {
            generator.set_service_type(service_type);
        }
        for (name, definition) in &config.security_definitions {
            generator.add_security_definition(name.clone(), definition.clone());
        }
        for (name, value) in &config.extensions {
            generator.add_extended_field(name.clone(), value.clone());
        }
        generator
    }
}
