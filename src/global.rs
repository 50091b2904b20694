//! Process-wide generator.
//!
//! Free functions forwarding to a lazily created [`Generator`], for applications that
//! register operations from many places without threading a generator through them.
//! Configuration takes the write lock; registration and emission share the read lock.

use crate::error::Result;
use crate::generator::Generator;
use crate::path::PathItemInfo;
use crate::reflect::{Reflect, TypeDescriptor};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;

static GENERATOR: Lazy<RwLock<Generator>> = Lazy::new(|| RwLock::new(Generator::new()));

/// Run `f` with exclusive access to the process-wide generator.
pub fn configure<R>(f: impl FnOnce(&mut Generator) -> R) -> R {
    f(&mut GENERATOR.write())
}

pub fn set_host(host: impl Into<String>) {
    GENERATOR.write().set_host(host);
}

pub fn set_base_path(base_path: &str) {
    GENERATOR.write().set_base_path(base_path);
}

pub fn set_info(
    title: impl Into<String>,
    description: impl Into<String>,
    terms_of_service: impl Into<String>,
    version: impl Into<String>,
) {
    GENERATOR
        .write()
        .set_info(title, description, terms_of_service, version);
}

pub fn set_contact(name: impl Into<String>, url: impl Into<String>, email: impl Into<String>) {
    GENERATOR.write().set_contact(name, url, email);
}

pub fn set_license(name: impl Into<String>, url: impl Into<String>) {
    GENERATOR.write().set_license(name, url);
}

pub fn add_extended_field(name: impl Into<String>, value: impl Into<Value>) {
    GENERATOR.write().add_extended_field(name, value);
}

pub fn add_type_map<Src: Reflect, Dst: Reflect>() {
    GENERATOR.write().add_type_map::<Src, Dst>();
}

/// See [`Generator::set_path_item`].
pub fn set_path_item(
    info: &PathItemInfo,
    params: Option<&TypeDescriptor>,
    body: Option<&TypeDescriptor>,
    response: Option<&TypeDescriptor>,
) -> Result<()> {
    GENERATOR.read().set_path_item(info, params, body, response)
}

/// See [`Generator::gen_document`].
pub fn gen_document() -> Result<Vec<u8>> {
    GENERATOR.read().gen_document()
}

pub fn reset_definitions() {
    GENERATOR.read().reset_definitions();
}

pub fn reset_paths() {
    GENERATOR.read().reset_paths();
}
