//! # Schema Resolver Module
//!
//! Turns [`TypeDescriptor`]s into [`SchemaObject`]s and [`ParamObject`](crate::model::ParamObject)s.
//!
//! ## Resolution Order
//!
//! For a top-level type the first matching rule wins:
//!
//! 1. the type supplies its own definition ([`crate::reflect::SwaggerDefinition`])
//! 2. the type is mapped to a replacement type
//! 3. the type is a pointer: resolve what it points to
//! 4. the type is anonymous: describe it inline
//! 5. the type is a named struct, array or map: expand it into a named definition and
//!    return a reference to it
//! 6. anything else is described inline
//!
//! Nested types (fields, array elements, map values) go through structural inference
//! instead. A named struct met there is not expanded in place: a reference is emitted and the
//! type is queued, which is what keeps recursive types finite. The queue is drained by
//! [`crate::worker_pool::drain`].
//!
//! ## Name Planning
//!
//! [`Resolver::plan_names`] walks a type graph with the same rules and allocates every
//! definition name before resolution starts, so a display name shared by two types goes to
//! the one met first in declaration order, however the drain schedules its workers.
//!
//! ## Inference Mode
//!
//! Parameters use the same inference with [`InferMode::Parameter`], which never registers or
//! queues anything: parameters cannot point at definitions.

mod defaults;
mod params;
mod plan;
mod schema;

pub use defaults::parse_default;

use crate::error::{Result, SchemaError};
use crate::model::SchemaObject;
use crate::reflect::{TypeDescriptor, TypeRef};
use crate::registry::{DefinitionRegistry, ResolutionQueue};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::atomic::{AtomicBool, Ordering};

/// Purpose of a structural inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferMode {
    /// Building a definition: named structs are referenced and queued.
    Definition,
    /// Building a parameter: nothing is registered or queued.
    Parameter,
}

/// Resolution state shared by the generator and the drain workers.
#[derive(Default)]
pub struct Resolver {
    pub registry: DefinitionRegistry,
    pub queue: ResolutionQueue,
    type_map: DashMap<TypeId, TypeRef>,
    reflect_types: AtomicBool,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every occurrence of `source` as `target` from now on.
    pub fn add_type_map(&self, source: TypeId, target: TypeRef) {
        self.type_map.insert(source, target);
    }

    /// Emit `x-rust-*` extension metadata.
    pub fn set_reflect_types(&self, enabled: bool) {
        self.reflect_types.store(enabled, Ordering::Relaxed);
    }

    pub fn reflect_types(&self) -> bool {
        self.reflect_types.load(Ordering::Relaxed)
    }

    /// Replacement descriptor configured for `desc`, if any.
    fn mapped(&self, desc: &TypeDescriptor) -> Option<TypeDescriptor> {
        // Copy the fn pointer out so the map shard is unlocked before describing.
        let target = self.type_map.get(&desc.id).map(|entry| *entry.value())?;
        Some(target())
    }

    /// Register the self-provided definition of `desc` and return a reference to it.
    fn register_custom(&self, desc: &TypeDescriptor) -> Result<Option<SchemaObject>> {
        let Some(provide) = desc.custom_definition else {
            return Ok(None);
        };

        let (name, mut schema) = provide().map_err(|source| SchemaError::CustomDefinition {
            type_name: desc.qualified_name.to_string(),
            source,
        })?;
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| desc.display_name().to_string());

        if !self.registry.exists(&name) {
            schema.type_name = name.clone();
            if self.reflect_types() {
                schema.rust_type = desc.qualified_name.to_string();
            }
            self.registry.register_if_absent(&name, schema);
        }

        Ok(Some(SchemaObject::reference(&name)))
    }

    /// Self-provided definition schema of `desc`, used inline.
    fn inline_custom(&self, desc: &TypeDescriptor) -> Result<Option<SchemaObject>> {
        let Some(provide) = desc.custom_definition else {
            return Ok(None);
        };
        let (_, schema) = provide().map_err(|source| SchemaError::CustomDefinition {
            type_name: desc.qualified_name.to_string(),
            source,
        })?;
        Ok(Some(schema))
    }

    /// Emptiness that follows references into the registry.
    ///
    /// A reference to a registered definition is as empty as the definition. A reference to a
    /// type that is neither registered nor queued is empty. A reference to a queued type is not.
    pub fn is_schema_empty(&self, schema: &SchemaObject) -> bool {
        if let Some(name) = schema.referenced_name() {
            if let Some(def) = self.registry.get(name) {
                if def.is_reference() {
                    return false;
                }
                return self.is_schema_empty(&def);
            }
            let queued = self
                .registry
                .type_for_name(name)
                .is_some_and(|id| self.queue.contains(id));
            return !queued;
        }
        schema.is_empty()
    }

    /// Drop all definitions, name allocations and queued types.
    pub fn reset(&self) {
        self.registry.clear();
        self.queue.clear();
    }
}
