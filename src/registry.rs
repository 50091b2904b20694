//! # Definition Registry Module
//!
//! Shared storage for named schema definitions and for types whose expansion has been
//! deferred.
//!
//! ## Overview
//!
//! - [`DefinitionRegistry`] maps definition names to fully expanded schemas and allocates the
//!   definition name of every named type the first time it is referenced.
//! - [`ResolutionQueue`] holds the descriptors of types that were referenced (and therefore
//!   already have a name) but have not been expanded yet. The drain in
//!   [`crate::worker_pool`] empties it.
//!
//! ## Name Allocation
//!
//! Names are allocated per type identity, not per display name. The first type to claim a
//! display name (`Pet`) keeps it; a distinct type with the same display name is allocated its
//! fully-qualified Rust path instead (`my_api::v2::Pet`). Allocation happens before any
//! reference is emitted, so references and definition keys always agree. The generator
//! allocates the names of a whole type graph up front (see [`crate::resolver::Resolver::plan_names`]),
//! so which type wins a contested name does not depend on drain scheduling.
//!
//! ## Thread Safety
//!
//! Each structure sits behind its own `parking_lot::Mutex`. No method of one calls into the
//! other, so the two locks are never held at the same time.

use crate::model::SchemaObject;
use crate::reflect::TypeDescriptor;
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Default)]
struct Definitions {
    schemas: BTreeMap<String, SchemaObject>,
    names: HashMap<TypeId, String>,
    owners: HashMap<String, TypeId>,
}

/// Name-keyed store of expanded definitions.
#[derive(Default)]
pub struct DefinitionRegistry {
    inner: Mutex<Definitions>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition name of the type `id`, allocating one if the type has none yet.
    ///
    /// # Arguments
    ///
    /// * `id` - Identity of the type
    /// * `display_name` - Preferred, short name of the type
    /// * `qualified_name` - Fully-qualified name, used when `display_name` belongs to another type
    ///
    /// # Returns
    ///
    /// The name under which the type is (or will be) registered.
    pub fn allocate_name(&self, id: TypeId, display_name: &str, qualified_name: &str) -> String {
        let mut defs = self.inner.lock();
        if let Some(name) = defs.names.get(&id) {
            return name.clone();
        }

        let name = match defs.owners.get(display_name) {
            Some(owner) if *owner != id => {
                debug!(
                    display_name,
                    qualified_name,
                    "definition name taken, using qualified name"
                );
                qualified_name.to_string()
            }
            _ => display_name.to_string(),
        };

        defs.names.insert(id, name.clone());
        defs.owners.insert(name.clone(), id);
        name
    }

    /// Allocated name of the type `id`, if any.
    pub fn name_of(&self, id: TypeId) -> Option<String> {
        self.inner.lock().names.get(&id).cloned()
    }

    /// Type owning the allocated name, if any.
    pub fn type_for_name(&self, name: &str) -> Option<TypeId> {
        self.inner.lock().owners.get(name).copied()
    }

    /// Insert or replace a definition.
    pub fn register(&self, name: &str, schema: SchemaObject) {
        debug!(definition = %name, "definition registered");
        self.inner.lock().schemas.insert(name.to_string(), schema);
    }

    /// Insert a definition unless the name is already registered.
    ///
    /// Returns `true` when the definition was inserted.
    pub fn register_if_absent(&self, name: &str, schema: SchemaObject) -> bool {
        let mut defs = self.inner.lock();
        if defs.schemas.contains_key(name) {
            return false;
        }
        defs.schemas.insert(name.to_string(), schema);
        debug!(definition = %name, "definition registered");
        true
    }

    pub fn exists(&self, name: &str) -> bool {
        self.inner.lock().schemas.contains_key(name)
    }

    /// Whether the type `id` has a registered definition.
    pub fn exists_type(&self, id: TypeId) -> bool {
        let defs = self.inner.lock();
        defs.names
            .get(&id)
            .is_some_and(|name| defs.schemas.contains_key(name))
    }

    pub fn get(&self, name: &str) -> Option<SchemaObject> {
        self.inner.lock().schemas.get(name).cloned()
    }

    /// Remove a definition together with its name allocation.
    pub fn delete(&self, name: &str) {
        let mut defs = self.inner.lock();
        defs.schemas.remove(name);
        if let Some(id) = defs.owners.remove(name) {
            defs.names.remove(&id);
        }
    }

    /// Copy of every definition, in name order, as emitted in a document.
    ///
    /// Top-level definitions are declarations, so any `$ref` they carry is dropped.
    pub fn export(&self) -> BTreeMap<String, SchemaObject> {
        self.inner
            .lock()
            .schemas
            .iter()
            .map(|(name, schema)| {
                let mut schema = schema.clone();
                schema.reference.clear();
                (name.clone(), schema)
            })
            .collect()
    }

    /// Drop every definition and name allocation.
    pub fn clear(&self) {
        let mut defs = self.inner.lock();
        defs.schemas.clear();
        defs.names.clear();
        defs.owners.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct Pending {
    ordered: BTreeMap<(&'static str, TypeId), TypeDescriptor>,
    keys: HashMap<TypeId, &'static str>,
}

/// Types referenced but not yet expanded, ordered by qualified name.
#[derive(Default)]
pub struct ResolutionQueue {
    pending: Mutex<Pending>,
}

impl ResolutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a type for expansion. Returns `false` if it was already queued.
    pub fn enqueue(&self, desc: TypeDescriptor) -> bool {
        let mut pending = self.pending.lock();
        if pending.keys.contains_key(&desc.id) {
            return false;
        }
        debug!(type_name = %desc.qualified_name, "type enqueued for resolution");
        pending.keys.insert(desc.id, desc.qualified_name);
        pending.ordered.insert((desc.qualified_name, desc.id), desc);
        true
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.pending.lock().keys.contains_key(&id)
    }

    pub fn remove(&self, id: TypeId) {
        let mut pending = self.pending.lock();
        if let Some(qualified_name) = pending.keys.remove(&id) {
            pending.ordered.remove(&(qualified_name, id));
        }
    }

    /// Copy of the currently queued descriptors, in qualified-name order.
    pub fn snapshot(&self) -> Vec<TypeDescriptor> {
        self.pending.lock().ordered.values().cloned().collect()
    }

    pub fn clear(&self) {
        let mut pending = self.pending.lock();
        pending.ordered.clear();
        pending.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.lock().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
