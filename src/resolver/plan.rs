use super::Resolver;
use crate::reflect::{FieldDescriptor, Kind, TypeDescriptor};
use std::any::TypeId;
use std::collections::{HashSet, VecDeque};

#[derive(Default)]
struct Plan {
    seen: HashSet<TypeId>,
    deferred: VecDeque<TypeDescriptor>,
}

impl Resolver {
    /// Allocate the definition name of every type reachable from `desc` that resolving it
    /// would register, before any of them is resolved.
    ///
    /// Fields are visited in declaration order and nested named structs level by level, which
    /// is the order a sequential resolution references them in. Resolution afterwards only
    /// reads these names, so the drain workers never compete for a contested display name.
    pub fn plan_names(&self, desc: &TypeDescriptor) {
        let mut plan = Plan::default();
        self.plan_top(desc, &mut plan);
        while let Some(next) = plan.deferred.pop_front() {
            if let Kind::Struct(fields) = &next.kind {
                self.plan_fields(fields, &mut plan);
            }
        }
    }

    /// Mirrors [`Resolver::resolve`].
    fn plan_top(&self, desc: &TypeDescriptor, plan: &mut Plan) {
        if desc.custom_definition.is_some() {
            return;
        }
        if let Some(target) = self.mapped(desc) {
            return self.plan_top(&target, plan);
        }
        if let Kind::Pointer(inner) = desc.kind {
            return self.plan_top(&inner(), plan);
        }

        if !desc.is_named() {
            match &desc.kind {
                Kind::Struct(fields) => self.plan_fields(fields, plan),
                _ => self.plan_nested(desc, plan),
            }
            return;
        }

        match &desc.kind {
            Kind::Struct(fields) => {
                if self.claim(desc, plan) {
                    self.plan_fields(fields, plan);
                }
            }
            Kind::Array(elem) => {
                if self.claim(desc, plan) {
                    let elem = elem().deref_pointers();
                    match &elem.kind {
                        Kind::Struct(fields) if !elem.is_named() => self.plan_fields(fields, plan),
                        _ => self.plan_nested(&elem, plan),
                    }
                }
            }
            Kind::Map(values) => {
                if self.claim(desc, plan) {
                    self.plan_nested(&values(), plan);
                }
            }
            _ => {}
        }
    }

    /// Mirrors structural inference in definition mode.
    fn plan_nested(&self, desc: &TypeDescriptor, plan: &mut Plan) {
        if desc.custom_definition.is_some() {
            return;
        }
        if let Some(target) = self.mapped(desc) {
            return self.plan_nested(&target, plan);
        }

        match &desc.kind {
            Kind::Pointer(inner) => self.plan_nested(&inner(), plan),
            Kind::Array(inner) | Kind::Map(inner) => self.plan_nested(&inner(), plan),
            Kind::Struct(fields) if !desc.is_named() => self.plan_fields(fields, plan),
            Kind::Struct(_) => {
                if self.claim(desc, plan) {
                    plan.deferred.push_back(desc.clone());
                }
            }
            _ => {}
        }
    }

    /// Mirrors property collection.
    fn plan_fields(&self, fields: &[FieldDescriptor], plan: &mut Plan) {
        for field in fields {
            if !field.exported {
                continue;
            }
            let ty = (field.ty)();
            if field.embedded {
                if let Kind::Struct(inner) = &ty.deref_pointers().kind {
                    self.plan_fields(inner, plan);
                }
                continue;
            }
            if field.json_name.is_none() || field.config.schema_type.is_some() {
                continue;
            }
            self.plan_nested(&ty, plan);
        }
    }

    /// Allocate the name of `desc` the first time the walk meets it.
    fn claim(&self, desc: &TypeDescriptor, plan: &mut Plan) -> bool {
        if !plan.seen.insert(desc.id) {
            return false;
        }
        self.registry
            .allocate_name(desc.id, desc.display_name(), desc.qualified_name);
        true
    }
}
