//! Static type descriptors used in place of runtime reflection.
//!
//! Every type that can appear in a document implements [`Reflect`], which returns a
//! [`TypeDescriptor`]: the type's identity, its optional declared name and its structural
//! [`Kind`]. Nested types are referenced through [`TypeRef`] function pointers and are only
//! described on demand, so self-referential and mutually-referential types are fine.
//!
//! Implementations are normally produced by `#[derive(Reflect)]`; the crate ships
//! implementations for std containers, primitives and common leaf types (see `impls`).
//!
//! # Capabilities
//!
//! A type may override structural inference by implementing one of
//! [`SwaggerDefinition`], [`SwaggerParameters`] or [`SwaggerEnum`] and advertising it on its
//! descriptor (the derive macro does this with `#[swagger(definition)]`,
//! `#[swagger(parameters)]` and `#[swagger(enumerable)]`).

mod impls;

use crate::model::{EnumValues, ParamLocation, ParamObject, SchemaObject};
use std::any::TypeId;

/// Lazily produces the descriptor of a nested type.
pub type TypeRef = fn() -> TypeDescriptor;

/// A type that can describe its own shape.
pub trait Reflect: 'static {
    fn descriptor() -> TypeDescriptor;
}

/// Descriptor of `T`.
pub fn describe<T: Reflect>() -> TypeDescriptor {
    T::descriptor()
}

/// Type supplying its own definition schema.
pub trait SwaggerDefinition {
    /// Definition name (`None` falls back to the type's own name) and schema.
    fn swagger_definition() -> anyhow::Result<(Option<String>, SchemaObject)>;
}

/// Type supplying its own operation parameters.
pub trait SwaggerParameters {
    /// Name of the parameter set and the parameters, used verbatim.
    fn swagger_parameters() -> anyhow::Result<(String, Vec<ParamObject>)>;
}

/// Type able to list its legal values and their display names.
pub trait SwaggerEnum {
    fn enum_values() -> EnumValues;
}

/// Structural classification of a type.
#[derive(Debug, Clone)]
pub enum Kind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Isize,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Usize,
    Float32,
    Float64,
    Char,
    String,
    /// Raw byte sequence with no declared shape (e.g. raw JSON).
    Bytes,
    /// Dynamically typed value. `has_methods` marks a behavior-bearing trait object,
    /// which cannot be described.
    Interface { has_methods: bool },
    /// Wall-clock timestamp, emitted as `date-time`.
    Timestamp,
    /// Type that parses itself from text; emitted as a plain string.
    Text,
    /// Optional or indirect value; transparent for schema purposes.
    Pointer(TypeRef),
    Array(TypeRef),
    /// String-keyed map; only the value type is described.
    Map(TypeRef),
    Struct(Vec<FieldDescriptor>),
    /// Kind with no Swagger representation, labelled for error reporting.
    Unsupported(&'static str),
}

impl Kind {
    /// Short label used in errors and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int8 => "i8",
            Kind::Int16 => "i16",
            Kind::Int32 => "i32",
            Kind::Int64 => "i64",
            Kind::Isize => "isize",
            Kind::Uint8 => "u8",
            Kind::Uint16 => "u16",
            Kind::Uint32 => "u32",
            Kind::Uint64 => "u64",
            Kind::Usize => "usize",
            Kind::Float32 => "f32",
            Kind::Float64 => "f64",
            Kind::Char => "char",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Interface { .. } => "interface",
            Kind::Timestamp => "timestamp",
            Kind::Text => "text",
            Kind::Pointer(_) => "pointer",
            Kind::Array(_) => "array",
            Kind::Map(_) => "map",
            Kind::Struct(_) => "struct",
            Kind::Unsupported(label) => label,
        }
    }
}

/// Describes a type: identity, declared name, shape and capabilities.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub id: TypeId,
    /// Declared name; `None` for anonymous types such as `Vec<T>` or `Option<T>`.
    pub name: Option<String>,
    /// Fully-qualified Rust type name.
    pub qualified_name: &'static str,
    pub kind: Kind,
    pub custom_definition: Option<fn() -> anyhow::Result<(Option<String>, SchemaObject)>>,
    pub custom_parameters: Option<fn() -> anyhow::Result<(String, Vec<ParamObject>)>>,
    pub enum_values: Option<fn() -> EnumValues>,
}

impl TypeDescriptor {
    /// Anonymous descriptor of `T` with the given kind.
    pub fn anonymous<T: ?Sized + 'static>(kind: Kind) -> Self {
        TypeDescriptor {
            id: TypeId::of::<T>(),
            name: None,
            qualified_name: std::any::type_name::<T>(),
            kind,
            custom_definition: None,
            custom_parameters: None,
            enum_values: None,
        }
    }

    /// Named descriptor of `T` with the given kind.
    pub fn named<T: ?Sized + 'static>(name: impl Into<String>, kind: Kind) -> Self {
        TypeDescriptor {
            name: Some(name.into()),
            ..TypeDescriptor::anonymous::<T>(kind)
        }
    }

    pub fn with_definition<T: SwaggerDefinition>(mut self) -> Self {
        self.custom_definition = Some(T::swagger_definition);
        self
    }

    pub fn with_parameters<T: SwaggerParameters>(mut self) -> Self {
        self.custom_parameters = Some(T::swagger_parameters);
        self
    }

    pub fn with_enum<T: SwaggerEnum>(mut self) -> Self {
        self.enum_values = Some(T::enum_values);
        self
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Declared name, or the qualified name for anonymous types.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.qualified_name)
    }

    /// Follow pointer kinds down to the first non-pointer descriptor.
    pub fn deref_pointers(self) -> TypeDescriptor {
        let mut desc = self;
        while let Kind::Pointer(inner) = desc.kind {
            desc = inner();
        }
        desc
    }
}

/// One field of a struct descriptor.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Rust field name
    pub name: &'static str,
    /// Serialized property name; `None` when the field never appears in JSON.
    pub json_name: Option<&'static str>,
    /// Whether the field is visible outside its type.
    pub exported: bool,
    /// Whether the field's own fields are merged into the parent.
    pub embedded: bool,
    pub ty: TypeRef,
    pub config: FieldConfig,
}

impl FieldDescriptor {
    /// An exported field serialized under its Rust name.
    pub fn new(name: &'static str, ty: TypeRef) -> Self {
        FieldDescriptor {
            name,
            json_name: Some(name),
            exported: true,
            embedded: false,
            ty,
            config: FieldConfig::default(),
        }
    }
}

/// Per-field overrides.
#[derive(Debug, Clone, Default)]
pub struct FieldConfig {
    /// Common type name replacing the inferred schema
    pub schema_type: Option<&'static str>,
    /// Default value as text, parsed according to the field's kind
    pub default: Option<&'static str>,
    /// Parameter name; makes the field a parameter
    pub param_name: Option<&'static str>,
    /// Path parameter name, used when `param_name` is absent
    pub path_name: Option<&'static str>,
    pub location: Option<ParamLocation>,
    /// `Some(false)` marks an optional parameter; parameters are required otherwise
    pub required: Option<bool>,
    pub description: Option<&'static str>,
}
