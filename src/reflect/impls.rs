use super::{Kind, Reflect, TypeDescriptor};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

macro_rules! reflect_named {
    ($($ty:ty => $name:literal, $kind:expr;)*) => {
        $(
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::named::<$ty>($name, $kind)
                }
            }
        )*
    };
}

reflect_named! {
    bool => "bool", Kind::Bool;
    i8 => "i8", Kind::Int8;
    i16 => "i16", Kind::Int16;
    i32 => "i32", Kind::Int32;
    i64 => "i64", Kind::Int64;
    isize => "isize", Kind::Isize;
    u8 => "u8", Kind::Uint8;
    u16 => "u16", Kind::Uint16;
    u32 => "u32", Kind::Uint32;
    u64 => "u64", Kind::Uint64;
    usize => "usize", Kind::Usize;
    f32 => "f32", Kind::Float32;
    f64 => "f64", Kind::Float64;
    char => "char", Kind::Char;
    String => "String", Kind::String;
    &'static str => "str", Kind::String;
    i128 => "i128", Kind::Unsupported("i128");
    u128 => "u128", Kind::Unsupported("u128");
    chrono::NaiveDateTime => "NaiveDateTime", Kind::Timestamp;
    chrono::NaiveDate => "NaiveDate", Kind::Text;
    uuid::Uuid => "Uuid", Kind::Text;
    url::Url => "Url", Kind::Text;
    std::net::IpAddr => "IpAddr", Kind::Text;
}

impl<Tz: chrono::TimeZone + 'static> Reflect for chrono::DateTime<Tz> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named::<Self>("DateTime", Kind::Timestamp)
    }
}

impl Reflect for serde_json::Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Interface { has_methods: false })
    }
}

impl Reflect for () {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Interface { has_methods: false })
    }
}

impl Reflect for Box<serde_json::value::RawValue> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named::<Self>("RawValue", Kind::Bytes)
    }
}

impl Reflect for Box<dyn std::error::Error + Send + Sync> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Interface { has_methods: true })
    }
}

impl<A: 'static, B: 'static> Reflect for (A, B) {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Unsupported("tuple"))
    }
}

impl<A: 'static, B: 'static, C: 'static> Reflect for (A, B, C) {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Unsupported("tuple"))
    }
}

macro_rules! reflect_pointer {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $wrapper<T> {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::anonymous::<Self>(Kind::Pointer(T::descriptor))
                }
            }
        )*
    };
}

reflect_pointer!(Option, Box, Arc, Rc);

impl<T: Reflect> Reflect for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Array(T::descriptor))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Array(T::descriptor))
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Array(T::descriptor))
    }
}

impl<T: Reflect, S: 'static> Reflect for HashSet<T, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Array(T::descriptor))
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Array(T::descriptor))
    }
}

impl<K: 'static, V: Reflect, S: 'static> Reflect for HashMap<K, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Map(V::descriptor))
    }
}

impl<K: 'static, V: Reflect> Reflect for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Map(V::descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::describe;

    #[test]
    fn test_containers_are_anonymous() {
        assert!(describe::<Vec<i64>>().name.is_none());
        assert!(describe::<HashMap<String, bool>>().name.is_none());
        assert!(describe::<Option<String>>().name.is_none());
        assert_eq!(describe::<i64>().name.as_deref(), Some("i64"));
    }

    #[test]
    fn test_pointer_chain_unwraps() {
        let desc = describe::<Option<Box<Arc<u32>>>>().deref_pointers();
        assert!(matches!(desc.kind, Kind::Uint32));
    }

    #[test]
    fn test_leaf_kinds() {
        assert!(matches!(describe::<chrono::DateTime<chrono::Utc>>().kind, Kind::Timestamp));
        assert!(matches!(describe::<uuid::Uuid>().kind, Kind::Text));
        assert!(matches!(
            describe::<serde_json::Value>().kind,
            Kind::Interface { has_methods: false }
        ));
        assert!(matches!(
            describe::<Box<dyn std::error::Error + Send + Sync>>().kind,
            Kind::Interface { has_methods: true }
        ));
        assert!(matches!(describe::<(i32, i32)>().kind, Kind::Unsupported("tuple")));
        assert!(matches!(describe::<Box<serde_json::value::RawValue>>().kind, Kind::Bytes));
    }

    #[test]
    fn test_map_describes_value_type() {
        match describe::<BTreeMap<String, f32>>().kind {
            Kind::Map(values) => assert!(matches!(values().kind, Kind::Float32)),
            other => panic!("expected map, got {}", other.label()),
        }
    }
}
