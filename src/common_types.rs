//! Well-known primitive data types of the Swagger 2.0 specification.
//!
//! Each common name maps to a `(type, format)` pair. The table is used both to emit primitive
//! schemas and to recognize them when deciding whether a schema is empty.
//!
//! See <https://github.com/OAI/OpenAPI-Specification/blob/master/versions/2.0.md#data-types>.

use std::fmt;

/// Symbolic name of a Swagger primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommonName {
    /// `integer` / `int32`
    Integer,
    /// `integer` / `int64`
    Long,
    /// `number` / `float`
    Float,
    /// `number` / `double`
    Double,
    /// `string`
    String,
    /// `string` / `byte` (base64 encoded characters)
    Byte,
    /// `string` / `binary` (any sequence of octets)
    Binary,
    /// `boolean`
    Boolean,
    /// `string` / `date` (RFC 3339 full-date)
    Date,
    /// `string` / `date-time` (RFC 3339 date-time)
    DateTime,
    /// `string` / `password`
    Password,
}

/// JSON type and format of a common name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeFormat {
    pub json_type: &'static str,
    pub format: &'static str,
}

impl CommonName {
    pub const ALL: [CommonName; 11] = [
        CommonName::Integer,
        CommonName::Long,
        CommonName::Float,
        CommonName::Double,
        CommonName::String,
        CommonName::Byte,
        CommonName::Binary,
        CommonName::Boolean,
        CommonName::Date,
        CommonName::DateTime,
        CommonName::Password,
    ];

    /// The symbolic name as used in `schema_type` overrides.
    pub fn as_str(self) -> &'static str {
        match self {
            CommonName::Integer => "integer",
            CommonName::Long => "long",
            CommonName::Float => "float",
            CommonName::Double => "double",
            CommonName::String => "string",
            CommonName::Byte => "byte",
            CommonName::Binary => "binary",
            CommonName::Boolean => "boolean",
            CommonName::Date => "date",
            CommonName::DateTime => "dateTime",
            CommonName::Password => "password",
        }
    }

    /// Look up a symbolic name. `date-time` is accepted as an alias of `dateTime`.
    pub fn lookup(name: &str) -> Option<CommonName> {
        if name == "date-time" {
            return Some(CommonName::DateTime);
        }
        CommonName::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn type_format(self) -> TypeFormat {
        let (json_type, format) = match self {
            CommonName::Integer => ("integer", "int32"),
            CommonName::Long => ("integer", "int64"),
            CommonName::Float => ("number", "float"),
            CommonName::Double => ("number", "double"),
            CommonName::String => ("string", ""),
            CommonName::Byte => ("string", "byte"),
            CommonName::Binary => ("string", "binary"),
            CommonName::Boolean => ("boolean", ""),
            CommonName::Date => ("string", "date"),
            CommonName::DateTime => ("string", "date-time"),
            CommonName::Password => ("string", "password"),
        };
        TypeFormat { json_type, format }
    }
}

impl fmt::Display for CommonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `name` is one of the predeclared common names.
pub fn is_common_name(name: &str) -> bool {
    CommonName::lookup(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_pairs() {
        let long = CommonName::Long.type_format();
        assert_eq!(long.json_type, "integer");
        assert_eq!(long.format, "int64");

        let dt = CommonName::DateTime.type_format();
        assert_eq!((dt.json_type, dt.format), ("string", "date-time"));

        let s = CommonName::String.type_format();
        assert_eq!((s.json_type, s.format), ("string", ""));
    }

    #[test]
    fn test_lookup_round_trips_every_name() {
        for name in CommonName::ALL {
            assert_eq!(CommonName::lookup(name.as_str()), Some(name));
        }
        assert_eq!(CommonName::lookup("date-time"), Some(CommonName::DateTime));
        assert_eq!(CommonName::lookup("file"), None);
        assert!(is_common_name("integer"));
        assert!(!is_common_name("number"));
    }
}
