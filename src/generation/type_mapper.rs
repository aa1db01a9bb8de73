//! Schema to Go type mapping
//!
//! [`map_type`] is total: every schema maps to some [`TypeExpression`], and
//! shapes that Go cannot express precisely degrade to `interface{}` instead
//! of failing the run.

use serde::{Serialize, Serializer};
use std::fmt::{self, Write as _};

use crate::generation::domain_types::{FieldDescriptor, describe_fields};
use crate::generation::utils::to_type_name;
use crate::infrastructure::openapi::SchemaNode;

/// A target-language type produced from a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpression {
    /// `time.Time`
    Timestamp,
    /// `[]byte`
    Bytes,
    String,
    Float32,
    Float64,
    Int32,
    Int64,
    /// Platform-sized `int`
    Int,
    Bool,
    Sequence(Box<TypeExpression>),
    /// `map[string]T`
    Mapping(Box<TypeExpression>),
    /// Inline anonymous `struct { ... }`
    Record(Vec<FieldDescriptor>),
    /// Reference to a declared schema, optionally package-qualified
    Named {
        name: String,
        package: Option<String>,
    },
    /// Pointer to a scalar, from `nullable: true`
    Optional(Box<TypeExpression>),
    /// `interface{}`
    Any,
}

impl TypeExpression {
    pub fn named(name: &str) -> Self {
        TypeExpression::Named {
            name: name.to_string(),
            package: None,
        }
    }

    pub fn sequence_of(inner: TypeExpression) -> Self {
        TypeExpression::Sequence(Box::new(inner))
    }

    /// Whether the rendered type needs the `time` import
    pub fn requires_time_import(&self) -> bool {
        match self {
            TypeExpression::Timestamp => true,
            TypeExpression::Sequence(inner)
            | TypeExpression::Mapping(inner)
            | TypeExpression::Optional(inner) => inner.requires_time_import(),
            TypeExpression::Record(fields) => {
                fields.iter().any(|f| f.type_expr.requires_time_import())
            }
            _ => false,
        }
    }

    /// Whether the rendered type holds raw bytes. Go's `[]byte` needs no
    /// import; the flag exists for templates that want to know anyway.
    pub fn requires_bytes_import(&self) -> bool {
        match self {
            TypeExpression::Bytes => true,
            TypeExpression::Sequence(inner)
            | TypeExpression::Mapping(inner)
            | TypeExpression::Optional(inner) => inner.requires_bytes_import(),
            TypeExpression::Record(fields) => {
                fields.iter().any(|f| f.type_expr.requires_bytes_import())
            }
            _ => false,
        }
    }

    /// Whether the type mentions a package-qualified name
    pub fn references_package(&self) -> bool {
        match self {
            TypeExpression::Named { package, .. } => package.is_some(),
            TypeExpression::Sequence(inner)
            | TypeExpression::Mapping(inner)
            | TypeExpression::Optional(inner) => inner.references_package(),
            TypeExpression::Record(fields) => {
                fields.iter().any(|f| f.type_expr.references_package())
            }
            _ => false,
        }
    }

    /// Whether the dynamic-any fallback appears anywhere in the type
    pub fn contains_any(&self) -> bool {
        match self {
            TypeExpression::Any => true,
            TypeExpression::Sequence(inner)
            | TypeExpression::Mapping(inner)
            | TypeExpression::Optional(inner) => inner.contains_any(),
            TypeExpression::Record(fields) => fields.iter().any(|f| f.type_expr.contains_any()),
            _ => false,
        }
    }

    /// String type, looking through a nullable pointer
    pub fn is_string(&self) -> bool {
        match self {
            TypeExpression::String => true,
            TypeExpression::Optional(inner) => inner.is_string(),
            _ => false,
        }
    }

    /// Integer or floating point type, looking through a nullable pointer
    pub fn is_numeric(&self) -> bool {
        match self {
            TypeExpression::Float32
            | TypeExpression::Float64
            | TypeExpression::Int32
            | TypeExpression::Int64
            | TypeExpression::Int => true,
            TypeExpression::Optional(inner) => inner.is_numeric(),
            _ => false,
        }
    }

    /// Builtin scalar (no pointer, no composite, no named type)
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeExpression::Timestamp
                | TypeExpression::Bytes
                | TypeExpression::String
                | TypeExpression::Float32
                | TypeExpression::Float64
                | TypeExpression::Int32
                | TypeExpression::Int64
                | TypeExpression::Int
                | TypeExpression::Bool
        )
    }

    /// Rewrite every unqualified named reference into `package.Name`
    pub fn qualified(&self, package: &str) -> TypeExpression {
        match self {
            TypeExpression::Named {
                name,
                package: None,
            } => TypeExpression::Named {
                name: name.clone(),
                package: Some(package.to_string()),
            },
            TypeExpression::Sequence(inner) => {
                TypeExpression::Sequence(Box::new(inner.qualified(package)))
            }
            TypeExpression::Mapping(inner) => {
                TypeExpression::Mapping(Box::new(inner.qualified(package)))
            }
            TypeExpression::Optional(inner) => {
                TypeExpression::Optional(Box::new(inner.qualified(package)))
            }
            TypeExpression::Record(fields) => TypeExpression::Record(
                fields
                    .iter()
                    .map(|f| FieldDescriptor {
                        type_expr: f.type_expr.qualified(package),
                        ..f.clone()
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Render as Go source. `depth` is the indentation level of the line
    /// the type appears on; inline struct bodies are indented one deeper.
    pub fn to_go(&self, depth: usize) -> String {
        let mut out = String::new();
        self.write_go(&mut out, depth);
        out
    }

    fn write_go(&self, out: &mut String, depth: usize) {
        match self {
            TypeExpression::Timestamp => out.push_str("time.Time"),
            TypeExpression::Bytes => out.push_str("[]byte"),
            TypeExpression::String => out.push_str("string"),
            TypeExpression::Float32 => out.push_str("float32"),
            TypeExpression::Float64 => out.push_str("float64"),
            TypeExpression::Int32 => out.push_str("int32"),
            TypeExpression::Int64 => out.push_str("int64"),
            TypeExpression::Int => out.push_str("int"),
            TypeExpression::Bool => out.push_str("bool"),
            TypeExpression::Any => out.push_str("interface{}"),
            TypeExpression::Sequence(inner) => {
                out.push_str("[]");
                inner.write_go(out, depth);
            }
            TypeExpression::Mapping(inner) => {
                out.push_str("map[string]");
                inner.write_go(out, depth);
            }
            TypeExpression::Optional(inner) => {
                out.push('*');
                inner.write_go(out, depth);
            }
            TypeExpression::Named { name, package } => {
                if let Some(package) = package {
                    out.push_str(package);
                    out.push('.');
                }
                out.push_str(&to_type_name(name));
            }
            TypeExpression::Record(fields) => {
                out.push_str("struct {\n");
                let indent = "\t".repeat(depth + 1);
                for field in fields {
                    let _ = write!(out, "{indent}{} ", field.target_name);
                    field.type_expr.write_go(out, depth + 1);
                    let _ = writeln!(out, " `{}`", field.struct_tag);
                }
                out.push_str(&"\t".repeat(depth));
                out.push('}');
            }
        }
    }
}

impl fmt::Display for TypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_go(1))
    }
}

impl Serialize for TypeExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Map a schema node to a type expression.
///
/// Rules are applied in fixed precedence: a named reference wins, then the
/// primitive/format table, arrays, additional-properties maps and objects.
/// `allow_nested` selects an inline struct for unnamed objects with
/// properties; otherwise they become `map[string]interface{}`.
///
/// An unnamed object without properties is always `map[string]interface{}`,
/// never `struct {}`, so arbitrary JSON objects still decode into it.
pub fn map_type(schema: &SchemaNode, allow_nested: bool) -> TypeExpression {
    if let Some(name) = &schema.reference {
        return TypeExpression::named(name);
    }

    let format = schema.format.as_deref();
    let mapped = match schema.schema_type.as_deref() {
        Some("string") => match format {
            Some("date-time") => TypeExpression::Timestamp,
            Some("binary") => TypeExpression::Bytes,
            _ => TypeExpression::String,
        },
        Some("number") => match format {
            Some("float") => TypeExpression::Float32,
            _ => TypeExpression::Float64,
        },
        Some("integer") => match format {
            Some("int32") => TypeExpression::Int32,
            Some("int64") => TypeExpression::Int64,
            _ => TypeExpression::Int,
        },
        Some("boolean") => TypeExpression::Bool,
        Some("array") => match &schema.items {
            Some(items) => TypeExpression::sequence_of(map_type(items, allow_nested)),
            None => TypeExpression::sequence_of(TypeExpression::Any),
        },
        Some("object") => match &schema.additional_properties {
            Some(values) => TypeExpression::Mapping(Box::new(map_type(values, allow_nested))),
            None if allow_nested && !schema.properties.is_empty() => {
                TypeExpression::Record(describe_fields(schema))
            }
            // empty object: free-form map rather than `struct {}`
            None => TypeExpression::Mapping(Box::new(TypeExpression::Any)),
        },
        _ => TypeExpression::Any,
    };

    if schema.nullable && mapped.is_primitive() {
        TypeExpression::Optional(Box::new(mapped))
    } else {
        mapped
    }
}

/// Scalar-only mapping for path and query parameters.
///
/// Anything that is not a string, integer, number or boolean becomes a
/// string.
pub fn map_parameter_type(schema: Option<&SchemaNode>) -> TypeExpression {
    match schema.and_then(|s| s.schema_type.as_deref()) {
        Some("integer") => TypeExpression::Int,
        Some("number") => TypeExpression::Float64,
        Some("boolean") => TypeExpression::Bool,
        _ => TypeExpression::String,
    }
}

/// A Go literal usable as a valid value for the schema in generated tests.
///
/// Returns `None` for shapes without an obvious literal (named types,
/// objects, untyped schemas).
pub fn test_value_for(schema: &SchemaNode) -> Option<String> {
    if schema.reference.is_some() {
        return None;
    }

    let literal = match schema.schema_type.as_deref()? {
        "string" => {
            if let Some(first) = schema.enum_values.first() {
                return first.as_str().map(crate::generation::sanitizers::go_string_literal);
            }
            match schema.format.as_deref() {
                Some("date-time") => "time.Now()".to_string(),
                Some("binary") => "[]byte(\"test\")".to_string(),
                Some("uuid") => "\"00000000-0000-0000-0000-000000000000\"".to_string(),
                Some("email") => "\"test@example.com\"".to_string(),
                Some("uri") => "\"https://example.com\"".to_string(),
                _ => "\"test-string\"".to_string(),
            }
        }
        "integer" => {
            let value = clamp(42.0, schema);
            format!("{}", value.round() as i64)
        }
        "number" => format!("{:?}", clamp(42.5, schema)),
        "boolean" => "true".to_string(),
        "array" => {
            let item_type = schema
                .items
                .as_deref()
                .map(|items| map_type(items, false))
                .unwrap_or(TypeExpression::Any);
            if !item_type.is_primitive() && item_type != TypeExpression::Any {
                return None;
            }
            format!("{}{{}}", TypeExpression::sequence_of(item_type).to_go(1))
        }
        _ => return None,
    };

    if schema.nullable && map_type(schema, false).is_primitive() {
        // pointers to literals are not expressible inline
        return None;
    }
    Some(literal)
}

fn clamp(preferred: f64, schema: &SchemaNode) -> f64 {
    let mut value = preferred;
    if let Some(max) = schema.maximum {
        value = value.min(max.floor());
    }
    if let Some(min) = schema.minimum {
        value = value.max(min.ceil());
    }
    value
}
