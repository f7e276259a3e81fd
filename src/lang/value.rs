//! Runtime values and type names for the learner language
//!
//! Object and list handles are `Arc<Mutex<..>>` so scenario steps can hold a
//! reference, send it to a guarded worker, and observe mutations made by
//! earlier steps on the same instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A live object: its class name plus current field values.
#[derive(Debug)]
pub struct Instance {
    pub class: String,
    pub fields: HashMap<String, Value>,
}

pub type ObjRef = Arc<Mutex<Instance>>;
pub type ListRef = Arc<Mutex<Vec<Value>>>;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Object(ObjRef),
    List(ListRef),
}

impl Value {
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Float(_) => "double",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::List(_) => "List",
        }
    }

    /// Class name for object values.
    pub fn class_name(&self) -> Option<String> {
        match self {
            Value::Object(obj) => Some(obj.lock().expect("poisoned instance").class.clone()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            // Reference identity, matching the original's `result == t2` checks.
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Object(obj) => {
                let class = obj.lock().expect("poisoned instance").class.clone();
                write!(f, "{} object", class)
            }
            Value::List(list) => {
                let items = list.lock().expect("poisoned list");
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A declared type in learner source, used for signature matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Double,
    Bool,
    Str,
    Void,
    List(Box<TypeName>),
    Class(String),
}

impl TypeName {
    /// Parse a source-form type name, e.g. `"int"` or `"List<Tier>"`.
    pub fn parse(source: &str) -> Option<TypeName> {
        let s = source.trim();
        match s {
            "int" => return Some(TypeName::Int),
            "double" => return Some(TypeName::Double),
            "bool" => return Some(TypeName::Bool),
            "string" => return Some(TypeName::Str),
            "void" => return Some(TypeName::Void),
            _ => {}
        }
        if let Some(inner) = s.strip_prefix("List<").and_then(|r| r.strip_suffix('>')) {
            return TypeName::parse(inner).map(|t| TypeName::List(Box::new(t)));
        }
        if !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Some(TypeName::Class(s.to_string()));
        }
        None
    }

    /// Default value for a freshly declared field of this type.
    pub fn default_value(&self) -> Value {
        match self {
            TypeName::Int => Value::Int(0),
            TypeName::Double => Value::Float(0.0),
            TypeName::Bool => Value::Bool(false),
            TypeName::Str => Value::Str(String::new()),
            TypeName::Void | TypeName::List(_) | TypeName::Class(_) => Value::Null,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Int => write!(f, "int"),
            TypeName::Double => write!(f, "double"),
            TypeName::Bool => write!(f, "bool"),
            TypeName::Str => write!(f, "string"),
            TypeName::Void => write!(f, "void"),
            TypeName::List(inner) => write!(f, "List<{}>", inner),
            TypeName::Class(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_parse_roundtrip() {
        for source in ["int", "double", "bool", "string", "void", "Tier", "List<Tier>"] {
            let ty = TypeName::parse(source).unwrap();
            assert_eq!(ty.to_string(), source);
        }
        assert_eq!(
            TypeName::parse("List<List<int>>"),
            Some(TypeName::List(Box::new(TypeName::List(Box::new(
                TypeName::Int
            )))))
        );
        assert_eq!(TypeName::parse("not a type"), None);
    }

    #[test]
    fn test_numeric_cross_equality() {
        assert_eq!(Value::Int(5), Value::Float(5.0));
        assert_ne!(Value::Int(5), Value::Float(5.5));
        assert_ne!(Value::Int(5), Value::Str("5".into()));
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a: ObjRef = Arc::new(Mutex::new(Instance {
            class: "Tier".into(),
            fields: HashMap::new(),
        }));
        let b: ObjRef = Arc::new(Mutex::new(Instance {
            class: "Tier".into(),
            fields: HashMap::new(),
        }));
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }
}
