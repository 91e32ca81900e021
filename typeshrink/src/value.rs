//! Value - the runtime values observed by inference.
//!
//! The sampling layer hands the inference engine one `Value` per
//! observation. The set of variants is closed: anything the sampler cannot
//! describe structurally is reported as an [`Value::Object`] of its class.

use crate::class::{builtins, Class};

/// The flavour of an invocable value. All flavours infer the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Function,
    Lambda,
    BoundMethod,
    BuiltinFunction,
    BuiltinMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// Set elements; uniqueness is the sampler's concern.
    Set(Vec<Value>),
    /// Key/value pairs in insertion order. A repeated key is allowed; the
    /// last pair for it wins.
    Dict(Vec<(Value, Value)>),
    /// A mapping that synthesizes missing entries.
    DefaultDict(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    /// A suspended producer whose future output cannot be inspected.
    Generator,
    Callable(CallableKind),
    /// A class object.
    Class(Class),
    /// An instance of the given class.
    Object(Class),
}

impl Value {
    /// Get the runtime class of this value.
    pub fn class(&self) -> Class {
        match self {
            Value::None => builtins::none_type(),
            Value::Bool(_) => builtins::bool_(),
            Value::Int(_) => builtins::int(),
            Value::Float(_) => builtins::float(),
            Value::Str(_) => builtins::str_(),
            Value::Bytes(_) => builtins::bytes(),
            Value::List(_) => builtins::list(),
            Value::Set(_) => builtins::set(),
            Value::Dict(_) => builtins::dict(),
            Value::DefaultDict(_) => builtins::default_dict(),
            Value::Tuple(_) => builtins::tuple(),
            Value::Generator => builtins::generator(),
            Value::Callable(CallableKind::Function | CallableKind::Lambda) => builtins::function(),
            Value::Callable(CallableKind::BoundMethod) => builtins::method(),
            Value::Callable(CallableKind::BuiltinFunction | CallableKind::BuiltinMethod) => {
                builtins::builtin_function()
            }
            Value::Class(_) => builtins::type_(),
            Value::Object(class) => class.clone(),
        }
    }

    /// Build a `Dict` from string keys.
    pub fn str_dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (Value::Str(k.into()), v))
                .collect(),
        )
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
