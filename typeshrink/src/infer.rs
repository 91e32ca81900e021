//! Structural inference: from one observed value to a type expression.
//!
//! Dispatch order matters. Class objects and invocables are recognised
//! before structure is inspected:
//!
//! ```text
//! Class(C)        -> Type[C]
//! Callable(_)     -> Callable
//! Generator       -> Iterator[Any]
//! List(xs)        -> List[shrink(infer(x))]
//! Set(xs)         -> Set[shrink(infer(x))]
//! Dict(kvs)       -> Shape{k: infer(v)}     all keys str, within the cap
//!                 -> Dict[shrink(K), shrink(V)]
//! DefaultDict(kvs)-> as Dict, falling back to DefaultDict[K, V]
//! Tuple(xs)       -> Tuple[infer(x0), infer(x1), ...]
//! other           -> the value's class
//! ```
//!
//! Empty collections give `Any` arguments; later rewriting removes them when
//! a sibling observation knows better.

use std::collections::BTreeSet;

use crate::diagnostics::{self, DiagnosticReason};
use crate::shrink::shrink;
use crate::types::{GenericKind, ShapeType, TypeExpr};
use crate::value::Value;

/// Infer the type of `value`.
///
/// `max_shape_size` bounds the number of keys a string-keyed mapping may have
/// and still be described as a shape; larger mappings fall back to
/// `Dict[str, V]`. The bound applies at every nesting level.
///
/// # Examples
/// ```
/// use typeshrink::{infer, TypeExpr, Value};
///
/// let ty = infer(&Value::List(vec![Value::Int(1), Value::Int(2)]), None);
/// assert_eq!(ty, TypeExpr::list(TypeExpr::int()));
/// ```
pub fn infer(value: &Value, max_shape_size: Option<usize>) -> TypeExpr {
    Inferencer::new(max_shape_size).infer(value)
}

/// Inference with a fixed shape size cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inferencer {
    max_shape_size: Option<usize>,
}

impl Inferencer {
    pub fn new(max_shape_size: Option<usize>) -> Self {
        Self { max_shape_size }
    }

    pub fn max_shape_size(&self) -> Option<usize> {
        self.max_shape_size
    }

    pub fn infer(&self, value: &Value) -> TypeExpr {
        match value {
            Value::Class(class) => TypeExpr::TypeOf(class.clone()),
            Value::Callable(_) => TypeExpr::Callable,
            Value::Generator => TypeExpr::iterator(TypeExpr::Any),
            Value::List(items) => TypeExpr::list(self.infer_elements(items)),
            Value::Set(items) => TypeExpr::set(self.infer_elements(items)),
            Value::Dict(entries) => self.infer_mapping(entries, GenericKind::Dict),
            Value::DefaultDict(entries) => self.infer_mapping(entries, GenericKind::DefaultDict),
            Value::Tuple(items) => TypeExpr::tuple(items.iter().map(|e| self.infer(e)).collect()),
            other => TypeExpr::Class(other.class()),
        }
    }

    fn infer_elements(&self, items: &[Value]) -> TypeExpr {
        shrink(items.iter().map(|e| self.infer(e)))
    }

    fn infer_mapping(&self, entries: &[(Value, Value)], kind: GenericKind) -> TypeExpr {
        if entries.is_empty() {
            return TypeExpr::generic(kind, vec![TypeExpr::Any, TypeExpr::Any]);
        }
        let str_keyed = entries.iter().all(|(k, _)| matches!(k, Value::Str(_)));
        // A repeated key names one field, so only distinct keys count.
        let key_count = entries
            .iter()
            .filter_map(|(k, _)| match k {
                Value::Str(name) => Some(name.as_str()),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .len();
        let over_cap = self.max_shape_size.filter(|&max| key_count > max);
        if str_keyed && over_cap.is_none() {
            return TypeExpr::Shape(self.infer_shape(entries));
        }

        let key_type = shrink(entries.iter().map(|(k, _)| self.infer(k)));
        let value_type = shrink(entries.iter().map(|(_, v)| self.infer(v)));
        let mapping = TypeExpr::generic(kind, vec![key_type, value_type]);
        if let (true, Some(max)) = (str_keyed, over_cap) {
            diagnostics::emit(DiagnosticReason::ShapeTooLarge(key_count, max), &mapping);
        }
        mapping
    }

    /// One field per string key; other keys are skipped.
    fn infer_shape(&self, entries: &[(Value, Value)]) -> ShapeType {
        ShapeType::anonymous(entries.iter().filter_map(|(k, v)| match k {
            Value::Str(name) => Some((name.clone(), self.infer(v))),
            _ => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{builtins, Class};
    use crate::value::CallableKind;
    use pretty_assertions::assert_eq;

    fn float() -> TypeExpr {
        TypeExpr::Class(builtins::float())
    }

    #[test]
    fn test_infer_scalars() {
        assert_eq!(infer(&Value::Int(3), None), TypeExpr::int());
        assert_eq!(infer(&Value::str("x"), None), TypeExpr::str());
        assert_eq!(infer(&Value::None, None), TypeExpr::none());
        assert_eq!(infer(&Value::Bool(true), None), TypeExpr::Class(builtins::bool_()));
        assert_eq!(infer(&Value::Float(0.5), None), float());
    }

    #[test]
    fn test_infer_class_object() {
        let user = Class::new("app.models", "User", vec![]);
        assert_eq!(
            infer(&Value::Class(user.clone()), None),
            TypeExpr::TypeOf(user.clone())
        );
        assert_eq!(infer(&Value::Object(user.clone()), None), TypeExpr::Class(user));
    }

    #[test]
    fn test_infer_callables() {
        for kind in [
            CallableKind::Function,
            CallableKind::Lambda,
            CallableKind::BoundMethod,
            CallableKind::BuiltinFunction,
            CallableKind::BuiltinMethod,
        ] {
            assert_eq!(infer(&Value::Callable(kind), None), TypeExpr::Callable);
        }
    }

    #[test]
    fn test_infer_generator() {
        assert_eq!(
            infer(&Value::Generator, None),
            TypeExpr::iterator(TypeExpr::Any)
        );
    }

    #[test]
    fn test_infer_list_shrinks_elements() {
        let value = Value::List(vec![Value::Int(1), Value::str("a"), Value::Int(2)]);
        assert_eq!(
            infer(&value, None),
            TypeExpr::list(TypeExpr::try_union([TypeExpr::int(), TypeExpr::str()]).unwrap())
        );
    }

    #[test]
    fn test_infer_empty_collections() {
        assert_eq!(infer(&Value::List(vec![]), None), TypeExpr::list(TypeExpr::Any));
        assert_eq!(infer(&Value::Set(vec![]), None), TypeExpr::set(TypeExpr::Any));
        assert_eq!(
            infer(&Value::Dict(vec![]), None),
            TypeExpr::dict(TypeExpr::Any, TypeExpr::Any)
        );
        assert_eq!(
            infer(&Value::DefaultDict(vec![]), None),
            TypeExpr::default_dict(TypeExpr::Any, TypeExpr::Any)
        );
        assert_eq!(infer(&Value::Tuple(vec![]), None), TypeExpr::tuple(vec![]));
    }

    #[test]
    fn test_infer_tuple_is_positional() {
        let value = Value::Tuple(vec![Value::Int(1), Value::str("a"), Value::Int(2)]);
        assert_eq!(
            infer(&value, None),
            TypeExpr::tuple(vec![TypeExpr::int(), TypeExpr::str(), TypeExpr::int()])
        );
    }

    #[test]
    fn test_infer_string_keyed_dict_is_shape() {
        let value = Value::str_dict([("a", Value::Int(1)), ("b", Value::str("x"))]);
        assert_eq!(
            infer(&value, None),
            TypeExpr::Shape(ShapeType::anonymous([
                ("a", TypeExpr::int()),
                ("b", TypeExpr::str()),
            ]))
        );
    }

    #[test]
    fn test_infer_non_string_keys() {
        let value = Value::Dict(vec![
            (Value::Int(1), Value::str("a")),
            (Value::str("k"), Value::str("b")),
        ]);
        assert_eq!(
            infer(&value, None),
            TypeExpr::dict(
                TypeExpr::try_union([TypeExpr::int(), TypeExpr::str()]).unwrap(),
                TypeExpr::str()
            )
        );
    }

    #[test]
    fn test_infer_shape_size_cap() {
        let value = Value::str_dict([("a", Value::Int(1)), ("b", Value::Float(1.0))]);
        assert_eq!(
            infer(&value, Some(1)),
            TypeExpr::dict(
                TypeExpr::str(),
                TypeExpr::try_union([TypeExpr::int(), float()]).unwrap()
            )
        );
        assert!(matches!(infer(&value, Some(2)), TypeExpr::Shape(_)));
    }

    #[test]
    fn test_infer_shape_size_cap_records_diagnostic() {
        use crate::diagnostics::DiagnosticsCollector;

        DiagnosticsCollector::enable();
        DiagnosticsCollector::clear();
        let value = Value::DefaultDict(vec![
            (Value::str("a"), Value::Int(1)),
            (Value::str("b"), Value::Int(2)),
            (Value::str("c"), Value::Int(3)),
        ]);
        assert_eq!(
            Inferencer::new(Some(2)).infer(&value),
            TypeExpr::default_dict(TypeExpr::str(), TypeExpr::int())
        );
        let diags = DiagnosticsCollector::take();
        DiagnosticsCollector::disable();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].reason, DiagnosticReason::ShapeTooLarge(3, 2));
        assert_eq!(diags[0].widened_to, "typing.DefaultDict[str, int]");
    }

    #[test]
    fn test_infer_shape_size_cap_counts_distinct_keys() {
        let value = Value::Dict(vec![
            (Value::str("a"), Value::Int(1)),
            (Value::str("a"), Value::str("x")),
        ]);
        assert_eq!(
            infer(&value, Some(1)),
            TypeExpr::Shape(ShapeType::anonymous([("a", TypeExpr::str())]))
        );
    }

    #[test]
    fn test_infer_shape_size_cap_is_nested() {
        let inner = Value::str_dict([("x", Value::Int(1)), ("y", Value::Int(2))]);
        let value = Value::str_dict([("point", inner)]);
        assert_eq!(
            infer(&value, Some(1)),
            TypeExpr::Shape(ShapeType::anonymous([(
                "point",
                TypeExpr::dict(TypeExpr::str(), TypeExpr::int())
            )]))
        );
    }

    #[test]
    fn test_infer_default_dict() {
        let str_keys = Value::DefaultDict(vec![(Value::str("a"), Value::Int(1))]);
        assert_eq!(
            infer(&str_keys, None),
            TypeExpr::Shape(ShapeType::anonymous([("a", TypeExpr::int())]))
        );

        let int_keys = Value::DefaultDict(vec![(Value::Int(1), Value::Int(1))]);
        assert_eq!(
            infer(&int_keys, None),
            TypeExpr::default_dict(TypeExpr::int(), TypeExpr::int())
        );
    }

    #[test]
    fn test_infer_list_of_shapes() {
        let value = Value::List(vec![
            Value::str_dict([("a", Value::Int(1))]),
            Value::str_dict([("a", Value::Int(2))]),
        ]);
        assert_eq!(
            infer(&value, None),
            TypeExpr::list(TypeExpr::Shape(ShapeType::anonymous([(
                "a",
                TypeExpr::int()
            )])))
        );
    }
}
