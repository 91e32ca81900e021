//! Canonical rendering and serialization of type expressions.

mod common;

use common::{bool_, union};
use typeshrink::{infer, rewrite, Class, ShapeType, TypeExpr, Value};

// ==================== Display ====================

#[test]
fn test_render_builtins_are_bare() {
    insta::assert_snapshot!(TypeExpr::int(), @"int");
    insta::assert_snapshot!(TypeExpr::none(), @"None");
    insta::assert_snapshot!(bool_(), @"bool");
}

#[test]
fn test_render_user_class_is_qualified() {
    let order = Class::new("shop.orders", "Order.Line", vec![]);
    insta::assert_snapshot!(TypeExpr::Class(order.clone()), @"shop.orders.Order.Line");
    insta::assert_snapshot!(TypeExpr::TypeOf(order), @"typing.Type[shop.orders.Order.Line]");
}

#[test]
fn test_render_default_dict() {
    let ty = TypeExpr::default_dict(TypeExpr::int(), TypeExpr::list(TypeExpr::str()));
    insta::assert_snapshot!(ty, @"typing.DefaultDict[int, typing.List[str]]");
}

#[test]
fn test_render_optional() {
    insta::assert_snapshot!(
        union([TypeExpr::none(), TypeExpr::str()]),
        @"typing.Optional[str]"
    );
    insta::assert_snapshot!(
        union([TypeExpr::none(), TypeExpr::str(), TypeExpr::int()]),
        @"typing.Optional[typing.Union[int, str]]"
    );
}

#[test]
fn test_render_inferred_record() {
    let value = Value::str_dict([
        ("name", Value::str("widget")),
        ("tags", Value::Set(vec![Value::str("a")])),
        ("parent", Value::None),
    ]);
    insta::assert_snapshot!(
        infer(&value, None),
        @"TypedDict('DUMMY_NAME', {'name': str, 'tags': typing.Set[str], 'parent': None})"
    );
}

#[test]
fn test_render_rewritten_tuples() {
    let ty = union((1..=6).map(|n| TypeExpr::tuple(vec![TypeExpr::int(); n])));
    insta::assert_snapshot!(rewrite(&ty), @"typing.Tuple[int, ...]");
}

// ==================== Serialization ====================

#[test]
fn test_serialize_type_expr() {
    let ty = TypeExpr::list(TypeExpr::Class(Class::new("app", "User", vec![])));
    let json = serde_json::to_value(&ty).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Generic": {
                "kind": "List",
                "args": [{ "Class": "app.User" }]
            }
        })
    );
}

#[test]
fn test_serialize_shape() {
    let shape = ShapeType::anonymous([("a", TypeExpr::Any)]);
    let json = serde_json::to_value(&shape).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "DUMMY_NAME",
            "fields": { "a": "Any" },
            "total": true
        })
    );
}
