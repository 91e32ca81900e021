//! Minimization of observed types.
//!
//! `shrink` turns every type observed for one slot into the smallest union
//! that covers them all:
//!
//! ```text
//! shrink([])                       = Any
//! shrink([int, int])               = int
//! shrink([int, str])               = Union[int, str]
//! shrink([Shape{a: int}] * n)      = Shape{a: int}
//! shrink([Shape{a: int}, Shape{b: str}])
//!                                  = Union[Dict[str, int], Dict[str, str]]
//! shrink([Shape{a: int}, int])     = Union[Dict[str, int], int]
//! ```
//!
//! Shapes with different field sets are never merged field by field; they
//! degrade to their mapping equivalents.

use crate::types::{ShapeType, TypeExpr};

/// Return the smallest type equivalent to the union of `types`.
pub fn shrink(types: impl IntoIterator<Item = TypeExpr>) -> TypeExpr {
    let types: Vec<TypeExpr> = types.into_iter().collect();
    let Some(first) = types.first() else {
        return TypeExpr::Any;
    };

    if let TypeExpr::Shape(first_shape) = first {
        let shapes: Option<Vec<&ShapeType>> = types
            .iter()
            .map(|ty| match ty {
                TypeExpr::Shape(shape) => Some(shape),
                _ => None,
            })
            .collect();
        if let Some(shapes) = shapes {
            if shapes.iter().all(|shape| *shape == first_shape) {
                return TypeExpr::Shape(first_shape.clone());
            }
        }
    }

    TypeExpr::union_nonempty(types.into_iter().map(|ty| match ty {
        TypeExpr::Shape(shape) => shape_to_mapping(&shape),
        other => other,
    }))
}

/// The `Dict` equivalent of a shape.
///
/// Field names are strings; a shape without fields gives no evidence for
/// either argument.
pub fn shape_to_mapping(shape: &ShapeType) -> TypeExpr {
    if shape.fields().is_empty() {
        return TypeExpr::dict(TypeExpr::Any, TypeExpr::Any);
    }
    TypeExpr::dict(TypeExpr::str(), shrink(shape.fields().values().cloned()))
}
