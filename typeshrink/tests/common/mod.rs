//! Shared helpers for integration tests
// Not every test target uses every helper.
#![allow(dead_code)]

use typeshrink::class::builtins;
use typeshrink::{Class, TypeExpr};

/// Union of `members`, which must be non-empty.
pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> TypeExpr {
    TypeExpr::try_union(members).expect("non-empty union")
}

pub fn float() -> TypeExpr {
    TypeExpr::Class(builtins::float())
}

pub fn bool_() -> TypeExpr {
    TypeExpr::Class(builtins::bool_())
}

/// `n` distinct classes deriving only from `object`.
pub fn unrelated_classes(n: usize) -> Vec<TypeExpr> {
    (0..n)
        .map(|i| TypeExpr::Class(Class::new("tests.models", format!("Model{}", i), vec![])))
        .collect()
}

/// `n` distinct direct subclasses of `base`.
pub fn subclasses_of(base: &Class, n: usize) -> Vec<TypeExpr> {
    (0..n)
        .map(|i| {
            TypeExpr::Class(Class::new(
                base.module(),
                format!("{}Child{}", base.qualname(), i),
                vec![base.clone()],
            ))
        })
        .collect()
}
