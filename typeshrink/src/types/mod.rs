//! Type expressions.
//!
//! `TypeExpr` is the value-level description of an observed or simplified
//! type. Expressions are immutable; every operation builds a new one.
//!
//! ```text
//! Any                         unknown, absorbs unions
//! Class(C)                    an instance of C
//! TypeOf(C)                   the class object C itself
//! Callable                    anything invocable
//! Generic { kind, args }      List / Set / Dict / DefaultDict / Tuple / Tuple[X, ...]
//! Generator { y, s, r }       resumable producer
//! Iterator(X)                 produces X, no further contract
//! Shape(ShapeType)            string-keyed record with per-field types
//! Union(UnionType)            one of >= 2 distinct members
//! ```
//!
//! Equality, hashing and ordering are structural for every variant, shapes
//! included, so unions deduplicate by structure.
//!
//! # Sub-modules
//!
//! - `shape`: `ShapeType`
//! - `display`: canonical `typing`-style rendering

mod display;
mod shape;


pub use shape::{ShapeType, ANONYMOUS_SHAPE_NAME};

use std::collections::BTreeSet;

use serde::Serialize;

use crate::class::{builtins, Class};
use crate::error::{TypeError, TypeResult};

/// The container family of a [`TypeExpr::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GenericKind {
    /// `List[X]`
    List,
    /// `Set[X]`
    Set,
    /// `Dict[K, V]`
    Dict,
    /// `DefaultDict[K, V]`
    DefaultDict,
    /// Fixed-length, positional: `Tuple[A, B]`, or `Tuple[()]` when empty.
    Tuple,
    /// Unbounded tuple of one element type: `Tuple[X, ...]`
    HomogeneousTuple,
}

impl GenericKind {
    pub fn name(self) -> &'static str {
        match self {
            GenericKind::List => "List",
            GenericKind::Set => "Set",
            GenericKind::Dict => "Dict",
            GenericKind::DefaultDict => "DefaultDict",
            GenericKind::Tuple | GenericKind::HomogeneousTuple => "Tuple",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TypeExpr {
    Any,
    Class(Class),
    TypeOf(Class),
    Callable,
    Generic {
        kind: GenericKind,
        args: Vec<TypeExpr>,
    },
    Generator {
        yield_type: Box<TypeExpr>,
        send_type: Box<TypeExpr>,
        return_type: Box<TypeExpr>,
    },
    Iterator(Box<TypeExpr>),
    Shape(ShapeType),
    Union(UnionType),
}

/// Members of a union: at least two, structurally distinct, none `Any`,
/// none themselves unions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnionType {
    members: BTreeSet<TypeExpr>,
}

impl UnionType {
    pub fn members(&self) -> &BTreeSet<TypeExpr> {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeExpr> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`: construction rejects fewer than two members. Kept as
    /// the usual companion to [`UnionType::len`].
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, ty: &TypeExpr) -> bool {
        self.members.contains(ty)
    }

    /// Rebuild the union from transformed members. The result may collapse
    /// if the transformed members coincide.
    pub fn map_members(&self, f: impl FnMut(&TypeExpr) -> TypeExpr) -> TypeExpr {
        TypeExpr::union_nonempty(self.members.iter().map(f))
    }
}

impl IntoIterator for UnionType {
    type Item = TypeExpr;
    type IntoIter = std::collections::btree_set::IntoIter<TypeExpr>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a UnionType {
    type Item = &'a TypeExpr;
    type IntoIter = std::collections::btree_set::Iter<'a, TypeExpr>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl TypeExpr {
    /// Build the union of `members`.
    ///
    /// Nested unions are flattened, duplicates removed, `Any` absorbs the
    /// whole union and a single remaining member is returned as itself.
    ///
    /// # Examples
    /// ```
    /// use typeshrink::class::builtins;
    /// use typeshrink::TypeExpr;
    ///
    /// let int = TypeExpr::Class(builtins::int());
    /// assert_eq!(TypeExpr::try_union([int.clone(), int.clone()]), Ok(int));
    /// assert!(TypeExpr::try_union(Vec::new()).is_err());
    /// ```
    pub fn try_union(members: impl IntoIterator<Item = TypeExpr>) -> TypeResult<TypeExpr> {
        Self::collect_union(members).ok_or(TypeError::EmptyUnion)
    }

    /// Union over members the caller knows to be non-empty.
    pub(crate) fn union_nonempty(members: impl IntoIterator<Item = TypeExpr>) -> TypeExpr {
        Self::collect_union(members).unwrap_or(TypeExpr::Any)
    }

    fn collect_union(members: impl IntoIterator<Item = TypeExpr>) -> Option<TypeExpr> {
        let mut set = BTreeSet::new();
        for member in members {
            match member {
                TypeExpr::Any => return Some(TypeExpr::Any),
                TypeExpr::Union(inner) => set.extend(inner.members),
                other => {
                    set.insert(other);
                }
            }
        }
        if set.len() > 1 {
            return Some(TypeExpr::Union(UnionType { members: set }));
        }
        set.into_iter().next()
    }

    pub fn class(class: Class) -> Self {
        TypeExpr::Class(class)
    }

    /// The type of the null value.
    pub fn none() -> Self {
        TypeExpr::Class(builtins::none_type())
    }

    pub fn int() -> Self {
        TypeExpr::Class(builtins::int())
    }

    pub fn str() -> Self {
        TypeExpr::Class(builtins::str_())
    }

    pub fn generic(kind: GenericKind, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Generic { kind, args }
    }

    pub fn list(element: TypeExpr) -> Self {
        Self::generic(GenericKind::List, vec![element])
    }

    pub fn set(element: TypeExpr) -> Self {
        Self::generic(GenericKind::Set, vec![element])
    }

    pub fn dict(key: TypeExpr, value: TypeExpr) -> Self {
        Self::generic(GenericKind::Dict, vec![key, value])
    }

    pub fn default_dict(key: TypeExpr, value: TypeExpr) -> Self {
        Self::generic(GenericKind::DefaultDict, vec![key, value])
    }

    pub fn tuple(elements: Vec<TypeExpr>) -> Self {
        Self::generic(GenericKind::Tuple, elements)
    }

    pub fn homogeneous_tuple(element: TypeExpr) -> Self {
        Self::generic(GenericKind::HomogeneousTuple, vec![element])
    }

    pub fn iterator(element: TypeExpr) -> Self {
        TypeExpr::Iterator(Box::new(element))
    }

    pub fn generator(yield_type: TypeExpr, send_type: TypeExpr, return_type: TypeExpr) -> Self {
        TypeExpr::Generator {
            yield_type: Box::new(yield_type),
            send_type: Box::new(send_type),
            return_type: Box::new(return_type),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, TypeExpr::Any)
    }

    /// True for the type of the null value.
    pub fn is_none(&self) -> bool {
        matches!(self, TypeExpr::Class(c) if c.is_none_type())
    }

    /// A container typed only from an empty sample: every argument is `Any`.
    ///
    /// `Tuple[()]` has no arguments and is not an empty container.
    pub fn is_empty_container(&self) -> bool {
        match self {
            TypeExpr::Generic { args, .. } => !args.is_empty() && args.iter().all(Self::is_any),
            TypeExpr::Iterator(element) => element.is_any(),
            _ => false,
        }
    }

    /// `(key, value)` if this is a `Dict[K, V]`.
    pub fn as_dict(&self) -> Option<(&TypeExpr, &TypeExpr)> {
        match self {
            TypeExpr::Generic {
                kind: GenericKind::Dict,
                args,
            } => match args.as_slice() {
                [key, value] => Some((key, value)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            TypeExpr::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            TypeExpr::Union(union) => Some(union),
            _ => None,
        }
    }
}

impl Default for TypeExpr {
    /// Nothing is known about a slot that was never observed.
    fn default() -> Self {
        TypeExpr::Any
    }
}

impl From<Class> for TypeExpr {
    fn from(class: Class) -> Self {
        TypeExpr::Class(class)
    }
}
