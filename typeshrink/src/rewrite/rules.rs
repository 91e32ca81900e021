//! The rules of the standard pipeline.

use crate::class::Class;
use crate::diagnostics::{self, DiagnosticReason};
use crate::error::{TypeError, TypeResult};
use crate::shrink::shrink;
use crate::types::{GenericKind, TypeExpr, UnionType};

use super::limits::DEFAULT_MAX_UNION_LEN;
use super::TypeRewriter;

/// Drops empty-container members from a union.
///
/// `Union[Set[Any], Set[int]]` becomes `Set[int]`. A union made only of
/// empty containers is left as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveEmptyContainers;

impl TypeRewriter for RemoveEmptyContainers {
    fn rewrite_union(&self, union: &UnionType) -> TypeExpr {
        let kept: Vec<&TypeExpr> = union.iter().filter(|m| !m.is_empty_container()).collect();
        if kept.is_empty() {
            return TypeExpr::Union(union.clone());
        }
        let dropped = union.len() - kept.len();
        let result = TypeExpr::union_nonempty(kept.into_iter().map(|m| self.rewrite(m)));
        if dropped > 0 {
            diagnostics::emit(DiagnosticReason::EmptyContainersDropped(dropped), &result);
        }
        result
    }
}

/// Collapses a union of `Dict`s with one key type into a single `Dict`.
///
/// `Union[Dict[str, int], Dict[str, str]]` becomes
/// `Dict[str, Union[int, str]]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeUniformMappings;

impl MergeUniformMappings {
    fn merge(union: &UnionType) -> Option<TypeExpr> {
        let (key, _) = union.iter().next()?.as_dict()?;
        let mut values = Vec::with_capacity(union.len());
        for member in union {
            let (member_key, value) = member.as_dict()?;
            if member_key != key {
                return None;
            }
            values.push(value.clone());
        }
        Some(TypeExpr::dict(key.clone(), shrink(values)))
    }
}

impl TypeRewriter for MergeUniformMappings {
    fn rewrite_union(&self, union: &UnionType) -> TypeExpr {
        match union.map_members(|m| self.rewrite(m)) {
            TypeExpr::Union(members) => match Self::merge(&members) {
                Some(merged) => {
                    // The merged value union may itself be mergeable.
                    let merged = self.rewrite(&merged);
                    diagnostics::emit(DiagnosticReason::MappingsMerged(members.len()), &merged);
                    merged
                }
                None => TypeExpr::Union(members),
            },
            other => other,
        }
    }
}

/// Collapses unions with more than `max_union_len` members.
///
/// In order of preference the union becomes `Tuple[X, ...]` when every member
/// is a tuple of `X`, the nearest ancestor other than `object` shared by every
/// member, or `Any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteLargeUnion {
    max_union_len: usize,
}

impl Default for RewriteLargeUnion {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNION_LEN)
    }
}

impl RewriteLargeUnion {
    pub fn new(max_union_len: usize) -> Self {
        Self { max_union_len }
    }

    pub fn max_union_len(&self) -> usize {
        self.max_union_len
    }

    fn collapse(&self, union: &UnionType) -> TypeExpr {
        let collapsed = match homogeneous_tuple_element(union) {
            Some(element) => TypeExpr::homogeneous_tuple(element.clone()),
            None => match common_ancestor(union) {
                Ok(Some(ancestor)) => TypeExpr::Class(ancestor),
                Ok(None) => {
                    diagnostics::emit(DiagnosticReason::NoCommonAncestor, &TypeExpr::Any);
                    TypeExpr::Any
                }
                Err(TypeError::InconsistentHierarchy { class }) => {
                    diagnostics::emit(DiagnosticReason::InconsistentHierarchy(class), &TypeExpr::Any);
                    TypeExpr::Any
                }
                Err(err) => {
                    tracing::debug!(error = %err, "ancestor search failed");
                    TypeExpr::Any
                }
            },
        };
        diagnostics::emit(
            DiagnosticReason::UnionTooLarge(union.len(), self.max_union_len),
            &collapsed,
        );
        collapsed
    }
}

impl TypeRewriter for RewriteLargeUnion {
    fn rewrite_union(&self, union: &UnionType) -> TypeExpr {
        match union.map_members(|m| self.rewrite(m)) {
            TypeExpr::Union(members) if members.len() > self.max_union_len => self.collapse(&members),
            other => other,
        }
    }
}

/// `X` if every member is a non-empty fixed tuple whose positions are all the
/// first member's first element type.
fn homogeneous_tuple_element(union: &UnionType) -> Option<&TypeExpr> {
    let mut element = None;
    for member in union {
        let TypeExpr::Generic {
            kind: GenericKind::Tuple,
            args,
        } = member
        else {
            return None;
        };
        if args.is_empty() {
            return None;
        }
        let first = element.or(args.first())?;
        if !args.iter().all(|arg| arg == first) {
            return None;
        }
        element = Some(first);
    }
    element
}

/// The first class in the first member's ancestry, `object` excluded, that
/// every member derives from. `None` when a member is not a plain class.
fn common_ancestor(union: &UnionType) -> TypeResult<Option<Class>> {
    let Some(classes) = union.iter().map(TypeExpr::as_class).collect::<Option<Vec<_>>>() else {
        return Ok(None);
    };
    let Some(first) = classes.first() else {
        return Ok(None);
    };
    for ancestor in first.mro()? {
        if ancestor.is_object() {
            continue;
        }
        if all_derive_from(&classes, &ancestor)? {
            tracing::trace!(ancestor = %ancestor, "found common ancestor");
            return Ok(Some(ancestor));
        }
    }
    Ok(None)
}

fn all_derive_from(classes: &[&Class], ancestor: &Class) -> TypeResult<bool> {
    for class in classes {
        if !class.is_subclass_of(ancestor)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Rewrites `Generator[Y, None, None]` to `Iterator[Y]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteGenerator;

impl TypeRewriter for RewriteGenerator {
    fn rewrite_generator(
        &self,
        yield_type: &TypeExpr,
        send_type: &TypeExpr,
        return_type: &TypeExpr,
    ) -> TypeExpr {
        let yield_type = self.rewrite(yield_type);
        let send_type = self.rewrite(send_type);
        let return_type = self.rewrite(return_type);
        if send_type.is_none() && return_type.is_none() {
            TypeExpr::iterator(yield_type)
        } else {
            TypeExpr::generator(yield_type, send_type, return_type)
        }
    }
}
