//! Rewrite pipeline.
//!
//! A [`TypeRewriter`] visits a type expression and rebuilds it. The default
//! hooks recurse into every child and change nothing, so a rule overrides
//! only the variant it cares about. Rules compose through
//! [`ChainedRewriter`] and [`FixedPointRewriter`]:
//!
//! ```text
//! FixedPointRewriter(
//!     ChainedRewriter[
//!         RemoveEmptyContainers,   Union{Set[Any], Set[int]}     -> Set[int]
//!         MergeUniformMappings,    Union{Dict[K, A], Dict[K, B]} -> Dict[K, Union[A, B]]
//!         RewriteLargeUnion(5),    Union{6 x Sub(Base)}          -> Base
//!         RewriteGenerator,        Generator[Y, None, None]      -> Iterator[Y]
//!     ],
//!     max_passes = 8,
//! )
//! ```

mod limits;
mod rules;

pub use limits::{DEFAULT_MAX_UNION_LEN, MAX_REWRITE_PASSES};
pub use rules::{MergeUniformMappings, RemoveEmptyContainers, RewriteGenerator, RewriteLargeUnion};

use std::fmt;

use once_cell::sync::Lazy;

use crate::types::{GenericKind, ShapeType, TypeExpr, UnionType};

/// A transformation over type expressions, dispatched per variant.
pub trait TypeRewriter: fmt::Debug {
    fn rewrite(&self, ty: &TypeExpr) -> TypeExpr {
        match ty {
            TypeExpr::Union(union) => self.rewrite_union(union),
            TypeExpr::Generic { kind, args } => self.rewrite_generic(*kind, args),
            TypeExpr::Iterator(element) => self.rewrite_iterator(element),
            TypeExpr::Generator {
                yield_type,
                send_type,
                return_type,
            } => self.rewrite_generator(yield_type, send_type, return_type),
            TypeExpr::Shape(shape) => self.rewrite_shape(shape),
            TypeExpr::Any | TypeExpr::Class(_) | TypeExpr::TypeOf(_) | TypeExpr::Callable => {
                self.generic_rewrite(ty)
            }
        }
    }

    fn rewrite_union(&self, union: &UnionType) -> TypeExpr {
        union.map_members(|member| self.rewrite(member))
    }

    fn rewrite_generic(&self, kind: GenericKind, args: &[TypeExpr]) -> TypeExpr {
        TypeExpr::generic(kind, args.iter().map(|arg| self.rewrite(arg)).collect())
    }

    fn rewrite_iterator(&self, element: &TypeExpr) -> TypeExpr {
        TypeExpr::iterator(self.rewrite(element))
    }

    fn rewrite_generator(
        &self,
        yield_type: &TypeExpr,
        send_type: &TypeExpr,
        return_type: &TypeExpr,
    ) -> TypeExpr {
        TypeExpr::generator(
            self.rewrite(yield_type),
            self.rewrite(send_type),
            self.rewrite(return_type),
        )
    }

    fn rewrite_shape(&self, shape: &ShapeType) -> TypeExpr {
        TypeExpr::Shape(shape.map_fields(|field| self.rewrite(field)))
    }

    /// Leaves without children. Identity by default.
    fn generic_rewrite(&self, ty: &TypeExpr) -> TypeExpr {
        ty.clone()
    }
}

/// Returns every expression unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpRewriter;

impl TypeRewriter for NoOpRewriter {
    fn rewrite(&self, ty: &TypeExpr) -> TypeExpr {
        ty.clone()
    }
}

/// Applies each rewriter in order, feeding the output of one to the next.
#[derive(Debug, Default)]
pub struct ChainedRewriter {
    rewriters: Vec<Box<dyn TypeRewriter + Send + Sync>>,
}

impl ChainedRewriter {
    pub fn new(rewriters: Vec<Box<dyn TypeRewriter + Send + Sync>>) -> Self {
        Self { rewriters }
    }

    /// Append a rewriter to the end of the chain.
    pub fn then(mut self, rewriter: impl TypeRewriter + Send + Sync + 'static) -> Self {
        self.rewriters.push(Box::new(rewriter));
        self
    }

    pub fn len(&self) -> usize {
        self.rewriters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewriters.is_empty()
    }
}

impl TypeRewriter for ChainedRewriter {
    fn rewrite(&self, ty: &TypeExpr) -> TypeExpr {
        self.rewriters
            .iter()
            .fold(ty.clone(), |current, rewriter| rewriter.rewrite(&current))
    }
}

/// Reapplies `inner` until its output stops changing, at most `max_passes`
/// times.
#[derive(Debug)]
pub struct FixedPointRewriter<R> {
    inner: R,
    max_passes: usize,
}

impl<R: TypeRewriter> FixedPointRewriter<R> {
    pub fn new(inner: R, max_passes: usize) -> Self {
        Self {
            inner,
            max_passes: max_passes.max(1),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }
}

impl<R: TypeRewriter> TypeRewriter for FixedPointRewriter<R> {
    fn rewrite(&self, ty: &TypeExpr) -> TypeExpr {
        let mut current = self.inner.rewrite(ty);
        for pass in 1..self.max_passes {
            let next = self.inner.rewrite(&current);
            if next == current {
                tracing::trace!(passes = pass, "rewrite reached a fixed point");
                return current;
            }
            current = next;
        }
        tracing::debug!(
            max_passes = self.max_passes,
            result = %current,
            "rewrite stopped at the pass limit"
        );
        current
    }
}

/// The standard pipeline: the four rules, chained and run to a fixed point.
pub fn default_rewriter(max_union_len: usize, max_passes: usize) -> FixedPointRewriter<ChainedRewriter> {
    let chain = ChainedRewriter::default()
        .then(RemoveEmptyContainers)
        .then(MergeUniformMappings)
        .then(RewriteLargeUnion::new(max_union_len))
        .then(RewriteGenerator);
    FixedPointRewriter::new(chain, max_passes)
}

static DEFAULT_REWRITER: Lazy<FixedPointRewriter<ChainedRewriter>> =
    Lazy::new(|| default_rewriter(DEFAULT_MAX_UNION_LEN, MAX_REWRITE_PASSES));

/// Rewrite `ty` with the standard pipeline.
///
/// # Examples
/// ```
/// use typeshrink::{rewrite, TypeExpr};
///
/// let ty = TypeExpr::try_union([
///     TypeExpr::set(TypeExpr::Any),
///     TypeExpr::set(TypeExpr::int()),
/// ])
/// .unwrap();
/// assert_eq!(rewrite(&ty), TypeExpr::set(TypeExpr::int()));
/// ```
pub fn rewrite(ty: &TypeExpr) -> TypeExpr {
    DEFAULT_REWRITER.rewrite(ty)
}

/// Rewrite `ty` with any pipeline.
pub fn rewrite_with(ty: &TypeExpr, rewriter: &dyn TypeRewriter) -> TypeExpr {
    rewriter.rewrite(ty)
}
