// Library code logs through `tracing`; never write to stderr directly.
#![deny(clippy::print_stderr)]

//! Structural type inference and simplification for observed runtime values.
//!
//! ```text
//! Value --infer--> TypeExpr --shrink (many)--> TypeExpr --rewrite--> TypeExpr --Display--> "typing.List[int]"
//! ```

// Type model
pub mod class;
pub mod error;
pub mod types;
pub mod value;

// Engines
pub mod infer;
pub mod rewrite;
pub mod shrink;

// Aggregation over calls
pub mod trace;

// Ambient
pub mod config;
pub mod diagnostics;

pub use class::Class;
pub use config::Config;
pub use diagnostics::{DiagnosticReason, DiagnosticsCollector, RewriteDiagnostic};
pub use error::{ConfigError, TypeError, TypeResult};
pub use infer::{infer, Inferencer};
pub use rewrite::{rewrite, rewrite_with, TypeRewriter};
pub use shrink::{shape_to_mapping, shrink};
pub use trace::{group_traces, shrink_traces, CallTrace, TracedSignature};
pub use types::{GenericKind, ShapeType, TypeExpr, UnionType};
pub use value::{CallableKind, Value};
