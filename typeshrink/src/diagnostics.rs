//! Diagnostics for lossy inference and rewriting.
//!
//! Inference and rewriting never fail, but several steps deliberately throw
//! information away: a shape over the size cap becomes a plain mapping, a
//! large union collapses to a common ancestor or to `Any`. This module lets
//! callers see those events.
//!
//! Collection is off by default and per thread. Call
//! [`DiagnosticsCollector::enable`] before inferring or rewriting, then
//! [`DiagnosticsCollector::take`] to drain what was recorded. Every event is
//! logged through `tracing` whether or not the collector is on.

use std::cell::RefCell;

/// Why a type lost precision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticReason {
    /// A string-keyed mapping had more entries than the shape cap.
    /// Contains (entries, cap).
    ShapeTooLarge(usize, usize),

    /// Empty-container members were dropped from a union.
    /// Contains the number of members dropped.
    EmptyContainersDropped(usize),

    /// Union members were merged into one mapping.
    /// Contains the number of mappings merged.
    MappingsMerged(usize),

    /// A union exceeded the member limit.
    /// Contains (members, limit).
    UnionTooLarge(usize, usize),

    /// No ancestor other than `object` is shared by all union members.
    NoCommonAncestor,

    /// The ancestry of a class could not be linearized.
    /// Contains the class name.
    InconsistentHierarchy(String),
}

impl std::fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticReason::ShapeTooLarge(n, max) => {
                write!(f, "mapping has {} string keys (max shape size {})", n, max)
            }
            DiagnosticReason::EmptyContainersDropped(n) => {
                write!(f, "dropped {} empty container(s) from union", n)
            }
            DiagnosticReason::MappingsMerged(n) => {
                write!(f, "merged {} mappings with a shared key type", n)
            }
            DiagnosticReason::UnionTooLarge(n, max) => {
                write!(f, "union type has {} elements (max {})", n, max)
            }
            DiagnosticReason::NoCommonAncestor => {
                write!(f, "union members share no common ancestor")
            }
            DiagnosticReason::InconsistentHierarchy(class) => {
                write!(f, "cannot walk the ancestry of '{}'", class)
            }
        }
    }
}

/// A single diagnostic: what happened and what the type became.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteDiagnostic {
    pub reason: DiagnosticReason,
    /// Rendering of the resulting type.
    pub widened_to: String,
}

impl RewriteDiagnostic {
    pub fn new(reason: DiagnosticReason, widened_to: impl Into<String>) -> Self {
        Self {
            reason,
            widened_to: widened_to.into(),
        }
    }
}

impl std::fmt::Display for RewriteDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type widened: {} -> {}", self.reason, self.widened_to)
    }
}

// Thread-local storage for diagnostics collector state
thread_local! {
    static DIAGNOSTICS_ENABLED: RefCell<bool> = const { RefCell::new(false) };
    static DIAGNOSTICS: RefCell<Vec<RewriteDiagnostic>> = const { RefCell::new(Vec::new()) };
}

/// Collector for inference and rewrite diagnostics.
///
/// Uses thread-local storage, so diagnostics from one thread never leak into
/// another. Disabled by default.
#[derive(Debug)]
pub struct DiagnosticsCollector;

impl DiagnosticsCollector {
    pub fn enable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = true;
        });
    }

    pub fn disable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = false;
        });
    }

    pub fn is_enabled() -> bool {
        DIAGNOSTICS_ENABLED.with(|enabled| *enabled.borrow())
    }

    /// Add a diagnostic to the collection (if enabled).
    pub fn emit(diagnostic: RewriteDiagnostic) {
        tracing::debug!(reason = %diagnostic.reason, widened_to = %diagnostic.widened_to, "type widened");
        if Self::is_enabled() {
            DIAGNOSTICS.with(|diags| {
                diags.borrow_mut().push(diagnostic);
            });
        }
    }

    /// Take all collected diagnostics, clearing the collection.
    pub fn take() -> Vec<RewriteDiagnostic> {
        DIAGNOSTICS.with(|diags| std::mem::take(&mut *diags.borrow_mut()))
    }

    pub fn clear() {
        DIAGNOSTICS.with(|diags| {
            diags.borrow_mut().clear();
        });
    }

    pub fn count() -> usize {
        DIAGNOSTICS.with(|diags| diags.borrow().len())
    }
}

/// Emit a diagnostic for `reason` with the type it produced.
pub(crate) fn emit(reason: DiagnosticReason, widened_to: &impl std::fmt::Display) {
    DiagnosticsCollector::emit(RewriteDiagnostic::new(reason, widened_to.to_string()));
}
