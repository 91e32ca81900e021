//! Call-trace aggregation.
//!
//! A [`CallTrace`] holds the types seen during one call of a function: one
//! per argument, the return value, and whatever the call yielded.
//! [`shrink_traces`] folds many traces of the same function into a
//! [`TracedSignature`] with one shrunk type per slot.

use std::collections::BTreeMap;
use std::fmt;

use crate::infer::Inferencer;
use crate::rewrite::TypeRewriter;
use crate::shrink::shrink;
use crate::types::TypeExpr;
use crate::value::Value;

/// Types observed during a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTrace {
    function: String,
    inferencer: Inferencer,
    /// Argument types in parameter order.
    arg_types: Vec<(String, TypeExpr)>,
    return_type: Option<TypeExpr>,
    yield_type: Option<TypeExpr>,
}

impl CallTrace {
    pub fn new(function: impl Into<String>) -> Self {
        Self::with_inferencer(function, Inferencer::default())
    }

    pub fn with_inferencer(function: impl Into<String>, inferencer: Inferencer) -> Self {
        Self {
            function: function.into(),
            inferencer,
            arg_types: Vec::new(),
            return_type: None,
            yield_type: None,
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn arg_types(&self) -> &[(String, TypeExpr)] {
        &self.arg_types
    }

    pub fn return_type(&self) -> Option<&TypeExpr> {
        self.return_type.as_ref()
    }

    pub fn yield_type(&self) -> Option<&TypeExpr> {
        self.yield_type.as_ref()
    }

    /// Record the value bound to parameter `name`.
    pub fn record_arg(&mut self, name: impl Into<String>, value: &Value) {
        let ty = self.inferencer.infer(value);
        self.set_arg_type(name, ty);
    }

    /// Set the type of parameter `name`, replacing any earlier record.
    pub fn set_arg_type(&mut self, name: impl Into<String>, ty: TypeExpr) {
        let name = name.into();
        match self.arg_types.iter_mut().find(|(arg, _)| *arg == name) {
            Some((_, slot)) => *slot = ty,
            None => self.arg_types.push((name, ty)),
        }
    }

    pub fn record_return(&mut self, value: &Value) {
        self.return_type = Some(self.inferencer.infer(value));
    }

    /// Record one yielded value. Repeated yields accumulate into a union.
    pub fn record_yield(&mut self, value: &Value) {
        let ty = self.inferencer.infer(value);
        self.yield_type = Some(match self.yield_type.take() {
            Some(previous) => shrink([previous, ty]),
            None => ty,
        });
    }
}

/// One type per slot of a function, shrunk over many calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedSignature {
    pub function: String,
    pub arg_types: Vec<(String, TypeExpr)>,
    /// `None` when no call returned.
    pub return_type: Option<TypeExpr>,
}

impl TracedSignature {
    pub fn arg_type(&self, name: &str) -> Option<&TypeExpr> {
        self.arg_types
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, ty)| ty)
    }

    /// The same signature with every slot passed through `rewriter`.
    pub fn rewritten(&self, rewriter: &dyn TypeRewriter) -> TracedSignature {
        TracedSignature {
            function: self.function.clone(),
            arg_types: self
                .arg_types
                .iter()
                .map(|(name, ty)| (name.clone(), rewriter.rewrite(ty)))
                .collect(),
            return_type: self.return_type.as_ref().map(|ty| rewriter.rewrite(ty)),
        }
    }
}

impl fmt::Display for TracedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (name, ty)) in self.arg_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, ty)?;
        }
        write!(f, ")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}

/// Fold traces of one function into a signature.
///
/// The function name is taken from the first trace; `None` when there are no
/// traces. If any call yielded, the return type becomes
/// `Generator[yield, None, return]`, with `None` standing in for a missing
/// return.
pub fn shrink_traces<'a>(traces: impl IntoIterator<Item = &'a CallTrace>) -> Option<TracedSignature> {
    let mut traces = traces.into_iter().peekable();
    let function = traces.peek()?.function.clone();

    let mut arg_types: Vec<(String, Vec<TypeExpr>)> = Vec::new();
    let mut return_types = Vec::new();
    let mut yield_types = Vec::new();
    let mut count = 0usize;
    for trace in traces {
        count += 1;
        for (name, ty) in &trace.arg_types {
            match arg_types.iter_mut().find(|(arg, _)| arg == name) {
                Some((_, seen)) => seen.push(ty.clone()),
                None => arg_types.push((name.clone(), vec![ty.clone()])),
            }
        }
        return_types.extend(trace.return_type.iter().cloned());
        yield_types.extend(trace.yield_type.iter().cloned());
    }

    let arg_types = arg_types
        .into_iter()
        .map(|(name, types)| (name, shrink(types)))
        .collect();
    let return_type = (!return_types.is_empty()).then(|| shrink(return_types));
    let return_type = if yield_types.is_empty() {
        return_type
    } else {
        Some(TypeExpr::generator(
            shrink(yield_types),
            TypeExpr::none(),
            return_type.unwrap_or_else(TypeExpr::none),
        ))
    };

    tracing::trace!(function = %function, traces = count, "shrunk call traces");
    Some(TracedSignature {
        function,
        arg_types,
        return_type,
    })
}

/// Group traces by function name.
pub fn group_traces(traces: impl IntoIterator<Item = CallTrace>) -> BTreeMap<String, Vec<CallTrace>> {
    let mut groups: BTreeMap<String, Vec<CallTrace>> = BTreeMap::new();
    for trace in traces {
        groups.entry(trace.function.clone()).or_default().push(trace);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_arg_replaces() {
        let mut trace = CallTrace::new("f");
        trace.record_arg("a", &Value::Int(1));
        trace.record_arg("b", &Value::str("x"));
        trace.record_arg("a", &Value::str("y"));
        assert_eq!(
            trace.arg_types(),
            &[
                ("a".to_string(), TypeExpr::str()),
                ("b".to_string(), TypeExpr::str()),
            ]
        );
    }

    #[test]
    fn test_record_yield_accumulates() {
        let mut trace = CallTrace::new("gen");
        trace.record_yield(&Value::Int(1));
        trace.record_yield(&Value::Int(2));
        assert_eq!(trace.yield_type(), Some(&TypeExpr::int()));
        trace.record_yield(&Value::str("x"));
        assert_eq!(
            trace.yield_type(),
            Some(&TypeExpr::try_union([TypeExpr::int(), TypeExpr::str()]).unwrap())
        );
    }

    #[test]
    fn test_inferencer_cap_applies() {
        let mut trace = CallTrace::with_inferencer("f", Inferencer::new(Some(0)));
        trace.record_arg("cfg", &Value::str_dict([("a", Value::Int(1))]));
        assert_eq!(
            trace.arg_types()[0].1,
            TypeExpr::dict(TypeExpr::str(), TypeExpr::int())
        );

        let mut uncapped = CallTrace::new("f");
        uncapped.record_arg("cfg", &Value::str_dict([("a", Value::Int(1))]));
        assert_eq!(
            uncapped.arg_types()[0].1,
            TypeExpr::Shape(ShapeType::anonymous([("a", TypeExpr::int())]))
        );
    }

    #[test]
    fn test_shrink_no_traces() {
        assert_eq!(shrink_traces(&Vec::<CallTrace>::new()), None);
    }

    #[test]
    fn test_shrink_traces_without_return() {
        let mut trace = CallTrace::new("f");
        trace.record_arg("a", &Value::Int(1));
        let sig = shrink_traces([&trace]).unwrap();
        assert_eq!(sig.return_type, None);
        assert_eq!(sig.to_string(), "(a: int)");
    }

    #[test]
    fn test_display() {
        let sig = TracedSignature {
            function: "f".to_string(),
            arg_types: vec![
                ("a".to_string(), TypeExpr::int()),
                ("b".to_string(), TypeExpr::str()),
            ],
            return_type: Some(TypeExpr::none()),
        };
        assert_eq!(sig.to_string(), "(a: int, b: str) -> None");
        assert_eq!(sig.arg_type("b"), Some(&TypeExpr::str()));
        assert_eq!(sig.arg_type("c"), None);
    }
}
