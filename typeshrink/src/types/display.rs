//! Canonical rendering for TypeExpr.

use std::fmt;

use super::{GenericKind, ShapeType, TypeExpr, UnionType};

fn join(f: &mut fmt::Formatter<'_>, items: impl IntoIterator<Item = impl fmt::Display>) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn fmt_generic(f: &mut fmt::Formatter<'_>, kind: GenericKind, args: &[TypeExpr]) -> fmt::Result {
    write!(f, "typing.{}[", kind.name())?;
    match kind {
        GenericKind::Tuple if args.is_empty() => write!(f, "()")?,
        GenericKind::HomogeneousTuple => {
            join(f, args)?;
            write!(f, ", ...")?;
        }
        _ => join(f, args)?,
    }
    write!(f, "]")
}

fn fmt_union(f: &mut fmt::Formatter<'_>, union: &UnionType) -> fmt::Result {
    if !union.iter().any(TypeExpr::is_none) {
        write!(f, "typing.Union[")?;
        join(f, union)?;
        return write!(f, "]");
    }
    // Optionals are unions with the null type; render the remainder.
    let rest: Vec<&TypeExpr> = union.iter().filter(|m| !m.is_none()).collect();
    write!(f, "typing.Optional[")?;
    if let [only] = rest.as_slice() {
        write!(f, "{}", only)?;
    } else {
        write!(f, "typing.Union[")?;
        join(f, &rest)?;
        write!(f, "]")?;
    }
    write!(f, "]")
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedDict('{}', {{", self.name())?;
        join(
            f,
            self.ordered_fields()
                .map(|(name, ty)| format!("'{}': {}", name, ty)),
        )?;
        write!(f, "}}")?;
        if !self.total() {
            write!(f, ", total=False")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Any => write!(f, "typing.Any"),
            TypeExpr::Class(class) => write!(f, "{}", class),
            TypeExpr::TypeOf(class) => write!(f, "typing.Type[{}]", class),
            TypeExpr::Callable => write!(f, "typing.Callable"),
            TypeExpr::Generic { kind, args } => fmt_generic(f, *kind, args),
            TypeExpr::Generator {
                yield_type,
                send_type,
                return_type,
            } => write!(
                f,
                "typing.Generator[{}, {}, {}]",
                yield_type, send_type, return_type
            ),
            TypeExpr::Iterator(element) => write!(f, "typing.Iterator[{}]", element),
            TypeExpr::Shape(shape) => write!(f, "{}", shape),
            TypeExpr::Union(union) => fmt_union(f, union),
        }
    }
}
