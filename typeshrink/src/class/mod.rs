//! Nominal classes and their ancestry.
//!
//! A [`Class`] is the nominal half of the type model: the runtime class of an
//! observed value, or a class object observed as a value. Classes are
//! identified by `(module, qualname)`; the bases are only consulted when
//! walking ancestry.
//!
//! ```text
//! object
//!  ├── int
//!  │    └── bool
//!  ├── dict
//!  │    └── collections.defaultdict
//!  └── <user classes>
//! ```
//!
//! # Sub-modules
//!
//! - `builtins`: the fixed table of builtin classes

pub mod builtins;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{TypeError, TypeResult};

/// Module name shared by all builtin classes.
pub const BUILTINS_MODULE: &str = "builtins";

#[derive(Debug)]
struct ClassData {
    module: String,
    qualname: String,
    bases: Vec<Class>,
}

/// A shared handle to a nominal class.
#[derive(Clone)]
pub struct Class(Arc<ClassData>);

impl Class {
    /// Declare a class. A class declared without bases derives from `object`.
    pub fn new(module: impl Into<String>, qualname: impl Into<String>, bases: Vec<Class>) -> Self {
        let bases = if bases.is_empty() {
            vec![builtins::object()]
        } else {
            bases
        };
        Self::with_bases(module.into(), qualname.into(), bases)
    }

    pub(crate) fn with_bases(module: String, qualname: String, bases: Vec<Class>) -> Self {
        Class(Arc::new(ClassData {
            module,
            qualname,
            bases,
        }))
    }

    pub fn module(&self) -> &str {
        &self.0.module
    }

    pub fn qualname(&self) -> &str {
        &self.0.qualname
    }

    /// Direct bases, in declaration order.
    pub fn bases(&self) -> &[Class] {
        &self.0.bases
    }

    /// `module.qualname`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module(), self.qualname())
    }

    pub fn is_builtin(&self) -> bool {
        self.module() == BUILTINS_MODULE
    }

    /// True for the universal base class.
    pub fn is_object(&self) -> bool {
        self.is_builtin() && self.qualname() == "object"
    }

    /// True for the class of the null value.
    pub fn is_none_type(&self) -> bool {
        self.is_builtin() && self.qualname() == "NoneType"
    }

    /// C3 linearization of this class and its ancestors, narrowest first.
    ///
    /// # Examples
    /// ```
    /// use typeshrink::class::builtins;
    ///
    /// let mro = builtins::bool_().mro().unwrap();
    /// let names: Vec<&str> = mro.iter().map(|c| c.qualname()).collect();
    /// assert_eq!(names, ["bool", "int", "object"]);
    /// ```
    pub fn mro(&self) -> TypeResult<Vec<Class>> {
        let mut pending: Vec<Vec<Class>> = self
            .bases()
            .iter()
            .map(Class::mro)
            .collect::<TypeResult<_>>()?;
        pending.push(self.bases().to_vec());

        let mut linearized = vec![self.clone()];
        loop {
            pending.retain(|seq| !seq.is_empty());
            if pending.is_empty() {
                return Ok(linearized);
            }
            // A good head appears in no tail.
            let head = pending
                .iter()
                .map(|seq| &seq[0])
                .find(|candidate| !pending.iter().any(|seq| seq[1..].contains(*candidate)))
                .cloned();
            let Some(head) = head else {
                return Err(TypeError::InconsistentHierarchy {
                    class: self.qualified_name(),
                });
            };
            for seq in pending.iter_mut() {
                if seq[0] == head {
                    seq.remove(0);
                }
            }
            linearized.push(head);
        }
    }

    /// Check if `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> TypeResult<bool> {
        if self == other {
            return Ok(true);
        }
        Ok(self.mro()?.contains(other))
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.module() == other.module() && self.qualname() == other.qualname())
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module().hash(state);
        self.qualname().hash(state);
    }
}

impl PartialOrd for Class {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Class {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.module(), self.qualname()).cmp(&(other.module(), other.qualname()))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.qualified_name())
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none_type() {
            write!(f, "None")
        } else if self.is_builtin() {
            write!(f, "{}", self.qualname())
        } else {
            write!(f, "{}.{}", self.module(), self.qualname())
        }
    }
}

impl Serialize for Class {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.qualified_name())
    }
}
