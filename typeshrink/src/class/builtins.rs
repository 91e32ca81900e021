//! The builtin class table.
//!
//! Builtin classes are created once, on first use, and shared by every
//! caller so that ancestry walks over builtins never allocate new handles.

use once_cell::sync::Lazy;

use super::{Class, BUILTINS_MODULE};

#[derive(Debug)]
struct Builtins {
    object: Class,
    type_: Class,
    none_type: Class,
    int: Class,
    bool_: Class,
    float: Class,
    str_: Class,
    bytes: Class,
    list: Class,
    set: Class,
    dict: Class,
    tuple: Class,
    default_dict: Class,
    generator: Class,
    function: Class,
    builtin_function: Class,
    method: Class,
}

impl Builtins {
    fn new() -> Self {
        let object = Class::with_bases(BUILTINS_MODULE.to_string(), "object".to_string(), vec![]);
        let builtin = |name: &str, base: &Class| {
            Class::with_bases(BUILTINS_MODULE.to_string(), name.to_string(), vec![base.clone()])
        };
        let int = builtin("int", &object);
        let dict = builtin("dict", &object);
        Self {
            type_: builtin("type", &object),
            none_type: builtin("NoneType", &object),
            bool_: builtin("bool", &int),
            float: builtin("float", &object),
            str_: builtin("str", &object),
            bytes: builtin("bytes", &object),
            list: builtin("list", &object),
            set: builtin("set", &object),
            tuple: builtin("tuple", &object),
            default_dict: Class::with_bases(
                "collections".to_string(),
                "defaultdict".to_string(),
                vec![dict.clone()],
            ),
            generator: builtin("generator", &object),
            function: builtin("function", &object),
            builtin_function: builtin("builtin_function_or_method", &object),
            method: builtin("method", &object),
            int,
            dict,
            object,
        }
    }
}

static BUILTINS: Lazy<Builtins> = Lazy::new(Builtins::new);

/// The universal base class.
pub fn object() -> Class {
    BUILTINS.object.clone()
}

/// The class of class objects.
pub fn type_() -> Class {
    BUILTINS.type_.clone()
}

/// The class of the null value.
pub fn none_type() -> Class {
    BUILTINS.none_type.clone()
}

pub fn int() -> Class {
    BUILTINS.int.clone()
}

pub fn bool_() -> Class {
    BUILTINS.bool_.clone()
}

pub fn float() -> Class {
    BUILTINS.float.clone()
}

pub fn str_() -> Class {
    BUILTINS.str_.clone()
}

pub fn bytes() -> Class {
    BUILTINS.bytes.clone()
}

pub fn list() -> Class {
    BUILTINS.list.clone()
}

pub fn set() -> Class {
    BUILTINS.set.clone()
}

pub fn dict() -> Class {
    BUILTINS.dict.clone()
}

pub fn tuple() -> Class {
    BUILTINS.tuple.clone()
}

/// `collections.defaultdict`, a subclass of `dict`.
pub fn default_dict() -> Class {
    BUILTINS.default_dict.clone()
}

pub fn generator() -> Class {
    BUILTINS.generator.clone()
}

pub fn function() -> Class {
    BUILTINS.function.clone()
}

pub fn builtin_function() -> Class {
    BUILTINS.builtin_function.clone()
}

pub fn method() -> Class {
    BUILTINS.method.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_shared() {
        assert_eq!(int(), int());
        assert!(int().is_builtin());
        assert!(!default_dict().is_builtin());
    }

    #[test]
    fn test_builtin_hierarchy() {
        assert!(object().bases().is_empty());
        assert!(object().is_object());
        assert_eq!(bool_().bases(), &[int()]);
        assert!(default_dict().is_subclass_of(&dict()).unwrap());
        assert!(!str_().is_subclass_of(&int()).unwrap());
    }

    #[test]
    fn test_none_type() {
        assert!(none_type().is_none_type());
        assert!(!int().is_none_type());
    }
}
