//! Record types with string keys.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::TypeExpr;

/// Name given to shapes synthesized by inference.
pub const ANONYMOUS_SHAPE_NAME: &str = "DUMMY_NAME";

/// A record whose field names are all known.
///
/// Two shapes are equal iff their names, totality and complete
/// field-to-type maps are equal. The order in which fields were observed
/// only affects rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeType {
    name: String,
    fields: BTreeMap<String, TypeExpr>,
    total: bool,
    #[serde(skip)]
    order: Vec<String>,
}

impl ShapeType {
    /// Fields render in key order.
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, TypeExpr>, total: bool) -> Self {
        let order = fields.keys().cloned().collect();
        Self {
            name: name.into(),
            fields,
            total,
            order,
        }
    }

    /// A total shape carrying the anonymous name. Fields keep the order they
    /// are first given in; a repeated name takes the last type.
    pub fn anonymous<K: Into<String>>(fields: impl IntoIterator<Item = (K, TypeExpr)>) -> Self {
        let mut map = BTreeMap::new();
        let mut order = Vec::new();
        for (name, ty) in fields {
            let name = name.into();
            if map.insert(name.clone(), ty).is_none() {
                order.push(name);
            }
        }
        Self {
            name: ANONYMOUS_SHAPE_NAME.to_string(),
            fields: map,
            total: true,
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &BTreeMap<String, TypeExpr> {
        &self.fields
    }

    /// Fields in observed order.
    pub fn ordered_fields(&self) -> impl Iterator<Item = (&str, &TypeExpr)> {
        self.order
            .iter()
            .filter_map(|name| self.fields.get_key_value(name))
            .map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn total(&self) -> bool {
        self.total
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_SHAPE_NAME
    }

    /// Same name, totality and field order, each field type transformed.
    pub fn map_fields(&self, mut f: impl FnMut(&TypeExpr) -> TypeExpr) -> Self {
        Self {
            name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), f(v)))
                .collect(),
            total: self.total,
            order: self.order.clone(),
        }
    }

    fn key(&self) -> (&str, &BTreeMap<String, TypeExpr>, bool) {
        (&self.name, &self.fields, self.total)
    }
}

impl PartialEq for ShapeType {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ShapeType {}

impl Hash for ShapeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for ShapeType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShapeType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl From<ShapeType> for TypeExpr {
    fn from(shape: ShapeType) -> Self {
        TypeExpr::Shape(shape)
    }
}
