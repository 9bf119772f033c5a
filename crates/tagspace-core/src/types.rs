//! Tag-space type schema (C1): atomic, aggregate, compound, and placeholder types.
//!
//! A tag space is a tree of [`TagType`]s rooted at a single [`CompoundType`] (the
//! top-level type). Compound fields are stored in declaration order — a `Vec` of
//! `(name, TagType)` pairs, never a `HashMap` — because Slot Index enumeration
//! (see [`crate::slots`]) must iterate fields deterministically across runs.

use serde::{Deserialize, Serialize};

/// An atomic type: a named, closed set of named atomic values.
///
/// # Examples
///
/// ```rust
/// use tagspace_core::AtomicType;
///
/// let severity = AtomicType::new("Severity", ["Low", "Medium", "High"]);
/// assert!(severity.value_of("Medium").is_some());
/// assert!(severity.value_of("Critical").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicType {
    pub name: String,
    pub values: Vec<String>,
}

impl AtomicType {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Looks up a named atomic value. Returns `None` if `name` is not one of
    /// this type's declared values.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.values.iter().find(|v| v.as_str() == name).map(|v| v.as_str())
    }
}

/// An aggregate type: a named set-of-atomic-values type, with an item type that
/// must itself be atomic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateType {
    pub name: String,
    pub item: AtomicType,
}

impl AggregateType {
    pub fn new(name: impl Into<String>, item: AtomicType) -> Self {
        Self { name: name.into(), item }
    }
}

/// A compound type: a named field → type mapping, forming the tree structure of
/// the tag space. Field order is declaration order and is load-bearing (see
/// module docs); field names are unique within a compound type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundType {
    pub name: String,
    fields: Vec<(String, TagType)>,
}

impl CompoundType {
    /// Builds a compound type from an ordered list of fields.
    ///
    /// # Panics
    ///
    /// Panics if `fields` contains a duplicate field name — this is a schema
    /// construction error, not a runtime condition, since the tag-space parser
    /// (out of scope of this crate) is expected to reject duplicate fields
    /// before ever handing a `CompoundType` to this crate.
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = (String, TagType)>) -> Self {
        let fields: Vec<(String, TagType)> = fields.into_iter().collect();
        let mut seen = std::collections::HashSet::with_capacity(fields.len());
        for (field_name, _) in &fields {
            if !seen.insert(field_name.as_str()) {
                panic!("duplicate field name in compound type: {field_name}");
            }
        }
        Self { name: name.into(), fields }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(String, TagType)] {
        &self.fields
    }

    /// Looks up a field's type by name.
    pub fn field(&self, name: &str) -> Option<&TagType> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

/// A placeholder ("todo") type: named, carries no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderType {
    pub name: String,
}

impl PlaceholderType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A tag type: atomic, aggregate, compound, or placeholder.
///
/// The top-level type of any tag space is always a [`CompoundType`]; nested
/// compounds form the interior of the tree, with atomic/aggregate/placeholder
/// types at the leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TagType {
    Atomic(AtomicType),
    Aggregate(AggregateType),
    Compound(CompoundType),
    Placeholder(PlaceholderType),
}

impl TagType {
    pub fn name(&self) -> &str {
        match self {
            TagType::Atomic(t) => &t.name,
            TagType::Aggregate(t) => &t.name,
            TagType::Compound(t) => &t.name,
            TagType::Placeholder(t) => &t.name,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundType> {
        match self {
            TagType::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_atomic(&self) -> Option<&AtomicType> {
        match self {
            TagType::Atomic(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateType> {
        match self {
            TagType::Aggregate(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, TagType::Compound(_))
    }
}
