//! Tag values (C2): runtime values conforming to a [`crate::TagType`].
//!
//! Equality and hashing on [`TagValue`] are defined so a `TagValue` can be used
//! directly as a `HashMap`/edge key by the decision-graph compiler (§9's
//! "consider-node edge matching" open question): atomic equality is
//! `(type, name)`, aggregate equality is set equality over the underlying
//! atomic values, and compound equality is field-wise with "unset" distinct
//! from any set value.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

/// A value bound to an [`crate::AtomicType`] by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomicValue {
    pub type_name: String,
    pub value: String,
}

impl AtomicValue {
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.value)
    }
}

/// A value bound to an [`crate::AggregateType`]: a set of atomic values, all of
/// the aggregate's item type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateValue {
    pub type_name: String,
    pub values: BTreeSet<AtomicValue>,
}

impl std::hash::Hash for AggregateValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        for v in &self.values {
            v.hash(state);
        }
    }
}

// `AtomicValue` needs `Ord` to live in a `BTreeSet`; derive it alongside `Eq`.
impl PartialOrd for AtomicValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AtomicValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.type_name, &self.value).cmp(&(&other.type_name, &other.value))
    }
}

impl AggregateValue {
    pub fn new(type_name: impl Into<String>, values: impl IntoIterator<Item = AtomicValue>) -> Self {
        Self {
            type_name: type_name.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn empty(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: BTreeSet::new(),
        }
    }

    /// Unions `other` into `self` in place.
    pub fn union_in_place(&mut self, other: &AggregateValue) {
        self.values.extend(other.values.iter().cloned());
    }
}

/// A value bound to a [`crate::CompoundType`]: a field → value mapping. A field
/// absent from `fields` is "unset" — distinct from being present with any value.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundValue {
    pub type_name: String,
    fields: HashMap<String, TagValue>,
}

impl Eq for CompoundValue {}

impl std::hash::Hash for CompoundValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        // HashMap iteration order is not stable, so hash a sorted projection.
        let mut entries: Vec<(&String, &TagValue)> = self.fields.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (k, v) in entries {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl CompoundValue {
    pub fn empty(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: HashMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&TagValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: TagValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<TagValue> {
        self.fields.remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &TagValue)> {
        self.fields.iter()
    }

    pub fn is_unset(&self, field: &str) -> bool {
        !self.fields.contains_key(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut TagValue> {
        self.fields.get_mut(field)
    }

    /// Returns the compound value at `field`, inserting an empty one named
    /// `type_name` if absent.
    ///
    /// # Panics
    ///
    /// Panics if `field` already holds a non-compound value — callers are
    /// expected to have schema-checked the path before descending.
    pub fn get_or_insert_compound(&mut self, field: &str, type_name: impl Into<String>) -> &mut CompoundValue {
        let entry = self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| TagValue::Compound(CompoundValue::empty(type_name)));
        entry
            .as_compound_mut()
            .expect("field already holds a non-compound value")
    }
}

/// A runtime tag value: atomic, aggregate, or compound.
///
/// Placeholder types carry no data and so have no corresponding `TagValue`
/// variant — a slot of placeholder type can never be assigned through the
/// value builder (§4.2); "todo" fields simply stay unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagValue {
    Atomic(AtomicValue),
    Aggregate(AggregateValue),
    Compound(CompoundValue),
}

impl TagValue {
    pub fn type_name(&self) -> &str {
        match self {
            TagValue::Atomic(v) => &v.type_name,
            TagValue::Aggregate(v) => &v.type_name,
            TagValue::Compound(v) => &v.type_name,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundValue> {
        match self {
            TagValue::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut CompoundValue> {
        match self {
            TagValue::Compound(c) => Some(c),
            _ => None,
        }
    }
}

/// Failure merging two [`TagValue`]s, per §3: atomic-atomic merge requires
/// equality.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("cannot merge atomic values of type {type_name}: {a} != {b}")]
    AtomicConflict {
        type_name: String,
        a: String,
        b: String,
    },
    #[error("cannot merge values of mismatched kind for type {type_name}")]
    KindMismatch { type_name: String },
    #[error("cannot merge values of different types: {a} vs {b}")]
    TypeMismatch { a: String, b: String },
}

/// Merges two tag values per §3's "Merge" rule: unset ⊔ v = v; atomic-atomic
/// requires equality; aggregate-aggregate unions; compound-compound recurses
/// field-wise.
pub fn merge(a: TagValue, b: TagValue) -> Result<TagValue, MergeError> {
    if a.type_name() != b.type_name() {
        return Err(MergeError::TypeMismatch {
            a: a.type_name().to_string(),
            b: b.type_name().to_string(),
        });
    }
    match (a, b) {
        (TagValue::Atomic(a), TagValue::Atomic(b)) => {
            if a == b {
                Ok(TagValue::Atomic(a))
            } else {
                Err(MergeError::AtomicConflict {
                    type_name: a.type_name,
                    a: a.value,
                    b: b.value,
                })
            }
        }
        (TagValue::Aggregate(mut a), TagValue::Aggregate(b)) => {
            a.union_in_place(&b);
            Ok(TagValue::Aggregate(a))
        }
        (TagValue::Compound(a), TagValue::Compound(b)) => Ok(TagValue::Compound(merge_compound(a, b)?)),
        (a, _) => Err(MergeError::KindMismatch {
            type_name: a.type_name().to_string(),
        }),
    }
}

fn merge_compound(mut a: CompoundValue, b: CompoundValue) -> Result<CompoundValue, MergeError> {
    for (field, b_value) in b.fields {
        let merged = match a.remove(&field) {
            None => b_value,
            Some(a_value) => merge(a_value, b_value)?,
        };
        a.set(field, merged);
    }
    Ok(a)
}

/// Merges an optional accumulated value with an incoming one, implementing
/// "unset ⊔ v = v" for the top-level merge the interpreter performs on `Set`
/// nodes.
pub fn merge_optional(a: Option<TagValue>, b: TagValue) -> Result<TagValue, MergeError> {
    match a {
        None => Ok(b),
        Some(a) => merge(a, b),
    }
}
