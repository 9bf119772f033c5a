//! Value Builder (C4): applies atomic/aggregate assignments to a root
//! compound value, walking the tag space's schema and creating intermediate
//! compound values along the way as needed.
//!
//! Grounded on the "resolve against a fixed structure, then mutate a fresh
//! accumulator" shape: the builder never mutates the schema, only the value
//! tree it is accumulating.

use crate::error::SchemaError;
use crate::types::{CompoundType, TagType};
use crate::values::{AggregateValue, AtomicValue, CompoundValue, TagValue};

/// Accumulates a [`TagValue::Compound`] against a fixed [`CompoundType`]
/// schema, one slot assignment at a time.
pub struct ValueBuilder<'schema> {
    root_type: &'schema CompoundType,
    root_value: CompoundValue,
}

impl<'schema> ValueBuilder<'schema> {
    pub fn new(root_type: &'schema CompoundType) -> Self {
        Self {
            root_type,
            root_value: CompoundValue::empty(root_type.name.clone()),
        }
    }

    /// Assigns a single atomic value at `path` (a dotted slot path already
    /// resolved to its canonical form by [`crate::SlotIndex`]).
    pub fn assign_atomic(&mut self, path: &str, value_name: &str) -> Result<(), SchemaError> {
        let segments: Vec<&str> = path.split('.').collect();
        let atomic_type = Self::resolve_atomic(self.root_type, path, &segments)?;
        if atomic_type.value_of(value_name).is_none() {
            return Err(SchemaError::UnknownAtomicValue {
                path: path.to_string(),
                type_name: atomic_type.name.clone(),
                value: value_name.to_string(),
            });
        }
        let atomic_type_name = atomic_type.name.clone();
        let value = TagValue::Atomic(AtomicValue::new(atomic_type_name, value_name));
        let (parent, last) = Self::descend(self.root_type, &mut self.root_value, &segments);
        parent.set(last, value);
        Ok(())
    }

    /// Adds a single value to the aggregate at `path`, unioning with whatever
    /// is already accumulated there.
    pub fn assign_aggregate(&mut self, path: &str, value_name: &str) -> Result<(), SchemaError> {
        let segments: Vec<&str> = path.split('.').collect();
        let aggregate_type = Self::resolve_aggregate(self.root_type, path, &segments)?;
        if aggregate_type.item.value_of(value_name).is_none() {
            return Err(SchemaError::UnknownAtomicValue {
                path: path.to_string(),
                type_name: aggregate_type.item.name.clone(),
                value: value_name.to_string(),
            });
        }
        let aggregate_type_name = aggregate_type.name.clone();
        let item_type_name = aggregate_type.item.name.clone();
        let addition = AggregateValue::new(
            aggregate_type_name,
            [AtomicValue::new(item_type_name, value_name)],
        );

        let (parent, last) = Self::descend(self.root_type, &mut self.root_value, &segments);
        match parent.get_mut(last) {
            Some(TagValue::Aggregate(current)) => current.union_in_place(&addition),
            Some(_) => unreachable!("schema check guarantees an aggregate slot"),
            None => parent.set(last, TagValue::Aggregate(addition)),
        }
        Ok(())
    }

    /// Consumes the builder, returning the accumulated root value.
    pub fn finish(self) -> TagValue {
        TagValue::Compound(self.root_value)
    }

    fn resolve_atomic<'a>(
        root: &'a CompoundType,
        path: &str,
        segments: &[&str],
    ) -> Result<&'a crate::types::AtomicType, SchemaError> {
        match Self::resolve_leaf(root, path, segments)? {
            TagType::Atomic(a) => Ok(a),
            other => Err(SchemaError::KindMismatch {
                path: path.to_string(),
                expected: "atomic",
                actual: other.kind_name(),
            }),
        }
    }

    fn resolve_aggregate<'a>(
        root: &'a CompoundType,
        path: &str,
        segments: &[&str],
    ) -> Result<&'a crate::types::AggregateType, SchemaError> {
        match Self::resolve_leaf(root, path, segments)? {
            TagType::Aggregate(a) => Ok(a),
            other => Err(SchemaError::KindMismatch {
                path: path.to_string(),
                expected: "aggregate",
                actual: other.kind_name(),
            }),
        }
    }

    fn resolve_leaf<'a>(
        root: &'a CompoundType,
        path: &str,
        segments: &[&str],
    ) -> Result<&'a TagType, SchemaError> {
        let Some((last, init)) = segments.split_last() else {
            return Err(SchemaError::NotALeaf { path: path.to_string() });
        };
        let mut current = root;
        for segment in init {
            match current.field(segment) {
                Some(TagType::Compound(inner)) => current = inner,
                Some(_) => {
                    return Err(SchemaError::NotACompound {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
                None => {
                    return Err(SchemaError::UnknownField {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
            }
        }
        let leaf = current.field(last).ok_or_else(|| SchemaError::UnknownField {
            path: path.to_string(),
            segment: last.to_string(),
        })?;
        if leaf.is_compound() {
            return Err(SchemaError::NotALeaf { path: path.to_string() });
        }
        if matches!(leaf, TagType::Placeholder(_)) {
            return Err(SchemaError::PlaceholderNotAssignable { path: path.to_string() });
        }
        Ok(leaf)
    }

    /// Descends `segments` from `root_value`, creating intermediate compound
    /// values as needed (named from `root_type`'s schema), and returns the
    /// parent compound value together with the final segment's field name.
    fn descend<'v, 's>(
        root_type: &CompoundType,
        root_value: &'v mut CompoundValue,
        segments: &[&'s str],
    ) -> (&'v mut CompoundValue, &'s str) {
        let Some((last, init)) = segments.split_last() else {
            unreachable!("caller always passes at least one segment");
        };
        let mut schema = root_type;
        let mut value = root_value;
        for segment in init {
            schema = schema
                .field(segment)
                .and_then(TagType::as_compound)
                .expect("path already schema-checked by resolve_leaf");
            value = value.get_or_insert_compound(segment, schema.name.clone());
        }
        (value, last)
    }
}

impl TagType {
    fn kind_name(&self) -> &'static str {
        match self {
            TagType::Atomic(_) => "atomic",
            TagType::Aggregate(_) => "aggregate",
            TagType::Compound(_) => "compound",
            TagType::Placeholder(_) => "placeholder",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AggregateType, AtomicType, PlaceholderType};

    fn tag_space() -> CompoundType {
        CompoundType::new(
            "Root",
            [
                (
                    "incident".to_string(),
                    TagType::Compound(CompoundType::new(
                        "Incident",
                        [
                            (
                                "severity".to_string(),
                                TagType::Atomic(AtomicType::new("Severity", ["Low", "High"])),
                            ),
                            (
                                "labels".to_string(),
                                TagType::Aggregate(AggregateType::new(
                                    "Labels",
                                    AtomicType::new("Label", ["Bug", "Feature"]),
                                )),
                            ),
                        ],
                    )),
                ),
                (
                    "followup".to_string(),
                    TagType::Placeholder(PlaceholderType::new("Todo")),
                ),
            ],
        )
    }

    #[test]
    fn assigns_atomic_through_intermediate_compound() {
        let schema = tag_space();
        let mut builder = ValueBuilder::new(&schema);
        builder.assign_atomic("incident.severity", "High").unwrap();
        let value = builder.finish();
        let root = value.as_compound().unwrap();
        let incident = root.get("incident").unwrap().as_compound().unwrap();
        assert_eq!(
            incident.get("severity"),
            Some(&TagValue::Atomic(AtomicValue::new("Severity", "High")))
        );
    }

    #[test]
    fn assigns_aggregate_values_union_across_calls() {
        let schema = tag_space();
        let mut builder = ValueBuilder::new(&schema);
        builder.assign_aggregate("incident.labels", "Bug").unwrap();
        builder.assign_aggregate("incident.labels", "Feature").unwrap();
        let value = builder.finish();
        let incident = value.as_compound().unwrap().get("incident").unwrap();
        match incident.as_compound().unwrap().get("labels").unwrap() {
            TagValue::Aggregate(a) => assert_eq!(a.values.len(), 2),
            _ => panic!("expected aggregate"),
        }
    }

    #[test]
    fn unknown_atomic_value_is_rejected() {
        let schema = tag_space();
        let mut builder = ValueBuilder::new(&schema);
        let err = builder.assign_atomic("incident.severity", "Critical").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownAtomicValue { .. }));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let schema = tag_space();
        let mut builder = ValueBuilder::new(&schema);
        let err = builder.assign_atomic("incident.priority", "High").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { .. }));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let schema = tag_space();
        let mut builder = ValueBuilder::new(&schema);
        let err = builder.assign_atomic("incident.labels", "Bug").unwrap_err();
        assert!(matches!(err, SchemaError::KindMismatch { .. }));
    }

    #[test]
    fn placeholder_slot_is_not_assignable() {
        let schema = tag_space();
        let mut builder = ValueBuilder::new(&schema);
        let err = builder.assign_atomic("followup", "anything").unwrap_err();
        assert!(matches!(err, SchemaError::PlaceholderNotAssignable { .. }));
    }
}
