//! Property-based checks of merge semantics (§3): identity, idempotence, and
//! aggregate union being independent of assignment order, run over randomly
//! sampled label subsets rather than a handful of hand-picked cases.

use proptest::prelude::*;
use tagspace_core::{merge, merge_optional, AggregateType, AtomicType, CompoundType, TagType, TagValue, ValueBuilder};

fn tag_space() -> CompoundType {
    CompoundType::new(
        "Root",
        [
            (
                "severity".to_string(),
                TagType::Atomic(AtomicType::new("Severity", ["Low", "Medium", "High"])),
            ),
            (
                "labels".to_string(),
                TagType::Aggregate(AggregateType::new(
                    "Labels",
                    AtomicType::new("Label", ["Security", "Availability", "Data"]),
                )),
            ),
        ],
    )
}

fn build_labels(schema: &CompoundType, labels: &[&str]) -> TagValue {
    let mut builder = ValueBuilder::new(schema);
    for label in labels {
        builder.assign_aggregate("labels", label).unwrap();
    }
    builder.finish()
}

fn label_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(vec!["Security", "Availability", "Data"]), 0..4)
}

proptest! {
    #[test]
    fn merge_optional_none_is_identity(severity in prop::sample::select(vec!["Low", "Medium", "High"])) {
        let schema = tag_space();
        let mut builder = ValueBuilder::new(&schema);
        builder.assign_atomic("severity", severity).unwrap();
        let value = builder.finish();
        prop_assert_eq!(merge_optional(None, value.clone()).unwrap(), value);
    }

    #[test]
    fn merge_with_self_is_idempotent(labels in label_strategy()) {
        let schema = tag_space();
        let value = build_labels(&schema, &labels);
        let merged = merge(value.clone(), value.clone()).unwrap();
        prop_assert_eq!(merged, value);
    }

    #[test]
    fn aggregate_union_is_order_independent(mut labels in label_strategy()) {
        let schema = tag_space();
        let forward = build_labels(&schema, &labels);
        labels.reverse();
        let backward = build_labels(&schema, &labels);
        prop_assert_eq!(forward, backward);
    }
}
