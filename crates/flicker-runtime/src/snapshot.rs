//! Field snapshot capture.
//!
//! Pure transformation: tracked inputs in, ordered [`FieldSnapshot`] sequence
//! out. No shared state, no filtering of values that look unchanged.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use flicker_types::{FieldSnapshot, StabilityClassifier, TypeDescriptor};

/// Trailing parameters the host framework appends to every instrumented
/// function. Never user-meaningful; [`snapshot_invocation`] drops exactly this
/// many from the end.
pub const SYNTHETIC_TAIL_PARAMS: usize = 2;

/// One tracked input as captured at a call site, before stability
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedValue {
    pub name: String,
    pub type_descriptor: TypeDescriptor,
    pub value_display: String,
    pub value_identity: u64,
}

impl TrackedValue {
    /// Captures `value` via its `Display` rendering and `Hash` identity.
    pub fn capture<T>(name: impl Into<String>, type_descriptor: TypeDescriptor, value: &T) -> Self
    where
        T: fmt::Display + Hash + ?Sized,
    {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        Self {
            name: name.into(),
            type_descriptor,
            value_display: value.to_string(),
            value_identity: hasher.finish(),
        }
    }

    /// Builds a tracked value from pre-computed parts, for callers that
    /// render or hash through another scheme.
    pub fn from_parts(
        name: impl Into<String>,
        type_descriptor: TypeDescriptor,
        value_display: impl Into<String>,
        value_identity: u64,
    ) -> Self {
        Self {
            name: name.into(),
            type_descriptor,
            value_display: value_display.into(),
            value_identity,
        }
    }
}

/// Builds the ordered snapshot sequence for `values`, classifying each
/// declared type through `classifier`. Unconditional and total: every input
/// yields exactly one snapshot, in input order.
pub fn snapshot_fields(
    values: &[TrackedValue],
    classifier: &dyn StabilityClassifier,
) -> Vec<FieldSnapshot> {
    values
        .iter()
        .map(|value| {
            FieldSnapshot::new(
                value.name.clone(),
                value.value_display.clone(),
                value.value_identity,
                classifier.classify(&value.type_descriptor),
            )
        })
        .collect()
}

/// Call-site entry point: strips the framework-injected tail parameters and
/// any `$`-prefixed synthetic names, then snapshots the rest.
pub fn snapshot_invocation(
    values: &[TrackedValue],
    classifier: &dyn StabilityClassifier,
) -> Vec<FieldSnapshot> {
    let tracked_len = values.len().saturating_sub(SYNTHETIC_TAIL_PARAMS);
    let user_values: Vec<TrackedValue> = values[..tracked_len]
        .iter()
        .filter(|value| !value.name.starts_with('$'))
        .cloned()
        .collect();
    snapshot_fields(&user_values, classifier)
}

#[cfg(test)]
mod tests {
    use flicker_types::{Stability, UnknownStability};

    use super::*;

    struct CertainForInt;

    impl StabilityClassifier for CertainForInt {
        fn classify(&self, ty: &TypeDescriptor) -> Stability {
            if ty.as_str() == "i32" {
                Stability::Certain
            } else {
                Stability::Unknown
            }
        }
    }

    fn tracked(name: &str, ty: &str, display: &str, identity: u64) -> TrackedValue {
        TrackedValue::from_parts(name, TypeDescriptor::new(ty), display, identity)
    }

    #[test]
    fn capture_uses_display_and_hash() {
        let value = TrackedValue::capture("count", TypeDescriptor::new("i32"), &42i32);
        assert_eq!(value.name, "count");
        assert_eq!(value.value_display, "42");

        let again = TrackedValue::capture("count", TypeDescriptor::new("i32"), &42i32);
        assert_eq!(value.value_identity, again.value_identity);

        let different = TrackedValue::capture("count", TypeDescriptor::new("i32"), &43i32);
        assert_ne!(value.value_identity, different.value_identity);
    }

    #[test]
    fn snapshot_fields_preserves_order_and_classifies() {
        let values = [
            tracked("count", "i32", "1", 10),
            tracked("label", "String", "hi", 20),
        ];
        let snapshots = snapshot_fields(&values, &CertainForInt);

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].name, "count");
        assert_eq!(snapshots[0].stability, Stability::Certain);
        assert_eq!(snapshots[1].name, "label");
        assert_eq!(snapshots[1].stability, Stability::Unknown);
    }

    #[test]
    fn invocation_drops_framework_tail() {
        let values = [
            tracked("count", "i32", "1", 10),
            tracked("$composer", "Composer", "<composer>", 0),
            tracked("$changed", "i32", "0", 0),
        ];
        let snapshots = snapshot_invocation(&values, &UnknownStability);

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].name, "count");
    }

    #[test]
    fn invocation_skips_synthetic_names_before_the_tail() {
        let values = [
            tracked("count", "i32", "1", 10),
            tracked("$default", "i32", "0", 0),
            tracked("label", "String", "hi", 20),
            tracked("$composer", "Composer", "<composer>", 0),
            tracked("$changed", "i32", "0", 0),
        ];
        let snapshots = snapshot_invocation(&values, &UnknownStability);

        let names: Vec<_> = snapshots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["count", "label"]);
    }

    #[test]
    fn invocation_with_only_synthetic_params_is_empty() {
        let values = [
            tracked("$composer", "Composer", "<composer>", 0),
            tracked("$changed", "i32", "0", 0),
        ];
        assert!(snapshot_invocation(&values, &UnknownStability).is_empty());
        assert!(snapshot_invocation(&values[..1], &UnknownStability).is_empty());
        assert!(snapshot_invocation(&[], &UnknownStability).is_empty());
    }
}
