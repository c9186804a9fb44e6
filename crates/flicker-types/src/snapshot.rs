use facet::Facet;

use crate::Stability;

/// One tracked input of one invocation: name, rendered value, identity hash,
/// and the classifier's stability judgment for its declared type.
#[derive(Facet, Debug, Clone)]
pub struct FieldSnapshot {
    /// Declared parameter (or tracked state) name.
    pub name: String,
    /// String rendering of the value at capture time.
    pub value_display: String,
    /// Identity hash of the value at capture time.
    pub value_identity: u64,
    /// Stability judgment for the declared type.
    pub stability: Stability,
}

impl FieldSnapshot {
    pub fn new(
        name: impl Into<String>,
        value_display: impl Into<String>,
        value_identity: u64,
        stability: Stability,
    ) -> Self {
        Self {
            name: name.into(),
            value_display: value_display.into(),
            value_identity,
            stability,
        }
    }
}

/// Equality is the diffing contract: name, rendered value, and identity hash.
/// Stability is informational and deliberately excluded.
impl PartialEq for FieldSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value_display == other.value_display
            && self.value_identity == other.value_identity
    }
}

impl Eq for FieldSnapshot {}

/// Latest ordered snapshot sequence recorded for one durable key. Order is
/// parameter order and is preserved between invocations for position-wise
/// diffing.
pub type InvocationRecord = Vec<FieldSnapshot>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_stability() {
        let a = FieldSnapshot::new("count", "1", 17, Stability::Certain);
        let b = FieldSnapshot::new("count", "1", 17, Stability::Unknown);
        assert_eq!(a, b);
    }

    #[test]
    fn equality_observes_name_display_and_identity() {
        let base = FieldSnapshot::new("count", "1", 17, Stability::Certain);
        assert_ne!(base, FieldSnapshot::new("total", "1", 17, Stability::Certain));
        assert_ne!(base, FieldSnapshot::new("count", "2", 17, Stability::Certain));
        assert_ne!(base, FieldSnapshot::new("count", "1", 18, Stability::Certain));
    }
}
