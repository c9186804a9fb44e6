use std::fmt;

use facet::Facet;

use crate::FieldSnapshot;

/// One tracked field that differed between the previous and the current
/// invocation, in (previous, current) order.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct ChangedField {
    pub previous: FieldSnapshot,
    pub current: FieldSnapshot,
}

/// Why a tracked function was recomputed. Exactly one variant is produced per
/// invalidation-table query.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum InvalidationReason {
    /// No prior record existed; first invocation seen by this table.
    Invalidate,
    /// These tracked fields differ from the previous invocation, in the new
    /// sequence's order.
    FieldChanged(Vec<ChangedField>),
    /// Recomputation was requested but no tracked field differs: something
    /// external (untracked mutable state) triggered it.
    Unknown,
}

impl fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalidate => f.write_str("Invalidate"),
            Self::Unknown => f.write_str("Unknown(no tracked field changed)"),
            Self::FieldChanged(changed) => {
                writeln!(f, "FieldChanged(")?;
                writeln!(f, "  [Parameters]")?;
                for (index, field) in changed.iter().enumerate() {
                    writeln!(
                        f,
                        "    {}. {} <{}>",
                        index + 1,
                        field.current.name,
                        field.current.stability,
                    )?;
                    writeln!(
                        f,
                        "      Old: {} ({})",
                        field.previous.value_display, field.previous.value_identity,
                    )?;
                    writeln!(
                        f,
                        "      New: {} ({})",
                        field.current.value_display, field.current.value_identity,
                    )?;
                }
                writeln!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stability;

    #[test]
    fn field_changed_renders_parameters_block() {
        let reason = InvalidationReason::FieldChanged(vec![
            ChangedField {
                previous: FieldSnapshot::new("name", "value", 0, Stability::Certain),
                current: FieldSnapshot::new("name", "new value", 1, Stability::Certain),
            },
            ChangedField {
                previous: FieldSnapshot::new("name2", "value2", 10, Stability::Runtime),
                current: FieldSnapshot::new("name2", "new value2", 11, Stability::Runtime),
            },
        ]);

        let expected = "\
FieldChanged(
  [Parameters]
    1. name <Certain>
      Old: value (0)
      New: new value (1)
    2. name2 <Runtime>
      Old: value2 (10)
      New: new value2 (11)
)
";
        assert_eq!(reason.to_string(), expected);
    }

    #[test]
    fn scalar_variants_render_single_line() {
        assert_eq!(InvalidationReason::Invalidate.to_string(), "Invalidate");
        assert_eq!(
            InvalidationReason::Unknown.to_string(),
            "Unknown(no tracked field changed)",
        );
    }
}
