use std::fmt;

use facet::Facet;

/// Qualified name of a tracked value's declared type, as the host compiler
/// resolved it. Opaque to the runtime; only the stability classifier reads it.
#[derive(Facet, Debug, Clone, PartialEq, Eq, Hash)]
#[facet(transparent)]
pub struct TypeDescriptor(String);

impl TypeDescriptor {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self(qualified_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stability judgment for one tracked value's declared type.
///
/// Informational only: stability never participates in snapshot equality, so
/// a misclassification can degrade explanations but never diff results.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum Stability {
    /// Equality of the value can always be trusted.
    Certain,
    /// Stability is only decidable at runtime.
    Runtime,
    /// The classifier could not reach a judgment.
    Unknown,
    /// Stability follows the type parameter at this index.
    Parameter(u32),
    /// Stability is the combination of several component judgments.
    Combined(Vec<Stability>),
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Certain => f.write_str("Certain"),
            Self::Runtime => f.write_str("Runtime"),
            Self::Unknown => f.write_str("Unknown"),
            Self::Parameter(index) => write!(f, "Parameter({index})"),
            Self::Combined(parts) => {
                f.write_str("Combined(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// External capability boundary: maps a declared type to a [`Stability`].
///
/// Supplied by the host integration. Classification has no failure mode, only
/// degraded precision (`Stability::Unknown`).
pub trait StabilityClassifier: Send + Sync {
    fn classify(&self, ty: &TypeDescriptor) -> Stability;
}

/// Fallback classifier: every type is [`Stability::Unknown`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownStability;

impl StabilityClassifier for UnknownStability {
    fn classify(&self, _ty: &TypeDescriptor) -> Stability {
        Stability::Unknown
    }
}
