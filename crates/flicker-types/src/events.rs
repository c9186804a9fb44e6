use std::fmt;

use facet::Facet;

use crate::{FunctionLocation, InvalidationReason};

/// How one recomposition of a tracked function was classified.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum InvalidationKind {
    /// The function body re-ran; the reason explains which input changed.
    Processed(InvalidationReason),
    /// The framework skipped the function (inputs deemed unchanged).
    Skipped,
}

/// One classified recomposition, forwarded to the configured listener.
///
/// `function.function` carries the effective display name: the user-provided
/// rename when one was set, else the declared name. Immutable once built.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub function: FunctionLocation,
    pub kind: InvalidationKind,
}

impl LogEvent {
    pub fn processed(function: FunctionLocation, reason: InvalidationReason) -> Self {
        Self {
            function,
            kind: InvalidationKind::Processed(reason),
        }
    }

    pub fn skipped(function: FunctionLocation) -> Self {
        Self {
            function,
            kind: InvalidationKind::Skipped,
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            InvalidationKind::Processed(reason) => write!(
                f,
                "<{}> invalidation processed: {}",
                self.function.function, reason
            ),
            InvalidationKind::Skipped => {
                write!(f, "<{}> invalidation skipped", self.function.function)
            }
        }
    }
}
