use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use facet::Facet;

/// Compile-time location of a trackable function.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct FunctionLocation {
    /// Declared function name (or the synthesized anonymous name).
    pub function: String,
    /// Enclosing package / module path.
    pub package: String,
    /// Source file name.
    pub file: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
}

impl fmt::Display for FunctionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}:{}",
            self.function, self.file, self.line, self.column
        )
    }
}

/// Stable textual identity for a trackable function.
///
/// `key_name` survives recompilation of unchanged source and is unique within
/// one compilation unit; collisions are a build-time error in `flicker-keys`,
/// never silently resolved. `user_provided_name` may be overwritten later via
/// the runtime rename operation without touching `key_name`.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct DurableKey {
    pub key_name: String,
    pub user_provided_name: Option<String>,
    pub location: FunctionLocation,
}

impl DurableKey {
    /// Effective name for log events: the user-provided override when present,
    /// else the declared name.
    pub fn display_name(&self) -> &str {
        self.user_provided_name
            .as_deref()
            .unwrap_or(&self.location.function)
    }
}

/// Opaque identity of a function node within one compilation pass.
///
/// The code transformer allocates one per visited declaration and uses it for
/// key registration and the runtime rename lookup.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[facet(transparent)]
pub struct FunctionId(u64);

impl FunctionId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Allocates the next process-local id.
    pub fn next_process_local() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}
