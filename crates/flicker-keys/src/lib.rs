//! Build-time durable key assignment.
//!
//! One [`KeyPass`] exists per compilation unit. The code transformer walks the
//! unit's declarations single-threaded, calls [`KeyPass::assign`] once per
//! trackable function, and drops the pass when the unit is done. The pass owns
//! all mutable state (used-key set, identity map); nothing here is a process
//! global.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use flicker_types::{DurableKey, FunctionId, FunctionLocation};

/// Placeholder for lambdas whose enclosing declaration could not be resolved.
pub const ANONYMOUS_NAME: &str = "<anonymous>";

/// Synthesizes the display name for an anonymous function.
///
/// Lambdas embed the enclosing named function so two anonymous bodies in
/// different hosts never share a name; when resolution of the host failed the
/// fixed placeholder is used.
pub fn anonymous_name(enclosing: Option<&str>) -> String {
    match enclosing {
        Some(host) => format!("{ANONYMOUS_NAME} in {host}"),
        None => ANONYMOUS_NAME.to_owned(),
    }
}

/// Resolved signature of one trackable function, as handed over by the code
/// transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Declared name, or a name from [`anonymous_name`].
    pub name: String,
    /// Parameter type names, in declaration order.
    pub parameter_types: Vec<String>,
    /// Return type name.
    pub return_type: String,
    /// Enclosing qualified package.
    pub package: String,
    /// Source file name.
    pub file: String,
    /// 1-based source line of the declaration.
    pub line: u32,
    /// 1-based source column of the declaration.
    pub column: u32,
}

impl FunctionSignature {
    /// The candidate key string. Deterministic: unchanged source yields the
    /// same candidate on every pass, and distinct signatures (arity, types,
    /// return type, package, or file) yield distinct candidates.
    pub fn key_candidate(&self) -> String {
        format!(
            "fun-{}({}){}/pkg-{}/file-{}",
            self.name,
            self.parameter_types.join(","),
            self.return_type,
            self.package,
            self.file,
        )
    }

    pub fn location(&self) -> FunctionLocation {
        FunctionLocation {
            function: self.name.clone(),
            package: self.package.clone(),
            file: self.file.clone(),
            line: self.line,
            column: self.column,
        }
    }
}

/// Two functions produced the same candidate key. Fatal to instrumentation of
/// the compilation unit; carries both source locations for the diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    pub key_name: String,
    pub first: FunctionLocation,
    pub second: FunctionLocation,
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate durable key `{}`: first assigned to {}, collides with {}",
            self.key_name, self.first, self.second,
        )
    }
}

impl Error for DuplicateKeyError {}

/// Per-compilation-unit key assignment pass.
#[derive(Debug, Default)]
pub struct KeyPass {
    /// Candidate string -> location that first claimed it.
    used: HashMap<String, FunctionLocation>,
    /// Write-once identity map. Re-visiting a node returns the existing key.
    assigned: HashMap<FunctionId, DurableKey>,
}

impl KeyPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a durable key to `id`.
    ///
    /// Idempotent per identity: a second call for an already-registered `id`
    /// returns the existing key untouched, so re-visitation of the same node
    /// is a no-op. A *different* identity producing an already-used candidate
    /// string is a [`DuplicateKeyError`].
    pub fn assign(
        &mut self,
        id: FunctionId,
        signature: &FunctionSignature,
    ) -> Result<DurableKey, DuplicateKeyError> {
        if let Some(existing) = self.assigned.get(&id) {
            return Ok(existing.clone());
        }

        let candidate = signature.key_candidate();
        if let Some(first) = self.used.get(&candidate) {
            return Err(DuplicateKeyError {
                key_name: candidate,
                first: first.clone(),
                second: signature.location(),
            });
        }

        let key = DurableKey {
            key_name: candidate.clone(),
            user_provided_name: None,
            location: signature.location(),
        };
        tracing::trace!(key = %key.key_name, %id, "assigned durable key");
        self.used.insert(candidate, signature.location());
        self.assigned.insert(id, key.clone());
        Ok(key)
    }

    /// Looks up the key previously assigned to `id`, if any.
    pub fn lookup(&self, id: FunctionId) -> Option<&DurableKey> {
        self.assigned.get(&id)
    }

    /// All key names assigned so far, in no particular order.
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.used.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Hands the identity map off for runtime registration; the pass's
    /// duplicate-key set is discarded with it.
    pub fn into_assignments(self) -> HashMap<FunctionId, DurableKey> {
        self.assigned
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn signature(name: &str, params: &[&str], line: u32) -> FunctionSignature {
        FunctionSignature {
            name: name.to_owned(),
            parameter_types: params.iter().map(|p| (*p).to_owned()).collect(),
            return_type: "Unit".to_owned(),
            package: "app.screens".to_owned(),
            file: "Screens.kt".to_owned(),
            line,
            column: 1,
        }
    }

    #[test]
    fn candidate_encodes_signature_package_and_file() {
        let sig = signature("Counter", &["Int", "String"], 10);
        assert_eq!(
            sig.key_candidate(),
            "fun-Counter(Int,String)Unit/pkg-app.screens/file-Screens.kt",
        );
    }

    #[test]
    fn overloads_get_distinct_keys() {
        // foo(), foo(x: Int), foo(x: Int, y: Int) in one file.
        let mut pass = KeyPass::new();
        let keys: Vec<_> = [
            signature("foo", &[], 1),
            signature("foo", &["Int"], 2),
            signature("foo", &["Int", "Int"], 3),
        ]
        .iter()
        .map(|sig| {
            pass.assign(FunctionId::next_process_local(), sig)
                .expect("distinct arity must not collide")
        })
        .collect();

        let distinct: BTreeSet<_> = keys.iter().map(|k| k.key_name.as_str()).collect();
        assert_eq!(distinct.len(), 3);
        assert!(keys[0].key_name.contains("fun-foo()Unit"));
        assert!(keys[1].key_name.contains("fun-foo(Int)Unit"));
        assert!(keys[2].key_name.contains("fun-foo(Int,Int)Unit"));
    }

    #[test]
    fn reassignment_is_deterministic() {
        // Two passes over unchanged declarations yield identical key sets.
        let declarations = [
            signature("Header", &["String"], 1),
            signature("Body", &["Int", "Bool"], 8),
            signature("Footer", &[], 20),
        ];

        let run = || {
            let mut pass = KeyPass::new();
            for sig in &declarations {
                pass.assign(FunctionId::next_process_local(), sig)
                    .expect("no collisions in this set");
            }
            pass.key_names().map(str::to_owned).collect::<BTreeSet<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn identical_signatures_collide() {
        // Same name, parameter types, return type, package, and file.
        let mut pass = KeyPass::new();
        let first = signature("Counter", &["Int"], 4);
        let second = signature("Counter", &["Int"], 30);

        pass.assign(FunctionId::next_process_local(), &first)
            .expect("first assignment succeeds");
        let err = pass
            .assign(FunctionId::next_process_local(), &second)
            .expect_err("identical candidate must be a duplicate-key error");

        assert_eq!(err.key_name, first.key_candidate());
        assert_eq!(err.first.line, 4);
        assert_eq!(err.second.line, 30);
        let rendered = err.to_string();
        assert!(rendered.contains("duplicate durable key"));
        assert!(rendered.contains("first assigned to Counter at Screens.kt:4:1"));
        assert!(rendered.contains("collides with Counter at Screens.kt:30:1"));
    }

    #[test]
    fn revisiting_the_same_identity_is_a_noop() {
        let mut pass = KeyPass::new();
        let id = FunctionId::next_process_local();
        let sig = signature("Counter", &["Int"], 4);

        let first = pass.assign(id, &sig).expect("first assignment succeeds");
        let second = pass
            .assign(id, &sig)
            .expect("re-visitation must not report a duplicate");
        assert_eq!(first, second);
        assert_eq!(pass.len(), 1);
    }

    #[test]
    fn anonymous_names_embed_the_enclosing_function() {
        assert_eq!(
            anonymous_name(Some("app.screens.Counter")),
            "<anonymous> in app.screens.Counter",
        );
        assert_eq!(anonymous_name(None), "<anonymous>");
    }

    #[test]
    fn lookup_finds_assigned_keys_only() {
        let mut pass = KeyPass::new();
        let id = FunctionId::next_process_local();
        pass.assign(id, &signature("Header", &[], 1))
            .expect("assignment succeeds");

        assert!(pass.lookup(id).is_some());
        assert!(pass.lookup(FunctionId::next_process_local()).is_none());
    }
}
