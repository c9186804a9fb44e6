//! The invalidation table: single source of truth for each durable key's most
//! recent invocation, plus the runtime function registry used for rename and
//! log-event naming.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use parking_lot::Mutex;

use flicker_types::{
    ChangedField, DurableKey, FieldSnapshot, FunctionId, FunctionLocation, InvalidationReason,
    InvocationRecord, LogEvent,
};

use crate::logger::emit_log_event;

/// Rename or log-event emission was requested for a function identity that
/// was never registered with this table. Non-fatal; other keys keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnregisteredIdentity(pub FunctionId);

impl fmt::Display for UnregisteredIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no durable key registered for {}", self.0)
    }
}

impl Error for UnregisteredIdentity {}

/// Per-compilation-unit invalidation store.
///
/// `records` maps a durable key name to the most recent invocation's snapshot
/// sequence; `compute_invalidation_reason` is the sole writer. Each lock is
/// held across the whole read-modify-write, so concurrent calls for the same
/// key never interleave. Memory is O(number of distinct keys).
#[derive(Debug, Default)]
pub struct InvalidationTable {
    records: Mutex<HashMap<String, InvocationRecord>>,
    functions: Mutex<HashMap<FunctionId, DurableKey>>,
}

impl InvalidationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `id` with its durable key for rename and log naming.
    ///
    /// First write wins: instrumented code may run its registration block more
    /// than once, and re-registration must be a no-op.
    pub fn register_function(&self, id: FunctionId, key: DurableKey) {
        self.functions.lock().entry(id).or_insert(key);
    }

    /// Overrides the display name used by later log events for `id`. The
    /// durable key name itself is never touched.
    pub fn set_display_name(
        &self,
        id: FunctionId,
        name: impl Into<String>,
    ) -> Result<(), UnregisteredIdentity> {
        match self.functions.lock().get_mut(&id) {
            Some(key) => {
                key.user_provided_name = Some(name.into());
                Ok(())
            }
            None => Err(UnregisteredIdentity(id)),
        }
    }

    /// The registered key for `id`, if any.
    pub fn function(&self, id: FunctionId) -> Option<DurableKey> {
        self.functions.lock().get(&id).cloned()
    }

    /// Classifies this invocation of `key_name` against the stored record and
    /// replaces the record with `new_snapshots` (last-write-wins).
    ///
    /// Never fails for well-formed input. Positions beyond the shorter of the
    /// two sequences contribute no pair; a name mismatch at the same position
    /// counts as a changed field, so adding or removing parameters between
    /// compilations degrades to a field change rather than an error.
    pub fn compute_invalidation_reason(
        &self,
        key_name: &str,
        new_snapshots: InvocationRecord,
    ) -> InvalidationReason {
        let mut records = self.records.lock();

        let reason = match records.get(key_name) {
            None => InvalidationReason::Invalidate,
            Some(previous) => {
                let changed: Vec<ChangedField> = previous
                    .iter()
                    .zip(new_snapshots.iter())
                    .filter(|(old, new)| old != new)
                    .map(|(old, new)| ChangedField {
                        previous: old.clone(),
                        current: new.clone(),
                    })
                    .collect();
                if changed.is_empty() {
                    // The call site decided a recomputation happened, but no
                    // tracked field explains it: external signal.
                    InvalidationReason::Unknown
                } else {
                    InvalidationReason::FieldChanged(changed)
                }
            }
        };

        records.insert(key_name.to_owned(), new_snapshots);
        reason
    }

    /// The stored record for `key_name`, if any.
    pub fn recorded_fields(&self, key_name: &str) -> Option<Vec<FieldSnapshot>> {
        self.records.lock().get(key_name).cloned()
    }

    /// Number of distinct keys this table has seen.
    pub fn key_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Builds and emits a `Processed` event for `id` with the effective
    /// display name, returning the emitted event.
    pub fn log_processed(
        &self,
        id: FunctionId,
        reason: InvalidationReason,
    ) -> Result<LogEvent, UnregisteredIdentity> {
        let event = LogEvent::processed(self.affected_function(id)?, reason);
        emit_log_event(&event);
        Ok(event)
    }

    /// Builds and emits a `Skipped` event for `id`.
    pub fn log_skipped(&self, id: FunctionId) -> Result<LogEvent, UnregisteredIdentity> {
        let event = LogEvent::skipped(self.affected_function(id)?);
        emit_log_event(&event);
        Ok(event)
    }

    fn affected_function(&self, id: FunctionId) -> Result<FunctionLocation, UnregisteredIdentity> {
        let functions = self.functions.lock();
        let key = functions.get(&id).ok_or(UnregisteredIdentity(id))?;
        Ok(FunctionLocation {
            function: key.display_name().to_owned(),
            package: key.location.package.clone(),
            file: key.location.file.clone(),
            line: key.location.line,
            column: key.location.column,
        })
    }
}
