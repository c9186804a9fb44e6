//! Runtime engine for flicker's invalidation tracking.
//!
//! Layout:
//! - `snapshot`: capture of tracked inputs into [`flicker_types::FieldSnapshot`]s
//! - `table`: the per-compilation-unit invalidation table
//! - `logger`: the pluggable log-event listener

pub mod logger;
pub mod snapshot;
pub mod table;

pub use logger::{InvalidationListener, TracingListener, emit_log_event, set_listener};
pub use snapshot::{SYNTHETIC_TAIL_PARAMS, TrackedValue, snapshot_fields, snapshot_invocation};
pub use table::{InvalidationTable, UnregisteredIdentity};
