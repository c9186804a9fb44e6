//! Facade over the flicker instrumentation surface.
//!
//! The code transformer's generated call sites use this crate: assign durable
//! keys at build time with [`KeyPass`], then at run time capture tracked
//! inputs ([`tracked_fields!`]), ask the [`InvalidationTable`] why this
//! invocation happened, and forward the classified event to the configured
//! listener.

pub use flicker_keys::{
    ANONYMOUS_NAME, DuplicateKeyError, FunctionSignature, KeyPass, anonymous_name,
};
pub use flicker_runtime::{
    InvalidationListener, InvalidationTable, SYNTHETIC_TAIL_PARAMS, TracingListener,
    TrackedValue, UnregisteredIdentity, emit_log_event, set_listener, snapshot_fields,
    snapshot_invocation,
};
pub use flicker_types::{
    ChangedField, DurableKey, FieldSnapshot, FunctionId, FunctionLocation, InvalidationKind,
    InvalidationReason, InvocationRecord, LogEvent, Stability, StabilityClassifier,
    TypeDescriptor, UnknownStability,
};

pub mod prelude {
    pub use crate::tracked_fields;
    pub use flicker_keys::{FunctionSignature, KeyPass};
    pub use flicker_runtime::{
        InvalidationListener, InvalidationTable, TrackedValue, set_listener, snapshot_fields,
        snapshot_invocation,
    };
    pub use flicker_types::{
        FieldSnapshot, FunctionId, InvalidationKind, InvalidationReason, LogEvent, Stability,
        StabilityClassifier, TypeDescriptor, UnknownStability,
    };
}

/// Captures each argument as a [`TrackedValue`]: the expression text as the
/// name, `type_name_of_val` as the type descriptor, and the value's `Display`
/// and `Hash` as rendering and identity.
#[macro_export]
macro_rules! tracked_fields {
    ($($value:expr),* $(,)?) => {
        ::std::vec![
            $(
                $crate::TrackedValue::capture(
                    stringify!($value),
                    $crate::TypeDescriptor::new(::std::any::type_name_of_val(&$value)),
                    &$value,
                )
            ),*
        ]
    };
}
