//! Core data model for flicker's invalidation tracking.
//!
//! Leaf crate: no runtime behavior lives here, only the types shared by the
//! build-time key pass (`flicker-keys`) and the runtime table
//! (`flicker-runtime`).

pub(crate) mod events;
pub(crate) mod key;
pub(crate) mod reason;
pub(crate) mod snapshot;
pub(crate) mod stability;

pub use events::*;
pub use key::*;
pub use reason::*;
pub use snapshot::*;
pub use stability::*;
