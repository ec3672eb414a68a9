//! Upmirror Engine
//!
//! Keeps the host's uploads directory mirrored into an object store:
//!
//! - [`MirrorEngine`] uploads an asset's primary file and all of its size variants as
//!   one concurrent batch, and removes the remote object when a local file is deleted.
//!   It never fails its caller; every outcome comes back as a [`MirrorResult`].
//! - [`HostEvents`] is the host-owned subscription list for the three lifecycle hooks
//!   (upload location, asset created, file deleted).
//! - [`MirrorSubscriber`] binds an engine to those hooks.

pub mod bindings;
pub mod engine;
pub mod events;
pub mod result;

pub use bindings::{register_bindings, MirrorSubscriber};
pub use engine::{MirrorEngine, MirrorPhase};
pub use events::{HostEvents, HostSubscriber};
pub use result::{MirrorFailure, MirrorResult};
