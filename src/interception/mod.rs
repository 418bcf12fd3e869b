// src/interception/mod.rs
//! Member interception layer
//!
//! Replaces selected callable members of a type or instance with
//! interceptors that run a handler around the original:
//!
//! - **Target**: resolves a target's instance-level and type-level tables
//! - **Filter**: applies the allow-list and reserved structural names
//! - **Installer**: swaps each retained callable slot for a wrapper
//! - **Dispatcher**: the wrapper's per-call before → original → after flow
//!
//! # Architecture
//!
//! ```text
//! before/after/around(target, handler, methods)      (once, at wrap time)
//!     │
//!     ├─ enumerate ─► { behavior table, statics table }
//!     ├─ retain    ─► names to wrap
//!     └─ install   ─► slot := Interceptor { original, handler, phases }
//!
//! instance.call("m", args)                            (every call)
//!     └─ Interceptor ─► handler("m:before") ─► original ─► handler("m:after")
//! ```
//!
//! Wrapping the same slot again captures the current wrapper as the new
//! original, so the most recent wrap runs outermost.

pub mod dispatcher;
pub mod engine;
pub mod filter;
pub mod installer;
pub mod target;

// Re-export commonly used types
pub use dispatcher::{Handler, Payload, Phase, PhaseSet};
pub use engine::{after, around, before, AspectEngine, WrapReport};
pub use filter::MethodFilter;
pub use target::{Namespace, Namespaces, Target};
