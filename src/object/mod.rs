// src/object/mod.rs
//! Dynamic object model targeted by the interception engine
//!
//! Types declare their interceptable members up front through
//! [`TypeBuilder`]. Each type owns two member tables:
//!
//! - **statics**: type-level slots owned directly by the type
//! - **behavior**: instance-level slots shared by every instance
//!
//! ```text
//! TypeRef "Echo"
//!   statics:  name, length, prototype ──┐, staticMethod
//!   behavior: constructor, dynamicMethod ◄┘
//!       ▲
//!       │ resolved at call time
//!   Instance { fields }
//! ```
//!
//! Member tables are live and shared: replacing a slot is visible to every
//! holder of the type or of any of its instances.

pub mod callable;
pub mod instance;
pub mod member_table;
pub mod type_ref;

pub use callable::{Arguments, Callable, Receiver};
pub use instance::Instance;
pub use member_table::{MemberTable, Slot};
pub use type_ref::{TypeBuilder, TypeRef};

/// Dynamic payload passed to and returned from callables
pub type Value = serde_json::Value;
