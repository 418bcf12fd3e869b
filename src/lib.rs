// src/lib.rs
//! Aspect Engine Library
//!
//! Intercepts calls to registered members of types and instances so a
//! handler can inspect or rewrite arguments before the call and the result
//! after it, without changing the member's implementation.
//!
//! # Architecture
//!
//! The library is structured into a few modules:
//!
//! - **object**: dynamic types, instances and their live member tables
//! - **interception**: enumeration, filtering, wrapper installation and dispatch
//! - **observability**: tracing and metrics setup
//! - **utils**: configuration and error types
//!
//! # Example
//!
//! ```
//! use aspect_engine::{before, Payload, TypeBuilder, Value};
//! use serde_json::json;
//!
//! let echo = TypeBuilder::new("Echo")
//!     .method("dynamicMethod", |_, args| {
//!         Ok(json!({ "a": args[0], "rest": &args[1..] }))
//!     })
//!     .build();
//! let instance = echo.construct(vec![]).unwrap();
//!
//! let increment = |_: &str, mut payload: Payload<'_>| {
//!     if let Some(args) = payload.arguments_mut() {
//!         args[0] = json!(args[0].as_i64().unwrap_or(0) + 1);
//!     }
//!     Ok(Value::Null)
//! };
//! before(&instance, increment, &[]).unwrap();
//!
//! let result = instance.call("dynamicMethod", vec![json!(1), json!(2)]).unwrap();
//! assert_eq!(result, json!({ "a": 2, "rest": [2] }));
//! ```

// Public module exports
pub mod interception;
pub mod object;
pub mod observability;
pub mod utils;

// Re-export commonly used types
pub use interception::{
    after, around, before, AspectEngine, Handler, MethodFilter, Payload, Phase, PhaseSet, Target,
    WrapReport,
};
pub use object::{
    Arguments, Callable, Instance, MemberTable, Receiver, Slot, TypeBuilder, TypeRef, Value,
};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
