// src/utils/errors.rs
//! Engine error types
//!
//! Errors raised by user code (original callables and handlers) travel
//! through [`EngineError::Raised`] and are never rewritten by the engine.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by the object model and the interception engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// The wrap target is a bare callable instead of an instance or a type
    #[error("Unsupported target: only object instances and type references can be wrapped")]
    UnsupportedTarget,

    /// No slot with this name exists on the type or its ancestors
    #[error("Member '{member}' not found on type '{type_name}'")]
    MemberNotFound { type_name: String, member: String },

    /// The slot exists but holds data rather than a callable
    #[error("Member '{member}' is not callable")]
    NotCallable { member: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Logging or metrics could not be initialized
    #[error("Observability error: {0}")]
    ObservabilityError(String),

    /// Raised by an original callable or a handler
    #[error(transparent)]
    Raised(#[from] anyhow::Error),
}

impl EngineError {
    /// Whether this error originated in user code rather than the engine
    pub fn is_raised(&self) -> bool {
        matches!(self, EngineError::Raised(_))
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}
