// src/interception/dispatcher.rs
//! Phase dispatcher: the runtime behavior of an installed wrapper
//!
//! ```text
//! caller ─► [before] handler("m:before", &mut args)
//!               │ (return value ignored)
//!               ▼
//!           original(receiver, args) ──error──► caller
//!               │
//!               ▼
//!           [after] handler("m:after", result) ──► caller
//! ```

use crate::object::{Arguments, Callable, Receiver, Value};
use crate::observability::HANDLER_INVOCATIONS_TOTAL;
use crate::utils::errors::Result;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Interception point relative to the original call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Before,
    After,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Before => "before",
            Phase::After => "after",
        }
    }

    /// Label passed to the handler, e.g. `dynamicMethod:before`
    pub fn label(self, member: &str) -> String {
        format!("{}:{}", member, self.as_str())
    }

    /// Recover the phase from a handler label
    pub fn from_label(label: &str) -> Option<Phase> {
        match label.rsplit_once(':') {
            Some((_, "before")) => Some(Phase::Before),
            Some((_, "after")) => Some(Phase::After),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phases a wrap intercepts, fixed per entry-point call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSet {
    before: bool,
    after: bool,
}

impl PhaseSet {
    pub const BEFORE: PhaseSet = PhaseSet {
        before: true,
        after: false,
    };
    pub const AFTER: PhaseSet = PhaseSet {
        before: false,
        after: true,
    };
    pub const AROUND: PhaseSet = PhaseSet {
        before: true,
        after: true,
    };

    pub fn contains(self, phase: Phase) -> bool {
        match phase {
            Phase::Before => self.before,
            Phase::After => self.after,
        }
    }

    /// Entry-point name for this set
    pub fn as_str(self) -> &'static str {
        match (self.before, self.after) {
            (true, true) => "around",
            (true, false) => "before",
            (false, true) => "after",
            (false, false) => "none",
        }
    }
}

/// What the handler receives
#[derive(Debug)]
pub enum Payload<'a> {
    /// Before phase: the live argument list; edits reach the original
    Arguments(&'a mut Arguments),

    /// After phase: the original's result; the handler returns its replacement
    ReturnValue(Value),
}

impl<'a> Payload<'a> {
    pub fn phase(&self) -> Phase {
        match self {
            Payload::Arguments(_) => Phase::Before,
            Payload::ReturnValue(_) => Phase::After,
        }
    }

    pub fn arguments_mut(&mut self) -> Option<&mut Arguments> {
        match self {
            Payload::Arguments(args) => Some(&mut **args),
            Payload::ReturnValue(_) => None,
        }
    }

    pub fn into_return_value(self) -> Option<Value> {
        match self {
            Payload::ReturnValue(value) => Some(value),
            Payload::Arguments(_) => None,
        }
    }
}

type HandlerFn = dyn Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync;

/// Caller-supplied interception handler
///
/// Clones share the same function, so one handler can be attached to any
/// number of members.
#[derive(Clone)]
pub struct Handler {
    func: Arc<HandlerFn>,
}

impl Handler {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    pub fn invoke(&self, label: &str, payload: Payload<'_>) -> Result<Value> {
        (self.func)(label, payload)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// State captured by one installed wrapper
pub(crate) struct Interceptor {
    original: Callable,
    handler: Handler,
    phases: PhaseSet,
    before_label: String,
    after_label: String,
}

impl Interceptor {
    pub(crate) fn new(
        member: &str,
        original: Callable,
        handler: Handler,
        phases: PhaseSet,
    ) -> Self {
        Self {
            original,
            handler,
            phases,
            before_label: Phase::Before.label(member),
            after_label: Phase::After.label(member),
        }
    }

    /// Run one intercepted call; errors from the handler or the original
    /// are returned as-is
    pub(crate) fn invoke(&self, receiver: &Receiver, mut args: Arguments) -> Result<Value> {
        if self.phases.contains(Phase::Before) {
            trace!(label = %self.before_label, argc = args.len(), "Dispatching before handler");
            metrics::counter!(HANDLER_INVOCATIONS_TOTAL, "phase" => "before").increment(1);
            self.handler
                .invoke(&self.before_label, Payload::Arguments(&mut args))?;
        }

        let result = self.original.call(receiver, args)?;

        if self.phases.contains(Phase::After) {
            trace!(label = %self.after_label, "Dispatching after handler");
            metrics::counter!(HANDLER_INVOCATIONS_TOTAL, "phase" => "after").increment(1);
            return self
                .handler
                .invoke(&self.after_label, Payload::ReturnValue(result));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::TypeBuilder;
    use crate::EngineError;
    use parking_lot::Mutex;
    use serde_json::json;

    fn receiver() -> Receiver {
        Receiver::Type(TypeBuilder::new("Sample").build())
    }

    fn echo() -> Callable {
        Callable::new("echo", |_, args| Ok(Value::Array(args)))
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::Before.label("emit"), "emit:before");
        assert_eq!(Phase::from_label("emit:after"), Some(Phase::After));
        assert_eq!(Phase::from_label("ns:emit:before"), Some(Phase::Before));
        assert_eq!(Phase::from_label("emit"), None);
    }

    #[test]
    fn test_phase_sets() {
        assert!(PhaseSet::BEFORE.contains(Phase::Before));
        assert!(!PhaseSet::BEFORE.contains(Phase::After));
        assert!(PhaseSet::AROUND.contains(Phase::After));
        assert_eq!(PhaseSet::AROUND.as_str(), "around");
        assert_eq!(PhaseSet::AFTER.as_str(), "after");
    }

    #[test]
    fn test_before_mutation_reaches_original() {
        let handler = Handler::new(|_, mut payload| {
            if let Some(args) = payload.arguments_mut() {
                args.push(json!("extra"));
            }
            Ok(json!("ignored"))
        });
        let interceptor = Interceptor::new("echo", echo(), handler, PhaseSet::BEFORE);

        let result = interceptor.invoke(&receiver(), vec![json!(1)]).unwrap();
        assert_eq!(result, json!([1, "extra"]));
    }

    #[test]
    fn test_after_replaces_result() {
        let handler = Handler::new(|_, payload| {
            let value = payload.into_return_value().unwrap_or(Value::Null);
            Ok(json!({ "wrapped": value }))
        });
        let interceptor = Interceptor::new("echo", echo(), handler, PhaseSet::AFTER);

        let result = interceptor.invoke(&receiver(), vec![json!(1)]).unwrap();
        assert_eq!(result, json!({ "wrapped": [1] }));
    }

    #[test]
    fn test_around_calls_handler_twice_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let handler = Handler::new(move |label, payload| {
            seen.lock().push((label.to_string(), payload.phase()));
            Ok(payload.into_return_value().unwrap_or(Value::Null))
        });
        let interceptor = Interceptor::new("echo", echo(), handler, PhaseSet::AROUND);

        let result = interceptor.invoke(&receiver(), vec![json!(2)]).unwrap();
        assert_eq!(result, json!([2]));
        assert_eq!(
            *calls.lock(),
            vec![
                ("echo:before".to_string(), Phase::Before),
                ("echo:after".to_string(), Phase::After),
            ]
        );
    }

    #[test]
    fn test_original_error_skips_after() {
        let calls = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&calls);
        let handler = Handler::new(move |_, payload| {
            *seen.lock() += 1;
            Ok(payload.into_return_value().unwrap_or(Value::Null))
        });
        let failing = Callable::new("fail", |_, _| {
            Err(anyhow::anyhow!("original failed").into())
        });
        let interceptor = Interceptor::new("fail", failing, handler, PhaseSet::AROUND);

        let err = interceptor.invoke(&receiver(), vec![]).unwrap_err();
        assert_eq!(err.to_string(), "original failed");
        // Only the before phase ran
        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_handler_error_aborts_call() {
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        let original = Callable::new("guarded", move |_, _| {
            *flag.lock() = true;
            Ok(Value::Null)
        });
        let handler = Handler::new(|label, _| {
            Err(EngineError::Raised(anyhow::anyhow!("rejected {}", label)))
        });
        let interceptor = Interceptor::new("guarded", original, handler, PhaseSet::BEFORE);

        let err = interceptor.invoke(&receiver(), vec![]).unwrap_err();
        assert_eq!(err.to_string(), "rejected guarded:before");
        assert!(!*ran.lock());
    }
}
