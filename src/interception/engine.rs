// src/interception/engine.rs
//! Public entry points: `before`, `after`, `around`

use crate::interception::dispatcher::{Handler, Payload, PhaseSet};
use crate::interception::filter::{self, MethodFilter};
use crate::interception::installer;
use crate::interception::target::{self, Namespace, Target};
use crate::object::Value;
use crate::utils::config::EngineConfig;
use crate::utils::errors::Result;
use once_cell::sync::Lazy;
use tracing::{info, warn};

/// Members wrapped by one entry-point call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapReport {
    /// Wrapped slots of the shared behavior table
    pub instance_members: Vec<String>,

    /// Wrapped slots owned by the type
    pub type_members: Vec<String>,
}

impl WrapReport {
    pub fn total(&self) -> usize {
        self.instance_members.len() + self.type_members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Installs interceptors on instance and type members
///
/// The engine holds no per-wrap state; everything a wrapped member needs
/// at call time lives in the installed closure.
#[derive(Debug, Clone, Default)]
pub struct AspectEngine {
    config: EngineConfig,
}

impl AspectEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `handler` with the argument list before each selected member
    pub fn before<'a, F>(
        &self,
        target: impl Into<Target<'a>>,
        handler: F,
        methods: &[&str],
    ) -> Result<WrapReport>
    where
        F: Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.wrap_with(target, &Handler::new(handler), PhaseSet::BEFORE, methods)
    }

    /// Replace each selected member's result with `handler`'s return value
    pub fn after<'a, F>(
        &self,
        target: impl Into<Target<'a>>,
        handler: F,
        methods: &[&str],
    ) -> Result<WrapReport>
    where
        F: Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.wrap_with(target, &Handler::new(handler), PhaseSet::AFTER, methods)
    }

    /// Both phases; the handler tells them apart by label suffix or payload
    pub fn around<'a, F>(
        &self,
        target: impl Into<Target<'a>>,
        handler: F,
        methods: &[&str],
    ) -> Result<WrapReport>
    where
        F: Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.wrap_with(target, &Handler::new(handler), PhaseSet::AROUND, methods)
    }

    /// Wrap with an already constructed (possibly shared) handler
    pub fn wrap_with<'a>(
        &self,
        target: impl Into<Target<'a>>,
        handler: &Handler,
        phases: PhaseSet,
        methods: &[&str],
    ) -> Result<WrapReport> {
        let target = target.into();
        let namespaces = target::enumerate(&target).map_err(|e| {
            warn!(wrap_target = %target, "Rejected wrap target: {}", e);
            e
        })?;

        let filter = MethodFilter::from(methods);
        let mut report = WrapReport::default();

        for namespace in [Namespace::Instance, Namespace::Type] {
            let retained = filter::retain(
                namespaces.candidates(namespace),
                &filter,
                namespace,
                &self.config.reserved,
            );
            let wrapped = installer::install(
                namespaces.table(namespace),
                &retained,
                namespace,
                handler,
                phases,
            );

            match namespace {
                Namespace::Instance => report.instance_members = wrapped,
                Namespace::Type => report.type_members = wrapped,
            }
        }

        info!(
            wrap_target = %target,
            phases = phases.as_str(),
            wrapped = report.total(),
            "Applied aspect"
        );

        Ok(report)
    }
}

static DEFAULT_ENGINE: Lazy<AspectEngine> = Lazy::new(AspectEngine::default);

/// [`AspectEngine::before`] with the default configuration
pub fn before<'a, F>(
    target: impl Into<Target<'a>>,
    handler: F,
    methods: &[&str],
) -> Result<WrapReport>
where
    F: Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync + 'static,
{
    DEFAULT_ENGINE.before(target, handler, methods)
}

/// [`AspectEngine::after`] with the default configuration
pub fn after<'a, F>(
    target: impl Into<Target<'a>>,
    handler: F,
    methods: &[&str],
) -> Result<WrapReport>
where
    F: Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync + 'static,
{
    DEFAULT_ENGINE.after(target, handler, methods)
}

/// [`AspectEngine::around`] with the default configuration
pub fn around<'a, F>(
    target: impl Into<Target<'a>>,
    handler: F,
    methods: &[&str],
) -> Result<WrapReport>
where
    F: Fn(&str, Payload<'_>) -> Result<Value> + Send + Sync + 'static,
{
    DEFAULT_ENGINE.around(target, handler, methods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{TypeBuilder, TypeRef};
    use crate::utils::config::ReservedNames;
    use crate::EngineError;
    use serde_json::json;

    fn greeter() -> TypeRef {
        TypeBuilder::new("Greeter")
            .method("greet", |_, args| {
                let who = args
                    .first()
                    .and_then(Value::as_str)
                    .unwrap_or("world")
                    .to_string();
                Ok(json!(format!("hello {}", who)))
            })
            .method("wave", |_, _| Ok(json!("~")))
            .static_method("create", |_, _| Ok(json!("created")))
            .static_field("version", json!(1))
            .build()
    }

    #[test]
    fn test_report_lists_wrapped_members() {
        let ty = greeter();
        let report = AspectEngine::default()
            .before(&ty, |_, _| Ok(Value::Null), &[])
            .unwrap();

        assert_eq!(
            report.instance_members,
            vec!["greet".to_string(), "wave".to_string()]
        );
        assert_eq!(report.type_members, vec!["create".to_string()]);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_filter_selects_single_member() {
        let ty = greeter();
        let report = AspectEngine::default()
            .after(&ty, |_, _| Ok(json!("intercepted")), &["greet"])
            .unwrap();

        assert_eq!(report.instance_members, vec!["greet".to_string()]);
        assert!(report.type_members.is_empty());

        let instance = ty.construct(vec![]).unwrap();
        assert_eq!(instance.call("greet", vec![]).unwrap(), json!("intercepted"));
        assert_eq!(instance.call("wave", vec![]).unwrap(), json!("~"));
        assert_eq!(ty.call_static("create", vec![]).unwrap(), json!("created"));
    }

    #[test]
    fn test_unknown_filter_is_noop() {
        let ty = greeter();
        let report = AspectEngine::default()
            .around(&ty, |_, _| Ok(Value::Null), &["nothing"])
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_callable_target_rejected_before_mutation() {
        let ty = greeter();
        let create = ty.statics().get_callable("create").unwrap();

        let err = AspectEngine::default()
            .before(&create, |_, _| Ok(Value::Null), &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedTarget));
        assert!(ty.statics().get_callable("create").unwrap().ptr_eq(&create));
    }

    #[test]
    fn test_configured_reserved_names() {
        let config = EngineConfig {
            reserved: ReservedNames {
                instance: vec!["constructor".to_string(), "wave".to_string()],
                type_level: vec!["create".to_string()],
            },
            ..EngineConfig::default()
        };
        let ty = greeter();
        let report = AspectEngine::new(config)
            .before(&ty, |_, _| Ok(Value::Null), &[])
            .unwrap();

        assert_eq!(report.instance_members, vec!["greet".to_string()]);
        // "length", "name" and "prototype" are data slots, so nothing callable is left
        assert!(report.type_members.is_empty());
    }

    #[test]
    fn test_shared_handler_across_calls() {
        let ty = greeter();
        let engine = AspectEngine::default();
        let handler = Handler::new(|_, payload| {
            let value = payload.into_return_value().unwrap_or(Value::Null);
            Ok(json!([value]))
        });

        engine
            .wrap_with(&ty, &handler, PhaseSet::AFTER, &["greet"])
            .unwrap();
        engine
            .wrap_with(&ty, &handler, PhaseSet::AFTER, &["create"])
            .unwrap();

        let instance = ty.construct(vec![]).unwrap();
        assert_eq!(
            instance.call("greet", vec![json!("bob")]).unwrap(),
            json!(["hello bob"])
        );
        assert_eq!(ty.call_static("create", vec![]).unwrap(), json!(["created"]));
    }

    #[test]
    fn test_default_free_functions() {
        let ty = greeter();
        let report = before(
            &ty,
            |_, mut payload| {
                if let Some(args) = payload.arguments_mut() {
                    args.insert(0, json!("aspect"));
                }
                Ok(Value::Null)
            },
            &["greet"],
        )
        .unwrap();
        assert_eq!(report.total(), 1);

        let instance = ty.construct(vec![]).unwrap();
        assert_eq!(instance.call("greet", vec![]).unwrap(), json!("hello aspect"));
    }
}
