// src/interception/installer.rs
//! Wrapper installation into live member tables

use crate::interception::dispatcher::{Handler, Interceptor, PhaseSet};
use crate::interception::target::Namespace;
use crate::object::{Callable, MemberTable};
use crate::observability::WRAPS_INSTALLED_TOTAL;
use tracing::debug;

/// Wrap each named callable slot of `table`, returning the names wrapped
///
/// The original is whatever occupies the slot at replacement time, so a
/// slot wrapped twice ends up with the latest wrapper outermost. Names
/// whose slot is missing or not callable are skipped.
pub fn install(
    table: &MemberTable,
    names: &[String],
    namespace: Namespace,
    handler: &Handler,
    phases: PhaseSet,
) -> Vec<String> {
    let mut wrapped = Vec::with_capacity(names.len());

    for name in names {
        let installed = table.replace_callable(name, |original| {
            let label = original.name().to_string();
            let interceptor = Interceptor::new(name, original, handler.clone(), phases);
            Callable::new(label, move |receiver, args| interceptor.invoke(receiver, args))
        });

        if installed {
            debug!(
                member = %name,
                namespace = namespace.as_str(),
                phases = phases.as_str(),
                "Installed interceptor"
            );
            metrics::counter!(WRAPS_INSTALLED_TOTAL, "namespace" => namespace.as_str())
                .increment(1);
            wrapped.push(name.clone());
        } else {
            debug!(
                member = %name,
                namespace = namespace.as_str(),
                "Skipping non-callable member"
            );
        }
    }

    wrapped
}
