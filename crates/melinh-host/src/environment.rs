//! Runtime environment detection.
//!
//! The embedding mini-app host injects a marker into the global scope before
//! any of our code runs. Its absence means we are running in a plain browser
//! (or a standalone native shell).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Global field the mini-app host injects.
pub const HOST_MARKER: &str = "APP_ID";

/// Where the app is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostEnvironment {
    /// Inside the mini-app host container
    Embedded,
    /// Plain web browser
    Web,
}

/// Snapshot of the global execution context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalScope {
    vars: HashMap<String, Value>,
    marker: Option<String>,
}

impl GlobalScope {
    /// Empty scope (context exists, nothing injected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scope from name/value pairs.
    pub fn from_vars<I, K>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            marker: None,
        }
    }

    /// Native hosts inject globals through the process environment.
    /// Values that are not valid UTF-8 are converted lossily; such names are
    /// skipped since no marker can match them.
    pub fn from_process_env() -> Self {
        Self::from_vars(std::env::vars_os().filter_map(|(k, v)| {
            let name = k.into_string().ok()?;
            Some((name, Value::String(v.to_string_lossy().into_owned())))
        }))
    }

    /// Probe a different marker field than [`HOST_MARKER`].
    pub fn with_marker(mut self, name: impl Into<String>) -> Self {
        self.marker = Some(name.into());
        self
    }

    /// Inject a global.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Name of the marker this scope is probed for.
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(HOST_MARKER)
    }
}

/// Loose truthiness of an injected value: `null`, `false`, zero, non-finite
/// numbers and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && f.is_finite()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// True iff a global context exists and the host marker is present and truthy.
pub fn is_embedded_host(scope: Option<&GlobalScope>) -> bool {
    scope
        .and_then(|s| s.get(s.marker()))
        .map(is_truthy)
        .unwrap_or(false)
}

/// True iff a global context exists and it is not the embedded host.
pub fn is_standalone_host(scope: Option<&GlobalScope>) -> bool {
    scope.is_some() && !is_embedded_host(scope)
}

/// Classify the runtime.
pub fn environment(scope: Option<&GlobalScope>) -> HostEnvironment {
    if is_embedded_host(scope) {
        HostEnvironment::Embedded
    } else {
        HostEnvironment::Web
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_marker_is_standalone() {
        let scope = GlobalScope::new();
        assert!(!is_embedded_host(Some(&scope)));
        assert!(is_standalone_host(Some(&scope)));
        assert_eq!(environment(Some(&scope)), HostEnvironment::Web);
    }

    #[test]
    fn test_marker_present_is_embedded() {
        let scope = GlobalScope::from_vars([(HOST_MARKER, json!("4318"))]);
        assert!(is_embedded_host(Some(&scope)));
        assert!(!is_standalone_host(Some(&scope)));
        assert_eq!(environment(Some(&scope)), HostEnvironment::Embedded);
    }

    #[test]
    fn test_falsy_marker_values() {
        for value in [json!(null), json!(false), json!(0), json!("")] {
            let scope = GlobalScope::from_vars([(HOST_MARKER, value.clone())]);
            assert!(!is_embedded_host(Some(&scope)), "{value} should be falsy");
        }
    }

    #[test]
    fn test_no_global_context() {
        assert!(!is_embedded_host(None));
        assert!(!is_standalone_host(None));
        assert_eq!(environment(None), HostEnvironment::Web);
    }

    #[cfg(unix)]
    #[test]
    fn test_process_env_tolerates_non_utf8_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("MELINH_NON_UTF8_VALUE", OsStr::from_bytes(b"\xff\xfe"));
        std::env::set_var("MELINH_PLAIN_VALUE", "ok");

        let scope = GlobalScope::from_process_env();
        assert_eq!(scope.get("MELINH_PLAIN_VALUE"), Some(&json!("ok")));
        assert!(scope
            .get("MELINH_NON_UTF8_VALUE")
            .and_then(Value::as_str)
            .is_some_and(|s| s.contains('\u{FFFD}')));

        std::env::remove_var("MELINH_NON_UTF8_VALUE");
        std::env::remove_var("MELINH_PLAIN_VALUE");
    }

    #[test]
    fn test_custom_marker() {
        let scope = GlobalScope::from_vars([("MINI_APP", json!(1))]).with_marker("MINI_APP");
        assert!(is_embedded_host(Some(&scope)));

        let default_marker = GlobalScope::from_vars([("MINI_APP", json!(1))]);
        assert!(!is_embedded_host(Some(&default_marker)));
    }
}
