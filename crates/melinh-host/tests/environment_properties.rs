//! Property tests for host detection.

use proptest::prelude::*;
use serde_json::{json, Value};

use melinh_host::{environment, is_embedded_host, is_standalone_host, GlobalScope, HostEnvironment, HOST_MARKER};

fn marker_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        ".{0,8}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn embedded_and_standalone_are_exclusive(value in marker_value(), with_marker in any::<bool>()) {
        let scope = if with_marker {
            GlobalScope::from_vars([(HOST_MARKER, value)])
        } else {
            GlobalScope::new()
        };

        let embedded = is_embedded_host(Some(&scope));
        prop_assert_ne!(embedded, is_standalone_host(Some(&scope)));
        prop_assert_eq!(
            environment(Some(&scope)) == HostEnvironment::Embedded,
            embedded
        );
    }

    #[test]
    fn non_empty_string_marker_is_embedded(value in ".{1,16}") {
        let scope = GlobalScope::from_vars([(HOST_MARKER, Value::String(value))]);
        prop_assert!(is_embedded_host(Some(&scope)));
    }

    #[test]
    fn unrelated_globals_never_embed(name in "[a-z_]{1,10}", value in marker_value()) {
        let scope = GlobalScope::from_vars([(name, value)]);
        prop_assert!(!is_embedded_host(Some(&scope)));
    }
}
