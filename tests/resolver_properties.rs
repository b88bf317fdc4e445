// tests/resolver_properties.rs

use proptest::prelude::*;
use watchhook::attrs::{resolve, Attributes};
use watchhook::errors::WatchhookError;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn attrs_strategy(max: usize) -> impl Strategy<Value = Attributes> {
    proptest::collection::btree_map(key_strategy(), "[^{}]{0,16}", 0..max)
}

proptest! {
    #[test]
    fn brace_free_templates_are_returned_unchanged(
        template in "[^{}]{0,64}",
        attrs in attrs_strategy(8),
    ) {
        let once = resolve(&template, &attrs).unwrap();
        prop_assert_eq!(&once, &template);
        prop_assert_eq!(resolve(&once, &attrs).unwrap(), once);
    }

    #[test]
    fn literal_values_round_trip(
        key in key_strategy(),
        value in "[^{}]{0,32}",
        mut attrs in attrs_strategy(8),
    ) {
        attrs.insert(key.clone(), value.clone());
        prop_assert_eq!(resolve(&format!("{{{key}}}"), &attrs).unwrap(), value);
    }

    #[test]
    fn undefined_key_always_fails(
        attrs in attrs_strategy(32),
        prefix in "[^{}]{0,16}",
    ) {
        // Keys from the strategy never contain '-', so this one is absent.
        let template = format!("{prefix}{{missing-key}}");
        match resolve(&template, &attrs) {
            Err(WatchhookError::UndefinedAttribute { key }) => prop_assert_eq!(key, "missing-key"),
            other => prop_assert!(false, "expected UndefinedAttribute, got {:?}", other),
        }
    }

    #[test]
    fn two_key_cycles_always_fail(
        a in key_strategy(),
        b in key_strategy(),
        mut attrs in attrs_strategy(8),
    ) {
        prop_assume!(a != b);
        attrs.insert(a.clone(), format!("x{{{b}}}"));
        attrs.insert(b.clone(), format!("{{{a}}}y"));

        match resolve(&format!("{{{a}}}"), &attrs) {
            Err(WatchhookError::CircularAttribute { chain }) => {
                prop_assert!(chain.contains(&a));
                prop_assert!(chain.contains(&b));
            }
            other => prop_assert!(false, "expected CircularAttribute, got {:?}", other),
        }
    }
}
