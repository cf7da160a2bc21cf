// Property-based tests for the counter naming convention
//
// Properties tested:
// 1. Derived names keep the prefix and one character per symbol character
// 2. Derived names are lower-case and dotted, never underscored
// 3. Event tags strip exactly one trailing error suffix

use kcmetrics_core::naming::{derive_name, format_event_tag, ADMIN_EVENT_PREFIX, EVENT_PREFIX};
use kcmetrics_core::EventType;
use proptest::prelude::*;

fn symbol() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,40}"
}

proptest! {
    #[test]
    fn prop_derive_name_shape(symbol in symbol()) {
        for prefix in [EVENT_PREFIX, ADMIN_EVENT_PREFIX] {
            let name = derive_name(prefix, &symbol);

            prop_assert!(name.starts_with(prefix));
            prop_assert_eq!(name.len(), prefix.len() + symbol.len());
            prop_assert!(!name.contains('_'));
            prop_assert_eq!(name.to_lowercase(), name.clone());
        }
    }

    #[test]
    fn prop_derive_name_is_deterministic(symbol in symbol()) {
        prop_assert_eq!(derive_name(EVENT_PREFIX, &symbol), derive_name(EVENT_PREFIX, &symbol));
    }

    #[test]
    fn prop_error_types_share_tag_with_success(
        event_type in prop::sample::select(EventType::ALL.to_vec()),
    ) {
        let tag = format_event_tag(event_type);
        let symbol = event_type.as_str();

        prop_assert_eq!(
            tag,
            symbol.strip_suffix("_ERROR").unwrap_or(symbol).to_ascii_lowercase()
        );
    }
}
