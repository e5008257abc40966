//! Property-based tests for the parser and the merge engine.
//!
//! Most generated trees are restricted to what ISC text can express:
//! keyword keys, quote-free text, non-negative integers, and lists of
//! scalars that start with a string. `loose_tree` also produces empty
//! lists, `Empty` elements and lists led by an integer.

use proptest::prelude::*;
use serde_isc::{parse, parse_str, to_string, Error, Map, MergeOptions, Value};

fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}"
}

fn text() -> impl Strategy<Value = Value> {
    "[a-zA-Z0-9 /._-]{0,12}".prop_map(Value::Text)
}

fn integer() -> impl Strategy<Value = Value> {
    (0..=i64::MAX).prop_map(Value::Integer)
}

fn list() -> impl Strategy<Value = Value> {
    (
        text(),
        prop::collection::vec(prop_oneof![text(), integer()], 0..5),
    )
        .prop_map(|(first, rest)| {
            let mut elements = vec![first];
            elements.extend(rest);
            Value::List(elements)
        })
}

fn loose_list() -> impl Strategy<Value = Value> {
    prop::collection::vec(
        prop_oneof![text(), integer(), Just(Value::Empty)],
        0..5,
    )
    .prop_map(Value::List)
}

fn entries(inner: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
    prop::collection::vec((key(), inner), 0..6)
        .prop_map(|pairs| Value::Map(pairs.into_iter().collect::<Map>()))
}

fn tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![integer(), text(), list()];
    entries(leaf.prop_recursive(3, 32, 6, |inner| entries(inner)))
}

fn loose_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![integer(), text(), list(), loose_list()];
    entries(leaf.prop_recursive(3, 32, 6, |inner| entries(inner)))
}

/// `{ }` reads back as an empty map; top-level `Empty` entries are skipped.
fn as_parsed(value: &Value) -> Value {
    match value {
        Value::List(elements) if elements.is_empty() => Value::Map(Map::new()),
        Value::Map(map) => Value::Map(
            map.iter()
                .filter(|(_, v)| **v != Value::Empty)
                .map(|(k, v)| (k.clone(), as_parsed(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn prop_rendering_parses_back_or_is_refused(config in loose_tree()) {
        match to_string(&config) {
            Ok(rendered) => prop_assert_eq!(parse_str(&rendered).unwrap(), as_parsed(&config)),
            Err(err) => prop_assert!(matches!(err, Error::UnsupportedType(_)), "{:?}", err),
        }
    }

    #[test]
    fn prop_rendered_text_parses_back(config in tree()) {
        let rendered = to_string(&config).unwrap();
        prop_assert_eq!(parse_str(&rendered).unwrap(), config);
    }

    #[test]
    fn prop_parse_is_deterministic(config in tree()) {
        let rendered = to_string(&config).unwrap();
        let first = parse(rendered.as_bytes()).unwrap();
        let second = parse(rendered.as_bytes()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_merging_a_copy_is_identity(
        config in tree(),
        overwrite in any::<bool>(),
        typecheck in any::<bool>(),
    ) {
        let mut target = config.clone();
        target.merge(&config, overwrite, typecheck).unwrap();
        prop_assert_eq!(target, config);
    }

    #[test]
    fn prop_overlay_yields_source(target in tree(), source in tree()) {
        let merged = target.merged_with(&source, &MergeOptions::overlay()).unwrap();
        prop_assert_eq!(merged, source);
    }

    #[test]
    fn prop_fill_defaults_keeps_every_key(target in tree(), defaults in tree()) {
        let options = MergeOptions::fill_defaults().with_typecheck(false);
        let merged = target.merged_with(&defaults, &options).unwrap();
        let merged = merged.as_map().unwrap();

        for key in target.as_map().unwrap().keys() {
            prop_assert!(merged.contains_key(key));
        }
        for (key, value) in defaults.as_map().unwrap() {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }
}
