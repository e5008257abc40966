//! Overlaying one configuration tree onto another.
//!
//! The usual workflow reads a user configuration and a set of defaults, then
//! merges one into the other with type checking so that a misspelled value
//! type is reported with the full key path:
//!
//! ```rust
//! use serde_isc::{parse, Error};
//!
//! let mut config = parse(b"RADIUS { server { port \"auth\"; }; };").unwrap();
//! let defaults = parse(b"RADIUS { server { port 1812; }; };").unwrap();
//!
//! let err = config.fill_defaults(&defaults).unwrap_err();
//! assert!(matches!(err, Error::TypeMismatch { .. }));
//! assert_eq!(err.path(), Some("RADIUS/server/port"));
//! ```
//!
//! # Map entries are always replaced
//!
//! `overwrite` decides whether the target's own payload is cleared before the
//! source is copied in. It does **not** protect entries of a map: for every
//! key present in the source, the target's entry under that key is replaced
//! by a fresh copy of the source's entry, whatever the flag says. Keys that
//! only the target has are kept. Lists are never appended to; a list target
//! is always replaced wholesale.
//!
//! ```rust
//! use serde_isc::parse;
//!
//! let mut config = parse(b"port 1645; secret \"x\";").unwrap();
//! let defaults = parse(b"port 1812;").unwrap();
//!
//! config.fill_defaults(&defaults).unwrap();
//! assert_eq!(config.get("port").and_then(|v| v.as_i64()), Some(1812));
//! assert_eq!(config.get("secret").and_then(|v| v.as_str()), Some("x"));
//! ```

use crate::{Error, Map, MergeOptions, Result, Value};
use tracing::{debug, trace};

impl Value {
    /// Merges `source` into `self`.
    ///
    /// 1. With `typecheck`, differing kinds fail with [`Error::TypeMismatch`].
    /// 2. With `overwrite`, or when `self` is a list, the payload is cleared.
    /// 3. `self` takes the kind of `source`, and the payload is copied:
    ///    scalars by value, list elements appended, map entries replaced key
    ///    by key with freshly merged copies.
    ///
    /// Inside maps the type check compares each source entry with the entry
    /// the target held before the merge; errors carry the `/`-joined path of
    /// keys leading to the mismatch.
    ///
    /// The borrow rules already guarantee `self` and `source` are distinct
    /// nodes; merge a clone to combine a tree with itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when `typecheck` is set and types
    /// differ. The target is left partially merged in that case; use
    /// [`Value::merged_with`] for an all-or-nothing merge.
    pub fn merge(&mut self, source: &Value, overwrite: bool, typecheck: bool) -> Result<()> {
        if typecheck && self.kind() != source.kind() {
            return Err(Error::type_mismatch(self.kind(), source.kind()));
        }

        if overwrite || self.is_list() {
            self.clear();
        }

        match source {
            Value::Empty => self.clear(),
            Value::Integer(i) => *self = Value::Integer(*i),
            Value::Text(s) => *self = Value::Text(s.clone()),
            Value::List(elements) => {
                let mut list = match std::mem::take(self) {
                    Value::List(list) => list,
                    _ => Vec::with_capacity(elements.len()),
                };
                list.extend(elements.iter().cloned());
                *self = Value::List(list);
            }
            Value::Map(entries) => {
                if !self.is_map() {
                    *self = Value::Map(Map::with_capacity(entries.len()));
                }
                if let Value::Map(target) = self {
                    merge_entries(target, entries, overwrite, typecheck)?;
                }
            }
        }

        Ok(())
    }

    /// Merges `source` into `self` using the flags in `options`.
    ///
    /// # Errors
    ///
    /// See [`Value::merge`].
    pub fn merge_with(&mut self, source: &Value, options: &MergeOptions) -> Result<()> {
        debug!(
            overwrite = options.overwrite,
            typecheck = options.typecheck,
            target = %self.kind(),
            source = %source.kind(),
            "merging configuration"
        );
        self.merge(source, options.overwrite, options.typecheck)
    }

    /// Applies `source` on top of `self`, replacing conflicting values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if corresponding entries differ in type.
    pub fn overlay(&mut self, source: &Value) -> Result<()> {
        self.merge_with(source, &MergeOptions::overlay())
    }

    /// Merges `defaults` into `self` without clearing `self` first.
    ///
    /// Keys only present in `self` survive; keys present in `defaults` take
    /// the defaults' value (see the module docs).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if corresponding entries differ in type.
    pub fn fill_defaults(&mut self, defaults: &Value) -> Result<()> {
        self.merge_with(defaults, &MergeOptions::fill_defaults())
    }

    /// Returns a merged copy, leaving `self` untouched.
    ///
    /// # Errors
    ///
    /// See [`Value::merge`]. On error no partially merged tree escapes.
    pub fn merged_with(&self, source: &Value, options: &MergeOptions) -> Result<Value> {
        let mut scratch = self.clone();
        scratch.merge_with(source, options)?;
        Ok(scratch)
    }
}

fn merge_entries(target: &mut Map, source: &Map, overwrite: bool, typecheck: bool) -> Result<()> {
    for (key, child) in source {
        trace!(%key, kind = %child.kind(), "merging entry");

        if typecheck {
            if let Some(existing) = target.get(key) {
                check_kinds(existing, child).map_err(|e| e.with_context(key))?;
            }
        }

        let mut fresh = Value::empty_of(child.kind());
        fresh
            .merge(child, overwrite, typecheck)
            .map_err(|e| e.with_context(key))?;
        target.insert(key.clone(), fresh);
    }
    Ok(())
}

/// Compares kinds along every key path the two trees share.
fn check_kinds(target: &Value, source: &Value) -> Result<()> {
    if target.kind() != source.kind() {
        return Err(Error::type_mismatch(target.kind(), source.kind()));
    }
    if let (Value::Map(target), Value::Map(source)) = (target, source) {
        for (key, child) in source {
            if let Some(existing) = target.get(key) {
                check_kinds(existing, child).map_err(|e| e.with_context(key))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{isc, Kind};

    #[test]
    fn test_scalar_overwrite() {
        let mut target = Value::from(1);
        target.merge(&Value::from(2), true, true).unwrap();
        assert_eq!(target, Value::from(2));

        let mut target = Value::from(1);
        target.merge(&Value::from(2), false, true).unwrap();
        assert_eq!(target, Value::from(2));
    }

    #[test]
    fn test_list_is_replaced_not_appended() {
        let mut target = isc!(["a", "b", "c"]);
        target.merge(&isc!(["x"]), false, true).unwrap();
        assert_eq!(target, isc!(["x"]));
    }

    #[test]
    fn test_map_keeps_target_only_keys() {
        let mut target = isc!({"a": 1, "b": 2});
        target.merge(&isc!({"b": 3, "c": 4}), false, true).unwrap();
        assert_eq!(target, isc!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_map_overwrite_drops_target_only_keys() {
        let mut target = isc!({"a": 1, "b": 2});
        target.merge(&isc!({"b": 3}), true, true).unwrap();
        assert_eq!(target, isc!({"b": 3}));
    }

    #[test]
    fn test_nested_map_entry_replaced_wholesale() {
        let mut target = isc!({"server": {"port": 1645, "host": "radius"}});
        target
            .merge(&isc!({"server": {"port": 1812}}), false, true)
            .unwrap();
        assert_eq!(target, isc!({"server": {"port": 1812}}));
    }

    #[test]
    fn test_mismatch_at_root() {
        let mut target = isc!({"a": 1});
        let err = target.merge(&Value::from(1), false, true).unwrap_err();
        assert_eq!(err, Error::type_mismatch(Kind::Map, Kind::Integer));
        assert_eq!(err.path(), Some(""));
    }

    #[test]
    fn test_mismatch_path_is_innermost_last() {
        let mut target = isc!({"RADIUS": {"server": {"port": "auth"}}});
        let source = isc!({"RADIUS": {"server": {"port": 1812}}});
        let err = target.merge(&source, true, true).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                path: "RADIUS/server/port".to_string(),
                expected: "text".to_string(),
                found: "integer".to_string(),
            }
        );
    }

    #[test]
    fn test_without_typecheck_kind_follows_source() {
        let mut target = isc!({"port": "auth"});
        target.merge(&isc!({"port": 1812}), false, false).unwrap();
        assert_eq!(target, isc!({"port": 1812}));

        let mut target = Value::from(5);
        target.merge(&isc!({"x": 1}), false, false).unwrap();
        assert_eq!(target, isc!({"x": 1}));
    }

    #[test]
    fn test_empty_source_clears() {
        let mut target = Value::from("x");
        target.merge(&Value::Empty, false, false).unwrap();
        assert_eq!(target, Value::Empty);
    }

    #[test]
    fn test_merged_with_leaves_original() {
        let target = isc!({"a": {"b": 1}});
        let err = target
            .merged_with(&isc!({"a": {"b": "one"}}), &MergeOptions::overlay())
            .unwrap_err();
        assert_eq!(err.path(), Some("a/b"));
        assert_eq!(target, isc!({"a": {"b": 1}}));

        let merged = target
            .merged_with(&isc!({"c": 2}), &MergeOptions::fill_defaults())
            .unwrap();
        assert_eq!(merged, isc!({"a": {"b": 1}, "c": 2}));
    }

    #[test]
    fn test_self_merge_of_clone_is_identity() {
        let original = isc!({"a": [1, 2], "b": {"c": "d"}, "e": 5});
        for (overwrite, typecheck) in [(true, true), (false, true), (true, false), (false, false)] {
            let mut target = original.clone();
            target.merge(&original, overwrite, typecheck).unwrap();
            assert_eq!(target, original);
        }
    }
}
