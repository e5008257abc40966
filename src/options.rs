//! Configuration options for merging configuration trees.
//!
//! [`MergeOptions`] selects how [`Value::merge_with`](crate::Value::merge_with)
//! combines a source tree into a target:
//!
//! - `overwrite`: clear the target's payload before copying the source in
//! - `typecheck`: fail with a type mismatch when corresponding entries differ
//!
//! ## Examples
//!
//! ```rust
//! use serde_isc::{parse, MergeOptions};
//!
//! let mut config = parse(b"port 1812;").unwrap();
//! let extra = parse(b"secret \"s3cr3t\";").unwrap();
//!
//! let options = MergeOptions::new().with_overwrite(false).with_typecheck(true);
//! config.merge_with(&extra, &options).unwrap();
//! assert_eq!(config.get("port").and_then(|v| v.as_i64()), Some(1812));
//! ```

/// Flags controlling a merge.
///
/// # Examples
///
/// ```rust
/// use serde_isc::MergeOptions;
///
/// // The defaults: keep existing top-level payloads, insist on matching types.
/// let options = MergeOptions::new();
/// assert!(!options.overwrite);
/// assert!(options.typecheck);
///
/// // Replace conflicting values.
/// let options = MergeOptions::overlay();
/// assert!(options.overwrite);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    pub overwrite: bool,
    pub typecheck: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions::fill_defaults()
    }
}

impl MergeOptions {
    /// Creates default options (no overwrite, type-checked).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that apply a source on top of a target, replacing conflicts.
    #[must_use]
    pub const fn overlay() -> Self {
        MergeOptions {
            overwrite: true,
            typecheck: true,
        }
    }

    /// Options that merge a source without clearing the target first.
    ///
    /// Note that keys present in a source map still replace the target's
    /// entries; see [`Value::merge`](crate::Value::merge).
    #[must_use]
    pub const fn fill_defaults() -> Self {
        MergeOptions {
            overwrite: false,
            typecheck: true,
        }
    }

    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn with_typecheck(mut self, typecheck: bool) -> Self {
        self.typecheck = typecheck;
        self
    }
}
