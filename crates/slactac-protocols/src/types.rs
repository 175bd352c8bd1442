//! Common value types shared across the workspace.

use std::collections::BTreeMap;

/// Label text as the host page originally rendered it.
pub type OriginalLabel = String;

/// User-chosen replacement text for a label.
pub type OverrideLabel = String;

/// Mapping from original label to override label.
///
/// Ordered so listings and persisted files are stable.
pub type OverrideDictionary = BTreeMap<OriginalLabel, OverrideLabel>;
