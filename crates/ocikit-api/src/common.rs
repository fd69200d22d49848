// Types shared by the model modules of both services.

use std::collections::BTreeMap;

/// Free-form `key → value` tags with no predefined namespace.
pub type FreeformTags = BTreeMap<String, String>;

/// Namespace-scoped tags: `namespace → key → value`.
pub type DefinedTags = BTreeMap<String, BTreeMap<String, serde_json::Value>>;
