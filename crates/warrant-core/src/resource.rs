//! Resource records as seen by rule units.
//!
//! A resource is an opaque JSON object. Rule units inspect it only through
//! the documented field conventions below; a missing or mistyped field means
//! "no restriction of this kind" and never an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Field names rule units look at.
pub mod fields {
    /// List of restriction markers applied to the resource.
    pub const APPLIED_RESTRICTIONS: &str = "applied_restrictions";
    /// List of owner ids.
    pub const OWNERS: &str = "owners";
    /// List of role names allowed when the groups restriction applies.
    pub const GROUP_RESTRICTIONS: &str = "group_restrictions";
    /// Flag marking the metadata as restricted. Any truthy value counts.
    pub const METADATA_RESTRICTED: &str = "_access.metadata_restricted";
    /// Nested table: access level -> list of `{scheme, id}` identities.
    pub const ACCESS_LEVELS: &str = "internal.access_levels";
}

/// Values that may appear in `applied_restrictions`.
pub mod markers {
    pub const OWNERS: &str = "owners";
    pub const GROUPS: &str = "groups";
    pub const IP_SINGLE: &str = "ip_single";
    pub const IP_RANGE: &str = "ip_range";
}

/// A resource record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
    /// An empty resource: every restriction is inapplicable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(CoreError::ResourceNotObject("null")),
            Value::Bool(_) => Err(CoreError::ResourceNotObject("bool")),
            Value::Number(_) => Err(CoreError::ResourceNotObject("number")),
            Value::String(_) => Err(CoreError::ResourceNotObject("string")),
            Value::Array(_) => Err(CoreError::ResourceNotObject("array")),
        }
    }

    /// The underlying fields.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a value by dotted path (`"_access.metadata_restricted"`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.0.get(first)?, |value, segment| value.get(segment))
    }

    /// Restriction markers, ignoring non-string entries.
    pub fn applied_restrictions(&self) -> impl Iterator<Item = &str> {
        self.list(fields::APPLIED_RESTRICTIONS).filter_map(Value::as_str)
    }

    /// Whether `marker` is among the applied restrictions.
    pub fn has_restriction(&self, marker: &str) -> bool {
        self.applied_restrictions().any(|m| m == marker)
    }

    /// Owner ids, as text.
    pub fn owners(&self) -> impl Iterator<Item = String> + '_ {
        self.list(fields::OWNERS).filter_map(value_text)
    }

    /// Role names allowed by the groups restriction.
    pub fn group_restrictions(&self) -> impl Iterator<Item = String> + '_ {
        self.list(fields::GROUP_RESTRICTIONS).filter_map(value_text)
    }

    /// Whether the metadata is flagged restricted: the flag is present and
    /// [`truthy`]. Absent means unrestricted.
    pub fn is_metadata_restricted(&self) -> bool {
        self.get(fields::METADATA_RESTRICTED).map_or(false, truthy)
    }

    /// Identity entries listed under an access level. A lone object counts
    /// as a one-entry list.
    pub fn access_level_entries(&self, level: &str) -> impl Iterator<Item = &Value> {
        let table = self.get(fields::ACCESS_LEVELS);
        let entries: &[Value] = match table.and_then(|table| table.get(level)) {
            Some(Value::Array(items)) => items.as_slice(),
            Some(entry @ Value::Object(_)) => std::slice::from_ref(entry),
            _ => &[],
        };
        entries.iter()
    }

    fn list(&self, path: &str) -> impl Iterator<Item = &Value> {
        self.get(path).and_then(Value::as_array).into_iter().flatten()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builders
    // ─────────────────────────────────────────────────────────────────────────

    /// Set a top-level field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Append a restriction marker.
    pub fn with_restriction(mut self, marker: &str) -> Self {
        push_to_list(&mut self.0, fields::APPLIED_RESTRICTIONS, Value::from(marker));
        self
    }

    /// Set the owners list.
    pub fn with_owners<I, S>(self, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let owners: Vec<Value> = owners.into_iter().map(|o| Value::String(o.into())).collect();
        self.with_field(fields::OWNERS, owners)
    }

    /// Set the group restrictions list.
    pub fn with_groups<I, S>(self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: Vec<Value> = groups.into_iter().map(|g| Value::String(g.into())).collect();
        self.with_field(fields::GROUP_RESTRICTIONS, groups)
    }

    /// Set `_access.metadata_restricted`.
    pub fn with_metadata_restricted(mut self, flag: impl Into<Value>) -> Self {
        let mut access = take_object(&mut self.0, "_access");
        access.insert("metadata_restricted".into(), flag.into());
        self.0.insert("_access".into(), Value::Object(access));
        self
    }

    /// Add an identity to `internal.access_levels.<level>`.
    pub fn with_access_level(mut self, level: &str, scheme: &str, id: &str) -> Self {
        let mut entry = Map::new();
        entry.insert("scheme".into(), Value::from(scheme));
        entry.insert("id".into(), Value::from(id));

        let mut internal = take_object(&mut self.0, "internal");
        let mut levels = take_object(&mut internal, "access_levels");
        push_to_list(&mut levels, level, Value::Object(entry));
        internal.insert("access_levels".into(), Value::Object(levels));
        self.0.insert("internal".into(), Value::Object(internal));
        self
    }
}

impl TryFrom<Value> for Resource {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Textual form of a scalar id value. Strings as-is, numbers rendered.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Truthiness of a flag value: null, `false`, zero and empty strings, lists
/// and objects are false; everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Remove the object under `key`, or start a fresh one if it is missing or
/// not an object.
fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    }
}

fn push_to_list(map: &mut Map<String, Value>, key: &str, value: Value) {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    match slot {
        Value::Array(items) => items.push(value),
        other => *other = Value::Array(vec![value]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_mean_no_restriction() {
        let resource = Resource::new();
        assert_eq!(resource.applied_restrictions().count(), 0);
        assert_eq!(resource.owners().count(), 0);
        assert!(!resource.is_metadata_restricted());
        assert_eq!(resource.access_level_entries("metadata_curator").count(), 0);
    }

    #[test]
    fn test_dotted_lookup() {
        let resource = Resource::from_value(json!({
            "_access": {"metadata_restricted": true},
            "internal": {"access_levels": {"metadata_curator": [{"scheme": "person", "id": "4"}]}}
        }))
        .unwrap();

        assert!(resource.is_metadata_restricted());
        assert_eq!(resource.get("_access.missing"), None);
        assert_eq!(resource.access_level_entries("metadata_curator").count(), 1);
    }

    #[test]
    fn test_mistyped_fields_are_ignored() {
        let resource = Resource::from_value(json!({
            "applied_restrictions": "owners",
            "owners": [1, "2", null, {"id": 3}],
            "_access": {"metadata_restricted": "yes"}
        }))
        .unwrap();

        assert!(!resource.has_restriction("owners"));
        assert_eq!(resource.owners().collect::<Vec<_>>(), vec!["1", "2"]);
        assert!(resource.is_metadata_restricted());
    }

    #[test]
    fn test_truthy_flags_restrict() {
        let restricted = [
            json!(true),
            json!("true"),
            json!("yes"),
            json!("false"),
            json!(1),
            json!([0]),
        ];
        let open = [
            json!(false),
            json!(null),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ];

        for flag in restricted {
            let resource = Resource::new().with_metadata_restricted(flag.clone());
            assert!(resource.is_metadata_restricted(), "{flag}");
        }
        for flag in open {
            let resource = Resource::new().with_metadata_restricted(flag.clone());
            assert!(!resource.is_metadata_restricted(), "{flag}");
        }
    }

    #[test]
    fn test_single_access_level_entry() {
        let resource = Resource::from_value(json!({
            "internal": {"access_levels": {"metadata_curator": {"scheme": "person", "id": "4"}}}
        }))
        .unwrap();
        assert_eq!(resource.access_level_entries("metadata_curator").count(), 1);
    }

    #[test]
    fn test_builders_replace_non_object_parents() {
        let resource = Resource::from_value(json!({"_access": "open", "internal": [1]}))
            .unwrap()
            .with_metadata_restricted(true)
            .with_access_level("metadata_curator", "person", "7");

        assert!(resource.is_metadata_restricted());
        assert_eq!(resource.access_level_entries("metadata_curator").count(), 1);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(matches!(
            Resource::from_value(json!([1, 2])),
            Err(CoreError::ResourceNotObject("array"))
        ));
    }

    #[test]
    fn test_builders() {
        let resource = Resource::new()
            .with_restriction(markers::OWNERS)
            .with_restriction(markers::GROUPS)
            .with_owners(["U1", "U2"])
            .with_groups(["B"])
            .with_metadata_restricted(true)
            .with_access_level("metadata_curator", "person", "7");

        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({
                "applied_restrictions": ["owners", "groups"],
                "owners": ["U1", "U2"],
                "group_restrictions": ["B"],
                "_access": {"metadata_restricted": true},
                "internal": {"access_levels": {"metadata_curator": [{"scheme": "person", "id": "7"}]}}
            })
        );
    }
}
