//! Access-level table rule unit.
//!
//! Resources carry a nested table `internal.access_levels` mapping a level
//! name to the identities holding it:
//!
//! ```json
//! {"internal": {"access_levels": {"metadata_curator": [{"scheme": "person", "id": "4"}]}}}
//! ```
//!
//! Each action maps to the levels that allow it. Only the `person` scheme
//! is understood; entries of any other scheme are skipped. Numeric ids are
//! read as their text and keys other than `scheme` and `id` are ignored, on
//! both the grant side and the filter side.

use serde_json::json;

use warrant_core::{fields, value_text, ActorContext, Claim, ClaimSet, Predicate, Resource};

use crate::unit::{kinds, RuleUnit};

/// Identity scheme the table entries must use.
pub const PERSON_SCHEME: &str = "person";

/// Action the unit is configured for when none is given.
pub const DEFAULT_ACTION: &str = "read";

/// Levels that allow each action.
const ACTION_TO_ACCESS_LEVELS: &[(&str, &[&str])] = &[
    ("create", &[]),
    ("read", &["metadata_curator"]),
    ("update", &["metadata_curator"]),
    ("delete", &[]),
];

/// Access levels that allow `action`. Unknown actions have none.
pub fn access_levels_for(action: &str) -> &'static [&'static str] {
    ACTION_TO_ACCESS_LEVELS
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, levels)| *levels)
        .unwrap_or(&[])
}

/// Allows the people listed under the access levels tied to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLevelTable {
    action: String,
}

impl AccessLevelTable {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }

    /// The action this unit was configured for.
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl Default for AccessLevelTable {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION)
    }
}

impl RuleUnit for AccessLevelTable {
    fn kind(&self) -> &str {
        kinds::ACCESS_LEVEL
    }

    fn granting_claims(&self, resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        let Some(resource) = resource else {
            return ClaimSet::new();
        };

        access_levels_for(&self.action)
            .iter()
            .flat_map(|level| resource.access_level_entries(level))
            .filter(|entry| entry.get("scheme").and_then(|s| s.as_str()) == Some(PERSON_SCHEME))
            .filter_map(|entry| entry.get("id").and_then(value_text))
            .filter(|id| !id.is_empty())
            .map(Claim::ActorId)
            .collect()
    }

    /// Listings are governed by the `read` levels whatever action the unit
    /// was built for. An actor without an id gets no contribution at all,
    /// rather than a match-none.
    fn filter_predicate(&self, actor: &ActorContext) -> Option<Predicate> {
        let id = actor.id_claim()?;
        if id.is_empty() {
            // Empty ids are never granted.
            return Some(Predicate::MatchNone);
        }
        let levels = access_levels_for(DEFAULT_ACTION);
        if levels.is_empty() {
            return None;
        }

        Some(Predicate::any_of(levels.iter().map(|level| {
            Predicate::field(
                format!("{}.{}", fields::ACCESS_LEVELS, level),
                json!({"scheme": PERSON_SCHEME, "id": id}),
            )
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curated() -> Resource {
        Resource::new()
            .with_access_level("metadata_curator", "person", "4")
            .with_access_level("metadata_curator", "orcid", "0000-0001")
            .with_access_level("files_reader", "person", "9")
    }

    #[test]
    fn test_levels_table() {
        assert_eq!(access_levels_for("read"), &["metadata_curator"]);
        assert_eq!(access_levels_for("update"), &["metadata_curator"]);
        assert!(access_levels_for("delete").is_empty());
        assert!(access_levels_for("publish").is_empty());
    }

    #[test]
    fn test_grants_person_ids_for_action_levels() {
        let actor = ActorContext::anonymous();
        let read = AccessLevelTable::new("read");

        assert_eq!(
            read.granting_claims(Some(&curated()), &actor),
            ClaimSet::from([Claim::actor("4")])
        );
    }

    #[test]
    fn test_actions_without_levels_grant_nothing() {
        let actor = ActorContext::anonymous();
        assert!(AccessLevelTable::new("delete")
            .granting_claims(Some(&curated()), &actor)
            .is_empty());
    }

    #[test]
    fn test_no_resource_grants_nothing() {
        let actor = ActorContext::user("4");
        assert!(AccessLevelTable::default().granting_claims(None, &actor).is_empty());
    }

    #[test]
    fn test_entries_without_id_are_skipped() {
        let resource = Resource::from_value(json!({
            "internal": {"access_levels": {"metadata_curator": [
                {"scheme": "person"},
                {"scheme": "person", "id": ""},
                {"scheme": "person", "id": 12}
            ]}}
        }))
        .unwrap();

        let actor = ActorContext::anonymous();
        assert_eq!(
            AccessLevelTable::default().granting_claims(Some(&resource), &actor),
            ClaimSet::from([Claim::actor("12")])
        );
    }

    fn grant_and_filter_agree(resource: &Resource, actor: &ActorContext) -> bool {
        let unit = AccessLevelTable::default();
        let allowed = actor.holds_any(&unit.granting_claims(Some(resource), actor));
        let listed = unit
            .filter_predicate(actor)
            .map_or(true, |filter| filter.matches(resource));
        assert_eq!(allowed, listed);
        allowed
    }

    #[test]
    fn test_numeric_id_is_listed() {
        let resource = Resource::from_value(json!({
            "internal": {"access_levels": {"metadata_curator": [{"scheme": "person", "id": 12}]}}
        }))
        .unwrap();

        assert!(grant_and_filter_agree(&resource, &ActorContext::user("12")));
        assert!(!grant_and_filter_agree(&resource, &ActorContext::user("13")));
    }

    #[test]
    fn test_extra_entry_keys_are_ignored() {
        let resource = Resource::from_value(json!({
            "internal": {"access_levels": {"metadata_curator": [
                {"scheme": "person", "id": "4", "name": "Ada"}
            ]}}
        }))
        .unwrap();

        assert!(grant_and_filter_agree(&resource, &ActorContext::user("4")));
    }

    #[test]
    fn test_other_schemes_are_not_listed() {
        let resource = Resource::new().with_access_level("metadata_curator", "orcid", "4");
        assert!(!grant_and_filter_agree(&resource, &ActorContext::user("4")));
    }

    #[test]
    fn test_single_entry_object_is_listed() {
        let resource = Resource::from_value(json!({
            "internal": {"access_levels": {"metadata_curator": {"scheme": "person", "id": "4"}}}
        }))
        .unwrap();
        assert!(grant_and_filter_agree(&resource, &ActorContext::user("4")));
    }

    #[test]
    fn test_empty_id_is_not_listed() {
        let resource = Resource::from_value(json!({
            "internal": {"access_levels": {"metadata_curator": [{"scheme": "person", "id": ""}]}}
        }))
        .unwrap();
        assert!(!grant_and_filter_agree(&resource, &ActorContext::user("")));
    }

    #[test]
    fn test_filter_uses_read_levels() {
        let unit = AccessLevelTable::new("delete");
        let filter = unit.filter_predicate(&ActorContext::user("4")).unwrap();

        assert_eq!(
            filter,
            Predicate::field(
                "internal.access_levels.metadata_curator",
                json!({"scheme": "person", "id": "4"})
            )
        );
        assert!(filter.matches(&curated()));
        assert!(!filter.matches(&Resource::new()));
    }

    #[test]
    fn test_filter_without_id_is_no_op() {
        let unit = AccessLevelTable::default();
        assert_eq!(unit.filter_predicate(&ActorContext::anonymous()), None);
    }
}
