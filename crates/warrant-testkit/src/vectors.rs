//! Decision vectors: known inputs with their expected outcomes.
//!
//! Each vector is a small action table, an actor, a resource and the
//! decision every implementation must reach. The fixtures' network config is
//! injected into the network units.

use serde::Serialize;
use serde_json::{json, Value};

use warrant_core::{ActorContext, Resource};
use warrant_policy::{ActionTable, Evaluator, Policy};
use warrant_rules::RuleRegistry;

use crate::fixtures::{ip, network_config};

/// A decision vector.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Action table, as configuration JSON.
    pub table: Value,
    /// Action to evaluate.
    pub action: &'static str,
    pub actor_id: Option<&'static str>,
    pub roles: &'static [&'static str],
    pub super_user: bool,
    pub address: Option<&'static str>,
    /// Resource record, as JSON.
    pub resource: Value,
    /// Expected decision.
    pub expected: bool,
}

impl DecisionVector {
    pub fn actor(&self) -> ActorContext {
        let mut actor = match self.actor_id {
            Some(id) => ActorContext::user(id),
            None => ActorContext::anonymous(),
        }
        .with_roles(self.roles.iter().copied());

        if self.super_user {
            actor = actor.as_super_user();
        }
        if let Some(address) = self.address {
            actor = actor.with_address(ip(address));
        }
        actor
    }

    pub fn resource(&self) -> Resource {
        Resource::from_value(self.resource.clone()).expect("vector resource is an object")
    }

    pub fn policy(&self) -> Policy {
        let table: ActionTable =
            serde_json::from_value(self.table.clone()).expect("vector table is valid");
        Policy::from_specs("vectors", &table, &RuleRegistry::builtin(), &network_config())
            .expect("vector units are built-in")
    }

    /// Evaluate the vector with `evaluator`.
    pub fn evaluate(&self, evaluator: &Evaluator) -> bool {
        evaluator.evaluate(&self.policy(), self.action, Some(&self.resource()), &self.actor())
    }
}

fn vector(
    name: &'static str,
    table: Value,
    action: &'static str,
    actor_id: Option<&'static str>,
    resource: Value,
    expected: bool,
) -> DecisionVector {
    DecisionVector {
        name,
        table,
        action,
        actor_id,
        roles: &[],
        super_user: false,
        address: None,
        resource,
        expected,
    }
}

/// Get all decision vectors.
pub fn all_vectors() -> Vec<DecisionVector> {
    let owned = json!({"applied_restrictions": ["owners"], "owners": ["U1", "U2"]});
    let grouped = json!({"applied_restrictions": ["groups"], "group_restrictions": ["B", "C"]});
    let ip_marked = json!({"applied_restrictions": ["ip_single"]});
    let ranged = json!({"applied_restrictions": ["ip_range"]});
    let curated = json!({
        "internal": {"access_levels": {"metadata_curator": [{"scheme": "person", "id": "U4"}]}}
    });
    let owner_only = json!({"read": [{"type": "owner_only"}]});
    let groups_only = json!({"read": [{"type": "group_restricted"}]});
    let ip_single = json!({"read": [{"type": "ip_single"}]});
    let ip_range = json!({"read": [{"type": "ip_range"}]});

    vec![
        vector("owner is granted", owner_only.clone(), "read", Some("U1"), owned.clone(), true),
        vector("non-owner is denied", owner_only.clone(), "read", Some("U3"), owned.clone(), false),
        vector("anonymous is denied owned", owner_only, "read", None, owned, false),
        DecisionVector {
            roles: &["A"],
            ..vector(
                "no matching role",
                groups_only.clone(),
                "read",
                Some("U1"),
                grouped.clone(),
                false,
            )
        },
        DecisionVector {
            roles: &["A", "C"],
            ..vector("one matching role", groups_only, "read", Some("U1"), grouped, true)
        },
        DecisionVector {
            address: Some("10.0.0.5"),
            ..vector(
                "allowed address",
                ip_single.clone(),
                "read",
                Some("U1"),
                ip_marked.clone(),
                true,
            )
        },
        DecisionVector {
            address: Some("10.0.0.9"),
            ..vector(
                "other address",
                ip_single.clone(),
                "read",
                Some("U1"),
                ip_marked.clone(),
                false,
            )
        },
        vector("no address", ip_single.clone(), "read", Some("U1"), ip_marked, false),
        DecisionVector {
            address: Some("10.0.0.9"),
            ..vector("unmarked ignores address", ip_single, "read", Some("U1"), json!({}), true)
        },
        DecisionVector {
            address: Some("10.1.0.255"),
            ..vector(
                "range upper bound",
                ip_range.clone(),
                "read",
                Some("U1"),
                ranged.clone(),
                true,
            )
        },
        DecisionVector {
            address: Some("10.1.1.0"),
            ..vector("past range", ip_range, "read", Some("U1"), ranged, false)
        },
        vector(
            "public unrestricted",
            json!({"read": [{"type": "public_if_unrestricted"}]}),
            "read",
            None,
            json!({}),
            true,
        ),
        vector(
            "public restricted",
            json!({"read": [{"type": "public_if_unrestricted"}]}),
            "read",
            None,
            json!({"_access": {"metadata_restricted": true}}),
            false,
        ),
        vector(
            "public flagged by text",
            json!({"read": [{"type": "public_if_unrestricted"}]}),
            "read",
            None,
            json!({"_access": {"metadata_restricted": "yes"}}),
            false,
        ),
        vector(
            "deny beats grant",
            json!({"read": [{"type": "any_actor"}, {"type": "disable"}]}),
            "read",
            Some("U1"),
            json!({}),
            false,
        ),
        vector(
            "configured empty denies users",
            json!({"update": []}),
            "update",
            Some("U1"),
            json!({}),
            false,
        ),
        DecisionVector {
            super_user: true,
            ..vector(
                "configured empty admits root",
                json!({"update": []}),
                "update",
                Some("root"),
                json!({}),
                true,
            )
        },
        DecisionVector {
            super_user: true,
            ..vector(
                "unconfigured denies root",
                json!({"update": []}),
                "delete",
                Some("root"),
                json!({}),
                false,
            )
        },
        vector(
            "curator reads",
            json!({"read": [{"type": "access_level", "action": "read"}]}),
            "read",
            Some("U4"),
            curated.clone(),
            true,
        ),
        vector(
            "curator cannot delete",
            json!({"delete": [{"type": "access_level", "action": "delete"}]}),
            "delete",
            Some("U4"),
            curated,
            false,
        ),
        vector(
            "numeric curator id",
            json!({"read": [{"type": "access_level", "action": "read"}]}),
            "read",
            Some("12"),
            json!({
                "internal": {"access_levels": {"metadata_curator": [{"scheme": "person", "id": 12}]}}
            }),
            true,
        ),
    ]
}

/// Evaluate every vector, returning (name, passed).
pub fn verify_all_vectors(evaluator: &Evaluator) -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| (v.name.to_string(), v.evaluate(evaluator) == v.expected))
        .collect()
}
