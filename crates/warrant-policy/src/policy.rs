//! Policies: per-action tables of rule units for one resource type.
//!
//! A policy answers the three projections for an action by composing the
//! units configured for it:
//!
//! - granting claims: union over units
//! - denying claims: union over units
//! - filter predicates: every unit's predicate, in configuration order,
//!   skipping units with no opinion; callers OR them together
//!
//! An action with no entry in the table is answered by a single implicit
//! [`Disable`] unit. An action configured with an empty list has no units:
//! it grants nothing, denies nothing and contributes no filters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use warrant_core::{ActorContext, ClaimSet, Predicate, Resource};
use warrant_rules::{Disable, NetworkConfig, RuleRegistry, RuleSpec, RuleUnit};

use crate::error::{PolicyError, Result};

/// Action name → ordered rule specs, as written in configuration.
pub type ActionTable = BTreeMap<String, Vec<RuleSpec>>;

/// An immutable per-action table of rule units.
///
/// Built once at startup and shared across threads.
#[derive(Clone)]
pub struct Policy {
    name: String,
    actions: BTreeMap<String, Vec<Arc<dyn RuleUnit>>>,
    fallback: Vec<Arc<dyn RuleUnit>>,
}

impl Policy {
    /// Start building a policy for a resource type.
    pub fn builder(name: impl Into<String>) -> PolicyBuilder {
        PolicyBuilder {
            name: name.into(),
            actions: BTreeMap::new(),
        }
    }

    /// Build a policy from configured specs.
    pub fn from_specs(
        name: impl Into<String>,
        table: &ActionTable,
        rules: &RuleRegistry,
        network: &NetworkConfig,
    ) -> Result<Self> {
        let mut builder = Self::builder(name);
        for (action, specs) in table {
            let units = specs
                .iter()
                .map(|spec| rules.build(spec, network))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|source| PolicyError::Rule {
                    policy: builder.name.clone(),
                    action: action.clone(),
                    source,
                })?;
            builder = builder.action(action.clone(), units);
        }
        Ok(builder.build())
    }

    /// The resource type this policy governs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured action names, in order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Whether the action has an entry (possibly empty) in the table.
    pub fn is_configured(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// Units answering for `action`; the implicit `Disable` when the action
    /// has no entry.
    pub fn units(&self, action: &str) -> &[Arc<dyn RuleUnit>] {
        self.actions
            .get(action)
            .map(Vec::as_slice)
            .unwrap_or(&self.fallback)
    }

    /// Union of every unit's granting claims.
    pub fn granting_claims(
        &self,
        action: &str,
        resource: Option<&Resource>,
        actor: &ActorContext,
    ) -> ClaimSet {
        self.units(action)
            .iter()
            .flat_map(|unit| {
                let claims = unit.granting_claims(resource, actor);
                tracing::trace!(
                    policy = %self.name,
                    action,
                    unit = unit.kind(),
                    ?claims,
                    "granting claims"
                );
                claims
            })
            .collect()
    }

    /// Union of every unit's denying claims.
    pub fn denying_claims(
        &self,
        action: &str,
        resource: Option<&Resource>,
        actor: &ActorContext,
    ) -> ClaimSet {
        self.units(action)
            .iter()
            .flat_map(|unit| {
                let claims = unit.denying_claims(resource, actor);
                tracing::trace!(
                    policy = %self.name,
                    action,
                    unit = unit.kind(),
                    ?claims,
                    "denying claims"
                );
                claims
            })
            .collect()
    }

    /// Every unit's filter predicate, in order, skipping units with none.
    pub fn filter_predicates(&self, action: &str, actor: &ActorContext) -> Vec<Predicate> {
        self.units(action)
            .iter()
            .filter_map(|unit| unit.filter_predicate(actor))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Default policies
    // ─────────────────────────────────────────────────────────────────────────

    /// Default policy for published records.
    ///
    /// Anyone may list; reading metadata or files needs the record to be
    /// public or the actor to be an owner; everything else is super-user only.
    pub fn records() -> Self {
        use warrant_rules::{AnyActor, OwnerOnly, PublicIfUnrestricted};

        let readers = || -> Vec<Arc<dyn RuleUnit>> {
            vec![Arc::new(PublicIfUnrestricted), Arc::new(OwnerOnly)]
        };

        Self::builder("records")
            .action("list", vec![Arc::new(AnyActor)])
            .action("create", vec![])
            .action("read", readers())
            .action("read_files", readers())
            .action("update", vec![])
            .action("update_files", vec![])
            .action("delete", vec![])
            .build()
    }

    /// Default policy for deposits (drafts).
    ///
    /// Any actor may create one; only owners may list or read; updating and
    /// deleting are super-user only.
    pub fn deposits() -> Self {
        use warrant_rules::{AnyActor, OwnerOnly};

        Self::builder("deposits")
            .action("list", vec![Arc::new(OwnerOnly)])
            .action("create", vec![Arc::new(AnyActor)])
            .action("read", vec![Arc::new(OwnerOnly)])
            .action("update", vec![])
            .action("delete", vec![])
            .build()
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actions: BTreeMap<&str, Vec<&str>> = self
            .actions
            .iter()
            .map(|(action, units)| (action.as_str(), units.iter().map(|u| u.kind()).collect()))
            .collect();
        f.debug_struct("Policy")
            .field("name", &self.name)
            .field("actions", &actions)
            .finish()
    }
}

/// Builder for [`Policy`].
pub struct PolicyBuilder {
    name: String,
    actions: BTreeMap<String, Vec<Arc<dyn RuleUnit>>>,
}

impl PolicyBuilder {
    /// Set the units for an action, replacing any earlier entry. An empty
    /// list configures the action with no units.
    pub fn action(mut self, action: impl Into<String>, units: Vec<Arc<dyn RuleUnit>>) -> Self {
        self.actions.insert(action.into(), units);
        self
    }

    /// Append one unit to an action's list.
    pub fn allow(mut self, action: impl Into<String>, unit: impl RuleUnit + 'static) -> Self {
        self.actions
            .entry(action.into())
            .or_default()
            .push(Arc::new(unit));
        self
    }

    pub fn build(self) -> Policy {
        tracing::debug!(policy = %self.name, actions = self.actions.len(), "built policy");
        Policy {
            name: self.name,
            actions: self.actions,
            fallback: vec![Arc::new(Disable)],
        }
    }
}
