//! Permission handles: one action on one (optional) resource, resolved to
//! its policy up front so the remaining calls cannot fail.

use std::sync::Arc;

use warrant_core::{ActorContext, ClaimSet, Predicate, Resource};
use warrant_policy::{Decision, Evaluator, Policy};

/// A bound permission check.
#[derive(Debug, Clone)]
pub struct Permission<'a> {
    policy: Arc<Policy>,
    evaluator: &'a Evaluator,
    action: String,
    resource: Option<&'a Resource>,
}

impl<'a> Permission<'a> {
    pub fn new(
        policy: Arc<Policy>,
        evaluator: &'a Evaluator,
        action: impl Into<String>,
        resource: Option<&'a Resource>,
    ) -> Self {
        Self {
            policy,
            evaluator,
            action: action.into(),
            resource,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resource(&self) -> Option<&'a Resource> {
        self.resource
    }

    /// Whether the actor is allowed.
    pub fn allows(&self, actor: &ActorContext) -> bool {
        self.decide(actor).allowed
    }

    pub fn decide(&self, actor: &ActorContext) -> Decision {
        self.evaluator
            .decide(&self.policy, &self.action, self.resource, actor)
    }

    /// Claims granting this permission, before the implicit super-user.
    pub fn granting_claims(&self, actor: &ActorContext) -> ClaimSet {
        self.policy
            .granting_claims(&self.action, self.resource, actor)
    }

    pub fn denying_claims(&self, actor: &ActorContext) -> ClaimSet {
        self.policy
            .denying_claims(&self.action, self.resource, actor)
    }

    /// Search filter for the action. Ignores the bound resource.
    pub fn query_filter(&self, actor: &ActorContext) -> Predicate {
        self.evaluator
            .search_filter(&self.policy, &self.action, actor)
    }
}
