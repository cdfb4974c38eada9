//! The decision evaluator.
//!
//! ## Decision rule
//!
//! ```text
//! granting = policy.granting_claims(action, resource, actor) ∪ {superuser-access}
//! denying  = policy.denying_claims(action, resource, actor)
//! allowed  = matcher.satisfies_any(actor, granting)
//!            && !matcher.satisfies_any(actor, denying)
//! ```
//!
//! Super-users are implicit members of every granting set and are subject
//! to the same deny override as anyone else. An unconfigured action denies
//! `Any`, so nobody passes it; an action configured with no units lets only
//! super-users through.
//!
//! ## Search filters
//!
//! The filter for a listing is the OR of every unit's predicate. With no
//! predicates at all it is match-all. This differs from the fail-closed
//! decision rule above and is kept that way.

use std::fmt;
use std::sync::Arc;

use warrant_core::{ActorContext, Claim, ClaimSet, Predicate, Resource};

use crate::policy::Policy;

/// Decides whether an actor satisfies a set of claims.
///
/// Implementations may expand claims first (administrative actions to the
/// people holding them, super-user to everything); the evaluator assumes
/// such expansion has already happened.
pub trait ClaimMatcher: Send + Sync + fmt::Debug {
    /// True if the actor satisfies at least one claim of `claims`.
    fn satisfies_any(&self, actor: &ActorContext, claims: &ClaimSet) -> bool;
}

/// Matches by plain membership in the actor's provided claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldClaimMatcher;

impl ClaimMatcher for HeldClaimMatcher {
    fn satisfies_any(&self, actor: &ActorContext, claims: &ClaimSet) -> bool {
        actor.holds_any(claims)
    }
}

/// A decision and the claim sets it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub granting: ClaimSet,
    pub denying: ClaimSet,
}

impl Decision {
    /// Denying claims the actor holds, i.e. why a granted actor was refused.
    pub fn held_denials<'a>(&'a self, actor: &'a ActorContext) -> impl Iterator<Item = &'a Claim> {
        self.denying.iter().filter(move |claim| actor.holds(claim))
    }
}

/// Evaluates policies against actors.
///
/// Stateless apart from the matcher; share one across threads freely.
#[derive(Debug, Clone)]
pub struct Evaluator {
    matcher: Arc<dyn ClaimMatcher>,
}

impl Evaluator {
    pub fn new(matcher: Arc<dyn ClaimMatcher>) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &Arc<dyn ClaimMatcher> {
        &self.matcher
    }

    /// Compute a decision along with its claim sets.
    pub fn decide(
        &self,
        policy: &Policy,
        action: &str,
        resource: Option<&Resource>,
        actor: &ActorContext,
    ) -> Decision {
        let mut granting = policy.granting_claims(action, resource, actor);
        granting.insert(Claim::super_user());
        let denying = policy.denying_claims(action, resource, actor);

        let allowed = self.matcher.satisfies_any(actor, &granting)
            && !self.matcher.satisfies_any(actor, &denying);

        tracing::debug!(
            resource_type = %policy.name(),
            action,
            allowed,
            granting = granting.len(),
            denying = denying.len(),
            "evaluated"
        );

        Decision {
            allowed,
            granting,
            denying,
        }
    }

    /// Whether the actor may perform `action`.
    pub fn evaluate(
        &self,
        policy: &Policy,
        action: &str,
        resource: Option<&Resource>,
        actor: &ActorContext,
    ) -> bool {
        self.decide(policy, action, resource, actor).allowed
    }

    /// The filter restricting a listing to what the actor may see.
    pub fn search_filter(&self, policy: &Policy, action: &str, actor: &ActorContext) -> Predicate {
        let filter = Predicate::any_of(policy.filter_predicates(action, actor));
        tracing::debug!(resource_type = %policy.name(), action, %filter, "search filter");
        filter
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Arc::new(HeldClaimMatcher))
    }
}
