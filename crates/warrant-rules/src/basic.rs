//! Unconditional rule units.
//!
//! None of these look at the resource.

use warrant_core::{ActorContext, Claim, ClaimSet, Predicate, Resource};

use crate::unit::{kinds, RuleUnit};

/// Allows every actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnyActor;

impl RuleUnit for AnyActor {
    fn kind(&self) -> &str {
        kinds::ANY_ACTOR
    }

    fn granting_claims(&self, _resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        ClaimSet::from([Claim::Any])
    }

    fn filter_predicate(&self, _actor: &ActorContext) -> Option<Predicate> {
        Some(Predicate::MatchAll)
    }
}

/// Allows super-users.
///
/// Contributes no filter: super-users are let through by the evaluator, and
/// a listing is narrowed only by the filters other units contribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuperUser;

impl RuleUnit for SuperUser {
    fn kind(&self) -> &str {
        kinds::SUPER_USER
    }

    fn granting_claims(&self, _resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        ClaimSet::from([Claim::super_user()])
    }
}

/// Allows actors holding the `admin-access` action. Not the same as a
/// super-user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdministrativeRole;

impl RuleUnit for AdministrativeRole {
    fn kind(&self) -> &str {
        kinds::ADMIN
    }

    fn granting_claims(&self, _resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        ClaimSet::from([Claim::admin_access()])
    }
}

/// Denies everyone, super-users included.
///
/// A policy substitutes this unit for any action it has no entry for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Disable;

impl RuleUnit for Disable {
    fn kind(&self) -> &str {
        kinds::DISABLE
    }

    fn denying_claims(&self, _resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        ClaimSet::from([Claim::Any])
    }

    fn filter_predicate(&self, _actor: &ActorContext) -> Option<Predicate> {
        Some(Predicate::MatchNone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_actor() {
        let actor = ActorContext::anonymous();
        assert_eq!(AnyActor.granting_claims(None, &actor), ClaimSet::from([Claim::Any]));
        assert!(AnyActor.denying_claims(None, &actor).is_empty());
        assert_eq!(AnyActor.filter_predicate(&actor), Some(Predicate::MatchAll));
    }

    #[test]
    fn test_super_user_has_no_filter() {
        let actor = ActorContext::user("root").as_super_user();
        assert_eq!(
            SuperUser.granting_claims(None, &actor),
            ClaimSet::from([Claim::super_user()])
        );
        assert_eq!(SuperUser.filter_predicate(&actor), None);
    }

    #[test]
    fn test_admin_grants_admin_access() {
        let actor = ActorContext::user("U1");
        let grants = AdministrativeRole.granting_claims(Some(&Resource::new()), &actor);
        assert_eq!(grants, ClaimSet::from([Claim::action("admin-access")]));
        assert_eq!(AdministrativeRole.filter_predicate(&actor), None);
    }

    #[test]
    fn test_disable_denies_any() {
        let actor = ActorContext::user("root").as_super_user();
        assert!(Disable.granting_claims(None, &actor).is_empty());
        assert_eq!(Disable.denying_claims(None, &actor), ClaimSet::from([Claim::Any]));
        assert_eq!(Disable.filter_predicate(&actor), Some(Predicate::MatchNone));
    }
}
