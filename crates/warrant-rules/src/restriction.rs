//! Rule units keyed on restriction metadata carried by the resource.

use warrant_core::{fields, markers, ActorContext, Claim, ClaimSet, Predicate, Resource};

use crate::unit::{kinds, RuleUnit};

/// Allows every actor unless the resource metadata is flagged restricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicIfUnrestricted;

impl RuleUnit for PublicIfUnrestricted {
    fn kind(&self) -> &str {
        kinds::PUBLIC_IF_UNRESTRICTED
    }

    fn granting_claims(&self, resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        let restricted = resource.map_or(false, Resource::is_metadata_restricted);
        if restricted {
            ClaimSet::new()
        } else {
            ClaimSet::from([Claim::Any])
        }
    }

    fn filter_predicate(&self, _actor: &ActorContext) -> Option<Predicate> {
        // A boolean match tests truthiness, as the grant side does.
        Some(!Predicate::field(fields::METADATA_RESTRICTED, true))
    }
}

/// Allows only the listed owners when the `owners` restriction is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerOnly;

impl RuleUnit for OwnerOnly {
    fn kind(&self) -> &str {
        kinds::OWNER_ONLY
    }

    fn granting_claims(&self, resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        match resource {
            Some(r) if r.has_restriction(markers::OWNERS) => {
                r.owners().map(Claim::ActorId).collect()
            }
            _ => ClaimSet::from([Claim::Any]),
        }
    }

    fn filter_predicate(&self, actor: &ActorContext) -> Option<Predicate> {
        let Some(id) = actor.id_claim() else {
            return Some(Predicate::MatchNone);
        };
        Some(
            Predicate::field(fields::APPLIED_RESTRICTIONS, markers::OWNERS)
                & Predicate::field(fields::OWNERS, id),
        )
    }
}

/// Allows actors holding one of the listed roles when the `groups`
/// restriction is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupRestricted;

impl RuleUnit for GroupRestricted {
    fn kind(&self) -> &str {
        kinds::GROUP_RESTRICTED
    }

    fn granting_claims(&self, resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        match resource {
            Some(r) if r.has_restriction(markers::GROUPS) => {
                r.group_restrictions().map(Claim::Role).collect()
            }
            _ => ClaimSet::from([Claim::Any]),
        }
    }

    fn filter_predicate(&self, actor: &ActorContext) -> Option<Predicate> {
        let roles: Vec<Predicate> = actor
            .role_claims()
            .map(|role| Predicate::field(fields::GROUP_RESTRICTIONS, role))
            .collect();

        if roles.is_empty() {
            return Some(Predicate::MatchNone);
        }

        Some(
            Predicate::field(fields::APPLIED_RESTRICTIONS, markers::GROUPS)
                & Predicate::any_of(roles),
        )
    }
}
