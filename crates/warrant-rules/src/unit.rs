//! The rule unit trait.
//!
//! A rule unit encodes one access rule and projects it three ways:
//!
//! | Projection          | Question answered                                   |
//! |---------------------|-----------------------------------------------------|
//! | `granting_claims`   | which claims allow the action on this resource?     |
//! | `denying_claims`    | which claims forbid it, whatever else grants it?    |
//! | `filter_predicate`  | which resources may this actor see in a listing?    |
//!
//! The default implementations return the empty set and no predicate, so a
//! unit overrides only the projections it has an opinion on.

use std::fmt;

use warrant_core::{ActorContext, ClaimSet, Predicate, Resource};

/// Identifiers of the built-in rule units, as used in configuration.
pub mod kinds {
    pub const ANY_ACTOR: &str = "any_actor";
    pub const SUPER_USER: &str = "super_user";
    pub const ADMIN: &str = "admin";
    pub const DISABLE: &str = "disable";
    pub const PUBLIC_IF_UNRESTRICTED: &str = "public_if_unrestricted";
    pub const OWNER_ONLY: &str = "owner_only";
    pub const GROUP_RESTRICTED: &str = "group_restricted";
    pub const IP_SINGLE: &str = "ip_single";
    pub const IP_RANGE: &str = "ip_range";
    pub const ACCESS_LEVEL: &str = "access_level";
}

/// A pluggable access rule.
///
/// # Contract
///
/// Every projection must be a pure function of its arguments and the unit's
/// construction parameters: no interior mutability, no I/O. Units are shared
/// across threads behind `Arc` and called concurrently.
///
/// A `None` resource, or a resource missing the fields a unit inspects,
/// means the unit's restriction does not apply.
///
/// `filter_predicate` returning `None` means "no opinion" and is distinct
/// from returning [`Predicate::MatchNone`].
pub trait RuleUnit: fmt::Debug + Send + Sync {
    /// Configuration identifier of this unit.
    fn kind(&self) -> &str;

    /// Claims that grant the action if the actor provides any one of them.
    fn granting_claims(&self, _resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        ClaimSet::new()
    }

    /// Claims that revoke the action if the actor provides any one of them.
    fn denying_claims(&self, _resource: Option<&Resource>, _actor: &ActorContext) -> ClaimSet {
        ClaimSet::new()
    }

    /// Filter restricting a listing to what this unit would allow.
    fn filter_predicate(&self, _actor: &ActorContext) -> Option<Predicate> {
        None
    }
}
