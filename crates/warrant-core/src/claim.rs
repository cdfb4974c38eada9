//! Claims: the atomic bases for a permission.
//!
//! A claim is something an actor may *provide* ("is user U1", "holds role
//! curators"). Rule units produce sets of claims that grant or deny an
//! action; the evaluator intersects those sets with what the actor provides.
//!
//! Claims are built fresh for every evaluation and never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Action name carried by super-users.
pub const SUPERUSER_ACCESS: &str = "superuser-access";

/// Action name carried by administrators (distinct from super-users).
pub const ADMIN_ACCESS: &str = "admin-access";

/// An ordered set of claims.
///
/// Ordered so that iteration, and everything derived from it, is
/// deterministic across calls.
pub type ClaimSet = BTreeSet<Claim>;

/// A single basis for permission.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum Claim {
    /// Provided by every actor, authenticated or not.
    Any,

    /// Provided by every actor with a resolved identity.
    Authenticated,

    /// Provided by the actor with this id.
    ActorId(String),

    /// Provided by actors holding this role.
    Role(String),

    /// Provided by actors holding this administrative action.
    Action(String),
}

impl Claim {
    /// Claim for a specific actor id.
    pub fn actor(id: impl Into<String>) -> Self {
        Claim::ActorId(id.into())
    }

    /// Claim for a role.
    pub fn role(name: impl Into<String>) -> Self {
        Claim::Role(name.into())
    }

    /// Claim for an administrative action.
    pub fn action(name: impl Into<String>) -> Self {
        Claim::Action(name.into())
    }

    /// The built-in super-user claim.
    pub fn super_user() -> Self {
        Claim::Action(SUPERUSER_ACCESS.to_string())
    }

    /// The administrative-access claim.
    pub fn admin_access() -> Self {
        Claim::Action(ADMIN_ACCESS.to_string())
    }

    /// Returns the actor id if this is an id claim.
    pub fn as_actor_id(&self) -> Option<&str> {
        match self {
            Claim::ActorId(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the role name if this is a role claim.
    pub fn as_role(&self) -> Option<&str> {
        match self {
            Claim::Role(role) => Some(role),
            _ => None,
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Claim::Any => write!(f, "any"),
            Claim::Authenticated => write!(f, "authenticated"),
            Claim::ActorId(id) => write!(f, "id:{}", id),
            Claim::Role(role) => write!(f, "role:{}", role),
            Claim::Action(action) => write!(f, "action:{}", action),
        }
    }
}
