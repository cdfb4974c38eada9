//! The acting identity, as resolved by the caller's authentication layer.

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::claim::{Claim, ClaimSet, SUPERUSER_ACCESS};

/// Resolved attributes of the actor for one evaluation.
///
/// The engine only reads this. Held claims are derived as the context is
/// built: every actor provides [`Claim::Any`], an actor with an id also
/// provides [`Claim::Authenticated`] and [`Claim::ActorId`], and roles,
/// administrative actions and the super-user flag map to their claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    id: Option<String>,
    roles: BTreeSet<String>,
    actions: BTreeSet<String>,
    super_user: bool,
    address: Option<IpAddr>,
    provides: ClaimSet,
}

impl ActorContext {
    /// An actor with no identity.
    pub fn anonymous() -> Self {
        let mut provides = ClaimSet::new();
        provides.insert(Claim::Any);
        Self {
            id: None,
            roles: BTreeSet::new(),
            actions: BTreeSet::new(),
            super_user: false,
            address: None,
            provides,
        }
    }

    /// An authenticated actor with the given id.
    pub fn user(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut actor = Self::anonymous();
        actor.provides.insert(Claim::Authenticated);
        actor.provides.insert(Claim::ActorId(id.clone()));
        actor.id = Some(id);
        actor
    }

    /// Add a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        let role = role.into();
        self.provides.insert(Claim::Role(role.clone()));
        self.roles.insert(role);
        self
    }

    /// Add several roles.
    pub fn with_roles<I, S>(self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        roles.into_iter().fold(self, |actor, role| actor.with_role(role))
    }

    /// Add an administrative action. The super-user action marks the actor
    /// as a super-user.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        let action = action.into();
        if action == SUPERUSER_ACCESS {
            return self.as_super_user();
        }
        self.provides.insert(Claim::Action(action.clone()));
        self.actions.insert(action);
        self
    }

    /// Mark the actor as a super-user.
    pub fn as_super_user(mut self) -> Self {
        self.super_user = true;
        self.provides.insert(Claim::super_user());
        self.actions.insert(SUPERUSER_ACCESS.to_string());
        self
    }

    /// Record the network address the request came from.
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.address = Some(address);
        self
    }

    /// The actor's id, if authenticated.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Role names held by the actor.
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Administrative action names held by the actor.
    pub fn actions(&self) -> &BTreeSet<String> {
        &self.actions
    }

    /// Whether the actor is a super-user.
    pub fn is_super_user(&self) -> bool {
        self.super_user
    }

    /// The recorded source address.
    pub fn address(&self) -> Option<IpAddr> {
        self.address
    }

    /// All claims the actor provides.
    pub fn provides(&self) -> &ClaimSet {
        &self.provides
    }

    /// Whether the actor provides `claim`.
    pub fn holds(&self, claim: &Claim) -> bool {
        self.provides.contains(claim)
    }

    /// Whether the actor provides at least one claim of `claims`.
    pub fn holds_any<'a>(&self, claims: impl IntoIterator<Item = &'a Claim>) -> bool {
        claims.into_iter().any(|claim| self.holds(claim))
    }

    /// The id claim value, looked up from the provided claims.
    pub fn id_claim(&self) -> Option<&str> {
        self.provides.iter().find_map(Claim::as_actor_id)
    }

    /// Role claim values in order.
    pub fn role_claims(&self) -> impl Iterator<Item = &str> {
        self.provides.iter().filter_map(Claim::as_role)
    }
}

impl Default for ActorContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
