//! Test fixtures and helpers.
//!
//! Named actors and resources shared by integration tests.

use std::net::IpAddr;

use warrant_core::{markers, ActorContext, Resource, ADMIN_ACCESS};
use warrant_rules::NetworkConfig;

/// Address on the default allow-list.
pub const ALLOWED_IP: &str = "10.0.0.5";
/// Address off the allow-list.
pub const OTHER_IP: &str = "10.0.0.9";
/// Default allowed range, inclusive.
pub const RANGE: (&str, &str) = ("10.1.0.0", "10.1.0.255");

/// A cast of actors with well-known ids and roles.
#[derive(Debug, Clone)]
pub struct TestFixture {
    pub anonymous: ActorContext,
    /// `U1`, owner of [`TestFixture::owned`].
    pub owner: ActorContext,
    /// `U2`, co-owner of [`TestFixture::owned`].
    pub co_owner: ActorContext,
    /// `U3`, owns nothing, role `A`.
    pub stranger: ActorContext,
    /// `U4`, roles `A` and `C`.
    pub member: ActorContext,
    /// `U5`, holds `admin-access`.
    pub admin: ActorContext,
    /// `root`, super-user.
    pub root: ActorContext,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            anonymous: ActorContext::anonymous(),
            owner: ActorContext::user("U1"),
            co_owner: ActorContext::user("U2"),
            stranger: ActorContext::user("U3").with_role("A"),
            member: ActorContext::user("U4").with_roles(["A", "C"]),
            admin: ActorContext::user("U5").with_action(ADMIN_ACCESS),
            root: ActorContext::user("root").as_super_user(),
        }
    }

    /// Every actor in the cast.
    pub fn actors(&self) -> Vec<&ActorContext> {
        vec![
            &self.anonymous,
            &self.owner,
            &self.co_owner,
            &self.stranger,
            &self.member,
            &self.admin,
            &self.root,
        ]
    }

    /// Actors that are not super-users.
    pub fn ordinary_actors(&self) -> Vec<&ActorContext> {
        self.actors()
            .into_iter()
            .filter(|actor| !actor.is_super_user())
            .collect()
    }

    /// No restrictions at all.
    pub fn open(&self) -> Resource {
        Resource::new()
    }

    /// Owned by `U1` and `U2`.
    pub fn owned(&self) -> Resource {
        Resource::new()
            .with_restriction(markers::OWNERS)
            .with_owners(["U1", "U2"])
    }

    /// Restricted to roles `B` and `C`.
    pub fn grouped(&self) -> Resource {
        Resource::new()
            .with_restriction(markers::GROUPS)
            .with_groups(["B", "C"])
    }

    /// Metadata flagged restricted, owned by `U1`.
    pub fn restricted(&self) -> Resource {
        self.owned().with_metadata_restricted(true)
    }

    /// Restricted to the single-address allow-list.
    pub fn ip_single(&self) -> Resource {
        Resource::new().with_restriction(markers::IP_SINGLE)
    }

    /// Restricted to the address ranges.
    pub fn ip_range(&self) -> Resource {
        Resource::new().with_restriction(markers::IP_RANGE)
    }

    /// `U4` listed as a metadata curator.
    pub fn curated(&self) -> Resource {
        Resource::new().with_access_level("metadata_curator", "person", "U4")
    }

    /// Every resource in the set.
    pub fn resources(&self) -> Vec<Resource> {
        vec![
            self.open(),
            self.owned(),
            self.grouped(),
            self.restricted(),
            self.ip_single(),
            self.ip_range(),
            self.curated(),
        ]
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The network allow-lists the fixtures assume.
pub fn network_config() -> NetworkConfig {
    NetworkConfig::parse([ALLOWED_IP], [RANGE]).expect("fixture network config is valid")
}

/// Parse a fixture address.
pub fn ip(text: &str) -> IpAddr {
    text.parse().expect("fixture address is valid")
}
