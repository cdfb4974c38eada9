//! Proptest generators for property-based testing.
//!
//! Id, role and address alphabets are kept small so that generated actors
//! and resources overlap often enough to exercise both outcomes.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

use warrant_core::{markers, ActorContext, Claim, Predicate, Resource, ADMIN_ACCESS};
use warrant_rules::{kinds, RuleSpec};

/// Generate an actor id.
pub fn actor_id() -> impl Strategy<Value = String> {
    "U[0-4]".prop_map(String::from)
}

/// Generate a role name.
pub fn role() -> impl Strategy<Value = String> {
    "[A-D]".prop_map(String::from)
}

/// Generate an address in 10.0.0.0/29.
pub fn address() -> impl Strategy<Value = IpAddr> {
    (0u8..8).prop_map(|last| IpAddr::V4(Ipv4Addr::new(10, 0, 0, last)))
}

/// Generate one of the standard action names.
pub fn action() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("list"),
        Just("create"),
        Just("read"),
        Just("update"),
        Just("delete"),
    ]
    .prop_map(String::from)
}

/// Generate a claim.
pub fn claim() -> impl Strategy<Value = Claim> {
    prop_oneof![
        Just(Claim::Any),
        Just(Claim::Authenticated),
        actor_id().prop_map(Claim::ActorId),
        role().prop_map(Claim::Role),
        Just(Claim::super_user()),
        Just(Claim::admin_access()),
    ]
}

/// Generate a metadata flag, including loosely typed values.
pub fn metadata_flag() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!(true)),
        Just(json!(false)),
        Just(json!("true")),
        Just(json!("false")),
        Just(json!("")),
        Just(json!(1)),
        Just(json!(0)),
        Just(Value::Null),
    ]
}

/// Generate a parameterless built-in rule spec.
///
/// Network units are included; they see whatever `NetworkConfig` the test
/// builds them with.
pub fn rule_spec() -> impl Strategy<Value = RuleSpec> {
    prop_oneof![
        Just(kinds::ANY_ACTOR),
        Just(kinds::SUPER_USER),
        Just(kinds::ADMIN),
        Just(kinds::DISABLE),
        Just(kinds::PUBLIC_IF_UNRESTRICTED),
        Just(kinds::OWNER_ONLY),
        Just(kinds::GROUP_RESTRICTED),
        Just(kinds::IP_SINGLE),
        Just(kinds::IP_RANGE),
        Just(kinds::ACCESS_LEVEL),
    ]
    .prop_map(RuleSpec::new)
}

/// Generate a predicate tree over the conventional resource fields.
pub fn predicate() -> impl Strategy<Value = Predicate> {
    let leaf = prop_oneof![
        Just(Predicate::MatchAll),
        Just(Predicate::MatchNone),
        actor_id().prop_map(|id| Predicate::field("owners", id)),
        role().prop_map(|role| Predicate::field("group_restrictions", role)),
        any::<bool>().prop_map(|flag| Predicate::field("_access.metadata_restricted", flag)),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|p| !p),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Predicate::all_of),
            prop::collection::vec(inner, 0..4).prop_map(Predicate::any_of),
        ]
    })
}

/// Parameters for generating an actor.
#[derive(Debug, Clone)]
pub struct ActorParams {
    pub id: Option<String>,
    pub roles: Vec<String>,
    pub admin: bool,
    pub super_user: bool,
    pub address: Option<IpAddr>,
}

impl ActorParams {
    pub fn to_actor(&self) -> ActorContext {
        let mut actor = match &self.id {
            Some(id) => ActorContext::user(id.clone()),
            None => ActorContext::anonymous(),
        }
        .with_roles(self.roles.iter().cloned());

        if self.admin {
            actor = actor.with_action(ADMIN_ACCESS);
        }
        if self.super_user {
            actor = actor.as_super_user();
        }
        if let Some(address) = self.address {
            actor = actor.with_address(address);
        }
        actor
    }
}

impl Arbitrary for ActorParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::option::weighted(0.8, actor_id()),
            prop::collection::vec(role(), 0..3),
            prop::bool::weighted(0.1),
            prop::bool::weighted(0.1),
            prop::option::of(address()),
        )
            .prop_map(|(id, roles, admin, super_user, address)| ActorParams {
                id,
                roles,
                admin,
                super_user,
                address,
            })
            .boxed()
    }
}

/// Parameters for generating a resource.
#[derive(Debug, Clone)]
pub struct ResourceParams {
    pub markers: Vec<&'static str>,
    pub owners: Vec<String>,
    pub groups: Vec<String>,
    pub metadata_restricted: Option<Value>,
    pub curators: Vec<String>,
}

impl ResourceParams {
    pub fn to_resource(&self) -> Resource {
        let mut resource = self
            .markers
            .iter()
            .fold(Resource::new(), |r, marker| r.with_restriction(marker));

        if !self.owners.is_empty() {
            resource = resource.with_owners(self.owners.iter().cloned());
        }
        if !self.groups.is_empty() {
            resource = resource.with_groups(self.groups.iter().cloned());
        }
        if let Some(flag) = &self.metadata_restricted {
            resource = resource.with_metadata_restricted(flag.clone());
        }
        self.curators.iter().fold(resource, |r, id| {
            r.with_access_level("metadata_curator", "person", id)
        })
    }
}

impl Arbitrary for ResourceParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let marker = prop_oneof![
            Just(markers::OWNERS),
            Just(markers::GROUPS),
            Just(markers::IP_SINGLE),
            Just(markers::IP_RANGE),
        ];
        (
            prop::collection::vec(marker, 0..3),
            prop::collection::vec(actor_id(), 0..3),
            prop::collection::vec(role(), 0..3),
            prop::option::of(metadata_flag()),
            prop::collection::vec(actor_id(), 0..2),
        )
            .prop_map(|(markers, owners, groups, metadata_restricted, curators)| {
                ResourceParams {
                    markers,
                    owners,
                    groups,
                    metadata_restricted,
                    curators,
                }
            })
            .boxed()
    }
}
