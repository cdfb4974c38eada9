//! Property tests over generated actors, resources and rule specs.

use proptest::prelude::*;
use std::sync::Arc;

use warrant::core::{markers, Claim, ClaimSet};
use warrant::policy::ActionTable;
use warrant::rules::{GroupRestricted, OwnerOnly};
use warrant::{Evaluator, Policy, RuleRegistry, RuleSpec, RuleUnit};
use warrant_testkit::generators::{action, rule_spec, ActorParams, ResourceParams};
use warrant_testkit::network_config;

fn single(spec: &RuleSpec) -> (Policy, Arc<dyn RuleUnit>) {
    let network = network_config();
    let unit = RuleRegistry::builtin().build(spec, &network).unwrap();
    let policy = Policy::builder("things").action("read", vec![unit.clone()]).build();
    (policy, unit)
}

proptest! {
    /// Units whose filter is exact agree with the single-resource check.
    /// The access-level filter only speaks for actors with an id.
    #[test]
    fn test_filter_agrees_with_decision(
        kind in prop_oneof![
            Just("any_actor"),
            Just("public_if_unrestricted"),
            Just("ip_single"),
            Just("ip_range"),
            Just("access_level"),
        ],
        actor: ActorParams,
        resource: ResourceParams,
    ) {
        prop_assume!(!actor.super_user);
        prop_assume!(kind != "access_level" || actor.id.is_some());
        let (policy, _) = single(&RuleSpec::new(kind));
        let (actor, resource) = (actor.to_actor(), resource.to_resource());
        let evaluator = Evaluator::default();

        let allowed = evaluator.evaluate(&policy, "read", Some(&resource), &actor);
        let listed = evaluator.search_filter(&policy, "read", &actor).matches(&resource);
        prop_assert_eq!(allowed, listed);
    }

    /// Restriction units agree with their filter on resources carrying
    /// their marker.
    #[test]
    fn test_restriction_filter_agrees_on_marked(
        owners_unit in any::<bool>(),
        actor: ActorParams,
        resource: ResourceParams,
    ) {
        prop_assume!(!actor.super_user);
        let (unit, marker): (Arc<dyn RuleUnit>, _) = if owners_unit {
            (Arc::new(OwnerOnly), markers::OWNERS)
        } else {
            (Arc::new(GroupRestricted), markers::GROUPS)
        };
        let policy = Policy::builder("things").action("read", vec![unit]).build();
        let (actor, resource) = (actor.to_actor(), resource.to_resource().with_restriction(marker));
        let evaluator = Evaluator::default();

        let allowed = evaluator.evaluate(&policy, "read", Some(&resource), &actor);
        let listed = evaluator.search_filter(&policy, "read", &actor).matches(&resource);
        prop_assert_eq!(allowed, listed);
    }

    /// A policy built from specs answers with exactly the union of what
    /// each unit answers alone.
    #[test]
    fn test_policy_composes_units(
        specs in prop::collection::vec(rule_spec(), 0..5),
        actor: ActorParams,
        resource: ResourceParams,
    ) {
        let (actor, resource) = (actor.to_actor(), resource.to_resource());
        let mut table = ActionTable::new();
        table.insert("read".into(), specs.clone());
        let policy =
            Policy::from_specs("things", &table, &RuleRegistry::builtin(), &network_config())
                .unwrap();

        let mut granting = ClaimSet::new();
        let mut denying = ClaimSet::new();
        let mut filters = Vec::new();
        for spec in &specs {
            let (_, unit) = single(spec);
            granting.extend(unit.granting_claims(Some(&resource), &actor));
            denying.extend(unit.denying_claims(Some(&resource), &actor));
            filters.extend(unit.filter_predicate(&actor));
        }

        prop_assert_eq!(policy.units("read").len(), specs.len());
        prop_assert_eq!(policy.granting_claims("read", Some(&resource), &actor), granting);
        prop_assert_eq!(policy.denying_claims("read", Some(&resource), &actor), denying);
        prop_assert_eq!(policy.filter_predicates("read", &actor), filters);
    }

    /// A held denying claim always wins.
    #[test]
    fn test_deny_precedence(
        specs in prop::collection::vec(rule_spec(), 0..5),
        actor: ActorParams,
        resource: ResourceParams,
    ) {
        let (actor, resource) = (actor.to_actor(), resource.to_resource());
        let mut table = ActionTable::new();
        table.insert("read".into(), specs);
        let policy =
            Policy::from_specs("things", &table, &RuleRegistry::builtin(), &network_config())
                .unwrap();

        let decision = Evaluator::default().decide(&policy, "read", Some(&resource), &actor);
        if decision.held_denials(&actor).next().is_some() {
            prop_assert!(!decision.allowed);
        }
        prop_assert!(decision.granting.contains(&Claim::super_user()));
    }

    /// No configuration never means "allow".
    #[test]
    fn test_fail_closed(
        configured in action(),
        asked in action(),
        actor: ActorParams,
        resource: ResourceParams,
    ) {
        prop_assume!(configured != asked);
        let policy = Policy::builder("things").action(configured, vec![]).build();
        let evaluator = Evaluator::default();
        let (actor, resource) = (actor.to_actor(), resource.to_resource());

        prop_assert!(!evaluator.evaluate(&policy, &asked, Some(&resource), &actor));
        prop_assert!(evaluator.search_filter(&policy, &asked, &actor).is_match_none());
    }

    /// The search filter is a pure function of its inputs.
    #[test]
    fn test_search_filter_idempotent(
        specs in prop::collection::vec(rule_spec(), 0..5),
        actor: ActorParams,
    ) {
        let actor = actor.to_actor();
        let mut table = ActionTable::new();
        table.insert("list".into(), specs);
        let policy =
            Policy::from_specs("things", &table, &RuleRegistry::builtin(), &network_config())
                .unwrap();
        let evaluator = Evaluator::default();

        let first = evaluator.search_filter(&policy, "list", &actor);
        let second = evaluator.search_filter(&policy, "list", &actor);
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_loose_values_keep_decision_and_filter_in_step() {
    use serde_json::json;
    use warrant::Resource;

    let evaluator = Evaluator::default();
    let cases = [
        ("public_if_unrestricted", json!({"_access": {"metadata_restricted": "true"}}), "U1"),
        ("public_if_unrestricted", json!({"_access": {"metadata_restricted": "yes"}}), "U1"),
        ("public_if_unrestricted", json!({"_access": {"metadata_restricted": 1}}), "U1"),
        ("public_if_unrestricted", json!({"_access": {"metadata_restricted": 0}}), "U1"),
        (
            "access_level",
            json!({"internal": {"access_levels": {"metadata_curator": [
                {"scheme": "person", "id": 12}
            ]}}}),
            "12",
        ),
        (
            "access_level",
            json!({"internal": {"access_levels": {"metadata_curator": [
                {"scheme": "person", "id": "4", "name": "Ada"}
            ]}}}),
            "4",
        ),
    ];

    for (kind, record, id) in cases {
        let (policy, _) = single(&RuleSpec::new(kind));
        let resource = Resource::from_value(record).unwrap();
        let actor = warrant::ActorContext::user(id);

        let allowed = evaluator.evaluate(&policy, "read", Some(&resource), &actor);
        let listed = evaluator.search_filter(&policy, "read", &actor).matches(&resource);
        assert_eq!(allowed, listed, "{kind} {resource:?}");
    }
}
