//! # Warrant
//!
//! Authorization decisions and search filters from pluggable rule units.
//!
//! ## Overview
//!
//! Given an actor, an action and optionally a resource, warrant decides
//! whether the action is permitted. For listings it produces a
//! backend-neutral [`Predicate`] describing which resources the actor may
//! see. Both answers come from the same rule units, so a resource that
//! passes the single check also matches the listing filter.
//!
//! - **Claims**: atomic bases for permission ("is user U1", "holds role A")
//! - **Rule units**: one rule each; grant claims, deny claims and a filter
//! - **Policies**: per resource type, an ordered list of units per action
//! - **Evaluator**: deny beats grant; super-users are implicitly granted
//!
//! Unconfigured actions are refused to everyone. Nothing is cached, fetched
//! or executed: the engine is a pure function of its inputs and the
//! configuration it was built from.
//!
//! ## Usage
//!
//! ```rust
//! use warrant::{ActorContext, Engine, EngineConfig, Resource};
//!
//! let config = EngineConfig::from_json_str(r#"{
//!     "include_defaults": true,
//!     "policies": {
//!         "files": {"read": [{"type": "owner_only"}], "delete": []}
//!     }
//! }"#).unwrap();
//! let engine = Engine::from_config(&config).unwrap();
//!
//! let file = Resource::new()
//!     .with_restriction("owners")
//!     .with_owners(["U1"]);
//!
//! assert!(engine.read("files", &file).unwrap().allows(&ActorContext::user("U1")));
//! assert!(!engine.delete("files", &file).unwrap().allows(&ActorContext::user("U1")));
//! assert!(engine
//!     .delete("files", &file)
//!     .unwrap()
//!     .allows(&ActorContext::user("root").as_super_user()));
//! ```
//!
//! ## Re-exports
//!
//! - `warrant::core` - Claims, actors, resources, predicates
//! - `warrant::rules` - Rule units and their registry
//! - `warrant::policy` - Policies and the evaluator

pub mod engine;
pub mod error;
pub mod permission;

// Re-export component crates
pub use warrant_core as core;
pub use warrant_policy as policy;
pub use warrant_rules as rules;

pub use engine::{Engine, EngineConfig};
pub use error::{Result, WarrantError};
pub use permission::Permission;

// Re-export commonly used types
pub use warrant_core::{ActorContext, Claim, ClaimSet, Fingerprint, Predicate, Resource};
pub use warrant_policy::{
    ClaimMatcher, Decision, Evaluator, HeldClaimMatcher, Policy, PolicyBuilder, PolicyConfig,
    PolicyRegistry,
};
pub use warrant_rules::{NetworkConfig, RuleRegistry, RuleSpec, RuleUnit};
