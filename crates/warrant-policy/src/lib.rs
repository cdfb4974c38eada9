//! # Warrant Policy
//!
//! Per-resource-type policies and the decision evaluator.
//!
//! ## Overview
//!
//! A [`Policy`] binds an ordered list of rule units to each action of one
//! resource type. The [`Evaluator`] turns a policy, an action, an optional
//! resource and an actor into a yes/no answer, or into a search filter for
//! listings. Policies are built once from [`PolicyConfig`] (or in code with
//! [`PolicyBuilder`]), looked up through a [`PolicyRegistry`], and shared
//! read-only between threads.
//!
//! ## Fail-closed
//!
//! An action a policy has no entry for is refused to everyone, super-users
//! included. An action configured with an empty unit list is refused to
//! everyone but super-users.
//!
//! ## Example
//!
//! ```
//! use warrant_core::{markers, ActorContext, Resource};
//! use warrant_policy::{Evaluator, Policy};
//!
//! let policy = Policy::deposits();
//! let draft = Resource::new()
//!     .with_restriction(markers::OWNERS)
//!     .with_owners(["U1"]);
//!
//! let evaluator = Evaluator::default();
//! assert!(evaluator.evaluate(&policy, "read", Some(&draft), &ActorContext::user("U1")));
//! assert!(!evaluator.evaluate(&policy, "read", Some(&draft), &ActorContext::user("U2")));
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod policy;
pub mod registry;

pub use config::PolicyConfig;
pub use error::{PolicyError, Result};
pub use evaluator::{ClaimMatcher, Decision, Evaluator, HeldClaimMatcher};
pub use policy::{ActionTable, Policy, PolicyBuilder};
pub use registry::PolicyRegistry;
