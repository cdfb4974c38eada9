//! # Warrant Testkit
//!
//! Testing utilities for warrant.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Decision vectors**: Known inputs with the decision every build must reach
//! - **Generators**: Proptest strategies for actors, resources, specs and predicates
//! - **Fixtures**: A named cast of actors and resources
//!
//! ## Decision Vectors
//!
//! ```rust
//! use warrant_policy::Evaluator;
//! use warrant_testkit::vectors::verify_all_vectors;
//!
//! for (name, passed) in verify_all_vectors(&Evaluator::default()) {
//!     assert!(passed, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use warrant_testkit::generators::{ActorParams, ResourceParams};
//!
//! proptest! {
//!     #[test]
//!     fn owner_check_is_pure(actor: ActorParams, resource: ResourceParams) {
//!         let (a, r) = (actor.to_actor(), resource.to_resource());
//!         prop_assert_eq!(check(&a, &r), check(&a, &r));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use warrant_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! assert!(fixture.owned().has_restriction("owners"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{network_config, TestFixture};
pub use generators::{ActorParams, ResourceParams};
pub use vectors::{all_vectors, verify_all_vectors, DecisionVector};
