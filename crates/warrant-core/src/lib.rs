//! # Warrant Core
//!
//! Pure primitives for the warrant authorization engine: claims, actor
//! context, resources and search filter predicates.
//!
//! This crate contains no I/O and no policy logic. It is the vocabulary the
//! rule units and the evaluator speak.
//!
//! ## Key Types
//!
//! - [`Claim`] - An atomic basis for permission ("is user U1", "holds role A")
//! - [`ActorContext`] - The acting identity and the claims it provides
//! - [`Resource`] - A JSON record inspected by field convention
//! - [`Predicate`] - A backend-neutral filter expression tree
//!
//! ## Canonicalization
//!
//! Predicates encode to deterministic CBOR and hash to a [`Fingerprint`].
//! See the [`canonical`] module.

pub mod actor;
pub mod canonical;
pub mod claim;
pub mod error;
pub mod predicate;
pub mod resource;

pub use actor::ActorContext;
pub use canonical::Fingerprint;
pub use claim::{Claim, ClaimSet, ADMIN_ACCESS, SUPERUSER_ACCESS};
pub use error::{CoreError, Result};
pub use predicate::Predicate;
pub use resource::{fields, markers, truthy, value_text, Resource};
