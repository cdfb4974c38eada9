//! # Warrant Rules
//!
//! Pluggable rule units ("generators") for the warrant authorization engine.
//!
//! ## Overview
//!
//! A rule unit encodes one access rule and answers three questions about it:
//! which claims grant an action, which claims deny it, and which filter
//! restricts a listing to what the rule allows. Policies compose units; the
//! units themselves know nothing about actions or each other.
//!
//! ## Built-in Units
//!
//! | Identifier               | Type                    | Grants                                  |
//! |--------------------------|-------------------------|-----------------------------------------|
//! | `any_actor`              | [`AnyActor`]            | everyone                                |
//! | `super_user`             | [`SuperUser`]           | super-users                             |
//! | `admin`                  | [`AdministrativeRole`]  | holders of `admin-access`               |
//! | `disable`                | [`Disable`]             | nobody; denies everyone                 |
//! | `public_if_unrestricted` | [`PublicIfUnrestricted`]| everyone unless metadata is restricted  |
//! | `owner_only`             | [`OwnerOnly`]           | listed owners when `owners` applies     |
//! | `group_restricted`       | [`GroupRestricted`]     | listed roles when `groups` applies      |
//! | `ip_single`              | [`IpAllowList`]         | allowed addresses when `ip_single` applies |
//! | `ip_range`               | [`IpRangeAllowList`]    | addresses in range when `ip_range` applies |
//! | `access_level`           | [`AccessLevelTable`]    | people listed under the action's levels |
//!
//! ## Extending
//!
//! Implement [`RuleUnit`] and register a factory with
//! [`RuleRegistry::register`]; configuration can then name the new unit.

pub mod access_level;
pub mod basic;
pub mod error;
pub mod network;
pub mod registry;
pub mod restriction;
pub mod unit;

pub use access_level::{access_levels_for, AccessLevelTable};
pub use basic::{AdministrativeRole, AnyActor, Disable, SuperUser};
pub use error::{Result, RuleError};
pub use network::{IpAllowList, IpRange, IpRangeAllowList, NetworkConfig};
pub use registry::{RuleFactory, RuleRegistry, RuleSpec};
pub use restriction::{GroupRestricted, OwnerOnly, PublicIfUnrestricted};
pub use unit::{kinds, RuleUnit};
