//! Network-address rule units and their configuration.
//!
//! The allow-lists are injected at construction; nothing is read from
//! process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use warrant_core::{fields, markers, ActorContext, Claim, ClaimSet, Predicate, Resource};

use crate::error::{Result, RuleError};
use crate::unit::{kinds, RuleUnit};

/// An inclusive address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(IpAddr, IpAddr)", into = "(IpAddr, IpAddr)")]
pub struct IpRange {
    start: IpAddr,
    end: IpAddr,
}

impl IpRange {
    /// Build a range. Both ends must be the same address family.
    pub fn new(start: IpAddr, end: IpAddr) -> Result<Self> {
        if start.is_ipv4() != end.is_ipv4() {
            return Err(RuleError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
                reason: "address families differ",
            });
        }
        if start > end {
            tracing::warn!(
                %start,
                %end,
                "address range start is after its end; it matches nothing"
            );
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from text.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_addr(start)?, parse_addr(end)?)
    }

    pub fn start(&self) -> IpAddr {
        self.start
    }

    pub fn end(&self) -> IpAddr {
        self.end
    }

    /// Inclusive containment. Addresses of the other family never match.
    pub fn contains(&self, addr: IpAddr) -> bool {
        addr.is_ipv4() == self.start.is_ipv4() && self.start <= addr && addr <= self.end
    }
}

impl TryFrom<(IpAddr, IpAddr)> for IpRange {
    type Error = RuleError;

    fn try_from((start, end): (IpAddr, IpAddr)) -> Result<Self> {
        Self::new(start, end)
    }
}

impl From<IpRange> for (IpAddr, IpAddr) {
    fn from(range: IpRange) -> Self {
        (range.start, range.end)
    }
}

/// Address allow-lists shared by the network rule units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Addresses allowed by exact match.
    #[serde(default)]
    pub single_ips: BTreeSet<IpAddr>,

    /// Inclusive ranges; an address inside any one of them is allowed.
    #[serde(default)]
    pub ip_ranges: Vec<IpRange>,
}

impl NetworkConfig {
    /// Parse allow-lists from text.
    pub fn parse<'a>(
        single_ips: impl IntoIterator<Item = &'a str>,
        ip_ranges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let single_ips = single_ips
            .into_iter()
            .map(parse_addr)
            .collect::<Result<BTreeSet<_>>>()?;
        let ip_ranges = ip_ranges
            .into_iter()
            .map(|(start, end)| IpRange::parse(start, end))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            single_ips,
            ip_ranges,
        })
    }
}

fn parse_addr(text: &str) -> Result<IpAddr> {
    text.trim()
        .parse()
        .map_err(|_| RuleError::InvalidAddress(text.to_string()))
}

/// Grant `Any` when the marker is absent or the actor's address is allowed.
fn gated_claims(resource: Option<&Resource>, marker: &str, allowed: bool) -> ClaimSet {
    let applies = resource.map_or(false, |r| r.has_restriction(marker));
    if !applies || allowed {
        ClaimSet::from([Claim::Any])
    } else {
        ClaimSet::new()
    }
}

/// Hide marked resources unless the actor's address is allowed.
fn gated_filter(marker: &str, allowed: bool) -> Predicate {
    if allowed {
        Predicate::MatchAll
    } else {
        !Predicate::field(fields::APPLIED_RESTRICTIONS, marker)
    }
}

/// Restricts `ip_single`-marked resources to an exact-match allow-list.
#[derive(Debug, Clone, Default)]
pub struct IpAllowList {
    allowed: Arc<BTreeSet<IpAddr>>,
}

impl IpAllowList {
    pub fn new(allowed: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            allowed: Arc::new(allowed.into_iter().collect()),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.single_ips.iter().copied())
    }

    /// Whether the actor's recorded address is on the list. No address, no
    /// access.
    pub fn permits(&self, actor: &ActorContext) -> bool {
        actor
            .address()
            .map_or(false, |addr| self.allowed.contains(&addr))
    }
}

impl RuleUnit for IpAllowList {
    fn kind(&self) -> &str {
        kinds::IP_SINGLE
    }

    fn granting_claims(&self, resource: Option<&Resource>, actor: &ActorContext) -> ClaimSet {
        gated_claims(resource, markers::IP_SINGLE, self.permits(actor))
    }

    fn filter_predicate(&self, actor: &ActorContext) -> Option<Predicate> {
        Some(gated_filter(markers::IP_SINGLE, self.permits(actor)))
    }
}

/// Restricts `ip_range`-marked resources to configured address ranges.
#[derive(Debug, Clone, Default)]
pub struct IpRangeAllowList {
    ranges: Arc<Vec<IpRange>>,
}

impl IpRangeAllowList {
    pub fn new(ranges: impl IntoIterator<Item = IpRange>) -> Self {
        Self {
            ranges: Arc::new(ranges.into_iter().collect()),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.ip_ranges.iter().copied())
    }

    /// Whether the actor's recorded address falls in any range.
    pub fn permits(&self, actor: &ActorContext) -> bool {
        actor
            .address()
            .map_or(false, |addr| self.ranges.iter().any(|range| range.contains(addr)))
    }
}

impl RuleUnit for IpRangeAllowList {
    fn kind(&self) -> &str {
        kinds::IP_RANGE
    }

    fn granting_claims(&self, resource: Option<&Resource>, actor: &ActorContext) -> ClaimSet {
        gated_claims(resource, markers::IP_RANGE, self.permits(actor))
    }

    fn filter_predicate(&self, actor: &ActorContext) -> Option<Predicate> {
        Some(gated_filter(markers::IP_RANGE, self.permits(actor)))
    }
}
