//! Static configuration: which rule units apply to which action.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use warrant_rules::NetworkConfig;

use crate::error::Result;
use crate::policy::ActionTable;

/// Policy configuration for every resource type.
///
/// ```json
/// {
///   "include_defaults": true,
///   "network": {"single_ips": ["10.0.0.5"], "ip_ranges": [["10.1.0.0", "10.1.0.255"]]},
///   "policies": {"records": {"read": [{"type": "owner_only"}], "update": []}}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Start from the built-in `records` and `deposits` policies. Configured
    /// policies of the same name replace them.
    #[serde(default)]
    pub include_defaults: bool,

    /// Allow-lists injected into the network rule units.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Resource type → action → ordered rule specs.
    #[serde(default)]
    pub policies: BTreeMap<String, ActionTable>,
}

impl PolicyConfig {
    /// Parse configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse configuration from a JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
