//! Resource type → policy lookup, populated once at startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use warrant_rules::RuleRegistry;

use crate::config::PolicyConfig;
use crate::error::{PolicyError, Result};
use crate::policy::Policy;

/// Registered policies keyed by resource type.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: BTreeMap<String, Arc<Policy>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `records` and `deposits` policies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(Policy::records());
        registry.insert(Policy::deposits());
        registry
    }

    /// Build every configured policy.
    ///
    /// Any rule unit that cannot be built fails the whole registry.
    pub fn from_config(config: &PolicyConfig, rules: &RuleRegistry) -> Result<Self> {
        let mut registry = if config.include_defaults {
            Self::with_defaults()
        } else {
            Self::new()
        };

        for (resource_type, table) in &config.policies {
            let policy = Policy::from_specs(resource_type.clone(), table, rules, &config.network)?;
            if let Some(replaced) = registry.insert(policy) {
                tracing::debug!(
                    resource_type = %replaced.name(),
                    "configured policy replaces default"
                );
            }
        }

        tracing::debug!(policies = registry.len(), "policy registry ready");
        Ok(registry)
    }

    /// Register a policy under its name. Fails if the name is taken.
    pub fn register(&mut self, policy: Policy) -> Result<()> {
        if self.policies.contains_key(policy.name()) {
            return Err(PolicyError::DuplicateResourceType(policy.name().to_string()));
        }
        self.insert(policy);
        Ok(())
    }

    /// Register a policy, returning any policy it replaced.
    pub fn insert(&mut self, policy: Policy) -> Option<Arc<Policy>> {
        self.policies
            .insert(policy.name().to_string(), Arc::new(policy))
    }

    /// The policy for a resource type.
    pub fn get(&self, resource_type: &str) -> Result<Arc<Policy>> {
        self.policies
            .get(resource_type)
            .cloned()
            .ok_or_else(|| PolicyError::UnknownResourceType(resource_type.to_string()))
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.policies.contains_key(resource_type)
    }

    /// Registered resource types, in order.
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
