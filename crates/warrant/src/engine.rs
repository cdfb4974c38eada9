//! The Engine: policies for every resource type plus the evaluator.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use warrant_core::{ActorContext, Predicate, Resource};
use warrant_policy::{ClaimMatcher, Decision, Evaluator, Policy, PolicyConfig, PolicyRegistry};
use warrant_rules::RuleRegistry;

use crate::error::{Result, WarrantError};
use crate::permission::Permission;

/// Configuration for the Engine.
///
/// Same JSON shape as [`PolicyConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineConfig {
    pub policy: PolicyConfig,
}

impl EngineConfig {
    /// Parse configuration from JSON text.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid engine configuration")
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config = Self::from_json_str(&text)
            .with_context(|| format!("failed to load configuration {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    /// Also register the built-in `records` and `deposits` policies.
    pub fn with_defaults(mut self) -> Self {
        self.policy.include_defaults = true;
        self
    }
}

impl From<PolicyConfig> for EngineConfig {
    fn from(policy: PolicyConfig) -> Self {
        Self { policy }
    }
}

/// The main Engine struct.
///
/// Built once at startup; every method takes `&self` and the engine can be
/// shared across threads behind an `Arc` or by reference.
#[derive(Debug, Clone)]
pub struct Engine {
    policies: PolicyRegistry,
    evaluator: Evaluator,
}

impl Engine {
    /// Create an engine from prepared parts.
    pub fn new(policies: PolicyRegistry, evaluator: Evaluator) -> Self {
        Self {
            policies,
            evaluator,
        }
    }

    /// Build an engine using the built-in rule units.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::from_config_with_rules(config, &RuleRegistry::builtin())
    }

    /// Build an engine, resolving rule identifiers through `rules`.
    pub fn from_config_with_rules(config: &EngineConfig, rules: &RuleRegistry) -> Result<Self> {
        let policies = PolicyRegistry::from_config(&config.policy, rules)?;
        Ok(Self::new(policies, Evaluator::default()))
    }

    /// Replace the claim matcher.
    pub fn with_matcher(mut self, matcher: Arc<dyn ClaimMatcher>) -> Self {
        self.evaluator = Evaluator::new(matcher);
        self
    }

    /// Fail unless every listed resource type has a policy.
    ///
    /// Call at startup so a missing policy surfaces before any request.
    pub fn require<'a>(&self, resource_types: impl IntoIterator<Item = &'a str>) -> Result<()> {
        match resource_types
            .into_iter()
            .find(|resource_type| !self.policies.contains(resource_type))
        {
            Some(missing) => Err(WarrantError::MissingPolicy(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// The policy for a resource type.
    pub fn policy(&self, resource_type: &str) -> Result<Arc<Policy>> {
        Ok(self.policies.get(resource_type)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decisions
    // ─────────────────────────────────────────────────────────────────────────

    /// Decide, keeping the claim sets used.
    pub fn decide(
        &self,
        resource_type: &str,
        action: &str,
        resource: Option<&Resource>,
        actor: &ActorContext,
    ) -> Result<Decision> {
        let policy = self.policy(resource_type)?;
        Ok(self.evaluator.decide(&policy, action, resource, actor))
    }

    /// Whether the actor may perform `action` on a resource of this type.
    pub fn evaluate(
        &self,
        resource_type: &str,
        action: &str,
        resource: Option<&Resource>,
        actor: &ActorContext,
    ) -> Result<bool> {
        Ok(self.decide(resource_type, action, resource, actor)?.allowed)
    }

    /// The filter restricting a listing of this resource type.
    pub fn search_filter(
        &self,
        resource_type: &str,
        action: &str,
        actor: &ActorContext,
    ) -> Result<Predicate> {
        let policy = self.policy(resource_type)?;
        Ok(self.evaluator.search_filter(&policy, action, actor))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permission handles
    // ─────────────────────────────────────────────────────────────────────────

    /// A handle for one action on one (optional) resource.
    pub fn permission<'a>(
        &'a self,
        resource_type: &str,
        action: impl Into<String>,
        resource: Option<&'a Resource>,
    ) -> Result<Permission<'a>> {
        let policy = self.policy(resource_type)?;
        Ok(Permission::new(policy, &self.evaluator, action, resource))
    }

    /// Listing resources of this type.
    pub fn list(&self, resource_type: &str) -> Result<Permission<'_>> {
        self.permission(resource_type, "list", None)
    }

    /// Creating a resource of this type.
    pub fn create(&self, resource_type: &str) -> Result<Permission<'_>> {
        self.permission(resource_type, "create", None)
    }

    pub fn read<'a>(
        &'a self,
        resource_type: &str,
        resource: &'a Resource,
    ) -> Result<Permission<'a>> {
        self.permission(resource_type, "read", Some(resource))
    }

    pub fn update<'a>(
        &'a self,
        resource_type: &str,
        resource: &'a Resource,
    ) -> Result<Permission<'a>> {
        self.permission(resource_type, "update", Some(resource))
    }

    pub fn delete<'a>(
        &'a self,
        resource_type: &str,
        resource: &'a Resource,
    ) -> Result<Permission<'a>> {
        self.permission(resource_type, "delete", Some(resource))
    }
}

impl Default for Engine {
    /// An engine with the built-in policies and matcher.
    fn default() -> Self {
        Self::new(PolicyRegistry::with_defaults(), Evaluator::default())
    }
}
