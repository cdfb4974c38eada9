//! Rule unit registry: configuration identifiers to constructors.
//!
//! New rule kinds are added by registering a factory; nothing in the policy
//! or evaluator needs to change.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::access_level::{AccessLevelTable, DEFAULT_ACTION};
use crate::basic::{AdministrativeRole, AnyActor, Disable, SuperUser};
use crate::error::{Result, RuleError};
use crate::network::{IpAllowList, IpRangeAllowList, NetworkConfig};
use crate::restriction::{GroupRestricted, OwnerOnly, PublicIfUnrestricted};
use crate::unit::{kinds, RuleUnit};

/// A configured rule unit: `{"type": "<identifier>", ...params}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl RuleSpec {
    /// A spec with no parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Fail on any parameter not in `allowed`.
    pub fn expect_params(&self, allowed: &[&str]) -> Result<()> {
        match self.params.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(unexpected) => Err(self.invalid(unexpected, "unexpected parameter")),
            None => Ok(()),
        }
    }

    /// An optional string parameter.
    pub fn str_param(&self, name: &str) -> Result<Option<&str>> {
        match self.params.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(name, "expected a string")),
        }
    }

    fn invalid(&self, param: &str, reason: &str) -> RuleError {
        RuleError::InvalidParameter {
            kind: self.kind.clone(),
            param: param.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// Builds a rule unit from its spec and the injected network config.
pub type RuleFactory =
    Arc<dyn Fn(&RuleSpec, &NetworkConfig) -> Result<Arc<dyn RuleUnit>> + Send + Sync>;

/// Map of rule identifiers to factories.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    factories: BTreeMap<String, RuleFactory>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in rule unit.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_unit(kinds::ANY_ACTOR, || AnyActor);
        registry.register_unit(kinds::SUPER_USER, || SuperUser);
        registry.register_unit(kinds::ADMIN, || AdministrativeRole);
        registry.register_unit(kinds::DISABLE, || Disable);
        registry.register_unit(kinds::PUBLIC_IF_UNRESTRICTED, || PublicIfUnrestricted);
        registry.register_unit(kinds::OWNER_ONLY, || OwnerOnly);
        registry.register_unit(kinds::GROUP_RESTRICTED, || GroupRestricted);
        registry.register(kinds::IP_SINGLE, |spec, network| {
            spec.expect_params(&[])?;
            Ok(Arc::new(IpAllowList::from_config(network)))
        });
        registry.register(kinds::IP_RANGE, |spec, network| {
            spec.expect_params(&[])?;
            Ok(Arc::new(IpRangeAllowList::from_config(network)))
        });
        registry.register(kinds::ACCESS_LEVEL, |spec, _| {
            spec.expect_params(&["action"])?;
            let action = spec.str_param("action")?.unwrap_or(DEFAULT_ACTION);
            Ok(Arc::new(AccessLevelTable::new(action)))
        });
        registry
    }

    /// Register (or replace) a factory.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&RuleSpec, &NetworkConfig) -> Result<Arc<dyn RuleUnit>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    /// Register a parameterless unit.
    pub fn register_unit<U, F>(&mut self, kind: impl Into<String>, make: F)
    where
        U: RuleUnit + 'static,
        F: Fn() -> U + Send + Sync + 'static,
    {
        self.register(kind, move |spec, _| {
            spec.expect_params(&[])?;
            Ok(Arc::new(make()))
        });
    }

    /// Whether `kind` is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered identifiers, in order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a unit from its spec.
    pub fn build(&self, spec: &RuleSpec, network: &NetworkConfig) -> Result<Arc<dyn RuleUnit>> {
        let factory = self
            .factories
            .get(&spec.kind)
            .ok_or_else(|| RuleError::UnknownRuleUnit {
                kind: spec.kind.clone(),
            })?;
        let unit = factory(spec, network)?;
        tracing::trace!(kind = %spec.kind, "built rule unit");
        Ok(unit)
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
