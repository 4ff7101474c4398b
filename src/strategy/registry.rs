// src/strategy/registry.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::{Result, TaskpruneError};
use crate::graph::Job;
use crate::strategy::{
    AlwaysRun, FileChangeRelevance, NeverRun, OptimizationStrategy, ProjectExclusion,
    SkipUnlessDependedOn, ALWAYS, NEVER, PROJECT_EXCLUSION, SKIP_UNLESS_CHANGED,
    SKIP_UNLESS_DEPENDED_ON,
};

/// Name -> strategy mapping.
///
/// Lookups never fall back to a default: an unknown name is an error.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn OptimizationStrategy>>,
}

impl StrategyRegistry {
    /// Empty registry. Jobs without an optimization reference still need
    /// `always` to be registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in strategy under its standard name.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ALWAYS, AlwaysRun);
        registry.register(NEVER, NeverRun);
        registry.register(SKIP_UNLESS_DEPENDED_ON, SkipUnlessDependedOn);
        registry.register(PROJECT_EXCLUSION, ProjectExclusion::default());
        registry.register(SKIP_UNLESS_CHANGED, FileChangeRelevance);
        registry
    }

    /// Built-ins configured from `cfg`, plus its `[strategy_aliases]`.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut registry = Self::with_builtins();
        registry.register(PROJECT_EXCLUSION, ProjectExclusion::from_config(&cfg.exclusion));

        for (alias, target) in cfg.strategy_aliases.iter() {
            registry.alias(alias, target)?;
        }
        Ok(registry)
    }

    /// Register (or replace) a strategy.
    pub fn register<S>(&mut self, name: impl Into<String>, strategy: S)
    where
        S: OptimizationStrategy + 'static,
    {
        self.register_arc(name, Arc::new(strategy));
    }

    pub fn register_arc(&mut self, name: impl Into<String>, strategy: Arc<dyn OptimizationStrategy>) {
        let name = name.into();
        debug!(strategy = %name, "registering optimization strategy");
        self.strategies.insert(name, strategy);
    }

    /// Make `alias` resolve to whatever `target` currently resolves to.
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<()> {
        let strategy = self.strategies.get(target).cloned().ok_or_else(|| {
            TaskpruneError::ConfigError(format!(
                "strategy alias '{alias}' points at unknown strategy '{target}'"
            ))
        })?;
        self.register_arc(alias, strategy);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn OptimizationStrategy>> {
        self.strategies.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(|s| s.as_str())
    }

    /// Strategy for `job`: its referenced one, or `always` when it has none.
    pub fn resolve(&self, job: &Job) -> Result<Arc<dyn OptimizationStrategy>> {
        let name = job
            .optimization
            .as_ref()
            .map(|o| o.strategy.as_str())
            .unwrap_or(ALWAYS);

        self.get(name).ok_or_else(|| TaskpruneError::UnknownStrategy {
            job: job.label.clone(),
            strategy: name.to_string(),
        })
    }
}
