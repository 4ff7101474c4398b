// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TaskpruneError};
use crate::push::backstop::BackstopPolicy;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskpruneError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let backstop = resolve_backstop(&raw)?;
        Ok(ConfigFile::new_unchecked(raw, backstop))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_optimizer(cfg)?;
    validate_exclusion(cfg)?;
    validate_coverage(cfg)?;
    validate_aliases(cfg)?;
    Ok(())
}

fn validate_optimizer(cfg: &RawConfigFile) -> Result<()> {
    if cfg.optimizer.workers == 0 {
        return Err(TaskpruneError::ConfigError(
            "[optimizer].workers must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_exclusion(cfg: &RawConfigFile) -> Result<()> {
    if cfg.exclusion.excluded_projects_attribute.trim().is_empty() {
        return Err(TaskpruneError::ConfigError(
            "[exclusion].excluded_projects_attribute must not be empty".to_string(),
        ));
    }
    if let Some(attr) = &cfg.exclusion.run_on_projects_attribute {
        if attr.trim().is_empty() {
            return Err(TaskpruneError::ConfigError(
                "[exclusion].run_on_projects_attribute must not be empty when set".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_coverage(cfg: &RawConfigFile) -> Result<()> {
    if cfg.coverage.must_declare_kinds.iter().any(|k| k.trim().is_empty()) {
        return Err(TaskpruneError::ConfigError(
            "[coverage].must_declare_kinds contains an empty kind".to_string(),
        ));
    }
    if cfg.coverage.exempt_label_tags.iter().any(|t| t.is_empty()) {
        // "" is a substring of every label.
        return Err(TaskpruneError::ConfigError(
            "[coverage].exempt_label_tags contains an empty tag".to_string(),
        ));
    }
    Ok(())
}

fn validate_aliases(cfg: &RawConfigFile) -> Result<()> {
    for (alias, target) in cfg.strategy_aliases.iter() {
        if alias == target {
            return Err(TaskpruneError::ConfigError(format!(
                "strategy alias '{alias}' cannot point at itself"
            )));
        }
        if cfg.strategy_aliases.contains_key(target) {
            return Err(TaskpruneError::ConfigError(format!(
                "strategy alias '{alias}' points at another alias '{target}'"
            )));
        }
    }
    Ok(())
}

fn resolve_backstop(cfg: &RawConfigFile) -> Result<BackstopPolicy> {
    let section = &cfg.backstop;

    if section.push_interval == 0 {
        return Err(TaskpruneError::ConfigError(
            "[backstop].push_interval must be >= 1 (got 0)".to_string(),
        ));
    }

    let min_interval = parse_duration(&section.min_interval).map_err(|e| {
        TaskpruneError::ConfigError(format!("[backstop].min_interval: {e}"))
    })?;

    if let Some(project) = section
        .try_projects
        .iter()
        .find(|p| section.integration_projects.contains(p))
    {
        return Err(TaskpruneError::ConfigError(format!(
            "project '{project}' is listed as both an integration and a try project"
        )));
    }

    Ok(BackstopPolicy {
        push_interval: section.push_interval,
        min_interval,
        integration_projects: section.integration_projects.clone(),
        try_projects: section.try_projects.clone(),
    })
}
