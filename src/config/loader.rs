//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading jurisdiction
//! rule sets from YAML files.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{IndexValues, RuleDefinition, RuleSet};

use super::types::{JurisdictionConfig, JurisdictionMetadata};

/// Loads and provides access to versioned rule sets.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/cl/
/// ├── jurisdiction.yaml    # Jurisdiction metadata
/// └── rules/
///     ├── 2024-07-01.yaml  # Rules effective from this date
///     └── 2025-01-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use net_to_gross::config::ConfigLoader;
/// use net_to_gross::models::IndexValues;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/cl").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let indices = IndexValues::new(Decimal::new(38000, 0), Decimal::new(67000, 0));
/// let rule_set = loader.rule_set(date, indices).unwrap();
/// println!("Minimum wage: ${}", rule_set.minimum_wage());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: JurisdictionConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/cl")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata_path = path.join("jurisdiction.yaml");
        let metadata = Self::load_yaml::<JurisdictionMetadata>(&metadata_path)?;

        let rules_dir = path.join("rules");
        let rules = Self::load_rules(&rules_dir)?;
        info!(
            jurisdiction = %metadata.code,
            rule_files = rules.len(),
            "Loaded payroll rule sets"
        );

        Ok(Self {
            config: JurisdictionConfig::new(metadata, rules),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rule files from the rules directory.
    ///
    /// Two files with the same `effective_date` are a parse error.
    fn load_rules(rules_dir: &Path) -> EngineResult<Vec<RuleDefinition>> {
        let rules_dir_str = rules_dir.display().to_string();

        if !rules_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rules_dir_str,
            });
        }

        let entries = fs::read_dir(rules_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rules_dir_str.clone(),
        })?;

        let mut rules = Vec::new();
        let mut sources: BTreeMap<NaiveDate, PathBuf> = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rules_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let rule = Self::load_yaml::<RuleDefinition>(&path)?;
                if let Some(existing) = sources.get(&rule.effective_date) {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!(
                            "duplicate effective_date {} (already defined in {})",
                            rule.effective_date,
                            existing.display()
                        ),
                    });
                }
                sources.insert(rule.effective_date, path);
                rules.push(rule);
            }
        }

        if rules.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rule files found)", rules_dir_str),
            });
        }

        Ok(rules)
    }

    /// Returns the underlying jurisdiction configuration.
    pub fn config(&self) -> &JurisdictionConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }

    /// Gets the rule definition effective on a given date.
    ///
    /// The most recent definition effective on or before `date` wins.
    pub fn rule_definition(&self, date: NaiveDate) -> EngineResult<&RuleDefinition> {
        self.config
            .rules_effective_on(date)
            .ok_or(EngineError::RuleSetNotFound { date })
    }

    /// Builds the validated rule set in force on `date` with the given index values.
    ///
    /// # Errors
    ///
    /// Returns `RuleSetNotFound` if no rule file is effective yet, or
    /// `InvalidRuleSet` if the definition or index values fail validation.
    pub fn rule_set(&self, date: NaiveDate, indices: IndexValues) -> EngineResult<RuleSet> {
        let definition = self.rule_definition(date)?.clone();
        RuleSet::new(self.jurisdiction().code.clone(), definition, indices)
    }

    /// Lists the pension provider names accepted on `date`, no-pension sentinel last.
    pub fn pension_providers(&self, date: NaiveDate) -> EngineResult<Vec<String>> {
        let pension = &self.rule_definition(date)?.pension;
        Ok(pension
            .commissions
            .keys()
            .cloned()
            .chain(std::iter::once(pension.no_pension_provider.clone()))
            .collect())
    }
}
