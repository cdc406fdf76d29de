//! Configuration types for jurisdiction rule sets.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::RuleDefinition;

/// Metadata about the jurisdiction.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short jurisdiction code (e.g., "CL").
    pub code: String,
    /// The human-readable name of the jurisdiction.
    pub name: String,
    /// ISO currency code amounts are expressed in.
    pub currency: String,
    /// Name of the indexed unit of account caps are expressed in.
    pub indexed_unit: String,
    /// Name of the tax unit brackets are expressed in.
    pub tax_unit: String,
    /// URL to the official source of the rules.
    pub source_url: String,
}

/// The complete jurisdiction configuration loaded from YAML files.
///
/// Rule definitions are kept sorted by effective date, oldest first.
#[derive(Debug, Clone)]
pub struct JurisdictionConfig {
    metadata: JurisdictionMetadata,
    rules: Vec<RuleDefinition>,
}

impl JurisdictionConfig {
    /// Creates a new JurisdictionConfig from its component parts.
    pub fn new(metadata: JurisdictionMetadata, rules: Vec<RuleDefinition>) -> Self {
        let mut sorted_rules = rules;
        sorted_rules.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            rules: sorted_rules,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns all rule definitions.
    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    /// Returns the latest rule definition effective on or before `date`.
    pub fn rules_effective_on(&self, date: NaiveDate) -> Option<&RuleDefinition> {
        self.rules.iter().rfind(|r| r.effective_date <= date)
    }
}
