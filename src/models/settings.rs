//! Analyzer settings schema.
//!
//! Loaded from `ScriptLintSettings.{toml,yaml,yml,json}` and handed to the
//! analyzer as compact JSON. Key components:
//! - `include_rules` / `exclude_rules`: rule selection.
//! - `severity`: which severities the analyzer should report.
//! - `custom_rule_paths`: extra rule modules, optionally searched recursively.
//! - `rules`: per-rule options, passed through untouched.

use super::Severity;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Typed analyzer configuration.
pub struct AnalyzerSettings {
    /// Run only these rules; empty means every rule.
    #[serde(default, alias = "include_rules")]
    pub include_rules: Vec<String>,
    #[serde(default, alias = "exclude_rules")]
    pub exclude_rules: Vec<String>,
    /// Severities to report; empty means all of them.
    #[serde(default)]
    pub severity: Vec<Severity>,
    #[serde(default = "default_true", alias = "include_default_rules")]
    pub include_default_rules: bool,
    #[serde(default, alias = "custom_rule_paths")]
    pub custom_rule_paths: Vec<String>,
    #[serde(default, alias = "recurse_custom_rule_paths")]
    pub recurse_custom_rule_paths: bool,
    /// Per-rule options keyed by rule name.
    #[serde(default)]
    pub rules: BTreeMap<String, BTreeMap<String, Json>>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        AnalyzerSettings {
            include_rules: Vec::new(),
            exclude_rules: Vec::new(),
            severity: Vec::new(),
            include_default_rules: true,
            custom_rule_paths: Vec::new(),
            recurse_custom_rule_paths: false,
            rules: BTreeMap::new(),
        }
    }
}

impl AnalyzerSettings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        for rule in &self.include_rules {
            if self.exclude_rules.iter().any(|r| r.eq_ignore_ascii_case(rule)) {
                return Err(format!(
                    "rule '{}' is listed in both includeRules and excludeRules",
                    rule
                ));
            }
        }
        if let Some(Severity::Other(s)) = self
            .severity
            .iter()
            .find(|s| matches!(s, Severity::Other(_)))
        {
            return Err(format!(
                "unknown severity '{}' (expected Error, Warning or Information)",
                s
            ));
        }
        if !self.include_default_rules && self.custom_rule_paths.is_empty() {
            return Err(
                "includeDefaultRules = false requires at least one customRulePaths entry".into(),
            );
        }
        Ok(())
    }

    /// Compact JSON form passed on the analyzer command line.
    pub fn to_json_arg(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
