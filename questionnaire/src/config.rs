//! Configuration for the questionnaire engine.

use serde::{Deserialize, Serialize};

/// Tunable limits and thresholds shared by every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Date thresholds
    pub dates: DateConfig,
    /// Size limits
    pub limits: LimitsConfig,
    /// Account policy
    pub policy: PolicyConfig,
}

impl EngineConfig {
    /// Load config from YAML. Missing sections keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Date thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Age (whole years) below which a holder counts as a minor
    pub adult_age: u32,
    /// Earliest accepted "since year"
    pub min_since_year: u64,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            adult_age: 18,
            min_since_year: 1900,
        }
    }
}

/// Size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum characters in a free-text answer
    pub max_text_len: usize,
    /// Maximum entries in a dynamic label/value list
    pub max_entries: usize,
    /// Maximum country codes in one citizenship collection
    pub max_citizenships: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_len: 500,
            max_entries: 25,
            max_citizenships: 5,
        }
    }
}

/// Account policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Primary citizenship codes allowed for an entity account
    pub entity_max_primary_citizenships: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            entity_max_primary_citizenships: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.dates.adult_age, 18);
        assert_eq!(config.dates.min_since_year, 1900);
        assert_eq!(config.limits.max_text_len, 500);
        assert_eq!(config.policy.entity_max_primary_citizenships, 1);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = EngineConfig::default();
        config.limits.max_entries = 10;
        let yaml = config.to_yaml().unwrap();
        let parsed = EngineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml() {
        let parsed = EngineConfig::from_yaml("dates:\n  adult_age: 21\n").unwrap();
        assert_eq!(parsed.dates.adult_age, 21);
        assert_eq!(parsed.dates.min_since_year, 1900);
        assert_eq!(parsed.limits, LimitsConfig::default());
    }
}
