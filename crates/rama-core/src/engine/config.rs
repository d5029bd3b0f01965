use super::error::EngineError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid chain identifier: '{0}'")]
    InvalidChainId(String),
}

/// Selects which residues contribute points to a Ramachandran plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterRule {
    /// Every residue.
    #[default]
    All,
    /// Every residue except glycine and proline.
    Normal,
    /// Glycine only.
    Gly,
    /// Proline only.
    Pro,
    /// Residues immediately followed by a proline.
    PrePro,
}

impl FilterRule {
    pub const VARIANTS: [FilterRule; 5] = [
        FilterRule::All,
        FilterRule::Normal,
        FilterRule::Gly,
        FilterRule::Pro,
        FilterRule::PrePro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterRule::All => "all",
            FilterRule::Normal => "normal",
            FilterRule::Gly => "gly",
            FilterRule::Pro => "pro",
            FilterRule::PrePro => "pre-pro",
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterRule {
    type Err = EngineError;

    /// Parses a rule name such as `normal` or `pre-pro`, ignoring case and accepting
    /// `_` in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        FilterRule::VARIANTS
            .into_iter()
            .find(|rule| rule.as_str() == normalized)
            .ok_or_else(|| {
                EngineError::InvalidArgument(format!(
                    "Unknown filter '{}'. Expected one of: all, normal, gly, pro, pre-pro.",
                    s
                ))
            })
    }
}

/// How the pipeline reacts to a residue it cannot use.
///
/// A residue is unusable when its backbone atoms do not form an N, CA, C triple, or
/// when two of the atoms feeding one of its torsions coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationPolicy {
    /// Drop the residue with a warning and carry on with the rest of the structure.
    #[default]
    Skip,
    /// Fail the whole structure.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisConfig {
    pub filter: FilterRule,
    /// Restricts extraction to one chain when set.
    pub chain_id: Option<String>,
    pub policy: ValidationPolicy,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    filter: Option<FilterRule>,
    chain_id: Option<String>,
    policy: Option<ValidationPolicy>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: FilterRule) -> Self {
        self.filter = Some(filter);
        self
    }
    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
    pub fn policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let chain_id = match self.chain_id {
            Some(id) => {
                let trimmed = id.trim();
                if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
                    return Err(ConfigError::InvalidChainId(id));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        Ok(AnalysisConfig {
            filter: self.filter.ok_or(ConfigError::MissingParameter("filter"))?,
            chain_id,
            policy: self.policy.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_rule_parses_known_names() {
        assert_eq!("all".parse::<FilterRule>().unwrap(), FilterRule::All);
        assert_eq!("normal".parse::<FilterRule>().unwrap(), FilterRule::Normal);
        assert_eq!("GLY".parse::<FilterRule>().unwrap(), FilterRule::Gly);
        assert_eq!(" pro ".parse::<FilterRule>().unwrap(), FilterRule::Pro);
        assert_eq!("pre-pro".parse::<FilterRule>().unwrap(), FilterRule::PrePro);
        assert_eq!("pre_pro".parse::<FilterRule>().unwrap(), FilterRule::PrePro);
    }

    #[test]
    fn filter_rule_rejects_unknown_name_with_invalid_argument() {
        let err = "alanine".parse::<FilterRule>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(ref msg) if msg.contains("alanine")));
    }

    #[test]
    fn filter_rule_display_round_trips_through_from_str() {
        for rule in FilterRule::VARIANTS {
            assert_eq!(rule.to_string().parse::<FilterRule>().unwrap(), rule);
        }
    }

    #[test]
    fn build_with_all_parameters_succeeds() {
        let config = AnalysisConfigBuilder::new()
            .filter(FilterRule::Gly)
            .chain_id(" A ")
            .policy(ValidationPolicy::Strict)
            .build()
            .unwrap();
        assert_eq!(config.filter, FilterRule::Gly);
        assert_eq!(config.chain_id.as_deref(), Some("A"));
        assert_eq!(config.policy, ValidationPolicy::Strict);
    }

    #[test]
    fn build_defaults_to_skip_policy_and_no_chain() {
        let config = AnalysisConfigBuilder::new()
            .filter(FilterRule::All)
            .build()
            .unwrap();
        assert_eq!(config.chain_id, None);
        assert_eq!(config.policy, ValidationPolicy::Skip);
    }

    #[test]
    fn build_without_filter_fails() {
        let result = AnalysisConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("filter")));
    }

    #[test]
    fn build_with_blank_chain_id_fails() {
        let result = AnalysisConfigBuilder::new()
            .filter(FilterRule::All)
            .chain_id("  ")
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidChainId(_))));
    }
}
