use serde::{Deserialize, Serialize};

/// Default peer rating impact (polarisation factor).
pub const DEFAULT_IMPACT: f64 = 1.0;
/// Default tolerance (polishing factor).
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// Tuning knobs for the QASS engine.
///
/// Both factors are optional; missing values fall back to the defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   impact: 1
///   tolerance: 2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Peer rating impact: how sharply a student's rating separates from the
    /// group mean (default: 1.0, must be > 0)
    #[serde(default)]
    pub impact: Option<f64>,

    /// Tolerance: how strongly a contribution bends the final score away from
    /// the group score (default: 2.0, must be > 1)
    #[serde(default)]
    pub tolerance: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            impact: Some(DEFAULT_IMPACT),
            tolerance: Some(DEFAULT_TOLERANCE),
        }
    }
}

impl ScoringConfig {
    pub fn impact(&self) -> f64 {
        self.impact.unwrap_or(DEFAULT_IMPACT)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }

    /// Overlay explicitly given values (e.g. from command-line flags).
    pub fn with_overrides(mut self, impact: Option<f64>, tolerance: Option<f64>) -> Self {
        if impact.is_some() {
            self.impact = impact;
        }
        if tolerance.is_some() {
            self.tolerance = tolerance;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.impact, Some(1.0));
        assert_eq!(config.tolerance, Some(2.0));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = "tolerance: 3.5\n";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.impact.is_none());
        assert_eq!(config.impact(), DEFAULT_IMPACT);
        assert_eq!(config.tolerance(), 3.5);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.impact(), 1.0);
        assert_eq!(config.tolerance(), 2.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str("base_score: 100\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_only_replace_given_values() {
        let config = ScoringConfig::default().with_overrides(None, Some(4.0));
        assert_eq!(config.impact(), 1.0);
        assert_eq!(config.tolerance(), 4.0);
    }
}
