//! Configuration for single-symbol and batch valuation.
//!
//! Every field has a default, so a configuration file only needs to name
//! the values it changes:
//!
//! ```json
//! {
//!   "valuation": { "default_short_term": 0.12 },
//!   "batch": { "as_of": "2021-06-15", "fetch_timeout_secs": 10 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tasador_traits::{Date, GrowthAssumptions, Result, TasadorError, WaccTable};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasadorConfig {
    /// Single-symbol valuation defaults and the WACC policy.
    pub valuation: ValuationConfig,
    /// Batch run settings.
    pub batch: BatchConfig,
}

impl TasadorConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Io`] if the file cannot be read, and
    /// [`TasadorError::Configuration`] if it does not parse or fails
    /// validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] on malformed JSON or invalid values.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| TasadorError::Configuration(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the WACC table and every growth parameter.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        self.valuation.validate()?;
        self.batch.validate()
    }
}

/// Valuation defaults used when the caller leaves a rate unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Beta-to-WACC bucket table.
    pub wacc_table: WaccTable,
    /// Short-term growth used when none is given.
    pub default_short_term: f64,
    /// Long-term growth used when none is given.
    pub default_long_term: f64,
    /// Medium-term growth as a multiple of the short-term rate.
    pub medium_to_short_ratio: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            wacc_table: WaccTable::default(),
            default_short_term: 0.14,
            default_long_term: 0.04,
            medium_to_short_ratio: 0.5,
        }
    }
}

impl ValuationConfig {
    /// Resolves growth assumptions, filling unset rates from the defaults.
    ///
    /// The medium-term rate defaults to `short * medium_to_short_ratio`,
    /// using the resolved short-term rate.
    #[must_use]
    pub fn growth(
        &self,
        short_term: Option<f64>,
        medium_term: Option<f64>,
        long_term: Option<f64>,
    ) -> GrowthAssumptions {
        let short = short_term.unwrap_or(self.default_short_term);
        let medium = medium_term.unwrap_or(short * self.medium_to_short_ratio);
        let long = long_term.unwrap_or(self.default_long_term);
        GrowthAssumptions::new(short, medium, long)
    }

    /// Growth assumptions for a batch row with the given short-term rate.
    #[must_use]
    pub fn growth_for(&self, short_term: f64) -> GrowthAssumptions {
        self.growth(Some(short_term), None, None)
    }

    /// Checks the WACC table and default rates.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] for an invalid table or a
    /// non-finite default.
    pub fn validate(&self) -> Result<()> {
        self.wacc_table.validate()?;
        require_finite("valuation.default_short_term", self.default_short_term)?;
        require_finite("valuation.default_long_term", self.default_long_term)?;
        require_finite("valuation.medium_to_short_ratio", self.medium_to_short_ratio)
    }
}

/// Batch run settings.
///
/// Growth for each row comes from [`ValuationConfig::growth`], with the row's
/// EPS estimate as the short-term rate, so the batch and single-symbol paths
/// share one set of medium- and long-term defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Valuation date; today when unset.
    pub as_of: Option<Date>,
    /// Per-symbol fetch timeout in seconds; no timeout when unset.
    pub fetch_timeout_secs: Option<u64>,
    /// Abort the run on the first failing symbol instead of writing an error row.
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            as_of: None,
            fetch_timeout_secs: Some(30),
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    /// Checks the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] for a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_secs == Some(0) {
            return Err(TasadorError::Configuration(
                "batch.fetch_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TasadorError::Configuration(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tasador_traits::WaccLookup;

    #[test]
    fn test_defaults() {
        let config = TasadorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.valuation.wacc_table, WaccTable::default());
        assert!(config.batch.as_of.is_none());
        assert!(!config.batch.fail_fast);
        assert_eq!(config.batch.fetch_timeout_secs, Some(30));
    }

    #[test]
    fn test_valuation_growth_defaults() {
        let config = ValuationConfig::default();

        let growth = config.growth(None, None, None);
        assert_relative_eq!(growth.short_term, 0.14);
        assert_relative_eq!(growth.medium_term, 0.07);
        assert_relative_eq!(growth.long_term, 0.04);

        let growth = config.growth(Some(0.2), None, Some(0.03));
        assert_relative_eq!(growth.medium_term, 0.1);
        assert_relative_eq!(growth.long_term, 0.03);

        let growth = config.growth(Some(0.2), Some(0.15), None);
        assert_relative_eq!(growth.medium_term, 0.15);
    }

    #[test]
    fn test_batch_growth_halves_short_term() {
        let config = ValuationConfig::default();
        assert_eq!(config.growth_for(0.14), GrowthAssumptions::from_short_term(0.14, 0.04));
        assert_eq!(config.growth_for(0.0), GrowthAssumptions::new(0.0, 0.0, 0.04));
    }

    #[test]
    fn test_batch_growth_follows_valuation_defaults() {
        let config = TasadorConfig::from_json_str(
            r#"{"valuation": {"default_short_term": 0.3, "default_long_term": 0.02, "medium_to_short_ratio": 0.25}}"#,
        )
        .unwrap();

        // The row's own short-term rate replaces the default.
        let growth = config.valuation.growth_for(0.2);
        assert_relative_eq!(growth.short_term, 0.2);
        assert_relative_eq!(growth.medium_term, 0.05);
        assert_relative_eq!(growth.long_term, 0.02);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TasadorConfig::from_json_str(
            r#"{"batch": {"as_of": "2021-06-15", "fetch_timeout_secs": null, "fail_fast": true}}"#,
        )
        .unwrap();

        assert_eq!(config.batch.as_of, Date::from_ymd_opt(2021, 6, 15));
        assert!(config.batch.fetch_timeout_secs.is_none());
        assert!(config.batch.fail_fast);
        assert_eq!(config.valuation, ValuationConfig::default());
    }

    #[test]
    fn test_custom_wacc_table() {
        let config = TasadorConfig::from_json_str(
            r#"{"valuation": {"wacc_table": {
                "buckets": [{"upper_beta": 1.0, "wacc": 0.06}],
                "above": 0.1
            }}}"#,
        )
        .unwrap();

        let table = &config.valuation.wacc_table;
        assert_relative_eq!(table.lookup_wacc_by_beta(0.5), 0.06);
        assert_relative_eq!(table.lookup_wacc_by_beta(1.0), 0.1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let unsorted = r#"{"valuation": {"wacc_table": {
            "buckets": [{"upper_beta": 1.2, "wacc": 0.07}, {"upper_beta": 0.8, "wacc": 0.05}],
            "above": 0.09
        }}}"#;
        assert!(matches!(
            TasadorConfig::from_json_str(unsorted),
            Err(TasadorError::Configuration(_))
        ));

        assert!(matches!(
            TasadorConfig::from_json_str(r#"{"batch": {"fetch_timeout_secs": 0}}"#),
            Err(TasadorError::Configuration(_))
        ));

        assert!(matches!(
            TasadorConfig::from_json_str("not json"),
            Err(TasadorError::Configuration(ref m)) if m.contains("parse")
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasador.json");
        std::fs::write(&path, r#"{"valuation": {"default_long_term": 0.03}}"#).unwrap();

        let config = TasadorConfig::from_file(&path).unwrap();
        assert_relative_eq!(config.valuation.default_long_term, 0.03);

        let missing = TasadorConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(TasadorError::Io(_))));
    }
}
