//! Argument parsing and provider setup for the Tasador CLI.

use chrono::{Local, NaiveDate};
use std::path::Path;
use tasador::TasadorConfig;
use tasador::fmp::{FmpError, FmpFundamentals};
use tasador_traits::TasadorError;

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate, TasadorError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| TasadorError::InvalidDate(format!("{date_str}: {e}")))
}

/// Parse an optional date, defaulting to today in local time.
pub(crate) fn date_or_today(date_str: Option<&str>) -> Result<NaiveDate, TasadorError> {
    date_str.map_or_else(|| Ok(Local::now().date_naive()), parse_date)
}

/// Load the configuration file, or the defaults when none is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<TasadorConfig, TasadorError> {
    match path {
        Some(path) => {
            let config = TasadorConfig::from_file(path)?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(TasadorConfig::default()),
    }
}

/// Build the FMP provider using the configured WACC table.
pub(crate) fn fmp_provider(config: &TasadorConfig) -> Result<FmpFundamentals, FmpError> {
    Ok(FmpFundamentals::from_env()?.with_wacc_table(config.valuation.wacc_table.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2021-04-21").unwrap();
        assert_eq!(date.year(), 2021);
        assert_eq!(date.month(), 4);
        assert_eq!(date.day(), 21);
    }

    #[test]
    fn test_parse_date_invalid() {
        let result = parse_date("21/04/2021");
        assert!(matches!(result, Err(TasadorError::InvalidDate(ref m)) if m.starts_with("21/04/2021")));
    }

    #[test]
    fn test_date_or_today() {
        assert_eq!(
            date_or_today(Some("2021-06-15")).unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 15).unwrap()
        );
        assert_eq!(date_or_today(None).unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, TasadorConfig::default());
    }
}
