//! Common types used throughout the Tasador toolkit.
//!
//! This module defines the point-in-time fundamentals snapshot consumed by the
//! valuation model, the three-regime growth assumptions, and a thin wrapper
//! around the tabular universe data read from and written to CSV.

use crate::{Result, TasadorError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, typically a ticker such as "AAPL".
pub type Symbol = String;

/// Fundamental metrics for one symbol, captured as of a given date.
///
/// A snapshot is immutable once built: it is fetched once per symbol, fed to a
/// single valuation and dropped. Amounts are assumed to share one currency
/// unit; the snapshot carries no unit metadata.
///
/// # Example
///
/// ```
/// use tasador_traits::{Date, FundamentalsSnapshot};
///
/// let as_of = Date::from_ymd_opt(2021, 4, 21).unwrap();
/// let snapshot = FundamentalsSnapshot::new("AAPL", as_of)
///     .with_beta(Some(1.2))
///     .with_free_cash_flow(20.0)
///     .with_shares_outstanding(Some(100.0));
///
/// assert_eq!(snapshot.beta(), Some(1.2));
/// assert_eq!(snapshot.cash_and_equivalents(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    symbol: Symbol,
    as_of: Date,
    beta: Option<f64>,
    free_cash_flow: f64,
    cash_and_equivalents: f64,
    short_term_investments: f64,
    total_debt: f64,
    shares_outstanding: Option<f64>,
}

impl FundamentalsSnapshot {
    /// Creates an empty snapshot: every amount zero, beta and shares absent.
    pub fn new(symbol: impl Into<Symbol>, as_of: Date) -> Self {
        Self {
            symbol: symbol.into(),
            as_of,
            beta: None,
            free_cash_flow: 0.0,
            cash_and_equivalents: 0.0,
            short_term_investments: 0.0,
            total_debt: 0.0,
            shares_outstanding: None,
        }
    }

    /// Sets the systematic risk coefficient.
    #[must_use]
    pub fn with_beta(mut self, beta: Option<f64>) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the trailing free cash flow.
    #[must_use]
    pub fn with_free_cash_flow(mut self, free_cash_flow: f64) -> Self {
        self.free_cash_flow = free_cash_flow;
        self
    }

    /// Sets cash and cash equivalents.
    #[must_use]
    pub fn with_cash_and_equivalents(mut self, cash: f64) -> Self {
        self.cash_and_equivalents = cash;
        self
    }

    /// Sets short-term investments.
    #[must_use]
    pub fn with_short_term_investments(mut self, investments: f64) -> Self {
        self.short_term_investments = investments;
        self
    }

    /// Sets total debt.
    #[must_use]
    pub fn with_total_debt(mut self, debt: f64) -> Self {
        self.total_debt = debt;
        self
    }

    /// Sets the number of shares outstanding.
    #[must_use]
    pub fn with_shares_outstanding(mut self, shares: Option<f64>) -> Self {
        self.shares_outstanding = shares;
        self
    }

    /// Ticker symbol this snapshot describes.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Date the snapshot was taken as of.
    pub const fn as_of(&self) -> Date {
        self.as_of
    }

    /// Beta, if the data source reports one.
    pub const fn beta(&self) -> Option<f64> {
        self.beta
    }

    /// Trailing free cash flow. May be negative.
    pub const fn free_cash_flow(&self) -> f64 {
        self.free_cash_flow
    }

    /// Cash and cash equivalents.
    pub const fn cash_and_equivalents(&self) -> f64 {
        self.cash_and_equivalents
    }

    /// Short-term investments.
    pub const fn short_term_investments(&self) -> f64 {
        self.short_term_investments
    }

    /// Total debt.
    pub const fn total_debt(&self) -> f64 {
        self.total_debt
    }

    /// Shares outstanding, absent when the source has no figure.
    pub const fn shares_outstanding(&self) -> Option<f64> {
        self.shares_outstanding
    }

    /// Checks that every reported amount is a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::InvalidData`] naming the first non-finite field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("beta", self.beta),
            ("free_cash_flow", Some(self.free_cash_flow)),
            ("cash_and_equivalents", Some(self.cash_and_equivalents)),
            ("short_term_investments", Some(self.short_term_investments)),
            ("total_debt", Some(self.total_debt)),
            ("shares_outstanding", self.shares_outstanding),
        ];

        for (name, value) in fields {
            if let Some(v) = value
                && !v.is_finite()
            {
                return Err(TasadorError::InvalidData(format!(
                    "{name} for {} is not finite ({v})",
                    self.symbol
                )));
            }
        }
        Ok(())
    }
}

/// Free cash flow growth rates for the three projection regimes.
///
/// Rates are decimals (0.14 = 14%). No bounds are enforced: negative rates,
/// and rates below -100%, propagate algebraically through the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumptions {
    /// Growth for years 1 to 5.
    pub short_term: f64,
    /// Growth for years 6 to 10.
    pub medium_term: f64,
    /// Growth for years 11 to 20.
    pub long_term: f64,
}

impl GrowthAssumptions {
    /// Creates growth assumptions from three explicit rates.
    #[must_use]
    pub const fn new(short_term: f64, medium_term: f64, long_term: f64) -> Self {
        Self {
            short_term,
            medium_term,
            long_term,
        }
    }

    /// Derives the medium-term rate as half of the short-term rate.
    #[must_use]
    pub fn from_short_term(short_term: f64, long_term: f64) -> Self {
        Self::new(short_term, short_term / 2.0, long_term)
    }

    /// Checks that every rate is a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] for NaN or infinite rates.
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("short_term", self.short_term),
            ("medium_term", self.medium_term),
            ("long_term", self.long_term),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() {
                return Err(TasadorError::Configuration(format!(
                    "{name} growth rate must be finite, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// Tabular universe data backed by a Polars DataFrame.
///
/// Wraps the symbol list read from CSV for batch valuation, and the annotated
/// table written back out.
#[derive(Debug, Clone)]
pub struct UniverseTable {
    data: DataFrame,
}

impl UniverseTable {
    /// Creates a new table from a DataFrame.
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Returns the column names.
    pub fn columns(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Checks if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Fails with [`TasadorError::MissingColumn`] on the first absent column.
    ///
    /// # Errors
    ///
    /// Returns an error naming the missing column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            if !self.has_column(name) {
                return Err(TasadorError::MissingColumn((*name).to_string()));
            }
        }
        Ok(())
    }

    /// Reads a column as optional strings, casting non-string columns.
    ///
    /// Null cells come back as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or cannot be cast.
    pub fn string_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self
            .data
            .column(name)
            .map_err(|_| TasadorError::MissingColumn(name.to_string()))?;
        let as_str = column.cast(&DataType::String)?;
        let values = as_str
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v: Option<&str>| v.map(str::to_string))
            .collect();
        Ok(values)
    }
}

impl From<DataFrame> for UniverseTable {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for UniverseTable {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn as_of() -> Date {
        Date::from_ymd_opt(2021, 4, 21).unwrap()
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot = FundamentalsSnapshot::new("MSFT", as_of());
        assert_eq!(snapshot.symbol(), "MSFT");
        assert_eq!(snapshot.as_of(), as_of());
        assert!(snapshot.beta().is_none());
        assert!(snapshot.shares_outstanding().is_none());
        assert_relative_eq!(snapshot.free_cash_flow(), 0.0);
        assert_relative_eq!(snapshot.total_debt(), 0.0);
    }

    #[test]
    fn test_snapshot_builders() {
        let snapshot = FundamentalsSnapshot::new("AAPL", as_of())
            .with_beta(Some(1.2))
            .with_free_cash_flow(-5.0)
            .with_cash_and_equivalents(50.0)
            .with_short_term_investments(10.0)
            .with_total_debt(30.0)
            .with_shares_outstanding(Some(100.0));

        assert_eq!(snapshot.beta(), Some(1.2));
        assert_relative_eq!(snapshot.free_cash_flow(), -5.0);
        assert_relative_eq!(snapshot.cash_and_equivalents(), 50.0);
        assert_relative_eq!(snapshot.short_term_investments(), 10.0);
        assert_relative_eq!(snapshot.total_debt(), 30.0);
        assert_eq!(snapshot.shares_outstanding(), Some(100.0));
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_snapshot_rejects_non_finite() {
        let snapshot = FundamentalsSnapshot::new("AAPL", as_of()).with_free_cash_flow(f64::NAN);
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, TasadorError::InvalidData(ref m) if m.contains("free_cash_flow")));

        let snapshot =
            FundamentalsSnapshot::new("AAPL", as_of()).with_shares_outstanding(Some(f64::INFINITY));
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_growth_from_short_term() {
        let growth = GrowthAssumptions::from_short_term(0.14, 0.04);
        assert_relative_eq!(growth.short_term, 0.14);
        assert_relative_eq!(growth.medium_term, 0.07);
        assert_relative_eq!(growth.long_term, 0.04);
    }

    #[test]
    fn test_growth_validate() {
        assert!(GrowthAssumptions::new(-0.5, 0.0, 2.0).validate().is_ok());
        let err = GrowthAssumptions::new(0.1, f64::NAN, 0.04).validate().unwrap_err();
        assert!(matches!(err, TasadorError::Configuration(ref m) if m.contains("medium_term")));
    }

    #[test]
    fn test_universe_table_columns() {
        let df = df! {
            "Symbol" => &["AAPL", "MSFT"],
            "Sector" => &["Technology", "Technology"],
        }
        .unwrap();

        let table = UniverseTable::from(df);
        assert_eq!(table.len(), 2);
        assert!(table.has_column("Symbol"));
        assert!(!table.has_column("EPS Next 5Y"));
        assert!(table.require_columns(&["Symbol", "Sector"]).is_ok());

        let err = table.require_columns(&["Symbol", "EPS Next 5Y"]).unwrap_err();
        assert!(matches!(err, TasadorError::MissingColumn(ref c) if c == "EPS Next 5Y"));
    }

    #[test]
    fn test_universe_table_string_column_casts() {
        let df = df! {
            "Symbol" => &["AAPL", "MSFT"],
            "EPS Next 5Y" => &[Some(0.14), None],
        }
        .unwrap();

        let table = UniverseTable::new(df);
        let eps = table.string_column("EPS Next 5Y").unwrap();
        assert_eq!(eps.len(), 2);
        assert_eq!(eps[0].as_deref().map(|s| s.parse::<f64>().unwrap()), Some(0.14));
        assert!(eps[1].is_none());
    }
}
