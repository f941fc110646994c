//! Fundamentals provider trait.
//!
//! This module defines the `FundamentalsProvider` trait, the narrow read-only
//! contract through which the valuation layer obtains point-in-time
//! fundamentals for a symbol together with the beta-to-WACC policy. The
//! provider is the only component allowed to block on I/O; everything
//! downstream of a fetched [`FundamentalsSnapshot`] is pure computation.

use crate::{Date, FundamentalsSnapshot, Result, Symbol, TasadorError, WaccLookup, WaccTable};
use std::collections::HashMap;
use std::future::Future;

/// A source of point-in-time fundamentals.
///
/// Implementations fetch one [`FundamentalsSnapshot`] per call and never
/// retry; retry policy, if any, belongs to the implementation's own client.
/// The WACC lookup is part of the contract through the [`WaccLookup`]
/// supertrait.
///
/// # Example
///
/// ```
/// use tasador_traits::{Date, FundamentalsProvider, FundamentalsSnapshot, StaticFundamentals};
///
/// # tokio_test_block(async {
/// let as_of = Date::from_ymd_opt(2021, 4, 21).unwrap();
/// let provider = StaticFundamentals::new()
///     .with_snapshot(FundamentalsSnapshot::new("AAPL", as_of).with_free_cash_flow(20.0));
///
/// let snapshot = provider.fetch("aapl", as_of).await.unwrap();
/// assert_eq!(snapshot.free_cash_flow(), 20.0);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub trait FundamentalsProvider: WaccLookup + Send + Sync {
    /// Returns the name of this provider, used in logs.
    fn name(&self) -> &str;

    /// Fetches the fundamentals for `symbol` as known on `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::DataSource`] when the underlying source fails
    /// or has no data for the symbol.
    fn fetch(
        &self,
        symbol: &str,
        as_of: Date,
    ) -> impl Future<Output = Result<FundamentalsSnapshot>> + Send;
}

/// In-memory provider holding pre-built snapshots.
///
/// Symbols are matched case-insensitively. A symbol can also be registered
/// as failing, which makes [`FundamentalsProvider::fetch`] return a
/// [`TasadorError::DataSource`] for it.
#[derive(Debug, Clone, Default)]
pub struct StaticFundamentals {
    entries: HashMap<Symbol, std::result::Result<FundamentalsSnapshot, String>>,
    wacc_table: WaccTable,
}

impl StaticFundamentals {
    /// Creates an empty provider using the default WACC table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the WACC table.
    #[must_use]
    pub fn with_wacc_table(mut self, wacc_table: WaccTable) -> Self {
        self.wacc_table = wacc_table;
        self
    }

    /// Registers a snapshot under its own symbol.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: FundamentalsSnapshot) -> Self {
        self.insert(snapshot);
        self
    }

    /// Registers a symbol whose fetch fails with the given message.
    #[must_use]
    pub fn with_failure(mut self, symbol: &str, message: impl Into<String>) -> Self {
        self.entries
            .insert(symbol.to_uppercase(), Err(message.into()));
        self
    }

    /// Registers a snapshot under its own symbol, replacing any previous entry.
    pub fn insert(&mut self, snapshot: FundamentalsSnapshot) {
        self.entries
            .insert(snapshot.symbol().to_uppercase(), Ok(snapshot));
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no symbols are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, symbol: &str, as_of: Date) -> Result<FundamentalsSnapshot> {
        match self.entries.get(&symbol.to_uppercase()) {
            Some(Ok(snapshot)) if snapshot.as_of() <= as_of => Ok(snapshot.clone()),
            Some(Ok(snapshot)) => Err(TasadorError::DataSource(format!(
                "no fundamentals for {symbol} as of {as_of} (earliest {})",
                snapshot.as_of()
            ))),
            Some(Err(message)) => Err(TasadorError::DataSource(message.clone())),
            None => Err(TasadorError::DataSource(format!(
                "no fundamentals for {symbol}"
            ))),
        }
    }
}

impl WaccLookup for StaticFundamentals {
    fn lookup_wacc_by_beta(&self, beta: f64) -> f64 {
        self.wacc_table.lookup_wacc_by_beta(beta)
    }
}

impl FundamentalsProvider for StaticFundamentals {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(
        &self,
        symbol: &str,
        as_of: Date,
    ) -> impl Future<Output = Result<FundamentalsSnapshot>> + Send {
        let result = self.lookup(symbol, as_of);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_is_case_insensitive() {
        let provider = StaticFundamentals::new().with_snapshot(
            FundamentalsSnapshot::new("MSFT", date(2021, 4, 21)).with_total_debt(12.0),
        );

        let snapshot = provider.fetch("msft", date(2021, 6, 15)).await.unwrap();
        assert_eq!(snapshot.symbol(), "MSFT");
        assert_relative_eq!(snapshot.total_debt(), 12.0);
    }

    #[tokio::test]
    async fn test_fetch_unknown_symbol() {
        let provider = StaticFundamentals::new();
        let err = provider.fetch("ZZZZ", date(2021, 1, 1)).await.unwrap_err();
        assert!(matches!(err, TasadorError::DataSource(ref m) if m.contains("ZZZZ")));
    }

    #[tokio::test]
    async fn test_fetch_respects_as_of() {
        let provider = StaticFundamentals::new()
            .with_snapshot(FundamentalsSnapshot::new("AAPL", date(2021, 4, 21)));

        assert!(provider.fetch("AAPL", date(2021, 4, 21)).await.is_ok());
        assert!(provider.fetch("AAPL", date(2020, 12, 31)).await.is_err());
    }

    #[tokio::test]
    async fn test_registered_failure() {
        let provider = StaticFundamentals::new().with_failure("BAD", "HTTP 500");
        let err = provider.fetch("bad", date(2021, 1, 1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Data source error: HTTP 500");
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_wacc_lookup_delegates_to_table() {
        let provider = StaticFundamentals::new();
        assert_relative_eq!(provider.lookup_wacc_by_beta(1.2), 0.08);

        let flat = WaccTable::new(vec![], 0.1).unwrap();
        let provider = StaticFundamentals::new().with_wacc_table(flat);
        assert_relative_eq!(provider.lookup_wacc_by_beta(1.2), 0.1);
    }

    #[test]
    fn test_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StaticFundamentals>();
    }
}
