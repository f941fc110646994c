//! [`FundamentalsProvider`] backed by the FMP API.

use crate::{FmpClient, FmpError, FundamentalStatements, Period};
use std::future::Future;
use tasador_traits::{
    Date, FundamentalsProvider, FundamentalsSnapshot, Result, WaccLookup, WaccTable,
};

/// Default number of historical periods requested per statement.
pub const DEFAULT_PERIODS: u32 = 5;

/// Fundamentals provider that reads statements from FMP.
///
/// Each fetch issues one request per statement plus one for the profile; no
/// responses are cached and failed requests are not retried.
#[derive(Debug, Clone)]
pub struct FmpFundamentals {
    client: FmpClient,
    wacc_table: WaccTable,
    period: Period,
    periods: u32,
}

impl FmpFundamentals {
    /// Creates a provider over an existing client with the default WACC table.
    #[must_use]
    pub fn new(client: FmpClient) -> Self {
        Self {
            client,
            wacc_table: WaccTable::default(),
            period: Period::Annual,
            periods: DEFAULT_PERIODS,
        }
    }

    /// Creates a provider from `FMP_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::MissingApiKey`] when the key is not set.
    pub fn from_env() -> std::result::Result<Self, FmpError> {
        Ok(Self::new(FmpClient::from_env()?))
    }

    /// Replaces the WACC bucket table.
    #[must_use]
    pub fn with_wacc_table(mut self, wacc_table: WaccTable) -> Self {
        self.wacc_table = wacc_table;
        self
    }

    /// Selects annual or quarterly statements.
    #[must_use]
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Sets how many historical periods to request.
    ///
    /// More periods let older as-of dates find a statement.
    #[must_use]
    pub fn with_periods(mut self, periods: u32) -> Self {
        self.periods = periods;
        self
    }

    /// The WACC table in use.
    pub const fn wacc_table(&self) -> &WaccTable {
        &self.wacc_table
    }
}

/// Builds a snapshot from the statements filed on or before `as_of`.
///
/// Free cash flow and the balance sheet are required. Shares outstanding
/// come from the income statement and are absent when it is missing or
/// reports zero; beta is absent when the profile has none.
///
/// # Errors
///
/// Returns [`FmpError::NoData`] when no cash flow statement or balance sheet
/// was filed on or before `as_of`.
pub fn snapshot_from_statements(
    statements: &FundamentalStatements,
    as_of: Date,
) -> std::result::Result<FundamentalsSnapshot, FmpError> {
    let symbol = &statements.symbol;
    let cash_flow = statements
        .cash_flow_as_of(as_of)
        .ok_or_else(|| FmpError::NoData(format!("{symbol} cash flow statement as of {as_of}")))?;
    let balance = statements
        .balance_as_of(as_of)
        .ok_or_else(|| FmpError::NoData(format!("{symbol} balance sheet as of {as_of}")))?;
    let shares = statements
        .income_as_of(as_of)
        .and_then(|income| income.shares_outstanding());

    Ok(FundamentalsSnapshot::new(symbol.clone(), as_of)
        .with_beta(statements.beta())
        .with_free_cash_flow(cash_flow.free_cash_flow)
        .with_cash_and_equivalents(balance.cash_and_cash_equivalents)
        .with_short_term_investments(balance.short_term_investments)
        .with_total_debt(balance.total_debt)
        .with_shares_outstanding(shares))
}

impl WaccLookup for FmpFundamentals {
    fn lookup_wacc_by_beta(&self, beta: f64) -> f64 {
        self.wacc_table.lookup_wacc_by_beta(beta)
    }
}

impl FundamentalsProvider for FmpFundamentals {
    fn name(&self) -> &str {
        "fmp"
    }

    fn fetch(
        &self,
        symbol: &str,
        as_of: Date,
    ) -> impl Future<Output = Result<FundamentalsSnapshot>> + Send {
        async move {
            let statements = self
                .client
                .fundamental_statements(symbol, self.period, self.periods)
                .await?;
            let snapshot = snapshot_from_statements(&statements, as_of)?;
            tracing::debug!(
                symbol = snapshot.symbol(),
                %as_of,
                beta = ?snapshot.beta(),
                fcf = snapshot.free_cash_flow(),
                shares = ?snapshot.shares_outstanding(),
                "FMP snapshot"
            );
            Ok(snapshot)
        }
    }
}
