//! Data types for FMP API responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting period for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Annual reports (10-K filings).
    #[default]
    Annual,
    /// Quarterly reports (10-Q filings).
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// A filed statement, used to pick statements point-in-time.
///
/// FMP's `date` is the fiscal period end; the statement only becomes known
/// on its filing date, which comes some weeks later.
pub trait Dated {
    /// Fiscal period end (`YYYY-MM-DD`).
    fn period_end(&self) -> &str;

    /// Filing date (`YYYY-MM-DD`), when FMP reports one.
    fn filing_date(&self) -> Option<&str>;

    /// Date the statement became public: the filing date, or the period end
    /// when no filing date is reported.
    fn date_str(&self) -> &str {
        self.filing_date()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| self.period_end())
    }

    /// Parse [`Dated::date_str`] into a NaiveDate.
    ///
    /// A trailing time (`2020-10-30 00:00:00`) is ignored.
    fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date_str();
        NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d").ok()
    }
}

macro_rules! impl_dated {
    ($($ty:ty),+) => {
        $(
            impl Dated for $ty {
                fn period_end(&self) -> &str {
                    &self.date
                }

                fn filing_date(&self) -> Option<&str> {
                    self.filing_date.as_deref()
                }
            }
        )+
    };
}

impl_dated!(IncomeStatement, BalanceSheet, CashFlowStatement);

/// Income statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Fiscal period end.
    pub date: String,
    /// Date the statement was filed.
    #[serde(default)]
    pub filing_date: Option<String>,
    /// Ticker symbol.
    pub symbol: String,
    /// Weighted average shares outstanding.
    #[serde(default)]
    pub weighted_average_shs_out: f64,
    /// Weighted average diluted shares outstanding.
    #[serde(default)]
    pub weighted_average_shs_out_dil: f64,
}

impl IncomeStatement {
    /// Shares outstanding, preferring the basic count and falling back to diluted.
    ///
    /// FMP reports missing counts as zero, so zero maps to `None`.
    #[must_use]
    pub fn shares_outstanding(&self) -> Option<f64> {
        [self.weighted_average_shs_out, self.weighted_average_shs_out_dil]
            .into_iter()
            .find(|s| *s > 0.0)
    }
}

/// Balance sheet data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// Fiscal period end.
    pub date: String,
    /// Date the statement was filed.
    #[serde(default)]
    pub filing_date: Option<String>,
    /// Ticker symbol.
    pub symbol: String,
    /// Cash and cash equivalents.
    #[serde(default)]
    pub cash_and_cash_equivalents: f64,
    /// Short-term investments.
    #[serde(default)]
    pub short_term_investments: f64,
    /// Total debt.
    #[serde(default)]
    pub total_debt: f64,
}

/// Cash flow statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    /// Fiscal period end.
    pub date: String,
    /// Date the statement was filed.
    #[serde(default)]
    pub filing_date: Option<String>,
    /// Ticker symbol.
    pub symbol: String,
    /// Free cash flow.
    #[serde(default)]
    pub free_cash_flow: f64,
}

/// Company profile from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Five-year monthly beta, absent for recent listings.
    #[serde(default)]
    pub beta: Option<f64>,
}

/// The statements and profile needed to value one symbol.
#[derive(Debug, Clone)]
pub struct FundamentalStatements {
    /// Ticker symbol.
    pub symbol: String,
    /// Income statements (most recent first).
    pub income_statements: Vec<IncomeStatement>,
    /// Balance sheets (most recent first).
    pub balance_sheets: Vec<BalanceSheet>,
    /// Cash flow statements (most recent first).
    pub cash_flows: Vec<CashFlowStatement>,
    /// Company profile.
    pub profile: Option<CompanyProfile>,
}

/// Latest statement filed on or before `as_of`.
///
/// Statements are dated by [`Dated::date_str`]; those with unparseable
/// dates are skipped.
pub fn latest_as_of<T: Dated>(statements: &[T], as_of: NaiveDate) -> Option<&T> {
    statements
        .iter()
        .filter_map(|s| s.parsed_date().map(|d| (d, s)))
        .filter(|(d, _)| *d <= as_of)
        .max_by_key(|(d, _)| *d)
        .map(|(_, s)| s)
}

impl FundamentalStatements {
    /// Income statement in effect on `as_of`.
    #[must_use]
    pub fn income_as_of(&self, as_of: NaiveDate) -> Option<&IncomeStatement> {
        latest_as_of(&self.income_statements, as_of)
    }

    /// Balance sheet in effect on `as_of`.
    #[must_use]
    pub fn balance_as_of(&self, as_of: NaiveDate) -> Option<&BalanceSheet> {
        latest_as_of(&self.balance_sheets, as_of)
    }

    /// Cash flow statement in effect on `as_of`.
    #[must_use]
    pub fn cash_flow_as_of(&self, as_of: NaiveDate) -> Option<&CashFlowStatement> {
        latest_as_of(&self.cash_flows, as_of)
    }

    /// Beta from the profile.
    #[must_use]
    pub fn beta(&self) -> Option<f64> {
        self.profile.as_ref().and_then(|p| p.beta)
    }
}
