//! FMP API client implementation.

use crate::{
    Result,
    error::FmpError,
    types::{
        BalanceSheet, CashFlowStatement, CompanyProfile, FundamentalStatements, IncomeStatement,
        Period,
    },
};
use reqwest::Client;
use std::env;

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(endpoint, "FMP request");
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        // Check for error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(FmpError::Api(text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Build a statement endpoint path.
    fn statement_endpoint(kind: &str, symbol: &str, period: Period, limit: Option<u32>) -> String {
        let limit_param = limit.map(|l| format!("&limit={l}")).unwrap_or_default();
        format!(
            "{kind}?symbol={}&period={}{}",
            symbol.to_uppercase(),
            period.as_str(),
            limit_param
        )
    }

    /// Get income statements for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol (e.g., "AAPL")
    /// * `period` - Annual or quarterly
    /// * `limit` - Number of periods to return (most recent first)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn income_statement(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<IncomeStatement>> {
        let endpoint = Self::statement_endpoint("income-statement", symbol, period, limit);
        self.get(&endpoint).await
    }

    /// Get balance sheets for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn balance_sheet(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<BalanceSheet>> {
        let endpoint = Self::statement_endpoint("balance-sheet-statement", symbol, period, limit);
        self.get(&endpoint).await
    }

    /// Get cash flow statements for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn cash_flow(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<CashFlowStatement>> {
        let endpoint = Self::statement_endpoint("cash-flow-statement", symbol, period, limit);
        self.get(&endpoint).await
    }

    /// Get the company profile (beta) for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the symbol is unknown.
    pub async fn profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let endpoint = format!("profile?symbol={}", symbol.to_uppercase());
        let profiles: Vec<CompanyProfile> = self.get(&endpoint).await?;
        profiles
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::SymbolNotFound(symbol.to_string()))
    }

    /// Get the statements and profile needed to value a symbol.
    ///
    /// The three statements and the profile are fetched concurrently. Every
    /// request must succeed; a symbol without a profile only loses the beta.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `period` - Annual or quarterly statements
    /// * `periods` - Number of historical periods to fetch
    ///
    /// # Errors
    ///
    /// Returns an error if any statement or profile request fails.
    pub async fn fundamental_statements(
        &self,
        symbol: &str,
        period: Period,
        periods: u32,
    ) -> Result<FundamentalStatements> {
        let (income, balance, cash, profile) = tokio::join!(
            self.income_statement(symbol, period, Some(periods)),
            self.balance_sheet(symbol, period, Some(periods)),
            self.cash_flow(symbol, period, Some(periods)),
            self.profile(symbol),
        );

        let profile = optional_profile(profile)?;
        if profile.is_none() {
            tracing::warn!(symbol, "FMP has no profile; beta treated as absent");
        }

        Ok(FundamentalStatements {
            symbol: symbol.to_uppercase(),
            income_statements: income?,
            balance_sheets: balance?,
            cash_flows: cash?,
            profile,
        })
    }
}

/// Classifies a profile response.
///
/// An empty profile list means FMP reports no profile for the symbol, which
/// leaves beta absent. Any other failure is returned.
///
/// # Errors
///
/// Returns every error except [`FmpError::SymbolNotFound`].
pub fn optional_profile(result: Result<CompanyProfile>) -> Result<Option<CompanyProfile>> {
    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(FmpError::SymbolNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = FmpClient::new("test_key");
        assert_eq!(
            client.url("profile?symbol=AAPL"),
            "https://financialmodelingprep.com/stable/profile?symbol=AAPL&apikey=test_key"
        );
        assert_eq!(
            client.url("income-statement?symbol=AAPL&period=annual"),
            "https://financialmodelingprep.com/stable/income-statement?symbol=AAPL&period=annual&apikey=test_key"
        );
    }

    #[test]
    fn test_statement_endpoint() {
        assert_eq!(
            FmpClient::statement_endpoint("cash-flow-statement", "aapl", Period::Annual, Some(5)),
            "cash-flow-statement?symbol=AAPL&period=annual&limit=5"
        );
        assert_eq!(
            FmpClient::statement_endpoint("balance-sheet-statement", "msft", Period::Quarter, None),
            "balance-sheet-statement?symbol=MSFT&period=quarter"
        );
    }

    fn profile(beta: Option<f64>) -> CompanyProfile {
        CompanyProfile {
            symbol: "AAPL".to_string(),
            beta,
        }
    }

    #[test]
    fn test_optional_profile_keeps_profile() {
        let profile = optional_profile(Ok(profile(Some(1.2)))).unwrap();
        assert_eq!(profile.and_then(|p| p.beta), Some(1.2));
    }

    #[test]
    fn test_optional_profile_empty_means_absent() {
        let result = optional_profile(Err(FmpError::SymbolNotFound("AAPL".to_string())));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_optional_profile_propagates_request_failures() {
        let rate_limited = optional_profile(Err(FmpError::RateLimitExceeded));
        assert!(matches!(rate_limited, Err(FmpError::RateLimitExceeded)));

        let api = optional_profile(Err(FmpError::Api("HTTP 500: boom".to_string())));
        assert!(matches!(api, Err(FmpError::Api(_))));

        let json_err = serde_json::from_str::<Vec<CompanyProfile>>("not json").unwrap_err();
        let json = optional_profile(Err(FmpError::Json(json_err)));
        assert!(matches!(json, Err(FmpError::Json(_))));
    }
}
