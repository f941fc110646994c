//! Financial Modeling Prep (FMP) fundamentals provider for Tasador.
//!
//! This crate provides a client for fetching the statements a DCF valuation
//! needs from the [Financial Modeling Prep](https://financialmodelingprep.com/)
//! API, and [`FmpFundamentals`], which turns them into point-in-time
//! [`tasador_traits::FundamentalsSnapshot`]s.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tasador_fmp::FmpFundamentals;
//! use tasador_traits::{Date, FundamentalsProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FmpFundamentals::from_env()?;
//!     let as_of = Date::from_ymd_opt(2021, 4, 21).unwrap();
//!
//!     let snapshot = provider.fetch("AAPL", as_of).await?;
//!     println!("FCF: {}", snapshot.free_cash_flow());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod provider;
mod types;

pub use client::{FmpClient, optional_profile};
pub use error::FmpError;
pub use provider::{DEFAULT_PERIODS, FmpFundamentals, snapshot_from_statements};
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
