#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tasador/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # tasador
//!
//! Three-stage discounted cash flow fair value model for equities.
//!
//! tasador is an umbrella crate that re-exports the tasador sub-crates and
//! adds the drivers around the core model: fetch-then-value for a single
//! symbol, batch valuation of a universe CSV, and configuration.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tasador::prelude::*;
//! use tasador::fmp::FmpFundamentals;
//!
//! # async fn example() -> Result<()> {
//! let provider = FmpFundamentals::from_env()?;
//! let as_of = Date::from_ymd_opt(2021, 4, 21).unwrap();
//! let growth = GrowthAssumptions::from_short_term(0.14, 0.04);
//!
//! let valuation = tasador::value_symbol(&provider, "AAPL", as_of, growth).await?;
//! println!("AAPL fair value: {:.2}", valuation.fair_value_per_share());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Snapshot, growth assumptions, provider contract, WACC table
//! - [`dcf`] - Discount factor, projection and fair value assembly
//! - [`fmp`] - Financial Modeling Prep provider
//! - [`config`], [`service`], [`universe`], [`batch`] - Drivers
//!
//! ## The Model
//!
//! 1. Beta is mapped to a WACC and a discount factor `DF = 1 / (1 + WACC)`
//! 2. Free cash flow grows at the short-term rate for years 1-5, the
//!    medium-term rate for years 6-10 and the long-term rate for years
//!    11-20, each phase starting from the previous phase's last level
//! 3. Year `n` is discounted by `DF^n` and the twenty years are summed
//! 4. Cash and short-term investments are added, debt subtracted, and the
//!    total divided by shares outstanding

/// Version information for the tasador crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod batch;
pub mod config;
pub mod service;
pub mod universe;

/// Core types and the provider contract.
pub mod traits {
    pub use tasador_traits::*;
}

/// The discounted cash flow model.
///
/// # Example
///
/// ```
/// use tasador::dcf::{HORIZON_YEARS, project};
/// use tasador::traits::GrowthAssumptions;
///
/// let projection = project(100.0, 1.0, &GrowthAssumptions::new(0.0, 0.0, 0.0)).unwrap();
/// assert_eq!(projection.schedule().len(), HORIZON_YEARS as usize);
/// assert_eq!(projection.total(), 2000.0);
/// ```
pub mod dcf {
    pub use tasador_dcf::*;
}

/// Financial Modeling Prep (FMP) provider.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add it to a `.env` file
pub mod fmp {
    pub use tasador_fmp::*;
}

pub use batch::{BatchSummary, RowOutcome, run_batch, value_rows, value_universe};
pub use config::{BatchConfig, TasadorConfig, ValuationConfig};
pub use service::{value_symbol, value_symbol_with_timeout};
pub use tasador_dcf::{DiscountedCashFlowModel, Valuation};
pub use tasador_traits::{Result, TasadorError};

/// Prelude module for convenient imports.
///
/// ```
/// use tasador::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{BatchConfig, TasadorConfig, ValuationConfig};
    pub use tasador_dcf::{DiscountedCashFlowModel, Valuation};
    pub use tasador_traits::{
        Date, FundamentalsProvider, FundamentalsSnapshot, GrowthAssumptions, Result,
        StaticFundamentals, TasadorError, WaccLookup, WaccTable,
    };
}
