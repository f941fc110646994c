#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tasador/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Three-stage discounted cash flow valuation.
//!
//! Free cash flow is projected for twenty years across three growth regimes
//! (years 1-5, 6-10 and 11-20), discounted at a WACC looked up from the
//! stock's beta, bridged to equity with cash, short-term investments and
//! debt, and divided by shares outstanding.
//!
//! The crate is pure computation: it performs no I/O and no logging.
//! Fundamentals come in as a [`tasador_traits::FundamentalsSnapshot`] and the
//! WACC policy as any [`tasador_traits::WaccLookup`].
//!
//! # Example
//!
//! ```
//! use tasador_dcf::DiscountedCashFlowModel;
//! use tasador_traits::{Date, FundamentalsSnapshot, GrowthAssumptions};
//!
//! let as_of = Date::from_ymd_opt(2021, 4, 21).unwrap();
//! let snapshot = FundamentalsSnapshot::new("AAPL", as_of)
//!     .with_beta(Some(1.2))
//!     .with_free_cash_flow(20.0)
//!     .with_cash_and_equivalents(50.0)
//!     .with_short_term_investments(10.0)
//!     .with_total_debt(30.0)
//!     .with_shares_outstanding(Some(100.0));
//!
//! let model = DiscountedCashFlowModel::new(
//!     snapshot,
//!     as_of,
//!     GrowthAssumptions::new(0.14, 0.07, 0.04),
//! )
//! .unwrap();
//!
//! let valuation = model.calc_fair_value(&|_beta: f64| 0.08).unwrap();
//! assert!((valuation.fair_value_per_share() - 4.7987).abs() < 1e-4);
//! ```

pub mod discount;
pub mod model;
pub mod projection;

pub use discount::{DiscountRate, discount_factor, discount_rate_for_beta, effective_beta};
pub use model::{DcfModelBuilder, DiscountedCashFlowModel, Valuation, per_share, present_value};
pub use projection::{HORIZON_YEARS, Phase, ProjectedYear, Projection, project};
