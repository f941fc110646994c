//! Discounted cash flow model and fair value assembly.
//!
//! The model combines the discounted free cash flow projection with the
//! balance sheet:
//!
//! ```text
//! PV         = cash + short-term investments - total debt + DCF
//! fair value = PV / shares outstanding
//! ```
//!
//! When shares outstanding are absent or zero the per-share value is
//! undefined. [`Valuation::fair_value_per_share`] keeps the historical
//! contract and reports `0.0` in that case, which callers cannot tell apart
//! from a company that is genuinely worth nothing; use
//! [`Valuation::per_share`] or [`Valuation::require_per_share`] to
//! distinguish the two.

use crate::discount::{DiscountRate, discount_rate_for_beta};
use crate::projection::{Projection, project, project_any};
use tasador_traits::{
    Date, FundamentalsSnapshot, GrowthAssumptions, Result, Symbol, TasadorError, WaccLookup,
};

/// Enterprise-to-equity bridge: balance sheet items plus discounted cash flow.
#[must_use]
pub fn present_value(snapshot: &FundamentalsSnapshot, discounted_cash_flow: f64) -> f64 {
    snapshot.cash_and_equivalents() + snapshot.short_term_investments() - snapshot.total_debt()
        + discounted_cash_flow
}

/// Divides `present_value` by the share count, `None` when shares are absent or zero.
#[must_use]
pub fn per_share(present_value: f64, shares_outstanding: Option<f64>) -> Option<f64> {
    match shares_outstanding {
        Some(shares) if shares != 0.0 => Some(present_value / shares),
        _ => None,
    }
}

/// A configured three-stage DCF model for one symbol.
///
/// The model is built in one step from a snapshot, an as-of date and growth
/// assumptions, and valued once: [`DiscountedCashFlowModel::calc_fair_value`]
/// consumes it, so a model cannot be re-run against a stale snapshot.
///
/// The as-of date is carried for point-in-time bookkeeping only; it plays
/// no part in the discounting arithmetic.
///
/// # Example
///
/// ```
/// use tasador_dcf::DiscountedCashFlowModel;
/// use tasador_traits::{Date, FundamentalsSnapshot, WaccTable};
///
/// let as_of = Date::from_ymd_opt(2021, 4, 21).unwrap();
/// let snapshot = FundamentalsSnapshot::new("AAPL", as_of)
///     .with_beta(Some(1.2))
///     .with_free_cash_flow(20.0)
///     .with_shares_outstanding(Some(100.0));
///
/// let valuation = DiscountedCashFlowModel::builder(snapshot, as_of)
///     .fcc_growth_rates(0.14, 0.07, 0.04)
///     .build()
///     .unwrap()
///     .calc_fair_value(&WaccTable::default())
///     .unwrap();
///
/// assert!(valuation.is_defined());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountedCashFlowModel {
    snapshot: FundamentalsSnapshot,
    as_of: Date,
    growth: GrowthAssumptions,
}

impl DiscountedCashFlowModel {
    /// Creates a model from all of its inputs.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] for non-finite growth rates.
    pub fn new(snapshot: FundamentalsSnapshot, as_of: Date, growth: GrowthAssumptions) -> Result<Self> {
        growth.validate()?;
        Ok(Self {
            snapshot,
            as_of,
            growth,
        })
    }

    /// Starts a builder for callers that set growth rates separately.
    #[must_use]
    pub fn builder(snapshot: FundamentalsSnapshot, as_of: Date) -> DcfModelBuilder {
        DcfModelBuilder {
            snapshot,
            as_of,
            growth: None,
        }
    }

    /// The fundamentals being valued.
    pub const fn snapshot(&self) -> &FundamentalsSnapshot {
        &self.snapshot
    }

    /// The valuation date.
    pub const fn as_of(&self) -> Date {
        self.as_of
    }

    /// The growth assumptions.
    pub const fn growth(&self) -> GrowthAssumptions {
        self.growth
    }

    /// Runs the valuation, using `wacc` to map beta to a discount rate.
    ///
    /// # Errors
    ///
    /// - [`TasadorError::InvalidData`] for non-finite fundamentals or a
    ///   negative share count.
    /// - [`TasadorError::Configuration`] when the looked-up WACC is at or
    ///   below -100%.
    ///
    /// Absent or zero shares outstanding is not an error; see [`Valuation`].
    /// It takes precedence over the fundamentals checks: such a snapshot
    /// values to the undefined sentinel even when its other figures are not
    /// finite. Configuration errors are still reported.
    pub fn calc_fair_value<L>(self, wacc: &L) -> Result<Valuation>
    where
        L: WaccLookup + ?Sized,
    {
        let shares = self.snapshot.shares_outstanding();
        let defined = per_share(1.0, shares).is_some();
        if defined {
            self.snapshot.validate()?;
        }
        if let Some(shares) = shares
            && shares < 0.0
        {
            return Err(TasadorError::InvalidData(format!(
                "shares outstanding for {} is negative ({shares})",
                self.snapshot.symbol()
            )));
        }

        let rate = discount_rate_for_beta(self.snapshot.beta(), wacc)?;
        let fcf = self.snapshot.free_cash_flow();
        let projection = if defined {
            project(fcf, rate.factor, &self.growth)?
        } else {
            project_any(fcf, rate.factor, &self.growth)?
        };
        let present_value = present_value(&self.snapshot, projection.total());
        let per_share = per_share(present_value, self.snapshot.shares_outstanding());

        Ok(Valuation {
            symbol: self.snapshot.symbol().to_string(),
            as_of: self.as_of,
            growth: self.growth,
            rate,
            projection,
            present_value,
            per_share,
        })
    }
}

/// Builder for [`DiscountedCashFlowModel`].
///
/// Represents a model whose growth rates have not been set yet; building it
/// in that state fails instead of valuing with missing assumptions.
#[derive(Debug, Clone)]
pub struct DcfModelBuilder {
    snapshot: FundamentalsSnapshot,
    as_of: Date,
    growth: Option<GrowthAssumptions>,
}

impl DcfModelBuilder {
    /// Sets the free cash flow growth rates for the three phases.
    #[must_use]
    pub fn fcc_growth_rates(mut self, short_term: f64, medium_term: f64, long_term: f64) -> Self {
        self.growth = Some(GrowthAssumptions::new(short_term, medium_term, long_term));
        self
    }

    /// Sets the growth assumptions.
    #[must_use]
    pub fn growth(mut self, growth: GrowthAssumptions) -> Self {
        self.growth = Some(growth);
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] if growth rates were never set
    /// or are not finite.
    pub fn build(self) -> Result<DiscountedCashFlowModel> {
        let growth = self.growth.ok_or_else(|| {
            TasadorError::Configuration(format!(
                "FCC growth rates not set for {}",
                self.snapshot.symbol()
            ))
        })?;
        DiscountedCashFlowModel::new(self.snapshot, self.as_of, growth)
    }
}

/// Outcome of a DCF valuation with its intermediate figures.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    symbol: Symbol,
    as_of: Date,
    growth: GrowthAssumptions,
    rate: DiscountRate,
    projection: Projection,
    present_value: f64,
    per_share: Option<f64>,
}

impl Valuation {
    /// Symbol valued.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Valuation date.
    pub const fn as_of(&self) -> Date {
        self.as_of
    }

    /// Growth assumptions used.
    pub const fn growth(&self) -> GrowthAssumptions {
        self.growth
    }

    /// Beta, WACC and discount factor used.
    pub const fn discount_rate(&self) -> DiscountRate {
        self.rate
    }

    /// Twenty-year projection.
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Sum of discounted projected free cash flows.
    pub const fn discounted_cash_flow(&self) -> f64 {
        self.projection.total()
    }

    /// Cash + short-term investments - debt + discounted cash flow.
    pub const fn present_value(&self) -> f64 {
        self.present_value
    }

    /// Fair value per share, `None` when shares outstanding are unknown or zero.
    pub const fn per_share(&self) -> Option<f64> {
        self.per_share
    }

    /// Whether a per-share value could be computed.
    pub const fn is_defined(&self) -> bool {
        self.per_share.is_some()
    }

    /// Fair value per share, with `0.0` standing in for an undefined value.
    ///
    /// A zero here is ambiguous; check [`Valuation::is_defined`] when the
    /// difference matters.
    pub fn fair_value_per_share(&self) -> f64 {
        self.per_share.unwrap_or(0.0)
    }

    /// Fair value per share, failing when it is undefined.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::MissingData`] when shares outstanding are
    /// absent or zero.
    pub fn require_per_share(&self) -> Result<f64> {
        self.per_share.ok_or_else(|| {
            TasadorError::MissingData(format!("shares outstanding for {}", self.symbol))
        })
    }
}
