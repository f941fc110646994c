//! Fetch-then-value for a single symbol.

use std::time::Duration;
use tasador_dcf::{DiscountedCashFlowModel, Valuation};
use tasador_traits::{
    Date, FundamentalsProvider, FundamentalsSnapshot, GrowthAssumptions, Result, TasadorError,
};

/// Fetches `symbol` from `provider` and values it with `growth`.
///
/// The provider's own WACC policy discounts the projection. An undefined
/// per-share value (no share count) is returned as a [`Valuation`] that is
/// not [`defined`](Valuation::is_defined), not as an error.
///
/// # Errors
///
/// Propagates provider failures ([`TasadorError::DataSource`]) and model
/// errors ([`TasadorError::Configuration`], [`TasadorError::InvalidData`]).
pub async fn value_symbol<P>(
    provider: &P,
    symbol: &str,
    as_of: Date,
    growth: GrowthAssumptions,
) -> Result<Valuation>
where
    P: FundamentalsProvider,
{
    let snapshot = provider.fetch(symbol, as_of).await?;
    value_snapshot(provider, snapshot, as_of, growth)
}

/// Like [`value_symbol`], failing with [`TasadorError::DataSource`] when the
/// fetch takes longer than `timeout`.
///
/// # Errors
///
/// See [`value_symbol`].
pub async fn value_symbol_with_timeout<P>(
    provider: &P,
    symbol: &str,
    as_of: Date,
    growth: GrowthAssumptions,
    timeout: Option<Duration>,
) -> Result<Valuation>
where
    P: FundamentalsProvider,
{
    let Some(timeout) = timeout else {
        return value_symbol(provider, symbol, as_of, growth).await;
    };

    let snapshot = tokio::time::timeout(timeout, provider.fetch(symbol, as_of))
        .await
        .map_err(|_| {
            TasadorError::DataSource(format!(
                "{} fetch for {symbol} timed out after {}s",
                provider.name(),
                timeout.as_secs_f64()
            ))
        })??;
    value_snapshot(provider, snapshot, as_of, growth)
}

fn value_snapshot<P>(
    provider: &P,
    snapshot: FundamentalsSnapshot,
    as_of: Date,
    growth: GrowthAssumptions,
) -> Result<Valuation>
where
    P: FundamentalsProvider,
{
    let valuation = DiscountedCashFlowModel::new(snapshot, as_of, growth)?.calc_fair_value(provider)?;

    let rate = valuation.discount_rate();
    tracing::debug!(
        symbol = valuation.symbol(),
        provider = provider.name(),
        beta = rate.beta,
        wacc = rate.wacc,
        dcf = valuation.discounted_cash_flow(),
        present_value = valuation.present_value(),
        per_share = ?valuation.per_share(),
        "valued"
    );
    if !valuation.is_defined() {
        tracing::warn!(
            symbol = valuation.symbol(),
            "shares outstanding unavailable; fair value undefined"
        );
    }
    Ok(valuation)
}
