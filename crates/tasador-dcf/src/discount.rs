//! Discount factor derivation.
//!
//! A stock's beta is mapped to a WACC through the collaborator's lookup, and
//! the WACC to a single-period discount factor `1 / (1 + wacc)`. The
//! projection raises this factor to the year number.

use tasador_traits::{Result, TasadorError, WaccLookup};

/// Beta used for valuation: an absent beta counts as riskless (0).
#[must_use]
pub fn effective_beta(beta: Option<f64>) -> f64 {
    beta.unwrap_or(0.0)
}

/// Single-period discount factor for a WACC.
///
/// # Errors
///
/// Returns [`TasadorError::Configuration`] when `wacc` is non-finite or at
/// or below -100%, where `1 + wacc` would divide by zero or flip sign.
pub fn discount_factor(wacc: f64) -> Result<f64> {
    if !wacc.is_finite() {
        return Err(TasadorError::Configuration(format!(
            "WACC must be finite, got {wacc}"
        )));
    }
    let denominator = 1.0 + wacc;
    if denominator <= 0.0 {
        return Err(TasadorError::Configuration(format!(
            "WACC {wacc} gives a non-positive discount denominator"
        )));
    }
    Ok(1.0 / denominator)
}

/// WACC and discount factor resolved for one beta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountRate {
    /// Beta actually used (0 when the source reported none).
    pub beta: f64,
    /// WACC returned by the lookup.
    pub wacc: f64,
    /// `1 / (1 + wacc)`.
    pub factor: f64,
}

/// Resolves the discount rate for an optional beta through `lookup`.
///
/// # Errors
///
/// Propagates [`discount_factor`] errors for an unusable WACC.
pub fn discount_rate_for_beta<L>(beta: Option<f64>, lookup: &L) -> Result<DiscountRate>
where
    L: WaccLookup + ?Sized,
{
    let beta = effective_beta(beta);
    let wacc = lookup.lookup_wacc_by_beta(beta);
    let factor = discount_factor(wacc)?;
    Ok(DiscountRate { beta, wacc, factor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tasador_traits::WaccTable;

    #[test]
    fn test_discount_factor() {
        assert_relative_eq!(discount_factor(0.08).unwrap(), 1.0 / 1.08);
        assert_relative_eq!(discount_factor(0.0).unwrap(), 1.0);
        // Negative rates above -100% are usable and inflate future cash flows.
        assert_relative_eq!(discount_factor(-0.5).unwrap(), 2.0);
    }

    #[test]
    fn test_discount_factor_rejects_minus_one_and_below() {
        for wacc in [-1.0, -1.5, f64::NAN, f64::INFINITY] {
            let err = discount_factor(wacc).unwrap_err();
            assert!(matches!(err, TasadorError::Configuration(_)), "wacc {wacc}");
        }
    }

    #[test]
    fn test_absent_beta_is_zero() {
        assert_relative_eq!(effective_beta(None), 0.0);
        assert_relative_eq!(effective_beta(Some(1.3)), 1.3);

        let table = WaccTable::default();
        let absent = discount_rate_for_beta(None, &table).unwrap();
        let zero = discount_rate_for_beta(Some(0.0), &table).unwrap();
        assert_eq!(absent, zero);
    }

    #[test]
    fn test_rate_for_beta_uses_lookup() {
        let lookup = |beta: f64| if beta > 1.0 { 0.08 } else { 0.05 };
        let rate = discount_rate_for_beta(Some(1.2), &lookup).unwrap();
        assert_relative_eq!(rate.beta, 1.2);
        assert_relative_eq!(rate.wacc, 0.08);
        assert_relative_eq!(rate.factor, 1.0 / 1.08);
    }

    #[test]
    fn test_rate_for_beta_propagates_bad_wacc() {
        let broken = |_beta: f64| -1.0;
        assert!(discount_rate_for_beta(Some(1.0), &broken).is_err());
    }
}
