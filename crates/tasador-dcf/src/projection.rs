//! Three-phase free cash flow projection.
//!
//! Free cash flow is grown for twenty years under three regimes and each
//! year's cash flow is discounted back by `discount_factor^year`:
//!
//! | phase | years | growth base | discount exponent |
//! |---|---|---|---|
//! | short term | 1-5 | `FCC` | `i` |
//! | medium term | 6-10 | `CF5 = FCC (1+short)^5` | `i + 5` |
//! | long term | 11-20 | `CF10 = CF5 (1+medium)^5` | `i + 10` |
//!
//! The growth base resets at each boundary to the undiscounted cash flow
//! level reached at the end of the previous phase, while the discount
//! exponent keeps counting from year 1 to year 20.

use serde::{Deserialize, Serialize};
use tasador_traits::{GrowthAssumptions, Result, TasadorError};

/// Years covered by the short-term phase.
pub const SHORT_TERM_YEARS: u32 = 5;
/// Years covered by the medium-term phase.
pub const MEDIUM_TERM_YEARS: u32 = 5;
/// Years covered by the long-term phase.
pub const LONG_TERM_YEARS: u32 = 10;
/// Total projection horizon.
pub const HORIZON_YEARS: u32 = SHORT_TERM_YEARS + MEDIUM_TERM_YEARS + LONG_TERM_YEARS;

/// Growth regime a projected year belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Years 1 to 5.
    ShortTerm,
    /// Years 6 to 10.
    MediumTerm,
    /// Years 11 to 20.
    LongTerm,
}

impl Phase {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short",
            Self::MediumTerm => "medium",
            Self::LongTerm => "long",
        }
    }
}

/// One year of the projection schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedYear {
    /// Year number, 1 to 20.
    pub year: u32,
    /// Growth regime.
    pub phase: Phase,
    /// Undiscounted free cash flow for the year.
    pub cash_flow: f64,
    /// `discount_factor^year`.
    pub discount: f64,
    /// `cash_flow * discount`.
    pub present_value: f64,
}

/// Result of projecting and discounting twenty years of free cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    schedule: Vec<ProjectedYear>,
    cf5: f64,
    cf10: f64,
    total: f64,
}

impl Projection {
    /// Year-by-year schedule, year 1 first.
    pub fn schedule(&self) -> &[ProjectedYear] {
        &self.schedule
    }

    /// Cash flow level at the end of year 5, the medium-term growth base.
    pub const fn cf5(&self) -> f64 {
        self.cf5
    }

    /// Cash flow level at the end of year 10, the long-term growth base.
    pub const fn cf10(&self) -> f64 {
        self.cf10
    }

    /// Sum of all discounted cash flows (the `DCF` term of the valuation).
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Sum of discounted cash flows within one phase.
    pub fn phase_total(&self, phase: Phase) -> f64 {
        self.schedule
            .iter()
            .filter(|y| y.phase == phase)
            .map(|y| y.present_value)
            .sum()
    }
}

/// Projects `free_cash_flow` over twenty years and discounts it.
///
/// # Errors
///
/// - [`TasadorError::InvalidData`] if `free_cash_flow` is not finite.
/// - [`TasadorError::Configuration`] if `discount_factor` is not a positive
///   finite number, or a growth rate is not finite.
///
/// # Example
///
/// ```
/// use tasador_dcf::projection::project;
/// use tasador_traits::GrowthAssumptions;
///
/// let flat = GrowthAssumptions::new(0.0, 0.0, 0.0);
/// let projection = project(10.0, 1.0, &flat).unwrap();
/// assert_eq!(projection.total(), 200.0);
/// ```
pub fn project(
    free_cash_flow: f64,
    discount_factor: f64,
    growth: &GrowthAssumptions,
) -> Result<Projection> {
    if !free_cash_flow.is_finite() {
        return Err(TasadorError::InvalidData(format!(
            "free cash flow must be finite, got {free_cash_flow}"
        )));
    }
    project_any(free_cash_flow, discount_factor, growth)
}

/// [`project`] without the free cash flow check; a non-finite flow carries
/// through every projected year.
pub(crate) fn project_any(
    free_cash_flow: f64,
    discount_factor: f64,
    growth: &GrowthAssumptions,
) -> Result<Projection> {
    if !discount_factor.is_finite() || discount_factor <= 0.0 {
        return Err(TasadorError::Configuration(format!(
            "discount factor must be positive and finite, got {discount_factor}"
        )));
    }
    growth.validate()?;

    let mut schedule = Vec::with_capacity(HORIZON_YEARS as usize);

    run_phase(
        &mut schedule,
        Phase::ShortTerm,
        free_cash_flow,
        growth.short_term,
        0,
        SHORT_TERM_YEARS,
        discount_factor,
    );
    let cf5 = free_cash_flow * compound(growth.short_term, SHORT_TERM_YEARS);

    run_phase(
        &mut schedule,
        Phase::MediumTerm,
        cf5,
        growth.medium_term,
        SHORT_TERM_YEARS,
        MEDIUM_TERM_YEARS,
        discount_factor,
    );
    let cf10 = cf5 * compound(growth.medium_term, MEDIUM_TERM_YEARS);

    run_phase(
        &mut schedule,
        Phase::LongTerm,
        cf10,
        growth.long_term,
        SHORT_TERM_YEARS + MEDIUM_TERM_YEARS,
        LONG_TERM_YEARS,
        discount_factor,
    );

    // Accumulate in year order so the sum rounds the same way a single
    // running total would.
    let total = schedule.iter().fold(0.0, |acc, y| acc + y.present_value);

    Ok(Projection {
        schedule,
        cf5,
        cf10,
        total,
    })
}

/// `(1 + rate)^years`.
fn compound(rate: f64, years: u32) -> f64 {
    (1.0 + rate).powi(years as i32)
}

fn run_phase(
    schedule: &mut Vec<ProjectedYear>,
    phase: Phase,
    base: f64,
    rate: f64,
    offset: u32,
    years: u32,
    discount_factor: f64,
) {
    for i in 1..=years {
        let year = i + offset;
        let cash_flow = base * compound(rate, i);
        let discount = discount_factor.powi(year as i32);
        schedule.push(ProjectedYear {
            year,
            phase,
            cash_flow,
            discount,
            present_value: cash_flow * discount,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn growth(short: f64, medium: f64, long: f64) -> GrowthAssumptions {
        GrowthAssumptions::new(short, medium, long)
    }

    #[test]
    fn test_schedule_shape() {
        let projection = project(100.0, 0.9, &growth(0.1, 0.05, 0.02)).unwrap();
        let schedule = projection.schedule();
        assert_eq!(schedule.len(), HORIZON_YEARS as usize);

        for (idx, year) in schedule.iter().enumerate() {
            assert_eq!(year.year, idx as u32 + 1);
        }
        assert_eq!(schedule[0].phase, Phase::ShortTerm);
        assert_eq!(schedule[4].phase, Phase::ShortTerm);
        assert_eq!(schedule[5].phase, Phase::MediumTerm);
        assert_eq!(schedule[9].phase, Phase::MediumTerm);
        assert_eq!(schedule[10].phase, Phase::LongTerm);
        assert_eq!(schedule[19].phase, Phase::LongTerm);
    }

    #[test]
    fn test_discount_exponent_runs_one_to_twenty() {
        let df: f64 = 0.9;
        let projection = project(1.0, df, &growth(0.0, 0.0, 0.0)).unwrap();
        for year in projection.schedule() {
            assert_relative_eq!(year.discount, df.powi(year.year as i32));
        }
    }

    #[test]
    fn test_zero_growth_matches_annuity_closed_form() {
        let fcf = 37.5;
        for df in [0.05_f64, 0.5, 0.9259259259259258, 0.99] {
            let projection = project(fcf, df, &growth(0.0, 0.0, 0.0)).unwrap();
            // sum_{i=1..20} df^i = df (1 - df^20) / (1 - df)
            let closed_form = fcf * df * (1.0 - df.powi(20)) / (1.0 - df);
            assert_relative_eq!(projection.total(), closed_form, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_boundary_carry_without_discounting() {
        let medium = 0.05;
        let projection = project(100.0, 1.0, &growth(0.1, medium, 0.03)).unwrap();

        assert_relative_eq!(projection.cf5(), 161.051, max_relative = 1e-12);
        assert_relative_eq!(projection.cf5(), 100.0 * 1.1_f64.powi(5));

        let year6 = projection.schedule()[5];
        assert_eq!(year6.year, 6);
        assert_relative_eq!(year6.present_value, projection.cf5() * (1.0 + medium));

        assert_relative_eq!(
            projection.cf10(),
            projection.cf5() * (1.0 + medium).powi(5),
            max_relative = 1e-12
        );
        let year11 = projection.schedule()[10];
        assert_relative_eq!(year11.cash_flow, projection.cf10() * 1.03, max_relative = 1e-12);
    }

    #[test]
    fn test_boundary_values_are_not_added() {
        // With df = 1 and zero growth every year contributes exactly the base
        // cash flow; an extra CF5/CF10 term would push the total past 20x.
        let projection = project(10.0, 1.0, &growth(0.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(projection.total(), 200.0);
    }

    #[test]
    fn test_phase_totals_sum_to_total() {
        let projection = project(20.0, 1.0 / 1.08, &growth(0.14, 0.07, 0.04)).unwrap();
        let sum = projection.phase_total(Phase::ShortTerm)
            + projection.phase_total(Phase::MediumTerm)
            + projection.phase_total(Phase::LongTerm);
        assert_relative_eq!(sum, projection.total(), max_relative = 1e-12);

        assert_relative_eq!(
            projection.phase_total(Phase::ShortTerm),
            117.95382859997629,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            projection.phase_total(Phase::MediumTerm),
            127.44509536175401,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            projection.phase_total(Phase::LongTerm),
            204.4734317732582,
            max_relative = 1e-12
        );
        assert_relative_eq!(projection.total(), 449.8723557349885, max_relative = 1e-12);
    }

    #[test]
    fn test_monotonic_in_each_growth_rate() {
        let fcf = 50.0;
        let df = 1.0 / 1.07;
        let base = growth(0.08, 0.05, 0.03);
        let base_total = project(fcf, df, &base).unwrap().total();

        let bumped = [
            growth(0.09, 0.05, 0.03),
            growth(0.08, 0.06, 0.03),
            growth(0.08, 0.05, 0.04),
        ];
        for g in bumped {
            let total = project(fcf, df, &g).unwrap().total();
            assert!(total > base_total, "{g:?} gave {total} <= {base_total}");
        }
    }

    #[test]
    fn test_negative_fcf_propagates() {
        let g = growth(0.1, 0.05, 0.02);
        let positive = project(10.0, 0.9, &g).unwrap().total();
        let negative = project(-10.0, 0.9, &g).unwrap().total();
        assert!(negative < 0.0);
        assert_relative_eq!(negative, -positive);
    }

    #[test]
    fn test_negative_growth_is_allowed() {
        let projection = project(10.0, 1.0, &growth(-0.5, -0.5, -0.5)).unwrap();
        assert!(projection.total() > 0.0);
        assert_relative_eq!(projection.cf5(), 10.0 * 0.5_f64.powi(5));
    }

    #[test]
    fn test_invalid_inputs() {
        let g = growth(0.1, 0.05, 0.02);
        assert!(matches!(
            project(f64::NAN, 0.9, &g),
            Err(TasadorError::InvalidData(_))
        ));
        for df in [0.0, -0.5, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                project(10.0, df, &g),
                Err(TasadorError::Configuration(_))
            ));
        }
        assert!(matches!(
            project(10.0, 0.9, &growth(f64::INFINITY, 0.0, 0.0)),
            Err(TasadorError::Configuration(_))
        ));
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::ShortTerm.label(), "short");
        assert_eq!(Phase::LongTerm.label(), "long");
    }
}
