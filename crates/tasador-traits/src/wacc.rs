//! Beta-bucketed WACC lookup.
//!
//! The weighted average cost of capital used to discount projected cash flows
//! is looked up from the stock's beta through a bucket table. The bucket
//! boundaries are a policy of the data collaborator rather than part of the
//! valuation algorithm, so the table is configurable and serializable.

use crate::{Result, TasadorError};
use serde::{Deserialize, Serialize};

/// Maps a beta to a weighted average cost of capital.
pub trait WaccLookup {
    /// Returns the WACC (decimal) for the given beta.
    fn lookup_wacc_by_beta(&self, beta: f64) -> f64;
}

impl<F> WaccLookup for F
where
    F: Fn(f64) -> f64,
{
    fn lookup_wacc_by_beta(&self, beta: f64) -> f64 {
        self(beta)
    }
}

/// One bucket of the table: betas strictly below `upper_beta` use `wacc`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaccBucket {
    /// Exclusive upper bound of the bucket.
    pub upper_beta: f64,
    /// WACC applied to betas in the bucket.
    pub wacc: f64,
}

/// Ordered bucket table with a catch-all rate for the highest betas.
///
/// # Example
///
/// ```
/// use tasador_traits::{WaccLookup, WaccTable};
///
/// let table = WaccTable::default();
/// assert_eq!(table.lookup_wacc_by_beta(0.0), 0.05);
/// assert_eq!(table.lookup_wacc_by_beta(1.2), 0.08);
/// assert_eq!(table.lookup_wacc_by_beta(2.5), 0.09);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaccTable {
    buckets: Vec<WaccBucket>,
    above: f64,
}

impl WaccTable {
    /// Creates a table from buckets sorted by ascending `upper_beta`.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::Configuration`] if a bucket bound is not finite,
    /// the buckets are not strictly ascending, or any rate is non-finite or at
    /// or below -100%.
    pub fn new(buckets: Vec<WaccBucket>, above: f64) -> Result<Self> {
        let table = Self { buckets, above };
        table.validate()?;
        Ok(table)
    }

    /// Checks ordering and rate sanity.
    ///
    /// Tables deserialized from configuration bypass [`WaccTable::new`], so
    /// callers loading them should validate explicitly.
    ///
    /// # Errors
    ///
    /// See [`WaccTable::new`].
    pub fn validate(&self) -> Result<()> {
        if let Some(bucket) = self.buckets.iter().find(|b| !b.upper_beta.is_finite()) {
            return Err(TasadorError::Configuration(format!(
                "WACC bucket bound must be finite, got {}",
                bucket.upper_beta
            )));
        }
        for pair in self.buckets.windows(2) {
            if pair[0].upper_beta >= pair[1].upper_beta {
                return Err(TasadorError::Configuration(format!(
                    "WACC buckets must be strictly ascending: {} then {}",
                    pair[0].upper_beta, pair[1].upper_beta
                )));
            }
        }

        let rates = self.buckets.iter().map(|b| b.wacc).chain([self.above]);
        for wacc in rates {
            if !wacc.is_finite() || wacc <= -1.0 {
                return Err(TasadorError::Configuration(format!(
                    "WACC must be finite and above -100%, got {wacc}"
                )));
            }
        }
        Ok(())
    }

    /// The bucket boundaries, lowest first.
    pub fn buckets(&self) -> &[WaccBucket] {
        &self.buckets
    }

    /// Rate for betas at or above the last bucket boundary.
    pub const fn above(&self) -> f64 {
        self.above
    }
}

impl Default for WaccTable {
    fn default() -> Self {
        let bucket = |upper_beta, wacc| WaccBucket { upper_beta, wacc };
        Self {
            buckets: vec![
                bucket(0.80, 0.050),
                bucket(1.00, 0.060),
                bucket(1.10, 0.065),
                bucket(1.20, 0.070),
                bucket(1.30, 0.080),
                bucket(1.50, 0.085),
            ],
            above: 0.090,
        }
    }
}

impl WaccLookup for WaccTable {
    fn lookup_wacc_by_beta(&self, beta: f64) -> f64 {
        self.buckets
            .iter()
            .find(|b| beta < b.upper_beta)
            .map_or(self.above, |b| b.wacc)
    }
}
