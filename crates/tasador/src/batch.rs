//! Batch valuation of a universe CSV.
//!
//! Symbols are valued one at a time in file order. A symbol whose fetch or
//! valuation fails gets an `error: <message>` cell instead of a number and
//! the run moves on, unless [`crate::BatchConfig::fail_fast`] is set. The output
//! file is written once, after every row has been valued.

use crate::config::TasadorConfig;
use crate::service::value_symbol_with_timeout;
use crate::universe::{UniverseRow, annotated_table, read_universe, universe_rows, write_universe};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tasador_traits::{Date, FundamentalsProvider, Result, TasadorError, UniverseTable};

/// Result of valuing one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// A per-share fair value.
    Valued(f64),
    /// Shares outstanding unknown; reported as the `0` sentinel.
    Undefined,
    /// Fetch or valuation failed with this message.
    Failed(String),
}

impl RowOutcome {
    /// Text written to the fair value column.
    pub fn cell(&self) -> String {
        match self {
            Self::Valued(value) => value.to_string(),
            Self::Undefined => 0.0_f64.to_string(),
            Self::Failed(message) => format!("error: {message}"),
        }
    }
}

/// Row counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows read.
    pub rows: usize,
    /// Rows with a per-share value.
    pub valued: usize,
    /// Rows with the undefined sentinel.
    pub undefined: usize,
    /// Rows with an error cell.
    pub failed: usize,
}

impl BatchSummary {
    /// Tallies a set of outcomes.
    pub fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                rows: outcomes.len(),
                ..Self::default()
            },
            |mut summary, outcome| {
                match outcome {
                    RowOutcome::Valued(_) => summary.valued += 1,
                    RowOutcome::Undefined => summary.undefined += 1,
                    RowOutcome::Failed(_) => summary.failed += 1,
                }
                summary
            },
        )
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} valued, {} undefined, {} failed",
            self.rows, self.valued, self.undefined, self.failed
        )
    }
}

/// Values every row against `provider`.
///
/// Each row's short-term growth comes from its EPS estimate; the medium and
/// long-term rates follow `config.valuation`.
///
/// # Errors
///
/// Only fails when `config.batch.fail_fast` is set, with the first row's error.
pub async fn value_rows<P>(
    provider: &P,
    rows: &[UniverseRow],
    as_of: Date,
    config: &TasadorConfig,
) -> Result<Vec<RowOutcome>>
where
    P: FundamentalsProvider,
{
    let timeout = config.batch.fetch_timeout_secs.map(Duration::from_secs);
    let mut outcomes = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let growth = config.valuation.growth_for(row.short_term_growth());
        tracing::debug!(
            row = index,
            symbol = %row.symbol,
            short_term = growth.short_term,
            "valuing"
        );

        let result = if row.symbol.is_empty() {
            Err(TasadorError::MissingData(format!("symbol on row {}", index + 1)))
        } else {
            value_symbol_with_timeout(provider, &row.symbol, as_of, growth, timeout).await
        };

        let outcome = match result {
            Ok(valuation) => valuation
                .per_share()
                .map_or(RowOutcome::Undefined, RowOutcome::Valued),
            Err(err) if config.batch.fail_fast => return Err(err),
            Err(err) => {
                tracing::warn!(symbol = %row.symbol, kind = err.kind(), error = %err, "valuation failed");
                RowOutcome::Failed(err.to_string())
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Values a universe table and returns it annotated with fair values.
///
/// # Errors
///
/// Returns an error if required columns are missing, or on the first
/// failing row when `config.batch.fail_fast` is set.
pub async fn value_universe<P>(
    provider: &P,
    table: &UniverseTable,
    as_of: Date,
    config: &TasadorConfig,
) -> Result<(UniverseTable, BatchSummary)>
where
    P: FundamentalsProvider,
{
    let rows = universe_rows(table)?;
    let outcomes = value_rows(provider, &rows, as_of, config).await?;
    let cells: Vec<String> = outcomes.iter().map(RowOutcome::cell).collect();

    let annotated = annotated_table(&rows, &cells)?;
    Ok((annotated, BatchSummary::from_outcomes(&outcomes)))
}

/// Reads `input`, values every symbol and writes `output`.
///
/// The valuation date is `config.batch.as_of`, or today when unset. Nothing is
/// written if the run aborts.
///
/// # Errors
///
/// Returns an error if the input cannot be read or lacks a required column,
/// if the output cannot be written, or on the first failing row when
/// `config.batch.fail_fast` is set.
pub async fn run_batch<P>(
    provider: &P,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &TasadorConfig,
) -> Result<BatchSummary>
where
    P: FundamentalsProvider,
{
    config.validate()?;
    let as_of = config
        .batch
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let table = read_universe(input.as_ref())?;
    tracing::info!(
        input = %input.as_ref().display(),
        rows = table.len(),
        provider = provider.name(),
        %as_of,
        "starting batch"
    );

    let (annotated, summary) = value_universe(provider, &table, as_of, config).await?;
    write_universe(output.as_ref(), annotated)?;

    tracing::info!(
        output = %output.as_ref().display(),
        rows = summary.rows,
        valued = summary.valued,
        undefined = summary.undefined,
        failed = summary.failed,
        "batch complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatchConfig;
    use tasador_traits::{FundamentalsSnapshot, StaticFundamentals};

    fn as_of() -> Date {
        Date::from_ymd_opt(2021, 6, 15).unwrap()
    }

    fn row(symbol: &str, eps: Option<&str>) -> UniverseRow {
        UniverseRow {
            symbol: symbol.to_string(),
            sector: Some("Technology".to_string()),
            eps_next_5y: eps.map(str::to_string),
        }
    }

    fn provider() -> StaticFundamentals {
        StaticFundamentals::new()
            .with_snapshot(
                FundamentalsSnapshot::new("AAPL", as_of())
                    .with_beta(Some(1.2))
                    .with_free_cash_flow(20.0)
                    .with_cash_and_equivalents(50.0)
                    .with_short_term_investments(10.0)
                    .with_total_debt(30.0)
                    .with_shares_outstanding(Some(100.0)),
            )
            .with_snapshot(FundamentalsSnapshot::new("NEWCO", as_of()).with_free_cash_flow(1.0))
    }

    #[test]
    fn test_row_outcome_cells() {
        assert_eq!(RowOutcome::Valued(4.5).cell(), "4.5");
        assert_eq!(RowOutcome::Undefined.cell(), "0");
        assert_eq!(RowOutcome::Failed("boom".to_string()).cell(), "error: boom");
    }

    #[test]
    fn test_summary_counts() {
        let outcomes = [
            RowOutcome::Valued(1.0),
            RowOutcome::Valued(2.0),
            RowOutcome::Undefined,
            RowOutcome::Failed("x".to_string()),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(
            summary,
            BatchSummary {
                rows: 4,
                valued: 2,
                undefined: 1,
                failed: 1
            }
        );
        assert_eq!(summary.to_string(), "4 rows: 2 valued, 1 undefined, 1 failed");
    }

    #[tokio::test]
    async fn test_value_rows_isolates_failures() {
        let rows = vec![
            row("AAPL", Some("0.14")),
            row("ZZZZ", Some("0.10")),
            row("NEWCO", None),
            row("", Some("0.10")),
        ];

        let outcomes = value_rows(&provider(), &rows, as_of(), &TasadorConfig::default())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 4);
        assert!(matches!(outcomes[0], RowOutcome::Valued(v) if (v - 4.798723557349885).abs() < 1e-12));
        assert!(matches!(outcomes[1], RowOutcome::Failed(ref m) if m.contains("ZZZZ")));
        assert_eq!(outcomes[2], RowOutcome::Undefined);
        assert!(matches!(outcomes[3], RowOutcome::Failed(ref m) if m.contains("row 4")));
    }

    #[tokio::test]
    async fn test_value_rows_fail_fast() {
        let rows = vec![row("ZZZZ", None), row("AAPL", Some("0.14"))];
        let config = TasadorConfig {
            batch: BatchConfig {
                fail_fast: true,
                ..BatchConfig::default()
            },
            ..TasadorConfig::default()
        };

        let err = value_rows(&provider(), &rows, as_of(), &config).await.unwrap_err();
        assert!(matches!(err, TasadorError::DataSource(_)));
    }

    #[tokio::test]
    async fn test_value_rows_uses_valuation_growth_defaults() {
        let rows = vec![row("AAPL", Some("0.14"))];
        let mut config = TasadorConfig::default();
        let default = value_rows(&provider(), &rows, as_of(), &config).await.unwrap();

        config.valuation.default_long_term = 0.0;
        let flat_tail = value_rows(&provider(), &rows, as_of(), &config).await.unwrap();

        let (RowOutcome::Valued(default), RowOutcome::Valued(flat_tail)) =
            (&default[0], &flat_tail[0])
        else {
            panic!("expected valued rows, got {default:?} and {flat_tail:?}");
        };
        assert!((default - 4.798723557349885).abs() < 1e-12);
        assert!(flat_tail < default);
    }
}
