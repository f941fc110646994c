//! Universe CSV input and output.
//!
//! The input table lists one symbol per row with its sector and the
//! analysts' five-year EPS growth estimate. The output repeats those three
//! columns and appends the fair value.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tasador_traits::{Result, Symbol, UniverseTable};

/// Ticker column.
pub const SYMBOL_COLUMN: &str = "Symbol";
/// Sector column, passed through untouched.
pub const SECTOR_COLUMN: &str = "Sector";
/// Five-year EPS growth estimate, used as the short-term growth rate.
pub const EPS_NEXT_5Y_COLUMN: &str = "EPS Next 5Y";
/// Appended fair value column.
pub const FAIR_VALUE_COLUMN: &str = "Fair Value";

/// Columns the input table must have.
pub const REQUIRED_COLUMNS: [&str; 3] = [SYMBOL_COLUMN, SECTOR_COLUMN, EPS_NEXT_5Y_COLUMN];

/// One input row, with cells kept as the raw text read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseRow {
    /// Ticker; empty when the cell was blank.
    pub symbol: Symbol,
    /// Sector text.
    pub sector: Option<String>,
    /// Raw EPS growth estimate text.
    pub eps_next_5y: Option<String>,
}

impl UniverseRow {
    /// Short-term growth rate parsed from the EPS estimate.
    pub fn short_term_growth(&self) -> f64 {
        parse_growth_rate(self.eps_next_5y.as_deref())
    }
}

/// Parses a growth estimate cell as a decimal rate.
///
/// Empty, non-numeric and non-finite cells give `0.0`.
///
/// ```
/// use tasador::universe::parse_growth_rate;
///
/// assert_eq!(parse_growth_rate(Some("0.14")), 0.14);
/// assert_eq!(parse_growth_rate(Some("-")), 0.0);
/// assert_eq!(parse_growth_rate(None), 0.0);
/// ```
pub fn parse_growth_rate(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|rate| rate.is_finite())
        .unwrap_or(0.0)
}

/// Reads a universe CSV with every column as text.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a required
/// column is missing ([`tasador_traits::TasadorError::MissingColumn`]).
pub fn read_universe(path: impl AsRef<Path>) -> Result<UniverseTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    let table = UniverseTable::new(df);
    table.require_columns(&REQUIRED_COLUMNS)?;
    Ok(table)
}

/// Extracts the rows of a universe table in file order.
///
/// # Errors
///
/// Returns an error if a required column is missing.
pub fn universe_rows(table: &UniverseTable) -> Result<Vec<UniverseRow>> {
    table.require_columns(&REQUIRED_COLUMNS)?;
    let symbols = table.string_column(SYMBOL_COLUMN)?;
    let sectors = table.string_column(SECTOR_COLUMN)?;
    let eps = table.string_column(EPS_NEXT_5Y_COLUMN)?;

    let rows = symbols
        .into_iter()
        .zip(sectors)
        .zip(eps)
        .map(|((symbol, sector), eps_next_5y)| UniverseRow {
            symbol: symbol.map(|s| s.trim().to_string()).unwrap_or_default(),
            sector,
            eps_next_5y,
        })
        .collect();
    Ok(rows)
}

/// Builds the output table: the input columns plus the fair value column.
///
/// # Errors
///
/// Returns an error if `rows` and `fair_values` differ in length.
pub fn annotated_table(rows: &[UniverseRow], fair_values: &[String]) -> Result<UniverseTable> {
    let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
    let sectors: Vec<Option<&str>> = rows.iter().map(|r| r.sector.as_deref()).collect();
    let eps: Vec<Option<&str>> = rows.iter().map(|r| r.eps_next_5y.as_deref()).collect();
    let fair: Vec<&str> = fair_values.iter().map(String::as_str).collect();

    let df = df! {
        SYMBOL_COLUMN => symbols,
        SECTOR_COLUMN => sectors,
        EPS_NEXT_5Y_COLUMN => eps,
        FAIR_VALUE_COLUMN => fair,
    }?;
    Ok(UniverseTable::new(df))
}

/// Writes a table to CSV with a header row.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_universe(path: impl AsRef<Path>, table: UniverseTable) -> Result<()> {
    let mut df = table.into_inner();
    let mut file = File::create(path.as_ref())?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}
