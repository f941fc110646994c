#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tasador/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and contracts for the Tasador valuation toolkit.
//!
//! This crate provides the foundational abstractions shared by the valuation
//! model, the data adapters and the batch driver: the point-in-time
//! fundamentals snapshot, growth assumptions, the fundamentals provider
//! contract and the beta-to-WACC lookup.

/// The version of the tasador-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod provider;
pub mod types;
pub mod wacc;

// Re-exports
pub use error::{Result, TasadorError};
pub use provider::{FundamentalsProvider, StaticFundamentals};
pub use types::{Date, FundamentalsSnapshot, GrowthAssumptions, Symbol, UniverseTable};
pub use wacc::{WaccBucket, WaccLookup, WaccTable};
