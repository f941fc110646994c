//! CLI subcommand modules.
//!
//! This module contains the implementations for all tasador CLI subcommands.

pub(crate) mod batch;
pub(crate) mod value;
pub(crate) mod wacc;
