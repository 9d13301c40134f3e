//! # opensettle-types
//!
//! Shared types, errors, and configuration for the **OpenSettle**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`TokenId`], [`SaleId`], [`EventId`], [`AccountId`], [`TxHash`]
//! - **Token model**: [`Token`], [`TokenEconomics`]
//! - **Sale model**: [`Sale`], [`SaleStatus`], [`ConfirmOutcome`]
//! - **History model**: [`HistoryEntry`], [`HistoryKind`]
//! - **Ledger facts**: [`LedgerTx`]
//! - **Configuration**: [`SettleConfig`]
//! - **Errors**: [`SettleError`] with `ST_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod ids;
pub mod ledger_tx;
pub mod sale;
pub mod token;

// Re-export all primary types at crate root for ergonomic imports:
//   use opensettle_types::{Token, Sale, SaleStatus, SettleError, ...};

pub use config::*;
pub use error::*;
pub use history::*;
pub use ids::*;
pub use ledger_tx::*;
pub use sale::*;
pub use token::*;

// Constants are accessed via `opensettle_types::constants::FOO`
// (not re-exported to avoid name collisions).
