//! # opensettle-engine
//!
//! The OpenSettle core: sale-record lifecycle, idempotent payment
//! verification against the ledger oracle, and atomic application of
//! economic effects (supply, price, balance, history).
//!
//! ## Architecture
//!
//! Every component reads and writes the shared [`KvStore`] — the single
//! source of truth; nothing caches economic state across calls:
//!
//! 1. **TokenRegistry**: token definitions and their economic state; the
//!    only mutator of supply and price fields
//! 2. **SaleLedger**: sale records; status flips happen via per-key CAS
//! 3. **BalanceStore**: per-(token, account) holdings; atomic
//!    credit/debit primitives
//! 4. **HistoryLog**: append-only per-account event sequences
//! 5. **OrderDesk**: creates Pending sales with the cost locked at the
//!    creation-time price snapshot
//! 6. **SettlementEngine**: the core — verifies payment against the
//!    oracle and applies effects exactly once per sale
//! 7. **Transfers**: peer-to-peer balance movement under the same
//!    atomic-apply discipline
//! 8. **SettleService**: facade wiring the components into the seven
//!    service operations
//!
//! ## Settlement flow
//!
//! ```text
//! OrderDesk.create_sale() → Pending sale
//!     → SettlementEngine.confirm_sale() → LedgerOracle query
//!         → match: token effect → balance credit → sale flip → history
//!         → no match / oracle down: PendingCheck (retry later)
//! ```
//!
//! Two concurrent confirmations of one sale cannot both apply the effect:
//! the whole verify+apply sequence runs under a per-sale mutex, and the
//! sale-status flip is the idempotency commit point.
//!
//! [`KvStore`]: opensettle_store::KvStore

pub mod balances;
pub mod history;
pub mod locks;
pub mod matching;
pub mod order;
pub mod registry;
pub mod sales;
pub mod service;
pub mod settle;
pub mod transfer;

pub use balances::{AccountBalance, BalanceStore};
pub use history::HistoryLog;
pub use locks::KeyedLocks;
pub use order::OrderDesk;
pub use registry::TokenRegistry;
pub use sales::SaleLedger;
pub use service::SettleService;
pub use settle::SettlementEngine;
pub use transfer::Transfers;
