//! Sale ledger: persisted sale records and their status flips.
//!
//! A sale is inserted once by the order desk; after that, only the
//! settlement engine touches `status`, `tx_hash`, and `confirmed_at`. The
//! flip to Confirmed runs as a compare-and-set inside the store's per-key
//! closure: even if a caller bypassed the engine's per-sale lock, a second
//! flip of the same sale fails at the storage layer.

use std::sync::Arc;

use chrono::Utc;
use opensettle_store::{KvStore, KvStoreExt};
use opensettle_types::{Result, Sale, SaleId, SaleStatus, SettleError, TxHash};

fn sale_key(id: SaleId) -> String {
    format!("sales/{id}")
}

/// Persisted sale records.
#[derive(Clone)]
pub struct SaleLedger {
    store: Arc<dyn KvStore>,
}

impl SaleLedger {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Persist a freshly created sale.
    pub fn insert(&self, sale: &Sale) -> Result<()> {
        self.store.put_record(&sale_key(sale.id), sale)
    }

    /// Fetch a sale.
    ///
    /// # Errors
    /// Returns [`SettleError::SaleNotFound`] if absent.
    pub fn get(&self, id: SaleId) -> Result<Sale> {
        self.store
            .get_record(&sale_key(id))?
            .ok_or(SettleError::SaleNotFound(id))
    }

    /// Park a sale in `PendingCheck` after an inconclusive verification.
    /// Parking an already-parked sale is a no-op; a Confirmed sale is
    /// left untouched.
    pub fn park_pending_check(&self, id: SaleId) -> Result<Sale> {
        let updated = self
            .store
            .update_record::<Sale, _>(&sale_key(id), |current| {
                let mut sale = current.ok_or(SettleError::SaleNotFound(id))?;
                if sale.status == SaleStatus::Pending {
                    sale.status = SaleStatus::PendingCheck;
                }
                Ok(Some(sale))
            })?;
        updated.ok_or(SettleError::SaleNotFound(id))
    }

    /// Compare-and-set flip to Confirmed, stamping `confirmed_at` and the
    /// matched transaction hash. This is the idempotency commit point of
    /// the settlement sequence.
    ///
    /// # Errors
    /// Returns [`SettleError::SaleAlreadyConfirmed`] if the sale is
    /// already terminal.
    pub fn confirm(&self, id: SaleId, tx_hash: TxHash) -> Result<Sale> {
        let updated = self
            .store
            .update_record::<Sale, _>(&sale_key(id), |current| {
                let mut sale = current.ok_or(SettleError::SaleNotFound(id))?;
                if !sale.status.is_confirmable() {
                    return Err(SettleError::SaleAlreadyConfirmed(id));
                }
                sale.status = SaleStatus::Confirmed;
                sale.tx_hash = Some(tx_hash.clone());
                sale.confirmed_at = Some(Utc::now());
                Ok(Some(sale))
            })?;
        updated.ok_or(SettleError::SaleNotFound(id))
    }
}
