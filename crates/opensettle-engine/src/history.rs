//! Append-only per-account history log.
//!
//! One storage record per account holds its event sequence; appends run
//! inside the store's per-key closure so concurrent writers cannot drop
//! each other's entries. Entries are never mutated after append.

use std::sync::Arc;

use opensettle_store::{KvStore, KvStoreExt};
use opensettle_types::{AccountId, HistoryEntry, Result};

fn history_key(account: &AccountId) -> String {
    format!("history/{}", account.normalized())
}

/// Append-only history of economic events, one stream per account.
#[derive(Clone)]
pub struct HistoryLog {
    store: Arc<dyn KvStore>,
}

impl HistoryLog {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Append one entry to `account`'s stream.
    pub fn append(&self, account: &AccountId, entry: HistoryEntry) -> Result<()> {
        self.store
            .update_record::<Vec<HistoryEntry>, _>(&history_key(account), |current| {
                let mut entries = current.unwrap_or_default();
                entries.push(entry.clone());
                Ok(Some(entries))
            })?;
        Ok(())
    }

    /// All entries for an account, newest first (event ids are UUIDv7,
    /// so they order by creation).
    pub fn for_account(&self, account: &AccountId) -> Result<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = self
            .store
            .get_record(&history_key(account))?
            .unwrap_or_default();
        entries.sort_by(|a, b| b.event_id.cmp(&a.event_id));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensettle_store::MemoryStore;
    use opensettle_types::{HistoryKind, TokenId};
    use rust_decimal::Decimal;

    fn log() -> HistoryLog {
        HistoryLog::new(Arc::new(MemoryStore::new()))
    }

    fn entry(kind: HistoryKind) -> HistoryEntry {
        HistoryEntry::new(
            kind,
            TokenId::new(),
            AccountId::new("GOTHER"),
            Decimal::ONE,
        )
    }

    #[test]
    fn empty_account_has_no_history() {
        assert!(
            log()
                .for_account(&AccountId::new("GNOBODY"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn append_and_read_newest_first() {
        let log = log();
        let acct = AccountId::new("GBUYER");
        let first = entry(HistoryKind::SalePending);
        let second = entry(HistoryKind::SaleConfirmed);
        log.append(&acct, first.clone()).unwrap();
        log.append(&acct, second.clone()).unwrap();

        let entries = log.for_account(&acct).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_id, second.event_id);
        assert_eq!(entries[1].event_id, first.event_id);
    }

    #[test]
    fn streams_are_per_account() {
        let log = log();
        log.append(&AccountId::new("GA"), entry(HistoryKind::TransferOut))
            .unwrap();
        log.append(&AccountId::new("GB"), entry(HistoryKind::TransferIn))
            .unwrap();

        assert_eq!(log.for_account(&AccountId::new("GA")).unwrap().len(), 1);
        assert_eq!(log.for_account(&AccountId::new("GB")).unwrap().len(), 1);
    }

    #[test]
    fn address_encodings_share_a_stream() {
        let log = log();
        log.append(&AccountId::new("G-Buyer"), entry(HistoryKind::SalePending))
            .unwrap();
        assert_eq!(log.for_account(&AccountId::new("gbuyer")).unwrap().len(), 1);
    }
}
