//! HTTP-backed ledger oracle client.
//!
//! Speaks a minimal JSON API against a ledger indexer:
//!
//! - `GET {base}/transactions/{hash}` → one wire transaction, 404 when the
//!   ledger does not know the hash
//! - `GET {base}/accounts/{addr}/transactions?window_secs=..&limit=..` →
//!   array of wire transactions, oracle-defined order
//!
//! Every request carries a hard timeout; timeouts and transport errors map
//! to [`SettleError::OracleUnavailable`] so the engine can degrade to
//! `PendingCheck` instead of failing the caller.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opensettle_types::{AccountId, LedgerTx, Result, SettleError, TxHash};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::amount::normalize_amount;
use crate::oracle::LedgerOracle;

/// Transaction shape on the indexer wire. Amounts may be smallest-unit
/// encoded; [`WireTx::into_ledger_tx`] rescales them.
#[derive(Debug, Deserialize)]
struct WireTx {
    hash: String,
    amount: Decimal,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

impl WireTx {
    fn into_ledger_tx(self) -> LedgerTx {
        LedgerTx {
            hash: TxHash::new(self.hash),
            amount: normalize_amount(self.amount),
            sender: self.sender.map(AccountId::new),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// Ledger oracle speaking JSON over HTTP to an indexer endpoint.
pub struct HttpLedgerOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLedgerOracle {
    /// Build a client for `base_url` with a hard per-request timeout.
    ///
    /// # Errors
    /// Returns [`SettleError::OracleUnavailable`] if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| SettleError::OracleUnavailable {
                reason: format!("client build failed: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn unavailable(context: &str, err: &reqwest::Error) -> SettleError {
        SettleError::OracleUnavailable {
            reason: format!("{context}: {err}"),
        }
    }
}

#[async_trait]
impl LedgerOracle for HttpLedgerOracle {
    async fn transaction_by_hash(&self, hash: &TxHash) -> Result<Option<LedgerTx>> {
        let url = format!("{}/transactions/{}", self.base_url, hash);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::unavailable("tx fetch", &e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(%hash, "ledger does not know transaction");
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| Self::unavailable("tx fetch status", &e))?;

        let wire: WireTx = response
            .json()
            .await
            .map_err(|e| Self::unavailable("tx decode", &e))?;
        Ok(Some(wire.into_ledger_tx()))
    }

    async fn recent_transactions(
        &self,
        account: &AccountId,
        window_secs: u64,
        limit: usize,
    ) -> Result<Vec<LedgerTx>> {
        let url = format!(
            "{}/accounts/{}/transactions?window_secs={window_secs}&limit={limit}",
            self.base_url, account
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::unavailable("recent scan", &e))?
            .error_for_status()
            .map_err(|e| Self::unavailable("recent scan status", &e))?;

        let wire: Vec<WireTx> = response
            .json()
            .await
            .map_err(|e| Self::unavailable("recent decode", &e))?;
        tracing::debug!(%account, count = wire.len(), "recent transactions fetched");
        Ok(wire.into_iter().map(WireTx::into_ledger_tx).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_stripped() {
        let oracle = HttpLedgerOracle::new("http://indexer.local/", 1000).unwrap();
        assert_eq!(oracle.base_url, "http://indexer.local");
    }

    #[test]
    fn wire_tx_rescales_and_defaults() {
        let wire: WireTx = serde_json::from_str(
            r#"{"hash": "abc", "amount": "200000000"}"#,
        )
        .unwrap();
        let tx = wire.into_ledger_tx();
        assert_eq!(tx.amount, Decimal::new(20, 0));
        assert!(tx.sender.is_none());
    }

    #[test]
    fn wire_tx_keeps_attributed_sender() {
        let wire: WireTx = serde_json::from_str(
            r#"{"hash": "abc", "amount": "20", "sender": "GBUYER", "timestamp": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let tx = wire.into_ledger_tx();
        assert_eq!(tx.sender, Some(AccountId::new("GBUYER")));
        assert_eq!(tx.amount, Decimal::new(20, 0));
    }
}
