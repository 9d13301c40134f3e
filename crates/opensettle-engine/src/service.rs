//! Service facade: the seven operations an HTTP layer would expose.
//!
//! Framing (routing, status codes, JSON envelopes) lives in a future
//! `opensettle-http` crate; this facade is the interface boundary. Each
//! operation returns a serde-serializable response, and [`SettleError::
//! is_client_error`] classifies failures for an eventual 4xx/5xx split.
//!
//! [`SettleError::is_client_error`]: opensettle_types::SettleError::is_client_error

use std::sync::Arc;

use opensettle_oracle::LedgerOracle;
use opensettle_store::KvStore;
use opensettle_types::{
    AccountId, ConfirmOutcome, HistoryEntry, Result, SaleId, SettleConfig, Token, TokenEconomics,
    TokenId, TxHash,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balances::{AccountBalance, BalanceStore};
use crate::history::HistoryLog;
use crate::order::OrderDesk;
use crate::registry::TokenRegistry;
use crate::sales::SaleLedger;
use crate::settle::SettlementEngine;
use crate::transfer::Transfers;

/// Response of `POST /tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTokenResponse {
    pub id: TokenId,
    pub token: Token,
}

/// Response of `POST /tokens/{id}/buy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleResponse {
    pub sale_id: SaleId,
    /// Locked cost the buyer must pay on the external ledger.
    pub cost: Decimal,
    /// The account the payment must reach (the token owner).
    pub receiver: AccountId,
}

/// Response of `POST /transfer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub ok: bool,
}

/// The assembled engine behind the service surface.
///
/// All components share one [`KvStore`] (the single source of truth) and
/// one [`LedgerOracle`].
pub struct SettleService {
    registry: TokenRegistry,
    orders: OrderDesk,
    engine: SettlementEngine,
    transfers: Transfers,
    balances: BalanceStore,
    history: HistoryLog,
}

impl SettleService {
    #[must_use]
    pub fn new(
        store: Arc<dyn KvStore>,
        oracle: Arc<dyn LedgerOracle>,
        config: SettleConfig,
    ) -> Self {
        let registry = TokenRegistry::new(Arc::clone(&store));
        let sales = SaleLedger::new(Arc::clone(&store));
        let balances = BalanceStore::new(Arc::clone(&store));
        let history = HistoryLog::new(Arc::clone(&store));
        let orders = OrderDesk::new(registry.clone(), sales.clone(), history.clone());
        let engine = SettlementEngine::new(
            registry.clone(),
            sales.clone(),
            balances.clone(),
            history.clone(),
            oracle,
            config.clone(),
        );
        let transfers = Transfers::new(registry.clone(), balances.clone(), history.clone());
        Self {
            registry,
            orders,
            engine,
            transfers,
            balances,
            history,
        }
    }

    /// `GET /tokens` — all tokens, newest first.
    pub fn list_tokens(&self) -> Result<Vec<Token>> {
        self.registry.list()
    }

    /// `POST /tokens` — create a token with validated economics.
    pub fn create_token(
        &self,
        owner: AccountId,
        economics: TokenEconomics,
    ) -> Result<CreateTokenResponse> {
        let token = self.registry.create(owner, economics)?;
        Ok(CreateTokenResponse {
            id: token.id,
            token,
        })
    }

    /// `POST /tokens/{id}/buy` — create a Pending sale with a locked cost.
    pub fn create_sale(
        &self,
        token_id: TokenId,
        buyer: AccountId,
        quantity: Decimal,
    ) -> Result<CreateSaleResponse> {
        let sale = self.orders.create_sale(token_id, buyer, quantity)?;
        Ok(CreateSaleResponse {
            sale_id: sale.id,
            cost: sale.cost,
            receiver: sale.seller,
        })
    }

    /// `POST /sales/{id}/confirm` — verify payment and settle.
    pub async fn confirm_sale(
        &self,
        sale_id: SaleId,
        tx_hash: Option<TxHash>,
    ) -> Result<ConfirmOutcome> {
        self.engine.confirm_sale(sale_id, tx_hash).await
    }

    /// `POST /transfer` — peer-to-peer balance movement.
    pub async fn transfer(
        &self,
        token_id: TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<TransferResponse> {
        self.transfers.transfer(token_id, from, to, amount).await?;
        Ok(TransferResponse { ok: true })
    }

    /// `GET /balances/{addr}` — positive holdings only.
    pub fn balances_for(&self, account: &AccountId) -> Result<Vec<AccountBalance>> {
        self.balances.balances_for(account)
    }

    /// `GET /history/{addr}` — events newest first.
    pub fn history_for(&self, account: &AccountId) -> Result<Vec<HistoryEntry>> {
        self.history.for_account(account)
    }
}
