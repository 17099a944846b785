use super::dto::{AccountResponse, AccountStatement};
use super::locks::{LockKey, LockTable};
use crate::domain::account::{Account, Amount};
use crate::domain::ids::IdGenerator;
use crate::domain::ports::{AccountStore, PaymentStore, StoreRef};
use crate::domain::status::StatusCode;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Gives up issuing a card number after this many collisions in a row.
const MAX_ISSUE_ATTEMPTS: usize = 8;

/// Owns account creation and single-account balance updates.
///
/// Shares its [`LockTable`] with the payment engine so that a deposit and an
/// authorization on the same account serialize.
#[derive(Clone)]
pub struct AccountLedger {
    store: StoreRef,
    ids: Arc<dyn IdGenerator>,
    locks: LockTable,
}

impl AccountLedger {
    pub fn new(store: StoreRef, ids: Arc<dyn IdGenerator>, locks: LockTable) -> Self {
        Self { store, ids, locks }
    }

    pub(crate) fn store(&self) -> &StoreRef {
        &self.store
    }

    pub(crate) fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    pub(crate) fn locks(&self) -> &LockTable {
        &self.locks
    }

    /// Opens an account with fresh card credentials and zero balances.
    pub async fn create_account(&self) -> Result<Account> {
        for _ in 0..MAX_ISSUE_ATTEMPTS {
            let account = Account::new(self.ids.card());
            let _locks = self.locks.acquire([LockKey::account(&account.id)]).await;
            if self.store.get_account(&account.id).await?.is_some() {
                debug!(account = %account.id, "card number already issued, retrying");
                continue;
            }
            self.store.store_account(account.clone()).await?;
            info!(account = %account.id, "account created");
            return Ok(account);
        }
        Err(PaymentError::InternalError(
            "could not issue an unused card number".into(),
        ))
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        if account_id.is_empty() {
            return Ok(None);
        }
        self.store.get_account(account_id).await
    }

    /// Credits `amount` to the available balance.
    ///
    /// Unknown accounts are declined with `14`; non-positive amounts are
    /// malformed input.
    pub async fn deposit(&self, account_id: &str, amount: Decimal) -> Result<AccountResponse> {
        let amount = Amount::new(amount)?;
        if account_id.is_empty() {
            return Ok(AccountResponse::new(account_id, StatusCode::InvalidCardNumber));
        }

        let updated = self
            .update(account_id, |account| account.deposit(amount))
            .await?;
        let status = match updated {
            Some(account) => {
                info!(account = %account.id, amount = %amount.value(), "deposit applied");
                StatusCode::Approved
            }
            None => StatusCode::InvalidCardNumber,
        };
        Ok(AccountResponse::new(account_id, status))
    }

    /// Applies both deltas to one account atomically.
    pub async fn adjust_balances(
        &self,
        account_id: &str,
        available_delta: Decimal,
        blocked_delta: Decimal,
    ) -> Result<Account> {
        self.update(account_id, |account| {
            account.adjust_balances(available_delta, blocked_delta)
        })
        .await?
        .ok_or_else(|| PaymentError::AccountNotFound(account_id.to_string()))
    }

    pub async fn append_statement(&self, account_id: &str, payment_id: &str) -> Result<Account> {
        self.update(account_id, |account| {
            account.append_statement(payment_id);
            Ok(())
        })
        .await?
        .ok_or_else(|| PaymentError::AccountNotFound(account_id.to_string()))
    }

    /// Resolves every payment on the account's statement, in order.
    pub async fn statement(&self, account_id: &str) -> Result<AccountStatement> {
        let account = self
            .get_account(account_id)
            .await?
            .ok_or_else(|| PaymentError::AccountNotFound(account_id.to_string()))?;

        let mut statement = Vec::with_capacity(account.statement.len());
        for payment_id in &account.statement {
            let payment = self
                .store
                .get_payment(payment_id)
                .await?
                .ok_or_else(|| PaymentError::PaymentNotFound(payment_id.clone()))?;
            statement.push(payment);
        }
        Ok(AccountStatement { statement })
    }

    /// Read-modify-write of one account under its lock. Nothing is written
    /// if `f` fails. Returns `None` when the account does not exist.
    async fn update<F>(&self, account_id: &str, f: F) -> Result<Option<Account>>
    where
        F: FnOnce(&mut Account) -> Result<()> + Send,
    {
        let _locks = self.locks.acquire([LockKey::account(account_id)]).await;
        let Some(mut account) = self.store.get_account(account_id).await? else {
            return Ok(None);
        };
        f(&mut account)?;
        self.store.store_account(account.clone()).await?;
        Ok(Some(account))
    }
}
