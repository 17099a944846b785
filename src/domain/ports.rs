use super::account::Account;
use super::payment::Payment;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn store_account(&self, account: Account) -> Result<()>;
    async fn get_account(&self, id: &str) -> Result<Option<Account>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store_payment(&self, payment: Payment) -> Result<()>;
    async fn get_payment(&self, id: &str) -> Result<Option<Payment>>;
}

/// A persistence backend for both entity kinds that can write several
/// records as one atomic unit.
#[async_trait]
pub trait Store: AccountStore + PaymentStore {
    /// Persists every record in `changes`, or none of them.
    async fn commit(&self, changes: ChangeSet) -> Result<()>;
}

pub type StoreRef = Arc<dyn Store>;

/// Records written together by one request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChangeSet {
    pub accounts: Vec<Account>,
    pub payments: Vec<Payment>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn put_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.payments.is_empty()
    }
}
