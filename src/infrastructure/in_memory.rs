use crate::domain::account::Account;
use crate::domain::payment::Payment;
use crate::domain::ports::{AccountStore, ChangeSet, PaymentStore, Store};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    payments: HashMap<String, Payment>,
}

/// A thread-safe in-memory store for accounts and payments.
///
/// Both tables sit behind one `RwLock`, so a [`ChangeSet`] is applied under a
/// single write guard and readers never observe half of it.
/// Ideal for testing or for one-shot runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn store_account(&self, account: Account) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(id).cloned())
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn store_payment(&self, payment: Payment) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.payments.insert(payment.id.clone(), payment);
        Ok(())
    }

    async fn get_payment(&self, id: &str) -> Result<Option<Payment>> {
        let tables = self.tables.read().await;
        Ok(tables.payments.get(id).cloned())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut tables = self.tables.write().await;
        for account in changes.accounts {
            tables.accounts.insert(account.id.clone(), account);
        }
        for payment in changes.payments {
            tables.payments.insert(payment.id.clone(), payment);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Amount, Balance, CardCredentials};
    use crate::domain::status::StatusCode;
    use rust_decimal_macros::dec;

    fn account(number: &str) -> Account {
        Account::new(CardCredentials {
            card_number: number.to_string(),
            security_code: "111".to_string(),
            expiry_month: 1,
            expiry_year: 2030,
        })
    }

    #[tokio::test]
    async fn test_in_memory_account_store() {
        let store = InMemoryStore::new();
        let mut account = account("1");
        account.available = Balance::new(dec!(100.0));

        store.store_account(account.clone()).await.unwrap();
        let retrieved = store.get_account("1").await.unwrap().unwrap();
        assert_eq!(retrieved, account);

        assert!(store.get_account("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_payment_store() {
        let store = InMemoryStore::new();
        let payment = Payment::authorization(
            "p-1".to_string(),
            "m",
            "1",
            "O1",
            Amount::new(dec!(5)).unwrap(),
            StatusCode::Approved,
        );

        store.store_payment(payment.clone()).await.unwrap();
        let retrieved = store.get_payment("p-1").await.unwrap().unwrap();
        assert_eq!(retrieved, payment);
        assert!(store.get_payment("p-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_writes_every_record() {
        let store = InMemoryStore::new();
        let changes = ChangeSet::new()
            .put_account(account("1"))
            .put_account(account("2"))
            .put_payment(Payment::authorization(
                "p-1".to_string(),
                "2",
                "1",
                "O1",
                Amount::new(dec!(5)).unwrap(),
                StatusCode::Approved,
            ));

        store.commit(changes).await.unwrap();

        assert!(store.get_account("1").await.unwrap().is_some());
        assert!(store.get_account("2").await.unwrap().is_some());
        assert!(store.get_payment("p-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_commit_is_a_no_op() {
        let store = InMemoryStore::new();
        store.commit(ChangeSet::new()).await.unwrap();
        assert!(store.get_account("1").await.unwrap().is_none());
    }
}
