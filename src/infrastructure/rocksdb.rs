use crate::domain::account::Account;
use crate::domain::payment::Payment;
use crate::domain::ports::{AccountStore, ChangeSet, PaymentStore, Store};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing payment records.
pub const CF_PAYMENTS: &str = "payments";

/// A persistent store implementation using RocksDB.
///
/// Accounts and payments live in separate Column Families, keyed by their
/// string identifier and encoded as JSON. [`Store::commit`] goes through a
/// `WriteBatch`, which RocksDB applies atomically.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("accounts" and "payments") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts, cf_payments])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(format!(
                "Column family {name} not found"
            ))))
        })
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        self.db.put_cf(cf, key.as_bytes(), serde_json::to_vec(value)?)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_pinned_cf(cf, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn store_account(&self, account: Account) -> Result<()> {
        self.put(CF_ACCOUNTS, &account.id, &account)
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        self.get(CF_ACCOUNTS, id)
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn store_payment(&self, payment: Payment) -> Result<()> {
        self.put(CF_PAYMENTS, &payment.id, &payment)
    }

    async fn get_payment(&self, id: &str) -> Result<Option<Payment>> {
        self.get(CF_PAYMENTS, id)
    }
}

#[async_trait]
impl Store for RocksDBStore {
    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let accounts = self.cf(CF_ACCOUNTS)?;
        let payments = self.cf(CF_PAYMENTS)?;

        // Encode everything first so a serialization failure writes nothing.
        let mut batch = WriteBatch::default();
        for account in &changes.accounts {
            batch.put_cf(accounts, account.id.as_bytes(), serde_json::to_vec(account)?);
        }
        for payment in &changes.payments {
            batch.put_cf(payments, payment.id.as_bytes(), serde_json::to_vec(payment)?);
        }

        self.db.write(batch)?;
        Ok(())
    }
}
