use payment_network::domain::account::{Account, Amount, Balance, CardCredentials};
use payment_network::domain::payment::Payment;
use payment_network::domain::ports::{AccountStore, ChangeSet, PaymentStore, Store, StoreRef};
use payment_network::domain::status::StatusCode;
use payment_network::infrastructure::in_memory::InMemoryStore;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn account(number: &str) -> Account {
    Account::new(CardCredentials {
        card_number: number.to_string(),
        security_code: "999".to_string(),
        expiry_month: 12,
        expiry_year: 2031,
    })
}

#[tokio::test]
async fn test_store_as_shared_trait_object() {
    let store: StoreRef = Arc::new(InMemoryStore::new());

    let mut card = account("1");
    card.available = Balance::new(dec!(100.0));
    let payment = Payment::authorization(
        "p-1".to_string(),
        "2",
        "1",
        "O1",
        Amount::new(dec!(10)).unwrap(),
        StatusCode::Approved,
    );

    // Verify Send + Sync by spawning tasks
    let writer = store.clone();
    let account_handle = tokio::spawn(async move {
        writer.store_account(card).await.unwrap();
        writer.get_account("1").await.unwrap().unwrap()
    });

    let writer = store.clone();
    let payment_handle = tokio::spawn(async move {
        writer.store_payment(payment).await.unwrap();
        writer.get_payment("p-1").await.unwrap().unwrap()
    });

    let retrieved_account = account_handle.await.unwrap();
    assert_eq!(retrieved_account.available, Balance::new(dec!(100.0)));

    let retrieved_payment = payment_handle.await.unwrap();
    assert_eq!(retrieved_payment.order_id, "O1");
}

#[tokio::test]
async fn test_commit_is_visible_all_at_once() {
    let store: StoreRef = Arc::new(InMemoryStore::new());
    let changes = ChangeSet::new().put_account(account("1")).put_account(account("2"));
    assert!(!changes.is_empty());

    store.commit(changes).await.unwrap();
    assert!(store.get_account("1").await.unwrap().is_some());
    assert!(store.get_account("2").await.unwrap().is_some());
}
