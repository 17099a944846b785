#![allow(dead_code)]

use payment_network::application::dto::{AuthorizationRequest, SuccessiveRequest};
use payment_network::application::engine::PaymentEngine;
use payment_network::domain::account::{Account, Amount, CardCredentials};
use payment_network::domain::ids::RandomIdGenerator;
use payment_network::infrastructure::in_memory::InMemoryStore;
use rust_decimal::Decimal;
use std::sync::Arc;

/// An engine over a fresh in-memory store with one merchant and one funded
/// cardholder.
pub struct Network {
    pub engine: PaymentEngine,
    pub merchant: Account,
    pub card: Account,
}

impl Network {
    pub async fn with_funds(funds: Decimal) -> Self {
        let engine = PaymentEngine::new(Arc::new(InMemoryStore::new()), Arc::new(RandomIdGenerator));
        let merchant = engine.ledger().create_account().await.unwrap();
        let card = engine.ledger().create_account().await.unwrap();
        engine.ledger().deposit(&card.id, funds).await.unwrap();
        Self {
            engine,
            merchant,
            card,
        }
    }

    pub fn authorization(&self, amount: Decimal, order_id: &str) -> AuthorizationRequest {
        AuthorizationRequest {
            merchant_id: self.merchant.id.clone(),
            card: CardCredentials {
                card_number: self.card.card_number.clone(),
                security_code: self.card.card_security_code.clone(),
                expiry_month: self.card.card_expiry_month,
                expiry_year: self.card.card_expiry_year,
            },
            amount: Amount::new(amount).unwrap(),
            order_id: order_id.to_string(),
        }
    }

    pub fn successive(&self, reference_id: &str, amount: Decimal) -> SuccessiveRequest {
        SuccessiveRequest {
            merchant_id: self.merchant.id.clone(),
            reference_id: reference_id.to_string(),
            amount: Amount::new(amount).unwrap(),
        }
    }

    /// (available, blocked) of an account.
    pub async fn balances(&self, account_id: &str) -> (Decimal, Decimal) {
        let account = self
            .engine
            .ledger()
            .get_account(account_id)
            .await
            .unwrap()
            .unwrap();
        assert!(account.available.value() >= Decimal::ZERO);
        assert!(account.blocked.value() >= Decimal::ZERO);
        (account.available.value(), account.blocked.value())
    }
}
