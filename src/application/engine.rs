use super::dto::{AuthorizationRequest, PaymentResponse, SuccessiveRequest};
use super::ledger::AccountLedger;
use super::locks::{LockKey, LockTable};
use super::validation;
use crate::domain::account::Account;
use crate::domain::ids::IdGenerator;
use crate::domain::payment::{Effects, Operation, Payment};
use crate::domain::ports::{ChangeSet, PaymentStore, Store, StoreRef};
use crate::domain::status::StatusCode;
use crate::error::{PaymentError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// The entry point for payment operations.
///
/// Every operation locks the records it reads (merchant, cardholder, and for
/// successive operations the referenced payment) in the global [`LockKey`]
/// order, re-reads them under the locks, validates, and writes all results
/// through one [`Store::commit`](crate::domain::ports::Store::commit).
/// A request that fails or is dropped before the commit leaves the store
/// untouched.
#[derive(Clone)]
pub struct PaymentEngine {
    ledger: AccountLedger,
}

impl PaymentEngine {
    /// Creates a new `PaymentEngine` over `store`.
    ///
    /// # Arguments
    ///
    /// * `store` - Persistence for accounts and payments.
    /// * `ids` - Source of card credentials and payment ids.
    pub fn new(store: StoreRef, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ledger: AccountLedger::new(store, ids, LockTable::new()),
        }
    }

    /// The account ledger sharing this engine's store and locks.
    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    fn store(&self) -> &StoreRef {
        self.ledger.store()
    }

    fn ids(&self) -> &dyn IdGenerator {
        self.ledger.ids()
    }

    async fn load_account(&self, id: &str) -> Result<Option<Account>> {
        self.ledger.get_account(id).await
    }

    async fn load_payment(&self, id: &str) -> Result<Option<Payment>> {
        if id.is_empty() {
            return Ok(None);
        }
        self.store().get_payment(id).await
    }

    /// Places a hold of `amount` on the card on behalf of the merchant.
    pub async fn authorize(&self, request: AuthorizationRequest) -> Result<PaymentResponse> {
        let mut keys = vec![LockKey::account(&request.merchant_id)];
        if !request.card.card_number.is_empty() {
            keys.push(LockKey::account(&request.card.card_number));
        }
        let _locks = self.ledger.locks().acquire(keys).await;

        let found = self.load_account(&request.merchant_id).await?;
        let mut merchant = match validation::merchant(&request.merchant_id, found) {
            Ok(account) => account,
            Err(status) => return Ok(self.reject(&request.order_id, status)),
        };

        let found = self.load_account(&request.card.card_number).await?;
        let mut card = match validation::card(&request.card.card_number, &merchant, found) {
            Ok(account) => account,
            Err(status) => return Ok(self.reject(&request.order_id, status)),
        };

        let verdict = validation::credentials(&card, &request.card)
            .and_then(|()| validation::funds(&card, request.amount));
        let status = verdict.err().unwrap_or(StatusCode::Approved);
        let payment = Payment::authorization(
            self.ids().payment_id(),
            &merchant.id,
            &card.id,
            &request.order_id,
            request.amount,
            status,
        );

        if !status.is_approved() {
            return self.record_decline(merchant, payment).await;
        }

        apply(&mut card, &mut merchant, Operation::Authorization.effects(request.amount), &payment)?;
        let changes = ChangeSet::new()
            .put_payment(payment.clone())
            .put_account(card)
            .put_account(merchant);
        self.store().commit(changes).await?;

        info!(
            payment_id = %payment.id,
            merchant = %payment.merchant_id,
            amount = %payment.amount,
            "authorization approved"
        );
        Ok(PaymentResponse::recorded(&payment))
    }

    /// Settles part or all of an authorization.
    pub async fn capture(&self, request: SuccessiveRequest) -> Result<PaymentResponse> {
        self.successive(Operation::Capture, request).await
    }

    /// Releases part or all of an authorization without settlement.
    pub async fn reverse(&self, request: SuccessiveRequest) -> Result<PaymentResponse> {
        self.successive(Operation::Reversal, request).await
    }

    /// Returns part or all of a capture to the cardholder.
    pub async fn refund(&self, request: SuccessiveRequest) -> Result<PaymentResponse> {
        self.successive(Operation::Refund, request).await
    }

    async fn successive(
        &self,
        operation: Operation,
        request: SuccessiveRequest,
    ) -> Result<PaymentResponse> {
        // The card number on a payment never changes, so it is safe to learn
        // which cardholder to lock before holding any lock.
        let peeked = self.load_payment(&request.reference_id).await?;
        let mut keys = vec![
            LockKey::account(&request.merchant_id),
            LockKey::payment(&request.reference_id),
        ];
        if let Some(payment) = &peeked {
            keys.push(LockKey::account(&payment.card_number));
        }
        let _locks = self.ledger.locks().acquire(keys).await;

        let found = self.load_account(&request.merchant_id).await?;
        let mut merchant = match validation::merchant(&request.merchant_id, found) {
            Ok(account) => account,
            Err(status) => return Ok(self.reject(&request.reference_id, status)),
        };

        // Only trust a reference that was visible when the lock set was built.
        let found = match peeked {
            Some(_) => self.load_payment(&request.reference_id).await?,
            None => None,
        };
        let mut reference =
            match validation::reference(operation, &request.reference_id, &merchant, found) {
                Ok(payment) => payment,
                Err(status) => return Ok(self.reject(&request.reference_id, status)),
            };

        if let Err(status) = validation::remaining(&reference, request.amount) {
            let payment = Payment::successive(
                self.ids().payment_id(),
                operation,
                &reference,
                request.amount,
                status,
            );
            return self.record_decline(merchant, payment).await;
        }

        let mut card = self
            .load_account(&reference.card_number)
            .await?
            .ok_or_else(|| PaymentError::AccountNotFound(reference.card_number.clone()))?;

        let payment = Payment::successive(
            self.ids().payment_id(),
            operation,
            &reference,
            request.amount,
            StatusCode::Approved,
        );
        reference.consume(request.amount)?;
        apply(&mut card, &mut merchant, operation.effects(request.amount), &payment)?;

        let changes = ChangeSet::new()
            .put_payment(reference)
            .put_payment(payment.clone())
            .put_account(card)
            .put_account(merchant);
        self.store().commit(changes).await?;

        info!(
            payment_id = %payment.id,
            ?operation,
            reference = %request.reference_id,
            amount = %request.amount.value(),
            "successive operation approved"
        );
        Ok(PaymentResponse::recorded(&payment))
    }

    /// Declines that happen before any payment record is written.
    fn reject(&self, echo_id: &str, status: StatusCode) -> PaymentResponse {
        debug!(id = %echo_id, %status, "request declined");
        PaymentResponse::new(echo_id, status)
    }

    /// Declines audited on the merchant's statement only.
    async fn record_decline(&self, mut merchant: Account, payment: Payment) -> Result<PaymentResponse> {
        merchant.append_statement(payment.id.clone());
        let response = PaymentResponse::recorded(&payment);
        debug!(
            payment_id = %payment.id,
            merchant = %merchant.id,
            status = %payment.status,
            "declined payment recorded"
        );
        self.store()
            .commit(ChangeSet::new().put_payment(payment).put_account(merchant))
            .await?;
        Ok(response)
    }
}

/// Moves balances on both participants and records the payment on both
/// statements. Either both accounts are updated or the error is returned
/// before anything is committed.
fn apply(card: &mut Account, merchant: &mut Account, effects: Effects, payment: &Payment) -> Result<()> {
    card.adjust_balances(effects.cardholder.available, effects.cardholder.blocked)?;
    merchant.adjust_balances(effects.merchant.available, effects.merchant.blocked)?;
    card.append_statement(payment.id.clone());
    merchant.append_statement(payment.id.clone());
    Ok(())
}
