//! Ordered, side-effect free checks run before any ledger mutation.
//!
//! Each step returns the first applicable decline. Callers run them in the
//! order merchant, card or reference, detail match, amount.

use crate::domain::account::{Account, Amount, CardCredentials};
use crate::domain::payment::{Operation, Payment};
use crate::domain::status::StatusCode;

/// The merchant must be named and must exist.
pub fn merchant(merchant_id: &str, found: Option<Account>) -> Result<Account, StatusCode> {
    if merchant_id.is_empty() {
        return Err(StatusCode::InvalidMerchant);
    }
    found.ok_or(StatusCode::NoSuchIssuer)
}

/// The card must be named, must exist, and must not be the merchant itself.
pub fn card(
    card_number: &str,
    merchant: &Account,
    found: Option<Account>,
) -> Result<Account, StatusCode> {
    if card_number.is_empty() || card_number == merchant.id {
        return Err(StatusCode::InvalidTransaction);
    }
    found.ok_or(StatusCode::NoCardRecord)
}

pub fn credentials(card: &Account, presented: &CardCredentials) -> Result<(), StatusCode> {
    if card.matches(presented) {
        Ok(())
    } else {
        Err(StatusCode::DoNotHonour)
    }
}

pub fn funds(card: &Account, amount: Amount) -> Result<(), StatusCode> {
    if card.available.value() >= amount.value() {
        Ok(())
    } else {
        Err(StatusCode::InsufficientFunds)
    }
}

/// The referenced payment must exist, belong to the requesting merchant, and
/// be an approved payment of the kind `operation` follows.
pub fn reference(
    operation: Operation,
    reference_id: &str,
    merchant: &Account,
    found: Option<Payment>,
) -> Result<Payment, StatusCode> {
    if reference_id.is_empty() {
        return Err(StatusCode::InvalidTransaction);
    }
    match found {
        Some(payment) if payment.merchant_id == merchant.id && payment.accepts(operation) => {
            Ok(payment)
        }
        _ => Err(StatusCode::InvalidTransaction),
    }
}

pub fn remaining(reference: &Payment, amount: Amount) -> Result<(), StatusCode> {
    if amount.value() <= reference.current_amount {
        Ok(())
    } else {
        Err(StatusCode::InvalidAmount)
    }
}
