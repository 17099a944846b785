use super::account::Amount;
use super::status::StatusCode;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Authorization,
    Capture,
    Reversal,
    Refund,
}

/// Signed change applied to one account's balances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceDelta {
    pub available: Decimal,
    pub blocked: Decimal,
}

impl BalanceDelta {
    fn new(available: Decimal, blocked: Decimal) -> Self {
        Self { available, blocked }
    }
}

/// What an approved operation does to both participants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effects {
    pub cardholder: BalanceDelta,
    pub merchant: BalanceDelta,
}

impl Operation {
    /// The operation a payment must have been to be referenced by `self`.
    pub fn parent(&self) -> Option<Operation> {
        match self {
            Operation::Authorization => None,
            Operation::Capture | Operation::Reversal => Some(Operation::Authorization),
            Operation::Refund => Some(Operation::Capture),
        }
    }

    pub fn effects(&self, amount: Amount) -> Effects {
        let a = amount.value();
        let zero = Decimal::ZERO;
        let (cardholder, merchant) = match self {
            // hold on the card, pending credit for the merchant
            Operation::Authorization => (BalanceDelta::new(-a, a), BalanceDelta::new(zero, a)),
            // settlement
            Operation::Capture => (BalanceDelta::new(zero, -a), BalanceDelta::new(a, -a)),
            // release without settlement
            Operation::Reversal => (BalanceDelta::new(a, -a), BalanceDelta::new(zero, -a)),
            // settlement undone
            Operation::Refund => (BalanceDelta::new(a, zero), BalanceDelta::new(-a, zero)),
        };
        Effects {
            cardholder,
            merchant,
        }
    }
}

/// A single payment record. Authorizations root a chain; captures and
/// reversals reference an authorization, refunds reference a capture.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub order_id: String,
    pub merchant_id: String,
    pub card_number: String,
    pub amount: Decimal,
    /// How much of this payment successive operations may still move.
    pub current_amount: Decimal,
    pub status: StatusCode,
    pub status_message: String,
}

impl Payment {
    pub fn authorization(
        id: String,
        merchant_id: &str,
        card_number: &str,
        order_id: &str,
        amount: Amount,
        status: StatusCode,
    ) -> Self {
        Self {
            id,
            operation: Operation::Authorization,
            reference_id: None,
            order_id: order_id.to_string(),
            merchant_id: merchant_id.to_string(),
            card_number: card_number.to_string(),
            amount: amount.value(),
            current_amount: Self::opening_amount(amount, status),
            status,
            status_message: status.message().to_string(),
        }
    }

    /// Builds a capture, reversal or refund against `reference`, carrying its
    /// order id and card number.
    pub fn successive(
        id: String,
        operation: Operation,
        reference: &Payment,
        amount: Amount,
        status: StatusCode,
    ) -> Self {
        Self {
            id,
            operation,
            reference_id: Some(reference.id.clone()),
            order_id: reference.order_id.clone(),
            merchant_id: reference.merchant_id.clone(),
            card_number: reference.card_number.clone(),
            amount: amount.value(),
            current_amount: Self::opening_amount(amount, status),
            status,
            status_message: status.message().to_string(),
        }
    }

    fn opening_amount(amount: Amount, status: StatusCode) -> Decimal {
        if status.is_approved() {
            amount.value()
        } else {
            Decimal::ZERO
        }
    }

    /// Whether an operation of kind `next` may reference this payment.
    pub fn accepts(&self, next: Operation) -> bool {
        self.status.is_approved() && next.parent() == Some(self.operation)
    }

    /// Takes `amount` off the remaining amount.
    pub fn consume(&mut self, amount: Amount) -> Result<()> {
        if amount.value() > self.current_amount {
            return Err(PaymentError::ValidationError(format!(
                "Payment {} has {} remaining, cannot take {}",
                self.id,
                self.current_amount,
                amount.value()
            )));
        }
        self.current_amount -= amount.value();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    fn approved_authorization() -> Payment {
        Payment::authorization(
            "auth-1".to_string(),
            "merchant",
            "4000000000000002",
            "O1",
            amount(dec!(200)),
            StatusCode::Approved,
        )
    }

    #[test]
    fn test_parent_table() {
        assert_eq!(Operation::Authorization.parent(), None);
        assert_eq!(Operation::Capture.parent(), Some(Operation::Authorization));
        assert_eq!(Operation::Reversal.parent(), Some(Operation::Authorization));
        assert_eq!(Operation::Refund.parent(), Some(Operation::Capture));
    }

    #[test]
    fn test_effects_conserve_the_moved_amount() {
        let a = amount(dec!(50));

        let capture = Operation::Capture.effects(a);
        assert_eq!(capture.cardholder, BalanceDelta::new(dec!(0), dec!(-50)));
        assert_eq!(capture.merchant, BalanceDelta::new(dec!(50), dec!(-50)));

        let reversal = Operation::Reversal.effects(a);
        assert_eq!(reversal.cardholder, BalanceDelta::new(dec!(50), dec!(-50)));
        assert_eq!(reversal.merchant, BalanceDelta::new(dec!(0), dec!(-50)));

        let refund = Operation::Refund.effects(a);
        assert_eq!(refund.cardholder, BalanceDelta::new(dec!(50), dec!(0)));
        assert_eq!(refund.merchant, BalanceDelta::new(dec!(-50), dec!(0)));
    }

    #[test]
    fn test_authorization_opens_chain() {
        let auth = approved_authorization();
        assert_eq!(auth.current_amount, dec!(200));
        assert_eq!(auth.reference_id, None);
        assert!(auth.accepts(Operation::Capture));
        assert!(auth.accepts(Operation::Reversal));
        assert!(!auth.accepts(Operation::Refund));
    }

    #[test]
    fn test_declined_payment_is_terminal() {
        let declined = Payment::authorization(
            "auth-2".to_string(),
            "merchant",
            "4000000000000002",
            "O2",
            amount(dec!(10)),
            StatusCode::InsufficientFunds,
        );
        assert_eq!(declined.current_amount, Decimal::ZERO);
        assert_eq!(declined.status_message, "Insufficient Funds");
        assert!(!declined.accepts(Operation::Capture));
    }

    #[test]
    fn test_successive_carries_order_and_card() {
        let auth = approved_authorization();
        let capture = Payment::successive(
            "cap-1".to_string(),
            Operation::Capture,
            &auth,
            amount(dec!(150)),
            StatusCode::Approved,
        );
        assert_eq!(capture.reference_id.as_deref(), Some("auth-1"));
        assert_eq!(capture.order_id, "O1");
        assert_eq!(capture.card_number, "4000000000000002");
        assert_eq!(capture.current_amount, dec!(150));
        assert!(capture.accepts(Operation::Refund));
        assert!(!capture.accepts(Operation::Capture));
    }

    #[test]
    fn test_consume_to_exactly_zero() {
        let mut auth = approved_authorization();
        auth.consume(amount(dec!(150))).unwrap();
        assert_eq!(auth.current_amount, dec!(50));
        assert!(auth.consume(amount(dec!(100))).is_err());
        assert_eq!(auth.current_amount, dec!(50));
        auth.consume(amount(dec!(50))).unwrap();
        assert_eq!(auth.current_amount, Decimal::ZERO);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(approved_authorization()).unwrap();
        assert_eq!(json["operation"], "AUTHORIZATION");
        assert_eq!(json["status"], "0");
        assert_eq!(json["statusMessage"], "Approved");
        assert_eq!(json["currentAmount"], "200");
        assert!(json.get("referenceId").is_none());
    }
}
