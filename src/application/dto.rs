//! Requests accepted and responses returned by the application layer.

use crate::domain::account::{Account, Amount, Balance, CardCredentials};
use crate::domain::payment::Payment;
use crate::domain::status::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    pub merchant_id: String,
    #[serde(flatten)]
    pub card: CardCredentials,
    pub amount: Amount,
    pub order_id: String,
}

/// A capture, reversal or refund against an earlier payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessiveRequest {
    pub merchant_id: String,
    pub reference_id: String,
    pub amount: Amount,
}

/// Outcome of a payment operation.
///
/// `id` is the new payment's id when a record was written, otherwise the
/// order id or reference id the caller supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub status: StatusCode,
    pub message: String,
}

impl PaymentResponse {
    pub fn new(id: impl Into<String>, status: StatusCode) -> Self {
        Self {
            id: id.into(),
            status,
            message: status.message().to_string(),
        }
    }

    pub fn recorded(payment: &Payment) -> Self {
        Self::new(payment.id.clone(), payment.status)
    }
}

/// Outcome of an account operation such as a deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub status: StatusCode,
    pub message: String,
}

impl AccountResponse {
    pub fn new(id: impl Into<String>, status: StatusCode) -> Self {
        Self {
            id: id.into(),
            status,
            message: status.message().to_string(),
        }
    }
}

/// A freshly opened account. Its statement is necessarily empty and is left
/// out of the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAccount {
    pub id: String,
    pub card_number: String,
    pub card_security_code: String,
    pub card_expiry_month: u8,
    pub card_expiry_year: u16,
    pub available: Balance,
    pub blocked: Balance,
}

impl From<Account> for CreatedAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            card_number: account.card_number,
            card_security_code: account.card_security_code,
            card_expiry_month: account.card_expiry_month,
            card_expiry_year: account.card_expiry_year,
            available: account.available,
            blocked: account.blocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatement {
    pub statement: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_response_wire_format() {
        let response = PaymentResponse::new("O1", StatusCode::NoSuchIssuer);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"id":"O1","status":"15","message":"No Such Issuer"}"#);
    }

    #[test]
    fn test_successive_request_rejects_non_positive_amount() {
        for amount in ["-1", "0", "-500"] {
            let json = format!(
                r#"{{"merchantId":"m","referenceId":"auth-1","amount":"{amount}"}}"#
            );
            let result = serde_json::from_str::<SuccessiveRequest>(&json);
            assert!(result.is_err(), "amount {amount} was accepted");
        }

        let json = r#"{"merchantId":"m","referenceId":"auth-1","amount":"1"}"#;
        let request: SuccessiveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount.value(), Decimal::ONE);
    }

    #[test]
    fn test_authorization_request_rejects_non_positive_amount() {
        for amount in ["-1", "0"] {
            let json = format!(
                r#"{{"merchantId":"m","cardNumber":"4","securityCode":"123","expiryMonth":1,"expiryYear":2030,"amount":"{amount}","orderId":"O1"}}"#
            );
            assert!(serde_json::from_str::<AuthorizationRequest>(&json).is_err());
        }
    }

    #[test]
    fn test_created_account_omits_statement() {
        let account = Account::new(CardCredentials {
            card_number: "4000000000000002".to_string(),
            security_code: "123".to_string(),
            expiry_month: 1,
            expiry_year: 2030,
        });
        let json = serde_json::to_value(CreatedAccount::from(account)).unwrap();
        assert_eq!(json["id"], "4000000000000002");
        assert_eq!(json["available"], "0");
        assert!(json.get("statement").is_none());
    }
}
