use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary balance held on an account.
///
/// This is a wrapper around `rust_decimal::Decimal` so that balances and
/// request amounts cannot be mixed up by accident.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Represents a strictly positive amount requested by an operation.
///
/// Deserialization goes through [`Amount::new`], so a decoded request can
/// never carry a zero or negative amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(format!(
                "Amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Card credentials as issued at account creation and presented on authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCredentials {
    pub card_number: String,
    pub security_code: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
}

/// A participant in the network: a cardholder or a merchant.
///
/// Cardholder accounts are addressed by their card number; every account is
/// issued card credentials, so any account can act in either role.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub card_number: String,
    pub card_security_code: String,
    pub card_expiry_month: u8,
    pub card_expiry_year: u16,
    /// Funds usable for new authorizations or payable through refunds.
    pub available: Balance,
    /// Funds held against in-flight authorizations.
    pub blocked: Balance,
    /// Payment ids affecting this account, in commit order.
    #[serde(default)]
    pub statement: Vec<String>,
}

impl Account {
    pub fn new(credentials: CardCredentials) -> Self {
        Self {
            id: credentials.card_number.clone(),
            card_number: credentials.card_number,
            card_security_code: credentials.security_code,
            card_expiry_month: credentials.expiry_month,
            card_expiry_year: credentials.expiry_year,
            available: Balance::ZERO,
            blocked: Balance::ZERO,
            statement: Vec::new(),
        }
    }

    /// Compares presented credentials verbatim against the stored ones.
    pub fn matches(&self, credentials: &CardCredentials) -> bool {
        self.card_number == credentials.card_number
            && self.card_security_code == credentials.security_code
            && self.card_expiry_month == credentials.expiry_month
            && self.card_expiry_year == credentials.expiry_year
    }

    /// Applies both deltas or neither.
    ///
    /// Fails without touching the account if either resulting balance would
    /// be negative.
    pub fn adjust_balances(&mut self, available_delta: Decimal, blocked_delta: Decimal) -> Result<()> {
        let overflow = || PaymentError::Overflow(format!("account {}", self.id));
        let available = self
            .available
            .value()
            .checked_add(available_delta)
            .ok_or_else(overflow)?;
        let blocked = self
            .blocked
            .value()
            .checked_add(blocked_delta)
            .ok_or_else(overflow)?;

        if available < Decimal::ZERO || blocked < Decimal::ZERO {
            return Err(PaymentError::BalanceInvariant {
                account: self.id.clone(),
                available,
                blocked,
            });
        }

        self.available = Balance(available);
        self.blocked = Balance(blocked);
        Ok(())
    }

    /// Deposits funds into the available balance
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        self.adjust_balances(amount.value(), Decimal::ZERO)
    }

    pub fn append_statement(&mut self, payment_id: impl Into<String>) {
        self.statement.push(payment_id.into());
    }
}
