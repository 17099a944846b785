use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval and decline outcomes shared by every operation.
///
/// Serialized as the numeric code string used on the wire (`"0"`, `"51"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "0")]
    Approved,
    #[serde(rename = "3")]
    InvalidMerchant,
    #[serde(rename = "5")]
    DoNotHonour,
    #[serde(rename = "12")]
    InvalidTransaction,
    #[serde(rename = "13")]
    InvalidAmount,
    #[serde(rename = "14")]
    InvalidCardNumber,
    #[serde(rename = "15")]
    NoSuchIssuer,
    #[serde(rename = "51")]
    InsufficientFunds,
    #[serde(rename = "56")]
    NoCardRecord,
}

impl StatusCode {
    pub fn code(&self) -> &'static str {
        self.entry().0
    }

    pub fn message(&self) -> &'static str {
        self.entry().1
    }

    pub fn is_approved(&self) -> bool {
        *self == StatusCode::Approved
    }

    fn entry(&self) -> (&'static str, &'static str) {
        match self {
            StatusCode::Approved => ("0", "Approved"),
            StatusCode::InvalidMerchant => ("3", "Invalid Merchant"),
            StatusCode::DoNotHonour => ("5", "Do Not Honour"),
            StatusCode::InvalidTransaction => ("12", "Invalid Transaction"),
            StatusCode::InvalidAmount => ("13", "Invalid Amount"),
            StatusCode::InvalidCardNumber => ("14", "Invalid Card Number"),
            StatusCode::NoSuchIssuer => ("15", "No Such Issuer"),
            StatusCode::InsufficientFunds => ("51", "Insufficient Funds"),
            StatusCode::NoCardRecord => ("56", "No Card Record"),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}
