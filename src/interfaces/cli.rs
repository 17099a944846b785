//! Command-line surface: one subcommand per API operation, each printing its
//! response as a single JSON document on stdout.

use crate::application::dto::{AuthorizationRequest, CreatedAccount, SuccessiveRequest};
use crate::application::engine::PaymentEngine;
use crate::domain::account::{Amount, CardCredentials};
use crate::error::{PaymentError, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYMENTS_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open an account with zero balances and freshly issued card credentials
    CreateAccount,
    /// Credit funds to an account's available balance
    Deposit {
        account: String,
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Show an account's balances, credentials and statement ids
    Detail { account: String },
    /// List every payment affecting an account, oldest first
    Statement { account: String },
    /// Hold funds on a card on behalf of a merchant
    Authorize(AuthorizeArgs),
    /// Settle part or all of an authorization
    Capture(SuccessiveArgs),
    /// Release part or all of an authorization without settlement
    Reverse(SuccessiveArgs),
    /// Return part or all of a capture to the cardholder
    Refund(SuccessiveArgs),
}

#[derive(Args, Debug)]
pub struct AuthorizeArgs {
    /// Merchant account id
    #[arg(long, default_value = "")]
    pub merchant: String,
    #[arg(long, default_value = "")]
    pub card: String,
    #[arg(long, default_value = "")]
    pub security_code: String,
    #[arg(long)]
    pub expiry_month: u8,
    #[arg(long)]
    pub expiry_year: u16,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Decimal,
    /// Merchant's order reference
    #[arg(long, default_value = "")]
    pub order: String,
}

impl AuthorizeArgs {
    fn into_request(self) -> Result<AuthorizationRequest> {
        Ok(AuthorizationRequest {
            merchant_id: self.merchant,
            card: CardCredentials {
                card_number: self.card,
                security_code: self.security_code,
                expiry_month: self.expiry_month,
                expiry_year: self.expiry_year,
            },
            amount: Amount::new(self.amount)?,
            order_id: self.order,
        })
    }
}

#[derive(Args, Debug)]
pub struct SuccessiveArgs {
    /// Merchant account id
    #[arg(long, default_value = "")]
    pub merchant: String,
    /// Id of the payment this operation follows
    pub reference: String,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Decimal,
}

impl SuccessiveArgs {
    fn into_request(self) -> Result<SuccessiveRequest> {
        Ok(SuccessiveRequest {
            merchant_id: self.merchant,
            reference_id: self.reference,
            amount: Amount::new(self.amount)?,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Runs one command against `engine` and returns its JSON response.
pub async fn execute(engine: &PaymentEngine, command: Command) -> Result<String> {
    let ledger = engine.ledger();
    match command {
        Command::CreateAccount => {
            to_json(&CreatedAccount::from(ledger.create_account().await?))
        }
        Command::Deposit { account, amount } => to_json(&ledger.deposit(&account, amount).await?),
        Command::Detail { account } => {
            let found = ledger
                .get_account(&account)
                .await?
                .ok_or(PaymentError::AccountNotFound(account))?;
            to_json(&found)
        }
        Command::Statement { account } => to_json(&ledger.statement(&account).await?),
        Command::Authorize(args) => to_json(&engine.authorize(args.into_request()?).await?),
        Command::Capture(args) => to_json(&engine.capture(args.into_request()?).await?),
        Command::Reverse(args) => to_json(&engine.reverse(args.into_request()?).await?),
        Command::Refund(args) => to_json(&engine.refund(args.into_request()?).await?),
    }
}
