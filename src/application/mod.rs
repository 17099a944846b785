//! Application layer containing the payment lifecycle orchestration.
//!
//! `PaymentEngine` is the entry point for authorizations, captures, reversals
//! and refunds. `AccountLedger` owns account creation and balance updates.
//! Both share a store handle and a `LockTable`, so concurrent requests that
//! touch the same accounts or payment chain run one after another.

pub mod dto;
pub mod engine;
pub mod ledger;
pub mod locks;
pub mod validation;
