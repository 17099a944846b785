//! Domain model: accounts, payments, status codes and the ports the
//! application layer depends on.

pub mod account;
pub mod ids;
pub mod payment;
pub mod ports;
pub mod status;
