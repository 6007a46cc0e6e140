//! Client for the remote banking service.

mod client;
mod error;
mod types;

pub use client::{BankingApi, BankingClient};
#[cfg(test)]
pub use client::MockBankingApi;
pub use error::BankingError;
pub use types::{Account, AccountValidation, Transaction, TransferResult, TransferStatus};
