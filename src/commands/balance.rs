use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{OutputFormat, print_json, report_failure};
use crate::banking::BankingApi;

#[derive(Serialize)]
struct BalanceReport<'a> {
    account: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    balance: Decimal,
}

/// Show the balance of one account.
#[tracing::instrument(skip(api))]
pub async fn balance<B: BankingApi>(api: &B, account: &str, format: OutputFormat) -> Result<bool> {
    match api.get_account_balance(account).await {
        Ok(balance) => {
            match format {
                OutputFormat::Human => println!("Account {} balance: ${:.2}", account, balance),
                OutputFormat::Json => print_json(&BalanceReport { account, balance })?,
            }
            Ok(true)
        }
        Err(e) => {
            let error = format!("Could not retrieve balance for {}", account);
            report_failure(format, &error, Some(&e.to_string()))?;
            Ok(false)
        }
    }
}
