use anyhow::Result;
use serde::Serialize;

use super::{OutputFormat, print_json};
use crate::banking::BankingApi;

#[derive(Serialize)]
struct ValidationReport<'a> {
    account: &'a str,
    is_valid: bool,
    status: &'static str,
}

/// Check whether an account exists and is usable. Succeeds only for valid accounts.
#[tracing::instrument(skip(api))]
pub async fn validate<B: BankingApi>(api: &B, account: &str, format: OutputFormat) -> Result<bool> {
    let is_valid = api.validate_account(account).await;
    let status = if is_valid { "VALID" } else { "INVALID" };

    match format {
        OutputFormat::Human => {
            let mark = if is_valid { "✓" } else { "✗" };
            println!("{} Account {} is {}", mark, account, status);
        }
        OutputFormat::Json => print_json(&ValidationReport {
            account,
            is_valid,
            status,
        })?,
    }

    Ok(is_valid)
}
