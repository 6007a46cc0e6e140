use anyhow::Result;
use log::debug;
use rust_decimal::Decimal;

use super::{Credentials, OutputFormat, login, print_json, report_failure};
use crate::banking::BankingApi;

#[derive(Debug, Clone)]
pub struct TransferArgs {
    pub from_account: String,
    pub to_account: String,
    pub amount: Decimal,
    pub validate_accounts: bool,
    /// Authenticate before transferring when set.
    pub credentials: Option<Credentials>,
}

/// Transfer funds between two accounts, optionally authenticating first.
#[tracing::instrument(skip(api))]
pub async fn transfer<B: BankingApi>(
    api: &mut B,
    args: &TransferArgs,
    format: OutputFormat,
) -> Result<bool> {
    if let Some(credentials) = &args.credentials {
        if !login(api, credentials, format).await? {
            return Ok(false);
        }
    }

    if format.is_human() {
        println!(
            "Transferring ${:.2} from {} to {}...",
            args.amount, args.from_account, args.to_account
        );
    }

    let outcome = api
        .transfer_funds(
            &args.from_account,
            &args.to_account,
            args.amount,
            args.validate_accounts,
        )
        .await;

    match outcome {
        Ok(result) if result.is_success() => {
            match format {
                OutputFormat::Human => {
                    println!("✓ Transfer successful!");
                    println!(
                        "  Transaction ID: {}",
                        result.transaction_id().unwrap_or("unknown")
                    );
                    println!("  From: {}", result.from_account());
                    println!("  To: {}", result.to_account());
                    println!("  Amount: ${:.2}", result.amount());
                }
                OutputFormat::Json => print_json(&result)?,
            }
            Ok(true)
        }
        Ok(result) => {
            debug!("Transfer not successful: {}", result);
            match format {
                OutputFormat::Human => {
                    let detail = format!("Message: {}", result.message());
                    report_failure(format, "Transfer failed", Some(&detail))?;
                }
                OutputFormat::Json => print_json(&result)?,
            }
            Ok(false)
        }
        Err(e) => {
            let detail = format!("Reason: {}", e);
            report_failure(format, "Transfer failed", Some(&detail))?;
            Ok(false)
        }
    }
}
