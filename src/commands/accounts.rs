use anyhow::Result;

use super::{OutputFormat, print_json, report_failure};
use crate::banking::BankingApi;

/// List every account known to the service.
#[tracing::instrument(skip(api))]
pub async fn list_accounts<B: BankingApi>(api: &B, format: OutputFormat) -> Result<bool> {
    let accounts = match api.get_all_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            report_failure(format, "Could not retrieve accounts", Some(&e.to_string()))?;
            return Ok(false);
        }
    };

    if format == OutputFormat::Json {
        print_json(&accounts)?;
        return Ok(true);
    }

    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(true);
    }

    println!("Found {} accounts:", accounts.len());
    println!("{}", "-".repeat(60));
    for account in &accounts {
        println!(
            "  {}: {} - {}",
            account.account_id.as_deref().unwrap_or("unknown"),
            account.account_type.as_deref().unwrap_or("unknown"),
            account.status.as_deref().unwrap_or("unknown")
        );
    }

    Ok(true)
}
