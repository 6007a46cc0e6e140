use anyhow::Result;
use rust_decimal::Decimal;

use super::{Credentials, OutputFormat, login, print_json, report_failure};
use crate::banking::BankingApi;

/// Rows shown in human output; JSON output is never truncated.
const MAX_ROWS: usize = 10;

/// Authenticate, then show the transaction history.
#[tracing::instrument(skip(api))]
pub async fn history<B: BankingApi>(
    api: &mut B,
    credentials: &Credentials,
    format: OutputFormat,
) -> Result<bool> {
    if !login(api, credentials, format).await? {
        return Ok(false);
    }

    let transactions = match api.get_transaction_history().await {
        Ok(transactions) => transactions,
        Err(e) => {
            report_failure(
                format,
                "Could not retrieve transaction history",
                Some(&e.to_string()),
            )?;
            return Ok(false);
        }
    };

    if format == OutputFormat::Json {
        print_json(&transactions)?;
        return Ok(true);
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(true);
    }

    println!("✓ Found {} transactions:", transactions.len());
    println!("{}", "-".repeat(60));
    for txn in transactions.iter().take(MAX_ROWS) {
        println!(
            "  {}: ${:.2}",
            txn.transaction_id.as_deref().unwrap_or("unknown"),
            txn.amount.unwrap_or(Decimal::ZERO)
        );
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banking::{BankingError, MockBankingApi, Transaction};

    #[tokio::test]
    async fn test_history_success() {
        let mut api = MockBankingApi::new();
        api.expect_authenticate().times(1).returning(|_, _| true);
        api.expect_get_transaction_history().times(1).returning(|| {
            Ok((0..12)
                .map(|i| Transaction {
                    transaction_id: Some(format!("txn-{}", i)),
                    amount: Some(Decimal::new(i * 100, 0)),
                    ..Transaction::default()
                })
                .collect())
        });

        let credentials = Credentials::new("alice", "password");
        assert!(history(&mut api, &credentials, OutputFormat::Human).await.unwrap());
    }

    #[tokio::test]
    async fn test_history_authentication_failure() {
        let mut api = MockBankingApi::new();
        api.expect_authenticate().returning(|_, _| false);
        api.expect_get_transaction_history().never();

        let credentials = Credentials::new("alice", "wrong");
        assert!(!history(&mut api, &credentials, OutputFormat::Human).await.unwrap());
    }

    #[tokio::test]
    async fn test_history_request_failure() {
        let mut api = MockBankingApi::new();
        api.expect_authenticate().returning(|_, _| true);
        api.expect_get_transaction_history()
            .returning(|| Err(BankingError::NotAuthenticated));

        let credentials = Credentials::new("alice", "password");
        assert!(!history(&mut api, &credentials, OutputFormat::Json).await.unwrap());
    }
}
