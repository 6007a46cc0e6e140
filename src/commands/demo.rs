use anyhow::Result;
use rust_decimal::Decimal;

use super::Credentials;
use crate::banking::BankingApi;

const VALID_ACCOUNT: &str = "ACC1000";
const INVALID_ACCOUNT: &str = "ACC2000";

fn section(title: &str) {
    println!("\n{}", title);
    println!("{}", "-".repeat(60));
}

/// Walk through every operation against the configured server.
///
/// Individual steps may fail; the demo reports them and carries on.
#[tracing::instrument(skip(api))]
pub async fn demo<B: BankingApi>(api: &mut B, credentials: &Credentials) -> Result<bool> {
    println!("{}", "=".repeat(60));
    println!("Banking Client Demonstration");
    println!("{}", "=".repeat(60));

    section("[1] Basic Fund Transfer");
    match api
        .transfer_funds(VALID_ACCOUNT, "ACC1001", Decimal::new(100, 0), true)
        .await
    {
        Ok(result) if result.is_success() => println!("✓ {}", result),
        Ok(result) => println!("✗ {}: {}", result, result.message()),
        Err(e) => println!("✗ Transfer failed: {}", e),
    }

    section("[2] Transfer with Token Authentication");
    if api
        .authenticate(&credentials.username, &credentials.password)
        .await
    {
        println!("✓ Authentication successful");
        match api
            .transfer_funds(VALID_ACCOUNT, "ACC1002", Decimal::new(250, 0), true)
            .await
        {
            Ok(result) => println!("✓ {}", result),
            Err(e) => println!("✗ Transfer failed: {}", e),
        }
    } else {
        println!("✗ Authentication failed");
    }

    section("[3] Account Validation");
    for account in [VALID_ACCOUNT, INVALID_ACCOUNT] {
        println!(
            "Validating {}: {}",
            account,
            api.validate_account(account).await
        );
    }

    section("[4] Account Balance Inquiry");
    match api.get_account_balance(VALID_ACCOUNT).await {
        Ok(balance) => println!("Account {} balance: ${:.2}", VALID_ACCOUNT, balance),
        Err(e) => println!("✗ Could not retrieve balance: {}", e),
    }

    section("[5] Transaction History");
    match api.get_transaction_history().await {
        Ok(history) => {
            println!("✓ Retrieved {} transactions", history.len());
            if let Some(latest) = history.first() {
                println!("Latest transaction: {}", serde_json::to_string(latest)?);
            }
        }
        Err(e) => println!("✗ Could not retrieve history: {}", e),
    }

    section("[6] List All Accounts");
    match api.get_all_accounts().await {
        Ok(accounts) => {
            println!("✓ Retrieved {} accounts", accounts.len());
            for account in accounts.iter().take(3) {
                println!(
                    "  - {}: {}",
                    account.account_id.as_deref().unwrap_or("unknown"),
                    account.account_type.as_deref().unwrap_or("unknown")
                );
            }
        }
        Err(e) => println!("✗ Could not retrieve accounts: {}", e),
    }

    println!("\n{}", "=".repeat(60));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banking::{BankingError, MockBankingApi, TransferResult, TransferStatus};
    use mockall::Sequence;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_demo_runs_every_step_in_order() {
        let mut api = MockBankingApi::new();
        let mut seq = Sequence::new();

        api.expect_transfer_funds()
            .with(eq("ACC1000"), eq("ACC1001"), eq(Decimal::new(100, 0)), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|from, to, amount, _| {
                Ok(TransferResult::new(
                    Some("txn-1".to_string()),
                    TransferStatus::Success,
                    "ok",
                    from,
                    to,
                    amount,
                ))
            });
        api.expect_authenticate()
            .with(eq("admin"), eq("password"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| true);
        api.expect_transfer_funds()
            .with(eq("ACC1000"), eq("ACC1002"), eq(Decimal::new(250, 0)), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Err(BankingError::AccountValidation("ACC1002".to_string())));
        api.expect_validate_account()
            .with(eq("ACC1000"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| true);
        api.expect_validate_account()
            .with(eq("ACC2000"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| false);
        api.expect_get_account_balance()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Decimal::new(50000, 2)));
        api.expect_get_transaction_history()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(Vec::new()));
        api.expect_get_all_accounts()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(BankingError::SessionClosed));

        let credentials = Credentials::new("admin", "password");
        assert!(demo(&mut api, &credentials).await.unwrap());
    }

    #[tokio::test]
    async fn test_demo_skips_authenticated_transfer_without_token() {
        let mut api = MockBankingApi::new();
        api.expect_transfer_funds()
            .times(1)
            .returning(|_, _, _, _| Err(BankingError::InvalidAmount(Decimal::ZERO)));
        api.expect_authenticate().returning(|_, _| false);
        api.expect_validate_account().returning(|_| false);
        api.expect_get_account_balance()
            .returning(|_| Err(BankingError::EmptyAccountId));
        api.expect_get_transaction_history()
            .returning(|| Err(BankingError::NotAuthenticated));
        api.expect_get_all_accounts().returning(|| Ok(Vec::new()));

        let credentials = Credentials::new("admin", "password");
        assert!(demo(&mut api, &credentials).await.unwrap());
    }
}
