use async_trait::async_trait;
use log::{error, info, warn};
use rust_decimal::Decimal;

use super::error::BankingError;
use super::types::{
    Account, AccountValidation, AuthRequest, AuthResponse, BalanceResponse, Transaction,
    TransferRequest, TransferResponse, TransferResult,
};
use crate::config::Config;
use crate::http::{Session, with_retry};

/// Operations offered by the remote banking service.
///
/// Every operation performs one logical unit of work using the current
/// session and token. `validate_account` and `authenticate` answer with a
/// plain bool; the others return `BankingError` so callers can tell a skipped
/// call from a failed one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankingApi: Send + Sync {
    /// Obtains a bearer token and attaches it to all later requests.
    async fn authenticate(&mut self, username: &str, password: &str) -> bool;

    async fn validate_account(&self, account_id: &str) -> bool;

    async fn get_account_balance(&self, account_id: &str) -> Result<Decimal, BankingError>;

    async fn transfer_funds(
        &self,
        from_account: &str,
        to_account: &str,
        amount: Decimal,
        validate_accounts: bool,
    ) -> Result<TransferResult, BankingError>;

    /// Requires a prior successful `authenticate`.
    async fn get_transaction_history(&self) -> Result<Vec<Transaction>, BankingError>;

    async fn get_all_accounts(&self) -> Result<Vec<Account>, BankingError>;

    /// Releases the connection pool. Safe to call more than once.
    fn close(&mut self);
}

pub struct BankingClient {
    session: Session,
    config: Config,
}

impl BankingClient {
    /// Creates a client for `config`. The configuration is taken as is;
    /// check `Config::validate` first.
    pub fn new(config: Config) -> Result<Self, BankingError> {
        let session = Session::new(&config.base_url, config.timeout)?;
        info!("Banking client initialized for {}", session.base_url());
        Ok(Self { session, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    async fn request_token(&self, username: &str, password: &str) -> Result<String, BankingError> {
        let payload = AuthRequest { username, password };
        let response = self.session.post_json(&["authToken"], &payload).await?;
        let data: AuthResponse = self.session.read_json(response).await?;

        data.token
            .filter(|token| !token.is_empty())
            .ok_or(BankingError::MissingToken)
    }

    /// Fallible form of `validate_account`, keeping the server's answer.
    #[tracing::instrument(skip(self))]
    pub async fn check_account(&self, account_id: &str) -> Result<AccountValidation, BankingError> {
        if account_id.is_empty() {
            return Err(BankingError::EmptyAccountId);
        }

        let response = self
            .session
            .get(&["accounts", "validate", account_id])
            .await?;
        self.session.read_json(response).await
    }

    /// One POST to `/transfer`. HTTP errors with a JSON body become a FAILED
    /// result; everything else that goes wrong is returned as an error.
    async fn post_transfer(
        &self,
        request: &TransferRequest<'_>,
    ) -> Result<TransferResult, BankingError> {
        let response = self.session.post_json(&["transfer"], request).await?;

        match self.session.read_json::<TransferResponse>(response).await {
            Ok(data) => {
                let result = TransferResult::from_response(data, request);
                info!("Transfer completed: {}", result);
                Ok(result)
            }
            Err(BankingError::Http { status, body }) => {
                error!("Transfer failed with HTTP error {}: {}", status.as_u16(), body);

                match serde_json::from_str::<serde_json::Value>(&body) {
                    Ok(error_data) => {
                        let message = error_data
                            .get("message")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("HTTP {} error", status.as_u16()));
                        Ok(TransferResult::failed(message, request))
                    }
                    Err(_) => Err(BankingError::Http { status, body }),
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl BankingApi for BankingClient {
    #[tracing::instrument(skip(self, password))]
    async fn authenticate(&mut self, username: &str, password: &str) -> bool {
        info!("Authenticating user: {}", username);

        match self.request_token(username, password).await {
            Ok(token) => {
                self.session.set_token(token);
                info!("Authentication successful - token acquired");
                true
            }
            Err(BankingError::Http { status, .. }) => {
                error!("Authentication failed with HTTP error: {}", status.as_u16());
                false
            }
            Err(e) => {
                error!("Authentication failed: {}", e);
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn validate_account(&self, account_id: &str) -> bool {
        info!("Validating account: {}", account_id);

        match self.check_account(account_id).await {
            Ok(validation) if validation.is_valid => {
                info!("Account {} is valid", account_id);
                true
            }
            Ok(_) => {
                warn!("Account {} is invalid", account_id);
                false
            }
            Err(e) => {
                error!("Account validation failed for {}: {}", account_id, e);
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_account_balance(&self, account_id: &str) -> Result<Decimal, BankingError> {
        if account_id.is_empty() {
            return Err(BankingError::EmptyAccountId);
        }
        info!("Getting balance for account: {}", account_id);

        let result = async {
            let response = self
                .session
                .get(&["accounts", "balance", account_id])
                .await?;
            let data: BalanceResponse = self.session.read_json(response).await?;
            data.balance.ok_or(BankingError::MissingField("balance"))
        }
        .await;

        match &result {
            Ok(balance) => info!("Account {} balance: {}", account_id, balance),
            Err(e) => error!("Balance inquiry failed for {}: {}", account_id, e),
        }
        result
    }

    #[tracing::instrument(skip(self))]
    async fn transfer_funds(
        &self,
        from_account: &str,
        to_account: &str,
        amount: Decimal,
        validate_accounts: bool,
    ) -> Result<TransferResult, BankingError> {
        if amount <= Decimal::ZERO {
            error!("Invalid amount: {}. Amount must be positive.", amount);
            return Err(BankingError::InvalidAmount(amount));
        }

        // The pre-check calls are not retried; only the transfer POST is.
        if validate_accounts {
            for account in [from_account, to_account] {
                if !self.validate_account(account).await {
                    error!("Account {} validation failed, transfer aborted", account);
                    return Err(BankingError::AccountValidation(account.to_string()));
                }
            }
        }

        let request = TransferRequest {
            from_account,
            to_account,
            amount,
        };

        info!(
            "Initiating transfer: {} from {} to {}",
            amount, from_account, to_account
        );

        let result =
            with_retry(&self.config.retry, "Transfer", || self.post_transfer(&request)).await;

        if let Err(e) = &result {
            error!("Transfer request failed: {}", e);
        }
        result
    }

    #[tracing::instrument(skip(self))]
    async fn get_transaction_history(&self) -> Result<Vec<Transaction>, BankingError> {
        if !self.session.is_authenticated() {
            warn!("Token required for transaction history. Call authenticate() first.");
            return Err(BankingError::NotAuthenticated);
        }
        info!("Fetching transaction history");

        let result = async {
            let response = self.session.get(&["transactions", "history"]).await?;
            self.session.read_json::<Vec<Transaction>>(response).await
        }
        .await;

        match &result {
            Ok(transactions) => info!("Retrieved {} transactions", transactions.len()),
            Err(e) => error!("Transaction history request failed: {}", e),
        }
        result
    }

    #[tracing::instrument(skip(self))]
    async fn get_all_accounts(&self) -> Result<Vec<Account>, BankingError> {
        info!("Fetching all accounts");

        let result = async {
            let response = self.session.get(&["accounts"]).await?;
            self.session.read_json::<Vec<Account>>(response).await
        }
        .await;

        match &result {
            Ok(accounts) => info!("Retrieved {} accounts", accounts.len()),
            Err(e) => error!("Accounts request failed: {}", e),
        }
        result
    }

    fn close(&mut self) {
        self.session.close();
    }
}

impl Drop for BankingClient {
    fn drop(&mut self) {
        self.session.close();
    }
}
