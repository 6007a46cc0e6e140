use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome reported by the server for a transfer.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferStatus::Success => write!(f, "SUCCESS"),
            TransferStatus::Failed => write!(f, "FAILED"),
            TransferStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Result of one transfer attempt. Immutable once built.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TransferResult {
    transaction_id: Option<String>,
    status: TransferStatus,
    message: String,
    from_account: String,
    to_account: String,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

impl TransferResult {
    pub fn new(
        transaction_id: Option<String>,
        status: TransferStatus,
        message: impl Into<String>,
        from_account: &str,
        to_account: &str,
        amount: Decimal,
    ) -> Self {
        Self {
            transaction_id,
            status,
            message: message.into(),
            from_account: from_account.to_string(),
            to_account: to_account.to_string(),
            amount,
        }
    }

    /// Builds the result from a successful response body.
    pub(crate) fn from_response(
        response: TransferResponse,
        request: &TransferRequest<'_>,
    ) -> Self {
        Self::new(
            response.transaction_id,
            response.status.unwrap_or(TransferStatus::Unknown),
            response.message.unwrap_or_default(),
            request.from_account,
            request.to_account,
            request.amount,
        )
    }

    /// A rejected transfer: no transaction id, status FAILED.
    pub(crate) fn failed(message: impl Into<String>, request: &TransferRequest<'_>) -> Self {
        Self::new(
            None,
            TransferStatus::Failed,
            message,
            request.from_account,
            request.to_account,
            request.amount,
        )
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == TransferStatus::Success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn from_account(&self) -> &str {
        &self.from_account
    }

    pub fn to_account(&self) -> &str {
        &self.to_account
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl std::fmt::Display for TransferResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transfer {}: {} from {} to {} (ID: {})",
            self.status,
            self.amount,
            self.from_account,
            self.to_account,
            self.transaction_id.as_deref().unwrap_or("none")
        )
    }
}

/// An account as listed by `GET /accounts`. Unknown fields are kept verbatim.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A transaction history entry. Unknown fields are kept verbatim.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Answer of `GET /accounts/validate/{id}`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountValidation {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize, Debug)]
pub(crate) struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BalanceResponse {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferRequest<'a> {
    pub from_account: &'a str,
    pub to_account: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferResponse {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub status: Option<TransferStatus>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TransferRequest<'static> {
        TransferRequest {
            from_account: "ACC1000",
            to_account: "ACC1001",
            amount: Decimal::new(10000, 2),
        }
    }

    #[test]
    fn test_transfer_status_parsing() {
        let status: TransferStatus = serde_json::from_str(r#""SUCCESS""#).unwrap();
        assert_eq!(status, TransferStatus::Success);

        let status: TransferStatus = serde_json::from_str(r#""FAILED""#).unwrap();
        assert_eq!(status, TransferStatus::Failed);

        let status: TransferStatus = serde_json::from_str(r#""PENDING""#).unwrap();
        assert_eq!(status, TransferStatus::Unknown);
    }

    #[test]
    fn test_transfer_request_wire_format() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fromAccount": "ACC1000",
                "toAccount": "ACC1001",
                "amount": 100.0
            })
        );
    }

    #[test]
    fn test_transfer_result_from_minimal_response() {
        let response: TransferResponse = serde_json::from_str("{}").unwrap();
        let result = TransferResult::from_response(response, &request());

        assert_eq!(result.status(), TransferStatus::Unknown);
        assert_eq!(result.message(), "");
        assert_eq!(result.transaction_id(), None);
        assert_eq!(result.amount(), Decimal::new(100, 0));
    }

    #[test]
    fn test_transfer_result_display() {
        let result = TransferResult::new(
            Some("txn-1".to_string()),
            TransferStatus::Success,
            "ok",
            "ACC1000",
            "ACC1001",
            Decimal::new(25050, 2),
        );
        assert_eq!(
            result.to_string(),
            "Transfer SUCCESS: 250.50 from ACC1000 to ACC1001 (ID: txn-1)"
        );

        let failed = TransferResult::failed("Insufficient funds", &request());
        assert!(!failed.is_success());
        assert!(failed.to_string().ends_with("(ID: none)"));
    }

    #[test]
    fn test_account_keeps_unknown_fields() {
        let account: Account = serde_json::from_str(
            r#"{"accountId": "ACC1000", "accountType": "CHECKING", "status": "ACTIVE", "owner": "alice"}"#,
        )
        .unwrap();

        assert_eq!(account.account_id.as_deref(), Some("ACC1000"));
        assert_eq!(account.account_type.as_deref(), Some("CHECKING"));
        assert_eq!(account.extra.get("owner"), Some(&Value::from("alice")));

        let echoed = serde_json::to_value(&account).unwrap();
        assert_eq!(echoed["accountId"], "ACC1000");
        assert_eq!(echoed["owner"], "alice");
    }

    #[test]
    fn test_transaction_amount() {
        let txn: Transaction =
            serde_json::from_str(r#"{"transactionId": "txn-9", "amount": 42.5, "fromAccount": "ACC1000"}"#)
                .unwrap();
        assert_eq!(txn.transaction_id.as_deref(), Some("txn-9"));
        assert_eq!(txn.amount, Some(Decimal::new(425, 1)));
        assert!(txn.extra.contains_key("fromAccount"));

        let txn: Transaction = serde_json::from_str(r#"{"transactionId": "txn-10"}"#).unwrap();
        assert_eq!(txn.amount, None);
    }

    #[test]
    fn test_account_validation_defaults_to_invalid() {
        let validation: AccountValidation =
            serde_json::from_str(r#"{"accountId": "ACC2000"}"#).unwrap();
        assert!(!validation.is_valid);
    }
}
