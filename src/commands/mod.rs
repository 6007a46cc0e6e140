//! One handler per CLI subcommand.
//!
//! Handlers talk to the service through `BankingApi`, print human or JSON
//! output, and return `Ok(true)` on success and `Ok(false)` on a failure
//! already reported to the user. `Err` is reserved for unexpected problems.

mod accounts;
mod balance;
mod demo;
mod history;
mod transfer;
mod validate;

pub use accounts::list_accounts;
pub use balance::balance;
pub use demo::demo;
pub use history::history;
pub use transfer::{TransferArgs, transfer};
pub use validate::validate;

use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }

    pub fn is_human(self) -> bool {
        self == OutputFormat::Human
    }
}

/// Username and password for the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct FailureReport<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

/// Prints a failure in the requested format.
pub(crate) fn report_failure(
    format: OutputFormat,
    error: &str,
    detail: Option<&str>,
) -> Result<()> {
    println!("{}", render_failure(format, error, detail)?);
    Ok(())
}

fn render_failure(format: OutputFormat, error: &str, detail: Option<&str>) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(match detail {
            Some(detail) => format!("✗ {}\n  {}", error, detail),
            None => format!("✗ {}", error),
        }),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&FailureReport {
            error,
            detail,
        })?),
    }
}

/// Reports an error no handler dealt with, honouring `--json`.
pub fn report_error(format: OutputFormat, error: &anyhow::Error) {
    let detail = format!("{:#}", error);
    if let Err(e) = report_failure(format, "Error", Some(&detail)) {
        eprintln!("Error: {:#} ({:#})", error, e);
    }
}

/// Authenticates, reporting progress and failure. Returns false when the
/// caller should stop.
pub(crate) async fn login<B: crate::banking::BankingApi>(
    api: &mut B,
    credentials: &Credentials,
    format: OutputFormat,
) -> Result<bool> {
    if format.is_human() {
        println!("Authenticating as {}...", credentials.username);
    }

    if !api
        .authenticate(&credentials.username, &credentials.password)
        .await
    {
        report_failure(format, "Authentication failed", None)?;
        return Ok(false);
    }

    if format.is_human() {
        println!("✓ Authentication successful");
    }
    Ok(true)
}
