use anyhow::{Result, bail};
use bankcli::banking::{BankingApi, BankingClient};
use bankcli::commands::{self, Credentials, OutputFormat, TransferArgs};
use bankcli::config::Config;
use bankcli::runtime::RealRuntime;
use clap::{CommandFactory, Parser};
use log::error;
use rust_decimal::Decimal;
use std::process::ExitCode;
use std::time::Duration;

/// Exit code reported when the user interrupts a command.
const EXIT_INTERRUPTED: u8 = 130;

/// bankcli - command-line client for the banking service
///
/// Transfer funds, validate accounts, check balances, list accounts and
/// fetch transaction history.
///
/// Defaults can be set through BANKING_API_URL, BANKING_API_TIMEOUT,
/// BANKING_USERNAME, BANKING_PASSWORD, BANKING_MAX_RETRIES and
/// BANKING_LOG_LEVEL.
#[derive(Parser, Debug)]
#[command(author, version = env!("BANKCLI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// API base URL (defaults to BANKING_API_URL or http://localhost:8123)
    #[arg(long, value_name = "URL", global = true)]
    url: Option<String>,

    /// Request timeout in seconds (defaults to BANKING_API_TIMEOUT or 30)
    #[arg(long, value_name = "SECONDS", global = true)]
    timeout: Option<u64>,

    /// Show progress logs
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Transfer funds between accounts
    Transfer(TransferCommand),

    /// Validate an account
    Validate(AccountArgs),

    /// Get account balance
    Balance(AccountArgs),

    /// List all accounts
    ListAccounts,

    /// Get transaction history (requires authentication)
    History(CredentialArgs),

    /// Run a walkthrough of all features
    Demo,
}

#[derive(clap::Args, Debug)]
struct TransferCommand {
    /// Source account ID
    #[arg(long = "from", short = 'f', value_name = "ACCOUNT")]
    from_account: String,

    /// Destination account ID
    #[arg(long = "to", short = 't', value_name = "ACCOUNT")]
    to_account: String,

    /// Amount to transfer
    #[arg(long, short = 'a', allow_negative_numbers = true)]
    amount: Decimal,

    /// Authenticate before transferring
    #[arg(long)]
    auth: bool,

    /// Validate both accounts before transferring
    #[arg(long)]
    validate: bool,

    #[command(flatten)]
    credentials: CredentialArgs,
}

#[derive(clap::Args, Debug)]
struct AccountArgs {
    /// Account ID
    #[arg(long, short = 'a', value_name = "ACCOUNT")]
    account: String,
}

#[derive(clap::Args, Debug)]
struct CredentialArgs {
    /// Username for authentication (defaults to BANKING_USERNAME or admin)
    #[arg(long, short = 'u')]
    username: Option<String>,

    /// Password for authentication (defaults to BANKING_PASSWORD or password)
    #[arg(long, short = 'p')]
    password: Option<String>,
}

impl CredentialArgs {
    /// Flags win; anything missing comes from the configured defaults.
    fn resolve(&self, config: &Config) -> Credentials {
        Credentials::new(
            self.username
                .clone()
                .unwrap_or_else(|| config.default_username.clone()),
            self.password
                .clone()
                .unwrap_or_else(|| config.default_password.clone()),
        )
    }
}

fn default_credentials(config: &Config) -> Credentials {
    Credentials::new(&config.default_username, &config.default_password)
}

/// Environment first, then command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_environment(&RealRuntime)?;
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = Duration::from_secs(timeout);
    }

    if !config.validate() {
        bail!(
            "Invalid configuration: the API URL must be an absolute http(s) URL and the timeout must be positive"
        );
    }
    Ok(config)
}

fn init_logging(verbose: bool, config: &Config) {
    let level = if verbose { "info" } else { config.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Runs one command with a client that is closed however the command ends.
async fn run(command: Commands, config: Config, format: OutputFormat) -> Result<bool> {
    let mut client = BankingClient::new(config.clone())?;
    let outcome = dispatch(&mut client, command, &config, format).await;
    client.close();
    outcome
}

async fn dispatch<B: BankingApi>(
    api: &mut B,
    command: Commands,
    config: &Config,
    format: OutputFormat,
) -> Result<bool> {
    match command {
        Commands::Transfer(args) => {
            let transfer = TransferArgs {
                credentials: args.auth.then(|| args.credentials.resolve(config)),
                from_account: args.from_account,
                to_account: args.to_account,
                amount: args.amount,
                validate_accounts: args.validate,
            };
            commands::transfer(api, &transfer, format).await
        }
        Commands::Validate(args) => commands::validate(api, &args.account, format).await,
        Commands::Balance(args) => commands::balance(api, &args.account, format).await,
        Commands::ListAccounts => commands::list_accounts(api, format).await,
        Commands::History(args) => {
            commands::history(api, &args.resolve(config), format).await
        }
        Commands::Demo => commands::demo(api, &default_credentials(config)).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut cli = Cli::parse();

    let Some(command) = cli.command.take() else {
        // No subcommand: show usage and exit cleanly.
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, &config);
    let format = OutputFormat::from_json_flag(cli.json);

    tokio::select! {
        outcome = run(command, config, format) => match outcome {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                error!("Command failed: {:#}", e);
                commands::report_error(format, &e);
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            println!("\n\nOperation cancelled by user");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}
