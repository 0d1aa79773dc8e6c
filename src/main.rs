use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payglobal::application::dispatcher::Dispatcher;
use payglobal::application::ledger::Ledger;
use payglobal::config::Config;
use payglobal::domain::invoice::{InvoiceInput, LineItem};
use payglobal::domain::ports::{MailTransport, OutgoingEmail, StoreBox, TransportArc};
use payglobal::domain::recipient::NewRecipient;
use payglobal::domain::reference;
use payglobal::domain::transfer::NewTransfer;
use payglobal::error::PayoutError;
use payglobal::infrastructure::in_memory::InMemoryStore;
use payglobal::infrastructure::json_file::JsonFileStore;
use payglobal::infrastructure::kv_rest::KvRestStore;
use payglobal::infrastructure::resend::ResendTransport;
use payglobal::infrastructure::stripe::BalanceProbe;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Local JSON data file (overrides DATA_PATH; ignored when a KV endpoint
    /// is configured)
    #[arg(long)]
    data_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a payee with bank details
    AddRecipient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// 2-letter country code
        #[arg(long)]
        country: String,
        #[arg(long)]
        bank_name: Option<String>,
        #[arg(long)]
        iban: Option<String>,
        #[arg(long)]
        account_number: Option<String>,
        #[arg(long)]
        routing_number: Option<String>,
        #[arg(long)]
        sort_code: Option<String>,
        #[arg(long)]
        bsb_number: Option<String>,
        #[arg(long)]
        ifsc: Option<String>,
        #[arg(long)]
        swift: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        holder: Option<String>,
    },
    /// List all recipients
    ListRecipients,
    /// Delete a recipient (past transfers keep their snapshot)
    DeleteRecipient { id: String },
    /// Record a payout and notify both parties
    Transfer {
        #[arg(long)]
        recipient: String,
        /// Major units, e.g. 120.50
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List transfers, most recent first
    ListTransfers,
    /// Confirm the money was actually sent
    MarkPaid {
        id: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Email an itemised invoice
    Invoice {
        #[arg(long)]
        to: String,
        /// Line items as JSON, e.g. '[{"description":"Design","quantity":2,"unit_price":75000}]'
        #[arg(long)]
        items: String,
        #[arg(long)]
        tax_rate: Option<Decimal>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        transfer_id: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Probe the platform's available balance
    Balance,
    /// Send a test email (kind: initiated, received, invoice)
    SendTest {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        to: String,
    },
    /// Print supported countries, currencies and bank formats
    Supported,
}

/// Placeholder transport used when no mail provider is configured; every
/// dispatch resolves to a failed outcome instead of a send.
struct DisabledTransport;

#[async_trait::async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, _email: OutgoingEmail) -> payglobal::error::Result<String> {
        Err(PayoutError::Dispatch(
            "email transport is not configured (set RESEND_API_KEY)".into(),
        ))
    }
}

fn select_store(config: &Config, data_path: Option<PathBuf>) -> StoreBox {
    if let (Some(url), Some(token)) = (&config.kv_rest_url, &config.kv_rest_token) {
        return Box::new(KvRestStore::new(url.clone(), token.clone()));
    }
    if let Some(path) = data_path.or_else(|| config.data_path.clone()) {
        return Box::new(JsonFileStore::open(path));
    }
    warn!("no KV endpoint or data file configured, using in-memory storage");
    Box::new(InMemoryStore::new())
}

fn select_transport(config: &Config) -> TransportArc {
    match &config.resend_api_key {
        Some(key) => Arc::new(ResendTransport::new(key.clone(), config.email_from.clone())),
        None => Arc::new(DisabledTransport),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).into_diagnostic()?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let store = select_store(&config, cli.data_path.clone());
    let dispatcher = Arc::new(Dispatcher::new(
        select_transport(&config),
        config.owner_email.clone(),
    ));
    let ledger = Ledger::new(store, dispatcher, &config);

    match cli.command {
        Command::AddRecipient {
            name,
            email,
            country,
            bank_name,
            iban,
            account_number,
            routing_number,
            sort_code,
            bsb_number,
            ifsc,
            swift,
            currency,
            holder,
        } => {
            let recipient = ledger
                .create_recipient(NewRecipient {
                    name: Some(name),
                    email: Some(email),
                    country: Some(country),
                    bank_name,
                    iban,
                    account_number,
                    routing_number,
                    sort_code,
                    bsb_number,
                    ifsc,
                    swift,
                    currency,
                    holder,
                    r#type: None,
                })
                .await
                .into_diagnostic()?;
            print_json(&recipient)?;
        }
        Command::ListRecipients => {
            print_json(&ledger.list_recipients().await.into_diagnostic()?)?;
        }
        Command::DeleteRecipient { id } => {
            ledger.delete_recipient(&id).await.into_diagnostic()?;
            print_json(&serde_json::json!({ "deleted": true }))?;
        }
        Command::Transfer {
            recipient,
            amount,
            currency,
            description,
        } => {
            let transfer = ledger
                .create_transfer(NewTransfer {
                    recipient_id: Some(recipient),
                    amount: Some(amount),
                    currency,
                    description,
                })
                .await
                .into_diagnostic()?;
            print_json(&transfer)?;
        }
        Command::ListTransfers => {
            print_json(&ledger.list_transfers().await.into_diagnostic()?)?;
        }
        Command::MarkPaid { id, note } => {
            let transfer = ledger
                .mark_transfer_paid(&id, note)
                .await
                .into_diagnostic()?;
            print_json(&transfer)?;
        }
        Command::Invoice {
            to,
            items,
            tax_rate,
            currency,
            transfer_id,
            notes,
        } => {
            let items: Vec<LineItem> = serde_json::from_str(&items).into_diagnostic()?;
            let outcome = ledger
                .send_invoice(InvoiceInput {
                    to: Some(to),
                    items,
                    tax_rate,
                    currency,
                    transfer_id,
                    notes,
                    sender: None,
                    recipient: None,
                    invoice_number: None,
                    due_date: None,
                })
                .await
                .into_diagnostic()?;
            print_json(&outcome)?;
        }
        Command::Balance => {
            let probe = BalanceProbe::new(config.stripe_secret_key.clone());
            let balance = probe.probe().await.into_diagnostic()?;
            print_json(&serde_json::json!({
                "mode": if config.is_live() { "live" } else { "test" },
                "balance": balance,
            }))?;
        }
        Command::SendTest { kind, to } => {
            let outcome = ledger
                .send_test_message(&kind, &to)
                .await
                .into_diagnostic()?;
            print_json(&outcome)?;
        }
        Command::Supported => {
            print_json(&reference::supported_data())?;
        }
    }

    Ok(())
}
