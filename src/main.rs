use clap::{Parser, Subcommand, ValueEnum};
use epay::application::gateway::TransactionGateway;
use epay::config::Config;
use epay::domain::ports::ApiBox;
use epay::domain::transaction::{Transaction, TransactionId};
use epay::infrastructure::soap::SoapApi;
use epay::interfaces::csv::transaction_writer::TransactionWriter;
use epay::interfaces::record::TransactionRecord;
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::io;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for the transaction
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show a transaction
    Show { id: u64 },
    /// Capture the authorized amount of a transaction
    Capture { id: u64 },
    /// Credit (refund) an amount of a captured transaction
    Credit { id: u64, amount: Decimal },
    /// Delete an authorized transaction
    Delete { id: u64 },
}

impl Command {
    fn id(&self) -> TransactionId {
        match self {
            Command::Show { id }
            | Command::Capture { id }
            | Command::Credit { id, .. }
            | Command::Delete { id } => TransactionId(*id),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().into_diagnostic()?;

    let soap = SoapApi::new(config.credentials(), config.timeout).into_diagnostic()?;
    let api: ApiBox = Box::new(soap);
    let gateway = TransactionGateway::with_endpoint(api, config.soap_url.clone());

    let id = cli.command.id();
    let mut transaction = gateway.find(id).await.into_diagnostic()?;

    let accepted = match cli.command {
        Command::Show { .. } => true,
        Command::Capture { .. } => gateway.capture(&mut transaction).await.into_diagnostic()?,
        Command::Credit { amount, .. } => gateway
            .credit(&mut transaction, amount)
            .await
            .into_diagnostic()?,
        Command::Delete { .. } => gateway.delete(&mut transaction).await.into_diagnostic()?,
    };

    write_transaction(&transaction, cli.format)?;

    if !accepted {
        return Err(miette!("The gateway declined the action on transaction {id}"));
    }
    Ok(())
}

fn write_transaction(transaction: &Transaction, format: Format) -> Result<()> {
    let stdout = io::stdout();
    match format {
        Format::Csv => {
            let mut writer = TransactionWriter::new(stdout.lock());
            writer.write_transaction(transaction).into_diagnostic()?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &TransactionRecord::from(transaction))
                .into_diagnostic()?;
            println!();
        }
    }
    Ok(())
}
