use clap::Parser;
use payout_builder::{
    batch::{BatchPipeline, TransactionBuilder},
    config::{self, Config},
    eligibility::{EligibilityChecker, TrustlineChecker},
    error::PayoutError,
    history::build_history_index,
    input,
    ledger::{HorizonClient, Ledger, RetryPolicy},
};
use std::sync::Arc;
use tracing::info;

/// Build unsigned payout transactions for offline signing
#[derive(Parser, Debug)]
#[command(name = "payout-builder", version)]
struct Cli {
    /// Sequence number of the first transaction
    #[arg(long, default_value_t = 0)]
    sequence_number: i64,

    /// The input csv file (destination,amount,reference per line)
    #[arg(long, default_value = "payout_info.csv")]
    payouts_file: String,

    /// The output file to send around; `-` for stdout
    #[arg(long, default_value = "payouts_to_sign.txt")]
    output_file: String,

    /// Whether trustlines should be checked for destinations
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    check_trust: bool,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Override the Horizon URL from the configuration
    #[arg(long)]
    horizon_url: Option<String>,

    /// Give up on a request after this many retries of server errors
    #[arg(long)]
    max_retries: Option<u32>,
}

/// The main entry point for the payout builder.
///
/// Resolves all configuration up front, builds the history index of the
/// issuing account, then runs the payout list through the batch pipeline.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so envelopes can be written to stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(config::log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();
    let start_sequence = config::starting_sequence(cli.sequence_number)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(url) = cli.horizon_url {
        config.ledger.horizon_url = url;
    }
    if cli.max_retries.is_some() {
        config.ledger.max_retries = cli.max_retries;
    }
    config.validate()?;
    info!("Payout builder starting with config: {:?}", config);

    // Malformed input must fail before anything is queried or written.
    let records = input::read_records(&cli.payouts_file)?;
    info!("Read {} payout records from {}", records.len(), cli.payouts_file);

    let client = HorizonClient::new(&config.ledger.horizon_url, config.ledger.request_timeout())?;
    let ledger: Arc<dyn Ledger> = Arc::new(client);
    let retry = RetryPolicy::new(config.ledger.retry_backoff(), config.ledger.max_retries);

    let builder = TransactionBuilder::new(&config)?;
    let issuer = builder.source().to_string();

    let history = build_history_index(ledger.as_ref(), &issuer, config.ledger.page_limit, &retry)
        .await
        .map_err(PayoutError::HistoryQuery)?;
    info!("Got a list of all memos");

    let eligibility = if cli.check_trust {
        EligibilityChecker::Trustline(TrustlineChecker::new(
            ledger.clone(),
            &config.asset()?,
            retry,
        ))
    } else {
        EligibilityChecker::Disabled
    };
    info!("Destination check: {}", eligibility.name());

    let mut output = input::open_output(&cli.output_file)?;
    let mut pipeline = BatchPipeline::new(history, eligibility, builder);
    let summary = pipeline.run(&records, start_sequence, &mut output).await?;

    info!(
        "Wrote {} envelopes to {} ({} skipped); next sequence number is {}",
        summary.emitted,
        cli.output_file,
        summary.skipped(),
        summary.next_sequence
    );

    Ok(())
}
