use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payretry::application::orchestrator::{RetryOptions, RetryOrchestrator};
use payretry::domain::payment::PaymentRequest;
use payretry::domain::validation::validate;
use payretry::infrastructure::simulated::{
    DEFAULT_FAILURE_RATE, DEFAULT_LATENCY_MS, SimulatedGateway, SimulatorConfig,
};
use payretry::infrastructure::timer::TokioSleeper;
use payretry::interfaces::json::request_reader::RequestReader;
use payretry::interfaces::json::response::{Health, Rejection, ServiceInfo, TransactionLookup};
use payretry::interfaces::json::response_writer::ResponseWriter;
use payretry::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, telemetry};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Exit code for a request rejected by validation.
const EXIT_INVALID: u8 = 2;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "PAYRETRY_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a payment request without submitting it
    Validate {
        /// JSON request file. Reads stdin when omitted or "-".
        input: Option<PathBuf>,
    },
    /// Validate and submit a payment, retrying transient gateway failures
    Submit(SubmitArgs),
    /// Print service information
    Info,
    /// Report service liveness
    Health,
    /// Look up a transaction by id
    Status {
        /// Transaction id returned by a previous submission
        transaction_id: String,
    },
}

#[derive(Args)]
struct SubmitArgs {
    /// JSON request file. Reads stdin when omitted or "-".
    input: Option<PathBuf>,

    /// Retries allowed after the first attempt
    #[arg(long, env = "PAYRETRY_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Base backoff delay in milliseconds, doubled after each failure
    #[arg(long, env = "PAYRETRY_RETRY_DELAY_MS", default_value_t = DEFAULT_RETRY_DELAY_MS)]
    retry_delay_ms: u64,

    /// Fraction of simulated gateway calls that time out
    #[arg(long, env = "PAYRETRY_FAILURE_RATE", default_value_t = DEFAULT_FAILURE_RATE)]
    failure_rate: f64,

    /// Simulated gateway latency in milliseconds
    #[arg(long, env = "PAYRETRY_LATENCY_MS", default_value_t = DEFAULT_LATENCY_MS)]
    latency_ms: u64,

    /// Seed for the simulated gateway, for reproducible runs
    #[arg(long, env = "PAYRETRY_SEED")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);

    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());

    match cli.command {
        Command::Validate { input } => {
            let request = read_request(input.as_deref())?;
            let validation = validate(request.as_ref());
            writer.write(&validation).into_diagnostic()?;
            Ok(exit_code(validation.is_valid, EXIT_INVALID))
        }
        Command::Submit(args) => {
            let request = read_request(args.input.as_deref())?;
            let validation = validate(request.as_ref());
            let Some(request) = request.filter(|_| validation.is_valid) else {
                writer
                    .write(&Rejection::new(validation.errors))
                    .into_diagnostic()?;
                return Ok(ExitCode::from(EXIT_INVALID));
            };

            let gateway = SimulatedGateway::new(SimulatorConfig {
                failure_rate: args.failure_rate,
                latency: Duration::from_millis(args.latency_ms),
                seed: args.seed,
            })
            .into_diagnostic()?;
            let orchestrator = RetryOrchestrator::new(Box::new(gateway), Box::new(TokioSleeper));

            let options = RetryOptions::new(args.max_retries, args.retry_delay_ms);
            let outcome = orchestrator
                .process_with_retry(request, options)
                .await
                .into_diagnostic()?;

            writer.write(&outcome).into_diagnostic()?;
            Ok(exit_code(outcome.is_success(), 1))
        }
        Command::Info => {
            writer.write(&ServiceInfo::current()).into_diagnostic()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            writer.write(&Health::healthy()).into_diagnostic()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Status { transaction_id } => {
            writer
                .write(&TransactionLookup::new(transaction_id))
                .into_diagnostic()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_request(input: Option<&Path>) -> Result<Option<PaymentRequest>> {
    match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).into_diagnostic()?;
            RequestReader::new(file).read().into_diagnostic()
        }
        _ => RequestReader::new(io::stdin().lock()).read().into_diagnostic(),
    }
}

fn exit_code(success: bool, failure_code: u8) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(failure_code)
    }
}
