use crate::commands::{run_audit, run_evaluate, run_schemes, AuditArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_eligibility::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Eligibility Orchestrator",
    about = "Check government scheme eligibility and audit decision fairness",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate an applicant profile against every registered scheme
    Evaluate(EvaluateArgs),
    /// Run an approval-rate parity audit over a CSV of outcomes
    Audit(AuditArgs),
    /// List the scheme catalogue with benefits, thresholds, and feature order
    Schemes,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Audit(args) => run_audit(args),
        Command::Schemes => run_schemes(),
    }
}
