//! Command-line parsing for the `insure` binary.
//!
//! Argument parsing lives here; dispatch lives in `app`, and none of the
//! scoring/pricing/rules code depends on clap beyond the `Gender` value enum.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{ApplicantProfile, Gender, UnderwriteApplication};
use crate::error::AppError;
use crate::io::read_json;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "insure", version, about = "Motor insurance quote and underwriting engine")]
pub struct Cli {
    /// Audit/feedback NDJSON file (overrides INSURE_AUDIT_LOG).
    #[arg(long, global = true, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Customer store JSON file (overrides INSURE_CUSTOMER_STORE).
    #[arg(long, global = true, value_name = "PATH")]
    pub customer_store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score, price and pre-decide an applicant.
    Quote(QuoteArgs),
    /// Final bind-time decision for an applicant and requested coverage.
    Underwrite(UnderwriteArgs),
    /// Evaluate an NDJSON file of requests in parallel (one JSON result per line).
    Batch(BatchArgs),
    /// List recent audit/feedback events, newest first.
    Logs(LogsArgs),
    /// Customer store access.
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Print the fitted risk model summary.
    Model(ModelArgs),
}

/// Applicant either from a JSON file or from individual flags.
#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    /// Read the request from a JSON file instead of flags.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["customer_id", "age", "vehicle_value", "prior_claims", "credit_score", "gender"])]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub customer_id: Option<String>,

    #[arg(long)]
    pub age: Option<i32>,

    #[arg(long)]
    pub vehicle_value: Option<f64>,

    #[arg(long)]
    pub prior_claims: Option<i32>,

    #[arg(long)]
    pub credit_score: Option<i32>,

    #[arg(long, value_enum)]
    pub gender: Option<Gender>,
}

impl ProfileArgs {
    /// Assemble a profile from flags. Range checks happen in the pipeline.
    pub fn profile_from_flags(&self) -> Result<ApplicantProfile, AppError> {
        Ok(ApplicantProfile {
            customer_id: required(self.customer_id.clone(), "--customer-id")?,
            age: required(self.age, "--age")?,
            vehicle_value: required(self.vehicle_value, "--vehicle-value")?,
            prior_claims: required(self.prior_claims, "--prior-claims")?,
            credit_score: required(self.credit_score, "--credit-score")?,
            gender: self.gender,
        })
    }
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl QuoteArgs {
    pub fn to_profile(&self) -> Result<ApplicantProfile, AppError> {
        match &self.profile.input {
            Some(path) => read_json(path),
            None => self.profile.profile_from_flags(),
        }
    }
}

#[derive(Debug, Args)]
pub struct UnderwriteArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    #[arg(long, conflicts_with = "input")]
    pub requested_coverage: Option<f64>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl UnderwriteArgs {
    pub fn to_application(&self) -> Result<UnderwriteApplication, AppError> {
        match &self.profile.input {
            Some(path) => read_json(path),
            None => Ok(UnderwriteApplication {
                profile: self.profile.profile_from_flags()?,
                requested_coverage: required(self.requested_coverage, "--requested-coverage")?,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BatchMode {
    Quote,
    Underwrite,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// NDJSON file, one request object per line.
    #[arg(long, value_name = "NDJSON")]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = BatchMode::Quote)]
    pub mode: BatchMode,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Print events as NDJSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// Insert or replace a customer record.
    Upsert {
        #[arg(long)]
        customer_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Look up a customer by id.
    Get {
        #[arg(long)]
        customer_id: String,
    },
}

#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::new(2, format!("Missing {flag} (or pass --input <JSON>).")))
}
