//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - installs the tracing subscriber
//! - loads settings and parses CLI arguments
//! - fits the risk model once and wires it into the decision pipeline
//! - dispatches subcommands and prints reports or JSON

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{BatchArgs, BatchMode, Cli, Command, CustomerCommand, LogsArgs, ModelArgs, QuoteArgs, UnderwriteArgs};
use crate::config::Settings;
use crate::domain::{ApplicantProfile, Customer, UnderwriteApplication};
use crate::error::{AppError, DecisionError};
use crate::io::{AuditSink, CustomerStore, JsonlAuditSink, read_ndjson};
use crate::models::RiskScorer;

pub mod pipeline;

pub use pipeline::DecisionPipeline;

/// Entry point for the `insure` binary.
pub fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_filter);

    let cli = Cli::parse();
    let audit_log = cli.audit_log.clone().unwrap_or_else(|| settings.audit_log.clone());
    let customer_store = cli.customer_store.clone().unwrap_or_else(|| settings.customer_store.clone());
    info!(env = %settings.env, audit_log = %audit_log.display(), "insure starting");

    match cli.command {
        Command::Quote(args) => handle_quote(&build_pipeline(&settings, &audit_log)?, args),
        Command::Underwrite(args) => handle_underwrite(&build_pipeline(&settings, &audit_log)?, args),
        Command::Batch(args) => handle_batch(&build_pipeline(&settings, &audit_log)?, args),
        Command::Logs(args) => handle_logs(&audit_log, args),
        Command::Customer(cmd) => handle_customer(&customer_store, cmd),
        Command::Model(args) => handle_model(&settings, args),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the configured fallback filter.
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// The composition root: one fitted scorer and one sink per process.
fn build_pipeline(settings: &Settings, audit_log: &Path) -> Result<DecisionPipeline, AppError> {
    let scorer = RiskScorer::fit(settings.training)?;
    let sink: Arc<dyn AuditSink> = Arc::new(JsonlAuditSink::open(audit_log));
    Ok(DecisionPipeline::new(Arc::new(scorer), sink))
}

fn handle_quote(pipeline: &DecisionPipeline, args: QuoteArgs) -> Result<(), AppError> {
    let profile = args.to_profile()?;
    let result = pipeline.quote(&profile)?;
    if args.json {
        print_json(&result)?;
    } else {
        print!("{}", crate::report::format_quote(&profile, &result));
    }
    Ok(())
}

fn handle_underwrite(pipeline: &DecisionPipeline, args: UnderwriteArgs) -> Result<(), AppError> {
    let application = args.to_application()?;
    let result = pipeline.underwrite(&application)?;
    if args.json {
        print_json(&result)?;
    } else {
        print!("{}", crate::report::format_underwrite(&application, &result));
    }
    Ok(())
}

/// One output line per input line, in input order. Per-line failures are
/// reported inline as `{"error": ...}` and do not stop the batch.
fn handle_batch(pipeline: &DecisionPipeline, args: BatchArgs) -> Result<(), AppError> {
    let lines = match args.mode {
        BatchMode::Quote => {
            let parsed = read_ndjson::<ApplicantProfile>(&args.input)?;
            batch_lines(parsed, |items| pipeline.quote_many(items))
        }
        BatchMode::Underwrite => {
            let parsed = read_ndjson::<UnderwriteApplication>(&args.input)?;
            batch_lines(parsed, |items| pipeline.underwrite_many(items))
        }
    };
    info!(lines = lines.len(), mode = ?args.mode, "batch evaluated");
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn batch_lines<T, R: Serialize>(
    parsed: Vec<Result<T, String>>,
    evaluate: impl FnOnce(&[T]) -> Vec<Result<R, DecisionError>>,
) -> Vec<String> {
    let mut requests = Vec::new();
    let mut slots = Vec::with_capacity(parsed.len());
    for item in parsed {
        match item {
            Ok(request) => {
                slots.push(Ok(requests.len()));
                requests.push(request);
            }
            Err(message) => slots.push(Err(message)),
        }
    }

    let mut results: Vec<Option<Result<R, DecisionError>>> = evaluate(&requests).into_iter().map(Some).collect();
    slots
        .into_iter()
        .map(|slot| {
            let value = match slot {
                Ok(idx) => match results.get_mut(idx).and_then(Option::take) {
                    Some(Ok(result)) => serde_json::to_value(&result).unwrap_or_else(|e| json!({ "error": e.to_string() })),
                    Some(Err(err)) => json!({ "error": err.to_string() }),
                    None => json!({ "error": "missing result" }),
                },
                Err(message) => json!({ "error": message }),
            };
            value.to_string()
        })
        .collect()
}

fn handle_logs(audit_log: &Path, args: LogsArgs) -> Result<(), AppError> {
    let sink = JsonlAuditSink::open(audit_log);
    let events = sink.recent(args.limit)?;
    if args.json {
        for e in &events {
            println!("{}", serde_json::to_string(e).map_err(crate::error::SinkError::from)?);
        }
    } else {
        print!("{}", crate::report::format_logs(&events));
    }
    Ok(())
}

fn handle_customer(path: &Path, cmd: CustomerCommand) -> Result<(), AppError> {
    let store = CustomerStore::open(path)?;
    match cmd {
        CustomerCommand::Upsert {
            customer_id,
            name,
            email,
            phone,
        } => {
            let customer = store.upsert(Customer::new(customer_id, name, &email, phone)?)?;
            println!("{}", crate::report::format_customer(&customer));
        }
        CustomerCommand::Get { customer_id } => match store.get(&customer_id) {
            Some(customer) => println!("{}", crate::report::format_customer(&customer)),
            None => return Err(AppError::new(2, format!("Customer '{customer_id}' not found."))),
        },
    }
    Ok(())
}

fn handle_model(settings: &Settings, args: ModelArgs) -> Result<(), AppError> {
    let scorer = RiskScorer::fit(settings.training)?;
    if args.json {
        print_json(&scorer)?;
    } else {
        print!("{}", crate::report::format_model_summary(&scorer));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(4, format!("Failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::fixtures::profile;
    use crate::io::MemoryAuditSink;
    use crate::io::audit::tests::temp_path;

    #[test]
    fn batch_lines_interleave_parse_errors_and_results() {
        let sink = Arc::new(MemoryAuditSink::new());
        let pipeline = DecisionPipeline::new(Arc::new(RiskScorer::constant(0.2).unwrap()), sink);

        let bad_age = ApplicantProfile {
            age: 3,
            ..profile()
        };
        let parsed = vec![Ok(profile()), Err("line 2: expected value".to_string()), Ok(bad_age)];
        let lines = batch_lines(parsed, |items| pipeline.quote_many(items));

        assert_eq!(lines.len(), 3);
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["decision"], "auto_approve");
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["error"], "line 2: expected value");
        let third: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();
        assert!(third["error"].as_str().unwrap().contains("age"));
    }

    #[test]
    fn damaged_audit_log_still_yields_quotes() {
        let corrupt = temp_path("app-corrupt.ndjson");
        std::fs::write(&corrupt, "{\"id\":1,\"ts\":\"2025-01-02T03:04:05Z\",\"actor\":\"orchestr\n").unwrap();
        let dir = temp_path("app-audit-dir");
        std::fs::create_dir_all(&dir).unwrap();

        let settings = Settings::default();
        for path in [&corrupt, &dir] {
            let pipeline = build_pipeline(&settings, path).unwrap();
            let quote = pipeline.quote(&profile()).unwrap();
            assert!((0.0..=1.0).contains(&quote.probability_of_loss));
        }

        let _ = std::fs::remove_file(&corrupt);
        let _ = std::fs::remove_dir(&dir);
    }
}
