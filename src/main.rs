use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::info;

use eligibility_engine::config::AppConfig;
use eligibility_engine::eligibility::{
    AuxiliaryData, EligibilityService, InMemoryProgramCatalog, InMemoryVulnerabilityStore,
    PersonAttributes, ProgramDefinition, VulnerabilityCalculator,
};
use eligibility_engine::error::AppError;
use eligibility_engine::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Eligibility Scoring Engine",
    about = "Evaluate social program eligibility and vulnerability from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a person's eligibility for a program
    Evaluate(EvaluateArgs),
    /// Compute a person's vulnerability score
    Vulnerability(VulnerabilityArgs),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// JSON document describing the program and its rules
    #[arg(long)]
    program: PathBuf,
    /// JSON document with person attributes and auxiliary data
    #[arg(long)]
    person: PathBuf,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Pretty-print the resulting record
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct VulnerabilityArgs {
    /// JSON document with person attributes and auxiliary data
    #[arg(long)]
    person: PathBuf,
    /// Calculation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Pretty-print the resulting score
    #[arg(long)]
    pretty: bool,
}

/// Input document pairing registry attributes with caller-supplied data.
#[derive(Debug, Deserialize)]
struct PersonDocument {
    person: PersonAttributes,
    #[serde(default)]
    auxiliary: AuxiliaryData,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    match cli.command {
        Command::Evaluate(args) => run_evaluate(args, &config),
        Command::Vulnerability(args) => run_vulnerability(args, &config),
    }
}

fn run_evaluate(args: EvaluateArgs, config: &AppConfig) -> Result<(), AppError> {
    let definition: ProgramDefinition = read_document(&args.program)?;
    let document: PersonDocument = read_document(&args.person)?;
    let program_id = definition.snapshot.program_id.clone();

    info!(
        program = %definition.snapshot.code,
        rules = definition.rules.len(),
        "program document loaded"
    );

    let service = EligibilityService::new(
        Arc::new(InMemoryProgramCatalog::new(vec![definition])),
        Arc::new(InMemoryVulnerabilityStore::default()),
        config.scoring.engine_config(),
        config.scoring.vulnerability_config(),
    );

    let record = service.evaluate(
        &document.person,
        &document.auxiliary,
        &program_id,
        resolve_now(args.as_of),
    )?;

    print_json(&record, args.pretty)?;
    Ok(())
}

fn run_vulnerability(args: VulnerabilityArgs, config: &AppConfig) -> Result<(), AppError> {
    let document: PersonDocument = read_document(&args.person)?;

    let calculator = VulnerabilityCalculator::new(config.scoring.vulnerability_config());
    let score = calculator.calculate(
        &document.person,
        &document.auxiliary,
        resolve_now(args.as_of).date_naive(),
    );

    print_json(&score, args.pretty)?;
    Ok(())
}

fn read_document<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

fn resolve_now(as_of: Option<NaiveDate>) -> DateTime<Utc> {
    match as_of {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
