//! OdontoFast - oral-health risk analysis in the terminal
//!
//! Usage:
//!   odontofast                      # interactive form
//!   odontofast --input patient.json # numeric record from a file ("-" = stdin)
//!   odontofast --json ...           # machine-readable result
//!   odontofast --about              # how it works
//!
//! Environment:
//!   ODONTOFAST_MODEL_PATH    - classifier artifact (default: modelo_problema_bucal.json)
//!   ODONTOFAST_DISABLE_MODEL - force the heuristic
//!   RUST_LOG                 - log level (default: info)

use clap::Parser;
use eyre::{Result, WrapErr};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use odontofast::ui::{
    read_patient_json, render_about, render_banner, render_report, EvaluationReport, PatientForm,
};
use odontofast::{AppConfig, Evaluator, PatientAttributes, RiskEvaluator};

#[derive(Parser, Debug)]
#[command(name = "odontofast")]
#[command(version)]
#[command(about = "Predict the risk of future oral health problems")]
struct Args {
    /// Classifier artifact (overrides ODONTOFAST_MODEL_PATH)
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Skip the classifier and use the heuristic
    #[arg(long)]
    heuristic_only: bool,

    /// Read the patient record as JSON instead of asking ("-" reads stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Explain the system and exit
    #[arg(long)]
    about: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the report
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    if args.about {
        println!("{}\n", render_banner());
        println!("{}", render_about());
        return Ok(());
    }

    let mut config = AppConfig::from_env()?;
    if let Some(path) = args.model {
        config.model_path = path;
    }
    if args.heuristic_only {
        config.use_model = false;
    }
    let evaluator = Evaluator::from_config(&config);
    info!("🦷 Strategy: {}", evaluator.strategy().as_str());

    if !args.json {
        println!("{}", render_banner());
    }

    let attrs = read_attributes(args.input.as_deref())?;
    let result = evaluator.evaluate(&attrs);

    if args.json {
        let report = EvaluationReport::new(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&result));
        println!("\n---\n© OdontoFast - Predictive analysis of oral health problems");
    }

    Ok(())
}

fn read_attributes(input: Option<&str>) -> Result<PatientAttributes> {
    let attrs = match input {
        Some("-") => read_patient_json(io::stdin().lock())?,
        Some(path) => {
            let file = File::open(path).wrap_err_with(|| format!("cannot open {}", path))?;
            read_patient_json(BufReader::new(file))?
        }
        None => {
            let stdin = io::stdin();
            PatientForm::new(stdin.lock(), io::stdout()).collect()?
        }
    };
    Ok(attrs)
}
