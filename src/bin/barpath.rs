//! Barpath CLI - Command-line interface for the bar path engine
//!
//! Commands:
//! - calculate: Calculate one set from a time,x,y CSV trace
//! - params: Print the default hyperparameters or validate a parameter file
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;

use barpath_physics::pipeline::SetProcessor;
use barpath_physics::types::{RawTimeSeries, SetReport, Vec2};
use barpath_physics::{EngineError, Hyperparameters, ENGINE_VERSION, PRODUCER_NAME};

/// Barpath - Kinematics, dynamics and rep segmentation for barbell traces
#[derive(Parser)]
#[command(name = "barpath")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Calculate bar path physics from position traces", long_about = None)]
struct Cli {
    /// Log level: off, trace, debug, info, warn, error
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate one set from a time,x,y CSV trace
    Calculate {
        /// Input CSV path with a `time,x,y` header (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Load on the bar (kg)
        #[arg(long)]
        mass: f64,

        /// Prescribed rep count (0 for no bound)
        #[arg(long, default_value = "0")]
        reps: u32,

        /// Hyperparameter JSON file (defaults when omitted)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Factor applied to x and y, e.g. 0.01 for centimetre traces
        #[arg(long, default_value = "1.0")]
        position_scale: f64,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        format: OutputFormat,
    },

    /// Print the default hyperparameters or validate a parameter file
    Params {
        /// Parameter file to validate
        #[arg(long)]
        validate: Option<PathBuf>,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check a hyperparameter file
        #[arg(long)]
        params: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
    /// Newline-delimited JSON (one rep per line)
    Ndjson,
}

/// One CSV row
#[derive(Deserialize)]
struct Sample {
    time: f64,
    x: f64,
    y: f64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), BarpathCliError> {
    match command {
        Commands::Calculate {
            input,
            output,
            mass,
            reps,
            params,
            position_scale,
            format,
        } => cmd_calculate(
            &input,
            &output,
            mass,
            reps,
            params.as_deref(),
            position_scale,
            format,
        ),

        Commands::Params { validate } => cmd_params(validate.as_deref()),

        Commands::Doctor { params, json } => cmd_doctor(params.as_deref(), json),
    }
}

fn cmd_calculate(
    input: &Path,
    output: &Path,
    mass: f64,
    reps: u32,
    params: Option<&Path>,
    position_scale: f64,
    format: OutputFormat,
) -> Result<(), BarpathCliError> {
    let processor = match params {
        Some(path) => SetProcessor::from_params_json(&fs::read_to_string(path)?)?,
        None => SetProcessor::default(),
    };

    // Read input
    let input_data = if is_std_stream(input) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let series = parse_trace(&input_data, position_scale)?;
    if series.is_empty() {
        return Err(BarpathCliError::NoSamples);
    }

    let report = processor.process(&series, mass, reps)?;
    let output_data = format_output(&report, &format)?;

    if is_std_stream(output) {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_params(validate: Option<&Path>) -> Result<(), BarpathCliError> {
    match validate {
        Some(path) => {
            let params = Hyperparameters::from_json(&fs::read_to_string(path)?)?;
            params.validate().map_err(EngineError::from)?;
            println!("Parameters valid (version {})", params.version);
        }
        None => println!("{}", Hyperparameters::default().to_json()?),
    }
    Ok(())
}

fn cmd_doctor(params: Option<&Path>, json: bool) -> Result<(), BarpathCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Engine version {}", ENGINE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "parallel".to_string(),
        status: CheckStatus::Ok,
        message: if cfg!(feature = "parallel") {
            "Multi-set calculation runs in parallel".to_string()
        } else {
            "Multi-set calculation runs sequentially (build with --features parallel)".to_string()
        },
    });

    // Check the parameter file if provided
    if let Some(params_path) = params {
        checks.push(check_params_file(params_path));
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass a file with --input)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Barpath Doctor Report");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(BarpathCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_params_file(path: &Path) -> DoctorCheck {
    let name = "params".to_string();
    if !path.exists() {
        return DoctorCheck {
            name,
            status: CheckStatus::Warning,
            message: "Parameter file does not exist".to_string(),
        };
    }

    let (status, message) = match fs::read_to_string(path) {
        Err(e) => (CheckStatus::Error, format!("Cannot read parameter file: {}", e)),
        Ok(content) => match Hyperparameters::from_json(&content) {
            Err(e) => (CheckStatus::Error, format!("Invalid parameter JSON: {}", e)),
            Ok(params) => match params.validate() {
                Err(e) => (CheckStatus::Error, e.to_string()),
                Ok(()) => (
                    CheckStatus::Ok,
                    format!(
                        "Parameters valid (version {}, order {})",
                        params.version, params.approximation_order
                    ),
                ),
            },
        },
    };
    DoctorCheck {
        name,
        status,
        message,
    }
}

// Helper functions

fn is_std_stream(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn parse_trace(data: &str, position_scale: f64) -> Result<RawTimeSeries, BarpathCliError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut time = Vec::new();
    let mut position = Vec::new();
    for row in reader.deserialize() {
        let sample: Sample = row?;
        time.push(sample.time);
        position.push(Vec2::new(sample.x * position_scale, sample.y * position_scale));
    }
    Ok(RawTimeSeries::new(time, position))
}

fn format_output(report: &SetReport, format: &OutputFormat) -> Result<String, BarpathCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(report)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for rep in &report.physics.reps {
                lines.push(serde_json::to_string(rep)?);
            }
            Ok(lines.join("\n") + "\n")
        }
    }
}

// Error types

#[derive(Debug)]
enum BarpathCliError {
    Io(io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Engine(EngineError),
    NoSamples,
    DoctorFailed,
}

impl From<io::Error> for BarpathCliError {
    fn from(e: io::Error) -> Self {
        BarpathCliError::Io(e)
    }
}

impl From<csv::Error> for BarpathCliError {
    fn from(e: csv::Error) -> Self {
        BarpathCliError::Csv(e)
    }
}

impl From<serde_json::Error> for BarpathCliError {
    fn from(e: serde_json::Error) -> Self {
        BarpathCliError::Json(e)
    }
}

impl From<EngineError> for BarpathCliError {
    fn from(e: EngineError) -> Self {
        BarpathCliError::Engine(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<BarpathCliError> for CliError {
    fn from(e: BarpathCliError) -> Self {
        match e {
            BarpathCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            BarpathCliError::Csv(e) => CliError {
                code: "CSV_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Input must be a CSV with a time,x,y header row".to_string()),
            },
            BarpathCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            BarpathCliError::Engine(e) => engine_error(e),
            BarpathCliError::NoSamples => CliError {
                code: "NO_SAMPLES".to_string(),
                message: "No samples found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            BarpathCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn engine_error(e: EngineError) -> CliError {
    let (code, hint) = match &e {
        EngineError::Config(_) => (
            "CONFIG_ERROR",
            "Run 'barpath params' to see a valid parameter set",
        ),
        EngineError::Data(_) => (
            "DATA_ERROR",
            "The trace must be uniformly sampled with increasing time",
        ),
        EngineError::Json(_) => ("JSON_ERROR", "Check JSON syntax"),
        EngineError::InvalidRepCount(_)
        | EngineError::InvalidSetCount(_)
        | EngineError::SetCountMismatch { .. } => {
            ("PRESCRIPTION_ERROR", "Check the sets and reps values")
        }
    };
    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(hint.to_string()),
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
