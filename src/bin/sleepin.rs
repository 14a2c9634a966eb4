//! Sleepin CLI - Command-line interface for the Sleepin engine
//!
//! Commands:
//! - score: Score a night from JSON input or flags
//! - advice: Select advice for a stored sleep record
//! - trend: Classify recent scores
//! - task: Record a completed task against a growth state file
//! - variant: Show the character variant for a score and point total
//! - doctor: Diagnose engine and state file health

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sleepin_core::advice::detailed_advice;
use sleepin_core::growth::select_variant;
use sleepin_core::pipeline::GrowthTracker;
use sleepin_core::record::{parse_date, SleepRecord};
use sleepin_core::score::{calculate_sleep_score, score_comment, ScoreColor};
use sleepin_core::time::parse_clock_time;
use sleepin_core::trend::analyze_trend;
use sleepin_core::types::{SleepQuality, SleepScoreInput, TaskDifficulty};
use sleepin_core::{generate_advice, SleepinError, SLEEPIN_VERSION};

/// Sleepin - Sleep score and character growth engine
#[derive(Parser)]
#[command(name = "sleepin")]
#[command(version = SLEEPIN_VERSION)]
#[command(about = "Score nights, pick advice and grow your Sleepin", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a night
    Score {
        /// Input JSON file (use - for stdin). Overrides the individual flags.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Bedtime (HH:MM)
        #[arg(long, default_value = "23:00")]
        bedtime: String,

        /// Waketime (HH:MM)
        #[arg(long, default_value = "07:00")]
        waketime: String,

        /// Sleep quality: well_rested, average or shallow
        #[arg(long, default_value = "average")]
        quality: String,

        /// Number of awakenings
        #[arg(long, default_value = "0")]
        awakenings: u32,

        /// Sleep latency in minutes
        #[arg(long, default_value = "15")]
        latency: u32,

        /// Environment tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Emit the stored record for this date (YYYY-MM-DD) instead of the bare result
        #[arg(long)]
        date: Option<String>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Select advice for a stored sleep record
    Advice {
        /// Total score of the night
        #[arg(long)]
        score: u32,

        /// Sleep record JSON file (use - for stdin)
        #[arg(short, long)]
        record: PathBuf,

        /// Include detailed tips for the advice category
        #[arg(long)]
        tips: bool,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Classify recent scores (most recent first)
    Trend {
        /// Scores, most recent first
        scores: Vec<u32>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Record a completed task
    Task {
        /// Task difficulty (1-5); omitted counts as 1
        #[arg(long)]
        difficulty: Option<i64>,

        /// Growth state file, created if missing and rewritten after the update
        #[arg(long)]
        state: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Show the character variant for a score
    Variant {
        /// Latest sleep score
        #[arg(long)]
        score: Option<u32>,

        /// Growth points (ignored when --state is given)
        #[arg(long, default_value = "0")]
        points: u32,

        /// Read growth points from a state file
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Diagnose engine health and configuration
    Doctor {
        /// Check a growth state file
        #[arg(long)]
        state: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Human-readable text
    Text,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("sleepin=debug,sleepin_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sleepin=info,sleepin_core=info,warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), SleepinCliError> {
    match cli.command {
        Commands::Score {
            input,
            bedtime,
            waketime,
            quality,
            awakenings,
            latency,
            tags,
            date,
            format,
        } => {
            let score_input = match input {
                Some(path) => serde_json::from_str(&read_input(&path)?)?,
                None => SleepScoreInput {
                    bedtime: parse_clock_time(&bedtime)?,
                    waketime: parse_clock_time(&waketime)?,
                    sleep_quality: quality.parse::<SleepQuality>()?,
                    awakenings,
                    sleep_latency: latency,
                    tags: tags.into_iter().collect::<BTreeSet<_>>(),
                },
            };
            cmd_score(&score_input, date.as_deref(), &format)
        }

        Commands::Advice {
            score,
            record,
            tips,
            format,
        } => cmd_advice(score, &record, tips, &format),

        Commands::Trend { scores, format } => cmd_trend(&scores, &format),

        Commands::Task {
            difficulty,
            state,
            format,
        } => cmd_task(difficulty, &state, &format),

        Commands::Variant {
            score,
            points,
            state,
        } => cmd_variant(score, points, state.as_deref()),

        Commands::Doctor { state, json } => cmd_doctor(state.as_deref(), json),
    }
}

fn cmd_score(
    input: &SleepScoreInput,
    date: Option<&str>,
    format: &OutputFormat,
) -> Result<(), SleepinCliError> {
    let result = calculate_sleep_score(input);
    debug!(total_score = result.total_score, "scored night");

    if let Some(date) = date {
        let record = SleepRecord::from_scored(parse_date(date)?, input, &result);
        return print_serialized(&record, format, || {
            format!(
                "{}: score {} ({:.1} h)",
                record.date, result.total_score, result.total_hours
            )
        });
    }

    print_serialized(&result, format, || {
        let b = &result.breakdown;
        let mut lines = vec![
            format!(
                "Score: {} - {} [{}]",
                result.total_score,
                score_comment(result.total_score),
                ScoreColor::from_score(result.total_score).hex()
            ),
            format!("Total hours: {:.2}", result.total_hours),
        ];
        for (name, c) in [
            ("sleep time", &b.sleep_time),
            ("deep sleep", &b.deep_sleep),
            ("awakenings", &b.awakenings),
            ("latency", &b.latency),
            ("environment", &b.environment),
        ] {
            lines.push(format!(
                "  {:<12} {:>6.1} x {:.2} = {:>5.1}",
                name, c.score, c.weight, c.weighted
            ));
        }
        lines.join("\n")
    })
}

fn cmd_advice(
    score: u32,
    record_path: &Path,
    tips: bool,
    format: &OutputFormat,
) -> Result<(), SleepinCliError> {
    let record: SleepRecord = serde_json::from_str(&read_input(record_path)?)?;
    let advice = generate_advice(score, &record);
    let tip_list = if tips {
        detailed_advice(advice.category).to_vec()
    } else {
        Vec::new()
    };

    let report = AdviceReport {
        advice: &advice,
        tips: tip_list,
    };

    print_serialized(&report, format, || {
        let mut out = format!(
            "[{:?}] {}: {}",
            advice.priority,
            advice.category.as_str(),
            advice.text
        );
        for tip in &report.tips {
            out.push_str(&format!("\n  - {tip}"));
        }
        out
    })
}

fn cmd_trend(scores: &[u32], format: &OutputFormat) -> Result<(), SleepinCliError> {
    let report = analyze_trend(scores);
    print_serialized(&report, format, || report.message.clone())
}

fn cmd_task(
    difficulty: Option<i64>,
    state_path: &Path,
    format: &OutputFormat,
) -> Result<(), SleepinCliError> {
    let difficulty = difficulty.map(TaskDifficulty::new).transpose()?;

    let mut tracker = GrowthTracker::new();
    if state_path.exists() {
        tracker.load_state(&fs::read_to_string(state_path)?)?;
    } else {
        info!(path = %state_path.display(), "no growth state yet; starting at baseline");
    }

    let state = tracker.complete_task(difficulty);
    fs::write(state_path, tracker.save_state()?)?;

    print_serialized(&state, format, || {
        format!(
            "Points: {}  Level: {}  Size: {}",
            state.total_points, state.level, state.size
        )
    })
}

fn cmd_variant(
    score: Option<u32>,
    points: u32,
    state_path: Option<&Path>,
) -> Result<(), SleepinCliError> {
    let points = match state_path {
        Some(path) => {
            let mut tracker = GrowthTracker::new();
            tracker.load_state(&fs::read_to_string(path)?)?;
            tracker.state().total_points
        }
        None => points,
    };

    let variant = select_variant(score, points);
    println!(
        "{}",
        serde_json::json!({
            "quality": variant.quality,
            "stage": variant.stage,
            "file_name": variant.file_name(),
        })
    );
    Ok(())
}

fn cmd_doctor(state_path: Option<&Path>, json: bool) -> Result<(), SleepinCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("sleepin-core {}", SLEEPIN_VERSION),
    });

    if let Some(path) = state_path {
        if path.exists() {
            let check = match fs::read_to_string(path) {
                Ok(content) => {
                    let mut tracker = GrowthTracker::new();
                    match tracker.load_state(&content) {
                        Ok(()) => DoctorCheck {
                            name: "growth_state".to_string(),
                            status: CheckStatus::Ok,
                            message: format!(
                                "Growth state valid ({} points, level {})",
                                tracker.state().total_points,
                                tracker.state().level
                            ),
                        },
                        Err(e) => DoctorCheck {
                            name: "growth_state".to_string(),
                            status: CheckStatus::Error,
                            message: format!("Invalid growth state: {}", e),
                        },
                    }
                }
                Err(e) => DoctorCheck {
                    name: "growth_state".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read growth state file: {}", e),
                },
            };
            checks.push(check);
        } else {
            checks.push(DoctorCheck {
                name: "growth_state".to_string(),
                status: CheckStatus::Warning,
                message: "Growth state file does not exist (will start at baseline)".to_string(),
            });
        }
    }

    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (pass input files with --input)"
    } else {
        "stdin is a pipe (use --input - to read from it)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        version: SLEEPIN_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Sleepin Doctor Report");
        println!("=====================");
        println!("Version: {}", report.version);
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

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(SleepinCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(path: &Path) -> Result<String, SleepinCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn print_serialized<T, F>(value: &T, format: &OutputFormat, text: F) -> Result<(), SleepinCliError>
where
    T: serde::Serialize,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text()),
    }
    Ok(())
}

// Error types

#[derive(Debug)]
enum SleepinCliError {
    Io(io::Error),
    Engine(SleepinError),
    Json(serde_json::Error),
    DoctorFailed,
}

impl From<io::Error> for SleepinCliError {
    fn from(e: io::Error) -> Self {
        SleepinCliError::Io(e)
    }
}

impl From<SleepinError> for SleepinCliError {
    fn from(e: SleepinError) -> Self {
        SleepinCliError::Engine(e)
    }
}

impl From<serde_json::Error> for SleepinCliError {
    fn from(e: serde_json::Error) -> Self {
        SleepinCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SleepinCliError> for CliError {
    fn from(e: SleepinCliError) -> Self {
        match e {
            SleepinCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SleepinCliError::Engine(e) => {
                let hint = match &e {
                    SleepinError::InvalidTime(_) => "Times must be HH:MM, e.g. 22:30",
                    SleepinError::InvalidDate(_) => "Dates must be YYYY-MM-DD",
                    SleepinError::UnknownQuality(_) => {
                        "Use one of: well_rested, average, shallow"
                    }
                    SleepinError::InvalidDifficulty(_) => "Difficulty ranges from 1 to 5",
                    SleepinError::JsonError(_) => "Check JSON syntax and field names",
                };
                CliError {
                    code: "INPUT_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            SleepinCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            SleepinCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct AdviceReport<'a> {
    #[serde(flatten)]
    advice: &'a sleepin_core::Advice,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tips: Vec<&'static str>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
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
