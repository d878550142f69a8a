//! Focus CLI - Command-line interface for Synheart Focus
//!
//! Commands:
//! - process: Turn landmark frames into per-frame metrics (NDJSON out)
//! - summarize: Aggregate a recorded session into one summary
//! - config: Print the default engine configuration
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use synheart_focus::config::EngineConfig;
use synheart_focus::encoder::FeedbackEncoder;
use synheart_focus::pipeline::TrackingSession;
use synheart_focus::schema::{parse_array, parse_ndjson, FrameRecord};
use synheart_focus::topology::{REQUIRED_LANDMARKS, TOPOLOGY_ID};
use synheart_focus::{ComputeError, FOCUS_VERSION, PRODUCER_NAME};

/// Focus - On-device cognitive metrics from face landmarks
#[derive(Parser)]
#[command(name = "focus")]
#[command(author = "Synheart AI Inc")]
#[command(version = FOCUS_VERSION)]
#[command(about = "Turn face-mesh landmark frames into attention and fatigue metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process landmark frames into per-frame metrics
    Process {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Engine configuration file (JSON, partial overrides allowed)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Fail on the first invalid frame instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Emit speech feedback requests in this locale instead of raw metrics
        #[arg(long)]
        feedback_locale: Option<String>,

        /// Load rolling history from file
        #[arg(long)]
        load_history: Option<PathBuf>,

        /// Save rolling history to file after processing
        #[arg(long)]
        save_history: Option<PathBuf>,
    },

    /// Aggregate a session of landmark frames into one summary
    Summarize {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the default engine configuration
    Config,

    /// Diagnose configuration and environment
    Doctor {
        /// Check a configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
    /// JSON array of frames
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
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

fn run(cli: Cli) -> Result<(), FocusCliError> {
    match cli.command {
        Commands::Process {
            input,
            output,
            input_format,
            config,
            strict,
            feedback_locale,
            load_history,
            save_history,
        } => cmd_process(ProcessArgs {
            input: &input,
            output: &output,
            input_format,
            config: config.as_deref(),
            strict,
            feedback_locale: feedback_locale.as_deref(),
            load_history: load_history.as_deref(),
            save_history: save_history.as_deref(),
        }),
        Commands::Summarize {
            input,
            input_format,
            config,
        } => cmd_summarize(&input, input_format, config.as_deref()),
        Commands::Config => cmd_config(),
        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

struct ProcessArgs<'a> {
    input: &'a Path,
    output: &'a Path,
    input_format: InputFormat,
    config: Option<&'a Path>,
    strict: bool,
    feedback_locale: Option<&'a str>,
    load_history: Option<&'a Path>,
    save_history: Option<&'a Path>,
}

fn read_input(input: &Path) -> Result<String, FocusCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_frames(input: &Path, format: InputFormat) -> Result<Vec<FrameRecord>, FocusCliError> {
    let data = read_input(input)?;
    let frames = match format {
        InputFormat::Ndjson => parse_ndjson(&data)?,
        InputFormat::Json => parse_array(&data)?,
    };
    if frames.is_empty() {
        return Err(FocusCliError::NoFrames);
    }
    Ok(frames)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, FocusCliError> {
    match path {
        Some(path) => EngineConfig::from_file(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "configuration rejected");
            FocusCliError::Config(e)
        }),
        None => Ok(EngineConfig::default()),
    }
}

fn open_session(config: Option<&Path>) -> Result<TrackingSession, FocusCliError> {
    let config = load_config(config)?;
    Ok(TrackingSession::with_config(config)?)
}

fn cmd_process(args: ProcessArgs<'_>) -> Result<(), FocusCliError> {
    let frames = read_frames(args.input, args.input_format)?;
    let mut session = open_session(args.config)?;

    if let Some(history_path) = args.load_history {
        let history_json = fs::read_to_string(history_path)?;
        session.load_history(&history_json)?;
    }

    let encoder = FeedbackEncoder::new();
    let mut lines = Vec::with_capacity(frames.len());
    let mut skipped = 0usize;

    for (index, frame) in frames.iter().enumerate() {
        let observed_at = frame.timestamp.unwrap_or_else(chrono::Utc::now);
        let metrics = match session.try_process_at(&frame.landmarks, observed_at) {
            Ok(metrics) => metrics,
            Err(ComputeError::InvalidFrame(e)) if !args.strict => {
                debug!(frame = index, error = %e, "skipping invalid frame");
                skipped += 1;
                continue;
            }
            Err(ComputeError::InvalidFrame(e)) => {
                return Err(FocusCliError::InvalidFrame {
                    index,
                    reason: e.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let line = match args.feedback_locale {
            Some(locale) => encoder.encode_to_json(&metrics, locale)?,
            None => serde_json::to_string(&metrics)?,
        };
        lines.push(line);
    }

    info!(
        processed = lines.len(),
        skipped,
        "processed landmark frames"
    );
    if skipped > 0 {
        warn!(skipped, "invalid frames were skipped");
    }

    if let Some(history_path) = args.save_history {
        let history_json = session.save_history()?;
        fs::write(history_path, history_json)?;
    }

    let mut output_data = lines.join("\n");
    if !output_data.is_empty() {
        output_data.push('\n');
    }

    if args.output.to_string_lossy() == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(output_data.as_bytes())?;
        stdout.flush()?;
    } else {
        fs::write(args.output, output_data)?;
    }

    Ok(())
}

fn cmd_summarize(
    input: &Path,
    input_format: InputFormat,
    config: Option<&Path>,
) -> Result<(), FocusCliError> {
    let frames = read_frames(input, input_format)?;
    let mut session = open_session(config)?;

    for frame in &frames {
        let observed_at = frame.timestamp.unwrap_or_else(chrono::Utc::now);
        if let Err(e) = session.try_process_at(&frame.landmarks, observed_at) {
            debug!(error = %e, "skipping invalid frame");
        }
    }

    let summary = session.summary().ok_or(FocusCliError::NoValidFrames)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_config() -> Result<(), FocusCliError> {
    println!("{}", EngineConfig::default().to_json()?);
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), FocusCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "focus_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Focus version {}", FOCUS_VERSION),
    });

    checks.push(DoctorCheck {
        name: "topology".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} ({} landmarks required)", TOPOLOGY_ID, REQUIRED_LANDMARKS),
    });

    if let Some(config_path) = config {
        let check = if config_path.exists() {
            match EngineConfig::from_file(config_path) {
                Ok(cfg) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid ({:?} scoring, history of {} frames)",
                        cfg.scoring_model, cfg.history_capacity
                    ),
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: e.to_string(),
                },
            }
        } else {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist".to_string(),
            }
        };
        checks.push(check);
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (frames can be streamed with -i -)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: FOCUS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Focus Doctor Report");
        println!("===================");
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
        Err(FocusCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum FocusCliError {
    Io(io::Error),
    Compute(ComputeError),
    Config(ComputeError),
    Json(serde_json::Error),
    InvalidFrame { index: usize, reason: String },
    NoFrames,
    NoValidFrames,
    DoctorFailed,
}

impl From<io::Error> for FocusCliError {
    fn from(e: io::Error) -> Self {
        FocusCliError::Io(e)
    }
}

impl From<ComputeError> for FocusCliError {
    fn from(e: ComputeError) -> Self {
        match e {
            ComputeError::InvalidConfig(_) => FocusCliError::Config(e),
            other => FocusCliError::Compute(other),
        }
    }
}

impl From<serde_json::Error> for FocusCliError {
    fn from(e: serde_json::Error) -> Self {
        FocusCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<FocusCliError> for CliError {
    fn from(e: FocusCliError) -> Self {
        match e {
            FocusCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            FocusCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Each frame must be a landmark array or {\"landmarks\": [...]} record".to_string()),
            },
            FocusCliError::Config(e) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'focus config' to see the expected layout".to_string()),
            },
            FocusCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            FocusCliError::InvalidFrame { index, reason } => CliError {
                code: "INVALID_FRAME".to_string(),
                message: format!("Frame {}: {}", index, reason),
                hint: Some("Drop --strict to skip invalid frames".to_string()),
            },
            FocusCliError::NoFrames => CliError {
                code: "NO_FRAMES".to_string(),
                message: "No frames found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            FocusCliError::NoValidFrames => CliError {
                code: "NO_VALID_FRAMES".to_string(),
                message: "No frame in the input could be analyzed".to_string(),
                hint: Some(format!(
                    "Frames need at least {} landmarks with finite coordinates",
                    REQUIRED_LANDMARKS
                )),
            },
            FocusCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
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
