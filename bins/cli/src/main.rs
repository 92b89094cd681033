//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Args, Parser, Subcommand};
use commands::{
    ConfigFormatArg, run_complete, run_config_check, run_config_show, run_info, run_scan,
    run_watch,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode, pretty_json};
use sigdex_infra::LocalRunOptions;
use sigdex_shared::{ErrorEnvelope, ErrorKind};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Env var holding the `tracing` filter directive.
const LOG_FILTER_ENV: &str = "SIGDEX_LOG";
/// Prefix of every env var the CLI forwards to config loading.
const ENV_PREFIX: &str = "SIGDEX_";

#[derive(Debug, Parser)]
#[command(
    name = "sigdex",
    version,
    about = "Function-signature indexer and completion server",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by the commands that crawl.
#[derive(Debug, Args)]
struct SourceArgs {
    /// Folder to crawl (repeatable).
    #[arg(long = "root")]
    roots: Vec<PathBuf>,
    /// File treated as open in the editor (repeatable).
    #[arg(long = "file")]
    files: Vec<PathBuf>,
    /// Optional config file path (JSON/TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Partial config JSON applied over the config file.
    #[arg(long)]
    overrides_json: Option<String>,
}

impl SourceArgs {
    fn to_options(&self) -> LocalRunOptions {
        LocalRunOptions {
            roots: self.roots.clone(),
            files: self.files.clone(),
            config_path: self.config.clone(),
            overrides_json: self.overrides_json.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Run one full crawl and report what was indexed.
    Scan {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Crawl, then print completion entries for a prefix.
    Complete {
        #[command(flatten)]
        source: SourceArgs,
        /// Text typed so far.
        #[arg(long)]
        prefix: String,
        /// Buffer whose current contents provide live symbols.
        #[arg(long)]
        buffer: Option<PathBuf>,
    },
    /// Run the root-change watcher for a bounded time.
    Watch {
        #[command(flatten)]
        source: SourceArgs,
        /// How long to keep watching, in seconds.
        #[arg(long, default_value_t = 10)]
        duration_secs: u64,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective config.
    Show {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Partial config JSON applied over the file.
        #[arg(long)]
        overrides_json: Option<String>,
        /// Rendering of the effective config.
        #[arg(long, value_enum, default_value_t = ConfigFormatArg::Json)]
        format: ConfigFormatArg,
    },
    /// Validate config sources and env overrides.
    Check {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Partial config JSON applied over the file.
        #[arg(long)]
        overrides_json: Option<String>,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    match command {
        Commands::Info => run_info(mode),
        Commands::Config { command } => {
            let env = collect_scoped_env(ENV_PREFIX);
            match command {
                ConfigCommands::Show {
                    path,
                    overrides_json,
                    format,
                } => run_config_show(
                    mode,
                    &env,
                    path.as_deref(),
                    overrides_json.as_deref(),
                    *format,
                ),
                ConfigCommands::Check {
                    path,
                    overrides_json,
                } => run_config_check(mode, &env, path.as_deref(), overrides_json.as_deref()),
            }
        },
        Commands::Scan { source } => {
            tracing::debug!(roots = source.roots.len(), "running scan");
            run_scan(mode, &source.to_options())
        },
        Commands::Complete {
            source,
            prefix,
            buffer,
        } => {
            tracing::debug!(roots = source.roots.len(), prefix = %prefix, "running complete");
            run_complete(mode, &source.to_options(), prefix, buffer.as_deref())
        },
        Commands::Watch {
            source,
            duration_secs,
        } => {
            if *duration_secs == 0 {
                return Err(CliError::InvalidInput(
                    "--duration-secs must be at least 1".to_owned(),
                ));
            }
            tracing::debug!(roots = source.roots.len(), duration_secs, "running watch");
            run_watch(
                mode,
                &source.to_options(),
                Duration::from_secs(*duration_secs),
            )
        },
    }
}

/// Render a failed engine or config call as a command result.
pub(crate) fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let exit_code = ExitCode::for_envelope(error);
    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.quiet);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": {
                "code": error.code.to_string(),
                "message": error.message,
                "kind": kind_label(error.kind),
                "meta": error.metadata,
            },
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        pretty_json(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\",\"kind\":\"INVARIANT\"}}\n".to_owned()
        })
    } else {
        format_error_text(error)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code,
    }
}

const fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Expected => "EXPECTED",
        ErrorKind::Invariant => "INVARIANT",
        ErrorKind::Unexpected => "UNEXPECTED",
    }
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = format!(
        "status: error\ncode: {}\nmessage: {}\nkind: {}\n",
        error.code,
        error.message,
        kind_label(error.kind)
    );
    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

pub(crate) fn log_info(stderr: &mut String, message: &str, quiet: bool) {
    if quiet {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

fn collect_scoped_env(prefix: &str) -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(prefix))
        .collect()
}
