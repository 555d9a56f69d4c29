//! Jsonlog CLI
//!
//! Command-line interface for inspecting structured JSON log files.
//!
//! # Usage
//!
//! ```bash
//! jsonlog --help
//! jsonlog inspect server.json
//! jsonlog inspect --schema node --fail-fast server.json
//! cat server.json | jsonlog inspect --stacktraces-only
//! ```

#![deny(unsafe_code)]

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use shared::config::{ErrorPolicy, ReaderConfig, Schema};
use shared::models::LogLine;
use shared::reader::JsonLogsStream;

/// Jsonlog CLI - inspect structured JSON log files
#[derive(Parser)]
#[command(name = "jsonlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a JSON log file and print its records
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Log file to read; standard input when omitted or `-`
    path: Option<PathBuf>,

    /// Field set expected on each line
    #[arg(long, value_enum, env = "JSONLOG_SCHEMA", default_value_t = SchemaArg::Default)]
    schema: SchemaArg,

    /// Stop at the first malformed line
    #[arg(long, env = "JSONLOG_FAIL_FAST")]
    fail_fast: bool,

    /// Print only records that carry a stacktrace
    #[arg(long)]
    stacktraces_only: bool,

    /// Print each record as a JSON object instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemaArg {
    /// type, timestamp, level, component, message
    Default,
    /// default fields plus cluster.name and node.name
    Node,
}

impl From<SchemaArg> for Schema {
    fn from(value: SchemaArg) -> Self {
        match value {
            SchemaArg::Default => Schema::Default,
            SchemaArg::Node => Schema::Node,
        }
    }
}

impl InspectArgs {
    fn reader_config(&self) -> ReaderConfig {
        let policy = if self.fail_fast {
            ErrorPolicy::FailFast
        } else {
            ErrorPolicy::Report
        };
        ReaderConfig::new(self.schema.into()).with_policy(policy)
    }

    fn open(&self) -> anyhow::Result<Box<dyn BufRead>> {
        match &self.path {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }
}

/// Counts of what an inspection run saw.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    records: usize,
    with_stacktrace: usize,
    errors: usize,
}

fn inspect(
    input: impl BufRead,
    args: &InspectArgs,
    out: &mut impl Write,
) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();

    for record in JsonLogsStream::with_config(input, args.reader_config()) {
        match record.outcome {
            Ok(line) => {
                summary.records += 1;
                if line.stacktrace.is_some() {
                    summary.with_stacktrace += 1;
                } else if args.stacktraces_only {
                    continue;
                }
                if args.json {
                    writeln!(out, "{}", serde_json::to_string(&line)?)?;
                } else {
                    print_line(out, record.line_number, &line)?;
                }
            }
            // Already logged by the stream.
            Err(_) => summary.errors += 1,
        }
    }

    Ok(summary)
}

fn print_line(out: &mut impl Write, line_number: usize, line: &LogLine) -> io::Result<()> {
    writeln!(
        out,
        "{line_number}: {} {} [{}] {}",
        line.timestamp.as_deref().unwrap_or("-"),
        line.level.as_deref().unwrap_or("-"),
        line.component.as_deref().unwrap_or("-"),
        line.message.as_deref().unwrap_or(""),
    )?;
    for entry in line.stacktrace.iter().flatten() {
        writeln!(out, "    {entry}")?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => {
            let input = args.open()?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = inspect(input, &args, &mut out)?;

            tracing::info!(
                records = summary.records,
                with_stacktrace = summary.with_stacktrace,
                errors = summary.errors,
                "Inspection complete"
            );
            if summary.errors > 0 {
                bail!("{} malformed line(s)", summary.errors);
            }
        }
        None => {
            println!("Jsonlog CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{"type": "console", "timestamp": "2019-01-03T16:30:53,058+0100", "level": "ERROR", "component": "o.e.Node", "message": "failed", "stacktrace": ["E: boom", "at f(f.rs:1)"]}"#;
    const PLAIN: &str = r#"{"type": "console", "timestamp": "2019-01-03T16:30:53,058+0100", "level": "INFO", "component": "o.e.Node", "message": "started"}"#;

    fn args(extra: &[&str]) -> InspectArgs {
        let mut argv = vec!["jsonlog", "inspect"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Inspect(args)) => args,
            None => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["jsonlog"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_inspect_command() {
        let args = args(&["--schema", "node", "--fail-fast", "logs.json"]);

        assert_eq!(args.path, Some(PathBuf::from("logs.json")));
        assert_eq!(args.schema, SchemaArg::Node);
        let config = args.reader_config();
        assert_eq!(config.schema, Schema::Node);
        assert_eq!(config.policy, ErrorPolicy::FailFast);
    }

    #[test]
    fn test_cli_rejects_unknown_schema() {
        assert!(Cli::try_parse_from(["jsonlog", "inspect", "--schema", "cluster"]).is_err());
    }

    #[test]
    fn test_inspect_prints_records_and_counts_errors() {
        let input = format!("{RECORD}\nbroken\n{PLAIN}\n");
        let mut out = Vec::new();

        let summary = inspect(input.as_bytes(), &args(&[]), &mut out).unwrap();

        assert_eq!(
            summary,
            Summary {
                records: 2,
                with_stacktrace: 1,
                errors: 1
            }
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1: 2019-01-03T16:30:53,058+0100 ERROR [o.e.Node] failed"));
        assert!(text.contains("    at f(f.rs:1)"));
        assert!(text.contains("3: "));
    }

    #[test]
    fn test_inspect_stacktraces_only_json() {
        let input = format!("{PLAIN}\n{RECORD}\n");
        let mut out = Vec::new();

        inspect(input.as_bytes(), &args(&["--stacktraces-only", "--json"]), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["stacktrace"][0], "E: boom");
    }

    #[test]
    fn test_open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{PLAIN}").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let args = args(&[path.as_str()]);
        let mut out = Vec::new();
        let summary = inspect(args.open().unwrap(), &args, &mut out).unwrap();

        assert_eq!(summary.records, 1);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let args = args(&["/nonexistent/jsonlog/input.json"]);
        let err = args.open().err().unwrap();
        assert!(err.to_string().contains("failed to open"));
    }
}
