//! wpmigrate CLI: find and replace across a WordPress database dump.
//!
//! Subcommands:
//! - **detect**: does a value look like serialized data
//! - **rewrite**: apply the configured rules to one value
//! - **replace**: rewrite every table of a JSON snapshot, optionally emitting `UPDATE`s
//! - **split**: print the statements of a dump file

mod commands;
mod format;
mod parse;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use wpmigrate_core::is_serialized_with;
use wpmigrate_engine::{
    IssueLog, Location, MemoryStore, MigrateConfig, Result, StatementLog, StatementSplitter,
    ValueRewriter,
};

use commands::build_cli;
use format::{format_detect, format_error, format_rewrite, format_run, OutputMode};
use parse::{matches_to_action, CliAction};

fn main() {
    let matches = build_cli().get_matches();
    let sub = matches.subcommand().map(|(_, sub)| sub).unwrap_or(&matches);

    let mode = if sub.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if let Err(e) = init_tracing(sub.get_one::<String>("log").map(Path::new)) {
        eprintln!("Failed to open log file: {}", e);
        process::exit(1);
    }

    let result = matches_to_action(&matches).and_then(|action| run(action, mode));
    if let Err(e) = result {
        eprintln!("{}", format_error(&e, mode));
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`), and mirror into `log` if given.
fn init_tracing(log: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = match log {
        Some(path) => {
            let file = File::create(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn run(action: CliAction, mode: OutputMode) -> Result<()> {
    match action {
        CliAction::Detect { value, strictness } => {
            println!("{}", format_detect(is_serialized_with(value.as_bytes(), strictness), mode));
            Ok(())
        }
        CliAction::Rewrite { value, config } => run_rewrite(&value, &config, mode),
        CliAction::Replace {
            input,
            output,
            write_snapshot,
            config,
        } => run_replace(&input, output.as_deref(), write_snapshot.as_deref(), &config, mode),
        CliAction::Split { dump, delimiter } => run_split(&dump, &delimiter),
    }
}

fn run_rewrite(value: &str, config: &MigrateConfig, mode: OutputMode) -> Result<()> {
    let strategies = config.strategies()?;
    let mut issues = IssueLog::new();
    let at = Location::new("-", "-", "-");
    let rewritten = ValueRewriter::new(strategies.rules())
        .rewrite_text(value.as_bytes(), &at, &mut issues)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
    println!("{}", format_rewrite(value, rewritten.as_deref(), &issues, mode));
    Ok(())
}

fn run_replace(
    input: &Path,
    output: Option<&Path>,
    write_snapshot: Option<&Path>,
    config: &MigrateConfig,
    mode: OutputMode,
) -> Result<()> {
    let store = MemoryStore::load(input)?;
    let mut migrator = config.migrator()?;
    let mut logged = StatementLog::new(store);
    let summary = migrator.find_and_replace(&mut logged)?;
    let (store, statements) = logged.into_parts();

    if let Some(path) = output {
        let mut out = BufWriter::new(File::create(path)?);
        for statement in &statements {
            out.write_all(statement.as_bytes())?;
            out.write_all(config.delimiter.as_bytes())?;
        }
        out.flush()?;
        info!(
            target: "wpmigrate::cli",
            path = %path.display(),
            statements = statements.len(),
            "Wrote update statements"
        );
    }
    if let Some(path) = write_snapshot {
        store.save(path)?;
    }

    println!("{}", format_run(&summary, migrator.issues(), mode));
    Ok(())
}

fn run_split(dump: &Path, delimiter: &str) -> Result<()> {
    let splitter = StatementSplitter::new(File::open(dump)?, delimiter)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    for statement in splitter {
        writeln!(out, "{}", statement?)?;
        count += 1;
    }
    out.flush()?;
    eprintln!("{} statements", count);
    Ok(())
}
