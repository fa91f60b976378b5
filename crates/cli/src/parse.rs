//! ArgMatches → CliAction conversion.
//!
//! Configuration is resolved here: the `--config` file (if any) is loaded first, then
//! scalar flags override it and list flags append to it.

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use wpmigrate_core::Strictness;
use wpmigrate_engine::{MigrateConfig, Result};

/// The result of parsing the command line.
pub enum CliAction {
    /// Check one value for serialized data.
    Detect { value: String, strictness: Strictness },
    /// Rewrite one value.
    Rewrite { value: String, config: MigrateConfig },
    /// Rewrite a whole snapshot.
    Replace {
        input: PathBuf,
        output: Option<PathBuf>,
        write_snapshot: Option<PathBuf>,
        config: MigrateConfig,
    },
    /// Split a dump file into statements.
    Split { dump: PathBuf, delimiter: String },
}

/// Convert parsed arguments into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction> {
    match matches.subcommand() {
        Some(("detect", sub)) => Ok(CliAction::Detect {
            value: required(sub, "value"),
            strictness: if sub.get_flag("lenient") {
                Strictness::Lenient
            } else {
                Strictness::Strict
            },
        }),
        Some(("rewrite", sub)) => Ok(CliAction::Rewrite {
            value: required(sub, "value"),
            config: resolve_config(sub)?,
        }),
        Some(("replace", sub)) => Ok(CliAction::Replace {
            input: PathBuf::from(required(sub, "input")),
            output: sub.get_one::<String>("output").map(PathBuf::from),
            write_snapshot: sub.get_one::<String>("write-snapshot").map(PathBuf::from),
            config: resolve_config(sub)?,
        }),
        Some(("split", sub)) => Ok(CliAction::Split {
            dump: PathBuf::from(required(sub, "dump")),
            delimiter: resolve_delimiter(sub)?,
        }),
        _ => Err(wpmigrate_engine::Error::config("no command given")),
    }
}

fn required(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn load_config(matches: &ArgMatches) -> Result<MigrateConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => MigrateConfig::from_file(Path::new(path)),
        None => Ok(MigrateConfig::default()),
    }
}

/// Load `--config` and apply the override flags on top of it.
pub fn resolve_config(matches: &ArgMatches) -> Result<MigrateConfig> {
    let mut config = load_config(matches)?;

    if let Some(prefix) = matches.get_one::<String>("wp-prefix") {
        config.wp_prefix = prefix.clone();
    }
    if let Some(limit) = matches.get_one::<usize>("select-limit") {
        config.select_limit = *limit;
    }
    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        config.delimiter = unescape(delimiter);
    }
    if let Some(pairs) = matches.get_many::<String>("find-replace") {
        for pair in pairs {
            config.add_find_replace_arg(pair)?;
        }
    }
    if let Some(pairs) = matches.get_many::<String>("domain-change") {
        for pair in pairs {
            config.add_domain_change_arg(pair)?;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Dump delimiter for `split`: `--delimiter`, else the config file's, else a newline.
fn resolve_delimiter(matches: &ArgMatches) -> Result<String> {
    let mut config = load_config(matches)?;
    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        config.delimiter = unescape(delimiter);
    }
    config.validate()?;
    Ok(config.delimiter)
}

/// Turn the escapes a shell leaves literal (`\n`, `\r`, `\t`, `\\`) into characters
pub fn unescape(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut chars = arg.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
