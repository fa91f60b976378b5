//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("wpmigrate")
        .about("Find and replace across a WordPress database without breaking serialized data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILE")
                .help("Also write log output to FILE (truncated at start)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_detect())
        .subcommand(build_rewrite())
        .subcommand(build_replace())
        .subcommand(build_split())
}

fn config_file_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_name("FILE")
        .help("Configuration file (default: none)")
}

/// Flags shared by every command that builds a rule set.
fn config_args(cmd: Command) -> Command {
    cmd.arg(config_file_arg())
    .arg(
        Arg::new("wp-prefix")
            .long("wp-prefix")
            .value_name("PREFIX")
            .help("WordPress table prefix (default: wp_)"),
    )
    .arg(
        Arg::new("select-limit")
            .long("select-limit")
            .value_name("N")
            .value_parser(clap::value_parser!(usize))
            .help("Rows fetched per page (default: 100)"),
    )
    .arg(
        Arg::new("delimiter")
            .long("delimiter")
            .value_name("D")
            .help("Statement delimiter for dump files and UPDATE output (default: newline)"),
    )
    .arg(
        Arg::new("find-replace")
            .long("find-replace")
            .value_name("\"FIND => REPLACE\"")
            .action(ArgAction::Append)
            .help("Literal replacement, may be repeated"),
    )
    .arg(
        Arg::new("domain-change")
            .long("domain-change")
            .value_name("\"REMOTE => LOCAL\"")
            .action(ArgAction::Append)
            .help("Site move as remote_domain/path => local_domain/path, may be repeated"),
    )
}

fn build_detect() -> Command {
    Command::new("detect")
        .about("Check whether a value looks like serialized data")
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .help("Do not require the value to end with ';' or '}'")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("value").required(true).help("Value to check"))
}

fn build_rewrite() -> Command {
    config_args(
        Command::new("rewrite")
            .about("Apply the configured rules to a single value")
            .arg(Arg::new("value").required(true).help("Value to rewrite")),
    )
}

fn build_replace() -> Command {
    config_args(
        Command::new("replace")
            .about("Run find and replace over every table of a JSON snapshot")
            .arg(
                Arg::new("input")
                    .long("input")
                    .short('i')
                    .value_name("SNAPSHOT")
                    .required(true)
                    .help("Snapshot to read"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .value_name("SQL")
                    .help("Write an UPDATE statement per changed row to SQL"),
            )
            .arg(
                Arg::new("write-snapshot")
                    .long("write-snapshot")
                    .value_name("PATH")
                    .help("Write the rewritten snapshot to PATH"),
            ),
    )
}

fn build_split() -> Command {
    Command::new("split")
        .about("Print the statements of a dump file, one per line")
        .arg(config_file_arg())
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .value_name("D")
                .help("Statement delimiter (default: from --config, else newline)"),
        )
        .arg(Arg::new("dump").required(true).help("Dump file to read"))
}
