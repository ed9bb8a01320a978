// SPDX-FileCopyrightText: 2021-2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use clap::{command, value_parser, Arg, ArgAction, Command, ValueHint};
use const_format::formatcp;
use std::path::PathBuf;

pub const A_L_CONFIG: &str = "config";
pub const A_S_CONFIG: char = 'c';
pub const A_L_WORKERS: &str = "workers";
pub const A_S_WORKERS: char = 'w';
pub const A_L_STRICT_STATUS: &str = "strict-status";
pub const A_S_STRICT_STATUS: char = 's';
pub const A_L_VALIDATION_REPORT: &str = "validation-report";
pub const A_L_CONSOLIDATED_REPORT: &str = "consolidated-report";
pub const A_L_VERSION: &str = "version";
pub const A_S_VERSION: char = 'V';
pub const A_L_VERBOSE: &str = "verbose";
pub const A_S_VERBOSE: char = 'v';
pub const A_L_QUIET: &str = "quiet";
pub const A_S_QUIET: char = 'q';

fn arg_config() -> Arg {
    Arg::new(A_L_CONFIG)
        .help("Settings file to use instead of ./vis-scraper.{yml,toml,json}")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
        .value_name("FILE")
        .short(A_S_CONFIG)
        .long(A_L_CONFIG)
        .action(ArgAction::Set)
}

fn arg_workers() -> Arg {
    Arg::new(A_L_WORKERS)
        .help("Maximum number of language pages scraped at the same time")
        .num_args(1)
        .value_parser(value_parser!(usize))
        .value_name("NUM")
        .short(A_S_WORKERS)
        .long(A_L_WORKERS)
        .action(ArgAction::Set)
}

fn arg_strict_status() -> Arg {
    Arg::new(A_L_STRICT_STATUS)
        .help("Report languages with skipped or failed rows as partial successes")
        .short(A_S_STRICT_STATUS)
        .long(A_L_STRICT_STATUS)
        .action(ArgAction::SetTrue)
}

fn arg_validation_report() -> Arg {
    Arg::new(A_L_VALIDATION_REPORT)
        .help("Where to write the per-language validation report (CSV)")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
        .value_name("FILE")
        .long(A_L_VALIDATION_REPORT)
        .action(ArgAction::Set)
}

fn arg_consolidated_report() -> Arg {
    Arg::new(A_L_CONSOLIDATED_REPORT)
        .help("Where to write the consolidated table of all languages (CSV)")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
        .value_name("FILE")
        .long(A_L_CONSOLIDATED_REPORT)
        .action(ArgAction::Set)
}

fn arg_version() -> Arg {
    Arg::new(A_L_VERSION)
        .help(formatcp!(
            "Print version information and exit. \
May be combined with -{A_S_QUIET},--{A_L_QUIET}, \
to really only output the version string."
        ))
        .short(A_S_VERSION)
        .long(A_L_VERSION)
        .action(ArgAction::SetTrue)
}

fn arg_verbose() -> Arg {
    Arg::new(A_L_VERBOSE)
        .help("More verbose log output; useful for debugging")
        .short(A_S_VERBOSE)
        .long(A_L_VERBOSE)
        .action(ArgAction::SetTrue)
}

fn arg_quiet() -> Arg {
    Arg::new(A_L_QUIET)
        .help("Minimize or suppress output to stdout")
        .long_help("Only log warnings and errors, and do not print the detailed results.")
        .short(A_S_QUIET)
        .long(A_L_QUIET)
        .action(ArgAction::SetTrue)
        .conflicts_with(A_L_VERBOSE)
}

#[must_use]
pub fn args_matcher() -> Command {
    command!()
        .about(clap::crate_description!())
        .bin_name(clap::crate_name!())
        .help_expected(true)
        .disable_version_flag(true)
        .args([
            arg_config(),
            arg_workers(),
            arg_strict_status(),
            arg_validation_report(),
            arg_consolidated_report(),
            arg_version(),
            arg_verbose(),
            arg_quiet(),
        ])
}
