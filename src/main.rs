// SPDX-FileCopyrightText: 2021-2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

mod cli;

use std::path::PathBuf;

use clap::{crate_name, ArgMatches};
use cli_utils::BoxResult;
use vis_scraper::{
    aggregate::Validation,
    browser::http::HttpBrowser,
    events::TracingSink,
    pipeline, report,
    settings::{self, Overrides},
};

use cli_utils::logging;
use tracing::instrument;
use tracing_subscriber::filter::LevelFilter;

#[allow(clippy::print_stdout)]
fn print_version_and_exit(quiet: bool) {
    if !quiet {
        print!("{} ", clap::crate_name!());
    }
    println!("{}", vis_scraper::VERSION);
    std::process::exit(0);
}

#[allow(clippy::print_stdout)]
fn print_detailed_results(validation: &Validation) {
    println!("\n=== DETAILED RESULTS ===");
    for result in validation.summary() {
        let mark = if result.status().has_records() {
            "✅"
        } else {
            "❌"
        };
        println!(
            "{mark} {}: {} vaccines",
            result.language().display_name,
            result.records().len()
        );
    }
}

fn overrides(args: &ArgMatches) -> Overrides {
    Overrides {
        config_file: args.get_one::<PathBuf>(cli::A_L_CONFIG).cloned(),
        workers: args.get_one::<usize>(cli::A_L_WORKERS).copied(),
        strict_status: args.get_flag(cli::A_L_STRICT_STATUS).then_some(true),
        validation_report: args.get_one::<PathBuf>(cli::A_L_VALIDATION_REPORT).cloned(),
        consolidated_report: args
            .get_one::<PathBuf>(cli::A_L_CONSOLIDATED_REPORT)
            .cloned(),
    }
}

#[tokio::main]
#[instrument]
async fn main() -> BoxResult<()> {
    let log_reload_handle = logging::setup(crate_name!())?;
    let args = cli::args_matcher().get_matches();

    let quiet = args.get_flag(cli::A_L_QUIET);
    let version = args.get_flag(cli::A_L_VERSION);
    if version {
        print_version_and_exit(quiet);
    }

    let verbose = args.get_flag(cli::A_L_VERBOSE);

    let log_level = if verbose {
        LevelFilter::TRACE
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    logging::set_log_level_tracing(&log_reload_handle, log_level)?;

    let run_settings = settings::load(&overrides(&args))?;
    let browser = HttpBrowser::new(
        &run_settings.user_agent,
        run_settings.retries,
        run_settings.timeout(),
        run_settings.request_period(),
    )?;
    let events = TracingSink;

    let validation = pipeline::run(
        &browser,
        &run_settings.index_url()?,
        &run_settings.language_select_id,
        &run_settings.scrape_options(),
        &events,
    )
    .await?;

    let reports_ok =
        report::write_reports(&run_settings.report_paths(), &validation, &events).await;

    if !quiet {
        print_detailed_results(&validation);
    }

    if !reports_ok {
        return Err("Failed to write some of the reports".into());
    }
    Ok(())
}
