// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Writes the validation summary and the consolidated table as CSV files.
//!
//! Each file is first written next to its destination
//! and then renamed into place,
//! so a failed write never leaves a truncated report behind.

use std::path::{Path, PathBuf};

use async_std::fs;
use serde::Serialize;
use thiserror::Error;

use crate::{
    aggregate::Validation,
    consolidate::ConsolidatedTable,
    events::{Event, EventSink},
    model::result::LanguageResult,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to serialize CSV: {0}")]
    Csv(#[from] csv_async::Error),
    #[error("Some I/O problem: '{0}'")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize, Debug)]
struct ValidationRow<'a> {
    #[serde(rename = "Language")]
    language: &'a str,
    #[serde(rename = "Language Value")]
    language_value: &'a str,
    #[serde(rename = "Dropdown Index")]
    dropdown_index: usize,
    #[serde(rename = "Successfully Scraped")]
    successfully_scraped: &'static str,
    #[serde(rename = "Vaccine Count")]
    vaccine_count: usize,
    #[serde(rename = "Notes")]
    notes: String,
}

impl<'a> From<&'a LanguageResult> for ValidationRow<'a> {
    fn from(result: &'a LanguageResult) -> Self {
        Self {
            language: &result.language().display_name,
            language_value: &result.language().code,
            dropdown_index: result.language().ordinal,
            successfully_scraped: if result.status().has_records() {
                "Yes"
            } else {
                "No"
            },
            vaccine_count: result.records().len(),
            notes: result.notes(),
        }
    }
}

fn async_path(path: &Path) -> &async_std::path::Path {
    async_std::path::Path::new(path.as_os_str())
}

fn temp_path(file: &Path) -> PathBuf {
    let mut temp = file.as_os_str().to_owned();
    temp.push(".temp");
    temp.into()
}

/// Renames the completely `written` temp file to `file`.
///
/// The temp file is removed if writing or renaming it failed.
async fn move_into_place(
    temp_file: &Path,
    file: &Path,
    written: Result<(), Error>,
) -> Result<(), Error> {
    let moved = match written {
        Ok(()) => fs::rename(async_path(temp_file), async_path(file))
            .await
            .map_err(Error::from),
        Err(err) => Err(err),
    };
    if moved.is_err() {
        if let Err(err) = fs::remove_file(async_path(temp_file)).await {
            tracing::debug!(
                "Failed to remove temporary file '{}': {err}",
                temp_file.display()
            );
        }
    }
    moved
}

async fn write_validation_rows(temp_file: &Path, validation: &Validation) -> Result<(), Error> {
    let temp = fs::File::create(async_path(temp_file)).await?;
    let mut writer = csv_async::AsyncSerializer::from_writer(temp);
    for result in validation.summary() {
        writer.serialize(ValidationRow::from(result)).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Writes one row per language, in discovery order.
///
/// Returns the number of rows written.
pub async fn write_validation_report(
    file: &Path,
    validation: &Validation,
) -> Result<usize, Error> {
    let temp_file = temp_path(file);
    let written = write_validation_rows(&temp_file, validation).await;
    move_into_place(&temp_file, file, written).await?;
    Ok(validation.summary().len())
}

async fn write_table_rows(temp_file: &Path, table: &ConsolidatedTable) -> Result<(), Error> {
    let temp = fs::File::create(async_path(temp_file)).await?;
    let mut writer = csv_async::AsyncWriter::from_writer(temp);
    writer.write_record(table.header()).await?;
    for row in table.rows() {
        writer.write_record(row.cells()).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Writes the consolidated table, header first.
///
/// Returns the number of vaccine rows written.
pub async fn write_consolidated_table(
    file: &Path,
    table: &ConsolidatedTable,
) -> Result<usize, Error> {
    let temp_file = temp_path(file);
    let written = write_table_rows(&temp_file, table).await;
    move_into_place(&temp_file, file, written).await?;
    Ok(table.rows().len())
}

fn report_outcome(events: &dyn EventSink, file: &Path, outcome: Result<usize, Error>) -> bool {
    match outcome {
        Ok(rows) => {
            events.emit(Event::ReportWritten {
                path: file.to_path_buf(),
                rows,
            });
            true
        }
        Err(err) => {
            events.emit(Event::ReportFailed {
                path: file.to_path_buf(),
                error: err.to_string(),
            });
            false
        }
    }
}

/// Where to write the reports.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub validation: PathBuf,
    pub consolidated: PathBuf,
}

/// Writes both reports.
///
/// A failing writer is reported to `events`
/// and does not keep the other one from writing.
/// The consolidated table is skipped if there is nothing to consolidate.
/// Returns whether all attempted writes succeeded.
pub async fn write_reports(
    paths: &ReportPaths,
    validation: &Validation,
    events: &dyn EventSink,
) -> bool {
    let mut all_ok = report_outcome(
        events,
        &paths.validation,
        write_validation_report(&paths.validation, validation).await,
    );

    let table = ConsolidatedTable::build(validation.all_results());
    if table.is_empty() {
        events.emit(Event::NothingToConsolidate);
    } else {
        all_ok &= report_outcome(
            events,
            &paths.consolidated,
            write_consolidated_table(&paths.consolidated, &table).await,
        );
    }
    all_ok
}
