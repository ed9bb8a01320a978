// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Structured diagnostics emitted by the pipeline.
//!
//! Every component receives an [`EventSink`] explicitly,
//! instead of logging through process-wide state.
//! Events never influence what is scraped.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::{
    aggregate::RunSummary,
    model::{language::LanguageRef, result::Status, stats::SkipReason},
};

/// Attributes of a `select` element, reported when the directory is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    IndexLoading {
        url: String,
    },
    DirectoryFound {
        options: usize,
    },
    DirectoryMissing {
        select_id: String,
        selects: Vec<SelectInfo>,
    },
    OptionSkipped {
        ordinal: usize,
    },
    LanguageDiscovered(LanguageRef),
    DuplicateLanguage {
        display_name: String,
        ordinal: usize,
    },
    LanguageStarted {
        language: String,
        url: String,
    },
    HeaderMismatch {
        language: String,
        headers: usize,
        expected_data_rows: usize,
        data_rows: usize,
    },
    RowSkipped {
        language: String,
        row: usize,
        reason: SkipReason,
    },
    RowFailed {
        language: String,
        row: usize,
        error: String,
    },
    RecordOverwritten {
        language: String,
        vaccine: String,
    },
    LanguageScraped {
        language: String,
        records: usize,
        status: Status,
    },
    LanguageFailed {
        language: String,
        error: String,
    },
    RunFinished(RunSummary),
    NothingToConsolidate,
    ReportWritten {
        path: PathBuf,
        rows: usize,
    },
    ReportFailed {
        path: PathBuf,
        error: String,
    },
}

/// Receives the structured events of a run.
pub trait EventSink {
    fn emit(&self, event: Event);
}

/// Forwards events to [`tracing`], at a level fitting each event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        match event {
            Event::IndexLoading { url } => tracing::info!("Navigating to {url} ..."),
            Event::DirectoryFound { options } => {
                tracing::info!("Found {options} language options in the directory");
            }
            Event::DirectoryMissing { select_id, selects } => {
                tracing::error!("Could not find select element with id='{select_id}'");
                tracing::info!("Found {} select elements on the page", selects.len());
                for (index, select) in selects.iter().enumerate() {
                    tracing::info!(
                        "Select {index}: id='{}', name='{}', class='{}'",
                        select.id.as_deref().unwrap_or_default(),
                        select.name.as_deref().unwrap_or_default(),
                        select.class.as_deref().unwrap_or_default()
                    );
                }
            }
            Event::OptionSkipped { ordinal } => {
                tracing::warn!("Option {ordinal}: empty value or text");
            }
            Event::LanguageDiscovered(language) => {
                tracing::info!(
                    "Option {}: value='{}', text='{}'",
                    language.ordinal,
                    language.code,
                    language.display_name
                );
            }
            Event::DuplicateLanguage {
                display_name,
                ordinal,
            } => tracing::warn!(
                "Language '{display_name}' is listed more than once; option {ordinal} replaces earlier results"
            ),
            Event::LanguageStarted { language, url } => {
                tracing::info!("Scraping translations for {language} from {url} ...");
            }
            Event::HeaderMismatch {
                language,
                headers,
                expected_data_rows,
                data_rows,
            } => tracing::warn!(
                "{language}: {headers} header cells name {expected_data_rows} vaccine rows, but the table has {data_rows} data rows"
            ),
            Event::RowSkipped {
                language,
                row,
                reason,
            } => tracing::debug!("{language}: skipping row {row} ({reason})"),
            Event::RowFailed {
                language,
                row,
                error,
            } => tracing::warn!("Error processing row {row} for {language}: {error}"),
            Event::RecordOverwritten { language, vaccine } => {
                tracing::debug!("{language}: a later row replaces the record for '{vaccine}'");
            }
            Event::LanguageScraped {
                language,
                records,
                status,
            } => {
                if status.has_records() {
                    tracing::info!("{language}: scraped {records} vaccines ({status})");
                } else {
                    tracing::warn!("{language}: no data scraped");
                }
            }
            Event::LanguageFailed { language, error } => {
                tracing::error!("Error scraping {language}: {error}");
            }
            Event::RunFinished(summary) => {
                tracing::info!("=== VALIDATION SUMMARY ===");
                tracing::info!("Total languages in dropdown: {}", summary.languages);
                tracing::info!(
                    "Successfully scraped: {}",
                    summary.succeeded + summary.partial
                );
                if summary.partial > 0 {
                    tracing::info!("  of which partially: {}", summary.partial);
                }
                tracing::info!("Failed to scrape: {}", summary.failed());
                if summary.errors > 0 {
                    tracing::info!("  of which with errors: {}", summary.errors);
                }
                tracing::info!("Total vaccine records: {}", summary.records);
                if summary.skipped_rows > 0 {
                    tracing::info!("Skipped vaccine rows: {}", summary.skipped_rows);
                }
            }
            Event::NothingToConsolidate => tracing::warn!("No data to save"),
            Event::ReportWritten { path, rows } => {
                tracing::info!("Wrote {rows} rows to '{}'", path.display());
            }
            Event::ReportFailed { path, error } => {
                tracing::error!("Failed to write '{}': {error}", path.display());
            }
        }
    }
}

/// Keeps all events in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
