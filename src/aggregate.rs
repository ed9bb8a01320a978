// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Scrapes every discovered language and collects the results.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};

use crate::{
    browser::Browser,
    events::{Event, EventSink},
    model::{
        language::LanguageRef,
        record::Records,
        result::{LanguageResult, Status},
    },
    scrapers::{language::scrape_language, ScrapeOptions},
};

/// Run-level counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub languages: usize,
    pub succeeded: usize,
    pub partial: usize,
    pub empty: usize,
    /// Languages whose page failed to load or had no table.
    pub errors: usize,
    pub records: usize,
    /// Vaccine rows that could not be turned into records, over all languages.
    pub skipped_rows: usize,
}

impl RunSummary {
    /// Languages that produced no records.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.languages - self.succeeded - self.partial
    }
}

/// The outcome of validating all languages.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    /// Records of every language that produced any, keyed by display name.
    all_results: BTreeMap<String, Records>,
    /// One result per display name, in discovery order.
    summary: Vec<LanguageResult>,
}

impl Validation {
    /// Merges per-language results, which have to be ordered by ordinal.
    ///
    /// A result for an already seen display name replaces the earlier one
    /// but keeps its position.
    /// Records only ever replace records,
    /// so an empty duplicate does not erase data found before.
    #[must_use]
    pub fn from_results(results: Vec<LanguageResult>, events: &dyn EventSink) -> Self {
        let mut validation = Self::default();
        for result in results {
            let display_name = result.language().display_name.clone();
            if !result.records().is_empty() {
                validation
                    .all_results
                    .insert(display_name.clone(), result.records().clone());
            }
            if let Some(existing) = validation
                .summary
                .iter_mut()
                .find(|existing| existing.language().display_name == display_name)
            {
                events.emit(Event::DuplicateLanguage {
                    display_name,
                    ordinal: result.language().ordinal,
                });
                *existing = result;
            } else {
                validation.summary.push(result);
            }
        }
        validation
    }

    #[must_use]
    pub const fn all_results(&self) -> &BTreeMap<String, Records> {
        &self.all_results
    }

    #[must_use]
    pub fn summary(&self) -> &[LanguageResult] {
        &self.summary
    }

    #[must_use]
    pub fn get(&self, display_name: &str) -> Option<&LanguageResult> {
        self.summary
            .iter()
            .find(|result| result.language().display_name == display_name)
    }

    #[must_use]
    pub fn counts(&self) -> RunSummary {
        let mut counts = RunSummary {
            languages: self.summary.len(),
            ..RunSummary::default()
        };
        for result in &self.summary {
            match result.status() {
                Status::Success => counts.succeeded += 1,
                Status::Partial => counts.partial += 1,
                Status::Empty => counts.empty += 1,
            }
            if result.error().is_some() {
                counts.errors += 1;
            }
            counts.records += result.records().len();
            counts.skipped_rows += result.stats().defective_rows();
        }
        counts
    }
}

/// Scrapes all `languages`, at most `options.workers` at a time.
///
/// The scrapes share nothing but the browser;
/// results are merged in discovery order once all of them are in,
/// whatever order they completed in.
pub async fn validate_languages<B: Browser>(
    browser: &B,
    languages: &[LanguageRef],
    options: &ScrapeOptions,
    events: &dyn EventSink,
) -> Validation {
    let mut results: Vec<LanguageResult> = stream::iter(languages)
        .map(|language| scrape_language(browser, language, options, events))
        .buffer_unordered(options.workers.max(1))
        .collect()
        .await;
    results.sort_by_key(|result| result.language().ordinal);
    Validation::from_results(results, events)
}
