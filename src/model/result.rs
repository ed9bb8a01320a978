// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use strum::{AsRefStr, Display};

use super::{language::LanguageRef, record::Records, stats::ExtractStats};

/// Outcome of scraping one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Status {
    /// No valid record was produced.
    Empty,
    /// Records were produced, but some vaccine rows were defective.
    /// Only reported with the strict status policy.
    Partial,
    Success,
}

impl Status {
    /// Derives the status from what the extraction produced.
    ///
    /// Without `strict`, this only depends on whether there is any record.
    #[must_use]
    pub const fn derive(records: usize, stats: &ExtractStats, strict: bool) -> Self {
        if records == 0 {
            Self::Empty
        } else if strict && stats.defective_rows() > 0 {
            Self::Partial
        } else {
            Self::Success
        }
    }

    #[must_use]
    pub const fn has_records(self) -> bool {
        match self {
            Self::Empty => false,
            Self::Partial | Self::Success => true,
        }
    }
}

/// Everything scraped for a single language.
///
/// Created once per language and run,
/// never mutated after the scraper returned it.
#[derive(Debug, Clone)]
pub struct LanguageResult {
    language: LanguageRef,
    records: Records,
    status: Status,
    error: Option<String>,
    stats: ExtractStats,
}

impl LanguageResult {
    #[must_use]
    pub fn new(
        language: LanguageRef,
        records: Records,
        stats: ExtractStats,
        strict: bool,
    ) -> Self {
        let status = Status::derive(records.len(), &stats, strict);
        Self {
            language,
            records,
            status,
            error: None,
            stats,
        }
    }

    /// A language whose page could not be loaded or had no table.
    #[must_use]
    pub fn failed<E: ToString>(language: LanguageRef, error: &E) -> Self {
        Self {
            language,
            records: Records::new(),
            status: Status::Empty,
            error: Some(error.to_string()),
            stats: ExtractStats::default(),
        }
    }

    #[must_use]
    pub const fn language(&self) -> &LanguageRef {
        &self.language
    }

    #[must_use]
    pub const fn records(&self) -> &Records {
        &self.records
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn stats(&self) -> &ExtractStats {
        &self.stats
    }

    /// Free-text remark for the validation report.
    #[must_use]
    pub fn notes(&self) -> String {
        match (self.status, &self.error) {
            (Status::Success, _) => "Data found".to_owned(),
            (Status::Partial, _) => match self.stats.defective_rows() {
                1 => "Data found (1 row skipped)".to_owned(),
                skipped => format!("Data found ({skipped} rows skipped)"),
            },
            (Status::Empty, Some(err)) => format!("Error: {err}"),
            (Status::Empty, None) => "No data found".to_owned(),
        }
    }
}
