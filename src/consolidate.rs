// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Merges the per-language records into one wide table.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::record::Records;

pub const COL_VACCINE: &str = "Vaccine";
pub const COL_ENGLISH_VIS_DATE: &str = "Date of Current English VIS";
pub const COL_ENGLISH_VIS: &str = "Current English VIS";

#[must_use]
pub fn pdf_column(language: &str) -> String {
    format!("PDF URL ({language})")
}

/// One vaccine across all languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedRow {
    pub vaccine: String,
    pub english_vis_date: String,
    pub english_vis_url: String,
    /// One cell per language column; empty if that language lacks the vaccine.
    pub pdf_urls: Vec<String>,
}

/// Vaccines as rows, one PDF column per language.
///
/// Languages (columns) and vaccines (rows) are both sorted,
/// so the table only depends on its input, not on scraping order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedTable {
    languages: Vec<String>,
    rows: Vec<ConsolidatedRow>,
}

impl ConsolidatedTable {
    /// Builds the table from records keyed by language display name.
    ///
    /// The shared English VIS date and URL of a vaccine
    /// are each taken from the first language, in display name order,
    /// that has a non-empty value for it.
    /// Languages without records get no column.
    #[must_use]
    pub fn build(all_results: &BTreeMap<String, Records>) -> Self {
        let languages: Vec<(&String, &Records)> = all_results
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .collect();
        let vaccines: BTreeSet<&String> = languages
            .iter()
            .flat_map(|&(_, records)| records.keys())
            .collect();

        let rows = vaccines
            .into_iter()
            .map(|vaccine| {
                let mut row = ConsolidatedRow {
                    vaccine: vaccine.clone(),
                    english_vis_date: String::new(),
                    english_vis_url: String::new(),
                    pdf_urls: Vec::with_capacity(languages.len()),
                };
                for (_, records) in &languages {
                    let Some(record) = records.get(vaccine) else {
                        row.pdf_urls.push(String::new());
                        continue;
                    };
                    row.pdf_urls.push(record.pdf_url.clone());
                    if row.english_vis_date.is_empty() {
                        row.english_vis_date.clone_from(&record.english_vis_date);
                    }
                    if row.english_vis_url.is_empty() {
                        row.english_vis_url.clone_from(&record.english_vis_url);
                    }
                }
                row
            })
            .collect();

        Self {
            languages: languages
                .into_iter()
                .map(|(language, _)| language.clone())
                .collect(),
            rows,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    #[must_use]
    pub fn rows(&self) -> &[ConsolidatedRow] {
        &self.rows
    }

    /// Column names, in output order.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        [COL_VACCINE, COL_ENGLISH_VIS_DATE, COL_ENGLISH_VIS]
            .into_iter()
            .map(ToOwned::to_owned)
            .chain(self.languages.iter().map(String::as_str).map(pdf_column))
            .collect()
    }

    /// The PDF URL of `vaccine` in `language`, if there is one.
    #[must_use]
    pub fn pdf_url(&self, vaccine: &str, language: &str) -> Option<&str> {
        let column = self.languages.iter().position(|lang| lang == language)?;
        let row = self.rows.iter().find(|row| row.vaccine == vaccine)?;
        Some(row.pdf_urls[column].as_str()).filter(|url| !url.is_empty())
    }
}

impl ConsolidatedRow {
    /// Cells in the column order of [`ConsolidatedTable::header`].
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        [
            self.vaccine.as_str(),
            self.english_vis_date.as_str(),
            self.english_vis_url.as_str(),
        ]
        .into_iter()
        .chain(self.pdf_urls.iter().map(String::as_str))
    }
}
