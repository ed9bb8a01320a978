// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Extracts translation records from the "current translations" table
//! of a language page.
//!
//! The table names its vaccines with header cells:
//! the first [`FIXED_HEADERS`] header cells are column titles,
//! and header cell `FIXED_HEADERS + k` names data row `k`.
//! Data rows are the rows with at least one data (`td`) cell.
//! Within a data row, cell 0 links the translated PDF,
//! cell 2 holds the date of the English VIS
//! and cell 3 links the English VIS.

use url::Url;

use super::{Error, TABLE_SELECTOR};
use crate::{
    browser::{Element, Page},
    events::{Event, EventSink},
    model::{
        record::{Records, TranslationRecord},
        stats::{ExtractStats, SkipReason},
    },
    tools,
};

/// Number of column-title header cells preceding the vaccine names.
pub const FIXED_HEADERS: usize = 6;

/// Rows with fewer data cells are spacers.
pub const MIN_DATA_CELLS: usize = 5;

/// Header texts that are column titles, never vaccine names.
pub const RESERVED_LABELS: [&str; 6] = [
    "Vaccine",
    "PDF View & Print",
    "Download",
    "Date of Current English VIS",
    "Current English VIS",
    "More Information",
];

const CELL_PDF: usize = 0;
const CELL_DATE: usize = 2;
const CELL_ENGLISH_VIS: usize = 3;

/// Maps data rows to the header cells naming them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    headers: Vec<String>,
}

impl HeaderLayout {
    #[must_use]
    pub const fn new(headers: Vec<String>) -> Self {
        Self { headers }
    }

    #[must_use]
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows the headers can name.
    #[must_use]
    pub fn expected_data_rows(&self) -> usize {
        self.headers.len().saturating_sub(FIXED_HEADERS)
    }

    #[must_use]
    pub fn is_consistent_with(&self, data_rows: usize) -> bool {
        self.expected_data_rows() == data_rows
    }

    /// The header text naming data row `row`,
    /// or `None` if the headers run out before that row.
    #[must_use]
    pub fn vaccine_name(&self, row: usize) -> Option<&str> {
        self.headers
            .get(row.checked_add(FIXED_HEADERS)?)
            .map(String::as_str)
    }
}

/// What one data row amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Record(TranslationRecord),
    Skipped(SkipReason),
}

/// Records of one table, keyed by vaccine name, plus row diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Records,
    pub stats: ExtractStats,
}

fn link_target<E: Element>(cell: &E, base: &Url, row: usize) -> Result<String, Error> {
    let Some(href) = cell.query("a")?.and_then(|anchor| anchor.attribute("href")) else {
        return Ok(String::new());
    };
    tools::resolve_href(base, &href).map_err(|err| Error::RowParse {
        row,
        reason: format!("invalid link '{href}': {err}"),
    })
}

/// Turns the data cells of data row `row` into a record, if possible.
pub fn extract_row<E: Element>(
    layout: &HeaderLayout,
    row: usize,
    cells: &[E],
    base: &Url,
) -> Result<RowOutcome, Error> {
    if cells.len() < MIN_DATA_CELLS {
        return Ok(RowOutcome::Skipped(SkipReason::Spacer));
    }
    let Some(vaccine_name) = layout.vaccine_name(row) else {
        return Ok(RowOutcome::Skipped(SkipReason::BeyondHeaders));
    };
    if vaccine_name.is_empty() || RESERVED_LABELS.contains(&vaccine_name) {
        return Ok(RowOutcome::Skipped(SkipReason::ReservedLabel));
    }

    let record = TranslationRecord {
        vaccine_name: vaccine_name.to_owned(),
        pdf_url: link_target(&cells[CELL_PDF], base, row)?,
        english_vis_date: cells[CELL_DATE].inner_text().trim().to_owned(),
        english_vis_url: link_target(&cells[CELL_ENGLISH_VIS], base, row)?,
    };
    if !record.is_valid() {
        return Ok(RowOutcome::Skipped(SkipReason::MissingPdf));
    }
    Ok(RowOutcome::Record(record))
}

/// Extracts all records from the first table of `page`.
///
/// Defective rows are skipped and reported to `events`;
/// only a missing table or a failing page query is an error.
/// A later row for the same vaccine replaces the earlier record.
pub fn extract_records<P: Page>(
    page: &P,
    language: &str,
    events: &dyn EventSink,
) -> Result<Extraction, Error> {
    let Some(table) = page.query_all(TABLE_SELECTOR)?.into_iter().next() else {
        return Err(Error::TableNotFound {
            url: page.url().clone(),
        });
    };

    let layout = HeaderLayout::new(
        table
            .query_all("th")?
            .iter()
            .map(|header| header.inner_text().trim().to_owned())
            .collect(),
    );

    let mut data_rows = Vec::new();
    for row in table.query_all("tr")? {
        let cells = row.query_all("td")?;
        if !cells.is_empty() {
            data_rows.push(cells);
        }
    }
    if !layout.is_consistent_with(data_rows.len()) {
        events.emit(Event::HeaderMismatch {
            language: language.to_owned(),
            headers: layout.header_count(),
            expected_data_rows: layout.expected_data_rows(),
            data_rows: data_rows.len(),
        });
    }

    let mut extraction = Extraction::default();
    for (row, cells) in data_rows.iter().enumerate() {
        extraction.stats.data_rows += 1;
        match extract_row(&layout, row, cells, page.url()) {
            Ok(RowOutcome::Record(record)) => {
                let vaccine = record.vaccine_name.clone();
                if extraction.records.insert(vaccine.clone(), record).is_some() {
                    extraction.stats.overwritten += 1;
                    events.emit(Event::RecordOverwritten {
                        language: language.to_owned(),
                        vaccine,
                    });
                }
            }
            Ok(RowOutcome::Skipped(reason)) => {
                extraction.stats.count_skip(reason);
                events.emit(Event::RowSkipped {
                    language: language.to_owned(),
                    row,
                    reason,
                });
            }
            Err(err) => {
                extraction.stats.failed_rows += 1;
                events.emit(Event::RowFailed {
                    language: language.to_owned(),
                    row,
                    error: err.to_string(),
                });
            }
        }
    }
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::http::HtmlPage;
    use crate::events::RecordingSink;

    const HEADER_ROW: &str = "<tr><th>Vaccine</th><th>PDF View &amp; Print</th>\
        <th>Download</th><th>Date of Current English VIS</th>\
        <th>Current English VIS</th><th>More Information</th></tr>";

    fn data_row(name: &str, pdf: &str, date: &str, english: &str) -> String {
        let pdf_cell = if pdf.is_empty() {
            String::new()
        } else {
            format!(r#"<a href="{pdf}">View</a>"#)
        };
        let english_cell = if english.is_empty() {
            String::new()
        } else {
            format!(r#"<a href="{english}">English</a>"#)
        };
        format!(
            "<tr><th>{name}</th><td>{pdf_cell}</td><td>Download</td>\
            <td> {date} </td><td>{english_cell}</td><td>More</td></tr>"
        )
    }

    fn page(rows: &[String]) -> HtmlPage {
        let html = format!("<table>{HEADER_ROW}{}</table>", rows.concat());
        HtmlPage::parse(
            Url::parse("https://www.immunize.org/vaccines/vis-translations/fr/").unwrap(),
            &html,
        )
    }

    #[test]
    fn header_layout_names_rows_after_fixed_headers() {
        let layout = HeaderLayout::new(
            ["a", "b", "c", "d", "e", "f", "DTaP"]
                .map(String::from)
                .to_vec(),
        );
        assert_eq!(layout.expected_data_rows(), 1);
        assert_eq!(layout.vaccine_name(0), Some("DTaP"));
        assert_eq!(layout.vaccine_name(1), None);
        assert!(!layout.is_consistent_with(2));
        assert_eq!(HeaderLayout::new(vec![]).expected_data_rows(), 0);
    }

    #[test]
    fn extracts_one_record_per_valid_row() {
        let page = page(&[
            data_row("DTaP", "/p/dtap.pdf", "1/1/2020", ""),
            data_row(
                "Hepatitis B",
                "https://cdn.example.com/hepb-fr.pdf",
                "5/12/2023",
                "/vis/hepb.pdf",
            ),
        ]);
        let events = RecordingSink::new();
        let extraction = extract_records(&page, "French", &events).unwrap();
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(
            extraction.records["DTaP"],
            TranslationRecord {
                vaccine_name: "DTaP".to_owned(),
                pdf_url: "https://www.immunize.org/p/dtap.pdf".to_owned(),
                english_vis_date: "1/1/2020".to_owned(),
                english_vis_url: String::new(),
            }
        );
        let hepb = &extraction.records["Hepatitis B"];
        assert_eq!(hepb.pdf_url, "https://cdn.example.com/hepb-fr.pdf");
        assert_eq!(hepb.english_vis_url, "https://www.immunize.org/vis/hepb.pdf");
        assert_eq!(extraction.stats.data_rows, 2);
        assert_eq!(extraction.stats.defective_rows(), 0);
        assert!(events.events().is_empty());
    }

    #[test]
    fn skips_row_beyond_headers() {
        // 7 headers but 2 data rows: the second one has no name.
        let html = format!(
            "<table>{HEADER_ROW}<tr><th>DTaP</th><td><a href=\"/a.pdf\">a</a></td>\
            <td></td><td>1/1/2020</td><td></td><td></td></tr>\
            <tr><td><a href=\"/b.pdf\">b</a></td><td></td><td>2/2/2020</td>\
            <td></td><td></td></tr></table>"
        );
        let page = HtmlPage::parse(Url::parse("https://example.org/vis/fr/").unwrap(), &html);
        let events = RecordingSink::new();
        let extraction = extract_records(&page, "French", &events).unwrap();
        assert_eq!(extraction.records.keys().collect::<Vec<_>>(), vec!["DTaP"]);
        assert_eq!(extraction.stats.beyond_headers, 1);
        let recorded = events.events();
        assert!(recorded.contains(&Event::HeaderMismatch {
            language: "French".to_owned(),
            headers: 7,
            expected_data_rows: 1,
            data_rows: 2,
        }));
        assert!(recorded.contains(&Event::RowSkipped {
            language: "French".to_owned(),
            row: 1,
            reason: SkipReason::BeyondHeaders,
        }));
    }

    #[test]
    fn reserved_label_yields_no_record() {
        let page = page(&[data_row("Download", "/p/x.pdf", "1/1/2020", "")]);
        let extraction = extract_records(&page, "French", &RecordingSink::new()).unwrap();
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.stats.reserved_labels, 1);
    }

    #[test]
    fn spacer_and_pdf_less_rows_yield_no_record() {
        let spacer = "<tr><th>Spacer</th><td colspan=\"5\"></td></tr>".to_owned();
        let page = page(&[
            spacer,
            data_row("MMR", "", "1/1/2020", "/vis/mmr.pdf"),
        ]);
        let extraction = extract_records(&page, "French", &RecordingSink::new()).unwrap();
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.stats.spacer_rows, 1);
        assert_eq!(extraction.stats.missing_pdf, 1);
    }

    #[test]
    fn later_row_wins_for_same_vaccine() {
        let page = page(&[
            data_row("Rabies", "/old.pdf", "1/1/2019", ""),
            data_row("Rabies", "/new.pdf", "1/1/2024", ""),
        ]);
        let events = RecordingSink::new();
        let extraction = extract_records(&page, "French", &events).unwrap();
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(
            extraction.records["Rabies"].pdf_url,
            "https://www.immunize.org/new.pdf"
        );
        assert_eq!(extraction.stats.overwritten, 1);
    }

    #[test]
    fn invalid_link_fails_only_its_row() {
        let page = page(&[
            data_row("Polio", "http://[::1", "1/1/2020", ""),
            data_row("Zoster", "/zoster.pdf", "1/1/2020", ""),
        ]);
        let events = RecordingSink::new();
        let extraction = extract_records(&page, "French", &events).unwrap();
        assert_eq!(extraction.records.keys().collect::<Vec<_>>(), vec!["Zoster"]);
        assert_eq!(extraction.stats.failed_rows, 1);
        assert!(events
            .events()
            .iter()
            .any(|event| matches!(event, Event::RowFailed { row: 0, .. })));
    }

    #[test]
    fn page_without_table_fails() {
        let page = HtmlPage::parse(Url::parse("https://example.org/").unwrap(), "<p>none</p>");
        let err = extract_records(&page, "French", &RecordingSink::new()).unwrap_err();
        assert!(matches!(err, Error::TableNotFound { .. }));
    }
}
