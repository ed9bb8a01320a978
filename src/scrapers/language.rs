// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{load_page, table, Error, ScrapeOptions, TABLE_SELECTOR};
use crate::{
    browser::Browser,
    events::{Event, EventSink},
    model::{language::LanguageRef, result::LanguageResult},
};

async fn try_scrape<B: Browser>(
    browser: &B,
    language: &LanguageRef,
    options: &ScrapeOptions,
    events: &dyn EventSink,
) -> Result<table::Extraction, Error> {
    let url = options.language_url(&language.code)?;
    events.emit(Event::LanguageStarted {
        language: language.to_string(),
        url: url.to_string(),
    });
    let page = load_page(browser, &url, TABLE_SELECTOR, options.table_wait).await?;
    table::extract_records(&page, &language.display_name, events)
}

/// Scrapes the translations page of a single language.
///
/// This never fails:
/// any error while loading or extracting is reported to `events`
/// and turned into an empty result carrying the error message.
pub async fn scrape_language<B: Browser>(
    browser: &B,
    language: &LanguageRef,
    options: &ScrapeOptions,
    events: &dyn EventSink,
) -> LanguageResult {
    match try_scrape(browser, language, options, events).await {
        Ok(extraction) => {
            let result = LanguageResult::new(
                language.clone(),
                extraction.records,
                extraction.stats,
                options.strict_status,
            );
            events.emit(Event::LanguageScraped {
                language: language.display_name.clone(),
                records: result.records().len(),
                status: result.status(),
            });
            result
        }
        Err(err) => {
            events.emit(Event::LanguageFailed {
                language: language.display_name.clone(),
                error: err.to_string(),
            });
            LanguageResult::failed(language.clone(), &err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::memory::MemoryBrowser;
    use crate::events::RecordingSink;
    use crate::model::result::Status;
    use std::time::Duration;

    const TEMPLATE: &str = "https://example.org/vis/{code}/";

    fn options() -> ScrapeOptions {
        ScrapeOptions::builder()
            .language_url_template(TEMPLATE)
            .build()
    }

    #[tokio::test]
    async fn unreachable_page_becomes_empty_result() {
        let events = RecordingSink::new();
        let language = LanguageRef::new("fr", "French", 0);
        let result =
            scrape_language(&MemoryBrowser::new(), &language, &options(), &events).await;
        assert_eq!(result.status(), Status::Empty);
        assert!(result.records().is_empty());
        assert!(result
            .error()
            .is_some_and(|err| err.contains("https://example.org/vis/fr/")));
        assert!(matches!(
            events.events().last(),
            Some(Event::LanguageFailed { language, .. }) if language == "French"
        ));
    }

    #[tokio::test]
    async fn table_without_rows_is_empty_without_error() {
        let browser = MemoryBrowser::new().with_page(
            "https://example.org/vis/es/",
            "<table><tr><th>Vaccine</th></tr></table>",
        );
        let language = LanguageRef::new("es", "Spanish", 1);
        let result = scrape_language(&browser, &language, &options(), &RecordingSink::new()).await;
        assert_eq!(result.status(), Status::Empty);
        assert_eq!(result.error(), None);
        assert_eq!(result.notes(), "No data found");
    }

    #[tokio::test]
    async fn table_wait_timeout_fails_only_that_language() {
        let browser = crate::scrapers::tests::SlowBrowser {
            delay: Duration::from_secs(5),
        };
        let options = ScrapeOptions::builder()
            .language_url_template(TEMPLATE)
            .table_wait(Duration::from_millis(50))
            .build();
        let events = RecordingSink::new();
        let language = LanguageRef::new("fr", "French", 0);
        let result = scrape_language(&browser, &language, &options, &events).await;
        assert_eq!(result.status(), Status::Empty);
        assert!(result.records().is_empty());
        assert!(result
            .error()
            .is_some_and(|err| err.starts_with("No table found on")));
        assert!(matches!(
            events.events().last(),
            Some(Event::LanguageFailed { language, .. }) if language == "French"
        ));
    }
}
