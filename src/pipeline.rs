// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use url::Url;

use crate::{
    aggregate::{validate_languages, Validation},
    browser::Browser,
    events::{Event, EventSink},
    scrapers::{directory::read_languages, load_page, Error, ScrapeOptions, TABLE_SELECTOR},
};

/// Discovers all languages on the index page and scrapes each of them.
///
/// Only a missing or empty directory ends the run early;
/// failures of single languages are part of the returned [`Validation`].
///
/// # Errors
///
/// - the index page could not be loaded
/// - [`Error::DirectoryNotFound`] if the language control is missing
/// - [`Error::NoLanguages`] if it lists no usable language
pub async fn run<B: Browser>(
    browser: &B,
    index_url: &Url,
    select_id: &str,
    options: &ScrapeOptions,
    events: &dyn EventSink,
) -> Result<Validation, Error> {
    events.emit(Event::IndexLoading {
        url: index_url.to_string(),
    });
    let languages = {
        let index = load_page(browser, index_url, TABLE_SELECTOR, options.table_wait).await?;
        read_languages(&index, select_id, events)?
    };
    if languages.is_empty() {
        return Err(Error::NoLanguages);
    }

    let validation = validate_languages(browser, &languages, options, events).await;
    events.emit(Event::RunFinished(validation.counts()));
    Ok(validation)
}
