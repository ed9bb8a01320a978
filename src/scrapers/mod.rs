// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Duration;

use thiserror::Error;
use typed_builder::TypedBuilder;
use url::Url;

use crate::browser::{self, Browser, Page};
use crate::tools;

pub mod directory;
pub mod language;
pub mod table;

pub const TABLE_SELECTOR: &str = "table";

const DEFAULT_TABLE_WAIT: Duration = Duration::from_secs(30);

/// Thrown when scraping the directory or a language page failed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not find the language selection control with id '{0}'")]
    DirectoryNotFound(String),
    #[error("The language selection control lists no usable languages")]
    NoLanguages,
    #[error("Failed to build the page URL for language '{code}': {source}")]
    InvalidPageUrl {
        code: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to load page '{url}': {source}")]
    PageLoad {
        url: Url,
        #[source]
        source: browser::Error,
    },
    #[error("No table found on '{url}'")]
    TableNotFound { url: Url },
    #[error("Failed to parse row {row}: {reason}")]
    RowParse { row: usize, reason: String },
    #[error("Failed to query the page: {0}")]
    Query(#[from] browser::Error),
}

/// How the language pages are addressed and scraped.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ScrapeOptions {
    /// URL of a language page, with `{code}` as placeholder for the language code.
    #[builder(setter(into))]
    pub language_url_template: String,
    /// Upper bound for waiting on a table to appear on a page.
    #[builder(default = DEFAULT_TABLE_WAIT)]
    pub table_wait: Duration,
    /// Maximum number of languages scraped at the same time.
    #[builder(default = 1)]
    pub workers: usize,
    /// Report languages with defective rows as partial.
    #[builder(default = false)]
    pub strict_status: bool,
}

impl ScrapeOptions {
    pub fn language_url(&self, code: &str) -> Result<Url, Error> {
        tools::fill_template(&self.language_url_template, code).map_err(|source| {
            Error::InvalidPageUrl {
                code: code.to_owned(),
                source,
            }
        })
    }
}

/// Loads a page and waits (at most `wait`) for `selector` to appear on it.
///
/// # Errors
///
/// - [`Error::PageLoad`] if the page could not be loaded
/// - [`Error::TableNotFound`] if `selector` did not show up in time
pub async fn load_page<B: Browser>(
    browser: &B,
    url: &Url,
    selector: &str,
    wait: Duration,
) -> Result<B::Page, Error> {
    let page = browser
        .navigate(url)
        .await
        .map_err(|source| Error::PageLoad {
            url: url.clone(),
            source,
        })?;
    let found = tokio::time::timeout(wait, page.wait_for_selector(selector, wait))
        .await
        .unwrap_or(Ok(false))?;
    if !found {
        return Err(Error::TableNotFound { url: url.clone() });
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{
        http::{HtmlElement, HtmlPage},
        memory::MemoryBrowser,
    };
    use async_trait::async_trait;

    /// Serves a page that has a table,
    /// but only reports it after `delay`.
    pub(super) struct SlowBrowser {
        pub(super) delay: Duration,
    }

    pub(super) struct SlowPage {
        inner: HtmlPage,
        delay: Duration,
    }

    #[async_trait(?Send)]
    impl Browser for SlowBrowser {
        type Page = SlowPage;

        async fn navigate(&self, url: &Url) -> Result<Self::Page, browser::Error> {
            Ok(SlowPage {
                inner: HtmlPage::parse(url.clone(), "<table><tr><td>x</td></tr></table>"),
                delay: self.delay,
            })
        }
    }

    #[async_trait(?Send)]
    impl Page for SlowPage {
        type Element<'a> = HtmlElement<'a>;

        fn url(&self) -> &Url {
            self.inner.url()
        }

        async fn wait_for_selector(
            &self,
            selector: &str,
            timeout: Duration,
        ) -> Result<bool, browser::Error> {
            tokio::time::sleep(self.delay).await;
            self.inner.wait_for_selector(selector, timeout).await
        }

        fn query_all(&self, selector: &str) -> Result<Vec<Self::Element<'_>>, browser::Error> {
            self.inner.query_all(selector)
        }
    }

    #[test]
    fn builds_language_url() {
        let options = ScrapeOptions::builder()
            .language_url_template("https://www.immunize.org/vaccines/vis-translations/{code}/")
            .build();
        assert_eq!(
            options.language_url("fr").unwrap().as_str(),
            "https://www.immunize.org/vaccines/vis-translations/fr/"
        );
        assert_eq!(options.workers, 1);
        assert_eq!(options.table_wait, Duration::from_secs(30));
    }

    #[test]
    fn rejects_unparsable_template() {
        let options = ScrapeOptions::builder()
            .language_url_template("not a url/{code}")
            .build();
        let err = options.language_url("fr").unwrap_err();
        assert!(matches!(err, Error::InvalidPageUrl { .. }));
    }

    #[tokio::test]
    async fn missing_page_is_a_load_failure() {
        let browser = MemoryBrowser::new();
        let url = Url::parse("https://example.org/vis/xx/").unwrap();
        let err = load_page(&browser, &url, TABLE_SELECTOR, Duration::from_secs(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::PageLoad { .. }));
    }

    #[tokio::test]
    async fn page_without_table_is_table_not_found() {
        let browser = MemoryBrowser::new().with_page("https://example.org/vis/xx/", "<p>soon</p>");
        let url = Url::parse("https://example.org/vis/xx/").unwrap();
        let err = load_page(&browser, &url, TABLE_SELECTOR, Duration::from_secs(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::TableNotFound { .. }));
    }

    #[tokio::test]
    async fn table_appearing_too_late_is_table_not_found() {
        let browser = SlowBrowser {
            delay: Duration::from_secs(5),
        };
        let url = Url::parse("https://example.org/vis/xx/").unwrap();
        let started = std::time::Instant::now();
        let err = load_page(&browser, &url, TABLE_SELECTOR, Duration::from_millis(50))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::TableNotFound { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn table_appearing_in_time_is_found() {
        let browser = SlowBrowser {
            delay: Duration::from_millis(10),
        };
        let url = Url::parse("https://example.org/vis/xx/").unwrap();
        let page = load_page(&browser, &url, TABLE_SELECTOR, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(page.url(), &url);
    }
}
