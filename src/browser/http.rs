// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Loads server-rendered pages over HTTP and queries them with CSS selectors.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::{header, Client};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{Browser, Element, Error, Page};

pub type RL = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::QuantaClock,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
>;

fn parse_selector(selector: &str) -> Result<Selector, Error> {
    Selector::parse(selector).map_err(|err| Error::InvalidSelector {
        selector: selector.to_owned(),
        reason: err.to_string(),
    })
}

/// Creates a new HTTP client with the supplied retry and timeout settings.
/// @param retries Number of retries for a single fetch
/// @param timeout Total timeout per request
fn create_downloader(
    user_agent: &str,
    retries: u32,
    timeout: Duration,
) -> Result<ClientWithMiddleware, Error> {
    let mut headers = header::HeaderMap::new();
    if let Ok(user_agent_val) = header::HeaderValue::from_str(user_agent) {
        headers.insert(header::USER_AGENT, user_agent_val);
    } else {
        tracing::warn!("Ignoring invalid user agent '{user_agent}'");
    }
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("text/html,application/xhtml+xml"),
    );
    let client = Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()?;
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(retries);
    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Fetches pages with plain HTTP requests.
///
/// The target pages are rendered on the server,
/// so a page is quiet as soon as its body is downloaded.
pub struct HttpBrowser {
    downloader: Arc<ClientWithMiddleware>,
    rate_limiter: Option<Arc<RL>>,
}

impl HttpBrowser {
    /// @param request_period Minimum time between two page loads;
    ///   zero disables rate limiting
    pub fn new(
        user_agent: &str,
        retries: u32,
        timeout: Duration,
        request_period: Duration,
    ) -> Result<Self, Error> {
        let downloader = Arc::new(create_downloader(user_agent, retries, timeout)?);
        let rate_limiter =
            Quota::with_period(request_period).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Ok(Self {
            downloader,
            rate_limiter,
        })
    }
}

#[async_trait(?Send)]
impl Browser for HttpBrowser {
    type Page = HtmlPage;

    async fn navigate(&self, url: &Url) -> Result<Self::Page, Error> {
        if let Some(rate_limiter) = &self.rate_limiter {
            rate_limiter.until_ready().await;
        }
        tracing::debug!("GET {url} ...");
        let response = self
            .downloader
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        let final_url = response.url().clone();
        let body = response.text().await?;
        tracing::trace!("Fetched {} bytes from {final_url}", body.len());
        Ok(HtmlPage::parse(final_url, &body))
    }
}

/// A parsed HTML document.
pub struct HtmlPage {
    url: Url,
    document: Html,
}

impl HtmlPage {
    #[must_use]
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }
}

#[async_trait(?Send)]
impl Page for HtmlPage {
    type Element<'a> = HtmlElement<'a>;

    fn url(&self) -> &Url {
        &self.url
    }

    /// The document is complete once parsed,
    /// so this answers right away, well within any `timeout`.
    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> Result<bool, Error> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).next().is_some())
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element<'_>>, Error> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).map(HtmlElement).collect())
    }
}

#[derive(Clone, Copy)]
pub struct HtmlElement<'a>(ElementRef<'a>);

impl Element for HtmlElement<'_> {
    fn query_all(&self, selector: &str) -> Result<Vec<Self>, Error> {
        let selector = parse_selector(selector)?;
        Ok(self.0.select(&selector).map(HtmlElement).collect())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(ToOwned::to_owned)
    }

    /// Text content with runs of whitespace collapsed to single spaces,
    /// approximating what a browser renders.
    fn inner_text(&self) -> String {
        self.0
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
