// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The narrow page-loading capability the scrapers are written against.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub mod http;
pub mod memory;

/// Thrown when loading or querying a page failed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network/Internet download failed: '{0}'")]
    Download(#[from] reqwest::Error),
    #[error("Network/Internet download failed: '{0}'")]
    DownloadMiddleware(#[from] reqwest_middleware::Error),
    #[error("No page is available at '{0}'")]
    NoSuchPage(Url),
    #[error("Invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Loads pages.
#[async_trait(?Send)]
pub trait Browser {
    type Page: Page;

    /// Loads `url` and waits until the network is quiet.
    async fn navigate(&self, url: &Url) -> Result<Self::Page, Error>;
}

/// A loaded page.
#[async_trait(?Send)]
pub trait Page {
    type Element<'a>: Element
    where
        Self: 'a;

    /// The URL the page was finally loaded from,
    /// used to resolve relative links.
    fn url(&self) -> &Url;

    /// Whether an element matching `selector` appears within `timeout`.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<bool, Error>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element<'_>>, Error>;
}

/// An element within a loaded [`Page`].
pub trait Element: Sized {
    /// All descendants matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<Self>, Error>;

    fn attribute(&self, name: &str) -> Option<String>;

    fn inner_text(&self) -> String;

    /// The first descendant matching `selector`.
    fn query(&self, selector: &str) -> Result<Option<Self>, Error> {
        Ok(self.query_all(selector)?.into_iter().next())
    }
}
