// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_trait::async_trait;
use url::Url;

use super::{http::HtmlPage, Browser, Error};

/// Serves pages from memory, keyed by URL.
///
/// Unknown URLs fail like an unreachable page would.
#[derive(Debug, Default, Clone)]
pub struct MemoryBrowser {
    pages: HashMap<String, String>,
}

impl MemoryBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page<U: Into<String>, H: Into<String>>(mut self, url: U, html: H) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

#[async_trait(?Send)]
impl Browser for MemoryBrowser {
    type Page = HtmlPage;

    async fn navigate(&self, url: &Url) -> Result<Self::Page, Error> {
        self.pages
            .get(url.as_str())
            .map(|html| HtmlPage::parse(url.clone(), html))
            .ok_or_else(|| Error::NoSuchPage(url.clone()))
    }
}
