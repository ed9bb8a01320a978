// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::borrow::Cow;

use url::Url;
use urlencoding::encode;

/// URL-encodes a single path segment or query value.
///
/// ```
/// # use vis_scraper::tools::url_encode;
/// assert_eq!(url_encode(r#"Hello World"#), "Hello%20World");
/// ```
#[must_use]
pub fn url_encode(input: &str) -> Cow<str> {
    encode(input)
}

/// Turns an `href` as found in a page into an absolute URL.
///
/// Relative references are resolved against `base`
/// (the URL of the page the reference was found on),
/// absolute ones are returned unchanged.
/// Surrounding whitespace is ignored;
/// an empty reference resolves to an empty string.
///
/// ```
/// # use url::Url;
/// # use vis_scraper::tools::resolve_href;
/// let base = Url::parse("https://example.org/vis/fr/").unwrap();
/// assert_eq!(
///     resolve_href(&base, "/pdf/x.pdf").unwrap(),
///     "https://example.org/pdf/x.pdf"
/// );
/// ```
pub fn resolve_href(base: &Url, href: &str) -> Result<String, url::ParseError> {
    let href = href.trim();
    if href.is_empty() {
        return Ok(String::new());
    }
    match Url::parse(href) {
        Ok(_) => Ok(href.to_owned()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(base.join(href)?.into()),
        Err(err) => Err(err),
    }
}

/// Fills a `{code}` placeholder in a URL template
/// with the URL-encoded language code.
pub fn fill_template(template: &str, code: &str) -> Result<Url, url::ParseError> {
    Url::parse(&template.replace("{code}", &url_encode(code)))
}
