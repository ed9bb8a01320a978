// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Discovers the languages listed in the directory's selection control.

use super::Error;
use crate::{
    browser::{Element, Page},
    events::{Event, EventSink, SelectInfo},
    model::language::LanguageRef,
};

pub const DEFAULT_SELECT_ID: &str = "attr-lang";

/// Reads one [`LanguageRef`] per usable option of the `select` element
/// with id `select_id`, in document order.
///
/// Options with an empty value or text are skipped.
/// They still occupy their position, so ordinals match the control.
///
/// # Errors
///
/// - [`Error::DirectoryNotFound`] if there is no such control on the page
/// - [`Error::Query`] if querying the page failed
pub fn read_languages<P: Page>(
    page: &P,
    select_id: &str,
    events: &dyn EventSink,
) -> Result<Vec<LanguageRef>, Error> {
    let control_selector = format!("select[id=\"{select_id}\"]");
    let Some(control) = page.query_all(&control_selector)?.into_iter().next() else {
        let selects = page
            .query_all("select")?
            .iter()
            .map(|select| SelectInfo {
                id: select.attribute("id"),
                name: select.attribute("name"),
                class: select.attribute("class"),
            })
            .collect();
        events.emit(Event::DirectoryMissing {
            select_id: select_id.to_owned(),
            selects,
        });
        return Err(Error::DirectoryNotFound(select_id.to_owned()));
    };

    let options = control.query_all("option")?;
    events.emit(Event::DirectoryFound {
        options: options.len(),
    });

    let mut languages = Vec::with_capacity(options.len());
    for (ordinal, option) in options.iter().enumerate() {
        let code = option.attribute("value").unwrap_or_default();
        let code = code.trim();
        let display_name = option.inner_text();
        let display_name = display_name.trim();
        if code.is_empty() || display_name.is_empty() {
            events.emit(Event::OptionSkipped { ordinal });
            continue;
        }
        let language = LanguageRef::new(code, display_name, ordinal);
        events.emit(Event::LanguageDiscovered(language.clone()));
        languages.push(language);
    }
    Ok(languages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::http::HtmlPage;
    use crate::events::RecordingSink;
    use url::Url;

    fn page(html: &str) -> HtmlPage {
        HtmlPage::parse(
            Url::parse("https://www.immunize.org/vaccines/vis-translations/").unwrap(),
            html,
        )
    }

    #[test]
    fn reads_options_in_document_order() {
        let page = page(
            r#"<select id="attr-lang">
                <option value="">Select a language</option>
                <option value="fr"> French </option>
                <option value="es">Spanish</option>
                <option value="xx">   </option>
            </select>"#,
        );
        let events = RecordingSink::new();
        let languages = read_languages(&page, DEFAULT_SELECT_ID, &events).unwrap();
        assert_eq!(
            languages,
            vec![
                LanguageRef::new("fr", "French", 1),
                LanguageRef::new("es", "Spanish", 2),
            ]
        );
        let skipped: Vec<_> = events
            .events()
            .into_iter()
            .filter_map(|event| match event {
                Event::OptionSkipped { ordinal } => Some(ordinal),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, vec![0, 3]);
    }

    #[test]
    fn ignores_other_selects() {
        let page = page(
            r#"<select id="sort"><option value="az">A-Z</option></select>
            <select id="attr-lang"><option value="ar">Arabic</option></select>"#,
        );
        let languages = read_languages(&page, DEFAULT_SELECT_ID, &RecordingSink::new()).unwrap();
        assert_eq!(languages, vec![LanguageRef::new("ar", "Arabic", 0)]);
    }

    #[test]
    fn missing_control_lists_present_selects() {
        let page = page(r#"<select id="lang" name="l" class="big"></select>"#);
        let events = RecordingSink::new();
        let err = read_languages(&page, DEFAULT_SELECT_ID, &events).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
        assert_eq!(
            events.events(),
            vec![Event::DirectoryMissing {
                select_id: DEFAULT_SELECT_ID.to_owned(),
                selects: vec![SelectInfo {
                    id: Some("lang".to_owned()),
                    name: Some("l".to_owned()),
                    class: Some("big".to_owned()),
                }],
            }]
        );
    }
}
