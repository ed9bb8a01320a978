// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

/// Vaccine name -> record, for a single language.
pub type Records = BTreeMap<String, TranslationRecord>;

/// One translated VIS document, as listed for a single language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    pub vaccine_name: String,
    /// Absolute URL of the translated PDF.
    pub pdf_url: String,
    /// Date of the English VIS the translation is based on,
    /// verbatim as shown on the page.
    pub english_vis_date: String,
    /// Absolute URL of the English VIS, or empty.
    pub english_vis_url: String,
}

impl TranslationRecord {
    /// Both the vaccine name and the PDF URL are required.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.vaccine_name.is_empty() && !self.pdf_url.is_empty()
    }
}
