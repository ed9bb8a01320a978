// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

/// One language offered in the translations directory.
///
/// Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageRef {
    /// Key used to address the language page, e.g. `"fr"`.
    pub code: String,
    /// Human-readable name, e.g. `"French"`.
    pub display_name: String,
    /// Zero-based position of the option in the directory control.
    /// Only stable within one run.
    pub ordinal: usize,
}

impl LanguageRef {
    #[must_use]
    pub fn new<C: Into<String>, N: Into<String>>(code: C, display_name: N, ordinal: usize) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            ordinal,
        }
    }
}

impl fmt::Display for LanguageRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.code)
    }
}
