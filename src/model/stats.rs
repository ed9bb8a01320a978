// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use strum::{AsRefStr, Display};

/// Why a table row did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SkipReason {
    /// Fewer than the minimum number of data cells.
    Spacer,
    /// No header cell left to name the row.
    BeyondHeaders,
    /// The header naming the row is empty or a column title.
    ReservedLabel,
    /// No PDF link in the first cell.
    MissingPdf,
}

/// Row-level diagnostics for one language page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub data_rows: usize,
    pub spacer_rows: usize,
    pub beyond_headers: usize,
    pub reserved_labels: usize,
    pub missing_pdf: usize,
    pub failed_rows: usize,
    /// Records replaced by a later row with the same vaccine name.
    pub overwritten: usize,
}

impl ExtractStats {
    pub fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Spacer => self.spacer_rows += 1,
            SkipReason::BeyondHeaders => self.beyond_headers += 1,
            SkipReason::ReservedLabel => self.reserved_labels += 1,
            SkipReason::MissingPdf => self.missing_pdf += 1,
        }
    }

    /// Rows that looked like vaccine rows but could not be turned into records.
    ///
    /// Spacer rows and rows named by a column title are part of the
    /// expected table layout and do not count.
    #[must_use]
    pub const fn defective_rows(&self) -> usize {
        self.beyond_headers + self.missing_pdf + self.failed_rows
    }
}
