/*
 * SPDX-FileCopyrightText: © 2026 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

use serde::{Deserialize, Serialize};

/// Outcome of one extraction pass over a receipt's OCR text.
///
/// Callers persist this next to the ledger record: `amount` pre-fills the
/// entry field, `raw_text` feeds the diagnostic panel for manual correction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountExtraction {
    /// Thousands-grouped digit string ("27,190"), no currency symbol.
    /// `None` when no plausible total was found.
    pub amount: Option<String>,
    /// Full OCR text echoed back unchanged. `None` only when the upstream
    /// recognizer supplied no text at all.
    pub raw_text: Option<String>,
}

impl AmountExtraction {
    /// Result for missing or empty upstream text.
    pub fn empty() -> Self {
        Self {
            amount: None,
            raw_text: None,
        }
    }
}
