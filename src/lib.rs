/*
 * SPDX-FileCopyrightText: © 2026 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Total-amount extraction from Korean receipt OCR text.
//!
//! Input is the raw multi-line text an OCR service produced from a photographed
//! receipt; output is the single payable total (or nothing), resolved through a
//! fixed strategy chain of keyword and range heuristics. Pure computation, no
//! I/O: image handling, the OCR call itself and persistence all belong to the
//! caller.

pub mod extract;
pub mod model;

pub use extract::{extract_amount, format_won};
pub use model::AmountExtraction;
