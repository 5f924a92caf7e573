/*
 * SPDX-FileCopyrightText: © 2026 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Extract the payable total from Korean receipt OCR text.
//!
//! Strategy chain, first hit wins:
//! 1. "합계금액" line with a 원-suffixed amount (same line or any line below)
//! 2. prioritized totals keywords (same line or next line), exclusion-filtered
//! 3. largest plausible amount anywhere in the text

use regex::Regex;

use crate::model::AmountExtraction;

/// Totals keywords in priority order (index = priority, lower wins).
/// Spaced variants keep the original ranking; matching strips whitespace anyway.
const TOTAL_KEYWORDS: &[&str] = &[
    "합계금액",
    "합계 금액",
    "총합계",
    "총 합계",
    "결제금액",
    "결제 금액",
    "승인금액",
    "승인 금액",
    "합계",
    "합 계",
    "총액",
    "총 액",
    "합산",
    "받을금액",
    "받을 금액",
    "청구금액",
    "청구 금액",
    "total",
    "amount",
];

/// A line containing any of these is metadata (승인번호, 거래일시, 주소 ...)
/// and never a total-amount context.
const EXCLUDE_KEYWORDS: &[&str] = &[
    "번호", "일시", "종류", "개월", "상호", "주소", "등록", "상점", "정보",
];

const MIN_AMOUNT: u64 = 100;
const MAX_AMOUNT: u64 = 99_999_999;

/// Scan full OCR text for the receipt total.
///
/// Returns the amount as a thousands-grouped string plus the raw text echoed
/// back for manual review. `None` or empty input yields neither.
pub fn extract_amount(raw_text: Option<&str>) -> AmountExtraction {
    let text = match raw_text {
        Some(t) if !t.is_empty() => t,
        _ => return AmountExtraction::empty(),
    };

    let lines: Vec<&str> = text.split('\n').collect();

    let value = find_won_suffixed_total(&lines)
        .or_else(|| find_keyword_candidate(&lines))
        .or_else(|| find_global_max(text));

    match value {
        Some(v) => log::debug!("총액 인식: {}원", v),
        None => log::debug!("총액 인식 실패 ({}줄)", lines.len()),
    }

    AmountExtraction {
        amount: value.map(format_won),
        raw_text: Some(text.to_string()),
    }
}

/// Strategy 1: a "합계금액" line, then the first won-suffixed amount on that
/// line or on any following line. OCR often splits the label column from the
/// value column, so the search runs to the end of the document.
fn find_won_suffixed_total(lines: &[&str]) -> Option<u64> {
    let won_re = Regex::new(r"([\d,]{1,12})원").unwrap();

    for (i, line) in lines.iter().enumerate() {
        if !strip_spaces(line).contains("합계금액") {
            continue;
        }
        if let Some(val) = first_won_amount(&won_re, line) {
            return Some(val);
        }
        for below in &lines[i + 1..] {
            if let Some(val) = first_won_amount(&won_re, below) {
                return Some(val);
            }
        }
    }
    None
}

/// Strategy 2: test every totals keyword against every line, collecting
/// (priority, value) candidates from the keyword line itself or, when that
/// line carries no amount, from the line right below. Lines with exclusion
/// keywords never contribute. Best priority group wins, largest value within.
fn find_keyword_candidate(lines: &[&str]) -> Option<u64> {
    let amount_re = amount_pattern();
    let mut candidates: Vec<(usize, u64)> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let stripped = strip_spaces(line);
        if line_has_exclude(&stripped) {
            continue;
        }
        for (priority, keyword) in TOTAL_KEYWORDS.iter().enumerate() {
            if !stripped.contains(&strip_spaces(keyword)) {
                continue;
            }
            let same_line = scan_amounts(&amount_re, line);
            if !same_line.is_empty() {
                candidates.extend(same_line.into_iter().map(|v| (priority, v)));
            } else if let Some(next) = lines.get(i + 1) {
                if !line_has_exclude(&strip_spaces(next)) {
                    let below = scan_amounts(&amount_re, next);
                    candidates.extend(below.into_iter().map(|v| (priority, v)));
                }
            }
        }
    }

    let best = candidates.iter().map(|&(p, _)| p).min()?;
    candidates
        .iter()
        .filter(|&&(p, _)| p == best)
        .map(|&(_, v)| v)
        .max()
}

/// Strategy 3: no keyword matched anywhere, fall back to the largest
/// plausible amount in the whole text.
fn find_global_max(text: &str) -> Option<u64> {
    scan_amounts(&amount_pattern(), text).into_iter().max()
}

// --- Token scanning ---

/// Digit runs with optional thousands commas. 12 chars max keeps order
/// numbers and long reference codes out before the range filter even runs.
fn amount_pattern() -> Regex {
    Regex::new(r"[\d,]{1,12}").unwrap()
}

/// Every plausible won amount in `text`, left to right.
fn scan_amounts(re: &Regex, text: &str) -> Vec<u64> {
    let bytes = text.as_bytes();
    re.find_iter(text)
        .filter(|m| !glued_to_digits(bytes, m.start(), m.end()))
        .filter_map(|m| parse_won_token(m.as_str()))
        .collect()
}

/// First won-suffixed amount on a line. Only the first structurally valid
/// match counts; if it is out of range the line is a miss.
fn first_won_amount(re: &Regex, line: &str) -> Option<u64> {
    let bytes = line.as_bytes();
    let group = re
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .find(|m| !glued_to_digits(bytes, m.start(), m.end()))?;
    parse_won_token(group.as_str())
}

/// A token touching a hyphen or further digits is part of a larger structure
/// (phone number, card number, date, reference code), never an amount.
fn glued_to_digits(bytes: &[u8], start: usize, end: usize) -> bool {
    let before = start.checked_sub(1).map(|i| bytes[i]);
    let after = bytes.get(end).copied();
    matches!(before, Some(b'-') | Some(b'0'..=b'9'))
        || matches!(after, Some(b'-') | Some(b'0'..=b'9'))
}

/// Strip thousands commas and parse, keeping only plausible receipt totals
/// (100 ~ 99,999,999 won). Anything malformed is silently dropped.
fn parse_won_token(token: &str) -> Option<u64> {
    let digits: String = token.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value = digits.parse::<u64>().ok()?;
    (MIN_AMOUNT..=MAX_AMOUNT).contains(&value).then_some(value)
}

fn line_has_exclude(stripped: &str) -> bool {
    EXCLUDE_KEYWORDS.iter().any(|kw| stripped.contains(kw))
}

/// Whitespace-insensitive matching: both haystack line and needle keyword go
/// through this before any substring comparison.
fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Render an amount with thousands separators ("27190" -> "27,190").
/// Won has no subunit, so no decimals.
pub fn format_won(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount_of(text: &str) -> Option<String> {
        extract_amount(Some(text)).amount
    }

    #[test]
    fn won_suffixed_total_on_same_line() {
        let text = "주식회사 한빛마트\n합계금액 27,190원\n고객센터 1588-1234";
        assert_eq!(amount_of(text), Some("27,190".into()));
    }

    #[test]
    fn won_suffix_beats_larger_number_elsewhere() {
        // 10-digit phone number is bigger but never a candidate
        let text = "전화 0101234567\n합계금액 27,190원";
        assert_eq!(amount_of(text), Some("27,190".into()));
    }

    #[test]
    fn label_and_value_on_separate_rows() {
        // two-column receipt OCR'd as label block then value block
        let text = "합계금액\n부가세\n주문번호 20260830\n24,718원\n2,472원";
        assert_eq!(amount_of(text), Some("24,718".into()));
    }

    #[test]
    fn out_of_range_first_won_match_is_a_line_miss() {
        // first won-suffixed number on the keyword line is a reference code;
        // the line is a miss, not a retry, and the search moves below
        let text = "합계금액 1234567890원\n5,000원";
        assert_eq!(amount_of(text), Some("5,000".into()));
    }

    #[test]
    fn spaced_label_still_matches() {
        let text = "합 계 금 액 13,500원";
        assert_eq!(amount_of(text), Some("13,500".into()));
    }

    #[test]
    fn keyword_line_without_won_suffix_falls_to_strategy_two() {
        // no 원 anywhere, so strategy 1 exhausts the document and misses
        let text = "합계금액\n\n결제금액 5,000";
        assert_eq!(amount_of(text), Some("5,000".into()));
    }

    #[test]
    fn keyword_amount_without_suffix() {
        let text = "결제금액 15,000\n감사합니다";
        assert_eq!(amount_of(text), Some("15,000".into()));
    }

    #[test]
    fn keyword_value_on_next_line() {
        let text = "합계\n23,000\n현금 30,000";
        assert_eq!(amount_of(text), Some("23,000".into()));
    }

    #[test]
    fn priority_beats_magnitude() {
        // 결제금액 outranks the generic "total" regardless of value
        let text = "total 50,000\n결제금액 15,000";
        assert_eq!(amount_of(text), Some("15,000".into()));
    }

    #[test]
    fn max_within_best_priority_group() {
        // unit price and subtotal on one keyword line: the larger is the total
        let text = "합계 15,000 23,000";
        assert_eq!(amount_of(text), Some("23,000".into()));
    }

    #[test]
    fn exclusion_keyword_disqualifies_line() {
        // 번호 on the line blocks keyword matching; the lone digit run is a
        // 10-digit reference, out of range for the fallback too
        let text = "합계금액 승인번호 1234567890";
        assert_eq!(extract_amount(Some(text)).amount, None);
    }

    #[test]
    fn excluded_next_line_contributes_nothing() {
        // 승인번호 line below the keyword is skipped; fallback takes over
        let text = "합계\n승인번호 1,500\n900,000";
        assert_eq!(amount_of(text), Some("900,000".into()));
    }

    #[test]
    fn fallback_takes_largest_in_range() {
        let text = "아메리카노 1500\n23000\n450000000";
        assert_eq!(amount_of(text), Some("23,000".into()));
    }

    #[test]
    fn no_input_yields_nothing() {
        assert_eq!(extract_amount(None), AmountExtraction::empty());
        assert_eq!(extract_amount(Some("")), AmountExtraction::empty());
    }

    #[test]
    fn whitespace_only_keeps_raw_text() {
        let result = extract_amount(Some("  \n  "));
        assert_eq!(result.amount, None);
        assert_eq!(result.raw_text.as_deref(), Some("  \n  "));
    }

    #[test]
    fn phone_number_only_is_no_match() {
        let result = extract_amount(Some("전화번호: 010-1234-5678"));
        assert_eq!(result.amount, None);
        assert_eq!(result.raw_text.as_deref(), Some("전화번호: 010-1234-5678"));
    }

    #[test]
    fn range_bounds() {
        assert_eq!(parse_won_token("99"), None);
        assert_eq!(parse_won_token("100"), Some(100));
        assert_eq!(parse_won_token("99,999,999"), Some(99_999_999));
        assert_eq!(parse_won_token("100,000,000"), None);
        assert_eq!(parse_won_token(",,"), None);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let text = "합계 8,400\n부가세 840\n승인번호 30123456";
        assert_eq!(extract_amount(Some(text)), extract_amount(Some(text)));
    }

    #[test]
    fn format_won_groups_thousands() {
        assert_eq!(format_won(100), "100");
        assert_eq!(format_won(27_190), "27,190");
        assert_eq!(format_won(99_999_999), "99,999,999");
    }
}
