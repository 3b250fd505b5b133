// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Similarity scores in `[0, 1]`.
//!
//! # Abbreviation score
//!
//! Walk the term left to right, finding each character in the key after the
//! previous match:
//!
//! | Match position                    | Points |
//! |-----------------------------------|--------|
//! | Right where the last match ended  | 0.7    |
//! | Further along                     | 0.1    |
//! | ...directly after a space         | +0.8   |
//! | Identical character (incl. case)  | +0.1   |
//!
//! Any term character missing from the key scores the pair 0. The total is
//! averaged over key length and term length, with a 0.15 bonus when the first
//! characters agree. Prefixes and initialisms score high; scattered letters don't.
//!
//! # Edit similarity
//!
//! `1 - distance / max(len)`. Only computed when the distance could land at or
//! above the acceptance threshold, i.e. `distance ≤ max(len) / 2`.

use super::levenshtein::levenshtein_bounded;

const CONSECUTIVE: f64 = 0.7;
const SCATTERED: f64 = 0.1;
const WORD_START: f64 = 0.8;
const EXACT_CASE: f64 = 0.1;
const FIRST_CHAR_BONUS: f64 = 0.15;
const FIRST_CHAR_CEILING: f64 = 0.85;

/// Similarity of a query term to an index key. `score(x, x) == 1`.
pub fn score(term: &str, key: &str) -> f64 {
    if term == key {
        return 1.0;
    }
    abbreviation_score(term, key)
        .max(edit_similarity(term, key))
        .clamp(0.0, 1.0)
}

fn eq_fold(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// How well `term` reads as an abbreviation of `key`.
pub fn abbreviation_score(term: &str, key: &str) -> f64 {
    if term == key {
        return 1.0;
    }
    if term.is_empty() || key.is_empty() {
        return 0.0;
    }

    let key_chars: Vec<char> = key.chars().collect();
    let mut running = 0.0;
    let mut start = 0;
    let mut term_len = 0usize;

    for tc in term.chars() {
        term_len += 1;
        let Some(idx) = key_chars[start..]
            .iter()
            .position(|&kc| eq_fold(kc, tc))
            .map(|offset| start + offset)
        else {
            return 0.0;
        };

        let mut char_score = if idx == start {
            CONSECUTIVE
        } else if idx > 0 && key_chars[idx - 1] == ' ' {
            SCATTERED + WORD_START
        } else {
            SCATTERED
        };
        if key_chars[idx] == tc {
            char_score += EXACT_CASE;
        }

        running += char_score;
        start = idx + 1;
    }

    let mut total = 0.5 * (running / key_chars.len() as f64 + running / term_len as f64);

    let first_agrees = term
        .chars()
        .next()
        .zip(key_chars.first())
        .is_some_and(|(t, &k)| eq_fold(t, k));
    if first_agrees && total < FIRST_CHAR_CEILING {
        total += FIRST_CHAR_BONUS;
    }

    total.min(1.0)
}

/// Normalized edit similarity, or 0 when more than half the characters differ.
pub fn edit_similarity(term: &str, key: &str) -> f64 {
    let longest = term.chars().count().max(key.chars().count());
    if longest == 0 {
        return 1.0;
    }
    match levenshtein_bounded(term, key, longest / 2) {
        Some(distance) => 1.0 - distance as f64 / longest as f64,
        None => 0.0,
    }
}
