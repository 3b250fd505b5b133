// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit distance with an early-exit optimization.
//!
//! `|len(a) - len(b)|` is a lower bound on edit distance. If two strings differ
//! in length by more than the budget, skip the O(nm) DP entirely. The matcher
//! calls this once per keyword per term, so the cheap rejections matter.

/// Edit distance between `a` and `b`, or `None` if it exceeds `max`.
///
/// Bounded Levenshtein with two early-exit paths:
/// 1. If length difference exceeds `max`, return `None` immediately
/// 2. If minimum row value exceeds `max`, abandon the DP early
pub fn levenshtein_bounded(a: &str, b: &str, max: usize) -> Option<usize> {
    // Use character counts, not byte lengths, for Unicode correctness
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len.abs_diff(b_len) > max {
        return None;
    }

    let b_chars: Vec<char> = b.chars().collect();
    let mut dp: Vec<usize> = (0..=b_len).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        let mut min_row = dp[0];

        for (j, &bc) in b_chars.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
            min_row = min_row.min(dp[j + 1]);
        }

        if min_row > max {
            return None;
        }
    }

    (dp[b_len] <= max).then_some(dp[b_len])
}
