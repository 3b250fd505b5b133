// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the cartosearch CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `CARTOSEARCH_THEME` first, then `COLORFGBG`, then defaults to dark.
//! Respects `NO_COLOR` and drops styling when stdout isn't a TTY.

use std::sync::OnceLock;

use cartosearch::{IndexReport, RankedResult};

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("CARTOSEARCH_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // COLORFGBG is "fg;bg"; background 7+ (except 8) is a light terminal
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117);
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (102, 217, 239);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73);
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (1, 112, 158);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_CYAN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply theme color with optional modifiers
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

fn border(color_fn: fn() -> String) -> (String, &'static str) {
    if use_colors() {
        (color_fn(), RESET)
    } else {
        (String::new(), "")
    }
}

/// Calculate visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

/// Shorten to `max` visible characters, ending in an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// Print a content line: │ content          │
pub fn row(content: &str) {
    let (b, reset) = border(GRAY);
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{}│{}{}{}{}│{}", b, reset, content, " ".repeat(pad), b, reset);
}

/// Print section header: ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let (b, reset) = border(GRAY);
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}┌{}{}{}{}┐{}", b, reset, label_part, b, "─".repeat(remaining), reset);
}

/// Print section divider: ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    let (b, reset) = border(GRAY);
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}├{}{}{}{}┤{}", b, reset, label_part, b, "─".repeat(remaining), reset);
}

/// Print section footer: └──────────────────┘
pub fn section_bot() {
    let (b, reset) = border(GRAY);
    println!("{}└{}┘{}", b, "─".repeat(BOX_WIDTH), reset);
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Color-coded timing value in ms
pub fn timing_ms(value: f64) -> String {
    let text = format!("{:.3} ms", value);
    if value < 5.0 {
        themed(GREEN, &[], &text)
    } else if value < 20.0 {
        themed(YELLOW, &[], &text)
    } else {
        themed(RED, &[], &text)
    }
}

/// Grouped search results, one box section per `group >> layer`.
pub fn print_results(query: &str, results: &[RankedResult], skipped: usize, elapsed_ms: f64) {
    let header = format!("\"{}\" · {} results · {}", query, results.len(), timing_ms(elapsed_ms));
    section_top(&truncate(&header, BOX_WIDTH - 4));

    if results.is_empty() {
        row(&format!("  {}", themed(GRAY, &[DIM], "no matches")));
    }

    for result in results {
        if result.first_in_group {
            section_mid(&truncate(&result.group_key(), BOX_WIDTH - 4));
        }
        let title = truncate(&result.title, BOX_WIDTH - 20);
        let location = themed(
            GRAY,
            &[DIM],
            &format!("[{}:{}]", result.entry.layer_index, result.entry.feature_index),
        );
        row(&format!("  {} {}", themed(BRIGHT_CYAN, &[], &title), location));
    }

    if skipped > 0 {
        section_mid("diagnostics");
        row(&format!(
            "  {}",
            themed(YELLOW, &[], &format!("{} entries pointed outside the index", skipped))
        ));
    }
    section_bot();
}

/// Snapshot shape and validation issues.
pub fn print_report(path: &str, report: &IndexReport) {
    section_top(&truncate(path, BOX_WIDTH - 4));
    row(&format!("  keywords  {:>10}", report.keys));
    row(&format!("  entries   {:>10}", report.entries));
    row(&format!("  layers    {:>10}", report.layers));
    row(&format!("  features  {:>10}", report.features));

    section_mid("validation");
    if report.is_clean() {
        row(&format!("  {}", themed(GREEN, &[BOLD], "clean")));
    } else {
        row(&format!(
            "  {}",
            themed(
                RED,
                &[BOLD],
                &format!(
                    "{} issues ({} dangling entries)",
                    report.issues.len(),
                    report.dangling_entries()
                )
            )
        ));
        for issue in report.issues.iter().take(20) {
            row(&format!("  · {}", truncate(&issue.to_string(), BOX_WIDTH - 6)));
        }
        if report.issues.len() > 20 {
            row(&format!("  … {} more", report.issues.len() - 20));
        }
    }
    section_bot();
}
