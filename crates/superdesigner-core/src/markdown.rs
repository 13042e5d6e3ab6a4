//! Line-oriented markdown extraction.
//!
//! Only the handful of constructs the review pipeline cares about are
//! recognised: `#`–`###` headings, `-`/`*` bullets and `N.` numbered items.
//! Everything else is plain text. None of these functions can fail; text
//! without the requested structure yields an empty result.

use regex::Regex;
use std::sync::OnceLock;

/// Upper bound on the length of [`extract_section`] output, in characters.
pub const SECTION_CHAR_LIMIT: usize = 500;

static COLLECTED_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static SECTION_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static BULLET_RE: OnceLock<Regex> = OnceLock::new();
static NUMBERED_RE: OnceLock<Regex> = OnceLock::new();

fn collected_heading_re() -> &'static Regex {
    COLLECTED_HEADING_RE.get_or_init(|| Regex::new(r"^#{2,3}\s+(.+)$").unwrap())
}

fn section_heading_re() -> &'static Regex {
    SECTION_HEADING_RE.get_or_init(|| Regex::new(r"^#{1,3}\s+(.+)$").unwrap())
}

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| Regex::new(r"^\s*[-*]\s+(.+)$").unwrap())
}

fn numbered_re() -> &'static Regex {
    NUMBERED_RE.get_or_init(|| Regex::new(r"^\s*\d+\.\s+(.+)$").unwrap())
}

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// One markdown line as seen by the section scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    /// `#`, `##` or `###` heading; carries the raw heading text.
    Heading(&'a str),
    /// Bullet or numbered list item; carries the trimmed item text.
    Item(&'a str),
    /// Any other non-blank line, trimmed.
    Text(&'a str),
    Blank,
}

fn classify(line: &str) -> Line<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if let Some(c) = section_heading_re().captures(line) {
        return Line::Heading(c.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(c) = bullet_re()
        .captures(line)
        .or_else(|| numbered_re().captures(line))
    {
        return Line::Item(c.get(1).map_or("", |m| m.as_str().trim()));
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Line::Blank
    } else {
        Line::Text(trimmed)
    }
}

// ---------------------------------------------------------------------------
// Section scanner
// ---------------------------------------------------------------------------

/// Where the scanner is relative to the requested section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InSection,
    /// The section was seen and closed by a later heading.
    Done,
}

impl ScanState {
    fn on_heading(self, heading: &str, needle: &str) -> ScanState {
        match self {
            ScanState::Outside if heading.to_lowercase().contains(needle) => ScanState::InSection,
            ScanState::Outside => ScanState::Outside,
            ScanState::InSection | ScanState::Done => ScanState::Done,
        }
    }
}

/// Lines (already classified) that belong to the first heading whose text
/// contains `section_name`, case-insensitively.
///
/// The section opens at the matching `#`–`###` heading and closes at the
/// very next `#`–`###` heading, whatever its level. Later headings that
/// match again are not merged in.
fn section_lines<'a>(markdown: &'a str, section_name: &str) -> Vec<Line<'a>> {
    let needle = section_name.to_lowercase();
    let (_, lines) = markdown.split('\n').map(classify).fold(
        (ScanState::Outside, Vec::new()),
        |(state, mut acc), line| match line {
            Line::Heading(text) => (state.on_heading(text, &needle), acc),
            other => {
                if state == ScanState::InSection {
                    acc.push(other);
                }
                (state, acc)
            }
        },
    );
    lines
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// All level-2 and level-3 heading texts, trimmed, in document order.
pub fn extract_headings(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .filter_map(|line| collected_heading_re().captures(line))
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .collect()
}

/// Bullet and numbered list items under the named section.
pub fn extract_bullets(markdown: &str, section_name: &str) -> Vec<String> {
    section_lines(markdown, section_name)
        .into_iter()
        .filter_map(|line| match line {
            Line::Item(text) => Some(text.to_string()),
            _ => None,
        })
        .collect()
}

/// Free text under the named section, joined with single spaces and capped
/// at [`SECTION_CHAR_LIMIT`] characters. List items are kept verbatim,
/// markers included.
pub fn extract_section(markdown: &str, section_name: &str) -> String {
    let joined = markdown
        .split('\n')
        .scan(
            (ScanState::Outside, section_name.to_lowercase()),
            |(state, needle), raw| {
                if *state == ScanState::Done {
                    return None;
                }
                let line = classify(raw);
                if let Line::Heading(text) = line {
                    *state = state.on_heading(text, needle);
                    return Some(None);
                }
                if *state == ScanState::InSection && line != Line::Blank {
                    return Some(Some(raw.trim()));
                }
                Some(None)
            },
        )
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    joined.chars().take(SECTION_CHAR_LIMIT).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PRD: &str = "\
# Product Requirements Document

## Overview
Quests reward users for
completing onboarding tasks.

## Happy path (step-by-step)
1. Open the app
2. Tap the quest banner
- Claim the reward

### Notes
- not part of the happy path

## Edge cases & unhappy paths
* User has no network
* Quest already claimed
";

    #[test]
    fn headings_in_document_order() {
        assert_eq!(
            extract_headings(PRD),
            vec![
                "Overview",
                "Happy path (step-by-step)",
                "Notes",
                "Edge cases & unhappy paths"
            ]
        );
    }

    #[test]
    fn headings_skip_level_one_and_four() {
        let md = "# Title\n#### Deep\n##NoSpace\n## Real\n### Also real  \n";
        assert_eq!(extract_headings(md), vec!["Real", "Also real"]);
    }

    #[test]
    fn headings_keep_duplicates() {
        let md = "## Step\n## Step\n";
        assert_eq!(extract_headings(md), vec!["Step", "Step"]);
    }

    #[test]
    fn inserted_heading_shifts_later_positions_only() {
        let before = "## A\n## B\n## C\n";
        let after = "## A\n## New\n## B\n## C\n";
        let a = extract_headings(before);
        let b = extract_headings(after);
        assert_eq!(a[0], b[0]);
        assert_eq!(&a[1..], &b[2..]);
    }

    #[test]
    fn bullets_mix_numbered_and_dashed() {
        assert_eq!(
            extract_bullets(PRD, "happy path"),
            vec!["Open the app", "Tap the quest banner", "Claim the reward"]
        );
    }

    #[test]
    fn bullets_closed_by_any_heading_level() {
        // "### Notes" closes the happy path section even though it is deeper.
        let bullets = extract_bullets(PRD, "happy path");
        assert!(!bullets.iter().any(|b| b.contains("not part")));
    }

    #[test]
    fn bullets_substring_case_insensitive() {
        assert_eq!(
            extract_bullets(PRD, "EDGE CASE"),
            vec!["User has no network", "Quest already claimed"]
        );
    }

    #[test]
    fn bullets_missing_section_is_empty() {
        assert!(extract_bullets(PRD, "analytics").is_empty());
        assert!(extract_bullets("", "happy path").is_empty());
    }

    #[test]
    fn bullets_only_first_matching_section() {
        let md = "## Goals\n- first\n## Other\n- skip\n## Goals again\n- second\n";
        assert_eq!(extract_bullets(md, "goals"), vec!["first"]);
    }

    #[test]
    fn bullets_ignore_horizontal_rules_and_text() {
        let md = "## Goals\n---\nplain text\n  - indented item\n10. tenth\n";
        assert_eq!(extract_bullets(md, "goals"), vec!["indented item", "tenth"]);
    }

    #[test]
    fn bullets_handle_crlf() {
        let md = "## Happy path\r\n1. Sign up\r\n2. Verify email\r\n";
        assert_eq!(extract_bullets(md, "happy path"), vec!["Sign up", "Verify email"]);
    }

    #[test]
    fn section_joins_lines() {
        assert_eq!(
            extract_section(PRD, "overview"),
            "Quests reward users for completing onboarding tasks."
        );
    }

    #[test]
    fn section_keeps_list_markers() {
        assert_eq!(
            extract_section(PRD, "happy path"),
            "1. Open the app 2. Tap the quest banner - Claim the reward"
        );
    }

    #[test]
    fn section_missing_is_empty() {
        assert_eq!(extract_section(PRD, "problem"), "");
        assert_eq!(extract_section("", "overview"), "");
    }

    #[test]
    fn section_truncates_to_limit() {
        let long = "word ".repeat(300);
        let md = format!("## Overview\n{long}\n");
        let out = extract_section(&md, "overview");
        assert_eq!(out.chars().count(), SECTION_CHAR_LIMIT);
        assert!(long.starts_with(&out));
    }

    #[test]
    fn section_first_occurrence_wins() {
        let md = "## Problem\nfirst\n## Problem two\nsecond\n";
        assert_eq!(extract_section(md, "problem"), "first");
    }
}
