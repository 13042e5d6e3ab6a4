use std::fmt;

/// Heading words that suggest a UI surface.
pub const SCREEN_KEYWORDS: [&str; 7] = ["screen", "page", "view", "modal", "dialog", "flow", "step"];

// ---------------------------------------------------------------------------
// DefaultScreen
// ---------------------------------------------------------------------------

/// Screens assumed when the PRD headings name none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultScreen {
    Entry,
    CoreAction,
    Confirmation,
    ErrorRecovery,
}

impl DefaultScreen {
    pub fn all() -> &'static [DefaultScreen] {
        &[
            DefaultScreen::Entry,
            DefaultScreen::CoreAction,
            DefaultScreen::Confirmation,
            DefaultScreen::ErrorRecovery,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DefaultScreen::Entry => "Entry",
            DefaultScreen::CoreAction => "Core Action",
            DefaultScreen::Confirmation => "Confirmation",
            DefaultScreen::ErrorRecovery => "Error/Recovery",
        }
    }
}

impl fmt::Display for DefaultScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

fn looks_like_screen(heading: &str) -> bool {
    let lower = heading.to_lowercase();
    SCREEN_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Guess the screens a design should contain from PRD headings.
///
/// Never empty: without a keyword match the four [`DefaultScreen`]s are
/// returned in their fixed order.
pub fn infer_screens(headings: &[String]) -> Vec<String> {
    let inferred: Vec<String> = headings
        .iter()
        .filter(|h| looks_like_screen(h))
        .cloned()
        .collect();

    if inferred.is_empty() {
        DefaultScreen::all()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect()
    } else {
        inferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keyword_headings_kept_in_order() {
        let headings = strings(&["Overview", "Login Screen", "Goals", "Reward Modal", "Login Screen"]);
        assert_eq!(
            infer_screens(&headings),
            strings(&["Login Screen", "Reward Modal", "Login Screen"])
        );
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let headings = strings(&["OVERVIEW"]);
        // "overview" contains "view"
        assert_eq!(infer_screens(&headings), headings);
    }

    #[test]
    fn defaults_when_nothing_matches() {
        let expected = strings(&["Entry", "Core Action", "Confirmation", "Error/Recovery"]);
        assert_eq!(infer_screens(&[]), expected);
        assert_eq!(infer_screens(&strings(&["Goals", "Metrics"])), expected);
    }

    #[test]
    fn never_empty() {
        for headings in [vec![], strings(&[""]), strings(&["Problem", "Rewards"])] {
            assert!(!infer_screens(&headings).is_empty());
        }
    }
}
