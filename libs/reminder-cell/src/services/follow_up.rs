// libs/reminder-cell/src/services/follow_up.rs
use regex::Regex;
use tracing::trace;

/// How a rule recognizes a note. Notes are trimmed and lower-cased first.
enum NoteMatcher {
    ContainsAny(&'static [&'static str]),
    MatchesAny(Vec<Regex>),
}

impl NoteMatcher {
    fn patterns(patterns: &[&str]) -> Self {
        Self::MatchesAny(
            patterns
                .iter()
                .filter_map(|pattern| Regex::new(pattern).ok())
                .collect(),
        )
    }

    fn matches(&self, note: &str) -> bool {
        match self {
            Self::ContainsAny(needles) => needles.iter().any(|needle| note.contains(needle)),
            Self::MatchesAny(patterns) => patterns.iter().any(|pattern| pattern.is_match(note)),
        }
    }
}

/// One entry of the ordered note heuristics.
pub struct FollowUpRule {
    pub name: &'static str,
    matcher: NoteMatcher,
    /// Verdict when the rule matches: `true` means the patient is done for the day.
    pub seen: bool,
}

impl FollowUpRule {
    fn new(name: &'static str, matcher: NoteMatcher, seen: bool) -> Self {
        Self { name, matcher, seen }
    }

    pub fn matches(&self, note: &str) -> bool {
        self.matcher.matches(note)
    }
}

/// Reads the free-text `Follow Up` column. First matching rule wins; no match
/// means the patient still needs the link.
pub struct FollowUpClassifier {
    rules: Vec<FollowUpRule>,
}

impl Default for FollowUpClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowUpClassifier {
    pub fn new() -> Self {
        let rules = vec![
            // Voicemail and confirmation calls happen before the visit.
            FollowUpRule::new(
                "not_seen_contact",
                NoteMatcher::ContainsAny(&["vm", "lvm", "confirmed", "conf"]),
                false,
            ),
            FollowUpRule::new(
                "cancelled_or_moved",
                NoteMatcher::ContainsAny(&["cancel", "resch", "doxy"]),
                true,
            ),
            FollowUpRule::new(
                "no_follow_up",
                NoteMatcher::ContainsAny(&["no f/u", "no fu", "nof/u", "nofu"]),
                true,
            ),
            FollowUpRule::new(
                "next_visit_date",
                NoteMatcher::patterns(&[r"\d{1,2}[/\-]\d{1,2}([/\-]\d{2,4})?"]),
                true,
            ),
            FollowUpRule::new(
                "rescheduled",
                NoteMatcher::patterns(&[r"^rs$", r"\brs\b"]),
                true,
            ),
            FollowUpRule::new(
                "return_in_weeks",
                NoteMatcher::patterns(&[
                    r"^\d+\s*w$",
                    r"^\d+\s*wks?$",
                    r"^\d+\s*weeks?$",
                    r"\d+\s*weeks?\s+with",
                    r"\d+\s*wks?\s+with",
                    r"\d+\s*w\s+with",
                    r"^w$",
                ]),
                true,
            ),
            FollowUpRule::new(
                "return_in_months",
                NoteMatcher::patterns(&[
                    r"^\d+\s*m$",
                    r"^\d+\s*mo$",
                    r"^\d+\s*months?$",
                    r"\d+\s*months?\s+with",
                    r"\d+\s*mo\s+with",
                ]),
                true,
            ),
            // These describe an earlier visit, not today's.
            FollowUpRule::new(
                "seen_previously",
                NoteMatcher::patterns(&[
                    r"recently\s+seen",
                    r"seen\s+yesterday",
                    r"seen\s+last",
                    r"just\s+seen",
                    r"been\s+seen",
                    r"was\s+seen",
                    r"already\s+seen",
                ]),
                false,
            ),
            FollowUpRule::new(
                "seen",
                NoteMatcher::patterns(&[r"^seen$", r",\s*seen", r"\bseen\b"]),
                true,
            ),
        ];

        Self { rules }
    }

    pub fn rules(&self) -> &[FollowUpRule] {
        &self.rules
    }

    /// The first rule matching the note, if any.
    pub fn classify(&self, note: &str) -> Option<&FollowUpRule> {
        let normalized = note.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        self.rules.iter().find(|rule| rule.matches(&normalized))
    }

    pub fn has_been_seen(&self, note: Option<&str>) -> bool {
        let Some(note) = note else {
            return false;
        };

        match self.classify(note) {
            Some(rule) => {
                trace!("Follow-up note {:?} matched rule {}", note, rule.name);
                rule.seen
            }
            None => false,
        }
    }
}
