// libs/reminder-cell/src/services/name_extractor.rs
use regex::Regex;

const TITLE_PATTERN: &str = r"(?i)^(?:Dr\.|Doctor|DR|Mr\.|Mrs\.|Ms\.|Miss)\s*";
const CREDENTIAL_PATTERN: &str = r"(?i)/PC";

/// Derives the lower-case first-name token used in a provider's meeting link.
pub struct NameExtractor {
    title_pattern: Option<Regex>,
    credential_pattern: Option<Regex>,
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl NameExtractor {
    pub fn new() -> Self {
        Self {
            title_pattern: Regex::new(TITLE_PATTERN).ok(),
            credential_pattern: Regex::new(CREDENTIAL_PATTERN).ok(),
        }
    }

    /// Uses `appt_with` when it has content, otherwise the tab name. Returns an
    /// empty string when no letters remain.
    pub fn extract_first_name(&self, tab_name: &str, appt_with: Option<&str>) -> String {
        let source = match appt_with {
            Some(value) if !value.trim().is_empty() => value,
            _ => tab_name,
        };

        let mut name = source.to_string();
        if let Some(pattern) = &self.title_pattern {
            name = pattern.replace(&name, "").into_owned();
        }
        if let Some(pattern) = &self.credential_pattern {
            name = pattern.replace_all(&name, "").into_owned();
        }

        name.split_whitespace()
            .next()
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_alphabetic)
            .collect::<String>()
            .to_lowercase()
    }
}
