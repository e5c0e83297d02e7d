//! Keyword dispatch over canned diagnoses.
//!
//! A [`KeywordRuleSet`] is an ordered list of [`KeywordRule`]s plus a
//! fallback. Rules are evaluated in order against the lowercased symptom text
//! and the first rule with any matching keyword wins. Payloads are supplied by
//! the caller (see [`crate::fixtures`]), so the matching logic does not depend
//! on their content.

use crate::domain::DiagnosisResult;
use crate::fixtures;

/// One dispatch rule: any keyword found as a substring selects `result`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    /// Lowercase keywords.
    pub keywords: Vec<String>,
    pub result: DiagnosisResult,
}

impl KeywordRule {
    pub fn new<I, S>(keywords: I, result: DiagnosisResult) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
            result,
        }
    }

    /// `haystack` must already be lowercase.
    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// Ordered, first-match-wins rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRuleSet {
    pub rules: Vec<KeywordRule>,
    pub fallback: DiagnosisResult,
}

impl KeywordRuleSet {
    /// An empty table that always answers `fallback`.
    pub fn new(fallback: DiagnosisResult) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// The standard table: brakes, battery, tires, then engine misfire.
    pub fn standard() -> Self {
        Self::new(fixtures::engine_misfire())
            .with_rule(KeywordRule::new(
                ["brake", "squeak", "stop"],
                fixtures::worn_brake_pads(),
            ))
            .with_rule(KeywordRule::new(
                ["start", "click", "battery"],
                fixtures::dead_battery(),
            ))
            .with_rule(KeywordRule::new(
                ["shake", "wobble", "vibrat", "tire"],
                fixtures::unbalanced_tires(),
            ))
    }

    /// Append a rule with lower precedence than those already present.
    pub fn with_rule(mut self, rule: KeywordRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Select the diagnosis for `symptoms` (case-insensitive).
    pub fn dispatch(&self, symptoms: &str) -> &DiagnosisResult {
        let haystack = symptoms.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&haystack))
            .map(|rule| &rule.result)
            .unwrap_or(&self.fallback)
    }
}

impl Default for KeywordRuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> DiagnosisResult {
        DiagnosisResult {
            issue_title: title.to_string(),
            ..DiagnosisResult::default()
        }
    }

    #[test]
    fn test_empty_table_returns_fallback() {
        let rules = KeywordRuleSet::new(payload("fallback"));
        assert_eq!(rules.dispatch("anything").issue_title, "fallback");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = KeywordRuleSet::new(payload("fallback"))
            .with_rule(KeywordRule::new(["alpha"], payload("first")))
            .with_rule(KeywordRule::new(["alpha", "beta"], payload("second")));

        assert_eq!(rules.dispatch("alpha beta").issue_title, "first");
        assert_eq!(rules.dispatch("beta only").issue_title, "second");
        assert_eq!(rules.dispatch("gamma").issue_title, "fallback");
    }

    #[test]
    fn test_keywords_are_normalized_to_lowercase() {
        let rules = KeywordRuleSet::new(payload("fallback"))
            .with_rule(KeywordRule::new(["NOISE"], payload("noise")));
        assert_eq!(rules.dispatch("Strange Noise").issue_title, "noise");
    }

    #[test]
    fn test_standard_table_order() {
        let rules = KeywordRuleSet::standard();
        let titles: Vec<&str> = rules
            .rules
            .iter()
            .map(|r| r.result.issue_title.as_str())
            .collect();
        assert_eq!(titles, vec!["Worn Brake Pads", "Dead Battery", "Unbalanced Tires"]);
    }

    #[test]
    fn test_substring_match_inside_words() {
        let rules = KeywordRuleSet::standard();
        // "vibrat" matches "vibration"; "stop" matches "stopping".
        assert_eq!(rules.dispatch("heavy VIBRATION").issue_title, "Unbalanced Tires");
        assert_eq!(rules.dispatch("grinding when stopping").issue_title, "Worn Brake Pads");
    }
}
