use ticketgate_core::{ClassificationResult, RuleTable};

/// Classify one incident against the rule table. Pure function, no I/O.
///
/// Matching is case-insensitive substring matching over the concatenated
/// short and long text. Within a category, declaration order is priority
/// order and the first matching rule wins; a rule fires when any of its
/// keywords matches OR the error code contains any of its patterns, so
/// either predicate alone is sufficient. Only when no specific rule fires
/// does the category's predicate-free fallback apply; with no fallback the
/// result is the unclassified topic.
pub fn classify(
    rules: &RuleTable,
    category: &str,
    short_text: &str,
    long_text: &str,
    error_code: Option<&str>,
) -> ClassificationResult {
    let haystack = format!("{short_text} {long_text}").to_lowercase();
    let code = error_code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);

    let selected: Vec<_> = rules.rules_for(category).collect();

    for rule in &selected {
        let keyword_hit = !rule.keywords.is_empty()
            && rule
                .keywords
                .iter()
                .any(|k| haystack.contains(&k.to_lowercase()));
        let code_hit = match &code {
            Some(code) if !rule.error_codes.is_empty() => rule
                .error_codes
                .iter()
                .any(|pattern| code.contains(&pattern.to_lowercase())),
            _ => false,
        };
        if keyword_hit || code_hit {
            return ClassificationResult::new(rule.topic.clone(), rule.resources.clone());
        }
    }

    selected
        .iter()
        .find(|rule| rule.is_fallback())
        .map(|rule| ClassificationResult::new(rule.topic.clone(), rule.resources.clone()))
        .unwrap_or_else(ClassificationResult::unclassified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketgate_core::rules::{ClassificationRule, CATEGORIES};

    fn rule(
        category: &str,
        keywords: &[&str],
        error_codes: &[&str],
        topic: &str,
    ) -> ClassificationRule {
        ClassificationRule {
            category: category.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            error_codes: error_codes.iter().map(|s| s.to_string()).collect(),
            topic: topic.to_string(),
            resources: vec![format!("{topic} guide")],
        }
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let rules = RuleTable::with_defaults();
        let result = classify(&rules, "Access", "PASSWORD Reset needed", "", None);
        assert_eq!(result.topic, "Password & Account Lockout");

        let result = classify(&rules, "Access", "password reset needed", "", None);
        assert_eq!(result.topic, "Password & Account Lockout");
    }

    #[test]
    fn test_keyword_can_match_in_long_text() {
        let rules = RuleTable::with_defaults();
        let result = classify(
            &rules,
            "Network",
            "cannot work from home",
            "the VPN tunnel drops every hour",
            None,
        );
        assert_eq!(result.topic, "VPN & Remote Access");
    }

    #[test]
    fn test_error_code_match_alone_fires_dual_predicate_rule() {
        let table = RuleTable::new(vec![
            rule("Software", &["crash"], &["sw-crs"], "Stability"),
            rule("Software", &[], &[], "Fallback"),
        ]);
        // No keyword in the text; the error code alone must fire the rule.
        let result = classify(&table, "Software", "weird behaviour", "", Some("SW-CRS-017"));
        assert_eq!(result.topic, "Stability");

        // And the keyword alone as well.
        let result = classify(&table, "Software", "it keeps crashing", "", None);
        assert_eq!(result.topic, "Stability");
    }

    #[test]
    fn test_error_code_matching_is_case_folded_substring() {
        let table = RuleTable::new(vec![
            rule("Hardware", &[], &["HW-PRN"], "Printers"),
            rule("Hardware", &[], &[], "Fallback"),
        ]);
        let result = classify(&table, "Hardware", "x", "", Some("err/hw-prn/42"));
        assert_eq!(result.topic, "Printers");
    }

    #[test]
    fn test_declaration_order_wins_on_overlap() {
        let table = RuleTable::new(vec![
            rule("Other", &["widget"], &[], "First Topic"),
            rule("Other", &["widget", "broken"], &[], "Second Topic"),
            rule("Other", &[], &[], "Fallback"),
        ]);
        let result = classify(&table, "Other", "broken widget", "", None);
        assert_eq!(result.topic, "First Topic");
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let rules = RuleTable::with_defaults();
        let result = classify(&rules, "Other", "completely unrelated text", "", None);
        assert_eq!(result.topic, "General Enquiry");
        assert!(!result.resources.is_empty());
    }

    #[test]
    fn test_default_table_never_returns_unclassified_for_known_categories() {
        let rules = RuleTable::with_defaults();
        for category in CATEGORIES {
            let result = classify(&rules, category, "zzzqqq", "", None);
            assert_ne!(
                result.topic, "Unclassified / Manual Review",
                "category {category} fell through its fallback"
            );
        }
    }

    #[test]
    fn test_unknown_category_is_unclassified() {
        let rules = RuleTable::with_defaults();
        let result = classify(&rules, "Gardening", "printer broken", "", None);
        assert_eq!(result.topic, "Unclassified / Manual Review");
        assert!(result.resources.is_empty());
    }

    #[test]
    fn test_category_without_fallback_can_go_unclassified() {
        let table = RuleTable::new(vec![rule("Other", &["widget"], &[], "Widgets")]);
        let result = classify(&table, "Other", "nothing relevant", "", None);
        assert_eq!(result.topic, "Unclassified / Manual Review");
    }

    #[test]
    fn test_empty_error_code_is_ignored() {
        let table = RuleTable::new(vec![
            rule("Other", &[], &[""], "Suspicious"),
            rule("Other", &[], &[], "Fallback"),
        ]);
        // An empty input code never matches, even against an empty pattern.
        let result = classify(&table, "Other", "text", "", Some("  "));
        assert_eq!(result.topic, "Fallback");
    }
}
