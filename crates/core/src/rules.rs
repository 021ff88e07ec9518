use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{GatewayError, GatewayResult};

/// The fixed category labels accepted by the intake form.
pub const CATEGORIES: &[&str] = &[
    "Hardware",
    "Software",
    "Network",
    "Access",
    "Automation",
    "Other",
];

/// One classification rule. A rule with neither keywords nor error-code
/// patterns is the fallback for its category and matches unconditionally
/// once the specific rules have been tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub error_codes: Vec<String>,
    pub topic: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl ClassificationRule {
    pub fn is_fallback(&self) -> bool {
        self.keywords.is_empty() && self.error_codes.is_empty()
    }
}

/// Immutable rule table, built once at startup and shared read-only.
/// Declaration order is priority order and must be preserved.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<ClassificationRule>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<ClassificationRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        let table = Self { rules };
        table.warn_on_missing_fallbacks();
        table
    }

    /// Built-in rule set covering every fixed category.
    pub fn with_defaults() -> Self {
        Self::new(default_rules())
    }

    /// Load rules from a TOML file (`[[rules]]` entries), replacing the
    /// built-in table entirely.
    pub fn from_toml_file(path: &str) -> GatewayResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Configuration(format!("cannot read rules file {path}: {e}"))
        })?;
        let parsed: RuleFile = toml::from_str(&raw).map_err(|e| {
            GatewayError::Configuration(format!("cannot parse rules file {path}: {e}"))
        })?;
        if parsed.rules.is_empty() {
            return Err(GatewayError::Configuration(format!(
                "rules file {path} contains no rules"
            )));
        }
        Ok(Self::new(parsed.rules))
    }

    /// Rules for one category, in declaration order.
    pub fn rules_for<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ClassificationRule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    pub fn all(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn is_known_category(&self, category: &str) -> bool {
        CATEGORIES.contains(&category)
    }

    /// A category without a fallback rule classifies some inputs as
    /// unclassified; flag that at startup so the operator can see it.
    fn warn_on_missing_fallbacks(&self) {
        for category in CATEGORIES {
            let has_rules = self.rules.iter().any(|r| r.category == *category);
            let has_fallback = self
                .rules
                .iter()
                .any(|r| r.category == *category && r.is_fallback());
            if has_rules && !has_fallback {
                warn!(category, "classification category has no fallback rule");
            }
        }
    }
}

fn rule(
    category: &str,
    keywords: &[&str],
    error_codes: &[&str],
    topic: &str,
    resources: &[&str],
) -> ClassificationRule {
    ClassificationRule {
        category: category.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        error_codes: error_codes.iter().map(|s| s.to_string()).collect(),
        topic: topic.to_string(),
        resources: resources.iter().map(|s| s.to_string()).collect(),
    }
}

/// Built-in classification table. Order matters: within a category the
/// first matching rule wins, and the predicate-free entry is the fallback.
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        // Hardware
        rule(
            "Hardware",
            &["printer", "toner", "paper jam"],
            &["hw-prn"],
            "Printer & Peripherals",
            &[
                "Printer troubleshooting guide (kb/printer-basics)",
                "Submitting a toner order (kb/consumables)",
            ],
        ),
        rule(
            "Hardware",
            &["laptop", "battery", "screen", "keyboard"],
            &["hw-lap"],
            "Laptop & Desktop Hardware",
            &[
                "Laptop battery care (kb/laptop-battery)",
                "Requesting a hardware swap (kb/hardware-swap)",
            ],
        ),
        rule(
            "Hardware",
            &[],
            &[],
            "General Hardware Support",
            &["Hardware support overview (kb/hardware)"],
        ),
        // Software
        rule(
            "Software",
            &["install", "license", "activation"],
            &["sw-lic"],
            "Software Licensing & Install",
            &[
                "Self-service software catalog (kb/software-catalog)",
                "License activation walkthrough (kb/license-activation)",
            ],
        ),
        rule(
            "Software",
            &["crash", "freeze", "error", "not responding"],
            &["sw-crs", "0xc0000005"],
            "Application Stability",
            &[
                "Collecting crash logs (kb/crash-logs)",
                "Known issues dashboard (kb/known-issues)",
            ],
        ),
        rule(
            "Software",
            &[],
            &[],
            "General Software Support",
            &["Software support overview (kb/software)"],
        ),
        // Network
        rule(
            "Network",
            &["vpn", "tunnel", "remote access"],
            &["net-vpn"],
            "VPN & Remote Access",
            &[
                "VPN setup guide (kb/vpn-setup)",
                "Split-tunnel FAQ (kb/vpn-faq)",
            ],
        ),
        rule(
            "Network",
            &["wifi", "wireless", "ethernet", "dns"],
            &["net-dns", "net-dhcp"],
            "Connectivity",
            &[
                "Office Wi-Fi onboarding (kb/wifi)",
                "Wired network checklist (kb/ethernet)",
            ],
        ),
        rule(
            "Network",
            &[],
            &[],
            "General Network Support",
            &["Network support overview (kb/network)"],
        ),
        // Access
        rule(
            "Access",
            &["password", "reset", "locked out", "lockout"],
            &["acc-pwd"],
            "Password & Account Lockout",
            &[
                "Self-service password reset (kb/password-reset)",
                "Account lockout policy (kb/lockout-policy)",
            ],
        ),
        rule(
            "Access",
            &["permission", "share", "folder", "group"],
            &["acc-prm"],
            "Permissions & Shares",
            &["Requesting folder access (kb/folder-access)"],
        ),
        rule(
            "Access",
            &[],
            &[],
            "General Access Support",
            &["Access support overview (kb/access)"],
        ),
        // Automation
        rule(
            "Automation",
            &["onboard", "provision", "new starter", "new hire"],
            &["auto-prov"],
            "Automated Provisioning",
            &[
                "What the provisioning robot does (kb/provisioning)",
                "Tracking an onboarding request (kb/onboarding-status)",
            ],
        ),
        rule(
            "Automation",
            &[],
            &[],
            "Automation Requests",
            &["Automation request overview (kb/automation)"],
        ),
        // Other
        rule(
            "Other",
            &["invoice", "billing"],
            &[],
            "Billing Questions",
            &["Billing contacts (kb/billing)"],
        ),
        rule(
            "Other",
            &[],
            &[],
            "General Enquiry",
            &["Service desk handbook (kb/handbook)"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_every_category_has_a_fallback() {
        let table = RuleTable::with_defaults();
        for category in CATEGORIES {
            assert!(
                table.rules_for(category).any(|r| r.is_fallback()),
                "category {category} is missing a fallback rule"
            );
        }
    }

    #[test]
    fn test_rules_for_preserves_declaration_order() {
        let table = RuleTable::with_defaults();
        let topics: Vec<&str> = table
            .rules_for("Hardware")
            .map(|r| r.topic.as_str())
            .collect();
        assert_eq!(
            topics,
            vec![
                "Printer & Peripherals",
                "Laptop & Desktop Hardware",
                "General Hardware Support"
            ]
        );
    }

    #[test]
    fn test_known_categories() {
        let table = RuleTable::with_defaults();
        assert!(table.is_known_category("Automation"));
        assert!(!table.is_known_category("Gardening"));
    }

    #[test]
    fn test_load_rules_from_toml() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[[rules]]
category = "Other"
keywords = ["coffee"]
topic = "Kitchen Equipment"
resources = ["Coffee machine manual (kb/coffee)"]

[[rules]]
category = "Other"
topic = "Catch All"
"#
        )
        .unwrap();

        let table = RuleTable::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.all().len(), 2);
        assert!(table.all()[1].is_fallback());
    }

    #[test]
    fn test_empty_rules_file_is_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "rules = []").unwrap();
        assert!(RuleTable::from_toml_file(file.path().to_str().unwrap()).is_err());
    }
}
