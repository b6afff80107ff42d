// src/categories.rs
//! Multi-label content categorization. A fixed ordered table of keyword
//! rules; every rule is evaluated independently, so one item can carry
//! several categories (or none).

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    AiEducation,
    Hackathon,
    National,
    Health,
    Agriculture,
    Opportunities,
}

struct CategoryRule {
    category: Category,
    label: &'static str,
    patterns: Vec<Regex>,
}

static CATEGORY_RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        rule(
            Category::AiEducation,
            "AI education",
            &[
                r"\beducation\b",
                r"\bcurriculum\b",
                r"\bschool(s)?\b",
                r"\buniversity\b",
                r"\btraining\b",
                r"\bcourse(s)?\b",
                r"\blearning\b",
            ],
        ),
        rule(
            Category::Hackathon,
            "Hackathon",
            &[
                r"\bhackathon\b",
                r"\bchallenge\b",
                r"\baccelerator\b",
                r"\bbootcamp\b",
                r"\bcompetition\b",
            ],
        ),
        rule(
            Category::National,
            "National",
            &[
                r"\bgovernment\b",
                r"\bministry\b",
                r"\bpolicy\b",
                r"\bregulation\b",
                r"\bnational strategy\b",
            ],
        ),
        rule(
            Category::Health,
            "Health",
            &[
                r"\bhealth\b",
                r"\bmedical\b",
                r"\bhospital\b",
                r"\bhealthcare\b",
                r"\bdiagnosis\b",
            ],
        ),
        rule(
            Category::Agriculture,
            "Agriculture",
            &[
                r"\bagriculture\b",
                r"\bfarming\b",
                r"\bagritech\b",
                r"\bcrop(s)?\b",
                r"\blivestock\b",
            ],
        ),
        rule(
            Category::Opportunities,
            "Opportunities",
            &[
                r"\bgrant(s)?\b",
                r"\bfunding\b",
                r"\bfellowship(s)?\b",
                r"\bjobs?\b",
                r"\bhiring\b",
                r"\bscholarship(s)?\b",
            ],
        ),
    ]
});

fn rule(category: Category, label: &'static str, patterns: &[&str]) -> CategoryRule {
    let patterns = patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("category pattern `{p}`: {e}"))
        })
        .collect();
    CategoryRule {
        category,
        label,
        patterns,
    }
}

/// Every matching category, in table order, each at most once. Empty input
/// yields no categories.
pub fn classify(text: &str) -> Vec<Category> {
    if text.is_empty() {
        return Vec::new();
    }
    CATEGORY_RULES
        .iter()
        .filter(|rule| rule.patterns.iter().any(|re| re.is_match(text)))
        .map(|rule| rule.category)
        .collect()
}

impl Category {
    /// Human label for display, the reverse of the rule table's identifier.
    pub fn label(self) -> &'static str {
        CATEGORY_RULES
            .iter()
            .find(|rule| rule.category == self)
            .map(|rule| rule.label)
            .expect("every category has a rule")
    }
}
