//! Keyword matching for incoming questions.
//!
//! A question is *tax related* when it mentions one of [`TAX_KEYWORDS`] as a
//! whole word, and a *follow-up* when it contains one of [`FOLLOW_UP_PHRASES`].
//! Matching is case-insensitive and anchored on word boundaries, so `"syntax"`
//! never counts as `"tax"`.

use once_cell::sync::Lazy;
use regex::Regex;

pub const TAX_KEYWORDS: &[&str] = &[
    "deduction",
    "deductions",
    "credit",
    "credits",
    "tax",
    "return",
    "filing",
    "IRS",
    "exemption",
    "taxable",
    "income",
    "expenses",
    "audit",
    "rebate",
    "refund",
    "w-2",
    "w-4",
    "form",
    "schedule",
    "tax laws",
    "capital gains",
    "tax rate",
    "withholding",
    "payroll",
    "adjusted gross income",
    "standard deduction",
    "itemized deduction",
    "earned income",
    "dependent",
    "1099",
    "1040",
    "self-employment tax",
    "estate tax",
    "gift tax",
    "alternative minimum tax",
    "tax bracket",
    "tax liability",
    "taxable income",
];

pub const FOLLOW_UP_PHRASES: &[&str] = &[
    "more details",
    "explain further",
    "in-depth",
    "elaborate",
    "can you clarify",
    "expand",
    "give more information",
    "go deeper",
    "explain in more detail",
    "I did not understand",
];

static DEFAULT: Lazy<Classifier> = Lazy::new(Classifier::default);

static NEVER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\B").expect("invalid never regex"));

#[derive(Debug, Clone)]
pub struct Classifier {
    tax: Regex,
    follow_up: Regex,
}

impl Classifier {
    pub fn new<S: AsRef<str>>(tax_keywords: &[S], follow_up_phrases: &[S]) -> Self {
        Self {
            tax: word_pattern(tax_keywords),
            follow_up: word_pattern(follow_up_phrases),
        }
    }

    pub fn is_tax_related(&self, text: &str) -> bool {
        self.tax.is_match(text)
    }

    pub fn is_follow_up(&self, text: &str) -> bool {
        self.follow_up.is_match(text)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(TAX_KEYWORDS, FOLLOW_UP_PHRASES)
    }
}

/// Builds `(?i)\b(?:a|b|...)\b`. An empty list yields a pattern that never matches.
fn word_pattern<S: AsRef<str>>(terms: &[S]) -> Regex {
    let alternatives: Vec<String> = terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return NEVER.clone();
    }

    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    // Escaped literals always form a valid pattern.
    Regex::new(&pattern).unwrap_or_else(|_| NEVER.clone())
}

pub fn is_tax_related(text: &str) -> bool {
    DEFAULT.is_tax_related(text)
}

pub fn is_follow_up(text: &str) -> bool {
    DEFAULT.is_follow_up(text)
}
