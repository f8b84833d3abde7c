//! Affiliation classification
//!
//! Decides whether a single affiliation string belongs to a company rather than
//! an academic institution, and pulls out a cleaned company name and an email
//! address when present.
//!
//! An affiliation counts as a company affiliation only when it matches at least
//! one company keyword and no academic keyword. Mixed affiliations such as
//! "Institute of Molecular Biology" are therefore rejected.
//!
//! Company-name cleaning cuts the text at the first standalone run of digits
//! (street numbers, postal codes) and drops any trailing `Electronic address:`
//! fragment. A company whose name itself contains a standalone number will be
//! truncated; this is a known limitation of the heuristic.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::keywords::KeywordSets;

/// Result of classifying one affiliation string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAffiliation {
    /// Matches at least one company keyword
    pub is_company: bool,
    /// Matches at least one academic keyword
    pub is_academic: bool,
    /// Cleaned company name, present when a company keyword matched
    pub company_name: Option<String>,
    /// First email address found in the text
    pub email: Option<String>,
}

impl ClassifiedAffiliation {
    /// Company keyword present and no academic keyword present
    pub fn is_non_academic_company(&self) -> bool {
        self.is_company && !self.is_academic
    }
}

/// Classifies affiliation strings against injected keyword sets
#[derive(Debug, Clone, Default)]
pub struct AffiliationClassifier {
    keywords: KeywordSets,
}

impl AffiliationClassifier {
    pub fn new(keywords: KeywordSets) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordSets {
        &self.keywords
    }

    /// Classify one affiliation string
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_paper_fetcher::AffiliationClassifier;
    ///
    /// let classifier = AffiliationClassifier::default();
    /// let result = classifier.classify("XYZ Pharmaceuticals Inc., 123 Main St, jdoe@xyz.com");
    ///
    /// assert!(result.is_non_academic_company());
    /// assert_eq!(result.company_name.as_deref(), Some("XYZ Pharmaceuticals Inc."));
    /// assert_eq!(result.email.as_deref(), Some("jdoe@xyz.com"));
    /// ```
    pub fn classify(&self, affiliation: &str) -> ClassifiedAffiliation {
        let lower = affiliation.to_lowercase();
        let is_company = self.keywords.matches_company(&lower);
        let is_academic = self.keywords.matches_academic(&lower);

        ClassifiedAffiliation {
            is_company,
            is_academic,
            company_name: if is_company {
                extract_company_name(affiliation)
            } else {
                None
            },
            email: extract_email(affiliation),
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
            .expect("email regex is valid")
    })
}

fn electronic_address_regex() -> &'static Regex {
    static ELECTRONIC_ADDRESS_REGEX: OnceLock<Regex> = OnceLock::new();
    ELECTRONIC_ADDRESS_REGEX.get_or_init(|| {
        Regex::new(r"(?i)electronic\s+address\s*:.*$").expect("electronic address regex is valid")
    })
}

fn digit_run_regex() -> &'static Regex {
    static DIGIT_RUN_REGEX: OnceLock<Regex> = OnceLock::new();
    DIGIT_RUN_REGEX.get_or_init(|| Regex::new(r"\b\d+\b").expect("digit run regex is valid"))
}

/// Extract the first email-looking token from affiliation text
pub fn extract_email(text: &str) -> Option<String> {
    email_regex().find(text).map(|m| m.as_str().to_string())
}

/// Clean an affiliation down to its company name
///
/// Returns `None` when nothing is left after cleaning.
pub fn extract_company_name(text: &str) -> Option<String> {
    let without_address = match electronic_address_regex().find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };

    let without_digits = match digit_run_regex().find(without_address) {
        Some(m) => &without_address[..m.start()],
        None => without_address,
    };

    let cleaned = without_digits
        .trim()
        .trim_end_matches([',', ';', ':'])
        .trim_end();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
