//! Keyword sets used to tell company affiliations from academic ones
//!
//! The lists are configuration, not logic: [`KeywordSets::default`] carries the
//! built-in lists, and a YAML file of the form
//!
//! ```yaml
//! company: [Pharma, Biotech]
//! academic: [University, Hospital]
//! ```
//!
//! can replace either list.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PaperFetchError, Result};

/// Built-in company keywords
pub const DEFAULT_COMPANY_KEYWORDS: &[&str] = &[
    "Pharma",
    "Biotech",
    "Genomics",
    "Diagnostics",
    "Therapeutics",
    "Life Sciences",
    "Biologics",
    "Biomedical",
    "Vaccines",
    "Drug",
    "Healthcare",
    "MedTech",
    "Molecular",
    "Immunology",
    "Cell Therapy",
    "Gene Therapy",
    "Neuroscience",
];

/// Built-in academic keywords
pub const DEFAULT_ACADEMIC_KEYWORDS: &[&str] = &[
    "University",
    "Institute",
    "College",
    "School",
    "Academy",
    "Department",
    "Hospital",
    "Medical Center",
    "Research Center",
    "Clinical Center",
    "National Institute",
];

#[derive(Debug, Default, Deserialize)]
struct KeywordFile {
    #[serde(default)]
    company: Option<Vec<String>>,
    #[serde(default)]
    academic: Option<Vec<String>>,
}

/// Company and academic keyword lists, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSets {
    company: Vec<String>,
    academic: Vec<String>,
    #[serde(skip)]
    company_lower: Vec<String>,
    #[serde(skip)]
    academic_lower: Vec<String>,
}

impl KeywordSets {
    /// Build keyword sets from custom lists; blank entries are dropped
    pub fn new<C, A, S>(company: C, academic: A) -> Self
    where
        C: IntoIterator<Item = S>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let company = normalize(company);
        let academic = normalize(academic);

        Self {
            company_lower: lowercase_all(&company),
            academic_lower: lowercase_all(&academic),
            company,
            academic,
        }
    }

    /// Parse a YAML keyword document; a missing list keeps the built-in one
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let file: KeywordFile = serde_yaml::from_str(yaml)?;
        let defaults = Self::default();

        Ok(Self::new(
            file.company.unwrap_or(defaults.company),
            file.academic.unwrap_or(defaults.academic),
        ))
    }

    /// Load keyword sets from a YAML file on disk
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PaperFetchError::KeywordConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let sets = Self::from_yaml_str(&content).map_err(|e| PaperFetchError::KeywordConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(
            path = %path.display(),
            company = sets.company.len(),
            academic = sets.academic.len(),
            "Loaded keyword sets"
        );

        Ok(sets)
    }

    pub fn company(&self) -> &[String] {
        &self.company
    }

    pub fn academic(&self) -> &[String] {
        &self.academic
    }

    /// True if any company keyword occurs in the (already lowercased) text
    pub(crate) fn matches_company(&self, text_lower: &str) -> bool {
        self.company_lower.iter().any(|k| text_lower.contains(k.as_str()))
    }

    /// True if any academic keyword occurs in the (already lowercased) text
    pub(crate) fn matches_academic(&self, text_lower: &str) -> bool {
        self.academic_lower
            .iter()
            .any(|k| text_lower.contains(k.as_str()))
    }
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self::new(
            DEFAULT_COMPANY_KEYWORDS.iter().copied(),
            DEFAULT_ACADEMIC_KEYWORDS.iter().copied(),
        )
    }
}

fn normalize<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keywords
        .into_iter()
        .map(|k| k.into().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}
