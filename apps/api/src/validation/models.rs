//! Wire types for generator-drafted resume content and the inputs the pipeline checks it
//! against. JSON keys are camelCase to match the generator output contract.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Verb taxonomy
// ────────────────────────────────────────────────────────────────────────────

/// Fixed five-bucket taxonomy for a bullet's governing verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerbCategory {
    Built,
    Lead,
    Managed,
    Improved,
    Collaborate,
}

impl VerbCategory {
    pub const ALL: [VerbCategory; 5] = [
        VerbCategory::Built,
        VerbCategory::Lead,
        VerbCategory::Managed,
        VerbCategory::Improved,
        VerbCategory::Collaborate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VerbCategory::Built => "Built",
            VerbCategory::Lead => "Lead",
            VerbCategory::Managed => "Managed",
            VerbCategory::Improved => "Improved",
            VerbCategory::Collaborate => "Collaborate",
        }
    }

    /// Exact, case-sensitive lookup. Anything else is an invalid category.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for VerbCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generated content
// ────────────────────────────────────────────────────────────────────────────

/// One drafted bullet. `verb_category` stays a raw string so an invalid value survives
/// deserialization and can be reported instead of failing the whole parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "BulletRepr")]
pub struct CandidateBullet {
    pub text: String,
    pub verb_category: String,
    pub keywords_used: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_metric: Option<bool>,
}

impl CandidateBullet {
    pub fn category(&self) -> Option<VerbCategory> {
        VerbCategory::parse(&self.verb_category)
    }

    /// Length in characters, derived from the text rather than trusting `charCount`.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Generators sometimes emit bare strings instead of bullet objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum BulletRepr {
    Text(String),
    Detailed(DetailedBullet),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailedBullet {
    #[serde(default)]
    text: String,
    #[serde(default)]
    verb_category: Option<String>,
    #[serde(default)]
    keywords_used: Option<Vec<String>>,
    #[serde(default)]
    char_count: Option<usize>,
    #[serde(default)]
    has_metric: Option<bool>,
}

impl From<BulletRepr> for CandidateBullet {
    fn from(repr: BulletRepr) -> Self {
        match repr {
            BulletRepr::Text(text) => CandidateBullet {
                text,
                verb_category: String::new(),
                keywords_used: vec![],
                char_count: None,
                has_metric: None,
            },
            BulletRepr::Detailed(b) => CandidateBullet {
                text: b.text,
                verb_category: b.verb_category.unwrap_or_default(),
                keywords_used: b.keywords_used.unwrap_or_default(),
                char_count: b.char_count,
                has_metric: b.has_metric,
            },
        }
    }
}

/// A drafted position block. Mutable: the structural tier rewrites its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePosition {
    #[serde(rename = "position")]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub bullets: Vec<CandidateBullet>,
}

impl CandidatePosition {
    pub fn bullet_texts(&self) -> impl Iterator<Item = &str> {
        self.bullets.iter().map(|b| b.text.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalSummary {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub keywords_integrated: Vec<String>,
    #[serde(default)]
    pub metrics_included: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordLocation {
    pub keyword: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedKeyword {
    pub keyword: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCoverageReport {
    #[serde(default)]
    pub successfully_incorporated: Vec<KeywordLocation>,
    #[serde(default)]
    pub skipped_not_evidenced: Vec<SkippedKeyword>,
}

/// The generator's own self-assessment. Only ever produces warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeVerification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_requirements_met: Option<Vec<String>>,
    #[serde(default)]
    pub narrative_gaps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_level_alignment: Option<String>,
    /// Generators return this as a number or a string; kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
}

/// The full generator output envelope. Unknown top-level keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    #[serde(default)]
    pub customized_bullets: Vec<CandidatePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_summary: Option<ProfessionalSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_coverage_report: Option<KeywordCoverageReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_verification: Option<NarrativeVerification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_skills: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeneratedContent {
    /// Summary text, or `None` when absent or blank.
    pub fn summary_text(&self) -> Option<&str> {
        self.professional_summary
            .as_ref()
            .map(|s| s.text.as_str())
            .filter(|t| !t.trim().is_empty())
    }

    /// `hardSkills`, falling back to `technicalSkills`.
    pub fn hard_skill_list(&self) -> &[String] {
        self.hard_skills
            .as_deref()
            .or(self.technical_skills.as_deref())
            .unwrap_or(&[])
    }

    pub fn soft_skill_list(&self) -> &[String] {
        self.soft_skills.as_deref().unwrap_or(&[])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline inputs
// ────────────────────────────────────────────────────────────────────────────

/// The job being applied to. Only the company name is read structurally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDescription {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Keywords the candidate asked to use or to keep out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordIntents {
    #[serde(rename = "use", default)]
    pub use_keywords: Vec<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl KeywordIntents {
    pub fn new(use_keywords: Vec<String>, ignore: Vec<String>) -> Self {
        Self {
            use_keywords,
            ignore,
        }
    }
}

/// Strips a leading `Custom:` marker (added by the keyword picker) and lowercases.
pub fn normalize_keyword(keyword: &str) -> String {
    let trimmed = keyword.trim();
    let without_prefix = match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("custom:") => trimmed[7..].trim_start(),
        _ => trimmed,
    };
    without_prefix.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Principal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<f64>,
}

impl CandidateProfile {
    pub fn is_junior(&self, max_junior_years: f64) -> bool {
        self.experience_level == Some(ExperienceLevel::Junior)
            || self.years_experience.is_some_and(|y| y < max_junior_years)
    }
}
