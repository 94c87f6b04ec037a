use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::models::{CandidatePosition, GeneratedContent, VerbCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Warning,
}

/// Discriminant for every finding the pipeline can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    EmptyReferenceHistory,
    ValidationBypassed,
    // structural
    MissingPositions,
    ExtraPositions,
    PositionNotInHistory,
    WrongPositionTitle,
    WrongCompany,
    UsedJdCompany,
    WrongDates,
    WrongOrder,
    WrongBulletCount,
    CharLimitExceeded,
    InvalidVerbCategory,
    // guardrails
    MetricWrongPosition,
    SummaryEchoesBullet,
    VerbCategoryRepeated,
    SummaryMetricNotTraceable,
    PhraseRepeated,
    MetricsLost,
    KeywordNoEvidence,
    NarrativeGap,
    NarrativeGapItem,
    RoleLevelMismatch,
    // content
    LimitationViolated,
    SkillDualClassification,
    BulletTooShort,
    TotalWordsTooFew,
    TotalWordsTooMany,
    TooManyKeywords,
    KeywordRepeated,
    IgnoredKeywordUsed,
    HighPercentage,
    ImpossibleTimeSavings,
    LargeNumber,
    ScopeMismatch,
    EmDashFound,
    // shared policy
    VerbOverRepresented,
    VerbUnderRepresented,
    VerbCriticalGap,
    MetricsDensityLow,
    KeywordDocumentationOnly,
    // secondary
    RecentPositionFewBullets,
    RecentPositionFewMetrics,
    AcronymNotExpanded,
}

/// One finding. Location fields are optional and rule-specific; anything else a rule wants
/// to report (actual vs expected values, offending tokens) goes into `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub requires_regeneration: bool,
    /// Index into `customizedBullets` at the time the rule ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_index: Option<usize>,
    /// Position title the finding is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            requires_regeneration: false,
            position_index: None,
            bullet_index: None,
            position: None,
            details: Map::new(),
        }
    }

    /// Advisory finding. Never blocks.
    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn regenerate(mut self) -> Self {
        self.requires_regeneration = true;
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.position_index = Some(index);
        self
    }

    pub fn at_bullet(mut self, position: &str, bullet_index: usize) -> Self {
        self.position = Some(position.to_string());
        self.bullet_index = Some(bullet_index);
        self
    }

    pub fn for_position(mut self, position: &str) -> Self {
        self.position = Some(position.to_string());
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// What a single rule produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    /// Replacement position list, only set when the rule changed something.
    pub corrected: Option<Vec<CandidatePosition>>,
}

impl RuleOutcome {
    pub fn from_errors(errors: Vec<ValidationIssue>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn from_warnings(warnings: Vec<ValidationIssue>) -> Self {
        Self {
            warnings,
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reports
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    #[serde(rename = "Over-Represented")]
    OverRepresented,
    #[serde(rename = "Well Balanced")]
    WellBalanced,
    #[serde(rename = "Under-Represented")]
    UnderRepresented,
    #[serde(rename = "Critical Gap")]
    CriticalGap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbShare {
    pub count: usize,
    /// Rounded to the nearest whole percent.
    pub percent: u32,
    pub status: BalanceStatus,
}

pub type VerbDistributionReport = BTreeMap<VerbCategory, VerbShare>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DensityStatus {
    #[serde(rename = "Below Target")]
    BelowTarget,
    #[serde(rename = "On Target")]
    OnTarget,
    #[serde(rename = "Above Target")]
    AboveTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDensityReport {
    pub total: usize,
    pub with_metrics: usize,
    pub percent: u32,
    pub target: String,
    pub status: DensityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordEvidenceReport {
    pub tier1: Vec<String>,
    pub tier2: Vec<String>,
    pub tier3: Vec<String>,
    pub not_evidenced: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReports {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb_distribution: Option<VerbDistributionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_density: Option<MetricsDensityReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_evidence: Option<KeywordEvidenceReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_validators: usize,
    pub errors_found: usize,
    pub warnings_found: usize,
    /// Names of the structural rules that actually changed the content.
    pub auto_corrected: Vec<String>,
}

/// The aggregated ledger for one pipeline pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub corrected_content: GeneratedContent,
    pub summary: ValidationSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<ValidationReports>,
}

impl ValidationResult {
    /// Errors that block success and drive another generation attempt.
    pub fn regeneration_errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().filter(|e| e.requires_regeneration)
    }

    pub fn needs_regeneration(&self) -> bool {
        self.regeneration_errors().next().is_some()
    }
}
