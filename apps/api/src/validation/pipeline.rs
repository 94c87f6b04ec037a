//! The ordered validation pipeline.
//!
//! Rules run in a fixed canonical order. Structural rules may hand back a corrected
//! position list, which every later rule reads instead of the original. Subsets built with
//! [`Pipeline::only`] or [`Pipeline::tiers`] keep that order.

use serde::Serialize;
use tracing::{debug, warn};

use crate::history::models::PositionRecord;
use crate::validation::config::ValidationConfig;
use crate::validation::issues::{
    IssueKind, RuleOutcome, Severity, ValidationIssue, ValidationReports, ValidationResult,
    ValidationSummary,
};
use crate::validation::models::{
    CandidatePosition, CandidateProfile, GeneratedContent, KeywordIntents, TargetDescription,
};
use crate::validation::structural::{self, EligiblePosition};
use crate::validation::{content, guardrails, policy, secondary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// Knows the ground truth and corrects in place.
    Structural,
    Guardrail,
    Content,
    /// Report builders shared by every caller.
    SharedPolicy,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    ChronologyDepth,
    PositionMetadata,
    ChronologicalOrder,
    BulletCount,
    BulletFormat,
    MetricTraceability,
    SummaryAbstraction,
    VerbDiversity,
    SummaryMetrics,
    PhraseRepetition,
    MetricPreservation,
    KeywordEvidence,
    NarrativeFit,
    LimitationEnforcement,
    SkillClassification,
    BudgetEnforcement,
    KeywordDensity,
    MetricPlausibility,
    ScopeAttribution,
    AtsFormatting,
    VerbDistribution,
    MetricsDensity,
    KeywordEvidenceTier,
    RecencyWeighting,
    AcronymExpansion,
}

impl Rule {
    /// Canonical execution order.
    pub const ALL: [Rule; 25] = [
        Rule::ChronologyDepth,
        Rule::PositionMetadata,
        Rule::ChronologicalOrder,
        Rule::BulletCount,
        Rule::BulletFormat,
        Rule::MetricTraceability,
        Rule::SummaryAbstraction,
        Rule::VerbDiversity,
        Rule::SummaryMetrics,
        Rule::PhraseRepetition,
        Rule::MetricPreservation,
        Rule::KeywordEvidence,
        Rule::NarrativeFit,
        Rule::LimitationEnforcement,
        Rule::SkillClassification,
        Rule::BudgetEnforcement,
        Rule::KeywordDensity,
        Rule::MetricPlausibility,
        Rule::ScopeAttribution,
        Rule::AtsFormatting,
        Rule::VerbDistribution,
        Rule::MetricsDensity,
        Rule::KeywordEvidenceTier,
        Rule::RecencyWeighting,
        Rule::AcronymExpansion,
    ];

    pub fn tier(self) -> Tier {
        use Rule::*;
        match self {
            ChronologyDepth | PositionMetadata | ChronologicalOrder | BulletCount
            | BulletFormat => Tier::Structural,
            MetricTraceability | SummaryAbstraction | VerbDiversity | SummaryMetrics
            | PhraseRepetition | MetricPreservation | KeywordEvidence | NarrativeFit => {
                Tier::Guardrail
            }
            LimitationEnforcement | SkillClassification | BudgetEnforcement | KeywordDensity
            | MetricPlausibility | ScopeAttribution | AtsFormatting => Tier::Content,
            VerbDistribution | MetricsDensity | KeywordEvidenceTier => Tier::SharedPolicy,
            RecencyWeighting | AcronymExpansion => Tier::Secondary,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::ChronologyDepth => "chronologyDepth",
            Rule::PositionMetadata => "positionMetadata",
            Rule::ChronologicalOrder => "chronologicalOrder",
            Rule::BulletCount => "bulletCount",
            Rule::BulletFormat => "bulletFormat",
            Rule::MetricTraceability => "metricTraceability",
            Rule::SummaryAbstraction => "summaryAbstraction",
            Rule::VerbDiversity => "verbDiversity",
            Rule::SummaryMetrics => "summaryMetrics",
            Rule::PhraseRepetition => "phraseRepetition",
            Rule::MetricPreservation => "metricPreservation",
            Rule::KeywordEvidence => "keywordEvidence",
            Rule::NarrativeFit => "narrativeFit",
            Rule::LimitationEnforcement => "limitationEnforcement",
            Rule::SkillClassification => "skillClassification",
            Rule::BudgetEnforcement => "budgetEnforcement",
            Rule::KeywordDensity => "keywordDensity",
            Rule::MetricPlausibility => "metricPlausibility",
            Rule::ScopeAttribution => "scopeAttribution",
            Rule::AtsFormatting => "atsFormatting",
            Rule::VerbDistribution => "verbDistribution",
            Rule::MetricsDensity => "metricsDensity",
            Rule::KeywordEvidenceTier => "keywordEvidenceTier",
            Rule::RecencyWeighting => "recencyWeighting",
            Rule::AcronymExpansion => "acronymExpansion",
        }
    }
}

/// Everything one pass reads. Borrowed; the pipeline never mutates its inputs.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub content: &'a GeneratedContent,
    pub history: &'a [PositionRecord],
    pub target: &'a TargetDescription,
    pub keywords: &'a KeywordIntents,
    pub limitations: &'a [String],
    pub profile: &'a CandidateProfile,
}

/// An ordered, immutable selection of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    rules: Vec<Rule>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    pub fn standard() -> Self {
        Self {
            rules: Rule::ALL.to_vec(),
        }
    }

    /// The listed rules, in canonical order regardless of the order given.
    pub fn only(rules: &[Rule]) -> Self {
        Self {
            rules: Rule::ALL
                .into_iter()
                .filter(|r| rules.contains(r))
                .collect(),
        }
    }

    /// Every rule belonging to one of the listed tiers.
    pub fn tiers(tiers: &[Tier]) -> Self {
        Self {
            rules: Rule::ALL
                .into_iter()
                .filter(|r| tiers.contains(&r.tier()))
                .collect(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn run(&self, input: &ValidationInput<'_>, config: &ValidationConfig) -> ValidationResult {
        if input.history.is_empty() {
            warn!("Reference history is empty, bypassing validation");
            return bypassed(input.content);
        }

        let eligible = structural::eligible_positions(input.history, config);
        let mut positions = input.content.customized_bullets.clone();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut auto_corrected = Vec::new();
        let mut reports = ValidationReports::default();

        for &rule in &self.rules {
            let outcome = apply(rule, input, &positions, &eligible, config, &mut reports);
            if let Some(corrected) = outcome.corrected {
                positions = corrected;
                auto_corrected.push(rule.name().to_string());
            }
            errors.extend(outcome.errors);
            warnings.extend(outcome.warnings);
        }

        let summary = ValidationSummary {
            total_validators: self.rules.len(),
            errors_found: errors.len(),
            warnings_found: warnings.len(),
            auto_corrected,
        };
        debug!(
            validators = summary.total_validators,
            errors = summary.errors_found,
            warnings = summary.warnings_found,
            corrected = ?summary.auto_corrected,
            "Validation pass complete"
        );

        let corrected_content = GeneratedContent {
            customized_bullets: positions,
            ..input.content.clone()
        };

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
            corrected_content,
            summary,
            reports: Some(reports),
        }
    }
}

fn bypassed(content: &GeneratedContent) -> ValidationResult {
    let error = ValidationIssue::new(
        IssueKind::EmptyReferenceHistory,
        Severity::High,
        "Reference history is empty. Skipping validation to prevent data loss.",
    );
    let warning = ValidationIssue::warning(
        IssueKind::ValidationBypassed,
        "Validation bypassed due to missing reference history.",
    );
    ValidationResult {
        valid: false,
        errors: vec![error],
        warnings: vec![warning],
        corrected_content: content.clone(),
        summary: ValidationSummary {
            total_validators: 0,
            errors_found: 1,
            warnings_found: 1,
            auto_corrected: vec![],
        },
        reports: None,
    }
}

fn apply(
    rule: Rule,
    input: &ValidationInput<'_>,
    positions: &[CandidatePosition],
    eligible: &[EligiblePosition<'_>],
    config: &ValidationConfig,
    reports: &mut ValidationReports,
) -> RuleOutcome {
    let history = input.history;
    let summary = input.content.summary_text();

    match rule {
        Rule::ChronologyDepth => structural::chronology_depth(positions, history, eligible, config),
        Rule::PositionMetadata => {
            structural::position_metadata(positions, history, eligible, input.target, config)
        }
        Rule::ChronologicalOrder => structural::chronological_order(positions),
        Rule::BulletCount => structural::bullet_count(positions, history, eligible, config),
        Rule::BulletFormat => structural::bullet_format(positions, config),

        Rule::MetricTraceability => guardrails::metric_traceability(positions, history, config),
        Rule::SummaryAbstraction => guardrails::summary_abstraction(summary, positions, config),
        Rule::VerbDiversity => guardrails::verb_diversity(positions),
        Rule::SummaryMetrics => guardrails::summary_metric_reconciliation(summary, positions),
        Rule::PhraseRepetition => guardrails::phrase_repetition(summary, positions, config),
        Rule::MetricPreservation => guardrails::metric_preservation(positions, history, config),
        Rule::KeywordEvidence => guardrails::keyword_evidence(positions, history, input.keywords),
        Rule::NarrativeFit => {
            guardrails::narrative_fit(input.content.narrative_verification.as_ref(), config)
        }

        Rule::LimitationEnforcement => {
            content::limitation_enforcement(positions, input.limitations)
        }
        Rule::SkillClassification => content::skill_classification(input.content),
        Rule::BudgetEnforcement => content::budget_enforcement(positions, summary, config),
        Rule::KeywordDensity => {
            content::keyword_density(positions, summary, input.keywords, config)
        }
        Rule::MetricPlausibility => content::metric_plausibility(positions),
        Rule::ScopeAttribution => content::scope_attribution(positions, input.profile, config),
        Rule::AtsFormatting => content::ats_formatting(positions, summary),

        Rule::VerbDistribution => {
            let (outcome, report) = policy::verb_distribution(positions, config);
            reports.verb_distribution = Some(report);
            outcome
        }
        Rule::MetricsDensity => {
            let (outcome, report) = policy::metrics_density(positions, config);
            reports.metrics_density = Some(report);
            outcome
        }
        Rule::KeywordEvidenceTier => {
            let (outcome, report) = policy::keyword_evidence_tier(positions, input.keywords);
            reports.keyword_evidence = Some(report);
            outcome
        }

        Rule::RecencyWeighting => secondary::recency_weighting(positions, config),
        Rule::AcronymExpansion => secondary::acronym_expansion(positions, summary),
    }
}

/// Runs the standard pipeline.
pub fn validate(
    content: &GeneratedContent,
    history: &[PositionRecord],
    target: &TargetDescription,
    keywords: &KeywordIntents,
    limitations: &[String],
    profile: &CandidateProfile,
    config: &ValidationConfig,
) -> ValidationResult {
    let input = ValidationInput {
        content,
        history,
        target,
        keywords,
        limitations,
        profile,
    };
    Pipeline::standard().run(&input, config)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::models::CandidateBullet;

    fn make_record(title: &str, company: &str, dates: &str) -> PositionRecord {
        PositionRecord {
            title: title.to_string(),
            company: company.to_string(),
            dates: dates.to_string(),
            is_independent: false,
            bullets: vec![],
        }
    }

    fn make_position(title: &str, company: &str, dates: &str, bullets: &[&str]) -> CandidatePosition {
        CandidatePosition {
            title: title.to_string(),
            company: company.to_string(),
            dates: dates.to_string(),
            bullets: bullets
                .iter()
                .zip(VerbCategoryCycle::new())
                .map(|(text, category)| CandidateBullet {
                    text: text.to_string(),
                    verb_category: category.to_string(),
                    keywords_used: vec![],
                    char_count: None,
                    has_metric: None,
                })
                .collect(),
        }
    }

    /// Distinct categories per position so verb diversity stays quiet.
    struct VerbCategoryCycle(usize);

    impl VerbCategoryCycle {
        fn new() -> Self {
            Self(0)
        }
    }

    impl Iterator for VerbCategoryCycle {
        type Item = &'static str;

        fn next(&mut self) -> Option<Self::Item> {
            let all = ["Built", "Lead", "Managed", "Improved", "Collaborate"];
            let item = all[self.0 % all.len()];
            self.0 += 1;
            Some(item)
        }
    }

    fn history() -> Vec<PositionRecord> {
        vec![
            make_record("Senior Backend Engineer", "Acme Corp", "2022-Present"),
            make_record("Backend Engineer", "Initech", "2016-2022"),
            make_record("Data Analyst", "Globex", "2013-2015"),
            make_record("Systems Engineer", "Umbrella", "2008-2014"),
        ]
    }

    fn content() -> GeneratedContent {
        GeneratedContent {
            customized_bullets: vec![
                make_position(
                    "Backend Engineer",
                    "Initech LLC",
                    "2016-2022",
                    &["Shipped billing", "Migrated queues", "Rebuilt search"],
                ),
                make_position(
                    "Senior Backend Engineer",
                    "Acme Corp",
                    "2022-Present",
                    &["Designed ledger", "Scaled ingest", "Hired platform team"],
                ),
                make_position("Data Analyst", "Globex", "2013-2015", &["Built dashboards"]),
                make_position(
                    "Systems Engineer",
                    "Umbrella",
                    "2008-2014",
                    &["Automated provisioning", "Ran on-call"],
                ),
            ],
            ..GeneratedContent::default()
        }
    }

    fn config() -> ValidationConfig {
        ValidationConfig::for_year(2026)
    }

    fn input<'a>(
        content: &'a GeneratedContent,
        history: &'a [PositionRecord],
        target: &'a TargetDescription,
        keywords: &'a KeywordIntents,
        profile: &'a CandidateProfile,
    ) -> ValidationInput<'a> {
        ValidationInput {
            content,
            history,
            target,
            keywords,
            limitations: &[],
            profile,
        }
    }

    #[test]
    fn test_standard_pipeline_introspection() {
        let pipeline = Pipeline::standard();
        assert_eq!(pipeline.len(), 25);
        assert_eq!(pipeline.rules()[0], Rule::ChronologyDepth);
        assert_eq!(pipeline.rules()[24], Rule::AcronymExpansion);
        assert_eq!(Pipeline::tiers(&[Tier::Structural]).len(), 5);
        assert_eq!(Pipeline::tiers(&[Tier::Guardrail]).len(), 8);
        assert_eq!(Pipeline::tiers(&[Tier::Content]).len(), 7);
        assert_eq!(Pipeline::tiers(&[Tier::SharedPolicy]).len(), 3);
        assert_eq!(Pipeline::tiers(&[Tier::Secondary]).len(), 2);
        assert_eq!(Rule::SummaryMetrics.name(), "summaryMetrics");
    }

    #[test]
    fn test_subset_keeps_canonical_order() {
        let pipeline = Pipeline::only(&[Rule::AcronymExpansion, Rule::BulletFormat]);
        assert_eq!(pipeline.rules(), &[Rule::BulletFormat, Rule::AcronymExpansion]);
    }

    #[test]
    fn test_empty_history_bypasses_without_mutation() {
        let content = content();
        let (target, keywords, profile) = Default::default();
        let result = Pipeline::standard().run(
            &input(&content, &[], &target, &keywords, &profile),
            &config(),
        );

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, IssueKind::EmptyReferenceHistory);
        assert_eq!(result.errors[0].severity, Severity::High);
        assert!(!result.errors[0].requires_regeneration);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, IssueKind::ValidationBypassed);
        assert_eq!(result.corrected_content, content);
        assert_eq!(result.summary.total_validators, 0);
        assert!(result.reports.is_none());
    }

    #[test]
    fn test_structural_corrections_thread_through() {
        let content = content();
        let history = history();
        let (target, keywords, profile) = Default::default();
        let structural = Pipeline::tiers(&[Tier::Structural]);

        let first = structural.run(&input(&content, &history, &target, &keywords, &profile), &config());
        let kinds: Vec<IssueKind> = first.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::ExtraPositions, IssueKind::WrongOrder]);
        assert_eq!(
            first.summary.auto_corrected,
            vec!["chronologyDepth".to_string(), "chronologicalOrder".to_string()]
        );

        let corrected = &first.corrected_content.customized_bullets;
        let titles: Vec<&str> = corrected.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Senior Backend Engineer", "Backend Engineer", "Systems Engineer"]
        );
        assert_eq!(corrected[1].company, "Initech");
    }

    #[test]
    fn test_corrected_content_is_a_fixed_point() {
        let content = content();
        let history = history();
        let (target, keywords, profile) = Default::default();
        let structural = Pipeline::tiers(&[Tier::Structural]);

        let first = structural.run(&input(&content, &history, &target, &keywords, &profile), &config());
        let second = structural.run(
            &input(&first.corrected_content, &history, &target, &keywords, &profile),
            &config(),
        );
        assert!(second.errors.is_empty(), "{:?}", second.errors);
        assert!(second.summary.auto_corrected.is_empty());
        assert_eq!(second.corrected_content, first.corrected_content);
    }

    #[test]
    fn test_paraphrased_current_title_survives_structural_tier() {
        let history = vec![
            make_record("Senior Software Engineer", "Acme", "2022-Present"),
            make_record("Software Engineer", "Initech", "2008-2012"),
        ];
        let content = GeneratedContent {
            customized_bullets: vec![make_position(
                "Lead Software Engineer",
                "Acme",
                "2022-Present",
                &["Designed ledger", "Scaled ingest", "Hired platform team", "Cut costs"],
            )],
            ..GeneratedContent::default()
        };
        let (target, keywords, profile) = Default::default();
        let structural = Pipeline::tiers(&[Tier::Structural]);

        let first = structural.run(&input(&content, &history, &target, &keywords, &profile), &config());
        let kinds: Vec<IssueKind> = first.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::WrongPositionTitle]);
        let corrected = &first.corrected_content.customized_bullets;
        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].title, "Senior Software Engineer");
        assert_eq!(corrected[0].bullets.len(), 4);

        let second = structural.run(
            &input(&first.corrected_content, &history, &target, &keywords, &profile),
            &config(),
        );
        assert!(second.errors.is_empty(), "{:?}", second.errors);
    }

    #[test]
    fn test_full_run_fills_reports_and_summary() {
        let content: GeneratedContent = serde_json::from_value(json!({
            "customizedBullets": [{
                "position": "Senior Backend Engineer",
                "company": "Acme Corp",
                "dates": "2022-Present",
                "bullets": [
                    {"text": "Built Kafka ingestion handling 40% more events", "verbCategory": "Built"},
                    {"text": "Led a 6 engineer platform team", "verbCategory": "Lead"},
                    {"text": "Managed a $2M cloud budget", "verbCategory": "Managed"}
                ]
            }],
            "professionalSummary": {"text": "Backend engineer focused on data platforms."}
        }))
        .unwrap();
        let history = vec![make_record("Senior Backend Engineer", "Acme Corp", "2022-Present")];
        let target = TargetDescription::default();
        let keywords = KeywordIntents::new(vec!["Kafka".to_string()], vec![]);
        let profile = CandidateProfile::default();

        let result = validate(
            &content,
            &history,
            &target,
            &keywords,
            &[],
            &profile,
            &config(),
        );

        assert_eq!(result.summary.total_validators, 25);
        assert_eq!(result.summary.errors_found, result.errors.len());
        assert_eq!(result.valid, result.errors.is_empty());
        let reports = result.reports.expect("reports present");
        assert_eq!(reports.metrics_density.map(|m| m.total), Some(3));
        assert_eq!(
            reports.keyword_evidence.map(|k| k.tier1),
            Some(vec!["Kafka".to_string()])
        );
        assert_eq!(reports.verb_distribution.map(|v| v.len()), Some(5));
    }
}
