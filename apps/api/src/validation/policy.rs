//! Shared-policy tier. Computes the three reports returned with every result and warns when
//! a measurement falls outside its band. Never blocks.

use std::collections::BTreeMap;

use crate::validation::config::ValidationConfig;
use crate::validation::issues::{
    BalanceStatus, DensityStatus, IssueKind, KeywordEvidenceReport, MetricsDensityReport,
    RuleOutcome, ValidationIssue, VerbDistributionReport, VerbShare,
};
use crate::validation::models::{normalize_keyword, CandidatePosition, KeywordIntents, VerbCategory};
use crate::validation::text;

fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Share of bullets per verb category, banded as over-represented, balanced,
/// under-represented or a critical gap.
pub fn verb_distribution(
    positions: &[CandidatePosition],
    config: &ValidationConfig,
) -> (RuleOutcome, VerbDistributionReport) {
    let mut counts: BTreeMap<VerbCategory, usize> =
        VerbCategory::ALL.into_iter().map(|c| (c, 0)).collect();
    let mut total = 0;
    for bullet in positions.iter().flat_map(|p| &p.bullets) {
        total += 1;
        if let Some(category) = bullet.category() {
            *counts.entry(category).or_default() += 1;
        }
    }

    let mut warnings = Vec::new();
    let mut report = VerbDistributionReport::new();

    for (category, count) in counts {
        let percent = percent_of(count, total);
        let rounded = percent.round() as u32;

        let status = if percent >= config.verb_over_represented_pct {
            BalanceStatus::OverRepresented
        } else if (config.verb_balanced_min_pct..=config.verb_balanced_max_pct).contains(&percent)
        {
            BalanceStatus::WellBalanced
        } else if percent >= config.verb_critical_gap_pct {
            BalanceStatus::UnderRepresented
        } else {
            BalanceStatus::CriticalGap
        };

        let flagged = match status {
            BalanceStatus::OverRepresented => Some((
                IssueKind::VerbOverRepresented,
                format!("\"{category}\" over-represented ({rounded}%)"),
            )),
            BalanceStatus::UnderRepresented => Some((
                IssueKind::VerbUnderRepresented,
                format!("\"{category}\" under-represented ({rounded}%)"),
            )),
            BalanceStatus::CriticalGap => Some((
                IssueKind::VerbCriticalGap,
                format!("\"{category}\" critical gap ({rounded}%)"),
            )),
            BalanceStatus::WellBalanced => None,
        };
        if let Some((kind, message)) = flagged {
            warnings.push(
                ValidationIssue::warning(kind, message)
                    .with("category", category.as_str())
                    .with("percent", rounded),
            );
        }

        report.insert(
            category,
            VerbShare {
                count,
                percent: rounded,
                status,
            },
        );
    }

    (RuleOutcome::from_warnings(warnings), report)
}

/// Share of bullets carrying at least one metric.
pub fn metrics_density(
    positions: &[CandidatePosition],
    config: &ValidationConfig,
) -> (RuleOutcome, MetricsDensityReport) {
    let texts: Vec<&str> = positions.iter().flat_map(|p| p.bullet_texts()).collect();
    let with_metrics = texts.iter().filter(|t| text::has_density_metric(t)).count();
    let percent = percent_of(with_metrics, texts.len());
    let rounded = percent.round() as u32;

    let status = if percent < config.metrics_density_min_pct {
        DensityStatus::BelowTarget
    } else if percent > config.metrics_density_max_pct {
        DensityStatus::AboveTarget
    } else {
        DensityStatus::OnTarget
    };

    let mut warnings = Vec::new();
    if status == DensityStatus::BelowTarget {
        warnings.push(
            ValidationIssue::warning(
                IssueKind::MetricsDensityLow,
                format!(
                    "Only {rounded}% of bullets have metrics (target: {}%)",
                    config.metrics_density_min_pct
                ),
            )
            .with("actual", rounded)
            .with("target", config.metrics_density_min_pct),
        );
    }

    let report = MetricsDensityReport {
        total: texts.len(),
        with_metrics,
        percent: rounded,
        target: format!(
            "{}-{}%",
            config.metrics_density_min_pct, config.metrics_density_max_pct
        ),
        status,
    };

    (RuleOutcome::from_warnings(warnings), report)
}

/// Tiers each requested keyword by the leading verb of the bullets citing it. The last
/// citing bullet with a recognised verb decides; with none, the keyword stays at tier 2.
pub fn keyword_evidence_tier(
    positions: &[CandidatePosition],
    keywords: &KeywordIntents,
) -> (RuleOutcome, KeywordEvidenceReport) {
    let bullets: Vec<(String, &str)> = positions
        .iter()
        .flat_map(|p| p.bullet_texts())
        .map(|t| (t.to_lowercase(), t))
        .collect();

    let mut warnings = Vec::new();
    let mut report = KeywordEvidenceReport::default();

    for keyword in &keywords.use_keywords {
        let needle = normalize_keyword(keyword);
        let citing: Vec<&str> = bullets
            .iter()
            .filter(|(lower, _)| !needle.is_empty() && lower.contains(&needle))
            .map(|(_, original)| *original)
            .collect();

        if citing.is_empty() {
            report.not_evidenced.push(keyword.clone());
            continue;
        }

        let tier = citing
            .iter()
            .filter_map(|b| text::verb_evidence_tier(b))
            .last()
            .unwrap_or(2);

        match tier {
            1 => report.tier1.push(keyword.clone()),
            3 => {
                warnings.push(
                    ValidationIssue::warning(
                        IssueKind::KeywordDocumentationOnly,
                        format!("\"{keyword}\" has documentation-only evidence"),
                    )
                    .with("keyword", keyword.as_str())
                    .with("tier", 3),
                );
                report.tier3.push(keyword.clone());
            }
            _ => report.tier2.push(keyword.clone()),
        }
    }

    (RuleOutcome::from_warnings(warnings), report)
}
