//! Guardrail tier. Flags content the generator has to rewrite: metrics that moved between
//! positions or disappeared, a summary that parrots bullets, repeated verbs and phrases.
//! Keyword evidence and narrative fit are advisory only.

use crate::history::matcher::match_position;
use crate::history::models::PositionRecord;
use crate::validation::config::ValidationConfig;
use crate::validation::issues::{IssueKind, RuleOutcome, Severity, ValidationIssue};
use crate::validation::models::{
    normalize_keyword, CandidatePosition, KeywordIntents, NarrativeVerification,
};
use crate::validation::text;

fn all_bullet_text(positions: &[CandidatePosition]) -> String {
    positions
        .iter()
        .flat_map(|p| p.bullet_texts())
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve<'a>(
    position: &CandidatePosition,
    history: &'a [PositionRecord],
    config: &ValidationConfig,
) -> Option<(usize, &'a PositionRecord)> {
    match_position(&position.title, history, &config.matcher).map(|m| (m.index, m.record))
}

/// A bullet metric that is not in its own position's source bullets but is verbatim in
/// another position's is attributed to the wrong job.
pub fn metric_traceability(
    positions: &[CandidatePosition],
    history: &[PositionRecord],
    config: &ValidationConfig,
) -> RuleOutcome {
    let source_metrics: Vec<Vec<String>> = history
        .iter()
        .map(|record| {
            record
                .bullets
                .iter()
                .flat_map(|b| text::traceability_metrics(b))
                .map(|m| m.to_lowercase())
                .collect()
        })
        .collect();

    let mut errors = Vec::new();
    for position in positions {
        let Some((own, _)) = resolve(position, history, config) else {
            continue;
        };
        let original = &source_metrics[own];

        for (idx, bullet) in position.bullets.iter().enumerate() {
            for metric in text::traceability_metrics(&bullet.text) {
                let lower = metric.to_lowercase();
                let traced = original
                    .iter()
                    .any(|om| *om == lower || lower.contains(om.as_str()) || om.contains(&lower));
                if traced {
                    continue;
                }

                let elsewhere = source_metrics
                    .iter()
                    .enumerate()
                    .any(|(i, metrics)| i != own && metrics.contains(&lower));
                if elsewhere {
                    errors.push(
                        ValidationIssue::new(
                            IssueKind::MetricWrongPosition,
                            Severity::High,
                            format!(
                                "Metric \"{metric}\" in \"{}\" appears to be from a different position",
                                position.title
                            ),
                        )
                        .regenerate()
                        .at_bullet(&position.title, idx)
                        .with("metric", metric.as_str()),
                    );
                }
            }
        }
    }

    RuleOutcome::from_errors(errors)
}

/// A summary sentence whose content words mostly reappear in one bullet is an echo.
pub fn summary_abstraction(
    summary: Option<&str>,
    positions: &[CandidatePosition],
    config: &ValidationConfig,
) -> RuleOutcome {
    let Some(summary) = summary else {
        return RuleOutcome::default();
    };
    let sentences: Vec<Vec<String>> = text::sentences(summary)
        .into_iter()
        .map(text::content_keywords)
        .collect();

    let mut errors = Vec::new();
    for position in positions {
        for (idx, bullet) in position.bullets.iter().enumerate() {
            let bullet_words = text::content_keywords(&bullet.text);

            for (sentence_idx, sentence_words) in sentences.iter().enumerate() {
                if sentence_words.is_empty() {
                    continue;
                }
                let overlap = sentence_words
                    .iter()
                    .filter(|w| bullet_words.contains(w))
                    .count();
                let ratio = overlap as f64 / sentence_words.len() as f64;
                if ratio > config.summary_echo_ratio {
                    let percent = (ratio * 100.0).round() as u32;
                    errors.push(
                        ValidationIssue::new(
                            IssueKind::SummaryEchoesBullet,
                            Severity::High,
                            format!(
                                "Summary sentence {} shares {percent}% keywords with bullet",
                                sentence_idx + 1
                            ),
                        )
                        .regenerate()
                        .at_bullet(&position.title, idx)
                        .with("sentenceIndex", sentence_idx)
                        .with("overlapPercentage", percent),
                    );
                }
            }
        }
    }

    RuleOutcome::from_errors(errors)
}

/// Each verb category may govern at most one bullet per position.
pub fn verb_diversity(positions: &[CandidatePosition]) -> RuleOutcome {
    let mut errors = Vec::new();

    for position in positions {
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for (idx, bullet) in position.bullets.iter().enumerate() {
            let category = bullet.verb_category.as_str();
            if category.is_empty() {
                continue;
            }
            match groups.iter_mut().find(|(c, _)| *c == category) {
                Some((_, indices)) => indices.push(idx),
                None => groups.push((category, vec![idx])),
            }
        }

        for (category, indices) in groups.into_iter().filter(|(_, i)| i.len() > 1) {
            errors.push(
                ValidationIssue::new(
                    IssueKind::VerbCategoryRepeated,
                    Severity::Medium,
                    format!(
                        "Position \"{}\" uses verb category \"{category}\" {} times",
                        position.title,
                        indices.len()
                    ),
                )
                .regenerate()
                .for_position(&position.title)
                .with("category", category)
                .with("count", indices.len())
                .with("bulletIndices", indices),
            );
        }
    }

    RuleOutcome::from_errors(errors)
}

/// Every quantified summary claim must have its number somewhere in the bullets.
pub fn summary_metric_reconciliation(
    summary: Option<&str>,
    positions: &[CandidatePosition],
) -> RuleOutcome {
    let Some(summary) = summary else {
        return RuleOutcome::default();
    };
    let bullets = all_bullet_text(positions);

    let errors = text::summary_metrics(summary)
        .into_iter()
        .filter(|metric| text::first_number(metric).is_some_and(|n| !bullets.contains(n)))
        .map(|metric| {
            ValidationIssue::new(
                IssueKind::SummaryMetricNotTraceable,
                Severity::High,
                format!("Summary metric \"{metric}\" not found in any bullet"),
            )
            .regenerate()
            .with("metric", metric)
        })
        .collect();

    RuleOutcome::from_errors(errors)
}

/// Any 3-, 4- or 5-word phrase recurring across the summary and bullets.
pub fn phrase_repetition(
    summary: Option<&str>,
    positions: &[CandidatePosition],
    config: &ValidationConfig,
) -> RuleOutcome {
    let mut texts: Vec<&str> = summary.into_iter().collect();
    texts.extend(positions.iter().flat_map(|p| p.bullet_texts()));
    let combined = texts.join(" ");

    let mut errors = Vec::new();
    for &n in &config.phrase_ngram_sizes {
        for (phrase, count) in text::phrase_counts(&combined, n, config.phrase_min_chars) {
            if count >= config.phrase_repeat_min {
                errors.push(
                    ValidationIssue::new(
                        IssueKind::PhraseRepeated,
                        Severity::Medium,
                        format!("Phrase \"{phrase}\" repeated {count} times"),
                    )
                    .regenerate()
                    .with("phrase", phrase)
                    .with("count", count),
                );
            }
        }
    }

    RuleOutcome::from_errors(errors)
}

/// Metrics in a position's source bullets must survive into its rewritten bullets.
pub fn metric_preservation(
    positions: &[CandidatePosition],
    history: &[PositionRecord],
    config: &ValidationConfig,
) -> RuleOutcome {
    let mut errors = Vec::new();

    for position in positions {
        let Some((_, record)) = resolve(position, history, config) else {
            continue;
        };

        let mut original: Vec<String> = Vec::new();
        for metric in record.bullets.iter().flat_map(|b| text::preservation_metrics(b)) {
            if !original.contains(&metric) {
                original.push(metric);
            }
        }
        let rewritten: Vec<String> = position
            .bullet_texts()
            .flat_map(text::preservation_metrics)
            .collect();

        let lost: Vec<String> = original
            .into_iter()
            .filter(|om| {
                !rewritten
                    .iter()
                    .any(|m| m == om || m.contains(om.as_str()) || om.contains(m.as_str()))
            })
            .collect();

        if !lost.is_empty() {
            errors.push(
                ValidationIssue::new(
                    IssueKind::MetricsLost,
                    Severity::High,
                    format!(
                        "Position \"{}\" lost metrics: {}",
                        position.title,
                        lost.join(", ")
                    ),
                )
                .regenerate()
                .for_position(&position.title)
                .with("lostMetrics", lost),
            );
        }
    }

    RuleOutcome::from_errors(errors)
}

/// Requested keywords the bullets use but the history never mentions.
pub fn keyword_evidence(
    positions: &[CandidatePosition],
    history: &[PositionRecord],
    keywords: &KeywordIntents,
) -> RuleOutcome {
    let history_text = history
        .iter()
        .flat_map(|r| {
            [r.title.as_str(), r.company.as_str()]
                .into_iter()
                .chain(r.bullets.iter().map(String::as_str))
        })
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let bullets = all_bullet_text(positions).to_lowercase();

    let warnings = keywords
        .use_keywords
        .iter()
        .filter(|keyword| {
            let needle = normalize_keyword(keyword);
            !needle.is_empty() && bullets.contains(&needle) && !history_text.contains(&needle)
        })
        .map(|keyword| {
            ValidationIssue::warning(
                IssueKind::KeywordNoEvidence,
                format!("Keyword \"{keyword}\" used but has no evidence in job history"),
            )
            .with("keyword", keyword.as_str())
        })
        .collect();

    RuleOutcome::from_warnings(warnings)
}

/// Reads the generator's own narrative self-check.
pub fn narrative_fit(
    narrative: Option<&NarrativeVerification>,
    config: &ValidationConfig,
) -> RuleOutcome {
    let Some(narrative) = narrative else {
        return RuleOutcome::default();
    };
    let mut warnings = Vec::new();

    if let Some(met) = &narrative.top_requirements_met {
        let target = config.narrative_min_requirements;
        if met.len() < target {
            warnings.push(ValidationIssue::warning(
                IssueKind::NarrativeGap,
                format!(
                    "Only {} of top {target} JD requirements addressed",
                    met.len()
                ),
            ));
        }
    }

    for gap in &narrative.narrative_gaps {
        warnings.push(
            ValidationIssue::warning(
                IssueKind::NarrativeGapItem,
                format!("Narrative gap: \"{gap}\" not addressed"),
            )
            .with("gap", gap.as_str()),
        );
    }

    let mismatch = narrative
        .role_level_alignment
        .as_deref()
        .is_some_and(|a| a.trim().eq_ignore_ascii_case("mismatch"));
    if mismatch {
        warnings.push(ValidationIssue::warning(
            IssueKind::RoleLevelMismatch,
            "Role level mismatch between candidate experience and JD",
        ));
    }

    RuleOutcome::from_warnings(warnings)
}
