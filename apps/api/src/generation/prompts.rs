// Prompt constants for the generation loop.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::validation::config::ValidationConfig;
use crate::validation::issues::ValidationResult;
use crate::validation::models::{normalize_keyword, KeywordIntents};

/// Header of the block appended to the prompt after a failed attempt.
pub const CORRECTION_HEADER: &str = "CRITICAL: Previous attempt failed validation - MUST FIX:";

const CORRECTION_FOOTER: &str = "Please regenerate addressing these issues.";

/// Drafting prompt template.
/// Replace: {grounding_instruction}, {reference_year}, {recency_years}, {tenure_years},
///          {recent_bullets}, {tenure_bullets}, {char_limit}, {history}, {job_description},
///          {keywords_use}, {keywords_ignore}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are a resume optimization expert. Generate customized resume bullets for the positions in the candidate's job history that pass the chronology depth filter below (NOT every historical position).

{grounding_instruction}

JOB HISTORY:
{history}

JOB DESCRIPTION:
{job_description}

CHRONOLOGY DEPTH FILTER (current year: {reference_year}):
- Recent/Current: ended {recency_years} or fewer years ago, or still "Present". Include with {recent_bullets} bullets.
- Tenure Exception: ended more than {recency_years} years ago but lasted {tenure_years}+ years. Include with {tenure_bullets} bullets.
- Everything else: exclude.

BULLET RULES:
- Copy position title, company and dates EXACTLY from the job history.
- Independent or portfolio work keeps an "(Independent Project)" or "(Portfolio Project)" suffix.
- At most {char_limit} characters per bullet. No em-dashes or en-dashes.
- Structure: [Action] + [Outcome] + [Metric]. Preserve every metric from the original bullets, in the same position.
- verbCategory is exactly one of: Built, Lead, Managed, Improved, Collaborate. Do not repeat a category within a position; aim for 13-27% per category overall.
- No more than 3 requested keywords per bullet, and no keyword more than twice in a bullet.

PROFESSIONAL SUMMARY RULES:
- No sentence may share more than half of its keywords with any single bullet.
- Every metric in the summary must appear in a bullet (years of experience excepted).
- No phrase of 3+ words may repeat 3+ times across the summary and bullets.

KEYWORDS TO USE (only where the history shows evidence): {keywords_use}
KEYWORDS TO IGNORE (never use): {keywords_ignore}

Return ONLY valid JSON with this exact structure:
{
  "customizedBullets": [
    {
      "position": "exact title from job history",
      "company": "exact company from job history",
      "dates": "exact dates from job history",
      "bullets": [
        {"text": "...", "verbCategory": "Built", "keywordsUsed": ["..."], "charCount": 150, "hasMetric": true}
      ]
    }
  ],
  "professionalSummary": {"text": "...", "keywordsIntegrated": ["..."], "metricsIncluded": ["..."]},
  "keywordCoverageReport": {
    "successfullyIncorporated": [{"keyword": "...", "location": "Position 0, Bullet 2"}],
    "skippedNotEvidenced": [{"keyword": "...", "reason": "..."}]
  },
  "optimizationNotes": "...",
  "narrativeVerification": {
    "summary": "...",
    "topRequirementsMet": ["..."],
    "narrativeGaps": ["..."],
    "roleLevelAlignment": "Aligned|Mismatch",
    "score": 0
  }
}"#;

fn keyword_list(keywords: &[String]) -> String {
    let cleaned: Vec<String> = keywords
        .iter()
        .map(|k| normalize_keyword(k))
        .filter(|k| !k.is_empty())
        .collect();
    if cleaned.is_empty() {
        "(none)".to_string()
    } else {
        cleaned.join(", ")
    }
}

/// Fills the drafting template from raw history text and the job description.
pub fn build_generation_prompt(
    history_text: &str,
    job_description: &str,
    keywords: &KeywordIntents,
    config: &ValidationConfig,
) -> String {
    GENERATION_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{reference_year}", &config.reference_year.to_string())
        .replace("{recency_years}", &config.recency_years.to_string())
        .replace("{tenure_years}", &config.tenure_years.to_string())
        .replace("{recent_bullets}", &config.recent_bullets.to_string())
        .replace("{tenure_bullets}", &config.tenure_bullets.to_string())
        .replace("{char_limit}", &config.bullet_char_limit.to_string())
        .replace("{keywords_use}", &keyword_list(&keywords.use_keywords))
        .replace("{keywords_ignore}", &keyword_list(&keywords.ignore))
        // free text last so braces inside it are never treated as placeholders
        .replace("{job_description}", job_description)
        .replace("{history}", history_text)
}

/// The prompt for a retry: the base prompt plus one `- message` line per
/// regeneration-required error of the previous attempt. Unchanged when there are none.
pub fn with_corrections(base_prompt: &str, previous: &ValidationResult) -> String {
    let lines: Vec<String> = previous
        .regeneration_errors()
        .map(|e| format!("- {}", e.message))
        .collect();
    if lines.is_empty() {
        return base_prompt.to_string();
    }
    format!(
        "{base_prompt}\n\n{CORRECTION_HEADER}\n{}\n\n{CORRECTION_FOOTER}",
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::issues::{IssueKind, Severity, ValidationIssue, ValidationSummary};
    use crate::validation::models::GeneratedContent;

    fn result_with(errors: Vec<ValidationIssue>) -> ValidationResult {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings: vec![],
            corrected_content: GeneratedContent::default(),
            summary: ValidationSummary::default(),
            reports: None,
        }
    }

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let keywords = KeywordIntents::new(
            vec!["Custom: Kafka".to_string(), "Rust".to_string()],
            vec!["PHP".to_string()],
        );
        let prompt = build_generation_prompt(
            "Engineer at Acme (2020-Present)",
            "We need a Rust engineer",
            &keywords,
            &ValidationConfig::for_year(2026),
        );
        assert!(prompt.contains("current year: 2026"));
        assert!(prompt.contains("Include with 3-5 bullets"));
        assert!(prompt.contains("KEYWORDS TO USE (only where the history shows evidence): kafka, rust"));
        assert!(prompt.contains("KEYWORDS TO IGNORE (never use): php"));
        assert!(prompt.contains("Engineer at Acme (2020-Present)"));
        assert!(!prompt.contains("{history}"));
        assert!(!prompt.contains("{grounding_instruction}"));
    }

    #[test]
    fn test_corrections_list_only_regeneration_errors() {
        let previous = result_with(vec![
            ValidationIssue::new(IssueKind::CharLimitExceeded, Severity::Critical, "Bullet too long")
                .regenerate(),
            ValidationIssue::new(IssueKind::WrongCompany, Severity::High, "Company mismatch"),
        ]);
        let prompt = with_corrections("BASE", &previous);
        assert_eq!(
            prompt,
            "BASE\n\nCRITICAL: Previous attempt failed validation - MUST FIX:\n- Bullet too long\n\nPlease regenerate addressing these issues."
        );
    }

    #[test]
    fn test_no_corrections_keeps_base_prompt() {
        let previous = result_with(vec![ValidationIssue::new(
            IssueKind::WrongCompany,
            Severity::High,
            "Company mismatch",
        )]);
        assert_eq!(with_corrections("BASE", &previous), "BASE");
    }
}
