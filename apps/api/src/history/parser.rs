//! History Parser: turns free-form resume or career-history text into canonical positions.
//!
//! Primary path asks the generator for a strict JSON array. If the generator is missing,
//! fails, or returns nothing usable, two line patterns are tried instead:
//!
//! - `Title at Company (dates)` / `Title @ Company (dates)`
//! - `Title | Company | Dates`
//!
//! An empty result is a degraded, non-fatal outcome: the caller gets an explicit error and
//! the validation pipeline bypasses correction.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::history::models::{HistoryParseResult, ParsingMethod, PositionRecord};
use crate::history::prompts::HISTORY_PARSE_PROMPT_TEMPLATE;
use crate::llm_client::{
    extract_json_array, strip_code_fences, Generator, GeneratorOptions, GeneratorRequest, LlmError,
};

const HISTORY_MAX_OUTPUT_TOKENS: u32 = 4000;

static TITLE_AT_COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#*\s*([^|\n(]+)\s+(?:at|@)\s+([^|\n(]+)\s*\(([^)]+)\)").unwrap()
});

static PIPE_SEPARATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#*\s*([^|\n]+)\s*\|\s*([^|\n]+)\s*\|\s*([^|\n]+)").unwrap()
});

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+(.+?)\s*$").unwrap());

#[derive(Debug, Error)]
enum GeneratorParseError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("no JSON array in generator output")]
    NoArray,

    #[error("invalid position JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses history text into canonical positions.
///
/// `generator` is optional so the pattern fallback can run with no backend configured.
pub async fn parse_history(
    generator: Option<&dyn Generator>,
    model: &str,
    content: &str,
) -> HistoryParseResult {
    if content.trim().is_empty() {
        return HistoryParseResult::failed("No content to parse");
    }

    if let Some(generator) = generator {
        match parse_with_generator(generator, model, content).await {
            Ok(positions) if !positions.is_empty() => {
                info!(
                    count = positions.len(),
                    backend = generator.backend(),
                    "History parsed by generator"
                );
                return HistoryParseResult {
                    positions,
                    parsing_method: ParsingMethod::Llm,
                    errors: vec![],
                };
            }
            Ok(_) => warn!("Generator returned no positions, falling back to line patterns"),
            Err(e) => warn!(error = %e, "History parsing via generator failed, falling back to line patterns"),
        }
    }

    let positions = parse_with_patterns(content);
    if positions.is_empty() {
        warn!("No positions could be extracted from history text");
        return HistoryParseResult::failed("Could not extract any positions from history");
    }

    info!(count = positions.len(), "History parsed by line patterns");
    HistoryParseResult {
        positions,
        parsing_method: ParsingMethod::Regex,
        errors: vec![],
    }
}

async fn parse_with_generator(
    generator: &dyn Generator,
    model: &str,
    content: &str,
) -> Result<Vec<PositionRecord>, GeneratorParseError> {
    let request = GeneratorRequest {
        model: model.to_string(),
        prompt: HISTORY_PARSE_PROMPT_TEMPLATE.replace("{content}", content),
        options: GeneratorOptions {
            temperature: 0.0,
            max_output_tokens: HISTORY_MAX_OUTPUT_TOKENS,
        },
    };

    let text = generator.complete(&request).await?;
    let cleaned = strip_code_fences(&text);
    let array = extract_json_array(&cleaned).ok_or(GeneratorParseError::NoArray)?;
    let positions: Vec<PositionRecord> = serde_json::from_str(array)?;

    Ok(positions
        .into_iter()
        .filter(|p| !p.title.trim().is_empty())
        .collect())
}

/// Line-pattern fallback. Bullet lines (`-`, `*`, `•`) following a matched position are kept
/// as that position's original bullets.
pub fn parse_with_patterns(content: &str) -> Vec<PositionRecord> {
    let mut positions: Vec<PositionRecord> = Vec::new();

    for line in content.lines() {
        if let Some(current) = positions.last_mut() {
            if let Some(caps) = BULLET_LINE.captures(line) {
                current.bullets.push(caps[1].to_string());
                continue;
            }
        }

        let caps = TITLE_AT_COMPANY
            .captures(line)
            .or_else(|| PIPE_SEPARATED.captures(line));

        if let Some(caps) = caps {
            let title = caps[1].trim().to_string();
            let lower = title.to_lowercase();
            positions.push(PositionRecord {
                is_independent: lower.contains("independent") || lower.contains("portfolio"),
                title,
                company: caps[2].trim().to_string(),
                dates: caps[3].trim().to_string(),
                bullets: vec![],
            });
        }
    }

    positions
}
