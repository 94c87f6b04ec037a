/// History extraction prompt. Replace `{content}` before sending.
pub const HISTORY_PARSE_PROMPT_TEMPLATE: &str = r#"Extract ALL positions from this job history. Return ONLY a JSON array of objects.

Format:
[
  {
    "position": "Title",
    "company": "Company",
    "dates": "Start-End",
    "isIndependent": false,
    "bullets": ["Original bullet text, verbatim"]
  }
]

Rules:
- One object per position, most recent first.
- Copy titles, company names, dates and bullets EXACTLY as written. Do not rephrase.
- Use "Present" for a position that has not ended.
- Set "isIndependent" to true for personal, freelance, independent or portfolio work.

Content:
{content}"#;
