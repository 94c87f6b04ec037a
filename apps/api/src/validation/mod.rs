// Validation pipeline: checks generated resume content against the canonical history,
// repairs what the history can prove, and reports the rest.
//
// Tiers, in execution order: structural (corrects in place), guardrail, content,
// shared policy (reports), secondary (advice).

pub mod config;
pub mod content;
pub mod guardrails;
pub mod handlers;
pub mod issues;
pub mod models;
pub mod pipeline;
pub mod policy;
pub mod secondary;
pub mod structural;
pub mod text;
