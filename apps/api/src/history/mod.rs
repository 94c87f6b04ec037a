// Canonical career history: parsing free-form text into positions, and resolving
// generator-written titles back to those positions.

pub mod handlers;
pub mod matcher;
pub mod models;
pub mod parser;
pub mod prompts;
