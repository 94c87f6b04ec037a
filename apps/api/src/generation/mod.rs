// Generation loop: drafts content through the generator and feeds validation failures back
// into the next prompt. All generator calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod profile;
pub mod prompts;
