//! Orchestration services: resilience primitives, validators, the
//! upload/assign pipeline, the two generation strategies and the channel
//! handlers built from them.

pub mod channels;
pub mod fallback;
pub mod pipeline;
pub mod resilience;
pub mod strategy;
pub mod termination;
pub mod tool_first;
pub mod validators;

pub use channels::{ChannelProfile, ContentChannelHandler, VishingHandler};
pub use fallback::{FallbackChain, FallbackInput};
pub use pipeline::{PipelineOptions, PipelineOutcome, UploadAssignPipeline};
pub use strategy::ExecutionStrategySelector;
pub use termination::SessionTerminator;
pub use tool_first::ToolFirstGenerator;

/// Extract a JSON object from generated text, tolerating markdown code
/// fences and surrounding prose.
pub fn extract_json_block(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(fenced) = trimmed
        .split("```json")
        .nth(1)
        .or_else(|| trimmed.split("```").nth(1))
    {
        if let Some(body) = fenced.split("```").next() {
            return body.trim().to_string();
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_plain() {
        assert_eq!(extract_json_block(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn extract_json_code_block() {
        let input = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(input), r#"{"a": 1}"#);
    }

    #[test]
    fn extract_json_with_prose_around_it() {
        let input = "Here you go:\n{\"persona\": \"IT\"}\nAnything else?";
        assert_eq!(extract_json_block(input), r#"{"persona": "IT"}"#);
    }
}
