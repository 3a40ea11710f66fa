/// Section splitter: reflection / thought / action block.
///
/// Header markers are only recognised at the very start of the response.
/// The action block is cut at the *last* `Action:` so that the word showing
/// up inside the narrative does not truncate the calls.
use crate::parser::types::ParsedSections;

pub const REFLECTION_MARKER: &str = "Reflection:";
pub const THOUGHT_MARKER: &str = "Thought:";
pub const SUMMARY_MARKER: &str = "Action_Summary:";
pub const ACTION_MARKER: &str = "Action:";

pub fn split_sections(text: &str) -> ParsedSections {
    let mut sections = ParsedSections {
        action_block: action_block(text).to_string(),
        ..Default::default()
    };

    if let Some(rest) = text.strip_prefix(REFLECTION_MARKER) {
        // Both halves are required; a reflection without a summary is dropped.
        match rest.find(SUMMARY_MARKER) {
            Some(idx) => {
                sections.reflection = Some(rest[..idx].trim().to_string());
                sections.thought = until_action(&rest[idx + SUMMARY_MARKER.len()..]);
            }
            None => {
                tracing::warn!("reflection marker without action summary; narrative dropped");
            }
        }
    } else if let Some(rest) = text.strip_prefix(THOUGHT_MARKER) {
        sections.thought = until_action(rest);
    } else if let Some(rest) = text.strip_prefix(SUMMARY_MARKER) {
        sections.thought = until_action(rest);
    } else {
        tracing::debug!("no narrative marker at start of response");
    }

    sections
}

/// Everything after the last action marker, or the whole text when the
/// marker never appears.
pub fn action_block(text: &str) -> &str {
    match text.rfind(ACTION_MARKER) {
        Some(idx) => &text[idx + ACTION_MARKER.len()..],
        None => text,
    }
}

/// Trimmed text up to the first action marker (or end of input).
fn until_action(rest: &str) -> String {
    let end = rest.find(ACTION_MARKER).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}
