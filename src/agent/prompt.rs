/// System prompt describing the output format and action space.
/// Embedded at compile time from prompts/agent_system.md.
pub const AGENT_PROMPT: &str = include_str!("../../prompts/agent_system.md");

/// Full text part of the user turn: action-space prompt followed by the task.
pub fn build_user_prompt(instruction: &str) -> String {
    format!("{AGENT_PROMPT}{}", instruction.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_action() {
        for name in ["click(", "left_double(", "right_single(", "drag(", "hotkey(", "type(", "scroll(", "wait()", "finished()", "call_user()"] {
            assert!(AGENT_PROMPT.contains(name), "prompt is missing {name}");
        }
    }

    #[test]
    fn instruction_follows_header() {
        let p = build_user_prompt("  open my computer \n");
        assert!(p.ends_with("## User Instruction\nopen my computer"));
    }
}
