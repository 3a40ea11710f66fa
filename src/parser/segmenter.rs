/// Blank line between two calls in one action block.
pub const CANDIDATE_SEPARATOR: &str = "\n\n";

/// Split an action block into call candidates, in execution order.
///
/// Single newlines inside a candidate are escaped to a literal `\n` so that
/// multi-line `content` arguments stay inside one single-line expression.
pub fn segment_actions(action_block: &str) -> Vec<String> {
    action_block
        .split(CANDIDATE_SEPARATOR)
        .map(|raw| raw.replace('\n', "\\n").trim_start().to_string())
        .collect()
}
