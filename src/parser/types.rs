use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameter name → normalized value. Box parameters hold a compact JSON
/// array string such as `[0.01,0.02,0.03,0.04]`.
pub type ActionInputs = BTreeMap<String, String>;

/// The narrative sections of one response plus the substring holding the calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    /// `Some` only when the response opens with `Reflection:` and the
    /// reflection/summary pattern matched.
    pub reflection: Option<String>,
    pub thought: String,
    pub action_block: String,
}

/// One parsed, normalized action. Reflection and thought are response-level
/// and identical across every record produced from the same response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub reflection: Option<String>,
    pub thought: String,
    /// Function name of the call; empty when the candidate was not a call.
    pub action_type: String,
    pub action_inputs: ActionInputs,
}

impl ActionRecord {
    /// A record carrying no actionable instruction, only the shared narrative.
    pub fn empty(sections: &ParsedSections) -> Self {
        Self {
            reflection: sections.reflection.clone(),
            thought: sections.thought.clone(),
            action_type: String::new(),
            action_inputs: ActionInputs::new(),
        }
    }

    pub fn is_actionable(&self) -> bool {
        !self.action_type.is_empty()
    }
}

/// Result of one call expression after parsing, before it is joined with
/// the response-level sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCall {
    pub name: String,
    /// Raw keyword arguments in source order, quotes stripped.
    pub args: Vec<(String, String)>,
}
