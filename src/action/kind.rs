use std::fmt;

use serde::{Deserialize, Serialize};

/// Action vocabulary the prompt advertises. Names outside it are kept as
/// `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Click,
    LeftDouble,
    RightSingle,
    Drag,
    Hotkey,
    Type,
    Scroll,
    Wait,
    Finished,
    CallUser,
    /// Empty string when nothing could be parsed.
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Click => "click",
            ActionKind::LeftDouble => "left_double",
            ActionKind::RightSingle => "right_single",
            ActionKind::Drag => "drag",
            ActionKind::Hotkey => "hotkey",
            ActionKind::Type => "type",
            ActionKind::Scroll => "scroll",
            ActionKind::Wait => "wait",
            ActionKind::Finished => "finished",
            ActionKind::CallUser => "call_user",
            ActionKind::Other(name) => name.as_str(),
        }
    }

    /// Inputs the action is expected to carry.
    pub fn expected_inputs(&self) -> &'static [&'static str] {
        match self {
            ActionKind::Click | ActionKind::LeftDouble | ActionKind::RightSingle => &["start_box"],
            ActionKind::Drag => &["start_box", "end_box"],
            ActionKind::Hotkey => &["key"],
            ActionKind::Type => &["content"],
            ActionKind::Scroll => &["start_box", "direction"],
            ActionKind::Wait | ActionKind::Finished | ActionKind::CallUser => &[],
            ActionKind::Other(_) => &[],
        }
    }

    /// Ends the agent loop: task done or handed to a human.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionKind::Finished | ActionKind::CallUser)
    }
}

impl From<&str> for ActionKind {
    fn from(name: &str) -> Self {
        match name {
            "click" => ActionKind::Click,
            "left_double" => ActionKind::LeftDouble,
            "right_single" => ActionKind::RightSingle,
            "drag" => ActionKind::Drag,
            "hotkey" => ActionKind::Hotkey,
            "type" => ActionKind::Type,
            "scroll" => ActionKind::Scroll,
            "wait" => ActionKind::Wait,
            "finished" => ActionKind::Finished,
            "call_user" => ActionKind::CallUser,
            other => ActionKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
