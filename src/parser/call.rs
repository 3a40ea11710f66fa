/// Call parser for the action mini-language: `name(key='value', ...)`.
///
/// The outer shape is matched with a regex; the argument list is split by a
/// small quote-aware scanner so commas inside `'...'` stay in their value.
use std::sync::OnceLock;

use regex::Regex;

use crate::parser::types::ParsedCall;

fn call_shape() -> &'static Regex {
    static CALL_SHAPE: OnceLock<Regex> = OnceLock::new();
    CALL_SHAPE.get_or_init(|| Regex::new(r"^(\w+)\((.*)\)$").expect("call shape regex is valid"))
}

/// Parse one candidate. Returns `None` when the text is not a call at all.
pub fn parse_call(candidate: &str) -> Option<ParsedCall> {
    let caps = call_shape().captures(candidate.trim())?;
    let name = caps.get(1)?.as_str().to_string();
    let body = caps.get(2).map_or("", |m| m.as_str());

    let mut args = Vec::new();
    if !body.trim().is_empty() {
        for pair in split_arguments(body) {
            if let Some((key, value)) = parse_pair(pair) {
                args.push((key, value));
            }
        }
    }

    Some(ParsedCall { name, args })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InQuote,
}

/// Split an argument list on top-level commas. A single-quoted span is
/// atomic; an unterminated quote runs to the end of the list.
pub fn split_arguments(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut state = ScanState::Outside;
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        match (state, ch) {
            (ScanState::Outside, '\'') => state = ScanState::InQuote,
            (ScanState::InQuote, '\'') => state = ScanState::Outside,
            (ScanState::Outside, ',') => {
                parts.push(&body[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);

    parts.retain(|p| !p.trim().is_empty());
    parts
}

/// `key = value` on the first `=`. Values keep any further `=`; one layer of
/// surrounding quotes is removed. Empty keys and empty values are dropped.
fn parse_pair(pair: &str) -> Option<(String, String)> {
    let Some((key, value)) = pair.split_once('=') else {
        tracing::debug!(pair, "argument without '=' ignored");
        return None;
    };
    let key = key.trim();
    if key.is_empty() {
        tracing::debug!(pair, "argument without a name ignored");
        return None;
    }

    let value = strip_quotes(value.trim()).trim();
    if value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

fn strip_quotes(value: &str) -> &str {
    let is_quote = |c: char| c == '\'' || c == '"';
    let value = value.strip_prefix(is_quote).unwrap_or(value);
    value.strip_suffix(is_quote).unwrap_or(value)
}
