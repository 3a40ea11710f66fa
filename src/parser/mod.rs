//! Response parser: raw model text → action records.
//!
//! raw text → [`sections`] → [`segmenter`] → [`call`] + [`normalize`] per
//! candidate. Every stage is a pure function of its input.
pub mod call;
pub mod normalize;
pub mod sections;
pub mod segmenter;
pub mod types;

use crate::config::ParserConfig;
use crate::errors::TarsResult;
use crate::parser::types::{ActionRecord, ParsedSections};

/// Parse outcome of a single candidate. Only coordinate decoding can fail.
pub type CandidateOutcome = TarsResult<ActionRecord>;

#[derive(Debug, Clone, Copy)]
pub struct ResponseParser {
    scale: f64,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl ResponseParser {
    /// A non-positive or non-finite scale falls back to the default grid.
    pub fn new(config: &ParserConfig) -> Self {
        let scale = config.coordinate_scale;
        if scale.is_finite() && scale > 0.0 {
            return Self { scale };
        }
        let fallback = ParserConfig::default().coordinate_scale;
        tracing::warn!(scale, fallback, "invalid coordinate scale; using default");
        Self { scale: fallback }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// One outcome per candidate, in execution order. A malformed box fails
    /// only its own candidate.
    pub fn parse(&self, text: &str) -> Vec<CandidateOutcome> {
        self.parse_with_sections(text).1
    }

    /// Like [`parse`](Self::parse), but failed candidates degrade to empty
    /// records so the caller always gets one well-formed record per candidate.
    pub fn parse_lenient(&self, text: &str) -> Vec<ActionRecord> {
        let (sections, outcomes) = self.parse_with_sections(text);
        outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                outcome.unwrap_or_else(|e| {
                    tracing::warn!(index, error = %e, "candidate dropped to empty action");
                    ActionRecord::empty(&sections)
                })
            })
            .collect()
    }

    /// Compact JSON array of records (the executor-facing output).
    pub fn parse_to_json(&self, text: &str) -> TarsResult<String> {
        Ok(serde_json::to_string(&self.parse_lenient(text))?)
    }

    fn parse_with_sections(&self, text: &str) -> (ParsedSections, Vec<CandidateOutcome>) {
        let sections = sections::split_sections(text);
        let candidates = segmenter::segment_actions(&sections.action_block);
        tracing::debug!(
            has_reflection = sections.reflection.is_some(),
            thought_len = sections.thought.len(),
            candidates = candidates.len(),
            "response split"
        );

        let outcomes = candidates
            .iter()
            .map(|candidate| self.parse_candidate(&sections, candidate))
            .collect();
        (sections, outcomes)
    }

    fn parse_candidate(&self, sections: &ParsedSections, candidate: &str) -> CandidateOutcome {
        let Some(call) = call::parse_call(candidate) else {
            tracing::debug!(candidate, "candidate is not a call expression");
            return Ok(ActionRecord::empty(sections));
        };

        let action_inputs = normalize::normalize_inputs(&call, self.scale)?;
        Ok(ActionRecord {
            reflection: sections.reflection.clone(),
            thought: sections.thought.clone(),
            action_type: call.name,
            action_inputs,
        })
    }
}

/// Parse with the default 1000-unit coordinate grid.
pub fn parse_response(text: &str) -> Vec<ActionRecord> {
    ResponseParser::default().parse_lenient(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TarsError;

    #[test]
    fn thought_click_roundtrip() {
        let records = parse_response("Thought: X\n\nAction: click(start_box='[10,20,30,40]')");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.thought, "X");
        assert_eq!(r.reflection, None);
        assert_eq!(r.action_type, "click");
        let decoded: Vec<f64> = serde_json::from_str(&r.action_inputs["start_box"]).unwrap();
        assert_eq!(decoded, vec![0.01, 0.02, 0.03, 0.04]);
    }

    #[test]
    fn batch_shares_narrative() {
        let text = "Reflection: r\nAction_Summary: s\nAction: hotkey(key='ctrl a')\n\ntype(content='hi')";
        let records = parse_response(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action_type, "hotkey");
        assert_eq!(records[1].action_type, "type");
        for r in &records {
            assert_eq!(r.reflection.as_deref(), Some("r"));
            assert_eq!(r.thought, "s");
        }
    }

    #[test]
    fn malformed_box_fails_only_its_candidate() {
        let parser = ResponseParser::default();
        let outcomes = parser.parse(
            "Thought: t\nAction: click(start_box='[a,b]')\n\nclick(start_box='[500,500]')",
        );
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], Err(TarsError::MalformedCoordinate { .. })));
        let ok = outcomes[1].as_ref().unwrap();
        assert_eq!(ok.thought, "t");
        assert_eq!(ok.action_inputs["start_box"], "[0.5,0.5,0.5,0.5]");
    }

    #[test]
    fn lenient_parse_keeps_slot_for_failed_candidate() {
        let records = ResponseParser::default()
            .parse_lenient("Thought: t\nAction: click(start_box='[a,b]')\n\nwait()");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action_type, "");
        assert_eq!(records[0].thought, "t");
        assert!(records[0].action_inputs.is_empty());
        assert_eq!(records[1].action_type, "wait");
    }

    #[test]
    fn garbage_yields_single_empty_record() {
        let records = parse_response("I am not sure what to do.");
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_actionable());
    }

    #[test]
    fn invalid_scale_falls_back_to_default() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let parser = ResponseParser::new(&ParserConfig { coordinate_scale: bad });
            assert_eq!(parser.scale(), 1000.0);
            let records = parser.parse_lenient("Action: click(start_box='[500,250]')");
            assert_eq!(records[0].action_inputs["start_box"], "[0.5,0.25,0.5,0.25]");
        }
    }

    #[test]
    fn configured_scale_applies() {
        let parser = ResponseParser::new(&ParserConfig {
            coordinate_scale: 100.0,
        });
        let records = parser.parse_lenient("Action: click(start_box='[50,25]')");
        assert_eq!(records[0].action_inputs["start_box"], "[0.5,0.25,0.5,0.25]");
    }
}
