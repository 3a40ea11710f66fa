use std::sync::Arc;

use crate::agent::image::to_data_url;
use crate::agent::prompt::build_user_prompt;
use crate::config::AppConfig;
use crate::errors::TarsResult;
use crate::llm::provider::VisionModel;
use crate::llm::providers::openai_compatible::OpenAiCompatibleProvider;
use crate::llm::types::{CallConfig, ChatMessage, ContentPart, ImageUrl};
use crate::parser::types::ActionRecord;
use crate::parser::ResponseParser;

/// One screenshot + instruction in, a batch of actions out.
pub struct TarsAgent {
    model: Arc<dyn VisionModel>,
    call: CallConfig,
    parser: ResponseParser,
}

impl TarsAgent {
    pub fn new(model: Arc<dyn VisionModel>, call: CallConfig, parser: ResponseParser) -> Self {
        Self { model, call, parser }
    }

    /// Agent backed by the OpenAI-compatible endpoint described in `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let provider = OpenAiCompatibleProvider::from_config(&config.model);
        Self::new(
            Arc::new(provider),
            CallConfig::from(&config.model),
            ResponseParser::new(&config.parser),
        )
    }

    /// The single user turn sent to the model.
    pub fn build_messages(&self, screenshot: &[u8], instruction: &str) -> TarsResult<Vec<ChatMessage>> {
        let url = to_data_url(screenshot)?;
        Ok(vec![ChatMessage::user(vec![
            ContentPart::Text {
                text: build_user_prompt(instruction),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl { url },
            },
        ])])
    }

    pub async fn step(&self, screenshot: &[u8], instruction: &str) -> TarsResult<Vec<ActionRecord>> {
        let messages = self.build_messages(screenshot, instruction)?;
        tracing::info!(
            model = %self.model.name(),
            instruction = %instruction,
            image_bytes = screenshot.len(),
            "requesting next action"
        );

        let response = self.model.complete(messages, &self.call).await?;
        tracing::debug!(content = %response.content, "raw model output");

        let records = self.parser.parse_lenient(&response.content);
        tracing::info!(
            actions = records.len(),
            types = ?records.iter().map(|r| r.action_type.as_str()).collect::<Vec<_>>(),
            "model output parsed"
        );
        Ok(records)
    }

    /// [`step`](Self::step) serialized as the compact JSON array executors consume.
    pub async fn step_json(&self, screenshot: &[u8], instruction: &str) -> TarsResult<String> {
        let records = self.step(screenshot, instruction).await?;
        Ok(serde_json::to_string(&records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::errors::TarsError;
    use crate::llm::types::{LlmResponse, MessageContent};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    struct CannedModel {
        reply: String,
        seen: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl VisionModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, messages: Vec<ChatMessage>, _cfg: &CallConfig) -> TarsResult<LlmResponse> {
            self.seen.lock().unwrap().extend(messages);
            Ok(LlmResponse {
                content: self.reply.clone(),
                reasoning: String::new(),
            })
        }
    }

    struct FailingModel;

    #[async_trait]
    impl VisionModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _messages: Vec<ChatMessage>, _cfg: &CallConfig) -> TarsResult<LlmResponse> {
            Err(TarsError::LlmProvider("503 Service Unavailable".into()))
        }
    }

    fn agent(model: Arc<dyn VisionModel>) -> TarsAgent {
        TarsAgent::new(model, CallConfig::from(&ModelConfig::default()), ResponseParser::default())
    }

    #[tokio::test]
    async fn step_parses_model_reply() {
        let model = Arc::new(CannedModel {
            reply: "Thought: open it\nAction: left_double(start_box='[100,200]')".into(),
            seen: Mutex::new(Vec::new()),
        });
        let records = agent(model.clone()).step(PNG, "click my computer").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action_type, "left_double");
        assert_eq!(records[0].action_inputs["start_box"], "[0.1,0.2,0.1,0.2]");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].role, "user");
        let MessageContent::Parts(parts) = &seen[0].content else {
            panic!("expected multipart content");
        };
        assert!(matches!(&parts[0], ContentPart::Text { text } if text.ends_with("click my computer")));
        assert!(matches!(&parts[1], ContentPart::ImageUrl { image_url } if image_url.url.starts_with("data:image/png;base64,")));
    }

    #[tokio::test]
    async fn step_json_renders_null_reflection() {
        let model = Arc::new(CannedModel {
            reply: "Action_Summary: done\nAction: finished()".into(),
            seen: Mutex::new(Vec::new()),
        });
        let json = agent(model).step_json(PNG, "close the window").await.unwrap();
        assert_eq!(
            json,
            r#"[{"reflection":null,"thought":"done","action_type":"finished","action_inputs":{}}]"#
        );
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let err = agent(Arc::new(FailingModel)).step(PNG, "x").await.unwrap_err();
        assert!(matches!(err, TarsError::LlmProvider(_)));
    }

    #[tokio::test]
    async fn bad_screenshot_never_reaches_model() {
        let model = Arc::new(CannedModel {
            reply: "Action: wait()".into(),
            seen: Mutex::new(Vec::new()),
        });
        let err = agent(model.clone()).step(b"", "x").await.unwrap_err();
        assert!(matches!(err, TarsError::Image(_)));
        assert!(model.seen.lock().unwrap().is_empty());
    }
}
