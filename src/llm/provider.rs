use async_trait::async_trait;

use crate::errors::TarsResult;
use crate::llm::types::{CallConfig, ChatMessage, LlmResponse};

/// A vision-language model reachable for one-shot completions.
/// Loading, tokenization and sampling live behind this boundary.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Complete one conversation turn and return the generated text.
    async fn complete(&self, messages: Vec<ChatMessage>, cfg: &CallConfig) -> TarsResult<LlmResponse>;
}
