use std::sync::Arc;

use super::{generate, ChatClient, CompletionRequest, Generation, Task};

const SYSTEM_PROMPT: &str = "你是一个优秀的摘要生成助手。";
const USER_PROMPT: &str = "请为以下内容生成中文摘要：";

pub struct Summarizer {
    client: Arc<ChatClient>,
    max_tokens: u32,
}

impl Summarizer {
    pub fn new(client: Arc<ChatClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    /// Short Chinese summary of `source`.
    pub async fn generate(&self, model: &str, source: &str) -> Generation {
        let user_message = format!("{}\n{}", USER_PROMPT, source);

        let request = CompletionRequest {
            model,
            system: SYSTEM_PROMPT,
            user: &user_message,
            max_tokens: self.max_tokens,
        };

        generate(&self.client, Task::Summary, request).await
    }
}
