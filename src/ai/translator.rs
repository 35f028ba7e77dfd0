use std::sync::Arc;

use super::{generate, ChatClient, CompletionRequest, Generation, Task};

const SYSTEM_PROMPT: &str = "你是一个优秀的翻译助手，可以将文本翻译成中文并保留原文格式。";
const USER_PROMPT: &str = "请将以下内容翻译成中文：";

pub struct Translator {
    client: Arc<ChatClient>,
    max_tokens: u32,
}

impl Translator {
    pub fn new(client: Arc<ChatClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    /// Full Chinese translation of `source`, markup preserved.
    pub async fn generate(&self, model: &str, source: &str) -> Generation {
        let user_message = format!("{}\n{}", USER_PROMPT, source);

        let request = CompletionRequest {
            model,
            system: SYSTEM_PROMPT,
            user: &user_message,
            max_tokens: self.max_tokens,
        };

        generate(&self.client, Task::Translation, request).await
    }
}
