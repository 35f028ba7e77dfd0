mod client;
mod summarizer;
mod translator;

use std::fmt;

pub use client::{ChatClient, CompletionRequest};
pub use summarizer::Summarizer;
pub use translator::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Summary,
    Translation,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Summary => write!(f, "summary"),
            Task::Translation => write!(f, "translation"),
        }
    }
}

/// A generation call that produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub task: Task,
    pub reason: String,
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} generation failed: {}", self.task, self.reason)
    }
}

pub type Generation = std::result::Result<String, GenerationFailure>;

/// Runs one completion and folds every error into a [`GenerationFailure`].
pub(crate) async fn generate(
    client: &ChatClient,
    task: Task,
    request: CompletionRequest<'_>,
) -> Generation {
    match client.complete(request).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                tracing::error!("Error generating {}: empty completion", task);
                Err(GenerationFailure {
                    task,
                    reason: "empty completion".to_string(),
                })
            } else {
                Ok(text.to_string())
            }
        }
        Err(e) => {
            tracing::error!("Error generating {}: {}", task, e);
            Err(GenerationFailure {
                task,
                reason: e.to_string(),
            })
        }
    }
}
