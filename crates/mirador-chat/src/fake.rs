use crate::port::{AssistantError, AssistantPort};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Scripted assistant for tests: pops queued outcomes in order and echoes a
/// canned line once the script runs dry.
#[derive(Default)]
pub struct FakeAssistant {
    replies: Mutex<VecDeque<Result<String, AssistantError>>>,
    prompts: Mutex<Vec<String>>,
    call_count: AtomicU64,
}

impl FakeAssistant {
    #[must_use]
    pub fn with_replies(replies: Vec<Result<String, AssistantError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            call_count: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn calls(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .last()
            .cloned()
    }
}

#[async_trait]
impl AssistantPort for FakeAssistant {
    async fn complete(&self, prompt: &str) -> Result<String, AssistantError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Ok("respuesta de prueba".to_string()))
    }
}
