use async_trait::async_trait;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantError(pub String);

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for AssistantError {}

/// The language-model collaborator: takes a fully-constructed prompt and
/// returns a completion. Failures are values; the gate converts them to
/// user-visible text and never lets them escape as a crash.
#[async_trait]
pub trait AssistantPort: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AssistantError>;
}
