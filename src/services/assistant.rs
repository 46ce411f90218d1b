use crate::services::extractor::{flatten_transcript, ChatTurn};
use crate::services::generative::GenerativeClient;
use std::sync::Arc;

const ASSISTANT_INSTRUCTION: &str = "\
You are 'Say It', a school intake assistant for students reporting bullying \
or other incidents. Your goal is to gather what happened, who was involved \
and when it occurred. Be brief, warm and non-judgmental. Never promise \
outcomes and never ask for information unrelated to the incident.\n\n";

/// Canned reply used whenever the model is unavailable, so the intake flow
/// keeps working and never shows an error to the student.
pub const FALLBACK_REPLY: &str = "Understood. Please describe in detail what \
happened, when it occurred and who was involved, so it can be recorded.";

/// The guided-intake side of the conversation: one model call per student
/// message, degrading to a fixed reply.
#[derive(Clone)]
pub struct Assistant {
    client: Arc<dyn GenerativeClient>,
}

impl Assistant {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    pub async fn reply(&self, history: &[ChatTurn], message: &str) -> String {
        let mut prompt = String::from(ASSISTANT_INSTRUCTION);
        if !history.is_empty() {
            prompt.push_str(&flatten_transcript(history));
            prompt.push('\n');
        }
        prompt.push_str("Reporter: ");
        prompt.push_str(message);

        match self.client.complete(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "assistant reply failed, using canned reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
