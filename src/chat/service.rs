//! Chat turn handling: passive lead capture, then the model call.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{ChatError, LlmError};
use crate::extract::{extract_lead, scan_message};
use crate::leads::{Delivery, LeadRecord, LeadSink};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, Role};
use crate::locale::{Lang, detect_lang};

use super::prompts::{DEFAULT_SYSTEM_PROMPT, language_reminder};

const MAX_TOKENS: u32 = 600;
const TEMPERATURE: f32 = 0.7;

/// A successful assistant turn.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub message: String,
    pub lang: Lang,
}

/// Proxies website conversations to the chat provider and files any contact
/// details the visitor types along the way.
pub struct ChatService {
    llm: Option<Arc<dyn LlmProvider>>,
    sink: LeadSink,
    dial_code: String,
    system_prompt: String,
}

impl ChatService {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, sink: LeadSink, dial_code: &str) -> Self {
        Self {
            llm,
            sink,
            dial_code: dial_code.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// Handle one chat request.
    ///
    /// Lead capture runs first and is never awaited; its outcome does not
    /// affect the reply.
    pub async fn respond(&self, messages: &[ChatMessage]) -> Result<ChatReply, ChatError> {
        let latest = latest_user_message(messages)?;
        let lang = detect_lang(&latest.content);

        self.capture_lead(messages);

        let Some(llm) = &self.llm else {
            return Err(ChatError::Llm {
                lang,
                source: LlmError::NotConfigured,
            });
        };

        let request = CompletionRequest::new(self.build_prompt(messages, lang))
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(TEMPERATURE);

        match llm.complete(request).await {
            Ok(response) => {
                debug!(
                    model = llm.model_name(),
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "Chat reply generated"
                );
                Ok(ChatReply {
                    message: response.content,
                    lang,
                })
            }
            Err(e) => {
                warn!(model = llm.model_name(), error = %e, "Chat completion failed");
                Err(ChatError::Llm { lang, source: e })
            }
        }
    }

    /// File a lead when the latest user message carries a phone or email.
    ///
    /// Returns the background write so tests can wait on it.
    pub fn capture_lead(&self, messages: &[ChatMessage]) -> Option<JoinHandle<Delivery>> {
        let latest = latest_user_message(messages).ok()?;
        let hit = scan_message(&latest.content, &self.dial_code);
        if hit.is_empty() {
            return None;
        }

        let extracted = extract_lead(messages, &self.dial_code);
        let lead = LeadRecord::from_transcript(messages, &extracted);
        info!(
            lead_id = %lead.id,
            has_phone = hit.phone.is_some(),
            has_email = hit.email.is_some(),
            order_related = extracted.order_related,
            "Contact details spotted in chat"
        );

        let sink = self.sink.clone();
        Some(tokio::spawn(async move { sink.submit(lead).await }))
    }

    /// System prompt, the visitor's conversation, then the language reminder.
    /// System messages sent by the client are dropped.
    fn build_prompt(&self, messages: &[ChatMessage], lang: Lang) -> Vec<ChatMessage> {
        let mut prompt = Vec::with_capacity(messages.len() + 2);
        prompt.push(ChatMessage::system(self.system_prompt.clone()));
        prompt.extend(
            messages
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        );
        prompt.push(ChatMessage::system(language_reminder(lang)));
        prompt
    }
}

fn latest_user_message(messages: &[ChatMessage]) -> Result<&ChatMessage, ChatError> {
    if messages.is_empty() {
        return Err(ChatError::EmptyConversation);
    }
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .ok_or(ChatError::NoUserMessage)
}
