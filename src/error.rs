//! Error types for leadflow.

use std::time::Duration;

use crate::locale::Lang;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Chat-completion provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("No chat provider configured")]
    NotConfigured,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Guided-flow validation and transition errors.
///
/// These are the "block and let the user re-enter" class: nothing here is
/// fatal, the session stays usable after any of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Cannot apply {event} in step {step}")]
    InvalidTransition { step: String, event: String },

    #[error("Unknown option '{value}' for question {question}")]
    UnknownOption { question: String, value: String },

    #[error("Unknown country '{0}'")]
    UnknownCountry(String),

    #[error("Unknown question '{0}'")]
    UnknownQuestion(String),

    #[error("Question {question} expects a {expected} answer")]
    WrongKind { question: String, expected: String },

    #[error("Answer for {0} must not be empty")]
    EmptyAnswer(String),

    #[error("Free-text field is not open for question {0}")]
    OtherNotOpen(String),

    #[error("Missing answer for question {0}")]
    MissingAnswer(String),

    #[error("No contact method selected")]
    MissingContactMethod,

    #[error("Invalid contact value for {method}")]
    InvalidContact { method: String },
}

/// Chat endpoint errors.
///
/// Provider failures carry the language of the conversation so the caller
/// can answer with a localized apology.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Conversation is empty")]
    EmptyConversation,

    #[error("Conversation has no user message")]
    NoUserMessage,

    #[error("Chat provider failed: {source}")]
    Llm {
        lang: Lang,
        #[source]
        source: LlmError,
    },
}

/// Lead notification (SMTP) errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Send(String),
}
