//! Website chatbot: proxies conversations to the chat provider.

pub mod prompts;
pub mod service;

pub use service::{ChatReply, ChatService};
