//! Answer values and the follow-up channel.

use serde::{Deserialize, Serialize};

/// A recorded answer: either one of the question's options or the text typed
/// into the "other" field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Selected(String),
    Custom(String),
}

impl Answer {
    pub fn value(&self) -> &str {
        match self {
            Self::Selected(v) | Self::Custom(v) => v,
        }
    }
}

/// The channel the visitor wants to be contacted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Call,
    Whatsapp,
    Email,
}

impl ContactMethod {
    /// Phone-like methods collect a calling code and a digit string.
    pub fn is_phone(&self) -> bool {
        matches!(self, Self::Call | Self::Whatsapp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Whatsapp => "whatsapp",
            Self::Email => "email",
        }
    }
}

impl std::fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "phone" => Ok(Self::Call),
            "whatsapp" => Ok(Self::Whatsapp),
            "email" => Ok(Self::Email),
            other => Err(format!("unknown contact method: {other}")),
        }
    }
}
