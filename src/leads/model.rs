//! Lead records: the one row shape both intake paths normalize into.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::ExtractedLead;
use crate::intake::question::ids;
use crate::intake::{ContactMethod, GuidedSession};
use crate::llm::{ChatMessage, Role};

/// Where a lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// The guided AI-agent form.
    Guided,
    /// Contact details spotted in a chatbot conversation.
    Chat,
    /// Posted directly to `/api/leads`.
    Api,
}

impl std::fmt::Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Guided => "guided",
            Self::Chat => "chat",
            Self::Api => "api",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for LeadSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guided" => Ok(Self::Guided),
            "chat" => Ok(Self::Chat),
            "api" => Ok(Self::Api),
            other => Err(format!("unknown lead source: {other}")),
        }
    }
}

/// Follow-up status. Leads are only ever created as `New`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
        }
    }
}

/// One question/answer pair on a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub question: String,
    pub answer: String,
}

/// A captured lead, ready for the sales team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: Uuid,
    pub source: LeadSource,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub contact_method: ContactMethod,
    pub garment_type: Option<String>,
    pub quantity: Option<String>,
    pub services: Option<String>,
    pub timeline: Option<String>,
    pub location: Option<String>,
    pub consultation: Option<String>,
    pub answers: Vec<LeadAnswer>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/leads`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub contact_method: Option<ContactMethod>,
    #[serde(default)]
    pub garment_type: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub services: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub consultation: Option<String>,
    #[serde(default)]
    pub answers: Vec<LeadAnswer>,
}

/// Trimmed, with blank strings treated as absent.
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl LeadRecord {
    fn blank(source: LeadSource, contact_method: ContactMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            name: None,
            email: None,
            phone: None,
            whatsapp: None,
            contact_method,
            garment_type: None,
            quantity: None,
            services: None,
            timeline: None,
            location: None,
            consultation: None,
            answers: Vec::new(),
            status: LeadStatus::New,
            created_at: Utc::now(),
        }
    }

    /// Normalize a guided session sitting on its contact step.
    ///
    /// Callers go through `GuidedSession::submit`, which checks the contact
    /// value first.
    pub fn from_guided(session: &GuidedSession) -> Self {
        let method = session.contact_method().unwrap_or(ContactMethod::Call);
        let mut lead = Self::blank(LeadSource::Guided, method);
        let value_of = |id: &str| session.answer(id).map(|a| a.value().to_string());

        lead.name = clean(session.name());
        lead.garment_type = value_of(ids::GARMENT_TYPE);
        lead.quantity = value_of(ids::QUANTITY);
        lead.services = value_of(ids::SERVICES);
        lead.timeline = value_of(ids::TIMELINE);
        lead.location = value_of(ids::LOCATION);
        lead.consultation = value_of(ids::CONSULTATION);

        match method {
            ContactMethod::Call => lead.phone = session.full_phone(),
            ContactMethod::Whatsapp => lead.whatsapp = session.full_phone(),
            ContactMethod::Email => lead.email = clean(Some(session.contact_value())),
        }

        lead.answers = session
            .answers_in_order()
            .into_iter()
            .map(|(question, answer)| LeadAnswer {
                question_id: Some(question.id.to_string()),
                question: question.prompt.get(session.lang()).to_string(),
                answer: answer.value().to_string(),
            })
            .collect();
        lead
    }

    /// Normalize a chatbot conversation plus what the extractor found in it.
    ///
    /// Answers pair each user message with the assistant message before it,
    /// so the whole transcript travels with the lead.
    pub fn from_transcript(messages: &[ChatMessage], extracted: &ExtractedLead) -> Self {
        let method = extracted.contact_method.unwrap_or(
            if extracted.phone.is_none() && extracted.email.is_some() {
                ContactMethod::Email
            } else {
                ContactMethod::Call
            },
        );
        let mut lead = Self::blank(LeadSource::Chat, method);

        lead.name = clean(extracted.name.as_deref());
        lead.email = extracted.email.clone();
        lead.phone = extracted.phone.clone();
        if method == ContactMethod::Whatsapp {
            lead.whatsapp = extracted.phone.clone();
        }
        lead.garment_type = extracted.garment_type.clone();
        lead.quantity = extracted.quantity.clone();
        lead.services = extracted.services.clone();
        lead.timeline = extracted.timeline.clone();
        lead.location = extracted.location.clone();
        lead.consultation = Some(method.to_string());

        let mut last_question = String::new();
        for message in messages {
            match message.role {
                Role::Assistant => last_question = message.content.clone(),
                Role::User => lead.answers.push(LeadAnswer {
                    question_id: None,
                    question: std::mem::take(&mut last_question),
                    answer: message.content.clone(),
                }),
                Role::System => {}
            }
        }
        lead
    }

    /// Normalize a raw API body.
    ///
    /// A missing contact method is inferred from which contact field is set.
    pub fn from_input(input: LeadInput) -> Self {
        let email = clean(input.email.as_deref());
        let phone = clean(input.phone.as_deref());
        let whatsapp = clean(input.whatsapp.as_deref());
        let method = input.contact_method.unwrap_or(if whatsapp.is_some() {
            ContactMethod::Whatsapp
        } else if phone.is_none() && email.is_some() {
            ContactMethod::Email
        } else {
            ContactMethod::Call
        });

        let mut lead = Self::blank(LeadSource::Api, method);
        lead.name = clean(input.name.as_deref());
        lead.email = email;
        lead.phone = phone;
        lead.whatsapp = whatsapp;
        lead.garment_type = clean(input.garment_type.as_deref());
        lead.quantity = clean(input.quantity.as_deref());
        lead.services = clean(input.services.as_deref());
        lead.timeline = clean(input.timeline.as_deref());
        lead.location = clean(input.location.as_deref());
        lead.consultation = clean(input.consultation.as_deref());
        lead.answers = input.answers;
        lead
    }

    /// Rebuild the per-question answer map, keyed by question id when known
    /// and by question text otherwise.
    pub fn answers_by_question(&self) -> HashMap<String, String> {
        self.answers
            .iter()
            .map(|a| {
                let key = a.question_id.clone().unwrap_or_else(|| a.question.clone());
                (key, a.answer.clone())
            })
            .collect()
    }

    /// Best contact value for the chosen method.
    pub fn primary_contact(&self) -> Option<&str> {
        let preferred = match self.contact_method {
            ContactMethod::Call => self.phone.as_deref(),
            ContactMethod::Whatsapp => self.whatsapp.as_deref().or(self.phone.as_deref()),
            ContactMethod::Email => self.email.as_deref(),
        };
        preferred
            .or(self.phone.as_deref())
            .or(self.email.as_deref())
    }
}
