//! Server-side replay of a completed guided form.
//!
//! The browser drives the form locally and posts the final answers. Replaying
//! them through a fresh `GuidedSession` applies the exact same transition and
//! validation rules before anything reaches the sink.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::IntakeError;
use crate::leads::model::LeadRecord;
use crate::locale::Lang;

use super::answer::Answer;
use super::flow::GuidedSession;
use super::question::{OTHER, QuestionKind};

/// Body of `POST /api/intake`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidedSubmission {
    #[serde(default)]
    pub lang: Lang,
    #[serde(default)]
    pub name: Option<String>,
    pub answers: HashMap<String, Answer>,
    #[serde(default)]
    pub country_code: Option<String>,
    pub contact_value: String,
}

/// Replay `submission` through a new session and return the lead it produces.
pub fn replay(
    submission: &GuidedSubmission,
    default_country_code: &str,
) -> Result<LeadRecord, IntakeError> {
    let mut session = GuidedSession::new(submission.lang, default_country_code);
    replay_into(&mut session, submission)
}

/// Replay into an existing (fresh) session.
pub fn replay_into(
    session: &mut GuidedSession,
    submission: &GuidedSubmission,
) -> Result<LeadRecord, IntakeError> {
    for question in session.questions().to_vec() {
        let answer = submission
            .answers
            .get(question.id)
            .ok_or_else(|| IntakeError::MissingAnswer(question.id.to_string()))?;

        match (question.kind, answer) {
            (QuestionKind::CountrySelect, answer) => {
                session.choose_country(answer.value())?;
            }
            (QuestionKind::FreeText, answer) => {
                session.submit_text(answer.value())?;
            }
            (QuestionKind::SingleSelect, Answer::Selected(value)) => {
                session.select(value)?;
            }
            (QuestionKind::SingleSelect, Answer::Custom(text)) => {
                session.select(OTHER)?;
                session.submit_other(text)?;
            }
        }
    }

    if let Some(name) = &submission.name {
        session.set_name(name);
    }
    if let Some(code) = &submission.country_code {
        session.set_country_code(code);
    }
    session.set_contact_value(&submission.contact_value);
    session.submit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::ContactMethod;

    fn submission(json: serde_json::Value) -> GuidedSubmission {
        serde_json::from_value(json).unwrap()
    }

    fn full_answers(consultation: &str) -> serde_json::Value {
        serde_json::json!({
            "garment_type": {"custom": "Scrubs"},
            "quantity": {"selected": "1000-5000"},
            "services": {"selected": "printing-embroidery"},
            "timeline": {"selected": "flexible"},
            "location": {"selected": "Saudi Arabia"},
            "consultation": {"selected": consultation}
        })
    }

    #[test]
    fn replays_whatsapp_form() {
        let sub = submission(serde_json::json!({
            "name": "Omar",
            "answers": full_answers("whatsapp"),
            "countryCode": "+966",
            "contactValue": "0501234567"
        }));
        let lead = replay(&sub, "+20").unwrap();
        assert_eq!(lead.contact_method, ContactMethod::Whatsapp);
        assert_eq!(lead.whatsapp.as_deref(), Some("+966501234567"));
        assert_eq!(lead.garment_type.as_deref(), Some("Scrubs"));
        assert_eq!(lead.location.as_deref(), Some("Saudi Arabia"));
        assert_eq!(lead.name.as_deref(), Some("Omar"));
        assert_eq!(lead.answers.len(), 6);
    }

    #[test]
    fn default_country_code_applies() {
        let sub = submission(serde_json::json!({
            "answers": full_answers("call"),
            "contactValue": "1012345678"
        }));
        let lead = replay(&sub, "+20").unwrap();
        assert_eq!(lead.phone.as_deref(), Some("+201012345678"));
        assert!(lead.whatsapp.is_none());
    }

    #[test]
    fn missing_answer_is_reported() {
        let mut answers = full_answers("email");
        answers.as_object_mut().unwrap().remove("timeline");
        let sub = submission(serde_json::json!({
            "answers": answers,
            "contactValue": "jane@example.com"
        }));
        assert_eq!(
            replay(&sub, "+20").unwrap_err(),
            IntakeError::MissingAnswer("timeline".into())
        );
    }

    #[test]
    fn invalid_contact_is_reported() {
        let sub = submission(serde_json::json!({
            "answers": full_answers("email"),
            "contactValue": "not-an-email"
        }));
        assert!(matches!(
            replay(&sub, "+20").unwrap_err(),
            IntakeError::InvalidContact { .. }
        ));
    }

    #[test]
    fn custom_answer_on_question_without_other_fails() {
        let mut answers = full_answers("email");
        answers["timeline"] = serde_json::json!({"custom": "yesterday"});
        let sub = submission(serde_json::json!({
            "answers": answers,
            "contactValue": "jane@example.com"
        }));
        assert!(matches!(
            replay(&sub, "+20").unwrap_err(),
            IntakeError::UnknownOption { .. }
        ));
    }
}
