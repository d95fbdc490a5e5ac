//! Guided intake form: the fixed question sequence on the AI-agent page.
//!
//! The visitor answers six questions (garment type, quantity, services,
//! timeline, location, preferred follow-up channel), then leaves a phone
//! number or email on the contact step. `GuidedSession` drives the steps;
//! `replay` re-runs a browser submission through the same rules.

pub mod answer;
pub mod contact;
pub mod countries;
pub mod flow;
pub mod question;
pub mod replay;

pub use answer::{Answer, ContactMethod};
pub use contact::{digits_only, international_number, is_contact_valid};
pub use countries::{COUNTRIES, Country};
pub use flow::{FlowEvent, FlowStep, GuidedSession};
pub use question::{LocalizedQuestion, Question, QuestionKind, QuestionOption, guided_questions};
pub use replay::{GuidedSubmission, replay};
