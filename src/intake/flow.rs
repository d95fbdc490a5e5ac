//! Guided flow state machine: which step of the form the visitor is on.

use std::collections::HashMap;

use crate::error::IntakeError;
use crate::leads::model::LeadRecord;
use crate::locale::Lang;

use super::answer::{Answer, ContactMethod};
use super::contact::{digits_only, international_number, is_contact_valid};
use super::countries::find_by_name;
use super::question::{OTHER, Question, QuestionKind, guided_questions, ids};

/// Form steps.
///
/// Progresses Asking(0) → … → Asking(N-1) → Collecting → Complete, with Back
/// stepping one question at a time and Reset returning to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Asking(usize),
    Collecting,
    Complete,
}

/// Inputs that move the form between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    Answered,
    Back,
    Submitted,
    Reset,
}

impl FlowStep {
    /// Transition table for a form with `question_count` questions.
    pub fn on(self, event: FlowEvent, question_count: usize) -> Result<FlowStep, IntakeError> {
        use FlowEvent::*;
        use FlowStep::*;
        let last = question_count.saturating_sub(1);
        match (self, event) {
            (_, Reset) => Ok(Asking(0)),
            (Asking(i), Answered) if i < last => Ok(Asking(i + 1)),
            (Asking(i), Answered) if i == last => Ok(Collecting),
            (Asking(i), Back) if i > 0 => Ok(Asking(i - 1)),
            (Asking(0), Back) => Ok(Asking(0)),
            (Collecting, Back) => Ok(Asking(last)),
            (Collecting, Submitted) => Ok(Complete),
            (step, event) => Err(IntakeError::InvalidTransition {
                step: step.to_string(),
                event: event.to_string(),
            }),
        }
    }

    /// Position used by the progress bar: question index, then N for the
    /// contact step and N+1 once complete.
    pub fn index(&self, question_count: usize) -> usize {
        match self {
            Self::Asking(i) => *i,
            Self::Collecting => question_count,
            Self::Complete => question_count + 1,
        }
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asking(i) => write!(f, "asking({i})"),
            Self::Collecting => write!(f, "collecting"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl std::fmt::Display for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Answered => "answered",
            Self::Back => "back",
            Self::Submitted => "submitted",
            Self::Reset => "reset",
        };
        write!(f, "{s}")
    }
}

/// One visitor's pass through the guided form.
///
/// Lives only as long as the form is open; nothing is persisted until
/// `submit()` hands back a `LeadRecord`.
#[derive(Debug, Clone)]
pub struct GuidedSession {
    questions: Vec<Question>,
    lang: Lang,
    step: FlowStep,
    answers: HashMap<String, Answer>,
    other_inputs: HashMap<String, String>,
    /// Index of the question whose "other" field is showing.
    other_open: Option<usize>,
    default_country_code: String,
    country_code: String,
    contact_value: String,
    name: Option<String>,
}

impl GuidedSession {
    /// A fresh session over the standard six questions.
    pub fn new(lang: Lang, default_country_code: &str) -> Self {
        Self::with_questions(guided_questions(), lang, default_country_code)
    }

    pub fn with_questions(questions: Vec<Question>, lang: Lang, default_country_code: &str) -> Self {
        Self {
            questions,
            lang,
            step: FlowStep::Asking(0),
            answers: HashMap::new(),
            other_inputs: HashMap::new(),
            other_open: None,
            default_country_code: default_country_code.to_string(),
            country_code: default_country_code.to_string(),
            contact_value: String::new(),
            name: None,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question being asked, if the form is on a question step.
    pub fn current_question(&self) -> Option<&Question> {
        match self.step {
            FlowStep::Asking(i) => self.questions.get(i),
            _ => None,
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// Recorded answers in question order, skipping unanswered questions.
    pub fn answers_in_order(&self) -> Vec<(&Question, &Answer)> {
        self.questions
            .iter()
            .filter_map(|q| self.answers.get(q.id).map(|a| (q, a)))
            .collect()
    }

    pub fn other_input(&self, question_id: &str) -> Option<&str> {
        self.other_inputs.get(question_id).map(String::as_str)
    }

    /// Whether the free-text field is showing for the current question.
    pub fn is_other_open(&self) -> bool {
        matches!(self.step, FlowStep::Asking(i) if self.other_open == Some(i))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn contact_value(&self) -> &str {
        &self.contact_value
    }

    /// Fraction of the form completed, `index / (N+1)`.
    pub fn progress(&self) -> f32 {
        let n = self.question_count();
        self.step.index(n) as f32 / (n + 1) as f32
    }

    fn asking(&self, operation: &str) -> Result<(usize, &Question), IntakeError> {
        match self.step {
            FlowStep::Asking(i) => self
                .questions
                .get(i)
                .map(|q| (i, q))
                .ok_or_else(|| IntakeError::UnknownQuestion(format!("#{i}"))),
            step => Err(IntakeError::InvalidTransition {
                step: step.to_string(),
                event: operation.to_string(),
            }),
        }
    }

    /// Store the answer for the current question and move forward one step.
    fn record(&mut self, answer: Answer) -> Result<FlowStep, IntakeError> {
        let (_, question) = self.asking("answer")?;
        let id = question.id.to_string();
        let next = self.step.on(FlowEvent::Answered, self.question_count())?;
        self.answers.insert(id, answer);
        self.other_open = None;
        self.step = next;
        Ok(next)
    }

    /// Pick an option of a single-select question.
    ///
    /// Choosing "other" only opens the free-text field; the form stays put
    /// until `submit_other` is called.
    pub fn select(&mut self, value: &str) -> Result<FlowStep, IntakeError> {
        let (index, question) = self.asking("select")?;
        if question.kind != QuestionKind::SingleSelect {
            return Err(IntakeError::WrongKind {
                question: question.id.to_string(),
                expected: question.kind.to_string(),
            });
        }
        if !question.has_option(value) {
            return Err(IntakeError::UnknownOption {
                question: question.id.to_string(),
                value: value.to_string(),
            });
        }
        if value == OTHER {
            self.other_open = Some(index);
            return Ok(self.step);
        }
        self.record(Answer::Selected(value.to_string()))
    }

    /// Submit the text typed into the "other" field.
    pub fn submit_other(&mut self, text: &str) -> Result<FlowStep, IntakeError> {
        let (index, question) = self.asking("submit_other")?;
        let id = question.id.to_string();
        if self.other_open != Some(index) {
            return Err(IntakeError::OtherNotOpen(id));
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::EmptyAnswer(id));
        }
        self.other_inputs.insert(id, trimmed.to_string());
        self.record(Answer::Custom(trimmed.to_string()))
    }

    /// Answer a free-text question.
    pub fn submit_text(&mut self, text: &str) -> Result<FlowStep, IntakeError> {
        let (_, question) = self.asking("submit_text")?;
        if question.kind != QuestionKind::FreeText {
            return Err(IntakeError::WrongKind {
                question: question.id.to_string(),
                expected: question.kind.to_string(),
            });
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::EmptyAnswer(question.id.to_string()));
        }
        self.record(Answer::Custom(trimmed.to_string()))
    }

    /// Answer a country-select question by exact country name.
    pub fn choose_country(&mut self, name: &str) -> Result<FlowStep, IntakeError> {
        let (_, question) = self.asking("choose_country")?;
        if question.kind != QuestionKind::CountrySelect {
            return Err(IntakeError::WrongKind {
                question: question.id.to_string(),
                expected: question.kind.to_string(),
            });
        }
        let country =
            find_by_name(name).ok_or_else(|| IntakeError::UnknownCountry(name.to_string()))?;
        self.record(Answer::Selected(country.name_en.to_string()))
    }

    /// Go back one step. Answers already given are kept.
    pub fn back(&mut self) -> Result<FlowStep, IntakeError> {
        self.step = self.step.on(FlowEvent::Back, self.question_count())?;
        self.other_open = None;
        Ok(self.step)
    }

    /// Follow-up channel from the stored consultation answer.
    pub fn contact_method(&self) -> Option<ContactMethod> {
        self.answers
            .get(ids::CONSULTATION)
            .and_then(|answer| answer.value().parse().ok())
    }

    pub fn set_country_code(&mut self, code: &str) {
        self.country_code = code.trim().to_string();
    }

    /// Set the phone or email typed on the contact step. Phone methods keep
    /// digits only, like the numeric input on the page.
    pub fn set_contact_value(&mut self, raw: &str) {
        self.contact_value = match self.contact_method() {
            Some(method) if method.is_phone() => digits_only(raw),
            _ => raw.trim().to_string(),
        };
    }

    pub fn is_contact_valid(&self) -> bool {
        self.contact_method()
            .is_some_and(|method| is_contact_valid(method, &self.contact_value))
    }

    /// Full international number for phone methods.
    pub fn full_phone(&self) -> Option<String> {
        self.contact_method()
            .filter(ContactMethod::is_phone)
            .map(|_| international_number(&self.country_code, &self.contact_value))
    }

    /// Finish the form. The session moves to `Complete` and the caller gets
    /// the normalized lead to deliver; how delivery goes never changes the
    /// session.
    pub fn submit(&mut self) -> Result<LeadRecord, IntakeError> {
        let next = self.step.on(FlowEvent::Submitted, self.question_count())?;
        let method = self
            .contact_method()
            .ok_or(IntakeError::MissingContactMethod)?;
        if !is_contact_valid(method, &self.contact_value) {
            return Err(IntakeError::InvalidContact {
                method: method.to_string(),
            });
        }
        let record = LeadRecord::from_guided(self);
        self.step = next;
        Ok(record)
    }

    /// Clear everything and start over at the first question.
    pub fn reset(&mut self) {
        self.step = FlowStep::Asking(0);
        self.answers.clear();
        self.other_inputs.clear();
        self.other_open = None;
        self.country_code = self.default_country_code.clone();
        self.contact_value.clear();
        self.name = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Localized;

    fn session() -> GuidedSession {
        GuidedSession::new(Lang::En, "+20")
    }

    /// Walk the standard form up to the contact step.
    fn answer_all(s: &mut GuidedSession, consultation: &str) {
        s.select("hoodies").unwrap();
        s.select("500-1000").unwrap();
        s.select("full-package").unwrap();
        s.select("1-3-months").unwrap();
        s.choose_country("Egypt").unwrap();
        s.select(consultation).unwrap();
    }

    #[test]
    fn valid_transitions() {
        use FlowEvent::*;
        use FlowStep::*;
        let n = 6;
        let table = [
            (Asking(0), Answered, Asking(1)),
            (Asking(4), Answered, Asking(5)),
            (Asking(5), Answered, Collecting),
            (Asking(3), Back, Asking(2)),
            (Asking(0), Back, Asking(0)),
            (Collecting, Back, Asking(5)),
            (Collecting, Submitted, Complete),
            (Complete, Reset, Asking(0)),
            (Asking(3), Reset, Asking(0)),
        ];
        for (from, event, to) in table {
            assert_eq!(from.on(event, n).unwrap(), to, "{from} --{event}-->");
        }
    }

    #[test]
    fn invalid_transitions() {
        use FlowEvent::*;
        use FlowStep::*;
        let n = 6;
        assert!(Asking(2).on(Submitted, n).is_err());
        assert!(Collecting.on(Answered, n).is_err());
        assert!(Complete.on(Answered, n).is_err());
        assert!(Complete.on(Back, n).is_err());
        assert!(Complete.on(Submitted, n).is_err());
    }

    #[test]
    fn selection_advances_one_step() {
        let mut s = session();
        assert_eq!(s.select("t-shirts").unwrap(), FlowStep::Asking(1));
        assert_eq!(s.answer(ids::GARMENT_TYPE), Some(&Answer::Selected("t-shirts".into())));
    }

    #[test]
    fn last_question_moves_to_collecting() {
        let mut s = session();
        answer_all(&mut s, "call");
        assert_eq!(s.step(), FlowStep::Collecting);
        assert_eq!(s.answer_count(), 6);
    }

    #[test]
    fn unknown_option_is_rejected_without_moving() {
        let mut s = session();
        let err = s.select("capes").unwrap_err();
        assert!(matches!(err, IntakeError::UnknownOption { .. }));
        assert_eq!(s.step(), FlowStep::Asking(0));
        assert_eq!(s.answer_count(), 0);
    }

    #[test]
    fn other_opens_field_then_advances_like_a_selection() {
        let mut direct = session();
        direct.select("jeans").unwrap();

        let mut other = session();
        assert_eq!(other.select(OTHER).unwrap(), FlowStep::Asking(0));
        assert!(other.is_other_open());
        assert_eq!(other.submit_other("  Scrubs  ").unwrap(), direct.step());
        assert_eq!(other.answer(ids::GARMENT_TYPE), Some(&Answer::Custom("Scrubs".into())));
        assert_eq!(other.other_input(ids::GARMENT_TYPE), Some("Scrubs"));
        assert!(!other.is_other_open());
    }

    #[test]
    fn blank_other_text_is_rejected() {
        let mut s = session();
        s.select(OTHER).unwrap();
        assert_eq!(
            s.submit_other("   ").unwrap_err(),
            IntakeError::EmptyAnswer(ids::GARMENT_TYPE.into())
        );
        assert_eq!(s.step(), FlowStep::Asking(0));
    }

    #[test]
    fn other_text_requires_open_field() {
        let mut s = session();
        assert!(matches!(
            s.submit_other("Scrubs").unwrap_err(),
            IntakeError::OtherNotOpen(_)
        ));
    }

    #[test]
    fn back_keeps_answers_and_revisit_overwrites() {
        let mut s = session();
        s.select("hoodies").unwrap();
        s.select("100-500").unwrap();
        s.select("manufacturing").unwrap();
        assert_eq!(s.answer_count(), 3);

        s.back().unwrap();
        s.back().unwrap();
        assert_eq!(s.step(), FlowStep::Asking(1));
        assert_eq!(s.answer_count(), 3, "back must not drop answers");

        s.select("5000+").unwrap();
        assert_eq!(s.answer_count(), 3, "revisiting must not duplicate answers");
        assert_eq!(s.answer(ids::QUANTITY).unwrap().value(), "5000+");
        assert_eq!(s.answer(ids::SERVICES).unwrap().value(), "manufacturing");
    }

    #[test]
    fn back_at_first_question_is_noop() {
        let mut s = session();
        assert_eq!(s.back().unwrap(), FlowStep::Asking(0));
    }

    #[test]
    fn back_closes_other_field() {
        let mut s = session();
        s.select("hoodies").unwrap();
        s.select(OTHER).unwrap();
        s.back().unwrap();
        assert!(!s.is_other_open());
    }

    #[test]
    fn country_select_needs_exact_table_name() {
        let mut s = session();
        for value in ["hoodies", "100-500", "manufacturing", "flexible"] {
            s.select(value).unwrap();
        }
        assert!(matches!(s.select("Egypt").unwrap_err(), IntakeError::WrongKind { .. }));
        assert_eq!(
            s.choose_country("egypt").unwrap_err(),
            IntakeError::UnknownCountry("egypt".into())
        );
        s.choose_country("الإمارات").unwrap();
        assert_eq!(s.answer(ids::LOCATION).unwrap().value(), "United Arab Emirates");
    }

    #[test]
    fn contact_validity_follows_consultation() {
        let mut s = session();
        answer_all(&mut s, "whatsapp");
        assert!(!s.is_contact_valid());
        s.set_contact_value("101 234");
        assert!(!s.is_contact_valid());
        s.set_contact_value("101-234-5678");
        assert_eq!(s.contact_value(), "1012345678");
        assert!(s.is_contact_valid());

        let mut e = session();
        answer_all(&mut e, "email");
        e.set_contact_value("jane.example.com");
        assert!(!e.is_contact_valid());
        e.set_contact_value(" jane@example.com ");
        assert!(e.is_contact_valid());
    }

    #[test]
    fn submit_blocked_until_contact_valid() {
        let mut s = session();
        answer_all(&mut s, "call");
        s.set_contact_value("123");
        assert_eq!(
            s.submit().unwrap_err(),
            IntakeError::InvalidContact { method: "call".into() }
        );
        assert_eq!(s.step(), FlowStep::Collecting);
    }

    #[test]
    fn submit_before_contact_step_is_invalid() {
        let mut s = session();
        s.select("hoodies").unwrap();
        assert!(matches!(
            s.submit().unwrap_err(),
            IntakeError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn whatsapp_submission_builds_full_number() {
        let mut s = session();
        answer_all(&mut s, "whatsapp");
        s.set_country_code("+20");
        s.set_contact_value("1012345678");
        let lead = s.submit().unwrap();
        assert_eq!(s.step(), FlowStep::Complete);
        assert_eq!(lead.whatsapp.as_deref(), Some("+201012345678"));
        assert_eq!(lead.contact_method, ContactMethod::Whatsapp);
        assert_eq!(lead.answers.len(), 6);
    }

    #[test]
    fn reset_returns_to_start() {
        let mut s = session();
        answer_all(&mut s, "email");
        s.set_contact_value("jane@example.com");
        s.set_country_code("+971");
        s.submit().unwrap();
        s.reset();
        assert_eq!(s.step(), FlowStep::Asking(0));
        assert_eq!(s.answer_count(), 0);
        assert_eq!(s.contact_value(), "");
        assert_eq!(s.country_code(), "+20");
    }

    #[test]
    fn progress_is_index_over_n_plus_one() {
        let mut s = session();
        assert_eq!(s.progress(), 0.0);
        s.select("hoodies").unwrap();
        assert!((s.progress() - 1.0 / 7.0).abs() < f32::EPSILON);
        answer_rest(&mut s);
        assert!((s.progress() - 6.0 / 7.0).abs() < f32::EPSILON);
        s.set_contact_value("jane@example.com");
        s.submit().unwrap();
        assert_eq!(s.progress(), 1.0);
    }

    fn answer_rest(s: &mut GuidedSession) {
        s.select("500-1000").unwrap();
        s.select("full-package").unwrap();
        s.select("1-3-months").unwrap();
        s.choose_country("Egypt").unwrap();
        s.select("email").unwrap();
    }

    #[test]
    fn free_text_question() {
        let questions = vec![Question {
            id: "notes",
            prompt: Localized::new("Anything else?", "هل من شيء آخر؟"),
            kind: QuestionKind::FreeText,
            options: Vec::new(),
        }];
        let mut s = GuidedSession::with_questions(questions, Lang::En, "+20");
        assert!(s.submit_text("  ").is_err());
        assert_eq!(s.submit_text("Need samples first").unwrap(), FlowStep::Collecting);
        assert_eq!(s.answer("notes").unwrap().value(), "Need samples first");
        // no consultation question, so there is no contact method to submit with
        assert_eq!(s.submit().unwrap_err(), IntakeError::MissingContactMethod);
    }
}
