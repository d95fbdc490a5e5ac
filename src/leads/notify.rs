//! Lead notification email via SMTP (lettre).

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};

use crate::error::NotifyError;
use crate::intake::guided_questions;
use crate::locale::Lang;

use super::model::LeadRecord;

/// SMTP settings for the sales-inbox notification.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
    pub to_address: String,
}

impl NotifyConfig {
    /// Build config from environment variables.
    /// Returns `None` unless both `SMTP_HOST` and `LEADS_NOTIFY_TO` are set.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
        let to_address = std::env::var("LEADS_NOTIFY_TO")
            .ok()
            .filter(|t| !t.is_empty())?;

        let smtp_port: u16 = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);

        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let password = std::env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_address = std::env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

        Some(Self {
            smtp_host,
            smtp_port,
            username,
            password: SecretString::from(password),
            from_address,
            to_address,
        })
    }
}

/// Sends one email per stored lead.
pub struct LeadNotifier {
    config: NotifyConfig,
}

impl LeadNotifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// Build the notification message for a lead.
    pub fn build_message(&self, lead: &LeadRecord) -> Result<Message, NotifyError> {
        Message::builder()
            .from(parse_mailbox(&self.config.from_address)?)
            .to(parse_mailbox(&self.config.to_address)?)
            .subject(render_subject(lead))
            .body(render_body(lead))
            .map_err(|e| NotifyError::Build(e.to_string()))
    }

    /// Send the notification. SMTP is blocking, so it runs off the runtime.
    pub async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError> {
        let email = self.build_message(lead)?;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let creds = Credentials::new(
                config.username.clone(),
                config.password.expose_secret().to_string(),
            );
            let transport = SmtpTransport::relay(&config.smtp_host)
                .map_err(|e| NotifyError::Send(format!("SMTP relay error: {e}")))?
                .port(config.smtp_port)
                .credentials(creds)
                .build();
            transport
                .send(&email)
                .map(|_| ())
                .map_err(|e| NotifyError::Send(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Send(format!("notification task failed: {e}")))??;

        tracing::info!(lead_id = %lead.id, to = %self.config.to_address, "Lead notification sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse::<Mailbox>().map_err(|e| NotifyError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Subject line: who and what.
pub fn render_subject(lead: &LeadRecord) -> String {
    let who = lead
        .name
        .as_deref()
        .or(lead.primary_contact())
        .unwrap_or("unknown visitor");
    match lead.garment_type.as_deref() {
        Some(garment) => format!("New {} lead: {who} ({garment})", lead.source),
        None => format!("New {} lead: {who}", lead.source),
    }
}

/// Plain-text body listing every known field and the answer log.
pub fn render_body(lead: &LeadRecord) -> String {
    let mut body = String::new();
    let fields = [
        ("Name", lead.name.as_deref()),
        ("Phone", lead.phone.as_deref()),
        ("WhatsApp", lead.whatsapp.as_deref()),
        ("Email", lead.email.as_deref()),
        ("Preferred contact", Some(lead.contact_method.as_str())),
        ("Garment type", lead.garment_type.as_deref()),
        ("Quantity", lead.quantity.as_deref()),
        ("Services", lead.services.as_deref()),
        ("Timeline", lead.timeline.as_deref()),
        ("Location", lead.location.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            body.push_str(&format!("{label}: {value}\n"));
        }
    }

    if !lead.answers.is_empty() {
        let questions = guided_questions();
        body.push_str("\nAnswers:\n");
        for answer in &lead.answers {
            // Guided answers store option values; show the English label.
            let shown = answer
                .question_id
                .as_deref()
                .and_then(|id| questions.iter().find(|q| q.id == id))
                .map(|q| q.label_for(&answer.answer, Lang::En))
                .unwrap_or_else(|| answer.answer.clone());
            body.push_str(&format!("- {}\n  {shown}\n", answer.question));
        }
    }

    body.push_str(&format!(
        "\nLead {} received {} via {}\n",
        lead.id,
        lead.created_at.format("%Y-%m-%d %H:%M UTC"),
        lead.source
    ));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{LeadAnswer, LeadInput};

    fn config() -> NotifyConfig {
        NotifyConfig {
            smtp_host: "smtp.test.com".into(),
            smtp_port: 587,
            username: "bot@test.com".into(),
            password: SecretString::from("pw"),
            from_address: "bot@test.com".into(),
            to_address: "sales@test.com".into(),
        }
    }

    fn lead() -> LeadRecord {
        LeadRecord::from_input(LeadInput {
            name: Some("Omar".into()),
            phone: Some("+201012345678".into()),
            garment_type: Some("uniforms".into()),
            answers: vec![LeadAnswer {
                question_id: None,
                question: "How many?".into(),
                answer: "2000".into(),
            }],
            ..Default::default()
        })
    }

    #[test]
    fn config_from_env_requires_host_and_recipient() {
        // SAFETY: no other test in this crate reads SMTP_HOST concurrently.
        unsafe { std::env::remove_var("SMTP_HOST") };
        assert!(NotifyConfig::from_env().is_none());
    }

    #[test]
    fn subject_names_the_lead() {
        assert_eq!(render_subject(&lead()), "New api lead: Omar (uniforms)");
    }

    #[test]
    fn body_lists_known_fields_only() {
        let body = render_body(&lead());
        assert!(body.contains("Name: Omar\n"));
        assert!(body.contains("Phone: +201012345678\n"));
        assert!(body.contains("- How many?\n  2000\n"));
        assert!(!body.contains("Email:"));
    }

    #[test]
    fn guided_answers_show_option_labels() {
        let mut lead = lead();
        lead.answers = vec![
            LeadAnswer {
                question_id: Some("quantity".into()),
                question: "How many pieces are you planning to order?".into(),
                answer: "5000+".into(),
            },
            LeadAnswer {
                question_id: Some("garment_type".into()),
                question: "What type of garments do you need?".into(),
                answer: "Scrubs".into(),
            },
        ];
        let body = render_body(&lead);
        assert!(body.contains("  More than 5,000 pieces\n"));
        assert!(body.contains("  Scrubs\n"));
        assert!(!body.contains("5000+"));
    }

    #[test]
    fn builds_message_for_valid_addresses() {
        let notifier = LeadNotifier::new(config());
        assert!(notifier.build_message(&lead()).is_ok());
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let mut cfg = config();
        cfg.to_address = "not an address".into();
        let err = LeadNotifier::new(cfg).build_message(&lead()).unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress { .. }));
    }
}
