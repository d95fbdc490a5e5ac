//! Whole-conversation heuristics: order intent, lead fields, visitor name.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::intake::ContactMethod;
use crate::intake::countries::find_mentioned;
use crate::llm::{ChatMessage, Role};

use super::contact::{extract_email, extract_phone, fold_digit, normalize_digits};
use super::keywords::{
    CONTACT_CHANNELS, FILLERS, GARMENT_TYPES, NAME_BREAKS, NAME_PROMPTS, SERVICES, URGENCY,
    has_keyword, mentions_order,
};

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*)\s*(pieces|piece|pcs|units|items|قطعة|قطع|حبة)").expect("valid regex")
});

static TIMELINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+)\s*(days?|weeks?|months?|يوم|أيام|ايام|أسبوع|اسبوع|أسابيع|اسابيع|شهر|أشهر|اشهر|شهور)",
    )
    .expect("valid regex")
});

/// "my name is ..." followed by up to three words.
static EXPLICIT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:my name is|اسمي)\s+([^\s\d,.!?؟@]+(?:[ \t]+[^\s\d,.!?؟@]+){0,2})")
        .expect("valid regex")
});

/// Everything the extractor could pull out of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedLead {
    pub order_related: bool,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_method: Option<ContactMethod>,
    pub garment_type: Option<String>,
    pub quantity: Option<String>,
    pub services: Option<String>,
    pub timeline: Option<String>,
    pub location: Option<String>,
}

impl ExtractedLead {
    pub fn has_contact(&self) -> bool {
        self.phone.is_some() || self.email.is_some()
    }
}

fn user_messages(messages: &[ChatMessage]) -> impl DoubleEndedIterator<Item = &ChatMessage> {
    messages.iter().filter(|m| m.role == Role::User)
}

/// Lowercased user side of the conversation, digits folded to ASCII.
fn user_transcript(messages: &[ChatMessage]) -> String {
    user_messages(messages)
        .map(|m| fold_case(&m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fold_case(text: &str) -> String {
    text.to_lowercase().chars().map(fold_digit).collect()
}

/// Whether the conversation is about placing an order.
pub fn is_order_related(messages: &[ChatMessage]) -> bool {
    let text = messages
        .iter()
        .map(|m| m.content.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    mentions_order(&text)
}

/// Pull lead data out of a chat transcript.
///
/// Phone and email come from the most recent user message that has them.
/// The order fields are only looked for when the conversation is about an
/// order; the name heuristic always runs.
pub fn extract_lead(messages: &[ChatMessage], dial_code: &str) -> ExtractedLead {
    let mut lead = ExtractedLead {
        order_related: is_order_related(messages),
        phone: user_messages(messages)
            .rev()
            .find_map(|m| extract_phone(&m.content, dial_code)),
        email: user_messages(messages)
            .rev()
            .find_map(|m| extract_email(&m.content)),
        name: guess_name(messages),
        ..Default::default()
    };

    if lead.order_related {
        let text = user_transcript(messages);
        lead.garment_type = find_garment(&text);
        lead.quantity = find_quantity(&text);
        lead.services = find_services(&text);
        lead.timeline = find_timeline(&text);
        lead.location = find_mentioned(&text).map(|country| country.name_en.to_string());
        lead.contact_method = user_messages(messages)
            .rev()
            .find_map(|m| find_contact_method(&m.content.to_lowercase()));
    }
    lead
}

fn find_garment(text: &str) -> Option<String> {
    GARMENT_TYPES
        .iter()
        .find(|(kw, _)| has_keyword(text, kw))
        .map(|(_, garment)| garment.to_string())
}

fn find_quantity(text: &str) -> Option<String> {
    QUANTITY.captures(text).map(|caps| {
        let count = caps[1].replace(',', "");
        format!("{count} pieces")
    })
}

fn find_services(text: &str) -> Option<String> {
    let mut found: Vec<&str> = Vec::new();
    for (kw, service) in SERVICES {
        if has_keyword(text, kw) && !found.contains(service) {
            found.push(*service);
        }
    }
    (!found.is_empty()).then(|| found.join(", "))
}

fn find_timeline(text: &str) -> Option<String> {
    if let Some(m) = TIMELINE.find(text) {
        return Some(m.as_str().to_string());
    }
    URGENCY
        .iter()
        .find(|(kw, _)| has_keyword(text, kw))
        .map(|(_, label)| label.to_string())
}

fn find_contact_method(text: &str) -> Option<ContactMethod> {
    CONTACT_CHANNELS
        .iter()
        .find(|(kw, _)| has_keyword(text, kw))
        .map(|(_, method)| *method)
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn has_digits(text: &str) -> bool {
    normalize_digits(text).chars().any(|c| c.is_ascii_digit())
}

fn is_filler(lower: &str) -> bool {
    let trimmed = lower.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    FILLERS.contains(&trimmed)
}

/// A reply that could be a name given right after being asked for one.
fn is_name_reply(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && word_count(trimmed) <= 4
        && !has_digits(trimmed)
        && !trimmed.contains('@')
        && !is_filler(&trimmed.to_lowercase())
}

/// A message that looks like a bare name anywhere in the conversation.
fn is_name_like(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    is_name_reply(text)
        && word_count(&lower) <= 3
        && !lower.contains('?')
        && !lower.contains('؟')
        && !mentions_order(&lower)
}

fn asks_for_name(text: &str) -> bool {
    let lower = text.to_lowercase();
    NAME_PROMPTS.iter().any(|kw| has_keyword(&lower, kw))
}

/// Leading words of an introduced name, up to the first connective or
/// order keyword.
fn trim_name(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|word| {
            let lower = word.to_lowercase();
            !NAME_BREAKS.contains(&lower.as_str()) && !mentions_order(&lower)
        })
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// Guess the visitor's name. The last qualifying user message wins.
fn guess_name(messages: &[ChatMessage]) -> Option<String> {
    let mut name = None;
    for (i, message) in messages.iter().enumerate() {
        if message.role != Role::User {
            continue;
        }
        let text = message.content.trim();
        let asked = i > 0
            && messages[i - 1].role == Role::Assistant
            && asks_for_name(&messages[i - 1].content);

        if let Some(introduced) = EXPLICIT_NAME
            .captures(text)
            .and_then(|caps| trim_name(&caps[1]))
        {
            name = Some(introduced);
        } else if (asked && is_name_reply(text)) || is_name_like(text) {
            name = Some(text.to_string());
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convo(turns: &[(Role, &str)]) -> Vec<ChatMessage> {
        turns
            .iter()
            .map(|(role, content)| ChatMessage {
                role: *role,
                content: content.to_string(),
            })
            .collect()
    }

    #[test]
    fn order_intent_from_any_message() {
        let messages = convo(&[
            (Role::User, "hello"),
            (Role::Assistant, "Hi! How can I help?"),
            (Role::User, "I want to order polo shirts"),
        ]);
        assert!(is_order_related(&messages));
        assert!(!is_order_related(&convo(&[(Role::User, "hello there")])));
    }

    #[test]
    fn extracts_order_fields_from_whole_transcript() {
        let messages = convo(&[
            (Role::User, "Hi, we need 1,500 pieces of hoodies with embroidery"),
            (Role::Assistant, "Sure. When do you need them and where are you?"),
            (Role::User, "In 6 weeks, we are in Saudi Arabia. Also printing please"),
            (Role::Assistant, "Great, how should we reach you?"),
            (Role::User, "whatsapp me on +966501234567"),
        ]);
        let lead = extract_lead(&messages, "+20");
        assert!(lead.order_related);
        assert_eq!(lead.garment_type.as_deref(), Some("hoodies"));
        assert_eq!(lead.quantity.as_deref(), Some("1500 pieces"));
        assert_eq!(lead.services.as_deref(), Some("printing, embroidery"));
        assert_eq!(lead.timeline.as_deref(), Some("6 weeks"));
        assert_eq!(lead.location.as_deref(), Some("Saudi Arabia"));
        assert_eq!(lead.contact_method, Some(ContactMethod::Whatsapp));
        assert_eq!(lead.phone.as_deref(), Some("+966501234567"));
        assert!(lead.has_contact());
    }

    #[test]
    fn arabic_conversation() {
        let messages = convo(&[
            (Role::User, "عايز اطلب ٣٠٠ قطعة تيشيرت"),
            (Role::Assistant, "ممتاز! ما اسمك؟"),
            (Role::User, "محمد"),
            (Role::User, "رقمي 01012345678 واتساب"),
        ]);
        let lead = extract_lead(&messages, "+20");
        assert!(lead.order_related);
        assert_eq!(lead.garment_type.as_deref(), Some("t-shirts"));
        assert_eq!(lead.quantity.as_deref(), Some("300 pieces"));
        assert_eq!(lead.name.as_deref(), Some("محمد"));
        assert_eq!(lead.phone.as_deref(), Some("+201012345678"));
        assert_eq!(lead.contact_method, Some(ContactMethod::Whatsapp));
    }

    #[test]
    fn no_order_fields_without_order_intent() {
        let messages = convo(&[
            (Role::User, "what are your opening hours in egypt?"),
            (Role::User, "jane@example.com"),
        ]);
        let lead = extract_lead(&messages, "+20");
        assert!(!lead.order_related);
        assert_eq!(lead.location, None);
        assert_eq!(lead.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn latest_contact_wins() {
        let messages = convo(&[
            (Role::User, "old@example.com"),
            (Role::User, "actually use new@example.com"),
        ]);
        let lead = extract_lead(&messages, "+20");
        assert_eq!(lead.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn name_after_assistant_asks() {
        let messages = convo(&[
            (Role::Assistant, "Could I have your name please?"),
            (Role::User, "Ahmed Samir Hassan Ali"),
        ]);
        assert_eq!(guess_name(&messages).as_deref(), Some("Ahmed Samir Hassan Ali"));
    }

    #[test]
    fn last_short_message_wins() {
        let messages = convo(&[
            (Role::User, "Layla"),
            (Role::Assistant, "Nice to meet you"),
            (Role::User, "Nour Adel"),
        ]);
        assert_eq!(guess_name(&messages).as_deref(), Some("Nour Adel"));
    }

    #[test]
    fn fillers_numbers_and_keywords_are_not_names() {
        let messages = convo(&[
            (Role::User, "Karim"),
            (Role::User, "thanks!"),
            (Role::User, "500"),
            (Role::User, "hoodies please"),
            (Role::User, "any update?"),
        ]);
        assert_eq!(guess_name(&messages).as_deref(), Some("Karim"));
    }

    #[test]
    fn explicit_name_phrase() {
        let messages = convo(&[(Role::User, "Hello, my name is Dina Fawzy, I need uniforms")]);
        assert_eq!(guess_name(&messages).as_deref(), Some("Dina Fawzy"));
    }

    #[test]
    fn explicit_name_stops_at_connective() {
        let messages = convo(&[(Role::User, "my name is Dina and I need 300 uniforms")]);
        assert_eq!(guess_name(&messages).as_deref(), Some("Dina"));

        let messages = convo(&[(Role::User, "My name is Sara hoodies order")]);
        assert_eq!(guess_name(&messages).as_deref(), Some("Sara"));

        let messages = convo(&[(Role::User, "اسمي أحمد علي و عايز تيشيرتات")]);
        assert_eq!(guess_name(&messages).as_deref(), Some("أحمد علي"));
    }

    #[test]
    fn explicit_name_is_at_most_three_words() {
        let messages = convo(&[(Role::User, "my name is Ahmed Samir Hassan Ali")]);
        assert_eq!(guess_name(&messages).as_deref(), Some("Ahmed Samir Hassan"));
    }

    #[test]
    fn address_is_not_a_dress() {
        let lead = extract_lead(
            &convo(&[(Role::User, "here is my email address: jane@example.com")]),
            "+20",
        );
        assert_eq!(lead.garment_type, None);
        assert_eq!(lead.email.as_deref(), Some("jane@example.com"));

        let lead = extract_lead(
            &convo(&[(Role::User, "please recall the participants near the border")]),
            "+20",
        );
        assert!(!lead.order_related);
    }

    #[test]
    fn sweatshirts_are_hoodies() {
        let lead = extract_lead(
            &convo(&[(Role::User, "I want to order 200 pieces of sweatshirts")]),
            "+20",
        );
        assert_eq!(lead.garment_type.as_deref(), Some("hoodies"));
        assert_eq!(lead.quantity.as_deref(), Some("200 pieces"));
    }

    #[test]
    fn urgency_as_timeline() {
        assert_eq!(find_timeline("need it asap").as_deref(), Some("asap"));
        assert_eq!(find_timeline("خلال 2 شهر").as_deref(), Some("2 شهر"));
        assert_eq!(find_timeline("whenever"), None);
    }
}
