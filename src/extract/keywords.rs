//! Bilingual keyword tables for the chat extractor.
//!
//! Entries are matched against lowercase text with [`has_keyword`]. English
//! entries are lowercase word stems that must start a word; Arabic entries
//! are stems without the definite article and match anywhere.

use crate::intake::ContactMethod;

/// Garment keywords and the canonical garment type they map to.
pub static GARMENT_TYPES: &[(&str, &str)] = &[
    ("t-shirt", "t-shirts"),
    ("tshirt", "t-shirts"),
    ("تيشيرت", "t-shirts"),
    ("تي شيرت", "t-shirts"),
    ("polo", "polo-shirts"),
    ("بولو", "polo-shirts"),
    ("hoodie", "hoodies"),
    ("sweatshirt", "hoodies"),
    ("هودي", "hoodies"),
    ("سويت شيرت", "hoodies"),
    ("uniform", "uniforms"),
    ("workwear", "uniforms"),
    ("scrubs", "uniforms"),
    ("زي موحد", "uniforms"),
    ("يونيفورم", "uniforms"),
    ("jeans", "jeans"),
    ("denim", "jeans"),
    ("trouser", "jeans"),
    ("pants", "jeans"),
    ("جينز", "jeans"),
    ("بنطلون", "jeans"),
    ("shirt", "shirts"),
    ("قميص", "shirts"),
    ("قمصان", "shirts"),
    ("jacket", "jackets"),
    ("جاكيت", "jackets"),
    ("dress", "dresses"),
    ("فستان", "dresses"),
];

/// Words that signal someone wants to place or discuss an order.
pub static ORDER_VERBS: &[&str] = &[
    "order",
    "buy",
    "purchase",
    "manufactur",
    "produce",
    "production",
    "quote",
    "quotation",
    "price",
    "pricing",
    "cost",
    "bulk",
    "wholesale",
    "pieces",
    "طلب",
    "اطلب",
    "شراء",
    "تصنيع",
    "إنتاج",
    "انتاج",
    "سعر",
    "أسعار",
    "اسعار",
    "عرض سعر",
    "جملة",
    "قطعة",
];

/// Contact channel words and the method they select.
pub static CONTACT_CHANNELS: &[(&str, ContactMethod)] = &[
    ("whatsapp", ContactMethod::Whatsapp),
    ("whats app", ContactMethod::Whatsapp),
    ("واتساب", ContactMethod::Whatsapp),
    ("واتس", ContactMethod::Whatsapp),
    ("email", ContactMethod::Email),
    ("e-mail", ContactMethod::Email),
    ("mail me", ContactMethod::Email),
    ("ايميل", ContactMethod::Email),
    ("إيميل", ContactMethod::Email),
    ("بريد", ContactMethod::Email),
    ("call", ContactMethod::Call),
    ("phone", ContactMethod::Call),
    ("ring me", ContactMethod::Call),
    ("اتصال", ContactMethod::Call),
    ("اتصل", ContactMethod::Call),
    ("مكالمة", ContactMethod::Call),
    ("هاتف", ContactMethod::Call),
];

/// Service keywords and the service label they add.
pub static SERVICES: &[(&str, &str)] = &[
    ("design", "design"),
    ("تصميم", "design"),
    ("print", "printing"),
    ("طباعة", "printing"),
    ("embroider", "embroidery"),
    ("تطريز", "embroidery"),
    ("sample", "sampling"),
    ("عينة", "sampling"),
    ("عينات", "sampling"),
    ("packag", "packaging"),
    ("تغليف", "packaging"),
    ("label", "labels"),
    ("ليبل", "labels"),
    ("manufactur", "manufacturing"),
    ("تصنيع", "manufacturing"),
    ("shipping", "shipping"),
    ("شحن", "shipping"),
];

/// Urgency words accepted as a timeline when no duration is given.
pub static URGENCY: &[(&str, &str)] = &[
    ("asap", "asap"),
    ("urgent", "urgent"),
    ("as soon as possible", "asap"),
    ("عاجل", "urgent"),
    ("بسرعة", "asap"),
    ("في أقرب وقت", "asap"),
    ("flexible", "flexible"),
    ("مرن", "flexible"),
];

/// Words meaning "name" that an assistant uses when asking for one.
pub static NAME_PROMPTS: &[&str] = &["name", "اسم"];

/// Words that end a name introduced with "my name is".
pub static NAME_BREAKS: &[&str] = &[
    "and", "but", "from", "here", "i", "i'm", "im", "we", "with", "need", "want", "looking",
    "و", "من", "وانا", "وأنا", "عايز", "أريد", "اريد", "محتاج",
];

/// Short replies that are never names.
pub static FILLERS: &[&str] = &[
    "hi", "hello", "hey", "thanks", "thank you", "ok", "okay", "yes", "no", "sure", "great",
    "good", "fine", "bye", "please", "مرحبا", "اهلا", "أهلا", "السلام عليكم", "شكرا", "شكراً",
    "نعم", "لا", "تمام", "حسنا", "ماشي", "اوك",
];

/// Whether `kw` occurs in `text`.
///
/// ASCII keywords only count at the start of a word, so "dress" does not
/// match "address" and "tshirt" does not match "sweatshirt". They still act
/// as stems ("hoodie" matches "hoodies"). Arabic keywords match anywhere
/// because prefixes such as "ال" and "و" attach directly to the word.
pub fn has_keyword(text: &str, kw: &str) -> bool {
    if !kw.is_ascii() {
        return text.contains(kw);
    }
    text.match_indices(kw).any(|(at, _)| {
        text[..at]
            .chars()
            .next_back()
            .is_none_or(|prev| !prev.is_alphanumeric())
    })
}

/// Whether `text` (already lowercase) contains any order-related keyword.
pub fn mentions_order(text: &str) -> bool {
    GARMENT_TYPES.iter().any(|(kw, _)| has_keyword(text, kw))
        || ORDER_VERBS.iter().any(|kw| has_keyword(text, kw))
        || CONTACT_CHANNELS.iter().any(|(kw, _)| has_keyword(text, kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_entries_are_lowercase() {
        for (kw, _) in GARMENT_TYPES {
            assert_eq!(*kw, kw.to_lowercase());
        }
        for kw in ORDER_VERBS {
            assert_eq!(*kw, kw.to_lowercase());
        }
        for (kw, _) in CONTACT_CHANNELS {
            assert_eq!(*kw, kw.to_lowercase());
        }
    }

    #[test]
    fn order_mentions_in_both_languages() {
        assert!(mentions_order("we need 300 hoodies"));
        assert!(mentions_order("can i get a quote"));
        assert!(mentions_order("أريد تصنيع ملابس"));
        assert!(mentions_order("تواصل معي على واتساب"));
        assert!(!mentions_order("hello there"));
    }

    #[test]
    fn english_keywords_start_a_word() {
        assert!(has_keyword("two dresses please", "dress"));
        assert!(has_keyword("(hoodies)", "hoodie"));
        assert!(has_keyword("dress", "dress"));
        assert!(!has_keyword("my address", "dress"));
        assert!(!has_keyword("sweatshirts", "tshirt"));
        assert!(!has_keyword("all participants", "pants"));
        assert!(!has_keyword("near the border", "order"));
        assert!(!has_keyword("i recall", "call"));
    }

    #[test]
    fn arabic_stems_match_inside_words() {
        assert!(has_keyword("والتطريز", "تطريز"));
        assert!(has_keyword("بالواتساب", "واتساب"));
    }

    #[test]
    fn look_alike_words_are_not_order_talk() {
        assert!(!mentions_order("here is my address"));
        assert!(!mentions_order("all participants agreed, see you at the border"));
    }
}
