//! The guided form's questions.

use serde::Serialize;

use crate::locale::{Lang, Localized};

use super::countries::COUNTRIES;

/// Option value that reveals the free-text field.
pub const OTHER: &str = "other";

/// Question identifiers used by the guided form.
pub mod ids {
    pub const GARMENT_TYPE: &str = "garment_type";
    pub const QUANTITY: &str = "quantity";
    pub const SERVICES: &str = "services";
    pub const TIMELINE: &str = "timeline";
    pub const LOCATION: &str = "location";
    pub const CONSULTATION: &str = "consultation";
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleSelect,
    FreeText,
    CountrySelect,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SingleSelect => "single_select",
            Self::FreeText => "free_text",
            Self::CountrySelect => "country_select",
        };
        write!(f, "{s}")
    }
}

/// One selectable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: Localized,
}

/// An immutable form question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub prompt: Localized,
    pub kind: QuestionKind,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|opt| opt.value == value)
    }

    /// Label for a stored value, falling back to the value itself.
    pub fn label_for(&self, value: &str, lang: Lang) -> String {
        self.options
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label.get(lang).to_string())
            .unwrap_or_else(|| value.to_string())
    }

    /// Render for the website in one language.
    pub fn localized(&self, lang: Lang) -> LocalizedQuestion {
        let options = match self.kind {
            QuestionKind::CountrySelect => COUNTRIES
                .iter()
                .map(|country| LocalizedOption {
                    value: country.name_en.to_string(),
                    label: country.name(lang).to_string(),
                })
                .collect(),
            _ => self
                .options
                .iter()
                .map(|opt| LocalizedOption {
                    value: opt.value.to_string(),
                    label: opt.label.get(lang).to_string(),
                })
                .collect(),
        };
        LocalizedQuestion {
            id: self.id.to_string(),
            prompt: self.prompt.get(lang).to_string(),
            kind: self.kind,
            options,
        }
    }
}

/// A question rendered in a single language.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedQuestion {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<LocalizedOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizedOption {
    pub value: String,
    pub label: String,
}

fn opt(value: &'static str, en: &'static str, ar: &'static str) -> QuestionOption {
    QuestionOption {
        value,
        label: Localized::new(en, ar),
    }
}

/// The six guided-form questions, in asking order.
pub fn guided_questions() -> Vec<Question> {
    vec![
        Question {
            id: ids::GARMENT_TYPE,
            prompt: Localized::new(
                "What type of garments do you need?",
                "ما نوع الملابس التي تحتاجها؟",
            ),
            kind: QuestionKind::SingleSelect,
            options: vec![
                opt("t-shirts", "T-shirts", "تيشيرتات"),
                opt("polo-shirts", "Polo shirts", "قمصان بولو"),
                opt("hoodies", "Hoodies & sweatshirts", "هوديز وسويت شيرت"),
                opt("uniforms", "Uniforms & workwear", "زي موحد وملابس عمل"),
                opt("jeans", "Jeans & trousers", "جينز وبناطيل"),
                opt(OTHER, "Other", "أخرى"),
            ],
        },
        Question {
            id: ids::QUANTITY,
            prompt: Localized::new(
                "How many pieces are you planning to order?",
                "كم عدد القطع التي تخطط لطلبها؟",
            ),
            kind: QuestionKind::SingleSelect,
            options: vec![
                opt("100-500", "100 – 500 pieces", "١٠٠ – ٥٠٠ قطعة"),
                opt("500-1000", "500 – 1,000 pieces", "٥٠٠ – ١٠٠٠ قطعة"),
                opt("1000-5000", "1,000 – 5,000 pieces", "١٠٠٠ – ٥٠٠٠ قطعة"),
                opt("5000+", "More than 5,000 pieces", "أكثر من ٥٠٠٠ قطعة"),
                opt(OTHER, "Other", "أخرى"),
            ],
        },
        Question {
            id: ids::SERVICES,
            prompt: Localized::new(
                "Which services do you need?",
                "ما الخدمات التي تحتاجها؟",
            ),
            kind: QuestionKind::SingleSelect,
            options: vec![
                opt("manufacturing", "Manufacturing only", "تصنيع فقط"),
                opt("design-manufacturing", "Design + manufacturing", "تصميم + تصنيع"),
                opt("printing-embroidery", "Printing & embroidery", "طباعة وتطريز"),
                opt("full-package", "Full package (design to delivery)", "باقة كاملة (من التصميم للتسليم)"),
                opt(OTHER, "Other", "أخرى"),
            ],
        },
        Question {
            id: ids::TIMELINE,
            prompt: Localized::new(
                "When do you need the order delivered?",
                "متى تحتاج استلام الطلب؟",
            ),
            kind: QuestionKind::SingleSelect,
            options: vec![
                opt("within-1-month", "Within a month", "خلال شهر"),
                opt("1-3-months", "1 – 3 months", "من شهر إلى ٣ أشهر"),
                opt("3-plus-months", "More than 3 months", "أكثر من ٣ أشهر"),
                opt("flexible", "Flexible", "مرن"),
            ],
        },
        Question {
            id: ids::LOCATION,
            prompt: Localized::new("Where are you located?", "أين تقع؟"),
            kind: QuestionKind::CountrySelect,
            options: Vec::new(),
        },
        Question {
            id: ids::CONSULTATION,
            prompt: Localized::new(
                "How would you like us to contact you?",
                "كيف تفضل أن نتواصل معك؟",
            ),
            kind: QuestionKind::SingleSelect,
            options: vec![
                opt("call", "Phone call", "مكالمة هاتفية"),
                opt("whatsapp", "WhatsApp", "واتساب"),
                opt("email", "Email", "البريد الإلكتروني"),
            ],
        },
    ]
}
