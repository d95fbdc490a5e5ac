//! Fixed chatbot prompts and the apology shown when the model is unavailable.

use crate::locale::{Lang, Localized};

/// Default system prompt for the website assistant.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are the customer assistant on the website of a garment manufacturer based in Egypt.

The factory produces t-shirts, polo shirts, hoodies, uniforms, jeans and other garments \
in bulk for brands, companies and retailers. Services include manufacturing, design, \
printing, embroidery and full-package production.

Guidelines:
- Be friendly, concise and professional. Keep answers to a few sentences.
- Help visitors describe their order: garment type, quantity, services, timeline and location.
- Ask for the visitor's name and a phone number, WhatsApp number or email so the sales team can follow up.
- Do not quote exact prices or promise delivery dates; say the sales team will send a quotation.
- If you do not know something, say so and offer to connect the visitor with the team.";

const REMINDER: Localized = Localized::new(
    "Reply in English, the language of the user's latest message.",
    "Reply in Arabic, the language of the user's latest message. أجب باللغة العربية.",
);

const APOLOGY: Localized = Localized::new(
    "Sorry, something went wrong. Please try again or contact us directly.",
    "عذراً، حدث خطأ. يرجى المحاولة مرة أخرى أو التواصل معنا مباشرة.",
);

/// Per-request system reminder appended after the conversation.
pub fn language_reminder(lang: Lang) -> &'static str {
    REMINDER.get(lang)
}

/// Generic apology shown in the chat window when the model call fails.
pub fn apology(lang: Lang) -> &'static str {
    APOLOGY.get(lang)
}
