//! Passive lead extraction from chatbot conversations.
//!
//! Every user message is scanned for a phone number or email. When one
//! shows up, the whole transcript is mined for order details and a name so
//! the conversation can be filed as a lead without the visitor filling in
//! the form.

pub mod contact;
pub mod keywords;
pub mod transcript;

pub use contact::{ContactHit, extract_email, extract_phone, normalize_digits, scan_message};
pub use keywords::mentions_order;
pub use transcript::{ExtractedLead, extract_lead, is_order_related};
