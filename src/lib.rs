//! leadflow: lead intake for a bilingual garment-manufacturing website.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
pub mod intake;
pub mod leads;
pub mod llm;
pub mod locale;
pub mod store;
