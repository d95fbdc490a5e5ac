//! Lead records and where they go.

pub mod model;
pub mod notify;
pub mod sink;

pub use model::{LeadAnswer, LeadInput, LeadRecord, LeadSource, LeadStatus};
pub use notify::{LeadNotifier, NotifyConfig};
pub use sink::{Delivery, LeadSink};
