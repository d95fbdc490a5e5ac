//! Best-effort lead delivery.
//!
//! The visitor always sees success. Storage failures are logged and the lead
//! is dropped; nothing is retried and nothing is deduplicated.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::store::Database;

use super::model::LeadRecord;
use super::notify::LeadNotifier;

/// What happened to a submitted lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Stored,
    Failed,
}

/// Hands normalized leads to the row store and, optionally, the sales inbox.
#[derive(Clone)]
pub struct LeadSink {
    db: Arc<dyn Database>,
    notifier: Option<Arc<LeadNotifier>>,
}

impl LeadSink {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db, notifier: None }
    }

    pub fn with_notifier(mut self, notifier: Arc<LeadNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn database(&self) -> &Arc<dyn Database> {
        &self.db
    }

    /// Insert the lead once. On success, fire the notification email in the
    /// background.
    pub async fn submit(&self, lead: LeadRecord) -> Delivery {
        if let Err(e) = self.db.insert_lead(&lead).await {
            error!(lead_id = %lead.id, source = %lead.source, error = %e, "Failed to store lead");
            return Delivery::Failed;
        }
        info!(
            lead_id = %lead.id,
            source = %lead.source,
            contact_method = %lead.contact_method,
            "Lead stored"
        );

        if let Some(notifier) = &self.notifier {
            let notifier = Arc::clone(notifier);
            tokio::spawn(async move {
                if let Err(e) = notifier.notify(&lead).await {
                    warn!(lead_id = %lead.id, error = %e, "Lead notification failed");
                }
            });
        }
        Delivery::Stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::error::DatabaseError;
    use crate::leads::LeadInput;
    use crate::store::LibSqlBackend;

    struct BrokenDb;

    #[async_trait]
    impl Database for BrokenDb {
        async fn init_schema(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
        async fn insert_lead(&self, _lead: &LeadRecord) -> Result<(), DatabaseError> {
            Err(DatabaseError::Query("disk full".into()))
        }
        async fn get_lead(&self, _id: Uuid) -> Result<Option<LeadRecord>, DatabaseError> {
            Ok(None)
        }
        async fn list_leads(&self, _limit: usize) -> Result<Vec<LeadRecord>, DatabaseError> {
            Ok(Vec::new())
        }
        async fn count_leads(&self) -> Result<u64, DatabaseError> {
            Ok(0)
        }
    }

    fn lead() -> LeadRecord {
        LeadRecord::from_input(LeadInput {
            email: Some("buyer@example.com".into()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn stores_lead() {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let sink = LeadSink::new(Arc::clone(&db));
        let record = lead();
        let id = record.id;

        assert_eq!(sink.submit(record).await, Delivery::Stored);
        assert!(db.get_lead(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failure_is_reported_not_raised() {
        let sink = LeadSink::new(Arc::new(BrokenDb));
        assert_eq!(sink.submit(lead()).await, Delivery::Failed);
    }

    #[tokio::test]
    async fn same_content_twice_gives_two_rows() {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let sink = LeadSink::new(Arc::clone(&db));
        sink.submit(lead()).await;
        sink.submit(lead()).await;
        assert_eq!(db.count_leads().await.unwrap(), 2);
    }
}
