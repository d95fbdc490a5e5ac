//! `Database` trait: the async persistence interface for captured leads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::leads::LeadRecord;

/// Backend-agnostic lead storage.
///
/// The table is append-only: leads are inserted once and never updated.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    /// Persist a new lead.
    async fn insert_lead(&self, lead: &LeadRecord) -> Result<(), DatabaseError>;

    /// Get a lead by ID.
    async fn get_lead(&self, id: Uuid) -> Result<Option<LeadRecord>, DatabaseError>;

    /// Most recent leads first, at most `limit`.
    async fn list_leads(&self, limit: usize) -> Result<Vec<LeadRecord>, DatabaseError>;

    /// Total number of stored leads.
    async fn count_leads(&self) -> Result<u64, DatabaseError>;
}
