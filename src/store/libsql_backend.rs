//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::intake::ContactMethod;
use crate::leads::{LeadAnswer, LeadRecord, LeadSource, LeadStatus};
use crate::store::migrations;
use crate::store::traits::Database;

const LEAD_COLUMNS: &str = "id, source, name, email, phone, whatsapp, contact_method, \
    garment_type, quantity, services, timeline, location, consultation, answers, status, created_at";

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

/// Fixed-width timestamp so `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Convert `Option<&str>` to a libsql Value.
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

fn row_to_lead(row: &libsql::Row) -> Result<LeadRecord, DatabaseError> {
    let get_str = |idx: i32| -> Result<String, DatabaseError> {
        row.get::<String>(idx)
            .map_err(|e| DatabaseError::Query(format!("lead column {idx}: {e}")))
    };
    let get_opt = |idx: i32| -> Option<String> { row.get::<String>(idx).ok() };

    let id_str = get_str(0)?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DatabaseError::Serialization(format!("lead id {id_str}: {e}")))?;
    let source: LeadSource = get_str(1)?
        .parse()
        .map_err(DatabaseError::Serialization)?;
    let contact_method: ContactMethod = get_str(6)?
        .parse()
        .map_err(DatabaseError::Serialization)?;
    let answers: Vec<LeadAnswer> = serde_json::from_str(&get_str(13)?)
        .map_err(|e| DatabaseError::Serialization(format!("lead answers: {e}")))?;
    let status = get_str(14)?;
    if status != LeadStatus::New.as_str() {
        warn!(lead_id = %id, status = %status, "Unknown lead status, reading as new");
    }

    Ok(LeadRecord {
        id,
        source,
        name: get_opt(2),
        email: get_opt(3),
        phone: get_opt(4),
        whatsapp: get_opt(5),
        contact_method,
        garment_type: get_opt(7),
        quantity: get_opt(8),
        services: get_opt(9),
        timeline: get_opt(10),
        location: get_opt(11),
        consultation: get_opt(12),
        answers,
        status: LeadStatus::New,
        created_at: parse_datetime(&get_str(15)?),
    })
}

// ── Database trait implementation ───────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn insert_lead(&self, lead: &LeadRecord) -> Result<(), DatabaseError> {
        let answers = serde_json::to_string(&lead.answers)
            .map_err(|e| DatabaseError::Serialization(format!("lead answers: {e}")))?;

        self.conn()
            .execute(
                &format!(
                    "INSERT INTO leads ({LEAD_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ),
                params![
                    lead.id.to_string(),
                    lead.source.to_string(),
                    opt_text(lead.name.as_deref()),
                    opt_text(lead.email.as_deref()),
                    opt_text(lead.phone.as_deref()),
                    opt_text(lead.whatsapp.as_deref()),
                    lead.contact_method.as_str(),
                    opt_text(lead.garment_type.as_deref()),
                    opt_text(lead.quantity.as_deref()),
                    opt_text(lead.services.as_deref()),
                    opt_text(lead.timeline.as_deref()),
                    opt_text(lead.location.as_deref()),
                    opt_text(lead.consultation.as_deref()),
                    answers,
                    lead.status.as_str(),
                    format_datetime(&lead.created_at),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_lead: {e}")))?;

        debug!(lead_id = %lead.id, source = %lead.source, "Lead inserted");
        Ok(())
    }

    async fn get_lead(&self, id: Uuid) -> Result<Option<LeadRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_lead: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_lead(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_lead: {e}"))),
        }
    }

    async fn list_leads(&self, limit: usize) -> Result<Vec<LeadRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC, rowid DESC LIMIT ?1"
                ),
                params![limit as i64],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_leads: {e}")))?;

        let mut leads = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_leads: {e}")))?
        {
            leads.push(row_to_lead(&row)?);
        }
        Ok(leads)
    }

    async fn count_leads(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT COUNT(*) FROM leads", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("count_leads: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("count_leads: {e}")))?;
        match row {
            Some(row) => {
                let count: i64 = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("count_leads: {e}")))?;
                Ok(count as u64)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn make_lead(name: &str) -> LeadRecord {
        LeadRecord::from_input(crate::leads::LeadInput {
            name: Some(name.to_string()),
            phone: Some("+201012345678".to_string()),
            garment_type: Some("hoodies".to_string()),
            answers: vec![LeadAnswer {
                question_id: Some("quantity".to_string()),
                question: "How many pieces?".to_string(),
                answer: "500-1000".to_string(),
            }],
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn insert_and_get_by_id() {
        let db = test_db().await;
        let lead = make_lead("Mona");
        db.insert_lead(&lead).await.unwrap();

        let fetched = db.get_lead(lead.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, lead.id);
        assert_eq!(fetched.name.as_deref(), Some("Mona"));
        assert_eq!(fetched.phone.as_deref(), Some("+201012345678"));
        assert_eq!(fetched.email, None);
        assert_eq!(fetched.source, LeadSource::Api);
        assert_eq!(fetched.contact_method, lead.contact_method);
        assert_eq!(fetched.answers, lead.answers);
        assert_eq!(
            fetched.created_at.timestamp_micros(),
            lead.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn get_by_id_not_found() {
        let db = test_db().await;
        assert!(db.get_lead(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let db = test_db().await;
        let now = Utc::now();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let mut lead = make_lead(name);
            lead.created_at = now + Duration::seconds(i as i64);
            db.insert_lead(&lead).await.unwrap();
        }

        let all = db.list_leads(10).await.unwrap();
        let names: Vec<_> = all.iter().filter_map(|l| l.name.as_deref()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);

        let limited = db.list_leads(2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(db.count_leads().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let db = test_db().await;
        let lead = make_lead("dup");
        db.insert_lead(&lead).await.unwrap();
        assert!(db.insert_lead(&lead).await.is_err());
        assert_eq!(db.count_leads().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn file_backed_db_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("leads.db");
        let lead = make_lead("Persisted");

        {
            let db = LibSqlBackend::new_local(&path).await.unwrap();
            db.insert_lead(&lead).await.unwrap();
        }

        let db = LibSqlBackend::new_local(&path).await.unwrap();
        let fetched = db.get_lead(lead.id).await.unwrap().unwrap();
        assert_eq!(fetched.name.as_deref(), Some("Persisted"));
    }
}
