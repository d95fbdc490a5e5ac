//! REST endpoints the website calls.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chat::ChatService;
use crate::chat::prompts::apology;
use crate::config::AdminConfig;
use crate::error::{ChatError, LlmError};
use crate::intake::{COUNTRIES, GuidedSubmission, guided_questions, replay};
use crate::leads::{LeadInput, LeadRecord, LeadSink};
use crate::llm::ChatMessage;
use crate::locale::Lang;

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 200;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub sink: LeadSink,
    pub chat: Arc<ChatService>,
    pub admin: AdminConfig,
    /// Default calling code for replayed intake forms.
    pub dial_code: String,
}

/// Build the Axum router with every public and admin route.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/leads", post(create_lead).get(list_leads))
        .route("/api/leads/{id}", get(get_lead))
        .route("/api/intake", post(submit_intake))
        .route("/api/intake/questions", get(intake_questions))
        .route("/api/intake/countries", get(intake_countries))
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (status, Json(json!({"error": message.to_string()}))).into_response()
}

fn success() -> Response {
    Json(json!({"success": true})).into_response()
}

#[derive(Debug, Deserialize)]
struct LangQuery {
    #[serde(default)]
    lang: Option<String>,
}

impl LangQuery {
    /// Unknown or missing languages fall back to English.
    fn lang(&self) -> Lang {
        self.lang
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or_default()
    }
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "leadflow",
        "chat": state.chat.is_enabled(),
    }))
}

// ── Leads ───────────────────────────────────────────────────────────────

/// POST /api/leads
///
/// Always reports success; storage failures are only logged.
async fn create_lead(State(state): State<AppState>, Json(input): Json<LeadInput>) -> Response {
    let lead = LeadRecord::from_input(input);
    state.sink.submit(lead).await;
    success()
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct LeadList {
    leads: Vec<LeadRecord>,
    total: u64,
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if state.admin.authorize(header) {
        Ok(())
    } else {
        warn!("Rejected admin request without a valid token");
        Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// GET /api/leads?limit=N
///
/// Newest first.
async fn list_leads(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let db = state.sink.database();
    let leads = match db.list_leads(limit).await {
        Ok(leads) => leads,
        Err(e) => {
            error!(error = %e, "Failed to list leads");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load leads");
        }
    };
    let total = match db.count_leads().await {
        Ok(total) => total,
        Err(e) => {
            error!(error = %e, "Failed to count leads");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load leads");
        }
    };
    Json(LeadList { leads, total }).into_response()
}

/// GET /api/leads/{id}
async fn get_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let Ok(lead_id) = Uuid::parse_str(&id) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid lead ID");
    };

    match state.sink.database().get_lead(lead_id).await {
        Ok(Some(lead)) => Json(lead).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Lead not found"),
        Err(e) => {
            error!(lead_id = %lead_id, error = %e, "Failed to load lead");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load lead")
        }
    }
}

// ── Guided intake ───────────────────────────────────────────────────────

/// POST /api/intake
///
/// Replays a completed form through the guided flow. Validation failures
/// are the only errors the visitor sees.
async fn submit_intake(
    State(state): State<AppState>,
    Json(submission): Json<GuidedSubmission>,
) -> Response {
    match replay(&submission, &state.dial_code) {
        Ok(lead) => {
            info!(lead_id = %lead.id, lang = %submission.lang, "Guided form completed");
            state.sink.submit(lead).await;
            success()
        }
        Err(e) => {
            info!(error = %e, "Guided form rejected");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e)
        }
    }
}

/// GET /api/intake/questions?lang=ar
async fn intake_questions(Query(query): Query<LangQuery>) -> impl IntoResponse {
    let lang = query.lang();
    let questions: Vec<_> = guided_questions()
        .iter()
        .map(|q| q.localized(lang))
        .collect();
    Json(questions)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CountryEntry {
    name: &'static str,
    name_en: &'static str,
    dial_code: &'static str,
}

/// GET /api/intake/countries?lang=ar
async fn intake_countries(Query(query): Query<LangQuery>) -> impl IntoResponse {
    let lang = query.lang();
    let countries: Vec<_> = COUNTRIES
        .iter()
        .map(|c| CountryEntry {
            name: c.name(lang),
            name_en: c.name_en,
            dial_code: c.dial_code,
        })
        .collect();
    Json(countries)
}

// ── Chat ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatBody {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

/// POST /api/chat
async fn chat(State(state): State<AppState>, Json(body): Json<ChatBody>) -> Response {
    match state.chat.respond(&body.messages).await {
        Ok(reply) => Json(json!({"message": reply.message})).into_response(),
        Err(e @ (ChatError::EmptyConversation | ChatError::NoUserMessage)) => {
            error_response(StatusCode::BAD_REQUEST, e)
        }
        Err(ChatError::Llm { lang, source }) => {
            let status = match source {
                LlmError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(json!({
                    "error": source.to_string(),
                    "message": apology(lang),
                })),
            )
                .into_response()
        }
    }
}
