use std::sync::Arc;

use anyhow::Context;

use leadflow::api::{AppState, app_routes};
use leadflow::chat::ChatService;
use leadflow::config::{AdminConfig, ServerConfig};
use leadflow::leads::{LeadNotifier, LeadSink, NotifyConfig};
use leadflow::llm::{LlmConfig, create_provider};
use leadflow::store::{Database, LibSqlBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    let admin = AdminConfig::from_env();
    let llm_config = LlmConfig::from_env()?;

    eprintln!("🧵 leadflow v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api", config.port);
    eprintln!("   Dial code: {}", config.dial_code);

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?,
    );
    let stored = db.count_leads().await?;
    eprintln!(
        "   Database: {} ({stored} leads)",
        config.db_path.display()
    );

    // ── Lead sink ────────────────────────────────────────────────────────
    let mut sink = LeadSink::new(Arc::clone(&db));
    match NotifyConfig::from_env() {
        Some(notify) => {
            eprintln!("   Notifications: {}", notify.to_address);
            sink = sink.with_notifier(Arc::new(LeadNotifier::new(notify)));
        }
        None => eprintln!("   Notifications: disabled"),
    }

    // ── Chat ─────────────────────────────────────────────────────────────
    let llm = match &llm_config {
        Some(cfg) => {
            eprintln!("   Chat model: {}", cfg.model);
            Some(create_provider(cfg))
        }
        None => {
            eprintln!("   Chat: disabled (LEADFLOW_LLM_API_KEY not set)");
            None
        }
    };
    let mut chat = ChatService::new(llm, sink.clone(), &config.dial_code);
    if let Some(prompt) = &config.system_prompt {
        chat = chat.with_system_prompt(prompt.clone());
    }

    eprintln!(
        "   Admin API: {}\n",
        if admin.token.is_some() { "token required" } else { "open" }
    );

    let app = app_routes(AppState {
        sink,
        chat: Arc::new(chat),
        admin,
        dial_code: config.dial_code.clone(),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
