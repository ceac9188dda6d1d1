/// Servidor de demonstração do fluxo OAuth 2.0 + PKCE com o TikTok
///
/// Fluxo:
/// - GET /auth/url gera state + PKCE e devolve a URL de autorização
/// - O browser é redirecionado para o TikTok
/// - GET /callback valida o state, troca o code por tokens e exibe o resultado
/// - POST /api/user-info consulta o perfil com um access token (teste manual)
///
/// Verifiers pendentes vivem em memória com TTL de 10 minutos - um restart
/// perde os fluxos em andamento (limite aceito para demo de processo único).
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tiktok_oauth_server::{auth, config, handlers, utils, AppState};

use auth::{get_auth_url, handle_callback, ChallengeStore, OAuthClient, OAuthConfig};
use config::Settings;
use handlers::{health_check, status_check, user_info};
use utils::{logging::*, AppError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Carregar variáveis de ambiente do arquivo .env (se existir)
    if dotenvy::dotenv().is_err() {
        // Em produção não existe .env - variáveis vêm do ambiente
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Inicializar tracing
    tracing_subscriber::fmt::init();

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let port = settings.server.port;

    // Credenciais OAuth são obrigatórias - sem elas o fluxo inteiro é inútil
    let oauth_config = OAuthConfig::from_env(&settings.tiktok, port)
        .map_err(AppError::ConfigError)?;

    log_info(&format!(
        "🔑 OAuth configurado - client_key: {}, redirect_uri: {}",
        oauth_config.client_key, oauth_config.redirect_uri
    ));

    // Challenge store com sweeper em background
    let challenges = ChallengeStore::new();
    challenges.start_sweeper();

    let app_state = Arc::new(AppState {
        tiktok: OAuthClient::new(oauth_config.clone()),
        oauth: oauth_config,
        challenges,
        settings: settings.clone(),
    });

    let app = Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route("/status", get(status_check))
        // Fluxo OAuth
        .route("/auth/url", get(get_auth_url))
        .route("/callback", get(handle_callback))
        // Consulta de perfil para teste manual do token
        .route("/api/user-info", post(user_info))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port)).await?;

    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
