//! OAuth HTTP Handlers
//!
//! Endpoints HTTP para iniciar e completar o fluxo de autorização:
//! - `GET /auth/url`: gera state + PKCE e devolve a URL de autorização
//! - `GET /callback`: valida o state, troca o code por tokens e renderiza o resultado
//!
//! O callback é uma máquina de estados
//! (`AWAITING_CODE → VALIDATING_STATE → EXCHANGING_TOKEN → SUCCESS | FAILURE`)
//! que emite um resultado estruturado (`CallbackOutcome`); a formatação em
//! HTML fica em `views.rs`.

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{pkce, views, TokenResponse};
use crate::utils::logging::*;
use crate::utils::{truncate_safe, AppError};
use crate::AppState;

/// Resposta do GET /auth/url
#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    #[serde(rename = "authUrl")]
    pub auth_url: String,
    pub state: String,
}

/// Parâmetros do callback OAuth
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    /// Authorization code retornado pelo TikTok
    pub code: Option<String>,
    /// CSRF state emitido no /auth/url
    pub state: Option<String>,
    /// Erro retornado pelo TikTok (se o usuário negou a autorização)
    pub error: Option<String>,
}

/// Motivo de falha do handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Callback chegou sem authorization code
    MissingCode,
    /// State desconhecido, expirado ou já consumido
    ExpiredOrInvalidSession,
    /// Provider rejeitou a troca, erro de transporte ou payload malformado
    TokenExchangeFailed,
    /// Timeout na chamada ao endpoint de token
    UpstreamUnavailable,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MissingCode => {
                write!(f, "Não recebemos o authorization code do TikTok")
            }
            FailureReason::ExpiredOrInvalidSession => {
                write!(f, "Sessão expirada ou inválida. Por favor, tente novamente.")
            }
            FailureReason::TokenExchangeFailed => {
                write!(f, "Falha ao trocar o authorization code por access token")
            }
            FailureReason::UpstreamUnavailable => {
                write!(f, "TikTok API indisponível (timeout). Tente novamente mais tarde.")
            }
        }
    }
}

/// Falha terminal do callback, com o detalhe do provider quando disponível
#[derive(Debug)]
pub struct CallbackFailure {
    pub reason: FailureReason,
    pub detail: Option<String>,
}

/// Resultado estruturado do callback (estados terminais da máquina)
#[derive(Debug)]
pub enum CallbackOutcome {
    Success(TokenResponse),
    Failure(CallbackFailure),
}

impl CallbackOutcome {
    fn failure(reason: FailureReason, detail: Option<String>) -> Self {
        CallbackOutcome::Failure(CallbackFailure { reason, detail })
    }
}

/// GET /auth/url
///
/// Gera o par PKCE e o CSRF state, registra o verifier no store e devolve
/// a URL de autorização do TikTok.
pub async fn get_auth_url(
    State(app): State<Arc<AppState>>,
) -> Result<Json<AuthUrlResponse>, AppError> {
    log_request_received("/auth/url", "GET");

    let csrf_state = pkce::generate_state()?;
    let pair = pkce::generate_pkce()?;

    app.challenges
        .put(csrf_state.clone(), pair.verifier)
        .await;

    let auth_url = app.oauth.authorization_url(&csrf_state, &pair.challenge);

    log_challenge_issued(&csrf_state);

    Ok(Json(AuthUrlResponse {
        auth_url,
        state: csrf_state,
    }))
}

/// GET /callback
///
/// Recebe o redirect do TikTok e renderiza a página de resultado
/// (sucesso com os tokens, ou falha com o motivo e um link para recomeçar).
pub async fn handle_callback(
    State(app): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Html<String> {
    log_request_received("/callback", "GET");

    match run_callback(&app, params).await {
        CallbackOutcome::Success(tokens) => views::render_success_page(&tokens),
        CallbackOutcome::Failure(failure) => {
            log_warning(&format!(
                "⚠️  [OAuth] Callback falhou: {:?} - {}",
                failure.reason,
                failure.detail.as_deref().unwrap_or("sem detalhe")
            ));
            views::render_failure_page(&failure)
        }
    }
}

/// Máquina de estados do callback
///
/// Nenhuma falha dispara retry automático: o authorization code é
/// single-use e o verifier já foi consumido do store, então o usuário
/// precisa recomeçar o fluxo com um novo state.
pub async fn run_callback(app: &AppState, params: CallbackParams) -> CallbackOutcome {
    // AWAITING_CODE: sem code não há o que trocar
    let code = match params.code {
        Some(code) if !code.is_empty() => code,
        _ => return CallbackOutcome::failure(FailureReason::MissingCode, params.error),
    };

    // VALIDATING_STATE: take é atômico - consumir duas vezes é impossível
    let verifier = match params.state.as_deref() {
        Some(state) => match app.challenges.take(state).await {
            Some(verifier) => {
                log_challenge_consumed(state);
                verifier
            }
            None => {
                return CallbackOutcome::failure(FailureReason::ExpiredOrInvalidSession, None)
            }
        },
        None => return CallbackOutcome::failure(FailureReason::ExpiredOrInvalidSession, None),
    };

    log_info(&format!(
        "🔑 [OAuth] Code recebido: {}...",
        truncate_safe(&code, 10)
    ));

    // EXCHANGING_TOKEN
    match app.tiktok.exchange_code_for_token(&code, &verifier).await {
        Ok(tokens) => CallbackOutcome::Success(tokens),
        Err(AppError::HttpError(e)) if e.is_timeout() => CallbackOutcome::failure(
            FailureReason::UpstreamUnavailable,
            Some(e.to_string()),
        ),
        Err(e) => {
            let detail = match e {
                AppError::TikTokApi(body) => body,
                other => other.to_string(),
            };
            CallbackOutcome::failure(FailureReason::TokenExchangeFailed, Some(detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ChallengeStore, OAuthClient, OAuthConfig};
    use crate::config::{ServerSettings, Settings, TikTokSettings};
    use httpmock::prelude::*;

    fn test_state(base_url: &str) -> Arc<AppState> {
        let tiktok = TikTokSettings {
            authorize_url: format!("{}/v2/auth/authorize", base_url),
            token_url: format!("{}/v2/oauth/token/", base_url),
            user_info_url: format!("{}/v2/user/info/", base_url),
        };

        let oauth = OAuthConfig {
            client_key: "test_key".to_string(),
            client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost:3000/callback".to_string(),
            authorize_url: tiktok.authorize_url.clone(),
            token_url: tiktok.token_url.clone(),
            user_info_url: tiktok.user_info_url.clone(),
        };

        Arc::new(AppState {
            settings: Settings {
                server: ServerSettings {
                    host: "0.0.0.0".to_string(),
                    port: 3000,
                },
                tiktok,
            },
            tiktok: OAuthClient::new(oauth.clone()),
            oauth,
            challenges: ChallengeStore::new(),
        })
    }

    fn token_mock(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(POST).path("/v2/oauth/token/");
            then.status(200).json_body(serde_json::json!({
                "access_token": "tok1",
                "expires_in": 86400,
                "open_id": "u1",
                "scope": "user.info.basic",
                "token_type": "Bearer"
            }));
        })
    }

    #[tokio::test]
    async fn test_auth_url_registers_challenge() {
        let server = MockServer::start();
        let app = test_state(&server.base_url());

        let response = get_auth_url(State(app.clone())).await.unwrap().0;

        assert!(response.auth_url.contains(&format!("state={}", response.state)));
        assert!(response.auth_url.contains("code_challenge_method=S256"));
        assert_eq!(app.challenges.pending_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_code_skips_store() {
        let server = MockServer::start();
        let mock = token_mock(&server);
        let app = test_state(&server.base_url());

        let issued = get_auth_url(State(app.clone())).await.unwrap().0;

        let outcome = run_callback(
            &app,
            CallbackParams {
                code: None,
                state: Some(issued.state),
                error: None,
            },
        )
        .await;

        match outcome {
            CallbackOutcome::Failure(f) => assert_eq!(f.reason, FailureReason::MissingCode),
            other => panic!("expected failure, got: {:?}", other),
        }

        // Store intacto: o challenge continua disponível para um novo callback
        assert_eq!(app.challenges.pending_count().await, 1);
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_provider_error_carried_as_detail() {
        let server = MockServer::start();
        let app = test_state(&server.base_url());

        let outcome = run_callback(
            &app,
            CallbackParams {
                code: None,
                state: None,
                error: Some("access_denied".to_string()),
            },
        )
        .await;

        match outcome {
            CallbackOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::MissingCode);
                assert_eq!(f.detail.as_deref(), Some("access_denied"));
            }
            other => panic!("expected failure, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_state_never_reaches_token_endpoint() {
        let server = MockServer::start();
        let mock = token_mock(&server);
        let app = test_state(&server.base_url());

        let outcome = run_callback(
            &app,
            CallbackParams {
                code: Some("XYZ".to_string()),
                state: Some("never-issued".to_string()),
                error: None,
            },
        )
        .await;

        match outcome {
            CallbackOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::ExpiredOrInvalidSession)
            }
            other => panic!("expected failure, got: {:?}", other),
        }

        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_missing_state_is_invalid_session() {
        let server = MockServer::start();
        let app = test_state(&server.base_url());

        let outcome = run_callback(
            &app,
            CallbackParams {
                code: Some("XYZ".to_string()),
                state: None,
                error: None,
            },
        )
        .await;

        match outcome {
            CallbackOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::ExpiredOrInvalidSession)
            }
            other => panic!("expected failure, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_flow_and_replay() {
        let server = MockServer::start();
        let mock = token_mock(&server);
        let app = test_state(&server.base_url());

        // 1. Emitir URL de autorização
        let issued = get_auth_url(State(app.clone())).await.unwrap().0;

        // 2. Callback simulado do provider
        let page = handle_callback(
            State(app.clone()),
            Query(CallbackParams {
                code: Some("XYZ".to_string()),
                state: Some(issued.state.clone()),
                error: None,
            }),
        )
        .await;

        mock.assert_hits(1);
        assert!(page.0.contains("tok1"));
        assert!(page.0.contains("u1"));

        // 3. Replay do mesmo state: sessão inválida, sem nova troca
        let replay = run_callback(
            &app,
            CallbackParams {
                code: Some("XYZ".to_string()),
                state: Some(issued.state),
                error: None,
            },
        )
        .await;

        match replay {
            CallbackOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::ExpiredOrInvalidSession)
            }
            other => panic!("expected failure, got: {:?}", other),
        }

        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_token_endpoint_timeout_is_upstream_unavailable() {
        let server = MockServer::start();
        // Resposta atrasada além do timeout de 15s do cliente
        server.mock(|when, then| {
            when.method(POST).path("/v2/oauth/token/");
            then.status(200)
                .delay(std::time::Duration::from_secs(17))
                .json_body(serde_json::json!({"access_token": "tok1"}));
        });
        let app = test_state(&server.base_url());

        let issued = get_auth_url(State(app.clone())).await.unwrap().0;

        let outcome = run_callback(
            &app,
            CallbackParams {
                code: Some("XYZ".to_string()),
                state: Some(issued.state),
                error: None,
            },
        )
        .await;

        match outcome {
            CallbackOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::UpstreamUnavailable)
            }
            other => panic!("expected failure, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_token_payload_is_exchange_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v2/oauth/token/");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html>not a token payload</html>");
        });
        let app = test_state(&server.base_url());

        let issued = get_auth_url(State(app.clone())).await.unwrap().0;

        let outcome = run_callback(
            &app,
            CallbackParams {
                code: Some("XYZ".to_string()),
                state: Some(issued.state),
                error: None,
            },
        )
        .await;

        match outcome {
            CallbackOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::TokenExchangeFailed);
                assert!(f.detail.unwrap().contains("parsear"));
            }
            other => panic!("expected failure, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_rejection_is_exchange_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v2/oauth/token/");
            then.status(400)
                .json_body(serde_json::json!({"error": "invalid_grant"}));
        });
        let app = test_state(&server.base_url());

        let issued = get_auth_url(State(app.clone())).await.unwrap().0;

        let outcome = run_callback(
            &app,
            CallbackParams {
                code: Some("bad".to_string()),
                state: Some(issued.state),
                error: None,
            },
        )
        .await;

        match outcome {
            CallbackOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::TokenExchangeFailed);
                assert!(f.detail.unwrap().contains("invalid_grant"));
            }
            other => panic!("expected failure, got: {:?}", other),
        }
    }
}
