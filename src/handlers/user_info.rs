//! User-Info Relay
//!
//! POST /api/user-info: repassa a consulta de perfil do TikTok usando o
//! access token informado no corpo. Sem cache e sem retry - uma chamada
//! best-effort para teste manual do token. O corpo de erro do provider é
//! devolvido verbatim em `details` para facilitar debug.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::utils::logging::*;
use crate::utils::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserInfoRequest {
    #[serde(default)]
    pub access_token: Option<String>,
}

pub async fn user_info(
    State(app): State<Arc<AppState>>,
    Json(body): Json<UserInfoRequest>,
) -> Response {
    log_request_received("/api/user-info", "POST");

    let access_token = match body.access_token.filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Access token is required" })),
            )
                .into_response();
        }
    };

    match app.tiktok.fetch_user_info(&access_token).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => {
            log_error(&format!("❌ [OAuth] Falha ao buscar user info: {}", e));

            // Preservar o corpo do provider como JSON quando possível
            let details = match e {
                AppError::TikTokApi(body) => serde_json::from_str(&body)
                    .unwrap_or_else(|_| serde_json::Value::String(body)),
                other => serde_json::Value::String(other.to_string()),
            };

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to fetch user info",
                    "details": details
                })),
            )
                .into_response()
        }
    }
}
