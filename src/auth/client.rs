//! OAuth HTTP Client
//!
//! Cliente HTTP isolado para comunicação com a TikTok Open API
//! (troca de authorization code por token e consulta de perfil)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::OAuthConfig;
use crate::utils::logging::*;
use crate::utils::{truncate_safe, AppError, AppResult};

/// Timeout das chamadas de saída (troca de token e perfil)
const UPSTREAM_TIMEOUT_SECONDS: u64 = 15;

/// Campos de perfil solicitados no user info (seleção fixa)
const USER_INFO_FIELDS: &str = "open_id,union_id,avatar_url,display_name,bio_description,\
profile_deep_link,is_verified,follower_count,following_count,likes_count,video_count";

/// Resposta do endpoint de troca de token
///
/// Apenas `access_token` é obrigatório; o TikTok pode omitir os demais
/// campos dependendo dos scopes concedidos. O `scope` retornado é aceito
/// como autoritativo mesmo quando mais restrito que o solicitado.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub open_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Cliente OAuth para TikTok
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: Client,
}

impl OAuthClient {
    /// Criar novo cliente OAuth com timeout de rede fixo
    ///
    /// Falha na construção do cliente é fatal (startup-time).
    pub fn new(config: OAuthConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECONDS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Trocar authorization code por access token (com code_verifier PKCE)
    ///
    /// Corpo form-encoded, conforme o contrato do endpoint de token.
    /// Erros de transporte, status não-2xx e payload malformado são todos
    /// retornados ao caller - o code é single-use, não há retry.
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> AppResult<TokenResponse> {
        log_info(&format!(
            "🔐 [OAuth] Trocando authorization code por access token - code: {}...",
            truncate_safe(code, 10)
        ));

        let params = [
            ("client_key", self.config.client_key.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log_token_exchange_error(Some(status.as_u16()), &error_text);
            return Err(AppError::TikTokApi(error_text));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            log_token_exchange_error(Some(status.as_u16()), &e.to_string());
            AppError::TikTokApi(format!("Falha ao parsear resposta do token: {}", e))
        })?;

        log_info(&format!(
            "✅ [OAuth] Access token obtido: {}...",
            truncate_safe(&token_response.access_token, 20)
        ));

        Ok(token_response)
    }

    /// Consultar o perfil do usuário com um access token
    ///
    /// Passthrough puro: retorna o corpo JSON do provider sem transformação.
    pub async fn fetch_user_info(&self, access_token: &str) -> AppResult<serde_json::Value> {
        log_info("🔍 [OAuth] Consultando perfil do usuário...");

        let response = self
            .http_client
            .get(&self.config.user_info_url)
            .header("Authorization", format!("Bearer {}", access_token))
            .query(&[("fields", USER_INFO_FIELDS)])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log_error(&format!(
                "❌ [OAuth] User info falhou: {} - {}",
                status, error_text
            ));
            return Err(AppError::TikTokApi(error_text));
        }

        let profile: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::TikTokApi(format!("Falha ao parsear perfil: {}", e)))?;

        Ok(profile)
    }
}
