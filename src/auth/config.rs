//! OAuth Configuration
//!
//! Centraliza as credenciais e endpoints necessários para o fluxo OAuth2 do TikTok

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::TikTokSettings;

/// Scopes solicitados na autorização (conjunto fixo, sem negociação em runtime)
pub const SCOPES: &[&str] = &[
    "user.info.basic",
    "user.info.username",
    "user.info.stats",
    "user.info.profile",
    "user.account.type",
    "user.insights",
    "video.list",
    "video.insights",
    "comment.list",
    "comment.list.manage",
    "video.publish",
    "video.upload",
    "biz.spark.auth",
    "discovery.search.words",
    "message.list.read",
    "message.list.send",
    "message.list.manage",
];

static SCOPE_PARAM: Lazy<String> = Lazy::new(|| SCOPES.join(","));

/// Lista de scopes no formato esperado pela TikTok API (separados por vírgula)
pub fn scope_param() -> &'static str {
    &SCOPE_PARAM
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Client Key fornecido pelo TikTok Developer Dashboard
    pub client_key: String,

    /// Client Secret fornecido pelo TikTok Developer Dashboard
    pub client_secret: String,

    /// URL de callback registrada no TikTok App
    pub redirect_uri: String,

    /// Endpoint de autorização (redirect do browser)
    pub authorize_url: String,

    /// Endpoint de troca de token (POST form-encoded)
    pub token_url: String,

    /// Endpoint de perfil do usuário (GET com Bearer token)
    pub user_info_url: String,
}

impl OAuthConfig {
    /// Criar configuração a partir de variáveis de ambiente
    ///
    /// `TIKTOK_CLIENT_KEY` e `TIKTOK_CLIENT_SECRET` são obrigatórias.
    /// `REDIRECT_URI` tem default derivado da porta do servidor.
    pub fn from_env(tiktok: &TikTokSettings, port: u16) -> Result<Self, String> {
        let client_key = std::env::var("TIKTOK_CLIENT_KEY")
            .map_err(|_| "TIKTOK_CLIENT_KEY não configurado".to_string())?;

        let client_secret = std::env::var("TIKTOK_CLIENT_SECRET")
            .map_err(|_| "TIKTOK_CLIENT_SECRET não configurado".to_string())?;

        let redirect_uri = std::env::var("REDIRECT_URI")
            .unwrap_or_else(|_| format!("http://localhost:{}/callback", port));

        Ok(Self {
            client_key,
            client_secret,
            redirect_uri,
            authorize_url: tiktok.authorize_url.clone(),
            token_url: tiktok.token_url.clone(),
            user_info_url: tiktok.user_info_url.clone(),
        })
    }

    /// Gerar URL de autorização do TikTok com PKCE challenge e CSRF state
    pub fn authorization_url(&self, state: &str, code_challenge: &str) -> String {
        format!(
            "{}?client_key={}&scope={}&response_type=code&redirect_uri={}&state={}&code_challenge={}&code_challenge_method=S256",
            self.authorize_url,
            self.client_key,
            urlencoding::encode(scope_param()),
            urlencoding::encode(&self.redirect_uri),
            state,
            code_challenge,
        )
    }
}
