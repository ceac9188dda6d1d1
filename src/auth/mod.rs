//! # TikTok OAuth 2.0 + PKCE Module
//!
//! Módulo isolado para o handshake de autorização com o TikTok.
//!
//! ## Responsabilidades:
//! - Gerar par PKCE (verifier/challenge) e CSRF state
//! - Montar a URL de autorização
//! - Guardar verifiers pendentes com TTL (consumo at-most-once)
//! - Trocar authorization code por access token
//! - Consultar o perfil do usuário (passthrough)
//!
//! ## Estrutura:
//! - `config.rs`: credenciais, endpoints e scopes
//! - `pkce.rs`: geração do par verifier/challenge
//! - `store.rs`: ChallengeStore (put/take/expire)
//! - `client.rs`: cliente HTTP para a TikTok API
//! - `handlers.rs`: handlers HTTP + máquina de estados do callback
//! - `views.rs`: renderização das páginas de resultado

pub mod client;
pub mod config;
pub mod handlers;
pub mod pkce;
pub mod store;
pub mod views;

pub use client::{OAuthClient, TokenResponse};
pub use config::{scope_param, OAuthConfig, SCOPES};
pub use handlers::{get_auth_url, handle_callback, AuthUrlResponse, CallbackOutcome};
pub use pkce::{generate_pkce, generate_state, PkcePair};
pub use store::ChallengeStore;
