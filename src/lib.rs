// Biblioteca do servidor de demonstração TikTok OAuth
// Expõe módulos para uso em testes e no binário

pub mod auth;
pub mod config;
pub mod handlers;
pub mod utils;

/// Estado compartilhado da aplicação
///
/// O `ChallengeStore` é o único estado mutável compartilhado; os demais
/// campos são configuração imutável e o cliente HTTP reutilizável.
pub struct AppState {
    pub settings: config::Settings,
    pub oauth: auth::OAuthConfig,
    pub challenges: auth::ChallengeStore,
    pub tiktok: auth::OAuthClient,
}
