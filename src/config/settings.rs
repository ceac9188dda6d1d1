use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub tiktok: TikTokSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Endpoints da TikTok Open API
///
/// Mantidos em configuração (e não hardcoded nos clients) para que os
/// testes possam apontar para um servidor stub.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TikTokSettings {
    pub authorize_url: String,
    pub token_url: String,
    pub user_info_url: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default(
                "tiktok.authorize_url",
                "https://www.tiktok.com/v2/auth/authorize",
            )?
            .set_default("tiktok.token_url", "https://open.tiktokapis.com/v2/oauth/token/")?
            .set_default(
                "tiktok.user_info_url",
                "https://open.tiktokapis.com/v2/user/info/",
            )?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // No Cloud Run / Heroku-style, PORT vem do ambiente
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder = builder.add_source(Environment::with_prefix("TIKTOK_OAUTH").separator("__"));

        let s = builder.build()?;

        s.try_deserialize()
    }
}
