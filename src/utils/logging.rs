use tracing::{debug, error, info, warn};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_challenge_issued(state: &str) {
    info!("🔐 PKCE challenge issued - state: {}", state);
}

pub fn log_challenge_consumed(state: &str) {
    info!("🔓 PKCE challenge consumed - state: {}", state);
}

pub fn log_challenge_expired(count: usize) {
    if count > 0 {
        info!("🧹 Expired challenges removed: {}", count);
    }
}

pub fn log_token_exchange_error(status: Option<u16>, error: &str) {
    error!("Token exchange error - Status: {:?} - Error: {}", status, error);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 TikTok OAuth server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_status_check() {
    debug!("Status check requested");
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
