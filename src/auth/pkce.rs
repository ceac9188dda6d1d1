//! PKCE (Proof Key for Code Exchange)
//!
//! Geração do par verifier/challenge conforme RFC 7636 (método S256)

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::utils::{AppError, AppResult};

/// Par verifier/challenge gerado para um fluxo de autorização
#[derive(Debug, Clone)]
pub struct PkcePair {
    /// String aleatória de alta entropia (43 chars base64url, 256 bits)
    pub verifier: String,
    /// SHA-256 do verifier (bytes ASCII), base64url sem padding
    pub challenge: String,
}

/// Gerar um novo par PKCE a partir do CSPRNG do sistema
///
/// Falha de entropia é fatal para a requisição - nunca há fallback
/// para aleatoriedade fraca.
pub fn generate_pkce() -> AppResult<PkcePair> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::EntropyError(format!("Secure random source unavailable: {}", e)))?;

    let verifier = URL_SAFE_NO_PAD.encode(bytes);
    let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

    Ok(PkcePair { verifier, challenge })
}

/// Gerar o CSRF state token (128 bits do mesmo CSPRNG)
pub fn generate_state() -> AppResult<String> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::EntropyError(format!("Secure random source unavailable: {}", e)))?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
