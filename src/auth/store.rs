//! Challenge Store
//!
//! Armazenamento em memória dos PKCE verifiers pendentes, indexados pelo
//! CSRF state. Cada entrada é consumida no máximo uma vez (`take`) ou
//! expira após o TTL - a expiração é verificada no acesso e um sweeper em
//! background remove entradas nunca consultadas.
//!
//! Limite conhecido: o estado é local ao processo. Um restart perde os
//! fluxos em andamento; para múltiplas instâncias seria necessário um
//! key-value store externo com TTL nativo.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::interval;

use crate::utils::logging::*;

/// TTL de um challenge não consumido (10 minutos)
const CHALLENGE_TTL_SECONDS: i64 = 600;

/// Intervalo do sweeper em background
const SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Verifier pendente aguardando o callback do provider
#[derive(Debug, Clone)]
struct PendingChallenge {
    verifier: String,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ChallengeStore {
    entries: Arc<RwLock<HashMap<String, PendingChallenge>>>,
    ttl: Duration,
}

impl ChallengeStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(CHALLENGE_TTL_SECONDS))
    }

    /// TTL customizado (usado nos testes de expiração)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Registrar um verifier sob o state informado
    ///
    /// Invariante: cada state mapeia para exatamente um verifier até ser
    /// consumido ou expirar.
    pub async fn put(&self, state: String, verifier: String) {
        let mut entries = self.entries.write().await;
        entries.insert(
            state,
            PendingChallenge {
                verifier,
                created_at: Utc::now(),
            },
        );
    }

    /// Remover e retornar o verifier associado ao state, se ainda válido
    ///
    /// Semântica take: a entrada deixa de existir na primeira chamada, o que
    /// impede replay do callback com um state reutilizado. Entradas além do
    /// TTL são tratadas como inexistentes (limite inclusivo: exatamente no
    /// deadline já conta como expirada).
    pub async fn take(&self, state: &str) -> Option<String> {
        let mut entries = self.entries.write().await;
        let entry = entries.remove(state)?;

        if Utc::now() - entry.created_at >= self.ttl {
            return None;
        }

        Some(entry.verifier)
    }

    /// Remover entradas expiradas; retorna quantas foram removidas
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now - entry.created_at < self.ttl);
        before - entries.len()
    }

    /// Quantidade de challenges pendentes (exposto no /status)
    pub async fn pending_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Iniciar o sweeper em background
    ///
    /// Garante que o mapa não cresce sem limite mesmo para states que o
    /// provider nunca devolve no callback.
    pub fn start_sweeper(&self) {
        let store = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(tokio::time::Duration::from_secs(SWEEP_INTERVAL_SECONDS));

            loop {
                ticker.tick().await;
                let removed = store.sweep_expired().await;
                log_challenge_expired(removed);
            }
        });
    }
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new()
    }
}
