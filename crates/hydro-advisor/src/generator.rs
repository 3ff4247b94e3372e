use std::sync::Arc;
use std::time::Duration;

use hydro_models::{AdvisorConfig, AgronomistInsight, EToResult};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::backend::{AdvisoryBackend, GenerationRequest};
use crate::error::AdvisorError;
use crate::gemini::GeminiBackend;
use crate::outcome::AdvisoryOutcome;

/// Turns an ETo result into an insight. Never fails: every path, including
/// a missing backend, ends in a validated [`AgronomistInsight`].
///
/// One backend call per request, no retries.
pub struct AdvisoryGenerator {
    backend: Option<Arc<dyn AdvisoryBackend>>,
    timeout: Duration,
    credential_env: String,
}

impl AdvisoryGenerator {
    pub fn new(backend: Arc<dyn AdvisoryBackend>, timeout: Duration, credential_env: &str) -> Self {
        Self {
            backend: Some(backend),
            timeout,
            credential_env: credential_env.to_string(),
        }
    }

    /// Generator with no backend; every request ends in the no-credential state.
    pub fn unconfigured(credential_env: &str) -> Self {
        Self {
            backend: None,
            timeout: Duration::ZERO,
            credential_env: credential_env.to_string(),
        }
    }

    /// Build a Gemini-backed generator when `credential` is present and
    /// non-blank, otherwise an unconfigured one.
    pub fn from_credential(credential: Option<String>, config: &AdvisorConfig) -> Self {
        match credential.filter(|key| !key.trim().is_empty()) {
            Some(key) => Self::new(
                Arc::new(GeminiBackend::new(key, config)),
                Duration::from_secs(config.timeout_seconds),
                &config.api_key_env,
            ),
            None => {
                warn!(env = %config.api_key_env, "No advisory credential configured");
                Self::unconfigured(&config.api_key_env)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn generate_insight(&self, eto: &EToResult) -> AgronomistInsight {
        self.generate_insight_cancellable(eto, &CancellationToken::new())
            .await
    }

    /// Like [`generate_insight`](Self::generate_insight), but `cancel` aborts
    /// the in-flight call and yields the rule-based insight.
    pub async fn generate_insight_cancellable(
        &self,
        eto: &EToResult,
        cancel: &CancellationToken,
    ) -> AgronomistInsight {
        let outcome = self.run(eto, cancel).await;
        info!(date = %eto.date, eto = eto.eto_mm_per_day, outcome = outcome.kind(), "Advisory resolved");
        outcome.into_insight(eto.eto_mm_per_day)
    }

    async fn run(&self, eto: &EToResult, cancel: &CancellationToken) -> AdvisoryOutcome {
        let Some(backend) = &self.backend else {
            return AdvisoryOutcome::NoCredential(self.credential_env.clone());
        };

        let request = GenerationRequest::for_eto(eto);
        info!(request_id = %request.request_id, backend = backend.name(), "Requesting advisory");

        let call = tokio::time::timeout(self.timeout, backend.generate(&request));
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdvisorError::Cancelled),
            timed = call => timed
                .map_err(|_| AdvisorError::Timeout(self.timeout.as_millis() as u64))
                .and_then(|reply| reply),
        };

        if let Err(e) = &result {
            warn!(request_id = %request.request_id, error = %e, "Advisory backend did not answer");
        }
        AdvisoryOutcome::from_result(result)
    }
}
