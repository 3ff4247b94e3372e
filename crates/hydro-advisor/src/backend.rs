use async_trait::async_trait;
use hydro_models::EToResult;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AdvisorError;
use crate::prompts::{build_prompt, system_instruction};

/// One generation call, backend-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub request_id: Uuid,
    pub system_instruction: String,
    pub prompt: String,
    /// Structured-output constraint the backend must honour.
    pub response_schema: serde_json::Value,
}

impl GenerationRequest {
    pub fn for_eto(eto: &EToResult) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            system_instruction: system_instruction(),
            prompt: build_prompt(eto),
            response_schema: hydro_models::schema::response_schema(),
        }
    }
}

/// A generative text backend. Mockable for testing.
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Return the raw text of the first candidate.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AdvisorError>;
}
