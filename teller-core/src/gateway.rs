//! Boundary to the text-generation service.
//!
//! The gateway never fails from the caller's point of view: whatever goes
//! wrong with the model server is logged and replaced by a fixed apology.

use crate::config::{Config, DEFAULT_FALLBACK};
use crate::provider::{GenerateRequest, Provider};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct GenerationGateway {
    provider: Arc<dyn Provider>,
    model: String,
    fallback: String,
}

impl GenerationGateway {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }

    pub fn from_config(config: &Config, provider: Arc<dyn Provider>) -> Self {
        Self::new(provider, config.llm.model.clone()).with_fallback(config.fallback_message.clone())
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` to the model and returns its reply, or the fallback
    /// message if the request fails for any reason.
    pub async fn generate(&self, prompt: &str) -> String {
        let request = GenerateRequest::new(&self.model, prompt);
        debug!(model = %self.model, prompt_len = prompt.len(), "Requesting generation");

        match self.provider.generate(request).await {
            Ok(response) => response.response,
            Err(e) => {
                error!(model = %self.model, error = %e, "Generation failed");
                self.fallback.clone()
            }
        }
    }
}
