//! Ollama-backed triage agents
//!
//! One adapter per role. All three share an [`OllamaClient`] and a
//! [`ModelResidency`]; `acquire`/`release` map onto model leases so the
//! server only holds the models a running phase needs.

use super::client::OllamaClient;
use super::error::OllamaError;
use super::protocol::GenerateRequest;
use super::residency::ModelResidency;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use std::sync::Arc;
use tracing::debug;
use visionlink_application::{
    FindingsProvider, NextQuestion, ProviderError, QuestionProvider, ReferralProvider,
};
use visionlink_domain::{ImageReference, NO_FURTHER_QUESTIONS, PromptTemplate, ReferralAssessment};

/// A model bound to one role
struct RoleModel {
    client: Arc<OllamaClient>,
    residency: Arc<ModelResidency>,
    model: String,
    label: String,
}

impl RoleModel {
    fn new(
        role: &str,
        client: Arc<OllamaClient>,
        residency: Arc<ModelResidency>,
        model: impl Into<String>,
    ) -> Self {
        let model = model.into();
        Self {
            label: format!("{} ({})", role, model),
            client,
            residency,
            model,
        }
    }

    async fn acquire(&self) -> Result<(), ProviderError> {
        Ok(self.residency.acquire(&self.model).await?)
    }

    async fn release(&self) {
        self.residency.release(&self.model).await;
    }

    /// Run one completion with the model's gate held; empty output is an error.
    async fn complete(&self, request: GenerateRequest) -> Result<String, OllamaError> {
        let request = request.with_options(self.client.options().clone());
        let gate = self.residency.gate(&self.model).await;
        let _guard = gate.lock().await;

        let response = self.client.generate(&request).await?;
        let text = response.response.trim();
        if text.is_empty() {
            return Err(OllamaError::EmptyResponse(self.model.clone()));
        }
        Ok(text.to_string())
    }
}

// ==================== Observer ====================

/// Vision model that describes the scan
pub struct OllamaObserver {
    inner: RoleModel,
}

impl OllamaObserver {
    pub fn new(
        client: Arc<OllamaClient>,
        residency: Arc<ModelResidency>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            inner: RoleModel::new("observer", client, residency, model),
        }
    }
}

#[async_trait]
impl FindingsProvider for OllamaObserver {
    fn name(&self) -> &str {
        &self.inner.label
    }

    async fn acquire(&self) -> Result<(), ProviderError> {
        self.inner.acquire().await
    }

    async fn analyze(&self, image: &ImageReference) -> Result<String, ProviderError> {
        let bytes = tokio::fs::read(image.as_path())
            .await
            .map_err(|source| OllamaError::ImageRead {
                path: image.as_path().to_path_buf(),
                source,
            })?;
        debug!(image = %image, bytes = bytes.len(), "Encoding scan for upload");

        let request = GenerateRequest::new(&self.inner.model, PromptTemplate::observer_instruction())
            .with_image(BASE64_STANDARD.encode(&bytes));
        Ok(self.inner.complete(request).await?)
    }

    async fn release(&self) {
        self.inner.release().await;
    }
}

// ==================== Investigator ====================

/// Text model that asks the patient follow-up questions
pub struct OllamaInvestigator {
    inner: RoleModel,
}

impl OllamaInvestigator {
    pub fn new(
        client: Arc<OllamaClient>,
        residency: Arc<ModelResidency>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            inner: RoleModel::new("investigator", client, residency, model),
        }
    }
}

#[async_trait]
impl QuestionProvider for OllamaInvestigator {
    fn name(&self) -> &str {
        &self.inner.label
    }

    async fn acquire(&self) -> Result<(), ProviderError> {
        self.inner.acquire().await
    }

    async fn ask(&self, findings: &str, history: &str) -> Result<NextQuestion, ProviderError> {
        let request = GenerateRequest::new(
            &self.inner.model,
            PromptTemplate::investigator_prompt(findings, history),
        )
        .with_system(PromptTemplate::investigator_system());
        let text = self.inner.complete(request).await?;
        Ok(parse_question(&text))
    }

    async fn release(&self) {
        self.inner.release().await;
    }
}

/// Pull the question out of a chatty completion.
///
/// Takes the first line containing `?`, else the first non-empty line, and
/// strips list markers, labels and surrounding quotes.
pub fn parse_question(text: &str) -> NextQuestion {
    if text.contains(NO_FURTHER_QUESTIONS) {
        return NextQuestion::Stop;
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let line = lines
        .iter()
        .find(|line| line.contains('?'))
        .or_else(|| lines.first())
        .copied()
        .unwrap_or_default();

    let line = line.trim_start_matches(['-', '*', '•', ' ']);
    let line = line.strip_prefix("Question:").unwrap_or(line);
    let line = line.trim_start_matches(['*', ' ']);
    let question = line.trim().trim_matches(['"', '\'', '“', '”']).trim();

    NextQuestion::Ask(question.to_string())
}

// ==================== Diagnostician ====================

/// Text model that writes the referral
pub struct OllamaDiagnostician {
    inner: RoleModel,
}

impl OllamaDiagnostician {
    pub fn new(
        client: Arc<OllamaClient>,
        residency: Arc<ModelResidency>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            inner: RoleModel::new("diagnostician", client, residency, model),
        }
    }
}

#[async_trait]
impl ReferralProvider for OllamaDiagnostician {
    fn name(&self) -> &str {
        &self.inner.label
    }

    async fn acquire(&self) -> Result<(), ProviderError> {
        self.inner.acquire().await
    }

    async fn evaluate(
        &self,
        findings: &str,
        history: &str,
    ) -> Result<ReferralAssessment, ProviderError> {
        let request = GenerateRequest::new(
            &self.inner.model,
            PromptTemplate::diagnostician_prompt(findings, history),
        )
        .with_system(PromptTemplate::diagnostician_system());
        let text = self.inner.complete(request).await?;
        Ok(ReferralAssessment::from_model_output(text))
    }

    async fn release(&self) {
        self.inner.release().await;
    }
}
