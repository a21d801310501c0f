//! Ollama REST API message types
//!
//! Only the non-streaming subset used here:
//! - `POST /api/generate` for completions, preloading and unloading
//! - `GET /api/tags` for health and model listing

use serde::{Deserialize, Serialize};

/// Request for `/api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Base64-encoded images for multimodal models
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
    /// `0` unloads the model once the request completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<i64>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            images: Vec::new(),
            stream: false,
            options: None,
            keep_alive: None,
        }
    }

    /// An empty request that loads the model and keeps it resident.
    pub fn preload(model: impl Into<String>) -> Self {
        Self::new(model, "")
    }

    /// An empty request that evicts the model from memory.
    pub fn unload(model: impl Into<String>) -> Self {
        Self {
            keep_alive: Some(0),
            ..Self::new(model, "")
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_image(mut self, encoded: String) -> Self {
        self.images.push(encoded);
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Generation options
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
}

/// Response from `/api/generate` (non-streaming)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub eval_count: u32,
    #[serde(default)]
    pub total_duration: u64,
}

/// Model info from `/api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

/// Response from `/api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unload_request_shape() {
        let value = serde_json::to_value(GenerateRequest::unload("llava:7b")).unwrap();
        assert_eq!(
            value,
            json!({ "model": "llava:7b", "prompt": "", "stream": false, "keep_alive": 0 })
        );
    }

    #[test]
    fn test_multimodal_request_carries_images() {
        let request = GenerateRequest::new("llava:7b", "describe the optic disc")
            .with_image("aGVsbG8=".to_string())
            .with_options(GenerateOptions {
                temperature: Some(0.2),
                num_predict: Some(256),
            });
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["images"], json!(["aGVsbG8="]));
        assert_eq!(value["options"]["num_predict"], 256);
        assert!(value.get("system").is_none());
        assert!(value.get("keep_alive").is_none());
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"model":"gemma2:2b","response":"How long?","done":true}"#)
                .unwrap();
        assert_eq!(response.response, "How long?");
        assert_eq!(response.eval_count, 0);
    }

    #[test]
    fn test_tags_response() {
        let tags: TagsResponse = serde_json::from_str(
            r#"{"models":[{"name":"llava:7b","size":4700000000},{"name":"gemma2:2b"}]}"#,
        )
        .unwrap();
        let names: Vec<_> = tags.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["llava:7b", "gemma2:2b"]);
    }
}
