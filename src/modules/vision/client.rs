use async_trait::async_trait;
use base64::prelude::*;
use serde::Deserialize;
use serde_json::json;

use crate::core::config::VisionConfig;
use crate::core::error::{AppError, Result};

/// Number of ranked labels kept on a photo record
pub const MAX_LABELS: usize = 10;

/// One descriptive label with its confidence score
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAnnotation {
    pub description: String,
    #[serde(default)]
    pub score: f32,
}

/// Label detection over raw image bytes.
///
/// The upload workflow holds this as an optional collaborator; when absent,
/// photos are stored without labels.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Returns the provider's label annotations. Order is not guaranteed.
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<LabelAnnotation>>;
}

/// `images:annotate` API response structures
#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    code: Option<i32>,
    message: Option<String>,
}

/// Client for the Google Cloud Vision REST API
pub struct GoogleVisionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: u32,
}

impl GoogleVisionClient {
    pub fn new(config: &VisionConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            max_results: config.max_results,
        })
    }

    async fn annotate(&self, image: &[u8]) -> Result<AnnotateImageResponse> {
        let url = format!("{}/v1/images:annotate?key={}", self.endpoint, self.api_key);

        let body = json!({
            "requests": [{
                "image": { "content": BASE64_STANDARD.encode(image) },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": self.max_results }]
            }]
        });

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::error!("Vision request failed: {:?}", e);
            AppError::ExternalService(format!("Vision request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Vision API returned status: {}",
                response.status()
            )));
        }

        let parsed: AnnotateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Vision response: {:?}", e);
            AppError::ExternalService(format!("Failed to parse Vision response: {}", e))
        })?;

        Ok(parsed.responses.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl LabelDetector for GoogleVisionClient {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<LabelAnnotation>> {
        let annotated = self.annotate(image).await?;

        if let Some(status) = annotated.error {
            return Err(AppError::ExternalService(format!(
                "Vision API error {}: {}",
                status.code.unwrap_or_default(),
                status.message.unwrap_or_default()
            )));
        }

        tracing::debug!("Vision returned {} labels", annotated.label_annotations.len());

        Ok(annotated.label_annotations)
    }
}

/// Rank annotations by descending score, keep at most [`MAX_LABELS`], and
/// join their descriptions with a single space.
pub fn join_top_labels(mut annotations: Vec<LabelAnnotation>) -> String {
    annotations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    annotations.truncate(MAX_LABELS);

    annotations
        .iter()
        .map(|a| a.description.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(description: &str, score: f32) -> LabelAnnotation {
        LabelAnnotation {
            description: description.to_string(),
            score,
        }
    }

    #[test]
    fn test_join_top_labels_orders_by_descending_score() {
        let labels = vec![
            annotation("water", 0.55),
            annotation("sky", 0.97),
            annotation("cloud", 0.81),
        ];
        assert_eq!(join_top_labels(labels), "sky cloud water");
    }

    #[test]
    fn test_join_top_labels_keeps_at_most_ten() {
        let labels: Vec<LabelAnnotation> = (0..15)
            .map(|i| annotation(&format!("label{}", i), 1.0 - i as f32 * 0.01))
            .collect();

        let joined = join_top_labels(labels);
        let tokens: Vec<&str> = joined.split(' ').collect();
        assert_eq!(tokens.len(), MAX_LABELS);
        assert_eq!(tokens[0], "label0");
        assert_eq!(tokens[9], "label9");
    }

    #[test]
    fn test_join_top_labels_empty() {
        assert_eq!(join_top_labels(Vec::new()), "");
    }

    #[test]
    fn test_annotate_response_deserializes() {
        let payload = r#"{
            "responses": [{
                "labelAnnotations": [
                    {"mid": "/m/01bqvp", "description": "Sky", "score": 0.9713, "topicality": 0.9713},
                    {"mid": "/m/0csby", "description": "Cloud", "score": 0.8132, "topicality": 0.8132}
                ]
            }]
        }"#;

        let parsed: AnnotateResponse = serde_json::from_str(payload).unwrap();
        let first = &parsed.responses[0];
        assert_eq!(first.label_annotations.len(), 2);
        assert_eq!(first.label_annotations[0].description, "Sky");
        assert!((first.label_annotations[0].score - 0.9713).abs() < 1e-6);
        assert!(first.error.is_none());
    }

    #[test]
    fn test_annotate_response_deserializes_provider_error() {
        let payload = r#"{
            "responses": [{
                "error": {"code": 3, "message": "Bad image data."}
            }]
        }"#;

        let parsed: AnnotateResponse = serde_json::from_str(payload).unwrap();
        let first = &parsed.responses[0];
        assert!(first.label_annotations.is_empty());
        let status = first.error.as_ref().unwrap();
        assert_eq!(status.code, Some(3));
        assert_eq!(status.message.as_deref(), Some("Bad image data."));
    }
}
