//! OpenAI-compatible HTTP transport.
//!
//! The one concrete [`Transport`] implementation. Constructed by a thin
//! adapter from configuration; the orchestration core only ever sees the
//! trait. Shape rejections (token/image ceilings) arrive as HTTP 4xx with
//! vendor-specific message text, so classification here is by vocabulary
//! in the error body.

use async_trait::async_trait;
use snapsolve_core::error::ProviderError;
use snapsolve_core::{ModelRequest, ModelResponse, Transport, Usage};
use tracing::{debug, warn};

/// An OpenAI-compatible chat-completions transport with multimodal
/// (image) support.
pub struct HttpTransport {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Convenience constructor for the OpenAI endpoint.
    pub fn openai(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    fn build_body(request: &ModelRequest) -> serde_json::Value {
        let mut parts = vec![serde_json::json!({
            "type": "text",
            "text": request.text,
        })];
        for image in &request.images {
            parts.push(serde_json::json!({
                "type": "image_url",
                "image_url": { "url": image.to_data_url() },
            }));
        }

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": parts }],
            "max_tokens": request.max_output_tokens,
            "temperature": request.temperature,
            "stream": false,
        });
        if let Some(top_p) = request.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }
        body
    }
}

/// Map a non-success HTTP status plus error body onto the provider error
/// taxonomy. Pure, so the vocabulary rules are unit-testable.
pub fn classify_http_error(status: u16, body: &str, request: &ModelRequest) -> ProviderError {
    if status == 429 {
        return ProviderError::RateLimited {
            retry_after_secs: 5,
        };
    }
    if status == 401 || status == 403 {
        return ProviderError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        );
    }

    let lower = body.to_lowercase();
    if lower.contains("token")
        && (lower.contains("limit") || lower.contains("exceed") || lower.contains("maximum"))
    {
        return ProviderError::TokenLimitExceeded {
            budget: request.max_output_tokens,
        };
    }
    if lower.contains("image") || lower.contains("media") {
        return ProviderError::ImageLimitExceeded {
            count: request.images.len(),
        };
    }

    ProviderError::ApiError {
        status_code: status,
        message: body.to_string(),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, request: ModelRequest) -> Result<ModelResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_body(&request);

        debug!(
            transport = %self.name,
            model = %request.model,
            images = request.images.len(),
            max_tokens = request.max_output_tokens,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(classify_http_error(status, &error_body, &request));
        }

        let api: ApiResponse = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse response: {e}"),
        })?;

        let choice = api
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        Ok(ModelResponse {
            text: choice.message.content.unwrap_or_default(),
            model: api.model.unwrap_or(request.model),
            usage: api.usage.map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}

// --- Wire types ---

#[derive(serde::Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    model: Option<String>,
    usage: Option<ApiUsage>,
}

#[derive(serde::Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(serde::Deserialize)]
struct ApiMessage {
    content: Option<String>,
}

#[derive(serde::Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsolve_core::ImageAttachment;

    fn request(images: usize) -> ModelRequest {
        ModelRequest {
            model: "gpt-4o".into(),
            text: "solve".into(),
            images: (0..images)
                .map(|i| ImageAttachment {
                    media_type: "image/png".into(),
                    data: format!("{i}"),
                })
                .collect(),
            max_output_tokens: 8192,
            temperature: 0.0,
            top_k: Some(32),
            top_p: Some(0.95),
        }
    }

    #[test]
    fn rate_limit_and_auth_map_by_status() {
        assert!(matches!(
            classify_http_error(429, "", &request(0)),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            classify_http_error(401, "", &request(0)),
            ProviderError::AuthenticationFailed(_)
        ));
    }

    #[test]
    fn token_vocabulary_maps_to_shape_error() {
        let err = classify_http_error(
            400,
            "This model's maximum context length is 128000 tokens",
            &request(0),
        );
        assert!(matches!(
            err,
            ProviderError::TokenLimitExceeded { budget: 8192 }
        ));
    }

    #[test]
    fn image_vocabulary_maps_to_shape_error() {
        let err = classify_http_error(400, "Too many images in request", &request(12));
        assert!(matches!(
            err,
            ProviderError::ImageLimitExceeded { count: 12 }
        ));
    }

    #[test]
    fn unknown_body_stays_api_error() {
        let err = classify_http_error(500, "internal server error", &request(0));
        assert!(matches!(
            err,
            ProviderError::ApiError {
                status_code: 500,
                ..
            }
        ));
    }

    #[test]
    fn body_carries_text_and_image_parts() {
        let body = HttpTransport::build_body(&request(2));
        let parts = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert!(
            parts[1]["image_url"]["url"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }
}
