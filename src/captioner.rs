//! Remote image captioning with local fallback.

use async_trait::async_trait;
use base64::Engine;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::caption;
use crate::error::RemoteServiceError;
use crate::mood::MoodResult;

/// Bearer token for the caption endpoint, read at construction.
pub const TOKEN_ENV: &str = "FEEDLE_CAPTION_TOKEN";

/// A service that turns raw image bytes into a caption.
#[async_trait]
pub trait CaptionService: Send + Sync {
    async fn caption(&self, image: &[u8]) -> Result<String, RemoteServiceError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionLimits {
    pub timeout: Duration,
    pub concurrency: usize,
}

impl Default for CaptionLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            concurrency: 4,
        }
    }
}

/// Hosted image-to-text inference endpoint.
pub struct HttpCaptioner {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpCaptioner {
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        Self {
            endpoint,
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint from config, token from the environment.
    pub fn with_env_token(endpoint: String) -> Self {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Self::new(endpoint, token)
    }
}

#[derive(Serialize)]
struct CaptionRequest {
    inputs: CaptionInputs,
}

#[derive(Serialize)]
struct CaptionInputs {
    image: String,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

fn request_body(image: &[u8]) -> CaptionRequest {
    let encoded = base64::engine::general_purpose::STANDARD.encode(image);
    CaptionRequest {
        inputs: CaptionInputs {
            image: format!("data:image/jpeg;base64,{encoded}"),
        },
    }
}

fn parse_response(body: &str) -> Result<String, RemoteServiceError> {
    let items: Vec<GeneratedText> = serde_json::from_str(body)
        .map_err(|e| RemoteServiceError::BadResponse(e.to_string()))?;
    let text = items
        .into_iter()
        .next()
        .map(|item| item.generated_text.trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(RemoteServiceError::Empty);
    }
    Ok(text)
}

#[async_trait]
impl CaptionService for HttpCaptioner {
    async fn caption(&self, image: &[u8]) -> Result<String, RemoteServiceError> {
        let mut request = self.client.post(&self.endpoint).json(&request_body(image));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteServiceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteServiceError::Transport(e.to_string()))?;
        parse_response(&body)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

async fn caption_with_timeout(
    service: &dyn CaptionService,
    image: &[u8],
    timeout: Duration,
) -> Result<String, RemoteServiceError> {
    match tokio::time::timeout(timeout, service.caption(image)).await {
        Ok(result) => result,
        Err(_) => Err(RemoteServiceError::Timeout(timeout)),
    }
}

/// Ask the remote service for every image, at most `limits.concurrency` at
/// once. Slot `i` holds the outcome for `images[i]`.
pub async fn remote_captions(
    service: Arc<dyn CaptionService>,
    images: &[Arc<[u8]>],
    limits: CaptionLimits,
) -> Vec<Result<String, RemoteServiceError>> {
    let permits = Arc::new(Semaphore::new(limits.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, image) in images.iter().enumerate() {
        let service = Arc::clone(&service);
        let permits = Arc::clone(&permits);
        let image = Arc::clone(image);
        tasks.spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => caption_with_timeout(service.as_ref(), &image, limits.timeout).await,
                Err(e) => Err(RemoteServiceError::Transport(e.to_string())),
            };
            (index, result)
        });
    }

    let mut slots: Vec<Result<String, RemoteServiceError>> = images
        .iter()
        .map(|_| Err(RemoteServiceError::Empty))
        .collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = result,
            Err(e) => tracing::warn!("caption task failed: {e}"),
        }
    }

    slots
}

/// One caption per image. Remote results are used where they succeed; every
/// other slot is filled by the local synthesizer, in input order.
pub async fn generate_captions<R: Rng>(
    service: Option<Arc<dyn CaptionService>>,
    images: &[Arc<[u8]>],
    mood: &MoodResult,
    limits: CaptionLimits,
    rng: &mut R,
) -> Vec<String> {
    let remote = match service {
        Some(service) => {
            tracing::info!(service = service.name(), count = images.len(), "requesting remote captions");
            remote_captions(service, images, limits).await
        }
        None => images
            .iter()
            .map(|_| Err(RemoteServiceError::Empty))
            .collect(),
    };

    remote
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(index, "local caption fallback: {e}");
                caption::synthesize(mood.mood.tag(), &mood.hashtags, rng)
            }
        })
        .collect()
}
