//! reqwest-backed implementation of the three slide-service seams.
//!
//! All connection details come from [`ServiceConfig`]; nothing is hardcoded.
//! One [`ApiSlideService`] speaks to all three endpoints of the slide
//! service API, sharing a single pre-configured HTTP client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ServiceConfig;

use super::service::{
    FollowupIdea, FollowupRequest, FollowupResponse, GateDecision, GateRequest, GeneratedSlide,
    GenerationRequest, GenerationResponse, GateService, GenerationService, FollowupService,
    ServiceError,
};

// ---------------------------------------------------------------------------
// ApiSlideService
// ---------------------------------------------------------------------------

/// Calls the slide service API over HTTP/JSON.
///
/// Endpoints, relative to `config.base_url`:
///
/// | Seam       | Endpoint             |
/// |------------|----------------------|
/// | Gate       | `POST /v1/gate`      |
/// | Generation | `POST /v1/generate`  |
/// | Follow-ups | `POST /v1/followups` |
pub struct ApiSlideService {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl ApiSlideService {
    /// Build an `ApiSlideService` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &ServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// POST `body` to `{base_url}{path}` and parse the JSON response.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty — safe for
    /// local, unauthenticated deployments.
    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ServiceError> {
        let url = format!("{}{path}", self.config.base_url);

        let mut req = self.client.post(&url).json(body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let parsed = response
            .json::<R>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        Ok(parsed)
    }
}

#[async_trait]
impl GateService for ApiSlideService {
    async fn evaluate(&self, request: &GateRequest) -> Result<GateDecision, ServiceError> {
        self.post_json("/v1/gate", request).await
    }
}

#[async_trait]
impl GenerationService for ApiSlideService {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedSlide, ServiceError> {
        let response: GenerationResponse = self.post_json("/v1/generate", request).await?;
        Ok(response.slide)
    }
}

#[async_trait]
impl FollowupService for ApiSlideService {
    async fn followups(
        &self,
        request: &FollowupRequest,
    ) -> Result<Vec<FollowupIdea>, ServiceError> {
        let response: FollowupResponse = self.post_json("/v1/followups", request).await?;
        Ok(response.followups)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn make_config(api_key: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            base_url: "http://localhost:8787".into(),
            api_key: api_key.map(|s| s.to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _svc = ApiSlideService::from_config(&make_config(None));
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let _svc = ApiSlideService::from_config(&make_config(Some("")));
    }

    #[test]
    fn from_config_accepts_real_api_key() {
        let _svc = ApiSlideService::from_config(&make_config(Some("tok-1234")));
    }

    /// One instance must be usable behind all three trait objects.
    #[test]
    fn implements_all_three_seams() {
        let svc = Arc::new(ApiSlideService::from_config(&make_config(None)));
        let _gate: Arc<dyn GateService> = svc.clone();
        let _generation: Arc<dyn GenerationService> = svc.clone();
        let _followup: Arc<dyn FollowupService> = svc;
    }
}
