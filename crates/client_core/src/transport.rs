use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{SessionId, SessionResults, SimulationState},
    error::ApiException,
    protocol::{Action, ActionResult, StartSessionResponse},
};
use tracing::debug;
use url::Url;

/// The remote session API the controller drives. Non-success responses and
/// transport failures both come back as errors.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn start_session(&self) -> Result<SessionId>;
    async fn fetch_state(&self, session_id: &SessionId) -> Result<SimulationState>;
    async fn submit_action(&self, session_id: &SessionId, action: &Action) -> Result<ActionResult>;
    async fn fetch_results(&self, session_id: &SessionId) -> Result<SessionResults>;
}

pub struct MissingSessionApi;

#[async_trait]
impl SessionApi for MissingSessionApi {
    async fn start_session(&self) -> Result<SessionId> {
        Err(anyhow!("session api is unavailable"))
    }

    async fn fetch_state(&self, session_id: &SessionId) -> Result<SimulationState> {
        Err(anyhow!("session api is unavailable for session {session_id}"))
    }

    async fn submit_action(&self, session_id: &SessionId, _action: &Action) -> Result<ActionResult> {
        Err(anyhow!("session api is unavailable for session {session_id}"))
    }

    async fn fetch_results(&self, session_id: &SessionId) -> Result<SessionResults> {
        Err(anyhow!("session api is unavailable for session {session_id}"))
    }
}

pub struct HttpSessionApi {
    http: Client,
    base_url: Url,
}

impl HttpSessionApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("server url cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn session_endpoint(&self, session_id: &SessionId, leaf: &str) -> Result<Url> {
        self.endpoint(&["api", "session", session_id.as_str(), leaf])
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiException::from_body(status.as_u16(), &body).into())
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn start_session(&self) -> Result<SessionId> {
        let url = self.endpoint(&["api", "session", "start"])?;
        debug!(%url, "session api: start");
        let response = self.http.post(url).send().await?;
        let body: StartSessionResponse = ensure_success(response).await?.json().await?;
        Ok(body.session_id)
    }

    async fn fetch_state(&self, session_id: &SessionId) -> Result<SimulationState> {
        let url = self.session_endpoint(session_id, "state")?;
        let response = self.http.get(url).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn submit_action(&self, session_id: &SessionId, action: &Action) -> Result<ActionResult> {
        let url = self.session_endpoint(session_id, "action")?;
        debug!(%url, action = action.tag(), "session api: submit action");
        let response = self.http.post(url).json(action).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn fetch_results(&self, session_id: &SessionId) -> Result<SessionResults> {
        let url = self.session_endpoint(session_id, "results")?;
        let response = self.http.get(url).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}
