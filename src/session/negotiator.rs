use crate::{ReceptionistError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of a successful session start
#[derive(Clone, Debug, PartialEq)]
pub struct NegotiatedSession {
    pub agent_id: String,
    pub socket_url: String,
    /// Rate of raw PCM audio the agent sends back
    pub sample_rate: u32,
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    #[serde(rename = "agentId")]
    agent_id: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    #[serde(rename = "wsUrl", default)]
    ws_url: Option<String>,
    #[serde(rename = "audioConfig", default)]
    audio_config: Option<AudioConfigBody>,
}

#[derive(Deserialize)]
struct AudioConfigBody {
    #[serde(rename = "sampleRate", default)]
    sample_rate: Option<f64>,
}

/// Parse a session-start response body
///
/// A missing, non-positive or non-finite `sampleRate` falls back to
/// `default_sample_rate`.
pub fn parse_session_response(
    body: &str,
    agent_id: &str,
    default_sample_rate: u32,
) -> Result<NegotiatedSession> {
    let response: SessionResponse = serde_json::from_str(body).map_err(|e| {
        ReceptionistError::SessionStart(format!("Invalid session response: {}", e))
    })?;

    let socket_url = response
        .ws_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ReceptionistError::SessionStart("No WebSocket URL received".into()))?;

    let sample_rate = match response.audio_config.and_then(|c| c.sample_rate) {
        Some(rate) if rate.is_finite() && rate >= 1.0 => rate.round() as u32,
        _ => default_sample_rate,
    };

    Ok(NegotiatedSession {
        agent_id: agent_id.to_string(),
        socket_url,
        sample_rate,
    })
}

/// Starts a voice session for an agent
#[async_trait(?Send)]
pub trait SessionNegotiator: Send {
    async fn start_session(&self, agent_id: &str) -> Result<NegotiatedSession>;
}

/// Negotiates over HTTP with a single POST
pub struct HttpNegotiator {
    client: reqwest::Client,
    endpoint: String,
    default_sample_rate: u32,
}

impl HttpNegotiator {
    pub fn new(endpoint: impl Into<String>, default_sample_rate: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            default_sample_rate,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl SessionNegotiator for HttpNegotiator {
    async fn start_session(&self, agent_id: &str) -> Result<NegotiatedSession> {
        debug!("Starting session for agent {} at {}", agent_id, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SessionRequest { agent_id })
            .send()
            .await
            .map_err(|e| {
                ReceptionistError::SessionStart(format!("Failed to reach session endpoint: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            return Err(ReceptionistError::SessionStart(format!(
                "Failed to start session: {}",
                reason
            )));
        }

        let body = response.text().await.map_err(|e| {
            ReceptionistError::SessionStart(format!("Failed to read session response: {}", e))
        })?;

        let session = parse_session_response(&body, agent_id, self.default_sample_rate)?;
        info!(
            "Session negotiated: {} ({} Hz playback)",
            session.socket_url, session.sample_rate
        );
        Ok(session)
    }
}
