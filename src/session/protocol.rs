//! JSON envelopes exchanged with the voice agent over the socket

use crate::audio::AudioFrame;
use crate::{ReceptionistError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Client to agent
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundEnvelope {
    Audio {
        /// Base64 PCM16 little-endian
        audio: String,
        #[serde(rename = "sampleRate")]
        sample_rate: u32,
    },
}

impl OutboundEnvelope {
    pub fn audio(frame: &AudioFrame, sample_rate: u32) -> Self {
        OutboundEnvelope::Audio {
            audio: STANDARD.encode(frame.pcm_bytes()),
            sample_rate,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            ReceptionistError::AudioProcessing(format!("Failed to encode envelope: {}", e))
        })
    }
}

/// Agent to client
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundEnvelope {
    /// Base64 audio, WAV or raw PCM16
    Audio {
        #[serde(default)]
        audio: String,
    },
    Transcript {
        #[serde(default)]
        role: String,
        #[serde(default)]
        text: String,
    },
    /// Agent started generating a reply
    Thinking,
    /// Agent finished generating
    Clear,
    Error {
        #[serde(default)]
        error: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl InboundEnvelope {
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEnvelope::Audio { .. } => "audio",
            InboundEnvelope::Transcript { .. } => "transcript",
            InboundEnvelope::Thinking => "thinking",
            InboundEnvelope::Clear => "clear",
            InboundEnvelope::Error { .. } => "error",
            InboundEnvelope::Unknown => "unknown",
        }
    }
}

/// Parse one inbound text frame
pub fn parse_inbound(text: &str) -> Result<InboundEnvelope> {
    serde_json::from_str(text).map_err(|e| ReceptionistError::MalformedMessage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outbound_audio_shape() {
        let frame = AudioFrame::from_samples(vec![1.0, -1.0]);
        let json = OutboundEnvelope::audio(&frame, 16000).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        // 32767, -32768 little-endian: FF 7F 00 80
        assert_eq!(
            value,
            json!({"type": "audio", "audio": "/38AgA==", "sampleRate": 16000})
        );
    }

    #[test]
    fn test_parse_each_variant() {
        assert_eq!(
            parse_inbound(r#"{"type":"audio","audio":"AAA="}"#).unwrap(),
            InboundEnvelope::Audio {
                audio: "AAA=".into()
            }
        );
        assert_eq!(
            parse_inbound(r#"{"type":"transcript","role":"user","text":"Table for two"}"#).unwrap(),
            InboundEnvelope::Transcript {
                role: "user".into(),
                text: "Table for two".into()
            }
        );
        assert_eq!(
            parse_inbound(r#"{"type":"thinking"}"#).unwrap(),
            InboundEnvelope::Thinking
        );
        assert_eq!(
            parse_inbound(r#"{"type":"clear","extra":1}"#).unwrap(),
            InboundEnvelope::Clear
        );
        assert_eq!(
            parse_inbound(r#"{"type":"error"}"#).unwrap(),
            InboundEnvelope::Error { error: None }
        );
        assert_eq!(
            parse_inbound(r#"{"type":"error","error":"quota"}"#).unwrap(),
            InboundEnvelope::Error {
                error: Some("quota".into())
            }
        );
    }

    #[test]
    fn test_unknown_type_is_ignorable() {
        let envelope = parse_inbound(r#"{"type":"metrics","latency":12}"#).unwrap();
        assert_eq!(envelope, InboundEnvelope::Unknown);
        assert_eq!(envelope.kind(), "unknown");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_inbound("{not json"),
            Err(ReceptionistError::MalformedMessage(_))
        ));
        assert!(matches!(
            parse_inbound(r#"{"audio":"AAA="}"#),
            Err(ReceptionistError::MalformedMessage(_))
        ));
    }
}
