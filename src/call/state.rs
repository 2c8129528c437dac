use crate::session::InboundEnvelope;
use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub const CONNECTED_MESSAGE: &str = "Connected to Cafe Receptionist";
pub const CALL_ENDED_MESSAGE: &str = "Call ended";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    Error,
}

impl CallStatus {
    /// Short label for status readouts
    pub fn label(&self) -> &'static str {
        match self {
            CallStatus::Idle => "Ready",
            CallStatus::Connecting => "Connecting",
            CallStatus::Connected => "Active",
            CallStatus::Error => "Error",
        }
    }

    /// One-line prompt under the call panel heading
    pub fn prompt(&self) -> &'static str {
        match self {
            CallStatus::Idle => "Click to connect with our AI receptionist",
            CallStatus::Connecting => "Establishing connection...",
            CallStatus::Connected => "Call in progress - speak naturally",
            CallStatus::Error => "Connection error - please try again",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    You,
    Receptionist,
    System,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::You => "You",
            Speaker::Receptionist => "Receptionist",
            Speaker::System => "System",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Change notifications delivered to subscribers
#[derive(Clone, Debug, PartialEq)]
pub enum CallEvent {
    StatusChanged(CallStatus),
    TranscriptAppended(TranscriptEntry),
    TranscriptCleared,
    MuteChanged(bool),
    ThinkingChanged(bool),
    AudioLevelChanged(f32),
}

/// Point-in-time view for rendering
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallSnapshot {
    pub status: CallStatus,
    pub is_muted: bool,
    pub transcript: Vec<TranscriptEntry>,
    pub thinking: bool,
    pub audio_level: f32,
}

impl CallSnapshot {
    /// A call is in progress once the socket is open
    pub fn in_call(&self) -> bool {
        self.status == CallStatus::Connected
    }
}

/// Status, mute flag, transcript, thinking indicator and level of the call
#[derive(Default)]
pub struct CallStateMachine {
    status: CallStatus,
    is_muted: bool,
    transcript: Vec<TranscriptEntry>,
    thinking: bool,
    audio_level: f32,
    observers: Vec<Sender<CallEvent>>,
}

impl CallStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; dropped receivers are pruned on the next event
    pub fn subscribe(&mut self) -> Receiver<CallEvent> {
        let (tx, rx) = unbounded();
        self.observers.push(tx);
        rx
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn audio_level(&self) -> f32 {
        self.audio_level
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn snapshot(&self) -> CallSnapshot {
        CallSnapshot {
            status: self.status,
            is_muted: self.is_muted,
            transcript: self.transcript.clone(),
            thinking: self.thinking,
            audio_level: self.audio_level,
        }
    }

    /// Start of a new session: clears the previous transcript
    pub fn begin_connecting(&mut self) {
        self.set_status(CallStatus::Connecting);
        if !self.transcript.is_empty() {
            self.transcript.clear();
            self.emit(CallEvent::TranscriptCleared);
        }
        self.set_thinking(false);
    }

    pub fn socket_opened(&mut self) {
        self.set_status(CallStatus::Connected);
        self.append(Speaker::System, CONNECTED_MESSAGE);
    }

    pub fn socket_closed(&mut self) {
        self.set_status(CallStatus::Idle);
        self.append(Speaker::System, CALL_ENDED_MESSAGE);
    }

    pub fn transport_failed(&mut self, detail: &str) {
        self.set_status(CallStatus::Error);
        self.append(
            Speaker::System,
            format!("Connection error occurred: {}", detail),
        );
    }

    pub fn setup_failed(&mut self, detail: &str) {
        self.set_status(CallStatus::Error);
        self.append(Speaker::System, format!("Failed to start call: {}", detail));
    }

    /// Apply a non-audio envelope; audio and unknown envelopes are ignored
    pub fn apply_envelope(&mut self, envelope: &InboundEnvelope) {
        match envelope {
            InboundEnvelope::Transcript { role, text } => {
                if text.is_empty() {
                    return;
                }
                let speaker = if role == "user" {
                    Speaker::You
                } else {
                    Speaker::Receptionist
                };
                self.append(speaker, text.clone());
            }
            InboundEnvelope::Thinking => self.set_thinking(true),
            InboundEnvelope::Clear => self.set_thinking(false),
            InboundEnvelope::Error { error } => {
                let message = error
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Unknown error");
                self.append(Speaker::System, format!("Error: {}", message));
            }
            InboundEnvelope::Audio { .. } | InboundEnvelope::Unknown => {}
        }
    }

    /// Flip the mute flag and return the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.is_muted = !self.is_muted;
        info!("Microphone {}", if self.is_muted { "muted" } else { "unmuted" });
        self.emit(CallEvent::MuteChanged(self.is_muted));
        self.is_muted
    }

    pub fn set_audio_level(&mut self, level: f32) {
        let level = level.clamp(0.0, 100.0);
        if (level - self.audio_level).abs() > f32::EPSILON {
            self.audio_level = level;
            self.emit(CallEvent::AudioLevelChanged(level));
        }
    }

    /// Clear per-call state after teardown; an error status is kept
    pub fn reset_after_teardown(&mut self) {
        if self.is_muted {
            self.is_muted = false;
            self.emit(CallEvent::MuteChanged(false));
        }
        self.set_audio_level(0.0);
        self.set_thinking(false);
        if self.status != CallStatus::Error {
            self.set_status(CallStatus::Idle);
        }
    }

    fn set_status(&mut self, status: CallStatus) {
        if self.status != status {
            debug!("Call status {:?} -> {:?}", self.status, status);
            self.status = status;
            self.emit(CallEvent::StatusChanged(status));
        }
    }

    fn set_thinking(&mut self, thinking: bool) {
        if self.thinking != thinking {
            self.thinking = thinking;
            self.emit(CallEvent::ThinkingChanged(thinking));
        }
    }

    fn append(&mut self, speaker: Speaker, text: impl Into<String>) {
        let entry = TranscriptEntry::new(speaker, text);
        debug!("{}: {}", entry.speaker.label(), entry.text);
        self.transcript.push(entry.clone());
        self.emit(CallEvent::TranscriptAppended(entry));
    }

    fn emit(&mut self, event: CallEvent) {
        self.observers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Call state shared between the controller thread and the UI
#[derive(Clone, Default)]
pub struct SharedCallState {
    inner: Arc<RwLock<CallStateMachine>>,
}

impl SharedCallState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, CallStateMachine> {
        self.inner.read()
    }

    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, CallStateMachine> {
        self.inner.write()
    }

    pub fn snapshot(&self) -> CallSnapshot {
        self.inner.read().snapshot()
    }

    pub fn subscribe(&self) -> Receiver<CallEvent> {
        self.inner.write().subscribe()
    }

    pub fn status(&self) -> CallStatus {
        self.inner.read().status()
    }

    pub fn is_muted(&self) -> bool {
        self.inner.read().is_muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(machine: &CallStateMachine) -> Vec<(Speaker, String)> {
        machine
            .transcript()
            .iter()
            .map(|e| (e.speaker, e.text.clone()))
            .collect()
    }

    #[test]
    fn test_connect_and_close_messages() {
        let mut machine = CallStateMachine::new();
        machine.begin_connecting();
        assert_eq!(machine.status(), CallStatus::Connecting);

        machine.socket_opened();
        assert_eq!(machine.status(), CallStatus::Connected);

        machine.socket_closed();
        machine.reset_after_teardown();
        assert_eq!(machine.status(), CallStatus::Idle);
        assert_eq!(
            texts(&machine),
            vec![
                (Speaker::System, CONNECTED_MESSAGE.to_string()),
                (Speaker::System, CALL_ENDED_MESSAGE.to_string()),
            ]
        );
    }

    #[test]
    fn test_thinking_indicator() {
        let mut machine = CallStateMachine::new();
        machine.apply_envelope(&InboundEnvelope::Thinking);
        assert!(machine.is_thinking());

        // transcript and error leave the indicator alone
        machine.apply_envelope(&InboundEnvelope::Transcript {
            role: "assistant".into(),
            text: "One moment".into(),
        });
        machine.apply_envelope(&InboundEnvelope::Error { error: None });
        assert!(machine.is_thinking());

        machine.apply_envelope(&InboundEnvelope::Clear);
        assert!(!machine.is_thinking());
    }

    #[test]
    fn test_transcript_speakers_and_errors() {
        let mut machine = CallStateMachine::new();
        machine.apply_envelope(&InboundEnvelope::Transcript {
            role: "user".into(),
            text: "Do you have oat milk?".into(),
        });
        machine.apply_envelope(&InboundEnvelope::Transcript {
            role: "agent".into(),
            text: "We do.".into(),
        });
        machine.apply_envelope(&InboundEnvelope::Transcript {
            role: "user".into(),
            text: String::new(),
        });
        machine.apply_envelope(&InboundEnvelope::Error {
            error: Some("Rate limited".into()),
        });
        machine.apply_envelope(&InboundEnvelope::Error { error: None });
        machine.apply_envelope(&InboundEnvelope::Unknown);

        assert_eq!(
            texts(&machine),
            vec![
                (Speaker::You, "Do you have oat milk?".to_string()),
                (Speaker::Receptionist, "We do.".to_string()),
                (Speaker::System, "Error: Rate limited".to_string()),
                (Speaker::System, "Error: Unknown error".to_string()),
            ]
        );
        assert_eq!(machine.status(), CallStatus::Idle);
    }

    #[test]
    fn test_new_session_clears_transcript() {
        let mut machine = CallStateMachine::new();
        machine.socket_opened();
        machine.apply_envelope(&InboundEnvelope::Thinking);
        machine.begin_connecting();

        assert!(machine.transcript().is_empty());
        assert!(!machine.is_thinking());
    }

    #[test]
    fn test_failures_keep_error_status() {
        let mut machine = CallStateMachine::new();
        machine.begin_connecting();
        machine.setup_failed("No WebSocket URL received");
        machine.reset_after_teardown();

        assert_eq!(machine.status(), CallStatus::Error);
        assert_eq!(
            texts(&machine),
            vec![(
                Speaker::System,
                "Failed to start call: No WebSocket URL received".to_string()
            )]
        );

        machine.begin_connecting();
        machine.socket_opened();
        machine.transport_failed("reset by peer");
        machine.reset_after_teardown();
        assert_eq!(machine.status(), CallStatus::Error);
        assert_eq!(
            machine.transcript().last().map(|e| e.text.as_str()),
            Some("Connection error occurred: reset by peer")
        );
    }

    #[test]
    fn test_teardown_clears_mute_and_level() {
        let mut machine = CallStateMachine::new();
        assert!(machine.toggle_mute());
        machine.set_audio_level(42.0);
        machine.reset_after_teardown();

        assert!(!machine.is_muted());
        assert_eq!(machine.audio_level(), 0.0);
    }

    #[test]
    fn test_observers_receive_events_in_order() {
        let mut machine = CallStateMachine::new();
        let rx = machine.subscribe();
        let dropped = machine.subscribe();
        drop(dropped);

        machine.begin_connecting();
        machine.toggle_mute();
        machine.apply_envelope(&InboundEnvelope::Thinking);

        let events: Vec<CallEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                CallEvent::StatusChanged(CallStatus::Connecting),
                CallEvent::MuteChanged(true),
                CallEvent::ThinkingChanged(true),
            ]
        );
        assert_eq!(machine.observers.len(), 1);
    }

    #[test]
    fn test_shared_state_snapshot() {
        let state = SharedCallState::new();
        state.write().socket_opened();

        let snapshot = state.snapshot();
        assert!(snapshot.in_call());
        assert_eq!(snapshot.transcript.len(), 1);
    }
}
