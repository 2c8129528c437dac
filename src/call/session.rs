//! One voice call, from negotiation to teardown
//!
//! A [`CallSession`] owns every resource of an active call: the socket, the
//! frame forwarder, the inbound dispatcher, the playback output and the
//! microphone. Its tasks are spawned with `spawn_local`, so it must live on a
//! `LocalSet`.

use super::state::SharedCallState;
use crate::audio::{AudioBackend, AudioCapture, AudioFrame, PlaybackScheduler, PlaybackSink};
use crate::config::VoiceConfig;
use crate::session::{
    InboundEnvelope, SessionNegotiator, SocketEvent, SocketPhase, SocketSender, SocketSession,
};
use crate::Result;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type SharedSink = Rc<RefCell<Option<Box<dyn PlaybackSink>>>>;

/// How long a shutdown waits for the close frame to go out
const CLOSE_GRACE: Duration = Duration::from_millis(500);

pub struct CallSession {
    state: SharedCallState,
    socket: Option<SocketSession>,
    forwarder: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
    playback: SharedSink,
    scheduler: Rc<RefCell<PlaybackScheduler>>,
    capture: Option<AudioCapture>,
    phase: Rc<Cell<SocketPhase>>,
    closed: Rc<Notify>,
}

impl CallSession {
    fn new(state: SharedCallState, playback_rate: u32) -> Self {
        Self {
            state,
            socket: None,
            forwarder: None,
            dispatcher: None,
            playback: Rc::new(RefCell::new(None)),
            scheduler: Rc::new(RefCell::new(PlaybackScheduler::new(playback_rate))),
            capture: None,
            phase: Rc::new(Cell::new(SocketPhase::Opening)),
            closed: Rc::new(Notify::new()),
        }
    }

    /// Negotiate, acquire devices, connect and start streaming
    ///
    /// On failure everything acquired so far is released before the error is
    /// returned. Dropping the returned future mid-setup releases the same way.
    pub async fn open(
        config: &VoiceConfig,
        negotiator: &dyn SessionNegotiator,
        audio: &dyn AudioBackend,
        state: SharedCallState,
    ) -> Result<CallSession> {
        let mut session = CallSession::new(state, config.default_playback_sample_rate);
        session.state.write().begin_connecting();

        match session.establish(config, negotiator, audio).await {
            Ok(()) => Ok(session),
            Err(e) => {
                warn!("Call setup failed: {}", e);
                session.close();
                Err(e)
            }
        }
    }

    async fn establish(
        &mut self,
        config: &VoiceConfig,
        negotiator: &dyn SessionNegotiator,
        audio: &dyn AudioBackend,
    ) -> Result<()> {
        let negotiated = negotiator.start_session(&config.agent_id).await?;
        *self.scheduler.borrow_mut() = PlaybackScheduler::new(negotiated.sample_rate);

        let (capture, mut frames) = AudioCapture::acquire(
            audio.microphone()?,
            config.capture_sample_rate,
            config.frame_size,
        )?;
        self.capture = Some(capture);

        *self.playback.borrow_mut() = Some(audio.speaker()?);

        let (socket, events) = SocketSession::connect(&negotiated.socket_url).await?;
        let sender = socket.sender();
        self.socket = Some(socket);

        self.phase.set(SocketPhase::Open);
        self.state.write().socket_opened();
        info!("Call connected to agent {}", negotiated.agent_id);

        // Only audio captured while the socket is open goes out
        let backlog = frames.discard_pending();
        if backlog > 0 {
            debug!("Dropped {} capture chunks recorded before the socket opened", backlog);
        }

        self.dispatcher = Some(tokio::task::spawn_local(dispatch_inbound(
            events,
            self.state.clone(),
            Rc::clone(&self.playback),
            Rc::clone(&self.scheduler),
            Rc::clone(&self.phase),
            Rc::clone(&self.closed),
        )));

        let (frame_tx, frame_rx) = mpsc::unbounded_channel::<AudioFrame>();
        std::thread::Builder::new()
            .name("capture-frames".into())
            .spawn(move || {
                for frame in frames {
                    if frame_tx.send(frame).is_err() {
                        break;
                    }
                }
                debug!("Capture frame worker finished");
            })?;

        self.forwarder = Some(tokio::task::spawn_local(forward_frames(
            frame_rx,
            sender,
            self.state.clone(),
            Rc::clone(&self.phase),
            config.capture_sample_rate,
        )));

        Ok(())
    }

    pub fn phase(&self) -> SocketPhase {
        self.phase.get()
    }

    /// Resolves once the socket has closed or failed
    pub async fn closed(&self) {
        if self.phase.get() == SocketPhase::Closed {
            return;
        }
        self.closed.notified().await;
    }

    /// Release every resource. Safe to call repeatedly.
    ///
    /// "Call ended" is recorded only if this call moves the socket out of the
    /// open phase.
    pub fn close(&mut self) {
        let was_open = self.phase.get() == SocketPhase::Open;
        self.phase.set(SocketPhase::Closed);

        if let Some(mut socket) = self.socket.take() {
            socket.close();
        }
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        if let Some(dispatcher) = self.dispatcher.take() {
            dispatcher.abort();
        }
        if let Some(mut sink) = self.playback.borrow_mut().take() {
            sink.close();
        }
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
        self.scheduler.borrow_mut().reset();

        if was_open {
            self.state.write().socket_closed();
        }
        self.closed.notify_one();
    }
}

impl CallSession {
    /// Close like [`CallSession::close`], then let the socket deliver its
    /// close frame before returning
    pub async fn shutdown(mut self) {
        match self.socket.take() {
            Some(mut socket) => {
                socket.close();
                self.close();
                socket.finish(CLOSE_GRACE).await;
            }
            None => self.close(),
        }
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        self.close();
    }
}

async fn forward_frames(
    mut frames: mpsc::UnboundedReceiver<AudioFrame>,
    sender: SocketSender,
    state: SharedCallState,
    phase: Rc<Cell<SocketPhase>>,
    sample_rate: u32,
) {
    while let Some(frame) = frames.recv().await {
        if phase.get() != SocketPhase::Open {
            break;
        }
        if state.is_muted() {
            continue;
        }

        state.write().set_audio_level(frame.level);
        if let Err(e) = sender.send_audio(&frame, sample_rate) {
            debug!("Stopping frame forwarder: {}", e);
            break;
        }
    }
}

async fn dispatch_inbound(
    mut events: mpsc::UnboundedReceiver<SocketEvent>,
    state: SharedCallState,
    playback: SharedSink,
    scheduler: Rc<RefCell<PlaybackScheduler>>,
    phase: Rc<Cell<SocketPhase>>,
    closed: Rc<Notify>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SocketEvent::Envelope(InboundEnvelope::Audio { audio }) => {
                if audio.is_empty() {
                    continue;
                }
                play_payload(&audio, &playback, &scheduler);
            }
            SocketEvent::Envelope(envelope) => {
                debug!("Inbound {}", envelope.kind());
                state.write().apply_envelope(&envelope);
            }
            SocketEvent::Closed => {
                if phase.get() == SocketPhase::Open {
                    phase.set(SocketPhase::Closed);
                    scheduler.borrow_mut().reset();
                    state.write().socket_closed();
                }
                break;
            }
            SocketEvent::Failed(detail) => {
                warn!("Socket error: {}", detail);
                if phase.get() != SocketPhase::Closed {
                    phase.set(SocketPhase::Closed);
                    state.write().transport_failed(&detail);
                }
                break;
            }
        }
    }

    // A dropped event channel counts as closed too
    phase.set(SocketPhase::Closed);
    closed.notify_one();
}

fn play_payload(payload: &str, playback: &SharedSink, scheduler: &RefCell<PlaybackScheduler>) {
    let mut playback = playback.borrow_mut();
    let Some(sink) = playback.as_mut() else {
        return;
    };

    let segment = match scheduler.borrow_mut().schedule(payload, sink.current_time()) {
        Ok(segment) => segment,
        Err(e) => {
            warn!("Dropping audio payload: {}", e);
            return;
        }
    };

    if let Err(e) = sink.play(segment) {
        warn!("Playback failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CaptureDevice, ScheduledSegment};
    use crate::call::state::CallStatus;
    use crate::session::NegotiatedSession;
    use crate::ReceptionistError;
    use async_trait::async_trait;
    use crossbeam_channel::Sender;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedNegotiator(Result<NegotiatedSession>);

    #[async_trait(?Send)]
    impl SessionNegotiator for FixedNegotiator {
        async fn start_session(&self, _agent_id: &str) -> Result<NegotiatedSession> {
            self.0.clone()
        }
    }

    struct SilentMic;

    impl CaptureDevice for SilentMic {
        fn sample_rate(&self) -> u32 {
            16000
        }

        fn start(&mut self, _sender: Sender<Vec<f32>>) -> Result<()> {
            Ok(())
        }

        fn stop(&mut self) {}
    }

    struct NullSink;

    impl PlaybackSink for NullSink {
        fn current_time(&self) -> f64 {
            0.0
        }

        fn play(&mut self, _segment: ScheduledSegment) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) {}
    }

    #[derive(Clone, Default)]
    struct CountingBackend {
        microphones: Arc<AtomicUsize>,
    }

    impl AudioBackend for CountingBackend {
        fn microphone(&self) -> Result<Box<dyn CaptureDevice>> {
            self.microphones.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(SilentMic))
        }

        fn speaker(&self) -> Result<Box<dyn PlaybackSink>> {
            Ok(Box::new(NullSink))
        }
    }

    #[tokio::test]
    async fn test_negotiation_failure_releases_nothing_acquired() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let state = SharedCallState::new();
                let backend = CountingBackend::default();
                let negotiator = FixedNegotiator(Err(ReceptionistError::SessionStart(
                    "No WebSocket URL received".into(),
                )));

                let result =
                    CallSession::open(&VoiceConfig::default(), &negotiator, &backend, state.clone())
                        .await;

                assert!(result.is_err());
                assert_eq!(backend.microphones.load(Ordering::SeqCst), 0);
                // the caller records the failure; no "Call ended" was added
                assert!(state.snapshot().transcript.is_empty());
                assert_eq!(state.status(), CallStatus::Connecting);
            })
            .await;
    }

    #[tokio::test]
    async fn test_connect_failure_after_devices_acquired() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
                let url = format!("ws://{}", listener.local_addr().unwrap());
                drop(listener);

                let state = SharedCallState::new();
                let backend = CountingBackend::default();
                let negotiator = FixedNegotiator(Ok(NegotiatedSession {
                    agent_id: "a".into(),
                    socket_url: url,
                    sample_rate: 24000,
                }));

                let err =
                    CallSession::open(&VoiceConfig::default(), &negotiator, &backend, state.clone())
                        .await
                        .err()
                        .unwrap();

                assert!(matches!(err, ReceptionistError::Transport(_)));
                assert_eq!(backend.microphones.load(Ordering::SeqCst), 1);
                assert!(state.snapshot().transcript.is_empty());
            })
            .await;
    }
}
