//! Controller thread that turns UI commands into call sessions
//!
//! The controller owns at most one [`CallSession`] and runs on a dedicated
//! thread with a current-thread runtime and a `LocalSet`.

use super::session::CallSession;
use super::state::{CallEvent, CallSnapshot, SharedCallState};
use crate::audio::AudioBackend;
use crate::config::VoiceConfig;
use crate::session::SessionNegotiator;
use crate::{ReceptionistError, Result};
use crossbeam_channel::Receiver;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{debug, error, info};

/// Commands accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCommand {
    /// Negotiate and open a call
    StartCall,

    /// Hang up, or abort a call still being set up
    EndCall,

    /// Flip the microphone mute flag
    ToggleMute,

    /// Tear down and stop the controller
    Shutdown,
}

/// Handle for driving the controller from the UI
#[derive(Clone)]
pub struct CallHandle {
    command_tx: mpsc::UnboundedSender<CallCommand>,
    state: SharedCallState,
}

impl CallHandle {
    /// Send a command to the controller
    pub fn send_command(&self, cmd: CallCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| ReceptionistError::Channel(format!("Failed to send command: {}", e)))
    }

    pub fn start_call(&self) -> Result<()> {
        self.send_command(CallCommand::StartCall)
    }

    pub fn end_call(&self) -> Result<()> {
        self.send_command(CallCommand::EndCall)
    }

    pub fn toggle_mute(&self) -> Result<()> {
        self.send_command(CallCommand::ToggleMute)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send_command(CallCommand::Shutdown)
    }

    /// Subscribe to call state changes
    pub fn subscribe(&self) -> Receiver<CallEvent> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CallSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &SharedCallState {
        &self.state
    }
}

enum Wake {
    Command(Option<CallCommand>),
    SessionClosed,
}

enum Setup {
    Active(CallSession),
    Failed,
    Cancelled,
    Shutdown,
}

pub struct CallController {
    config: VoiceConfig,
    negotiator: Box<dyn SessionNegotiator>,
    audio: Box<dyn AudioBackend>,
    state: SharedCallState,
    command_rx: mpsc::UnboundedReceiver<CallCommand>,
}

impl CallController {
    pub fn new(
        config: VoiceConfig,
        negotiator: Box<dyn SessionNegotiator>,
        audio: Box<dyn AudioBackend>,
    ) -> (Self, CallHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let state = SharedCallState::new();

        let handle = CallHandle {
            command_tx,
            state: state.clone(),
        };

        let controller = Self {
            config,
            negotiator,
            audio,
            state,
            command_rx,
        };

        (controller, handle)
    }

    /// Run the controller on its own thread
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("call-controller".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        error!("Failed to build controller runtime: {}", e);
                        return;
                    }
                };

                let local = LocalSet::new();
                local.block_on(&runtime, self.run());
            })?;

        Ok(handle)
    }

    /// Command loop; must be polled inside a `LocalSet`
    pub async fn run(mut self) {
        info!("Call controller started");
        let mut session: Option<CallSession> = None;

        loop {
            let wake = match session.as_ref() {
                Some(active) => tokio::select! {
                    cmd = self.command_rx.recv() => Wake::Command(cmd),
                    _ = active.closed() => Wake::SessionClosed,
                },
                None => Wake::Command(self.command_rx.recv().await),
            };

            match wake {
                Wake::SessionClosed => {
                    debug!("Socket closed, tearing down call");
                    self.teardown(&mut session);
                }
                Wake::Command(Some(CallCommand::StartCall)) => {
                    if session.is_some() {
                        debug!("Call already active");
                        continue;
                    }
                    match self.start_call().await {
                        Setup::Active(active) => session = Some(active),
                        Setup::Failed | Setup::Cancelled => {
                            self.state.write().reset_after_teardown();
                        }
                        Setup::Shutdown => {
                            self.state.write().reset_after_teardown();
                            break;
                        }
                    }
                }
                Wake::Command(Some(CallCommand::EndCall)) => {
                    if session.is_some() {
                        info!("Ending call");
                        self.teardown(&mut session);
                    } else {
                        debug!("No active call to end");
                    }
                }
                Wake::Command(Some(CallCommand::ToggleMute)) => {
                    self.state.write().toggle_mute();
                }
                Wake::Command(Some(CallCommand::Shutdown)) | Wake::Command(None) => {
                    info!("Call controller shutdown requested");
                    if let Some(active) = session.take() {
                        active.shutdown().await;
                        self.state.write().reset_after_teardown();
                    }
                    break;
                }
            }
        }

        info!("Call controller stopped");
    }

    /// Open a session while still serving commands
    async fn start_call(&mut self) -> Setup {
        info!("Starting call");

        let open = CallSession::open(
            &self.config,
            self.negotiator.as_ref(),
            self.audio.as_ref(),
            self.state.clone(),
        );
        tokio::pin!(open);

        loop {
            tokio::select! {
                biased;

                result = &mut open => {
                    return match result {
                        Ok(active) => Setup::Active(active),
                        Err(e) => {
                            error!("Failed to start call: {}", e);
                            self.state.write().setup_failed(e.detail());
                            Setup::Failed
                        }
                    };
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(CallCommand::ToggleMute) => {
                        self.state.write().toggle_mute();
                    }
                    Some(CallCommand::StartCall) => debug!("Call setup already in progress"),
                    Some(CallCommand::EndCall) => {
                        info!("Call setup cancelled");
                        return Setup::Cancelled;
                    }
                    Some(CallCommand::Shutdown) | None => return Setup::Shutdown,
                },
            }
        }
    }

    fn teardown(&self, session: &mut Option<CallSession>) {
        if let Some(mut active) = session.take() {
            active.close();
        }
        self.state.write().reset_after_teardown();
    }
}
