use super::protocol::{parse_inbound, InboundEnvelope, OutboundEnvelope};
use crate::audio::AudioFrame;
use crate::{ReceptionistError, Result};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Lifecycle of the agent socket; `Closed` is terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SocketPhase {
    Opening,
    Open,
    Closed,
}

/// What the reader task reports
#[derive(Clone, Debug, PartialEq)]
pub enum SocketEvent {
    Envelope(InboundEnvelope),
    /// Graceful close or end of stream
    Closed,
    /// Transport error; no `Closed` follows
    Failed(String),
}

/// Cloneable handle for queueing outbound frames
#[derive(Clone)]
pub struct SocketSender {
    outbound: mpsc::UnboundedSender<Message>,
}

impl SocketSender {
    pub fn send_audio(&self, frame: &AudioFrame, sample_rate: u32) -> Result<()> {
        let json = OutboundEnvelope::audio(frame, sample_rate).to_json()?;
        self.outbound
            .send(Message::Text(json.into()))
            .map_err(|_| ReceptionistError::Transport("Socket is closed".into()))
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

/// An open socket to the voice agent
///
/// Reading and writing run as separate tasks joined by channels. Inbound text
/// frames are parsed into envelopes; unparseable ones are logged and dropped.
pub struct SocketSession {
    sender: SocketSender,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
    closed: bool,
}

impl SocketSession {
    pub async fn connect(url: &str) -> Result<(Self, mpsc::UnboundedReceiver<SocketEvent>)> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| ReceptionistError::Transport(format!("Failed to connect: {}", e)))?;

        info!("Socket connected: {}", url);

        let (mut sink, mut stream) = ws.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let writer_events = event_tx.clone();
        let writer = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    if !closing {
                        let _ = writer_events.send(SocketEvent::Failed(e.to_string()));
                    }
                    break;
                }
                if closing {
                    break;
                }
            }
            let _ = sink.close().await;
            debug!("Socket writer finished");
        });

        let reader = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => match parse_inbound(text.as_str()) {
                        Ok(envelope) => {
                            if event_tx.send(SocketEvent::Envelope(envelope)).is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!("Dropping inbound message: {}", e),
                    },
                    Ok(Message::Close(frame)) => {
                        debug!("Server closed socket: {:?}", frame);
                        break;
                    }
                    // Binary is unused; ping/pong is answered by tungstenite
                    Ok(_) => {}
                    Err(e) => {
                        let _ = event_tx.send(SocketEvent::Failed(e.to_string()));
                        return;
                    }
                }
            }
            let _ = event_tx.send(SocketEvent::Closed);
        });

        Ok((
            Self {
                sender: SocketSender {
                    outbound: outbound_tx,
                },
                reader,
                writer,
                closed: false,
            },
            event_rx,
        ))
    }

    pub fn sender(&self) -> SocketSender {
        self.sender.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Send a close frame and stop reading. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.sender.outbound.send(Message::Close(None)).is_err() {
            self.writer.abort();
        }
        self.reader.abort();
        info!("Socket closed");
    }

    /// Close and wait up to `limit` for the close frame to be written
    pub async fn finish(mut self, limit: Duration) {
        self.close();
        if tokio::time::timeout(limit, &mut self.writer).await.is_err() {
            debug!("Socket writer still busy after {:?}, abandoning it", limit);
            self.writer.abort();
        }
    }
}

impl Drop for SocketSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    #[tokio::test]
    async fn test_round_trip_with_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(tcp).await.unwrap();

            ws.send(Message::Text(r#"{"type":"thinking"}"#.into())).await.unwrap();
            ws.send(Message::Text("garbage".into())).await.unwrap();
            ws.send(Message::Binary(vec![1u8, 2, 3].into())).await.unwrap();
            ws.send(Message::Text(r#"{"type":"clear"}"#.into())).await.unwrap();

            let received = loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => break text.as_str().to_string(),
                    Some(Ok(_)) => continue,
                    other => panic!("unexpected: {:?}", other),
                }
            };
            ws.close(None).await.ok();
            received
        });

        let (mut session, mut events) = SocketSession::connect(&url).await.unwrap();

        assert_eq!(
            events.recv().await,
            Some(SocketEvent::Envelope(InboundEnvelope::Thinking))
        );
        assert_eq!(
            events.recv().await,
            Some(SocketEvent::Envelope(InboundEnvelope::Clear))
        );

        let frame = AudioFrame::from_samples(vec![0.0; 4]);
        session.sender().send_audio(&frame, 16000).unwrap();

        let received = server.await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&received).unwrap();
        assert_eq!(value["type"], "audio");
        assert_eq!(value["sampleRate"], 16000);

        assert_eq!(events.recv().await, Some(SocketEvent::Closed));

        session.close();
        session.close();
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn test_finish_delivers_close_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(tcp).await.unwrap();
            loop {
                match ws.next().await {
                    Some(Ok(Message::Close(_))) => return true,
                    Some(Ok(_)) => continue,
                    _ => return false,
                }
            }
        });

        let (session, _events) = SocketSession::connect(&url).await.unwrap();
        session.finish(Duration::from_secs(1)).await;

        assert!(server.await.unwrap());
    }

    #[tokio::test]
    async fn test_connect_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        drop(listener);

        assert!(matches!(
            SocketSession::connect(&url).await,
            Err(ReceptionistError::Transport(_))
        ));
    }
}
