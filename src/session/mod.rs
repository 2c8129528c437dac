//! Remote voice agent plumbing: session negotiation and the audio socket

pub mod negotiator;
pub mod protocol;
pub mod socket;

pub use negotiator::{parse_session_response, HttpNegotiator, NegotiatedSession, SessionNegotiator};
pub use protocol::{parse_inbound, InboundEnvelope, OutboundEnvelope};
pub use socket::{SocketEvent, SocketPhase, SocketSender, SocketSession};
