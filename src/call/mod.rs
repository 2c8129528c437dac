pub mod controller;
pub mod session;
pub mod state;

pub use controller::{CallCommand, CallController, CallHandle};
pub use session::CallSession;
pub use state::{
    CallEvent, CallSnapshot, CallStateMachine, CallStatus, SharedCallState, Speaker,
    TranscriptEntry, CALL_ENDED_MESSAGE, CONNECTED_MESSAGE,
};
