//! The IVR conversation engine.
//!
//! - [`state_machine`]: states, events, the transition table and its interpreter
//! - [`actions`]: authentication actions attached to transitions
//! - [`input`] and [`prompts`]: caller input in, prompt copy out
//! - [`session`] and [`registry`]: per-caller state and its lifecycle
//! - [`service`]: the session-level operations exposed over HTTP

pub mod actions;
pub mod input;
pub mod prompts;
pub mod registry;
pub mod service;
pub mod session;
pub mod state_machine;

pub use registry::{SessionHandle, SessionRegistry};
pub use service::IvrService;
pub use session::{Credentials, Session, SessionId};
