//! API models for request and response payloads

pub mod session;

pub use session::{
    CreateSessionRequest, NewSession, OwnerView, PublishedSession, Session, SessionPatch,
    SessionStatus, UpdateSessionRequest,
};
