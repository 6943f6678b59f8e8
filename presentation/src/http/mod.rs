//! HTTP surface
//!
//! `POST /api/chat` runs one turn and streams its events back in the
//! configured [`Framing`]; `GET /health` answers `{"status":"ok"}`.

pub mod multiplexer;
pub mod request;
pub mod routes;

pub use multiplexer::{Framing, relay};
pub use request::ChatBody;
pub use routes::{ApiError, AppState, CHAT_PATH, HEALTH_PATH, router};
