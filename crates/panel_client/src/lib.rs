//! Panel client: HTTP transport and request orchestration for the panel.
mod api;
mod client;

pub use api::{send_check, send_run, ApiError, ApiErrorKind, ApiSettings, ApiTransport, ReqwestTransport};
pub use client::{ClientCommand, ClientEvent, ClientHandle};
