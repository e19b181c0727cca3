//! Wire types shared by the panel controller and the HTTP client.
mod check;
mod fields;
mod run;

pub use check::{CheckEntry, CheckResponse, Identifier};
pub use fields::{FieldId, StageKey};
pub use run::{strip_server_fields, tool_confidence, RunResponse, RunStatus, TimeInfo};
