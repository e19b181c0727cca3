use std::sync::{mpsc, Arc};
use std::thread;

use panel_logging::panel_warn;
use panel_protocol::{CheckResponse, FieldId, RunResponse, StageKey};
use serde_json::Value;

use crate::api::{send_check, send_run, ApiError, ApiTransport};

/// One request routed from a `SendCheck`/`SendRun` effect.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    Check {
        field: FieldId,
        generation: u64,
        body: Value,
    },
    Run {
        stage: StageKey,
        generation: u64,
        body: Value,
    },
}

/// Completion of one request, carrying the generation it was issued under.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    CheckCompleted {
        field: FieldId,
        generation: u64,
        result: Result<CheckResponse, ApiError>,
    },
    RunCompleted {
        stage: StageKey,
        generation: u64,
        result: Result<RunResponse, ApiError>,
    },
}

/// Handle to the request-running thread.
///
/// Commands go in over a channel; each one is spawned as an independent
/// task on the handle's tokio runtime, so overlapping requests never block
/// each other. Completions come back in arrival order via `try_recv`.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>();
        let (event_tx, event_rx) = mpsc::channel::<ClientEvent>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    panel_warn!("Could not start client runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let transport = transport.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(transport.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    transport: &dyn ApiTransport,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::Check {
            field,
            generation,
            body,
        } => {
            let result = send_check(transport, field, &body).await;
            let _ = event_tx.send(ClientEvent::CheckCompleted {
                field,
                generation,
                result,
            });
        }
        ClientCommand::Run {
            stage,
            generation,
            body,
        } => {
            let result = send_run(transport, &body).await;
            let _ = event_tx.send(ClientEvent::RunCompleted {
                stage,
                generation,
                result,
            });
        }
    }
}
