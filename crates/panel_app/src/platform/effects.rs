//! Routes controller effects to the page surface and the HTTP client.

use panel_client::{ApiError, ClientCommand, ClientEvent, ClientHandle};
use panel_core::{ApiFailure, Effect, Msg};
use panel_logging::panel_warn;

use crate::platform::surface::PageSurface;

/// Applies one batch of effects: `Send*` effects become client commands,
/// everything else lands on the surface.
pub struct EffectRunner {
    client: ClientHandle,
    surface: PageSurface,
}

impl EffectRunner {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            surface: PageSurface::new(),
        }
    }

    pub fn surface(&self) -> &PageSurface {
        &self.surface
    }

    pub fn run_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::SendCheck {
                field,
                generation,
                body,
            } => {
                self.client.send(ClientCommand::Check {
                    field,
                    generation,
                    body,
                });
            }
            Effect::SendRun {
                stage,
                generation,
                body,
            } => {
                self.client.send(ClientCommand::Run {
                    stage,
                    generation,
                    body,
                });
            }
            other => self.surface.apply(&other),
        }
    }

    /// Drains one completed request, if any, as a controller message.
    pub fn poll(&self) -> Option<Msg> {
        self.client.try_recv().map(to_msg)
    }
}

/// Converts a client completion into the corresponding message. Transport
/// and decode errors carry no usable body, so they map to an empty
/// [`ApiFailure`] and the controller falls back to its generic error text.
fn to_msg(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::CheckCompleted {
            field,
            generation,
            result,
        } => Msg::CheckCompleted {
            field,
            generation,
            outcome: result.map_err(api_failure),
        },
        ClientEvent::RunCompleted {
            stage,
            generation,
            result,
        } => Msg::RunCompleted {
            stage,
            generation,
            outcome: result.map_err(api_failure),
        },
    }
}

fn api_failure(err: ApiError) -> ApiFailure {
    panel_warn!("Request failed: {}", err);
    ApiFailure::default()
}
