//! Headless driver: builds the controller state, dispatches the requested
//! actions and pumps request completions until the panel settles.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use panel_client::{ApiSettings, ClientHandle, ReqwestTransport};
use panel_core::{update, ControlEdit, FieldPhase, Msg, PanelState};
use panel_logging::{panel_debug, panel_info, LogDestination};
use panel_protocol::{FieldId, StageKey};

use crate::platform::defaults;
use crate::platform::effects::EffectRunner;

const PAGE_PATH: &str = "/pub2tools";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Parser)]
#[command(name = "panel", about = "Drive the tool-extraction panel against a server")]
struct Cli {
    /// Server base URL.
    #[arg(long, default_value = "http://localhost:8080/pub2tools")]
    server: String,

    /// Set a parameter control, as `id=value` (repeatable). Checkboxes take
    /// true/false, multi-selects a comma-separated value list.
    #[arg(long = "set", value_name = "ID=VALUE")]
    sets: Vec<String>,

    /// Publication ids input (PMID/PMCID/DOI).
    #[arg(long = "pub", value_name = "IDS")]
    publication_ids: Option<String>,

    /// Tool name input.
    #[arg(long)]
    name: Option<String>,

    /// Webpage URLs input.
    #[arg(long = "web", value_name = "URLS")]
    webpage_urls: Option<String>,

    /// Annotations input.
    #[arg(long)]
    annotations: Option<String>,

    /// Seed the results editor from a JSON file before running.
    #[arg(long, value_name = "FILE")]
    tool: Option<PathBuf>,

    /// Pipeline stage to run: withoutmap, map or all.
    #[arg(long, value_name = "STAGE")]
    step: Option<String>,

    /// Log to the terminal as well as panel.log.
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn field_inputs(&self) -> Vec<(FieldId, &str)> {
        let mut inputs = Vec::new();
        if let Some(value) = &self.publication_ids {
            inputs.push((FieldId::PublicationIds, value.as_str()));
        }
        if let Some(value) = &self.name {
            inputs.push((FieldId::ToolName, value.as_str()));
        }
        if let Some(value) = &self.webpage_urls {
            inputs.push((FieldId::WebpageUrls, value.as_str()));
        }
        if let Some(value) = &self.annotations {
            inputs.push((FieldId::Annotations, value.as_str()));
        }
        inputs
    }
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    panel_logging::initialize(if cli.verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    });

    let settings = ApiSettings {
        base_url: cli.server.clone(),
        ..ApiSettings::default()
    };
    // Leave headroom past the request timeout before giving up on a reply.
    let deadline = settings.request_timeout + Duration::from_secs(30);
    let transport = ReqwestTransport::new(settings).map_err(|err| anyhow!("{err}"))?;
    let mut runner = EffectRunner::new(ClientHandle::new(Arc::new(transport)));

    let mut state = PanelState::new(defaults::page_form(), PAGE_PATH, "");

    for raw in &cli.sets {
        let (id, value) = raw
            .split_once('=')
            .with_context(|| format!("--set takes id=value, got {raw:?}"))?;
        let msg = param_edit(&state, id, value)?;
        state = dispatch(state, msg, &mut runner);
    }

    if let Some(path) = &cli.tool {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        state = dispatch(state, Msg::ResultsEdited { text }, &mut runner);
    }

    for (field, value) in cli.field_inputs() {
        state = dispatch(
            state,
            Msg::FieldEdited {
                field,
                value: value.to_string(),
            },
            &mut runner,
        );
    }

    state = pump(state, &mut runner, deadline)?;

    if let Some(raw) = &cli.step {
        let stage =
            StageKey::parse(raw).ok_or_else(|| anyhow!("unknown pipeline stage {raw:?}"))?;
        state = dispatch(state, Msg::RunClicked { stage }, &mut runner);
        state = pump(state, &mut runner, deadline)?;
    }

    println!("{}", state.page_href());
    print!("{}", runner.surface().report());
    Ok(())
}

/// Maps a `--set` argument onto the matching control's edit message.
fn param_edit(state: &PanelState, id: &str, value: &str) -> anyhow::Result<Msg> {
    let control = state
        .form()
        .control(id)
        .ok_or_else(|| anyhow!("unknown parameter control {id:?}"))?;
    let edit = defaults::edit_for(control, value)
        .ok_or_else(|| anyhow!("invalid value {value:?} for control {id:?}"))?;
    Ok(Msg::ParamEdited {
        id: id.to_string(),
        edit,
    })
}

fn dispatch(state: PanelState, msg: Msg, runner: &mut EffectRunner) -> PanelState {
    panel_debug!("Dispatching {:?}", msg);
    let (state, effects) = update(state, msg);
    runner.run_all(effects);
    state
}

/// Polls request completions until nothing is pending any more.
fn pump(
    mut state: PanelState,
    runner: &mut EffectRunner,
    deadline: Duration,
) -> anyhow::Result<PanelState> {
    let started = Instant::now();
    while has_pending(&state) {
        if started.elapsed() > deadline {
            bail!("gave up waiting for the server after {:?}", deadline);
        }
        match runner.poll() {
            Some(msg) => {
                state = dispatch(state, msg, runner);
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    }
    panel_info!("Panel settled after {:?}", started.elapsed());
    Ok(state)
}

fn has_pending(state: &PanelState) -> bool {
    state.run_pending().is_some()
        || FieldId::ALL
            .into_iter()
            .any(|field| state.field(field).phase() == FieldPhase::Pending)
}
