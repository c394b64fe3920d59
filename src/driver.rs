//! # Orbit driver
//!
//! Cooperative event loop around an [`OrbitController`]. The controller lives on the
//! driver task only; every mutation happens there, in arrival order:
//!
//! - frame ticks from a [`tokio::time::interval`] (missed ticks are skipped, the real
//!   elapsed time is handed to the clock),
//! - user events from the [`InputPort`],
//! - completions of the resolutions running on spawned tasks, in whatever order they
//!   finish.
//!
//! After every event the current [`RenderFrame`] is published on a
//! [`tokio::sync::watch`] channel for the renderer. The loop ends once every
//! [`InputPort`] clone has been dropped and gives the controller back.
//!
//! ```rust,no_run
//! use neotrack::config::TrackerConfig;
//! use neotrack::controller::OrbitController;
//! use neotrack::driver::OrbitDriver;
//! use neotrack::env_state::TrackerEnv;
//!
//! # async fn run() -> Result<(), neotrack::neotrack_errors::NeoTrackError> {
//! let config = TrackerConfig::from_env()?;
//! let env = TrackerEnv::new(&config)?;
//! let controller = OrbitController::new(env.position_resolver()?, env.catalog()?, &config)?;
//!
//! let (driver, input, frames) = OrbitDriver::new(controller, config.frame_interval());
//! let task = tokio::spawn(driver.run());
//! input.on_spawn_requested("99942")?;
//! # drop((input, frames, task));
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    constants::Position,
    controller::{OrbitController, RenderFrame, SpawnTicket},
    neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::ElementsUpdate,
    reconciler::{PendingRequest, SequenceId},
    resolver::{catalog::CatalogEntry, OrbitCatalog, PositionResolver},
};

/// Events produced by the UI collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    SliderChanged(ElementsUpdate),
    SpawnRequested(String),
    SetPaused(bool),
}

/// Sending side of the user input, handed to the UI layer.
#[derive(Debug, Clone)]
pub struct InputPort {
    events: mpsc::UnboundedSender<InputEvent>,
}

impl InputPort {
    /// Queue a slider edit. Out-of-domain values are rejected here, synchronously.
    pub fn on_slider_change(&self, update: ElementsUpdate) -> Result<(), NeoTrackError> {
        update.validate()?;
        self.send(InputEvent::SliderChanged(update))
    }

    /// Queue a spawn. A designation that is empty once trimmed is ignored.
    pub fn on_spawn_requested(&self, target_id: &str) -> Result<(), NeoTrackError> {
        let target_id = target_id.trim();
        if target_id.is_empty() {
            return Ok(());
        }
        self.send(InputEvent::SpawnRequested(target_id.to_string()))
    }

    pub fn on_pause_toggled(&self, paused: bool) -> Result<(), NeoTrackError> {
        self.send(InputEvent::SetPaused(paused))
    }

    fn send(&self, event: InputEvent) -> Result<(), NeoTrackError> {
        self.events
            .send(event)
            .map_err(|_| NeoTrackError::ChannelClosed)
    }
}

enum Completion {
    Position {
        sequence: SequenceId,
        result: Result<Position, NeoTrackError>,
    },
    Spawn {
        ticket: SpawnTicket,
        result: Result<(CatalogEntry, Position), NeoTrackError>,
    },
}

pub struct OrbitDriver<R, C> {
    controller: OrbitController<R, C>,
    inputs: mpsc::UnboundedReceiver<InputEvent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    frames: watch::Sender<RenderFrame>,
    frame_interval: Duration,
}

impl<R, C> OrbitDriver<R, C>
where
    R: PositionResolver + Send + Sync + 'static,
    C: OrbitCatalog + Send + Sync + 'static,
{
    /// Wrap `controller` into a driver ticking every `frame_interval`.
    ///
    /// Return
    /// ------
    /// * The driver, to be consumed by [`OrbitDriver::run`].
    /// * The input port for the UI layer.
    /// * The receiving side of the render frames.
    pub fn new(
        controller: OrbitController<R, C>,
        frame_interval: Duration,
    ) -> (Self, InputPort, watch::Receiver<RenderFrame>) {
        let (events_tx, inputs) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (frames, frames_rx) = watch::channel(controller.frame());

        let driver = OrbitDriver {
            controller,
            inputs,
            completions_tx,
            completions_rx,
            frames,
            frame_interval,
        };
        (driver, InputPort { events: events_tx }, frames_rx)
    }

    /// Run until every [`InputPort`] is dropped, then return the controller.
    pub async fn run(mut self) -> OrbitController<R, C> {
        let mut ticker = time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                biased;

                Some(completion) = self.completions_rx.recv() => {
                    self.handle_completion(completion);
                    self.publish();
                }
                event = self.inputs.recv() => match event {
                    Some(event) => {
                        self.handle_input(event);
                        self.publish();
                    }
                    None => break,
                },
                now = ticker.tick() => {
                    let elapsed = now.saturating_duration_since(last_tick);
                    last_tick = now;
                    if let Some(request) = self.controller.on_clock_tick(elapsed) {
                        self.dispatch(request);
                    }
                    self.publish();
                }
            }
        }

        info!("input port closed, stopping orbit driver");
        self.controller
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::SliderChanged(update) => {
                match self.controller.update_from_user_input(&update) {
                    Ok(request) => self.dispatch(request),
                    Err(err) => warn!(error = %err, "rejected element update"),
                }
            }
            InputEvent::SpawnRequested(target_id) => {
                if let Some(ticket) = self.controller.begin_spawn(&target_id) {
                    let lookup = self.controller.resolve_spawn_ticket(&ticket);
                    let completions = self.completions_tx.clone();
                    tokio::spawn(async move {
                        let result = lookup.await;
                        let _ = completions.send(Completion::Spawn { ticket, result });
                    });
                }
            }
            InputEvent::SetPaused(true) => self.controller.clock_mut().pause(),
            InputEvent::SetPaused(false) => self.controller.clock_mut().resume(),
        }
    }

    fn dispatch(&self, request: PendingRequest) {
        let resolution = self.controller.resolve_request(&request);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = resolution.await;
            let _ = completions.send(Completion::Position {
                sequence: request.sequence,
                result,
            });
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Position { sequence, result } => {
                self.controller.complete(sequence, result);
            }
            Completion::Spawn { ticket, result } => {
                // a failure is already logged and carried by the next frame
                if let Ok(outcome) = self.controller.finish_spawn(&ticket, result) {
                    debug!(target_id = ticket.target_id(), ?outcome, "spawn completed");
                }
            }
        }
    }

    fn publish(&self) {
        self.frames.send_replace(self.controller.frame());
    }
}
