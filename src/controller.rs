//! # Orbit controller
//!
//! [`OrbitController`] is the coordinator of the simulation. It owns the
//! [`SimulationState`] and exposes the three mutation entry points of the event loop:
//!
//! 1. **Spawn** a target from its catalog designation
//!    ([`begin_spawn`](OrbitController::begin_spawn) /
//!    [`finish_spawn`](OrbitController::finish_spawn), or
//!    [`spawn_target`](OrbitController::spawn_target) in one call).
//! 2. **User input** editing the elements
//!    ([`update_from_user_input`](OrbitController::update_from_user_input)).
//! 3. **Clock tick** advancing the mean anomaly
//!    ([`on_clock_tick`](OrbitController::on_clock_tick)).
//!
//! Input and ticks return a [`PendingRequest`]; the caller resolves it (usually on a
//! spawned task, see [`resolve_request`](OrbitController::resolve_request)) and hands the
//! outcome back to [`complete`](OrbitController::complete), where the
//! [`RequestReconciler`] decides whether it may reach the trail and the display.
//!
//! ## Spawn transaction
//!
//! A spawn only changes the state once the catalog lookup **and** the initial position
//! have both succeeded. The reset then replaces the elements, clears the trail and makes
//! every outstanding request stale. A newer spawn supersedes an older one still in
//! flight.
//!
//! ## Errors
//!
//! - Validation errors are returned synchronously and block the mutation.
//! - Failed tick or input resolutions are logged and skipped; the last admitted position
//!   stays on display.
//! - Failed spawns return the error and leave the previous target running.
//!
//! Errors of user-triggered operations (spawns and element edits) are also kept as the
//! [`last_error`](SimulationState::last_error) of the state and published with every
//! [`RenderFrame`], until the next successful spawn or edit.

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    clock::SimulationClock,
    config::TrackerConfig,
    constants::{Position, EARTH_ELEMENTS},
    kepler::elements_to_position,
    neotrack_errors::NeoTrackError,
    orbit_state::OrbitState,
    orbit_type::keplerian_element::{ElementsUpdate, OrbitalElements},
    reconciler::{AdmitResult, PendingRequest, RequestReconciler, SequenceId},
    resolver::{
        catalog::{CatalogEntry, TargetInfo},
        OrbitCatalog, PositionResolver,
    },
    trail::{TrailBuffer, TrailSnapshot},
};

/// Everything the simulation mutates, owned by a single event context.
#[derive(Debug, Clone)]
pub struct SimulationState {
    orbit: OrbitState,
    trail: TrailBuffer<Position>,
    reconciler: RequestReconciler,
    displayed: Option<Position>,
    target: Option<Arc<TargetInfo>>,
    earth: Option<Position>,
    last_error: Option<String>,
}

impl SimulationState {
    pub fn new(trail_capacity: usize) -> Self {
        SimulationState {
            orbit: OrbitState::new(),
            trail: TrailBuffer::new(trail_capacity),
            reconciler: RequestReconciler::new(),
            displayed: None,
            target: None,
            earth: None,
            last_error: None,
        }
    }

    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }

    pub fn trail(&self) -> &TrailBuffer<Position> {
        &self.trail
    }

    pub fn reconciler(&self) -> &RequestReconciler {
        &self.reconciler
    }

    pub fn displayed_position(&self) -> Option<Position> {
        self.displayed
    }

    pub fn target(&self) -> Option<&Arc<TargetInfo>> {
        self.target.as_ref()
    }

    /// Earth at the epoch of the target elements, in scene units.
    pub fn earth_position(&self) -> Option<Position> {
        self.earth
    }

    /// Last failed spawn or rejected element edit, for the UI.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the target. The elements are validated before anything is touched.
    fn reset(
        &mut self,
        entry: &CatalogEntry,
        display_scale: f64,
        initial_position: Position,
        earth: Option<Position>,
    ) -> Result<u64, NeoTrackError> {
        let revision = self.orbit.reset(entry.orbit, display_scale)?;
        self.trail.clear();
        self.reconciler.invalidate_outstanding();
        self.displayed = Some(initial_position);
        self.target = Some(Arc::new(TargetInfo::from(entry)));
        self.earth = earth;
        self.last_error = None;
        Ok(revision)
    }

    fn admit(&mut self, sequence: SequenceId, position: Position) -> AdmitResult<Position> {
        let admitted = self.reconciler.admit(sequence, position);
        if let AdmitResult::Applied(position) = admitted {
            self.displayed = Some(position);
            self.trail.append(position);
        }
        admitted
    }
}

/// Handle of a spawn in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTicket {
    generation: u64,
    target_id: String,
}

impl SpawnTicket {
    pub fn target_id(&self) -> &str {
        &self.target_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The target replaced the previous one
    Spawned,
    /// A newer spawn was requested meanwhile, this one was dropped
    Superseded,
    /// The designation was empty after trimming
    Ignored,
}

/// State published to the renderer after every tick.
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    pub position: Option<Position>,
    pub trail: TrailSnapshot<Position>,
    pub display_scale: f64,
    pub elements: Option<OrbitalElements>,
    pub target: Option<Arc<TargetInfo>>,
    /// Reference marker for the Earth, placed at the epoch of the target elements
    pub earth: Option<Position>,
    pub last_error: Option<String>,
}

/// Catalog lookup followed by the initial position of the target.
///
/// The catalog elements are validated before the position request is issued.
pub async fn resolve_spawn<R, C>(
    resolver: &R,
    catalog: &C,
    target_id: &str,
) -> Result<(CatalogEntry, Position), NeoTrackError>
where
    R: PositionResolver,
    C: OrbitCatalog,
{
    let mut entry = catalog.lookup(target_id).await?;
    entry.orbit = entry.orbit.normalized()?;
    let position = resolver.resolve(entry.orbit).await?;
    Ok((entry, position))
}

/// Position of the Earth at the epoch of `orbit`, scaled to scene units.
///
/// Elements without an epoch get the J2000 Earth. A failure only costs the marker.
fn earth_marker(orbit: &OrbitalElements, orbit_scale: f64) -> Option<Position> {
    let earth = match orbit.reference_epoch() {
        Some(epoch) => EARTH_ELEMENTS.propagated_to(epoch),
        None => Ok(EARTH_ELEMENTS),
    };
    match earth.and_then(|earth| elements_to_position(&earth)) {
        Ok(position) => Some(position * orbit_scale),
        Err(err) => {
            warn!(error = %err, "cannot place the Earth marker");
            None
        }
    }
}

#[derive(Debug)]
pub struct OrbitController<R, C> {
    resolver: Arc<R>,
    catalog: Arc<C>,
    config: TrackerConfig,
    clock: SimulationClock,
    state: SimulationState,
    spawn_generation: u64,
}

impl<R, C> OrbitController<R, C>
where
    R: PositionResolver,
    C: OrbitCatalog,
{
    /// Create a controller with no target.
    ///
    /// Return
    /// ------
    /// * The controller, or [`NeoTrackError::InvalidConfig`] if `config` is rejected.
    pub fn new(resolver: R, catalog: C, config: &TrackerConfig) -> Result<Self, NeoTrackError> {
        config.validate()?;
        Ok(OrbitController {
            resolver: Arc::new(resolver),
            catalog: Arc::new(catalog),
            config: config.clone(),
            clock: SimulationClock::new(config.degrees_per_second, config.max_tick_step()),
            state: SimulationState::new(config.trail_capacity),
            spawn_generation: 0,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    pub fn elements(&self) -> Option<&OrbitalElements> {
        self.state.orbit.elements()
    }

    pub fn displayed_position(&self) -> Option<Position> {
        self.state.displayed
    }

    pub fn trail_snapshot(&self) -> TrailSnapshot<Position> {
        self.state.trail.snapshot()
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame {
            position: self.state.displayed,
            trail: self.state.trail.snapshot(),
            display_scale: self.state.orbit.display_scale(),
            elements: self.state.orbit.elements().copied(),
            target: self.state.target.clone(),
            earth: self.state.earth,
            last_error: self.state.last_error.clone(),
        }
    }

    /// Start a spawn for `raw_target_id`.
    ///
    /// Return
    /// ------
    /// * `None` when the trimmed designation is empty (no-op).
    /// * A ticket superseding any spawn still in flight otherwise.
    pub fn begin_spawn(&mut self, raw_target_id: &str) -> Option<SpawnTicket> {
        let target_id = raw_target_id.trim();
        if target_id.is_empty() {
            return None;
        }
        self.spawn_generation += 1;
        Some(SpawnTicket {
            generation: self.spawn_generation,
            target_id: target_id.to_string(),
        })
    }

    /// Apply the outcome of the spawn started with `ticket`.
    ///
    /// On any error the state is left exactly as it was.
    pub fn finish_spawn(
        &mut self,
        ticket: &SpawnTicket,
        result: Result<(CatalogEntry, Position), NeoTrackError>,
    ) -> Result<SpawnOutcome, NeoTrackError> {
        if ticket.generation != self.spawn_generation {
            debug!(target_id = %ticket.target_id, "dropping superseded spawn");
            return Ok(SpawnOutcome::Superseded);
        }

        let applied = result.and_then(|(entry, position)| {
            let display_scale = self.config.display_scale(entry.diameter.mean());
            let earth = earth_marker(&entry.orbit, self.config.orbit_scale);
            self.state
                .reset(
                    &entry,
                    display_scale,
                    position * self.config.orbit_scale,
                    earth,
                )
                .map(|_| entry)
        });

        match applied {
            Ok(entry) => {
                info!(
                    target_id = %ticket.target_id,
                    name = %entry.name,
                    hazardous = entry.hazardous,
                    "spawned target"
                );
                Ok(SpawnOutcome::Spawned)
            }
            Err(err) => {
                warn!(target_id = %ticket.target_id, error = %err, "spawn aborted");
                self.state.last_error =
                    Some(format!("spawn of {} failed: {err}", ticket.target_id));
                Err(err)
            }
        }
    }

    /// Spawn `raw_target_id`, awaiting the catalog and the initial position inline.
    pub async fn spawn_target(
        &mut self,
        raw_target_id: &str,
    ) -> Result<SpawnOutcome, NeoTrackError> {
        let Some(ticket) = self.begin_spawn(raw_target_id) else {
            return Ok(SpawnOutcome::Ignored);
        };
        let result = resolve_spawn(&*self.resolver, &*self.catalog, &ticket.target_id).await;
        self.finish_spawn(&ticket, result)
    }

    /// Merge a user edit into the elements and issue a position request for it.
    ///
    /// Earlier requests are not awaited: whichever resolves last, the reconciler only
    /// lets this one or a newer one reach the display.
    pub fn update_from_user_input(
        &mut self,
        update: &ElementsUpdate,
    ) -> Result<PendingRequest, NeoTrackError> {
        if let Err(err) = self.state.orbit.set_elements(update) {
            self.state.last_error = Some(format!("element update rejected: {err}"));
            return Err(err);
        }
        let elements = *self
            .state
            .orbit
            .elements()
            .ok_or(NeoTrackError::NoActiveTarget)?;
        self.state.last_error = None;
        Ok(self.state.reconciler.issue(elements))
    }

    /// Advance the mean anomaly for a frame of length `elapsed`.
    ///
    /// Return
    /// ------
    /// * The position request for the advanced elements, or `None` when no target is
    ///   active or the clock is paused.
    pub fn on_clock_tick(&mut self, elapsed: Duration) -> Option<PendingRequest> {
        if self.clock.is_paused() {
            return None;
        }
        let delta = self.clock.step(elapsed);
        let elements = self.state.orbit.advance(delta)?;
        Some(self.state.reconciler.issue(elements))
    }

    /// Hand back the resolution of request `sequence`.
    ///
    /// Positions are converted to scene units with `orbit_scale` before admission. A
    /// failed resolution is logged and reported as [`AdmitResult::Discarded`].
    pub fn complete(
        &mut self,
        sequence: SequenceId,
        result: Result<Position, NeoTrackError>,
    ) -> AdmitResult<Position> {
        match result {
            Ok(position) => {
                let admitted = self.state.admit(sequence, position * self.config.orbit_scale);
                if !admitted.is_applied() {
                    debug!(sequence, "discarding stale position");
                }
                admitted
            }
            Err(err) => {
                if self.state.reconciler.reject(sequence).is_some() {
                    warn!(sequence, error = %err, "position request failed, keeping last position");
                }
                AdmitResult::Discarded
            }
        }
    }
}

impl<R, C> OrbitController<R, C>
where
    R: PositionResolver + Send + Sync + 'static,
    C: OrbitCatalog + Send + Sync + 'static,
{
    /// Detached future resolving `request`, suitable for `tokio::spawn`.
    pub fn resolve_request(
        &self,
        request: &PendingRequest,
    ) -> impl Future<Output = Result<Position, NeoTrackError>> + Send + 'static {
        let resolver = Arc::clone(&self.resolver);
        let elements = request.elements;
        async move { resolver.resolve(elements).await }
    }

    /// Detached future performing the lookups of the spawn `ticket`.
    pub fn resolve_spawn_ticket(
        &self,
        ticket: &SpawnTicket,
    ) -> impl Future<Output = Result<(CatalogEntry, Position), NeoTrackError>> + Send + 'static
    {
        let resolver = Arc::clone(&self.resolver);
        let catalog = Arc::clone(&self.catalog);
        let target_id = ticket.target_id.clone();
        async move { resolve_spawn(&*resolver, &*catalog, &target_id).await }
    }
}
