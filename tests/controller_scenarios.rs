mod common;

use std::time::Duration;

use approx::assert_relative_eq;
use common::{catalog_entry, FixedResolver, StubCatalog};
use hifitime::Epoch;
use neotrack::{
    config::TrackerConfig,
    constants::{Position, EARTH_ELEMENTS},
    kepler::elements_to_position,
    controller::{OrbitController, SpawnOutcome},
    neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::ElementsUpdate,
    reconciler::AdmitResult,
    resolver::kepler_resolver::KeplerResolver,
};

const FRAME: Duration = Duration::from_millis(16);

fn fixed_controller(position: Position) -> OrbitController<FixedResolver, StubCatalog> {
    let catalog = StubCatalog::with([catalog_entry("2025AB", 500.0), catalog_entry("433", 16.8)]);
    OrbitController::new(FixedResolver::new(position), catalog, &TrackerConfig::default()).unwrap()
}

fn kepler_controller() -> OrbitController<KeplerResolver, StubCatalog> {
    let catalog = StubCatalog::with([catalog_entry("2025AB", 500.0)]);
    OrbitController::new(KeplerResolver, catalog, &TrackerConfig::default()).unwrap()
}

/// Tick once and resolve the request right away.
async fn tick<C>(controller: &mut OrbitController<FixedResolver, C>) -> AdmitResult<Position>
where
    C: neotrack::resolver::OrbitCatalog + Send + Sync + 'static,
{
    let request = controller.on_clock_tick(FRAME).unwrap();
    let result = controller.resolve_request(&request).await;
    controller.complete(request.sequence, result)
}

#[tokio::test]
async fn test_spawn_then_first_tick_fills_one_trail_point() {
    let expected = Position::new(10.0, 0.0, 0.0);
    let mut controller = fixed_controller(expected);

    let outcome = controller.spawn_target("2025AB").await.unwrap();
    assert_eq!(outcome, SpawnOutcome::Spawned);
    assert_eq!(controller.displayed_position(), Some(expected));
    assert!(controller.trail_snapshot().is_empty());

    assert_eq!(tick(&mut controller).await, AdmitResult::Applied(expected));

    let trail = controller.trail_snapshot();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0], expected);

    let frame = controller.frame();
    let target = frame.target.unwrap();
    assert_eq!(target.id, "2025AB");
    assert_eq!(target.diameter.mean(), 500.0);
    assert_eq!(frame.display_scale, TrackerConfig::default().display_scale(500.0));
}

#[tokio::test]
async fn test_spawn_trims_and_ignores_empty_designation() {
    let mut controller = fixed_controller(Position::new(1.0, 0.0, 0.0));

    assert_eq!(
        controller.spawn_target("   ").await.unwrap(),
        SpawnOutcome::Ignored
    );
    assert!(controller.elements().is_none());

    assert_eq!(
        controller.spawn_target("  433\n").await.unwrap(),
        SpawnOutcome::Spawned
    );
    assert_eq!(controller.frame().target.unwrap().id, "433");
}

#[tokio::test]
async fn test_failed_tick_keeps_last_position_and_trail() {
    let resolver = FixedResolver::new(Position::new(10.0, 0.0, 0.0));
    let failing = resolver.clone();
    let catalog = StubCatalog::with([catalog_entry("2025AB", 500.0)]);
    let mut controller =
        OrbitController::new(resolver, catalog, &TrackerConfig::default()).unwrap();

    controller.spawn_target("2025AB").await.unwrap();
    tick(&mut controller).await;
    let position_before = controller.displayed_position();
    let trail_before = controller.trail_snapshot();

    failing.set_failing(true);
    assert_eq!(tick(&mut controller).await, AdmitResult::Discarded);

    assert_eq!(controller.displayed_position(), position_before);
    assert_eq!(controller.trail_snapshot(), trail_before);
    assert_eq!(controller.state().reconciler().outstanding_len(), 0);

    // the simulation keeps running once the backend is back
    failing.set_failing(false);
    assert!(tick(&mut controller).await.is_applied());
    assert_eq!(controller.trail_snapshot().len(), 2);
}

#[tokio::test]
async fn test_failed_spawn_leaves_state_untouched() {
    let resolver = FixedResolver::new(Position::new(3.0, 0.0, 0.0));
    let catalog = StubCatalog::with([catalog_entry("2025AB", 500.0), catalog_entry("433", 16.8)]);
    let offline = catalog.clone();
    let failing = resolver.clone();
    let mut controller =
        OrbitController::new(resolver, catalog, &TrackerConfig::default()).unwrap();

    controller.spawn_target("2025AB").await.unwrap();
    tick(&mut controller).await;
    let frame_before = controller.frame();

    // unknown designation
    let err = controller.spawn_target("1999XX").await.unwrap_err();
    assert_eq!(err, NeoTrackError::TargetNotFound("1999XX".into()));

    // catalog unreachable
    offline.set_offline(true);
    assert!(controller.spawn_target("433").await.unwrap_err().is_network());
    offline.set_offline(false);

    // catalog fine, initial position fails
    failing.set_failing(true);
    assert!(controller.spawn_target("433").await.unwrap_err().is_network());
    failing.set_failing(false);

    let frame_after = controller.frame();
    assert_eq!(frame_after.target.unwrap().id, "2025AB");
    assert_eq!(frame_after.trail, frame_before.trail);
    assert_eq!(frame_after.position, frame_before.position);
    assert_eq!(frame_after.elements, frame_before.elements);
}

#[tokio::test]
async fn test_unbound_catalog_orbit_aborts_spawn() {
    let mut comet = catalog_entry("C2025", 2.0);
    comet.orbit.eccentricity = 1.02;
    let resolver = FixedResolver::new(Position::new(1.0, 0.0, 0.0));
    let calls = resolver.calls.clone();
    let mut controller = OrbitController::new(
        resolver,
        StubCatalog::with([comet]),
        &TrackerConfig::default(),
    )
    .unwrap();

    let err = controller.spawn_target("C2025").await.unwrap_err();
    assert!(err.is_validation());
    assert!(controller.elements().is_none());
    // elements are checked before any position request goes out
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_out_of_order_completions_keep_latest_input() {
    let mut controller = kepler_controller();
    controller.spawn_target("2025AB").await.unwrap();

    let request_a = controller
        .update_from_user_input(&ElementsUpdate::default().semi_major_axis(1.0))
        .unwrap();
    let request_b = controller
        .update_from_user_input(&ElementsUpdate::default().semi_major_axis(2.5))
        .unwrap();
    assert!(request_b.sequence > request_a.sequence);

    let future_a = controller.resolve_request(&request_a);
    let future_b = controller.resolve_request(&request_b);

    // B completes first, A arrives late
    let position_b = future_b.await.unwrap();
    let position_a = future_a.await.unwrap();
    assert_ne!(position_a, position_b);

    assert_eq!(
        controller.complete(request_b.sequence, Ok(position_b)),
        AdmitResult::Applied(position_b)
    );
    assert_eq!(
        controller.complete(request_a.sequence, Ok(position_a)),
        AdmitResult::Discarded
    );

    assert_eq!(controller.displayed_position(), Some(position_b));
    assert_eq!(&*controller.trail_snapshot(), &[position_b]);
}

#[tokio::test]
async fn test_in_flight_requests_go_stale_on_spawn() {
    let mut controller = fixed_controller(Position::new(10.0, 0.0, 0.0));
    controller.spawn_target("2025AB").await.unwrap();

    let old_request = controller.on_clock_tick(FRAME).unwrap();
    controller.spawn_target("433").await.unwrap();

    let admitted = controller.complete(old_request.sequence, Ok(Position::new(-1.0, 0.0, 0.0)));
    assert_eq!(admitted, AdmitResult::Discarded);
    assert!(controller.trail_snapshot().is_empty());
    assert_eq!(controller.displayed_position(), Some(Position::new(10.0, 0.0, 0.0)));
}

#[tokio::test]
async fn test_newer_spawn_supersedes_older_one() {
    let mut controller = fixed_controller(Position::new(10.0, 0.0, 0.0));

    let first = controller.begin_spawn("2025AB").unwrap();
    let second = controller.begin_spawn("433").unwrap();
    assert_eq!(first.target_id(), "2025AB");

    let second_result = controller.resolve_spawn_ticket(&second).await;
    let first_result = controller.resolve_spawn_ticket(&first).await;

    assert_eq!(
        controller.finish_spawn(&second, second_result).unwrap(),
        SpawnOutcome::Spawned
    );
    assert_eq!(
        controller.finish_spawn(&first, first_result).unwrap(),
        SpawnOutcome::Superseded
    );
    assert_eq!(controller.frame().target.unwrap().id, "433");
}

#[tokio::test]
async fn test_invalid_user_input_is_rejected_synchronously() {
    let mut controller = kepler_controller();
    assert_eq!(
        controller
            .update_from_user_input(&ElementsUpdate::default().eccentricity(0.3))
            .unwrap_err(),
        NeoTrackError::NoActiveTarget
    );

    controller.spawn_target("2025AB").await.unwrap();
    let issued_before = controller.state().reconciler().last_issued();

    let err = controller
        .update_from_user_input(&ElementsUpdate::default().eccentricity(1.5))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(controller.elements().unwrap().eccentricity, 0.25);
    assert_eq!(controller.state().reconciler().last_issued(), issued_before);
}

#[tokio::test]
async fn test_ticks_advance_mean_anomaly_with_elapsed_time() {
    let mut controller = kepler_controller();
    assert!(controller.on_clock_tick(FRAME).is_none());

    controller.spawn_target("2025AB").await.unwrap();
    let start = controller.elements().unwrap().mean_anomaly;

    let request = controller.on_clock_tick(Duration::from_millis(100)).unwrap();
    let rate = controller.config().degrees_per_second;
    assert_relative_eq!(request.elements.mean_anomaly, start + rate * 0.1, epsilon = 1e-9);

    controller.clock_mut().pause();
    assert!(controller.on_clock_tick(FRAME).is_none());
    controller.clock_mut().resume();

    // a long stall is capped to one max step
    let request = controller.on_clock_tick(Duration::from_secs(30)).unwrap();
    let max_step = controller.config().max_tick_step().as_secs_f64();
    assert_relative_eq!(
        request.elements.mean_anomaly,
        start + rate * (0.1 + max_step),
        epsilon = 1e-9
    );
}

#[tokio::test]
async fn test_trail_is_bounded_by_capacity() {
    let config = TrackerConfig {
        trail_capacity: 5,
        ..TrackerConfig::default()
    };
    let mut controller = OrbitController::new(
        KeplerResolver,
        StubCatalog::with([catalog_entry("2025AB", 500.0)]),
        &config,
    )
    .unwrap();
    controller.spawn_target("2025AB").await.unwrap();

    let mut admitted = Vec::new();
    for _ in 0..8 {
        let request = controller.on_clock_tick(FRAME).unwrap();
        let result = controller.resolve_request(&request).await;
        if let AdmitResult::Applied(position) = controller.complete(request.sequence, result) {
            admitted.push(position);
        }
    }

    assert_eq!(admitted.len(), 8);
    assert_eq!(&*controller.trail_snapshot(), &admitted[3..]);
}

#[tokio::test]
async fn test_orbit_scale_converts_positions() {
    let config = TrackerConfig {
        orbit_scale: 50.0,
        ..TrackerConfig::default()
    };
    let mut controller = OrbitController::new(
        FixedResolver::new(Position::new(0.25, -0.125, 0.0)),
        StubCatalog::with([catalog_entry("2025AB", 500.0)]),
        &config,
    )
    .unwrap();
    controller.spawn_target("2025AB").await.unwrap();
    assert_eq!(controller.displayed_position(), Some(Position::new(12.5, -6.25, 0.0)));

    tick(&mut controller).await;
    assert_eq!(controller.trail_snapshot()[0], Position::new(12.5, -6.25, 0.0));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = TrackerConfig {
        orbit_scale: 0.0,
        ..TrackerConfig::default()
    };
    let result = OrbitController::new(KeplerResolver, StubCatalog::default(), &config);
    assert!(matches!(result, Err(NeoTrackError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_rejected_clock_rate_keeps_ticks_valid() {
    let mut controller = kepler_controller();
    controller.spawn_target("2025AB").await.unwrap();

    assert!(controller
        .clock_mut()
        .set_degrees_per_second(f64::NAN)
        .unwrap_err()
        .is_validation());

    let request = controller.on_clock_tick(FRAME).unwrap();
    assert!(request.elements.validate().is_ok());
    let result = controller.resolve_request(&request).await;
    assert!(controller.complete(request.sequence, result).is_applied());
}

#[tokio::test]
async fn test_user_errors_are_published_with_the_frame() {
    let mut controller = fixed_controller(Position::new(10.0, 0.0, 0.0));

    // editing before any spawn
    assert!(controller
        .update_from_user_input(&ElementsUpdate::default().inclination(12.0))
        .is_err());
    let message = controller.frame().last_error.unwrap();
    assert!(message.contains("element update rejected"));

    controller.spawn_target("2025AB").await.unwrap();
    assert!(controller.frame().last_error.is_none());

    controller.spawn_target("1999XX").await.unwrap_err();
    let message = controller.frame().last_error.unwrap();
    assert!(message.contains("1999XX"));
    assert_eq!(controller.state().last_error(), Some(message.as_str()));

    controller
        .update_from_user_input(&ElementsUpdate::default().inclination(12.0))
        .unwrap();
    assert!(controller.frame().last_error.is_none());
}

#[tokio::test]
async fn test_earth_marker_at_target_epoch() {
    let config = TrackerConfig {
        orbit_scale: 50.0,
        ..TrackerConfig::default()
    };
    let mut controller = OrbitController::new(
        KeplerResolver,
        StubCatalog::with([catalog_entry("2025AB", 500.0)]),
        &config,
    )
    .unwrap();
    assert!(controller.frame().earth.is_none());

    controller.spawn_target("2025AB").await.unwrap();
    let earth = controller.frame().earth.unwrap();

    let epoch = Epoch::from_jde_tdb(controller.elements().unwrap().epoch.unwrap());
    let expected = elements_to_position(&EARTH_ELEMENTS.propagated_to(epoch).unwrap()).unwrap();
    assert_relative_eq!(earth, expected * 50.0, epsilon = 1e-9);
    assert_relative_eq!(earth.norm(), 50.0, epsilon = 1.0);
    assert_eq!(controller.state().earth_position(), Some(earth));
}
