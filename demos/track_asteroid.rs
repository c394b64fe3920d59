//! Track one near-Earth object against a running orbital backend.
//!
//! ```text
//! RUST_LOG=neotrack=debug cargo run --example track_asteroid -- 3542519 10
//! ```
//!
//! The first argument is the catalog designation, the second the number of seconds to
//! run. The backend location and the tick parameters come from the `NEOTRACK_*`
//! environment variables (see [`TrackerConfig::from_env`]).

use std::time::Duration;

use neotrack::{
    config::TrackerConfig, controller::OrbitController, driver::OrbitDriver,
    env_state::TrackerEnv,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let target_id = args.next().unwrap_or_else(|| "3542519".to_string());
    let run_for = Duration::from_secs(args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(10));

    let config = TrackerConfig::from_env()?;
    let env = TrackerEnv::new(&config)?;
    let controller = OrbitController::new(env.position_resolver()?, env.catalog()?, &config)?;

    let (driver, input, mut frames) = OrbitDriver::new(controller, config.frame_interval());
    let task = tokio::spawn(driver.run());

    input.on_spawn_requested(&target_id)?;

    let deadline = tokio::time::sleep(run_for);
    tokio::pin!(deadline);
    let mut shown = 0usize;
    let mut last_error: Option<String> = None;
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                if frame.last_error != last_error {
                    if let Some(message) = &frame.last_error {
                        eprintln!("error: {message}");
                    }
                    last_error = frame.last_error.clone();
                }
                let (Some(position), Some(target)) = (frame.position, frame.target.as_ref()) else {
                    continue;
                };
                shown += 1;
                // one line every ~30 frames is plenty for a terminal
                if shown % 30 == 1 {
                    println!(
                        "{} ({}{}) pos = [{:.4}, {:.4}, {:.4}] trail = {} pts / {:.4} scale = {:.3}",
                        target.name,
                        target.id,
                        if target.hazardous { ", hazardous" } else { "" },
                        position.x,
                        position.y,
                        position.z,
                        frame.trail.len(),
                        frame.trail.path_length(),
                        frame.display_scale,
                    );
                    if let Some(earth) = frame.earth {
                        println!("  distance to Earth at epoch = {:.4}", (position - earth).norm());
                    }
                }
            }
        }
    }

    drop(input);
    let controller = task.await?;
    if let Some(elements) = controller.elements() {
        println!("final elements: {elements:?}");
    }
    Ok(())
}
