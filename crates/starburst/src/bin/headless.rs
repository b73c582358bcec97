//! # STARBURST Headless
//!
//! Runs the show against the headless renderer on a simulated 60 Hz clock
//! and logs a summary once per simulated second.
//!
//! ```bash
//! starburst_headless [config.toml] [--seconds N] [--lose-context-at S]
//! RUST_LOG=starburst=debug starburst_headless config/show.toml
//! ```

use std::process::ExitCode;

use starburst::rendering::{HeadlessRenderer, TickOutcome};
use starburst::{ShowBuilder, ShowConfig};

const TICK_RATE: u32 = 60;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    let flag = |name: &str| -> Option<f64> {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .and_then(|s| s.parse().ok())
    };
    let seconds = flag("--seconds").unwrap_or(10.0);
    let lose_context_at = flag("--lose-context-at");
    let config_path = args.get(1).filter(|a| !a.starts_with("--"));

    let config = match config_path {
        Some(path) => ShowConfig::load(path),
        None => Ok(ShowConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let renderer = HeadlessRenderer::new(config.show.width, config.show.height);
    let mut driver = match ShowBuilder::new(config).build(renderer) {
        Ok(driver) => driver,
        Err(e) => {
            tracing::error!(error = %e, "failed to start show");
            return ExitCode::FAILURE;
        }
    };

    let total_ticks = (seconds * f64::from(TICK_RATE)).max(0.0) as u64;
    let lost_tick = lose_context_at.map(|s| (s * f64::from(TICK_RATE)) as u64);
    let mut suspended_ticks = 0u64;

    for tick in 0..total_ticks {
        let now = tick as f64 / f64::from(TICK_RATE);

        if Some(tick) == lost_tick {
            driver.renderer_mut().lose_context();
        }

        match driver.frame(now) {
            Ok(TickOutcome::Rendered(_)) => {}
            Ok(TickOutcome::Suspended) => {
                suspended_ticks += 1;
                // Bring the context back after half a second
                if suspended_ticks == u64::from(TICK_RATE / 2) {
                    if let Err(e) = driver.on_context_restored() {
                        tracing::error!(error = %e, "context restore failed");
                        return ExitCode::FAILURE;
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "frame failed");
                return ExitCode::FAILURE;
            }
        }

        if (tick + 1) % u64::from(TICK_RATE) == 0 {
            let pool = driver.pool().stats();
            tracing::info!(
                second = (tick + 1) / u64::from(TICK_RATE),
                active = pool.active,
                allocated = pool.allocated,
                visible = driver.renderer().visible_instances(),
                on_screen = driver.renderer().on_screen_instances(),
                rockets = driver.stats().rockets_launched,
                explosions = driver.stats().explosions,
                "show summary"
            );
        }
    }

    let stats = driver.stats();
    tracing::info!(
        frames = stats.total_frames,
        rockets = stats.rockets_launched,
        explosions = stats.explosions,
        clamped = stats.clamped_frames,
        context_losses = stats.context_losses,
        suspended_ticks,
        "show finished"
    );
    ExitCode::SUCCESS
}
