use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use overlay_core::{
    CenterWeatherState, Config, Coordinate, NationwideCache, OverlayController, RegionCatalog,
    ViewportTracker, codes, render::project_markers, source_from_config,
};

use crate::{
    console::{ConsoleRenderer, format_marker, format_panel},
    script::{Step, parse_script},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-overlay", version, about = "Weather map overlay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit endpoint, zoom threshold and timings.
    Configure,

    /// Show current weather at a single point, as the center panel would.
    Center {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Fetch every catalog region in one batch and list the markers.
    Nationwide,

    /// Drive the overlay controller through a scripted map session.
    Simulate {
        /// Steps separated by `;`: `pan LAT LON`, `zoom Z`, `wait MS`, `refresh`.
        #[arg(long, default_value = "zoom 8; wait 400; pan 35.681 139.767; wait 400; zoom 14")]
        script: String,

        /// Print every marker instead of a summary line per redraw.
        #[arg(long)]
        verbose: bool,
    },

    /// List the weather code table.
    Legend,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Center { lat, lon } => center(lat, lon).await,
            Command::Nationwide => nationwide().await,
            Command::Simulate { script, verbose } => simulate(&script, verbose).await,
            Command::Legend => {
                legend();
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    cfg.endpoint = Text::new("Forecast endpoint:").with_default(&cfg.endpoint).prompt()?;
    cfg.timezone = Text::new("Timezone:").with_default(&cfg.timezone).prompt()?;
    cfg.zoom_threshold = CustomType::<u8>::new("Show nationwide markers at zoom ≤")
        .with_default(cfg.zoom_threshold)
        .with_error_message("Enter a zoom level between 0 and 255")
        .prompt()?;
    cfg.debounce_ms = CustomType::<u64>::new("Center refresh delay (ms):")
        .with_default(cfg.debounce_ms)
        .prompt()?;
    cfg.request_timeout_secs = CustomType::<u64>::new("Request timeout (s):")
        .with_default(cfg.request_timeout_secs)
        .prompt()?;

    cfg.validate()?;
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn center(lat: f64, lon: f64) -> Result<()> {
    let cfg = Config::load()?;
    let source = source_from_config(&cfg)?;
    let at = Coordinate::new(lat, lon).rounded();

    let mut state = CenterWeatherState::default();
    state.apply(source.fetch_single(at).await);

    println!("({}, {})  {}", at.lat, at.lon, format_panel(&state.panel()));
    Ok(())
}

async fn nationwide() -> Result<()> {
    let cfg = Config::load()?;
    let catalog = RegionCatalog::japan();
    let cache = NationwideCache::new(source_from_config(&cfg)?);

    let snapshot = cache
        .refresh(catalog.points())
        .await
        .context("Nationwide weather fetch failed")?;

    for marker in project_markers(&snapshot) {
        println!("{}", format_marker(&marker));
    }
    println!("{}/{} regions with data", snapshot.populated(), snapshot.len());
    Ok(())
}

async fn simulate(script: &str, verbose: bool) -> Result<()> {
    let cfg = Config::load()?;
    let steps = parse_script(script)?;

    let tracker = ViewportTracker::new(cfg.initial_viewport());
    let controller = OverlayController::from_config(
        &cfg,
        tracker.subscribe(),
        Box::new(ConsoleRenderer::new(verbose)),
    )?;
    let mut state = controller.watch_state();
    let handle = controller.handle();
    let task = controller.spawn();

    for step in steps {
        match step {
            Step::Pan { lat, lon } => {
                println!("> pan {lat} {lon}");
                tracker.pan_to(lat, lon);
            }
            Step::Zoom(level) => {
                println!("> zoom {level}");
                tracker.zoom_to(level);
            }
            Step::Wait(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            Step::Refresh => {
                println!("> refresh");
                handle.invalidate_nationwide();
            }
        }
    }

    // let the last debounce fire, then wait for its fetch to land
    tokio::time::sleep(Duration::from_millis(cfg.debounce_ms + 20)).await;
    let settled = tokio::time::timeout(
        cfg.request_timeout(),
        state.wait_for(|s| !s.center.is_loading()),
    )
    .await
    .is_ok();
    if !settled {
        log::warn!("center fetch still outstanding after {:?}", cfg.request_timeout());
    }

    drop(tracker);
    task.await.context("Overlay controller task failed")?;

    let last = state.borrow().clone();
    println!(
        "final: zoom {}, nationwide {:?}, center {:?}",
        last.zoom,
        last.nationwide,
        last.center.phase()
    );
    Ok(())
}

fn legend() {
    for &code in codes::DOCUMENTED_CODES {
        let icon = codes::code_to_icon(Some(code));
        println!(
            "{code:>3}  {:<10} {:<18} {:<8} {}",
            codes::code_to_text(Some(code)),
            icon.icon,
            icon.color,
            icon.label
        );
    }
}
