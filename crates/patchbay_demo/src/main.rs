// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patchbay - a cable-wiring puzzle.
//!
//! Drag cables from output jacks to input jacks until every module on the
//! board is wired the way the puzzle wants. Right-click a jack to pull its
//! cable, Escape drops the cable in hand.
//!
//! ## Usage
//!
//! ```text
//! patchbay [config.ron]
//! ```
//!
//! The optional RON file overrides hit radius, cable physics and the neon
//! style. Set `RUST_LOG` to adjust logging.

mod app;
mod puzzle;

use app::PatchbayApp;
use patchbay_wiring::WiringConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "patchbay_demo=debug,patchbay_wiring=debug,wgpu=warn,naga=warn";

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Patchbay v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        tracing::error!("Patchbay crashed: {e}");
        std::process::exit(1);
    }
}

fn run() -> app::Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => WiringConfig::load(path)?,
        None => WiringConfig::default(),
    };
    PatchbayApp::run(config)
}
