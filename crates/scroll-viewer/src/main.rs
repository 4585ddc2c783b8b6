//! scroll-viewer: draws one tile of a tileset every frame.
//!
//! # Usage
//!
//! ```bash
//! scroll-viewer
//! scroll-viewer --tileset assets/tileset.png --tile 5 --pos 64,32 --scale 2
//! scroll-viewer --crop 0,0,32,16 --clamp --no-mipmaps
//! ```
//!
//! ESC closes the window.

mod cli;
mod viewer;

use anyhow::Result;
use clap::Parser;
use winit::dpi::LogicalSize;

use scroll_engine::device::GpuInit;
use scroll_engine::logging::init_logging;
use scroll_engine::window::{Runtime, RuntimeConfig};

use crate::cli::Args;
use crate::viewer::TileViewer;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.logging());

    let config = args.into_config();
    log::debug!("{config:?}");

    let runtime = RuntimeConfig {
        initial_size: LogicalSize::new(config.canvas.width as f64, config.canvas.height as f64),
        ..Default::default()
    };

    Runtime::run(runtime, GpuInit::default(), TileViewer::new(config))
}
