use bp_core::ViewerConfig;

use crate::{backend::GlBackend, error::SetupError, frame::FrameLoop};

mod abs;
mod backend;
mod error;
mod frame;
mod logging;

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("failed to set up logging: {e}");
    }

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Sets everything up and runs the viewer. The optional first argument is the
/// path of a JSON config file.
fn run() -> Result<(), SetupError> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => ViewerConfig::load(path)?,
        None => {
            log::info!("No config file given, using defaults");
            ViewerConfig::default()
        }
    };

    let backend = GlBackend::new(&config)?;
    let frame_loop = FrameLoop::new(backend, &config)?;
    frame_loop.run();
    Ok(())
}
