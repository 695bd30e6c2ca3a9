/// rast3d terminal demo
///
/// Orbits a small scene of intersecting triangles, lines and labels.
/// Controls:
///   - WASD / Arrow Keys: Orbit the camera
///   - +/-: Field of vision
///   - [ / ]: Line size
///   - P: Pause, R: Reset parameters
///   - Q/ESC: Quit
///
/// An optional argument restores parameters from a share string, e.g.
/// `rast3d-terminal "fov=1.5&speed=20"`.
use std::io;

use rast3d_core::ParamConfig;
use rast3d_terminal::TerminalApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut params = ParamConfig::default();
    if let Some(shared) = std::env::args().nth(1) {
        params
            .apply_share_string(&shared)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    }

    let mut app = TerminalApp::new(params)?;
    app.run()?;

    println!("Share these settings with: {}", app.params().to_share_string());
    Ok(())
}
