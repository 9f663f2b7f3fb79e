//! Builds a flange with one bolt hole and writes `Flange.stl`.
//!
//! Usage: `flange [config.json]`. Set `RUST_LOG=debug` for kernel traces.

use igniscad::{IgnisConfig, Model, OnExit, Session, ShowMode, ShowOptions};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => IgnisConfig::from_path(Path::new(&path))?,
        None => IgnisConfig::default(),
    };
    let session = Session::truck_with_config(config);

    let model = Model::scoped(
        &session,
        "Flange",
        OnExit::Show(ShowMode::Export, ShowOptions::default()),
        |m| {
            let base = session.cylinder(50.0, 10.0, Some("base"))?;
            let bolt = session
                .cylinder(5.0, 20.0, Some("bolt"))?
                .moved(base.radius()? * 0.8, 0.0, 0.0)?;
            m.add(base.difference(&bolt)?.with_name("flange"))?;
            Ok(())
        },
    )?;

    tracing::info!(parts = model.len(), "done");
    Ok(())
}
