//! Extrude the outline of a JSON drawing into a `.glb` file.
//!
//! ```text
//! cargo run -p inkmesh --example outline_to_glb -- drawing.json out.glb [inkmesh.toml]
//! ```
//!
//! Set `RUST_LOG=inkmesh=debug` for more detail.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use inkmesh::{parse_drawing, Engine};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new("inkmesh=info").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        bail!("usage: outline_to_glb <drawing.json> <out.glb> [config.toml]");
    };
    let (input, output) = (PathBuf::from(input), PathBuf::from(output));

    let engine = match args.next() {
        Some(config) => {
            let text = std::fs::read_to_string(&config)
                .with_context(|| format!("failed to read config {config}"))?;
            Engine::from_toml(&text).with_context(|| format!("invalid config {config}"))?
        }
        None => Engine::default(),
    };

    let json = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let strokes = parse_drawing(&json).context("failed to parse drawing")?;

    let strokes = engine.repair(&strokes);
    let report = engine.analyze(&strokes)?;
    println!("{report}");

    let glb = engine.export_glb(&strokes).context("export failed")?;
    std::fs::write(&output, &glb)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("wrote {} ({} bytes)", output.display(), glb.len());

    Ok(())
}
