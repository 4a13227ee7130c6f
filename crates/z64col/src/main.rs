//! Command-line importer for Zelda64 mesh collision.
//!
//! Reads a `.zscene` or `.zobj` file, decodes its collision mesh, and prints
//! a summary of the header, mesh, and materials (or the whole scene as JSON).

mod args;
mod axis;
mod error;
mod report;

use std::io::Write;
use std::process::ExitCode;

use args::ImportParams;
use error::{Error, Result};

fn main() -> ExitCode {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let params = args::parse();
    match run(&params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(params: &ImportParams) -> Result<()> {
    let options = params.decode_options()?;

    let data = std::fs::read(&params.path).map_err(|source| Error::Io {
        path: params.path.clone(),
        source,
    })?;
    tracing::info!("read {} bytes from {}", data.len(), params.path.display());

    let decoded = z64col_decode::decode_collision(&data, &options)?;
    tracing::info!(
        "decoded {} triangles with {} materials ({} warnings)",
        decoded.scene.triangles.len(),
        decoded.scene.materials.len(),
        decoded.warnings.len()
    );

    let mut out = std::io::stdout().lock();
    if params.json {
        writeln!(out, "{}", report::to_json(&decoded)?).map_err(Error::Output)?;
    } else {
        report::write_summary(&mut out, &decoded, params.reduced).map_err(Error::Output)?;
    }
    out.flush().map_err(Error::Output)
}
