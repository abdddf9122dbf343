// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run the letterloop sketch without a window and write the result to an image.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use letterloop::{RunTracer, Sketch};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut sketch = Sketch::new(args.params).context("Couldn't create the canvas")?;
    let placements = sketch.draw_base_word();
    if placements.is_empty() {
        log::warn!("\"{}\" has no drawable letters", sketch.params().word);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for _ in 0..args.iterations {
        let composited = pollster::block_on(sketch.iterate(&RunTracer, &mut rng));
        log::info!(
            "Iteration {} done{}",
            sketch.iteration(),
            if composited { "" } else { " (trace skipped)" }
        );
    }

    sketch
        .export(&args.output)
        .with_context(|| format!("Couldn't export to {}", args.output.display()))?;
    if let Some(svg_path) = &args.svg {
        let Some(svg) = sketch.last_svg() else {
            bail!("No traced SVG to write, run at least one iteration");
        };
        std::fs::write(svg_path, svg)
            .with_context(|| format!("Couldn't write {}", svg_path.display()))?;
    }
    println!(
        "Wrote {} iterations of \"{}\" to {:?}",
        sketch.iteration(),
        sketch.params().word,
        args.output
    );
    Ok(())
}

#[derive(Parser, Debug)]
#[command(about, long_about = None, bin_name = "letterloop")]
struct Args {
    #[arg(help_heading = "Export")]
    #[arg(long, short, default_value_t = 10)]
    /// How many times to run the draw, trace and composite loop
    iterations: u32,
    #[arg(help_heading = "Export")]
    #[arg(long)]
    /// Seed for the spread jitter, for reproducible output
    seed: Option<u64>,
    #[arg(help_heading = "Export")]
    #[arg(long, short, default_value = "letterloop.png")]
    /// Output image; the extension selects PNG or JPEG
    output: PathBuf,
    #[arg(help_heading = "Export")]
    #[arg(long)]
    /// Also write the last traced SVG document here
    svg: Option<PathBuf>,
    #[command(flatten)]
    params: letterloop::Params,
}
