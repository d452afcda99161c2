//! Example: extraction on a synthesized diagram.
//!
//! Draws a chain of outlined nodes joined by double-line connectors, runs the
//! extractor and prints the graph as JSON followed by a one-line summary.
//!
//! Run from the workspace root:
//!   cargo run -p sketch-graph --example diagram -- --help
//!   cargo run -p sketch-graph --example diagram -- --nodes 4 --save diagram.png

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbImage;
use sketch_graph::{ExtractConfig, Raster, extract};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Extract a program graph from a synthesized diagram")]
struct Args {
    /// Number of nodes in the chain
    #[arg(long, default_value_t = 3)]
    nodes: usize,

    /// Node outer radius in pixels
    #[arg(long, default_value_t = 20)]
    radius: i64,

    /// Also save the synthesized image here
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let nodes = args.nodes.max(1);
    let step = 5 * args.radius;
    let (w, h) = ((step * nodes as i64) as u32, (3 * args.radius) as u32);

    let img = synthesize(w, h, nodes, args.radius);
    if let Some(path) = &args.save {
        img.save(path)
            .with_context(|| format!("saving image {}", path.display()))?;
    }

    let t0 = Instant::now();
    let raster = Raster::new(w as usize, h as usize, 3, img.as_raw());
    let graph = extract(raster, &ExtractConfig::default()).context("extracting graph")?;
    let elapsed = t0.elapsed();

    println!("{}", serde_json::to_string_pretty(&graph)?);
    println!("{} in {:.1} ms", graph.summary(), elapsed.as_secs_f64() * 1e3);
    Ok(())
}

fn synthesize(w: u32, h: u32, nodes: usize, r: i64) -> RgbImage {
    let mut img = RgbImage::from_pixel(w, h, image::Rgb([200, 200, 200]));
    let mut set = |x: i64, y: i64, v: u8| {
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            img.put_pixel(x as u32, y as u32, image::Rgb([v, v, v]));
        }
    };

    let cy = h as i64 / 2;
    let step = 5 * r;
    let inner = r - 4;
    let half = 7;
    for n in 0..nodes as i64 {
        let cx = step / 2 + n * step;
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                let d2 = (x - cx).pow(2) + (y - cy).pow(2);
                if d2 <= inner * inner {
                    set(x, y, 255);
                } else if d2 <= r * r {
                    set(x, y, 0);
                }
            }
        }
        if n + 1 == nodes as i64 {
            continue;
        }
        let (x0, x1) = (cx + inner, cx + step - inner);
        for y in cy - half..cy + half {
            for x in x0..x1 {
                let strip = (cy - half + 2..cy - half + 5).contains(&y)
                    || (cy + half - 4..cy + half - 1).contains(&y);
                let inside = x >= x0 + 2 && x < x1 - 2;
                set(x, y, if strip && inside { 255 } else { 0 });
            }
        }
    }
    img
}
