use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use image::{GrayImage, RgbImage};
use serde::Serialize;
use sg_core::Image;
use sg_graph::{Artifacts, ExtractConfig, ProgramGraph, Raster, extract_with_artifacts};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sg")]
#[command(about = "Extract program graphs from circle-and-connector diagrams")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the extracted graph as JSON.
    Extract(ExtractArgs),
    /// Write every intermediate mask to a directory.
    Masks(MasksArgs),
    /// Print the default configuration as JSON.
    Config,
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    /// JSON configuration; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ExtractArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Write the graph here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct MasksArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, default_value = "out/masks")]
    out: PathBuf,
}

#[derive(Debug, Serialize)]
struct MetaMasks<'a> {
    input: String,
    width: usize,
    height: usize,
    config: &'a ExtractConfig,
    hough_candidates: usize,
    half_widths: &'a [f32],
    summary: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Extract(args) => run_extract(args),
        Command::Masks(args) => run_masks(args),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&ExtractConfig::default())?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let cfg = load_config(args.input.config.as_deref())?;
    let rgb = load_input_rgb(&args.input.input)?;
    let (graph, _) = run_pipeline(&rgb, &cfg)?;

    let json = serde_json::to_string_pretty(&graph).context("serializing graph")?;
    match args.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "graph written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_masks(args: MasksArgs) -> Result<()> {
    let cfg = load_config(args.input.config.as_deref())?;
    let rgb = load_input_rgb(&args.input.input)?;
    let (graph, artifacts) = run_pipeline(&rgb, &cfg)?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let masks = [
        ("fill.png", &artifacts.masks.fill),
        ("stroke.png", &artifacts.masks.stroke),
        ("foreground.png", &artifacts.masks.foreground),
        ("core.png", &artifacts.core_mask),
        ("nodes.png", &artifacts.node_mask),
        ("paths.png", &artifacts.paths_mask),
    ];
    for (name, mask) in masks {
        save_u8_image(args.out.join(name), mask)?;
    }

    write_json(args.out.join("graph.json"), &graph)?;
    write_json(
        args.out.join("meta.json"),
        &MetaMasks {
            input: args.input.input.display().to_string(),
            width: graph.width(),
            height: graph.height(),
            config: &cfg,
            hough_candidates: artifacts.hough.len(),
            half_widths: &artifacts.half_widths,
            summary: graph.summary().to_string(),
        },
    )?;

    info!(dir = %args.out.display(), "masks written");
    Ok(())
}

fn run_pipeline(rgb: &RgbImage, cfg: &ExtractConfig) -> Result<(ProgramGraph, Artifacts)> {
    let (w, h) = rgb.dimensions();
    let raster = Raster::new(w as usize, h as usize, 3, rgb.as_raw());
    extract_with_artifacts(raster, cfg).context("extracting program graph")
}

fn load_config(path: Option<&Path>) -> Result<ExtractConfig> {
    let Some(path) = path else {
        return Ok(ExtractConfig::default());
    };
    if !path.is_file() {
        bail!("config path is not a file: {}", path.display());
    }
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn load_input_rgb(path: &Path) -> Result<RgbImage> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    Ok(dyn_img.to_rgb8())
}

fn save_u8_image(path: PathBuf, img: &Image<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}
