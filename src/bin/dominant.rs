use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dominant_color_wasm::{Options, find_image, find_n_image, hex, source};
use serde::Serialize;

/// Print the dominant color of one or more images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON file with clustering options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of clusters
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Longest side images are shrunk to before clustering
    #[arg(long)]
    max_edge: Option<u32>,

    /// Maximum number of k-means rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Random samples tried per cluster while seeding
    #[arg(long)]
    samples: Option<usize>,

    /// Channel sums at or below this are too dark
    #[arg(long)]
    min_darkness: Option<u16>,

    /// Channel sums at or above this are too bright
    #[arg(long)]
    max_brightness: Option<u16>,

    /// Print the whole ranked palette instead of a single color
    #[arg(short = 'n', long)]
    palette: bool,

    /// Emit JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Log clustering progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Options::default(),
        };

        if let Some(k) = self.clusters {
            options.cluster_count = k;
        }
        if let Some(edge) = self.max_edge {
            options.max_edge = edge;
        }
        if let Some(rounds) = self.rounds {
            options.max_rounds = rounds;
        }
        if let Some(samples) = self.samples {
            options.max_sample = samples;
        }
        if let Some(dark) = self.min_darkness {
            options.brightness.min_darkness = dark;
        }
        if let Some(bright) = self.max_brightness {
            options.brightness.max_brightness = bright;
        }

        Ok(options)
    }
}

#[derive(Serialize)]
struct Entry {
    hex: String,
    weight: f32,
}

#[derive(Serialize)]
struct Report {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    palette: Option<Vec<Entry>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = args.options()?;
    let mut reports = Vec::with_capacity(args.inputs.len());

    for input in &args.inputs {
        let img = source::open(input).with_context(|| format!("processing {}", input.display()))?;
        let path = input.display().to_string();

        let report = if args.palette {
            let palette = find_n_image(&img, &options)
                .into_iter()
                .map(|entry| Entry { hex: hex(entry.color), weight: entry.weight })
                .collect();
            Report { path, color: None, palette: Some(palette) }
        } else {
            Report { path, color: Some(hex(find_image(&img, &options))), palette: None }
        };

        if !args.json {
            print_report(&report);
        }
        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}

fn print_report(report: &Report) {
    if let Some(color) = &report.color {
        println!("{}: {color}", report.path);
    }
    if let Some(palette) = &report.palette {
        println!("{}:", report.path);
        for entry in palette {
            println!("  {} {:>6.2}%", entry.hex, entry.weight * 100.0);
        }
    }
}
