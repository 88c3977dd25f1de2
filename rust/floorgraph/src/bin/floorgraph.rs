// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: room adjacency graphs for a batch of floor plan label images
//!
//! Usage:
//!   floorgraph [options] <sample>...

use anyhow::{bail, Context, Result};
use floorgraph::{
    analyze_floor_plan_with, render_topology, AdjacencyConfig, JunctionPolicy, LabelImage,
    LabelScheme, RenderOptions, TopologyReport,
};
use rayon::prelude::*;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

struct Options {
    samples: Vec<PathBuf>,
    scheme: Option<PathBuf>,
    output: PathBuf,
    render: bool,
    csv: bool,
    junction_policy: JunctionPolicy,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match run(&options) {
        Ok(0) => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Batch aborted");
            std::process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        samples: Vec::new(),
        scheme: None,
        output: PathBuf::from("topology"),
        render: false,
        csv: false,
        junction_policy: JunctionPolicy::default(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scheme" => {
                let value = iter.next().context("--scheme needs a path")?;
                options.scheme = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = iter.next().context("--output needs a directory")?;
                options.output = PathBuf::from(value);
            }
            "--junction-policy" => {
                let value = iter.next().context("--junction-policy needs a value")?;
                options.junction_policy = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
            }
            "--render" => options.render = true,
            "--csv" => options.csv = true,
            other if other.starts_with("--") => bail!("Unknown option: {}", other),
            sample => options.samples.push(PathBuf::from(sample)),
        }
    }

    if options.samples.is_empty() {
        bail!("no samples given");
    }
    Ok(options)
}

/// Process every sample; returns the number of failed samples
fn run(options: &Options) -> Result<usize> {
    let scheme = match &options.scheme {
        Some(path) => LabelScheme::from_json_file(path)
            .with_context(|| format!("Cannot load scheme '{}'", path.display()))?,
        None => LabelScheme::default(),
    };
    let config =
        AdjacencyConfig::from_scheme(&scheme).with_junction_policy(options.junction_policy);

    fs::create_dir_all(&options.output)
        .with_context(|| format!("Cannot create '{}'", options.output.display()))?;

    tracing::info!(
        samples = options.samples.len(),
        output = %options.output.display(),
        junction_policy = %options.junction_policy,
        "Starting batch"
    );
    let start = Instant::now();

    let failed = options
        .samples
        .par_iter()
        .filter(|sample| {
            match process_sample(sample, &scheme, &config, options) {
                Ok(()) => false,
                Err(e) => {
                    tracing::error!(
                        sample = %sample.display(),
                        error = %format!("{:#}", e),
                        "Sample failed"
                    );
                    true
                }
            }
        })
        .count();

    tracing::info!(
        processed = options.samples.len() - failed,
        failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch finished"
    );
    Ok(failed)
}

fn process_sample(
    sample: &Path,
    scheme: &LabelScheme,
    config: &AdjacencyConfig,
    options: &Options,
) -> Result<()> {
    let (labels, icons) = load_sample(sample)?;
    let topology = analyze_floor_plan_with(&labels, icons.as_ref(), scheme, config)?;

    let name = sample_name(sample);
    let report = TopologyReport::new(&topology);
    report.write_json(&options.output.join(format!("{}.json", name)))?;
    if options.csv {
        report.write_csv(&options.output.join(format!("{}.csv", name)))?;
    }
    if options.render {
        let image = render_topology(
            &topology.region_map,
            &topology.wall_mask,
            &topology.rooms,
            &topology.adjacency,
            &RenderOptions::default(),
        );
        let path = options.output.join(format!("{}.png", name));
        image
            .save(&path)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
    }

    tracing::info!(
        sample = %name,
        rooms = topology.rooms.len(),
        edges = topology.adjacency.len(),
        "Sample done"
    );
    Ok(())
}

/// Label layer and optional icon layer of a sample
fn load_sample(sample: &Path) -> Result<(LabelImage, Option<LabelImage>)> {
    if sample.is_dir() {
        let labels = load_layer(&sample.join("labels.png"))?;
        let icons_path = sample.join("icons.png");
        let icons = if icons_path.exists() {
            Some(load_layer(&icons_path)?)
        } else {
            None
        };
        Ok((labels, icons))
    } else {
        Ok((load_layer(sample)?, None))
    }
}

fn load_layer(path: &Path) -> Result<LabelImage> {
    let image = image::open(path).with_context(|| format!("Cannot open '{}'", path.display()))?;
    Ok(image.to_luma8())
}

/// Output file stem: directory name for directory samples, file stem otherwise
fn sample_name(sample: &Path) -> String {
    let name = if sample.is_dir() {
        sample.file_name()
    } else {
        sample.file_stem()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample".to_string())
}

fn print_usage() {
    println!(
        r#"Floor Plan Topology
===================

Segments rasterized floor plan label images into rooms and writes the
room adjacency graph (doors, windows, shared walls) of each plan.

USAGE:
  floorgraph [OPTIONS] <sample>...

ARGUMENTS:
  <sample>                  Label PNG (one category code per pixel), or a
                            directory holding labels.png and optionally icons.png

OPTIONS:
  --scheme <json>           Label scheme file (default: CubiCasa5k codes)
  --output <dir>            Output directory (default: topology)
  --junction-policy <p>     smallest-contact | first-found | per-segment
                            (default: smallest-contact)
  --render                  Also write <name>.png with the graph drawn on the plan
  --csv                     Also write <name>.csv with one row per connection
  -h, --help                Show this help message

Set RUST_LOG (e.g. RUST_LOG=floorgraph=debug) for more detail.

EXAMPLES:
  floorgraph data/plan_001 data/plan_002 --render
  floorgraph --scheme scheme.json --csv --output out labels/*.png
"#
    );
}
