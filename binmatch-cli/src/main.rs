mod config;

use binmatch::io::{load_and_prepare, save_gray_image};
use binmatch::{merge_composites, render_mask, run_all, MatchJob};
use clap::Parser;
use config::Config;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Binary template matcher (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Log progress and per-stage timings to stderr.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
struct TemplateRecord {
    file_path: PathBuf,
    method: String,
    accepted_placements: usize,
    matched_pixels: usize,
}

#[derive(Debug, Serialize)]
struct Output {
    write_path: PathBuf,
    width: usize,
    height: usize,
    matched_pixels: usize,
    elapsed_ms: u128,
    templates: Vec<TemplateRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("binmatch=info".parse()?)
                    .add_directive("binmatch_cli=info".parse()?),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    info!(config = %cli.config.display(), "loading configuration");
    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    let plan = config.validate()?;

    info!(path = %plan.base_path.display(), "preparing base image");
    let base = load_and_prepare(&plan.base_path, &plan.base_prepare)?;

    info!(count = plan.templates.len(), "preparing templates");
    let mut jobs = Vec::with_capacity(plan.templates.len());
    for source in &plan.templates {
        let template = load_and_prepare(&source.file_path, &source.prepare)?;
        jobs.push(MatchJob {
            template,
            method: source.method,
            settings: source.settings,
        });
    }

    info!("generating composites");
    let started = Instant::now();
    let composites = run_all(&base, &jobs, &plan.orchestrator)?;
    let elapsed_ms = started.elapsed().as_millis();
    info!(elapsed_ms = elapsed_ms as u64, "composites complete");

    let templates = plan
        .templates
        .iter()
        .zip(&composites)
        .map(|(source, composite)| TemplateRecord {
            file_path: source.file_path.clone(),
            method: source.method.to_string(),
            accepted_placements: composite.accepted(),
            matched_pixels: composite.mask().count_ones(),
        })
        .collect();

    info!("merging composites");
    let merged = merge_composites(base.width(), base.height(), composites)?;
    let output_image = render_mask(&merged);

    info!(path = %plan.write_path.display(), "writing output image");
    save_gray_image(&plan.write_path, &output_image)?;

    let output = Output {
        write_path: plan.write_path,
        width: base.width(),
        height: base.height(),
        matched_pixels: merged.count_ones(),
        elapsed_ms,
        templates,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
