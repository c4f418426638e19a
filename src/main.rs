//! diet_radar - radar charts of dietary environmental impact
//!
//! Reads the real-world and kcal-adjusted results files, averages the nine
//! impact indicators per diet group, scales every indicator by its maximum
//! and renders a static comparison figure plus two animations.

mod aggregate;
mod animate;
mod cli;
mod config;
mod data;
mod error;
mod geometry;
mod normalize;
mod render;
mod summary;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use aggregate::GroupAggregate;
use animate::{Highlight, MoveToCenter};
use cli::Args;
use config::{Config, DatasetConfig, DEFAULT_CONFIG_FILE};
use geometry::AngleSet;
use normalize::{scale_by_max, ScaledAggregate};
use render::static_chart::{static_frame, STATIC_TITLE};
use render::{Canvas, Chrome, DietGroup, RadarData};
use summary::SummarySource;

// what one results file turns into after the numeric steps
#[derive(Debug)]
struct Prepared {
    means: GroupAggregate,
    scaled: ScaledAggregate,
    radar: RadarData,
}

fn main() {
    let args = Args::parse_args();

    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);
    info!("diet_radar v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Run failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: write the default settings to diet_radar.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{} already exists, remove it first or edit it", DEFAULT_CONFIG_FILE);
    }
    std::fs::write(path, Config::default_toml()?).with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;
    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref path) = args.config {
        info!("Loading config from: {}", path.display());
        return Config::load(path);
    }
    match Config::load_default()? {
        Some(config) => {
            info!("Loaded config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn format_gmt(time: DateTime<Utc>) -> String {
    time.format("%d/%m/%Y %H:%M:%S GMT").to_string()
}

fn run(args: &Args) -> Result<()> {
    let started = Instant::now();
    let started_at = Utc::now();
    println!("Run started: {}", format_gmt(started_at));

    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate().context("Invalid configuration")?;

    let groups = render::diet_groups(&config.groups)?;
    let angles = AngleSet::new(config.data.indicators.len())?;

    let real_world = prepare(&config, &config.inputs.real_world, &groups)?;
    let efficiency = prepare(&config, &config.inputs.efficiency, &groups)?;

    std::fs::create_dir_all(&config.outputs.directory)
        .with_context(|| format!("Failed to create {}", config.outputs.directory.display()))?;

    let chrome = |title: &str| Chrome {
        title: title.to_string(),
        indicators: config.data.indicators.clone(),
        legend: groups.clone(),
        angles: angles.clone(),
        radial_limit: config.render.radial_limit,
    };

    // 1. static comparison
    let path = config.output_path(&config.outputs.static_image);
    let canvas = Canvas::new(&config.render, config.render.static_dpi);
    println!("Rendering static figure ({}x{})...", canvas.size().0, canvas.size().1);
    render::write_png(
        &path,
        &canvas,
        &chrome(STATIC_TITLE),
        &static_frame(&real_world.radar, &efficiency.radar, &groups),
    )
    .with_context(|| format!("Failed to render {}", path.display()))?;
    println!("    - saved {}", path.display());

    if args.skip_animations {
        info!("Skipping animations");
    } else {
        // 2. highlight one group per frame
        let path = config.output_path(&config.outputs.highlight_animation);
        let canvas = Canvas::new(&config.render, config.render.animation_dpi);
        let highlight = Highlight::new(&real_world.radar, &efficiency.radar, &groups);
        println!("Rendering highlight animation...");
        let frames = render::write_gif(
            &path,
            &canvas,
            config.render.highlight_frame_ms,
            &chrome(animate::HIGHLIGHT_TITLE),
            &highlight,
        )
        .with_context(|| format!("Failed to render {}", path.display()))?;
        println!("    - saved {} ({} frames)", path.display(), frames);

        // 3. slide both charts to the center
        let path = config.output_path(&config.outputs.move_animation);
        let canvas = Canvas::new(&config.render, config.render.move_dpi);
        let movement = MoveToCenter::new(&real_world.radar, &efficiency.radar, &groups, config.motion);
        println!("Rendering move-to-center animation...");
        let frames = render::write_gif(
            &path,
            &canvas,
            config.render.move_frame_ms,
            &chrome(animate::MOVE_TITLE),
            &movement,
        )
        .with_context(|| format!("Failed to render {}", path.display()))?;
        println!("    - saved {} ({} frames)", path.display(), frames);
    }

    if let Some(ref file) = config.outputs.summary_csv {
        let path = config.output_path(file);
        let sources = [
            SummarySource {
                name: &config.inputs.real_world.short_title,
                means: &real_world.means,
                scaled: &real_world.scaled,
            },
            SummarySource {
                name: &config.inputs.efficiency.short_title,
                means: &efficiency.means,
                scaled: &efficiency.scaled,
            },
        ];
        let rows = summary::write_summary(&path, &sources, &groups, started_at)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("    - saved {} ({} rows)", path.display(), rows);
    }

    println!("Done in {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}

// load -> group means -> scale by column max -> line rows up with the group order
fn prepare(config: &Config, dataset: &DatasetConfig, groups: &[DietGroup]) -> Result<Prepared> {
    let path = config.input_path(dataset);
    let table = data::load_table(&path, &config.data.group_column, &config.data.indicators)
        .with_context(|| format!("Failed to load {}", dataset.title))?;
    if table.is_empty() {
        warn!("{} has no data rows", path.display());
    }

    let means = GroupAggregate::from_table(&table)?;
    means
        .require_groups(config.group_names())
        .with_context(|| format!("Incomplete data in {}", path.display()))?;
    if means.len() > groups.len() {
        let extra: Vec<&str> = means
            .groups()
            .filter(|g| !groups.iter().any(|known| known.name == *g))
            .collect();
        warn!("{}: groups not drawn: {:?}", path.display(), extra);
    }

    let scaled = scale_by_max(&means, config.data.scale);
    if !scaled.degenerate_columns().is_empty() {
        warn!("{}: zeroed columns {:?}", path.display(), scaled.degenerate_columns());
    }
    let radar = RadarData::prepare(&dataset.title, &dataset.short_title, &scaled, groups)?;

    println!("{}: {} rows, {} diet groups", dataset.title, table.len(), means.len());
    Ok(Prepared { means, scaled, radar })
}
