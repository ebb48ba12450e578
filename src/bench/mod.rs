//! Resize-sweep benchmark.
//!
//! Drives a [`ResizeCoordinator`] through a simulated window drag and reports
//! per-frame relayout timings. The sweep goes out and back, so frames just
//! after the turnaround are served from the layout cache.

use std::cell::Cell;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use crate::config::{LayoutSettings, DEFAULT_GAP_TOKEN};
use crate::layout::resize::{BoxMetrics, ContainerBox, ResizeCoordinator};
use crate::layout::LayoutMode;
use crate::models::{MediaCategory, MediaItem};

const SWEEP_MIN_WIDTH: f32 = 320.0;
const SWEEP_MAX_WIDTH: f32 = 2400.0;
const SWEEP_STEP: f32 = 8.0;
const SWEEP_HEIGHT: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkArgs {
    pub items: usize,
    pub runs: usize,
    /// `None` keeps the value from `COVERGRID_*` or the default.
    pub columns: Option<usize>,
    pub min_rows: Option<usize>,
    pub mode: Option<LayoutMode>,
    pub gap: f32,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
struct BenchmarkRun {
    run_index: usize,
    elapsed_ms: u128,
    frames_simulated: usize,
    relayouts: usize,
    rows_at_widest: usize,
    frame_p50_ms: f64,
    frame_p95_ms: f64,
    frames_over_16ms: usize,
    frames_over_33ms: usize,
}

/// Container whose size is driven by the sweep.
#[derive(Clone)]
struct SimulatedContainer {
    width: Rc<Cell<f32>>,
}

impl ContainerBox for SimulatedContainer {
    fn measure(&self) -> Option<BoxMetrics> {
        Some(BoxMetrics::new(self.width.get(), SWEEP_HEIGHT))
    }
}

pub fn maybe_parse_args() -> Result<Option<BenchmarkArgs>> {
    parse_args(env::args().skip(1))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<BenchmarkArgs>> {
    let mut benchmark = false;
    let mut items: usize = 500;
    let mut runs: usize = 3;
    let mut columns: Option<usize> = None;
    let mut min_rows: Option<usize> = None;
    let mut mode: Option<LayoutMode> = None;
    let mut gap: f32 = 16.0;
    let mut output: Option<PathBuf> = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--benchmark" => benchmark = true,
            "--items" => {
                let value = args.next().context("Missing value for --items")?;
                items = value
                    .parse::<usize>()
                    .context("Failed to parse --items as a non-negative integer")?;
            }
            "--runs" => {
                let value = args.next().context("Missing value for --runs")?;
                runs = value
                    .parse::<usize>()
                    .context("Failed to parse --runs as a positive integer")?;
            }
            "--columns" => {
                let value = args.next().context("Missing value for --columns")?;
                columns = Some(
                    value
                        .parse::<usize>()
                        .context("Failed to parse --columns as a positive integer")?,
                );
            }
            "--min-rows" => {
                let value = args.next().context("Missing value for --min-rows")?;
                min_rows = Some(
                    value
                        .parse::<usize>()
                        .context("Failed to parse --min-rows as a positive integer")?,
                );
            }
            "--mode" => {
                let value = args.next().context("Missing value for --mode")?;
                mode = Some(LayoutMode::from_name(&value).with_context(|| {
                    format!("Unknown layout mode {value:?} (expected width or height)")
                })?);
            }
            "--gap" => {
                let value = args.next().context("Missing value for --gap")?;
                gap = value
                    .parse::<f32>()
                    .context("Failed to parse --gap as a number")?;
            }
            "--output" => {
                let value = args.next().context("Missing value for --output")?;
                output = Some(PathBuf::from(value));
            }
            other => {
                if benchmark {
                    bail!("Unknown benchmark argument: {other}");
                }
            }
        }
    }

    if !benchmark {
        return Ok(None);
    }
    if runs == 0 {
        bail!("--runs must be greater than 0");
    }
    if !gap.is_finite() || gap < 0.0 {
        bail!("--gap must be a non-negative number");
    }

    Ok(Some(BenchmarkArgs {
        items,
        runs,
        columns,
        min_rows,
        mode,
        gap,
        output,
    }))
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<i32> {
    let settings = benchmark_settings(&args, LayoutSettings::from_env())?;
    let items = synthetic_items(args.items);
    let mut runs = Vec::with_capacity(args.runs);

    for run_index in 0..args.runs {
        println!("run={} phase=sweep start", run_index + 1);
        let run = simulate_resize_sweep(run_index, &items, &settings, args.gap)?;
        println!(
            "run={} frames={} relayouts={} rows={} p50_ms={:.3} p95_ms={:.3} over16={} over33={}",
            run.run_index + 1,
            run.frames_simulated,
            run.relayouts,
            run.rows_at_widest,
            run.frame_p50_ms,
            run.frame_p95_ms,
            run.frames_over_16ms,
            run.frames_over_33ms
        );
        runs.push(run);
    }

    let avg_p95 = runs.iter().map(|r| r.frame_p95_ms).sum::<f64>() / runs.len() as f64;
    let avg_elapsed = runs.iter().map(|r| r.elapsed_ms as f64).sum::<f64>() / runs.len() as f64;
    println!(
        "runs={} items={} mode={} avg_elapsed_ms={:.2} avg_frame_p95_ms={:.3}",
        runs.len(),
        items.len(),
        settings.mode.as_str(),
        avg_elapsed,
        avg_p95
    );

    if let Some(path) = &args.output {
        fs::write(path, render_report_json(&args, &settings, &runs)).with_context(|| {
            format!("Failed to write benchmark report to {}", path.display())
        })?;
        println!("Benchmark complete: {}", path.display());
    }

    Ok(0)
}

/// Applies command-line overrides on top of `base`. The sweep always lifts the
/// width ceiling to its widest frame.
fn benchmark_settings(args: &BenchmarkArgs, base: LayoutSettings) -> Result<LayoutSettings> {
    let mut settings = LayoutSettings {
        max_grid_width: SWEEP_MAX_WIDTH,
        ..base
    };
    if let Some(columns) = args.columns {
        settings
            .set_columns(columns)
            .context("Invalid --columns for benchmark")?;
    }
    if let Some(min_rows) = args.min_rows {
        settings
            .set_min_rows(min_rows)
            .context("Invalid --min-rows for benchmark")?;
    }
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }
    Ok(settings)
}

fn simulate_resize_sweep(
    run_index: usize,
    items: &[MediaItem],
    settings: &LayoutSettings,
    gap: f32,
) -> Result<BenchmarkRun> {
    let width = Rc::new(Cell::new(SWEEP_MIN_WIDTH));
    let container = SimulatedContainer {
        width: Rc::clone(&width),
    };
    let theme = HashMap::from([(DEFAULT_GAP_TOKEN.to_string(), format!("{gap}px"))]);
    let mut coordinator = ResizeCoordinator::new(container, theme, settings.clone());
    coordinator.set_items(items.to_vec())?;

    let mut widths = Vec::new();
    let mut w = SWEEP_MIN_WIDTH;
    while w <= SWEEP_MAX_WIDTH {
        widths.push(w);
        w += SWEEP_STEP;
    }
    let back: Vec<f32> = widths.iter().rev().copied().collect();
    widths.extend(back);

    let start = Instant::now();
    let mut frame_times_ms = Vec::with_capacity(widths.len());
    let mut relayouts = 0usize;
    let mut rows_at_widest = 0usize;

    for frame_width in widths {
        width.set(frame_width);
        let frame_start = Instant::now();
        if coordinator.on_resize()? {
            relayouts += 1;
        }
        frame_times_ms.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        if frame_width >= SWEEP_MAX_WIDTH {
            rows_at_widest = coordinator.rows().len();
        }
    }

    Ok(BenchmarkRun {
        run_index,
        elapsed_ms: start.elapsed().as_millis(),
        frames_simulated: frame_times_ms.len(),
        relayouts,
        rows_at_widest,
        frame_p50_ms: percentile_ms(&frame_times_ms, 0.50),
        frame_p95_ms: percentile_ms(&frame_times_ms, 0.95),
        frames_over_16ms: frame_times_ms.iter().filter(|t| **t > 16.67).count(),
        frames_over_33ms: frame_times_ms.iter().filter(|t| **t > 33.33).count(),
    })
}

/// Deterministic mix of categories, with every third item lacking a ratio.
fn synthetic_items(count: usize) -> Vec<MediaItem> {
    const RATIOS: [f32; 5] = [2.0 / 3.0, 1.0, 0.68, 0.75, 1.78];
    (0..count)
        .map(|i| {
            let category = MediaCategory::ALL[i % MediaCategory::ALL.len()];
            let item = MediaItem::new(i as i64, category);
            if i % 3 == 0 {
                item
            } else {
                item.with_aspect_ratio(RATIOS[i % RATIOS.len()])
            }
        })
        .collect()
}

fn percentile_ms(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let clamped = p.clamp(0.0, 1.0);
    let idx = ((sorted.len() - 1) as f64 * clamped).round() as usize;
    sorted[idx]
}

fn render_report_json(args: &BenchmarkArgs, settings: &LayoutSettings, runs: &[BenchmarkRun]) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str("  \"benchmark\": \"resize_sweep_v1\",\n");
    out.push_str(&format!("  \"items\": {},\n", args.items));
    out.push_str(&format!("  \"columns\": {},\n", settings.columns));
    out.push_str(&format!("  \"min_rows\": {},\n", settings.min_rows));
    out.push_str(&format!("  \"mode\": \"{}\",\n", settings.mode.as_str()));
    out.push_str(&format!("  \"gap\": {:.3},\n", args.gap));

    out.push_str("  \"results\": [\n");
    for (idx, run) in runs.iter().enumerate() {
        out.push_str("    {\n");
        out.push_str(&format!("      \"run_index\": {},\n", run.run_index));
        out.push_str(&format!("      \"elapsed_ms\": {},\n", run.elapsed_ms));
        out.push_str(&format!(
            "      \"frames_simulated\": {},\n",
            run.frames_simulated
        ));
        out.push_str(&format!("      \"relayouts\": {},\n", run.relayouts));
        out.push_str(&format!("      \"rows_at_widest\": {},\n", run.rows_at_widest));
        out.push_str(&format!("      \"frame_p50_ms\": {:.3},\n", run.frame_p50_ms));
        out.push_str(&format!("      \"frame_p95_ms\": {:.3},\n", run.frame_p95_ms));
        out.push_str(&format!(
            "      \"frames_over_16ms\": {},\n",
            run.frames_over_16ms
        ));
        out.push_str(&format!(
            "      \"frames_over_33ms\": {}\n",
            run.frames_over_33ms
        ));
        out.push_str("    }");
        if idx + 1 < runs.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("  ]\n");
    out.push_str("}\n");
    out
}
