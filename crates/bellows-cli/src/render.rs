use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bellows_export::{DxfSurface, SvgSurface};
use bellows_layout::Generator;
use bellows_parser::BellowsConfig;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Png,
    Svg,
    Dxf,
    DataUri,
}

impl OutputFormat {
    /// From the output file extension; PNG for unknown extensions, a data URI on stdout.
    fn infer(output: Option<&Path>) -> Self {
        let Some(path) = output else {
            return OutputFormat::DataUri;
        };
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("svg") => OutputFormat::Svg,
            Some("dxf") => OutputFormat::Dxf,
            Some("txt") | Some("uri") => OutputFormat::DataUri,
            _ => OutputFormat::Png,
        }
    }
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Bellows options file (YAML or JSON); defaults apply when omitted
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the resolution in dots per inch
    #[arg(long, value_name = "DPI")]
    dpi: Option<f64>,

    /// Override the number of pieces (1, 2 or 4)
    #[arg(long, value_name = "N")]
    parts: Option<u32>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output file; without it the result is written to stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Leave out the line-style key
    #[arg(long)]
    no_legend: bool,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Serialize)]
struct ScheduleReport {
    resolution: f64,
    parts: u8,
    pitch: f64,
    fold_count: u32,
    length: f64,
    angle_w: f64,
    angle_h: f64,
}

fn load_generator(args: &ConfigArgs, no_legend: bool) -> Result<Generator, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            BellowsConfig::from_path(path).map_err(|e| CliError::input(e.to_string()))?
        }
        None => BellowsConfig::default(),
    };
    if let Some(dpi) = args.dpi {
        config.dpi = Some(dpi);
    }
    if let Some(parts) = args.parts {
        config.parts = Some(parts);
    }
    if no_legend {
        config.legend = Some(false);
    }
    let resolved = config
        .resolve()
        .map_err(|e| CliError::input(e.to_string()))?;
    debug!(spec = ?resolved.spec, page = ?resolved.page, "resolved config");
    Generator::new(resolved.spec, resolved.page).map_err(|e| CliError::input(e.to_string()))
}

fn processing(err: impl std::fmt::Display) -> CliError {
    CliError::processing(err.to_string())
}

fn draw(generator: &Generator, format: OutputFormat) -> Result<Vec<u8>, CliError> {
    let page = generator.page();
    match format {
        OutputFormat::Png => bellows_raster::render_png(generator).map_err(processing),
        OutputFormat::DataUri => bellows_raster::render_data_uri(generator)
            .map(String::into_bytes)
            .map_err(processing),
        OutputFormat::Svg => {
            let mut svg = SvgSurface::new(page.width, page.height, generator.spec().resolution)
                .map_err(processing)?;
            generator.render(&mut svg).map_err(processing)?;
            Ok(svg.finish().into_bytes())
        }
        OutputFormat::Dxf => {
            let mut dxf = DxfSurface::new(generator.spec().resolution, page.height)
                .map_err(processing)?;
            generator.render(&mut dxf).map_err(processing)?;
            dxf.to_dxf_string()
                .map(String::into_bytes)
                .map_err(processing)
        }
    }
}

fn write_output(output: Option<&Path>, bytes: &[u8], text: bool) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            if text {
                stdout.write_all(b"\n").context("Failed to write to stdout")?;
            }
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

pub fn run_render(args: RenderArgs) -> Result<(), CliError> {
    let generator = load_generator(&args.config, args.no_legend)?;
    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::infer(args.output.as_deref()));
    debug!(?format, "rendering");
    let bytes = draw(&generator, format)?;
    write_output(
        args.output.as_deref(),
        &bytes,
        format != OutputFormat::Png,
    )
    .map_err(|e| CliError::processing(format!("{e:#}")))
}

pub fn run_schedule(args: ScheduleArgs) -> Result<(), CliError> {
    let generator = load_generator(&args.config, false)?;
    let schedule = generator.schedule();
    let plan = generator.plan();
    let report = ScheduleReport {
        resolution: generator.spec().resolution,
        parts: generator.spec().parts.get(),
        pitch: schedule.pitch,
        fold_count: schedule.fold_count,
        length: schedule.length,
        angle_w: plan.angle_w,
        angle_h: plan.angle_h,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::processing(e.to_string()))?;
    println!("{json}");
    Ok(())
}
