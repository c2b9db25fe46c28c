use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use easel::{
    EaseSpec, Encoding, ExportOutcome, ExportRequest, ExportedFrame, FrameProps, Raster,
    RasterAdapter, Renderer, Settings, SketchController, Timing, resolve_geometry,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "easel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved geometry and timing of a settings file as JSON.
    Resolve(ResolveArgs),
    /// Export the built-in demo sketch as a still or a frame sequence.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Settings JSON.
    #[arg(long)]
    settings: PathBuf,

    /// Viewport size in CSS pixels, for percent units and missing dimensions.
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<(f64, f64)>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Settings JSON.
    #[arg(long)]
    settings: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Capture only the current frame.
    #[arg(long, conflicts_with = "frames")]
    single: bool,

    /// Number of sequence frames, required for static sketches.
    #[arg(long)]
    frames: Option<u64>,

    /// Output encoding (png, jpeg, raw). Defaults to the settings' `encoding`.
    #[arg(long)]
    encoding: Option<Encoding>,

    /// Capture pixel ratio. Defaults to `exportPixelRatio`.
    #[arg(long)]
    pixel_ratio: Option<f64>,

    /// Viewport size in CSS pixels, for percent units and missing dimensions.
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<(f64, f64)>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn parse_viewport(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("viewport width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("viewport height: {e}"))?;
    Ok((w, h))
}

fn adapter(viewport: Option<(f64, f64)>) -> RasterAdapter {
    match viewport {
        Some((w, h)) => RasterAdapter::new().with_viewport(w, h),
        None => RasterAdapter::new(),
    }
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let settings = Settings::from_path(&args.settings)?;
    let hints = easel::RenderAdapter::display_hints(&adapter(args.viewport));
    let geometry = resolve_geometry(&settings, &hints)?;
    let timing = Timing::from_settings(&settings)?;

    let report = serde_json::json!({
        "geometry": geometry,
        "timing": {
            "fps": timing.fps.get(),
            "duration": timing.duration,
            "totalFrames": timing.total_frames,
            "animate": timing.animate,
            "loop": timing.looping,
            "static": timing.is_static(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let settings = Settings::from_path(&args.settings)?;
    let ease = match settings.extra.get("ease") {
        Some(serde_json::Value::String(name)) => EaseSpec::from(name.as_str()),
        Some(other) => anyhow::bail!("`ease` must be a curve name, got {other}"),
        None => EaseSpec::from(easel::Ease::SineInOut),
    };
    let mut controller =
        SketchController::initialize(settings, adapter(args.viewport), demo_sketch(ease))?;

    let mut request = if args.single {
        ExportRequest::single()
    } else {
        ExportRequest::sequence()
    };
    if let Some(n) = args.frames {
        request = request.frame_count(n);
    }
    if let Some(encoding) = args.encoding {
        request = request.encoding(encoding);
    }
    if let Some(ratio) = args.pixel_ratio {
        request = request.pixel_ratio(ratio);
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    if args.single {
        let result = controller.export_single(&request)?;
        for frame in &result.frames {
            write_frame(&args.out, frame)?;
        }
        return Ok(());
    }

    // Each frame is written as soon as it is produced.
    let mut sequence = controller.export_sequence(&request)?;
    for frame in sequence.by_ref() {
        write_frame(&args.out, &frame?)?;
    }
    match sequence.finish()? {
        ExportOutcome::Complete(_) => {}
        ExportOutcome::Cancelled(_) => tracing::warn!("export ended early"),
    }
    Ok(())
}

fn write_frame(dir: &Path, frame: &ExportedFrame) -> anyhow::Result<()> {
    let path = dir.join(&frame.suggested_name);
    std::fs::write(&path, &frame.data)
        .with_context(|| format!("write frame '{}'", path.display()))?;
    tracing::info!(
        index = frame.index,
        width = frame.width,
        height = frame.height,
        path = %path.display(),
        "wrote frame"
    );
    Ok(())
}

/// A bar sweeping across the canvas once per loop, eased by `ease`.
fn demo_sketch(
    ease: EaseSpec,
) -> impl FnOnce(&mut FrameProps<'_, Raster>) -> anyhow::Result<Renderer<Raster>> {
    move |props: &mut FrameProps<'_, Raster>| {
        let ease = ease.resolve()?;
        tracing::debug!(
            width = props.pixel_width,
            height = props.pixel_height,
            ?ease,
            "demo sketch set up"
        );
        Ok(Renderer::function(move |props: &mut FrameProps<'_, Raster>| {
            let (w, h) = (props.pixel_width, props.pixel_height);
            props.context.clear([18, 20, 28, 255]);

            let bar = (w / 8).max(1);
            let travel = f64::from(w.saturating_sub(bar));
            let x = (ease.apply(props.playhead) * travel).round() as i64;
            let shade = (64.0 + 191.0 * props.playhead) as u8;
            props.context.fill_rect(x, 0, bar, h, [shade, 128, 255 - shade, 255]);
            Ok(())
        }))
    }
}
