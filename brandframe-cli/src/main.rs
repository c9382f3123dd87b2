use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "brandframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the formats of a registry.
    Formats(FormatsArgs),
    /// Render every format as a PNG.
    Render(RenderArgs),
    /// Render every format and write the zip archive.
    Export(ExportArgs),
    /// Print how a caption wraps for a font, size and width.
    Wrap(WrapArgs),
}

#[derive(Args, Debug)]
struct FormatsArgs {
    /// Format registry JSON. Defaults to the built-in training preset.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Format registry JSON. Defaults to the built-in training preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root for overlay paths. Defaults to the config file's directory (or `.`).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Source photo.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Caption text; `\n` starts a new paragraph.
    #[arg(long, default_value = "")]
    caption: String,

    /// Read the caption from a file instead.
    #[arg(long, conflicts_with = "caption")]
    caption_file: Option<PathBuf>,

    /// Caption font (TTF/OTF). Without it captions are not drawn.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Caption font weight (100..=900).
    #[arg(long, default_value_t = 700.0)]
    font_weight: f32,

    /// Background color, `#RRGGBB` or `#RRGGBBAA`.
    #[arg(long, value_parser = parse_color)]
    background: Option<brandframe::Rgba8>,

    /// Caption color, `#RRGGBB` or `#RRGGBBAA`.
    #[arg(long, value_parser = parse_color)]
    text_color: Option<brandframe::Rgba8>,

    /// Drag a format's photo: `ID=DX,DY` (repeatable).
    #[arg(long = "pan", value_parser = parse_pan)]
    pans: Vec<PanArg>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output directory for `{ID}.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Directory receiving the archive.
    #[arg(long)]
    out_dir: PathBuf,

    /// Image format inside the archive (`png` or `jpeg`).
    #[arg(long, default_value = "png")]
    format: String,

    /// Append a `{"name": caption}` record to this JSON-lines file.
    #[arg(long)]
    telemetry: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct WrapArgs {
    /// Caption font (TTF/OTF).
    #[arg(long)]
    font: PathBuf,

    /// Font size in points.
    #[arg(long)]
    size: f32,

    /// Line width limit in pixels.
    #[arg(long)]
    width: f32,

    /// Maximum lines; reports overflow when exceeded.
    #[arg(long)]
    max_lines: Option<usize>,

    /// Caption text.
    text: String,
}

#[derive(Clone, Debug)]
struct PanArg {
    id: String,
    dx: f64,
    dy: f64,
}

fn parse_pan(s: &str) -> Result<PanArg, String> {
    let (id, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=DX,DY, got '{s}'"))?;
    let (dx, dy) = rest
        .split_once(',')
        .ok_or_else(|| format!("expected ID=DX,DY, got '{s}'"))?;
    let num = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid offset '{v}': {e}"))
    };
    if id.trim().is_empty() {
        return Err(format!("missing format id in '{s}'"));
    }
    Ok(PanArg {
        id: id.trim().to_string(),
        dx: num(dx)?,
        dy: num(dy)?,
    })
}

fn parse_color(s: &str) -> Result<brandframe::Rgba8, String> {
    brandframe::Rgba8::from_hex(s).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Formats(args) => cmd_formats(args),
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
        Command::Wrap(args) => cmd_wrap(args),
    }
}

fn load_registry(config: Option<&Path>) -> anyhow::Result<brandframe::TemplateRegistry> {
    match config {
        Some(path) => brandframe::TemplateRegistry::from_path(path)
            .with_context(|| format!("load registry '{}'", path.display())),
        None => Ok(brandframe::TemplateRegistry::training_preset()?),
    }
}

fn cmd_formats(args: FormatsArgs) -> anyhow::Result<()> {
    let reg = load_registry(args.config.as_deref())?;
    for cfg in reg.configs() {
        let text = match &cfg.text {
            Some(t) => format!(
                "text {}pt, max {} lines, width {}px",
                t.font_size_pt, t.max_lines, t.max_width_px
            ),
            None => "no text".to_string(),
        };
        println!(
            "{:<10} {:<16} {:>10}  photo {:>4}px  {}",
            cfg.id,
            cfg.label(),
            cfg.dimensions_label(),
            cfg.photo_area,
            text
        );
    }
    Ok(())
}

fn build_session(
    args: &SessionArgs,
    export_format: brandframe::ExportImageFormat,
) -> anyhow::Result<brandframe::Compositor> {
    let reg = load_registry(args.config.as_deref())?;
    let font_bytes = args
        .font
        .as_ref()
        .map(|p| std::fs::read(p).with_context(|| format!("read font '{}'", p.display())))
        .transpose()?;

    let mut opts = brandframe::CompositorOpts {
        font_bytes,
        font_weight: args.font_weight,
        export_format,
        ..brandframe::CompositorOpts::default()
    };
    if let Some(color) = args.background {
        opts.style.background = color;
    }
    if let Some(color) = args.text_color {
        opts.style.text_color = color;
    }
    let mut comp = brandframe::Compositor::new(reg, opts)?;

    let assets_root = match (&args.assets, &args.config) {
        (Some(root), _) => root.clone(),
        (None, Some(cfg)) => cfg
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        (None, None) => PathBuf::from("."),
    };
    let report = comp.load_overlays(&assets_root);
    for (id, reason) in &report.failed {
        eprintln!("warning: overlay for {id} unavailable: {reason}");
    }

    if let Some(photo) = &args.photo {
        comp.load_from_gallery(photo)
            .with_context(|| format!("load photo '{}'", photo.display()))?;
    }

    let caption = match &args.caption_file {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("read caption '{}'", p.display()))?,
        None => args.caption.replace("\\n", "\n"),
    };
    comp.set_caption(&caption);

    for pan in &args.pans {
        let id = brandframe::FormatId::new(pan.id.clone());
        if comp.registry().get(&id).is_none() {
            anyhow::bail!("--pan refers to unknown format '{id}'");
        }
        if !comp.pointer_down(&id, brandframe::Point::ORIGIN) {
            anyhow::bail!("--pan needs --photo");
        }
        let stored = comp.pointer_move(&id, brandframe::Point::new(pan.dx, pan.dy))?;
        comp.pointer_release();
        if let Some(v) = stored {
            tracing::info!(format = %id, x = v.x, y = v.y, "pan applied");
        }
    }

    for cfg in comp.registry().configs() {
        if let Some(msg) = comp.warning_message(&cfg.id) {
            eprintln!("warning: {}: {msg}", cfg.id);
        }
    }
    if comp.global_warning() {
        eprintln!("warning: caption is too long for at least one format");
    }
    Ok(comp)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let comp = build_session(&args.session, brandframe::ExportImageFormat::Png)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for cfg in comp.registry().configs() {
        let Some(surface) = comp.surface(&cfg.id) else {
            continue;
        };
        let out = args.out_dir.join(format!("{}.png", cfg.id));
        let rgba = surface.to_rgba_image()?;
        image::save_buffer_with_format(
            &out,
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let format: brandframe::ExportImageFormat = args.format.parse()?;
    let comp = build_session(&args.session, format)?;

    let mut sink = brandframe::DirectoryArchiveSink::new(&args.out_dir);
    let report = match &args.telemetry {
        Some(path) => {
            let mut telemetry = brandframe::JsonLinesTelemetry::new(path);
            comp.export_all(&mut telemetry, &mut sink)?
        }
        None => comp.export_all(&mut brandframe::NoTelemetry, &mut sink)?,
    };

    for id in &report.skipped {
        eprintln!("warning: {id} skipped (no render target)");
    }
    for (id, reason) in &report.failed {
        eprintln!("warning: {id} failed to encode: {reason}");
    }
    if let Some(path) = sink.last_path() {
        eprintln!("wrote {} ({} files)", path.display(), report.files.len());
    }
    Ok(())
}

fn cmd_wrap(args: WrapArgs) -> anyhow::Result<()> {
    let mut ts = brandframe::ParleyTypesetter::from_font_file(&args.font)?;
    let font_px = args.size * brandframe::PX_PER_POINT;
    let lines = brandframe::wrap_caption(
        &args.text.replace("\\n", "\n"),
        font_px,
        args.width,
        &mut ts,
    );
    for line in &lines {
        println!("{line}");
    }
    if let Some(max) = args.max_lines
        && lines.len() > max
    {
        eprintln!("warning: {} lines exceed the limit of {max}", lines.len());
    }
    Ok(())
}
