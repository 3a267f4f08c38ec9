//! Main application entry point.

use clap::{Args, Parser, Subcommand};
use markup_app::{AppConfig, AppResult, Session, ShortcutRegistry, load_script};
use markup_core::shapes::{Shape, ShapeId};
use markup_core::storage::{FileSink, from_json};
use markup_render::{BaseImage, RasterRenderer, RenderContext, Renderer, load_font, parse_css_color};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "markup", about = "Annotate images with shapes and text")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Font for text annotations (overrides the config).
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw saved annotations onto an image.
    Render(RenderArgs),
    /// Replay a recorded input script against an image.
    Replay(ReplayArgs),
    /// List keyboard shortcuts.
    Shortcuts,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long)]
    image: PathBuf,
    #[arg(long)]
    annotations: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// Id of a shape to draw highlighted.
    #[arg(long)]
    selected: Option<String>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(long)]
    image: PathBuf,
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    out_dir: PathBuf,
    /// Existing annotations to start from.
    #[arg(long)]
    annotations: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let font_path = cli.font.or_else(|| config.font_path.clone());

    match cli.command {
        Command::Render(args) => render(args, &config, font_path.as_deref()),
        Command::Replay(args) => replay(args, &config, font_path.as_deref()),
        Command::Shortcuts => {
            ShortcutRegistry::print_all();
            Ok(())
        }
    }
}

fn renderer(font_path: Option<&Path>) -> AppResult<RasterRenderer> {
    let renderer = RasterRenderer::new();
    Ok(match font_path {
        Some(path) => renderer.with_font(load_font(path)?),
        None => renderer,
    })
}

fn read_annotations(path: &Path) -> AppResult<Vec<Shape>> {
    let json = std::fs::read_to_string(path)?;
    let shapes = from_json(&json)?;
    log::info!("Loaded {} annotations from {}", shapes.len(), path.display());
    Ok(shapes)
}

fn render(args: RenderArgs, config: &AppConfig, font_path: Option<&Path>) -> AppResult<()> {
    let base = BaseImage::from_path(&args.image)?;
    let shapes = read_annotations(&args.annotations)?;
    let selected = args.selected.map(ShapeId::from);

    let ctx = RenderContext::new(&base, &shapes)
        .with_selected(selected.as_ref())
        .with_highlight(parse_css_color(&config.highlight_color));
    let png = renderer(font_path)?.render_png(&ctx)?;

    std::fs::write(&args.out, &png)?;
    log::info!("Exported PNG to {} ({} bytes)", args.out.display(), png.len());
    Ok(())
}

fn replay(args: ReplayArgs, config: &AppConfig, font_path: Option<&Path>) -> AppResult<()> {
    let base = BaseImage::from_path(&args.image)?;
    let seed = match &args.annotations {
        Some(path) => read_annotations(path)?,
        None => Vec::new(),
    };
    let steps = load_script(&args.script)?;
    let sink = FileSink::new(args.out_dir)?
        .with_file_names(config.annotations_file.clone(), config.image_file.clone());

    let mut session = Session::new(base, seed, config, renderer(font_path)?, sink)?;
    session.run(&steps)
}
