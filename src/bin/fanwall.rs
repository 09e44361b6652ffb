use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fanwall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one wallpaper as a PNG.
    Render(RenderArgs),
    /// Print the computed layout as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Render request JSON.
    #[arg(long)]
    request: PathBuf,

    /// Root for relative asset references (patches, logos, image themes).
    #[arg(long)]
    assets: PathBuf,

    /// Theme catalog JSON (array of themes).
    #[arg(long)]
    themes: Option<PathBuf>,

    /// Patch catalog JSON (array of patches).
    #[arg(long)]
    patches: Option<PathBuf>,

    /// Match list JSON; overrides the request's matches.
    #[arg(long)]
    matches: Option<PathBuf>,

    /// Font directory (defaults to `<assets>/fonts`).
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Keep the live date/time block (preview rendering).
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Seed for decorative effects.
    #[arg(long)]
    seed: Option<u64>,

    /// Origin sent with cross-origin image requests.
    #[arg(long, default_value = "https://fanwall.local")]
    origin: String,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1080)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 1920)]
    height: u32,

    /// Patch position ratio.
    #[arg(long, default_value_t = 0.4)]
    patch_position: f64,

    /// Match row margin ratio.
    #[arg(long, default_value_t = 0.15)]
    match_row_margin: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut req = fanwall::RenderRequest::from_path(&args.request)?;
    if let Some(path) = &args.matches {
        let matches: Vec<fanwall::Match> = fanwall::load_json_list(path)?;
        req.matches = fanwall::MatchProvider::next_matches(&matches, 6)?;
    }

    let themes: Vec<fanwall::ThemeDescriptor> = load_optional(args.themes.as_deref())?;
    let patches: Vec<fanwall::PatchDescriptor> = load_optional(args.patches.as_deref())?;
    let catalog = fanwall::Catalog::from_providers(&themes, &patches);

    let font_dir = args
        .fonts
        .clone()
        .unwrap_or_else(|| args.assets.join("fonts"));
    let opts = fanwall::CompositorOpts {
        effects_seed: args.seed,
        ..fanwall::CompositorOpts::default()
    };
    let mut compositor = fanwall::Compositor::new(
        catalog,
        fanwall::SourceFetcher::new(&args.assets, args.origin.clone()),
        fanwall::DirFontProvider::new(font_dir),
        opts,
    );

    let frame = if args.preview {
        compositor.render(&req)?
    } else {
        compositor.render_export(&req)?
    };
    if frame.tainted {
        tracing::warn!("frame includes images loaded without cross-origin approval");
    }

    fanwall::write_png(&frame, &args.out)
        .with_context(|| format!("export '{}'", args.out.display()))?;
    eprintln!("wrote {} ({}x{})", args.out.display(), frame.width, frame.height);
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let canvas = fanwall::Canvas::new(args.width, args.height)?;
    let layout = fanwall::compute_layout(canvas, args.patch_position, args.match_row_margin);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn load_optional<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> anyhow::Result<Vec<T>> {
    match path {
        Some(p) => Ok(fanwall::load_json_list(p)?),
        None => Ok(Vec::new()),
    }
}
