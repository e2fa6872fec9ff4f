//! DuiView CLI - render DuiLib skin XML from the command line

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use duiview_core::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "duiview")]
#[command(about = "Render DuiLib skin XML through the XMLToPng renderer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a skin file to a PNG image
    Render {
        /// Input skin XML file
        #[arg(short, long)]
        input: PathBuf,

        /// Output image file
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        #[command(flatten)]
        flags: RenderFlags,
    },

    /// Watch a skin file and re-render it on every change
    Watch {
        /// Skin file to watch
        input: PathBuf,

        /// Output image file, rewritten after each change
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        #[command(flatten)]
        flags: RenderFlags,
    },
}

#[derive(Args)]
struct RenderFlags {
    /// Language overlay file, defaults to the stored preference
    #[arg(long)]
    language: Option<String>,

    /// Button state to draw, defaults to the stored preference
    #[arg(long)]
    button_state: Option<ButtonState>,

    /// Skin directory passed to the renderer, defaults to the input's parent
    #[arg(long)]
    skin_path: Option<PathBuf>,

    /// Renderer executable, defaults to XMLToPng next to this binary
    #[arg(long)]
    renderer: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            flags,
        } => run_render(&input, &output, &flags),
        Commands::Watch {
            input,
            output,
            flags,
        } => run_watch(&input, &output, &flags),
    }
}

fn run_render(input: &Path, output: &Path, flags: &RenderFlags) -> Result<()> {
    let (renderer, options) = build_invocation(input, flags);
    let png = render_file(&renderer, &options, input)?;

    fs::write(output, &png)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Rendered {} -> {} ({} bytes)",
        input.display(),
        output.display(),
        png.len()
    );
    Ok(())
}

fn run_watch(input: &Path, output: &Path, flags: &RenderFlags) -> Result<()> {
    let (renderer, options) = build_invocation(input, flags);

    // First render up front; later failures keep the watch alive.
    render_to(&renderer, &options, input, output);

    let mut watcher = SkinWatcher::new(None)?;
    watcher.watch(input)?;
    println!("Watching {} (Ctrl-C to stop)", input.display());

    while let Some(event) = watcher.recv() {
        match event {
            WatchEvent::Modified(_) => render_to(&renderer, &options, input, output),
            WatchEvent::Error(detail) => tracing::warn!(%detail, "watch error"),
        }
    }

    Ok(())
}

/// Render and report, without tearing the watch loop down on failure.
fn render_to(renderer: &XmlToPngRenderer, options: &RenderOptions, input: &Path, output: &Path) {
    match render_file(renderer, options, input) {
        Ok(png) => match fs::write(output, &png) {
            Ok(()) => println!("{} -> {} ({} bytes)", input.display(), output.display(), png.len()),
            Err(err) => tracing::error!(%err, "failed to write output"),
        },
        Err(err) => tracing::error!(%err, "render failed"),
    }
}

fn render_file(
    renderer: &XmlToPngRenderer,
    options: &RenderOptions,
    input: &Path,
) -> Result<Vec<u8>> {
    let xml = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let prepared = inject_style_include(&xml)?;
    Ok(renderer.render(&prepared, options)?)
}

/// Resolve the renderer and its options from flags and stored preferences.
fn build_invocation(input: &Path, flags: &RenderFlags) -> (XmlToPngRenderer, RenderOptions) {
    let prefs = PreferenceStore::load_default();

    let skin_dir = flags
        .skin_path
        .clone()
        .or_else(|| {
            input
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let renderer = match &flags.renderer {
        Some(path) => XmlToPngRenderer::new(path, skin_dir),
        None => XmlToPngRenderer::discover(skin_dir),
    };

    let options = RenderOptions {
        language: flags
            .language
            .clone()
            .unwrap_or_else(|| prefs.language().to_owned()),
        button_state: flags
            .button_state
            .map_or_else(|| prefs.button_state().to_owned(), |s| s.as_str().to_owned()),
    };

    (renderer, options)
}
