use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lazyraster::{AlphaMask, BitDepth, Color, LazyBitmap, RasterSettings, Size};

#[derive(Parser, Debug)]
#[command(name = "lazyraster", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON scene onto a virtual device and print probed pixels as JSON.
    Scene(SceneArgs),
    /// Blend a uniform mask with a uniform gray bitmap and print the result as JSON.
    Blend(BlendArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Disable accelerated images regardless of the scene's settings and `LAZYRASTER_ACCEL`.
    #[arg(long)]
    software: bool,
}

#[derive(Parser, Debug)]
struct BlendArgs {
    /// Mask transparency (0 is opaque).
    #[arg(long)]
    alpha: u8,

    /// Gray level of the color bitmap.
    #[arg(long)]
    gray: u8,

    /// Read a pixel and build images on both operands before blending.
    #[arg(long)]
    materialize: bool,

    /// Width and height of both operands.
    #[arg(long, default_value_t = 10)]
    size: u32,
}

#[derive(serde::Serialize)]
struct BlendReport {
    value: u8,
    bit_depth: u16,
    state: lazyraster::BitmapState,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Scene(args) => cmd_scene(args),
        Command::Blend(args) => cmd_blend(args),
    }
}

fn cmd_scene(args: SceneArgs) -> anyhow::Result<()> {
    let mut scene = lazyraster::scene::Scene::from_path(&args.in_path)
        .with_context(|| format!("load scene '{}'", args.in_path.display()))?;
    scene.settings = scene.settings.with_env();
    if args.software {
        scene.settings = RasterSettings::software();
    }
    let report = scene.render().with_context(|| "render scene")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_blend(args: BlendArgs) -> anyhow::Result<()> {
    let settings = RasterSettings::from_env();
    let size = Size::new(args.size, args.size)?;

    let mut alpha = AlphaMask::with_settings(size, settings);
    alpha.erase(args.alpha);
    let mut bitmap = LazyBitmap::with_settings(size, BitDepth::Bits24, settings);
    bitmap.erase(Color::gray(args.gray));

    if args.materialize {
        alpha.value(0, 0)?;
        alpha.accelerated_image()?;
        bitmap.read_pixel(0, 0)?;
        bitmap.accelerated_image()?;
    }

    alpha.blend_with(&mut bitmap)?;
    let state = alpha.state();
    let report = BlendReport {
        value: alpha.value(0, 0)?,
        bit_depth: alpha.bit_depth().bits(),
        state,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
