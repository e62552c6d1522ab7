use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "softblit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene description to a PNG.
    Compose(ComposeArgs),
    /// Run one image through the pipeline and write it back as a PNG.
    Convert(ConvertArgs),
    /// Print dimensions of a decoded image.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input image (any format the decoder understands).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Resize to WIDTHxHEIGHT before writing.
    #[arg(long, value_parser = parse_size)]
    resize: Option<SizeSpec>,

    /// Mirror left-right.
    #[arg(long)]
    flip_h: bool,

    /// Mirror top-bottom.
    #[arg(long)]
    flip_v: bool,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug)]
struct SizeSpec {
    width: u32,
    height: u32,
}

fn parse_size(s: &str) -> Result<SizeSpec, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w.parse::<u32>().map_err(|e| format!("bad width: {e}"))?;
    let height = h.parse::<u32>().map_err(|e| format!("bad height: {e}"))?;
    Ok(SizeSpec { width, height })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<softblit::Scene> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: softblit::Scene = serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn write_png(
    path: &Path,
    data: &[u8],
    width: u32,
    height: u32,
    color: image::ColorType,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(path, data, width, height, color, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let scene = read_scene_json(&args.in_path)?;
    scene.validate()?;

    let assets_root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let frame = softblit::render_scene(&scene, assets_root)?;

    let rgba = frame.readback_rgba8();
    write_png(
        &args.out,
        &rgba,
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
    )?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut img = softblit::load(&args.in_path)?;

    if args.flip_h {
        img.flip_horizontal();
    }
    if args.flip_v {
        img.flip_vertical();
    }
    if let Some(size) = args.resize {
        img = img.resize(size.width, size.height)?;
    }

    let color = match img.channels() {
        3 => image::ColorType::Rgb8,
        _ => image::ColorType::Rgba8,
    };
    write_png(&args.out, img.pixels(), img.width(), img.height(), color)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let native = softblit::decode(&args.in_path)?;
    println!(
        "{}: {}x{}, stride {} bytes",
        args.in_path.display(),
        native.width(),
        native.height(),
        native.stride()
    );
    Ok(())
}
