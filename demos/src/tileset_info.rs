//! Load a tileset, report what was found, and write the whole catalog as a
//! rescaled PNG sheet.
//!
//! ```text
//! tileset-info [TILESET] [--tile WxH] [--zoom MODE] [--window WxH]
//!              [--font FILE] [--family NAME] [--out FILE]
//! ```
//!
//! `MODE` is one of `normal`, `fullscreen`, `horizontal`, `vertical`.
//! With `--font` or `--family`, the sheet gets a caption drawn in that font;
//! a family without a file is looked up among the installed fonts.

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{error, info};
use tileport_core::{ColorPair, Pixel, PixelBuffer, Point, Size};
use tileport_font::{DrawFeatures, FontBackend, FontConfig, FontLibrary};
use tileport_tiles::{TileSource, TilesetConfig, TilesetSession, ZoomMode};

struct Args {
    tileset: TilesetConfig,
    zoom: ZoomMode,
    window: Size,
    font: Option<PathBuf>,
    family: Option<String>,
    out: PathBuf,
}

fn parse_size(s: &str) -> Option<Size> {
    let (w, h) = s.split_once('x')?;
    Some(Size::new(w.parse().ok()?, h.parse().ok()?))
}

fn parse_zoom(s: &str) -> Option<ZoomMode> {
    Some(match s {
        "normal" => ZoomMode::Normal,
        "fullscreen" => ZoomMode::Fullscreen,
        "horizontal" => ZoomMode::Horizontal,
        "vertical" => ZoomMode::Vertical,
        _ => return None,
    })
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        tileset: TilesetConfig::default(),
        zoom: ZoomMode::Normal,
        window: Size::new(1280, 720),
        font: None,
        family: None,
        out: PathBuf::from("tilesheet.png"),
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |name: &str| it.next().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--tile" => {
                let v = value("--tile")?;
                let size = parse_size(&v).ok_or_else(|| format!("bad tile size {v:?}"))?;
                args.tileset.tile_width = size.width;
                args.tileset.tile_height = size.height;
            }
            "--zoom" => {
                let v = value("--zoom")?;
                args.zoom = parse_zoom(&v).ok_or_else(|| format!("unknown zoom mode {v:?}"))?;
            }
            "--window" => {
                let v = value("--window")?;
                args.window = parse_size(&v).ok_or_else(|| format!("bad window size {v:?}"))?;
            }
            "--font" => args.font = Some(PathBuf::from(value("--font")?)),
            "--family" => args.family = Some(value("--family")?),
            "--out" => args.out = PathBuf::from(value("--out")?),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path => args.tileset.tile_file = PathBuf::from(path),
        }
    }
    Ok(args)
}

/// Lay every tile out on the catalog's grid at `cell` size.
fn tile_sheet(session: &mut TilesetSession, cell: Size) -> PixelBuffer {
    let columns = session.catalog().columns();
    let rows = session.catalog().rows();
    let mut sheet = PixelBuffer::filled(columns * cell.width, rows * cell.height, Pixel::TRANSPARENT);
    for i in 0..session.tile_count() as i32 {
        let (col, row) = (i as u32 % columns.max(1), i as u32 / columns.max(1));
        let at = Point::new((col * cell.width) as i32, (row * cell.height) as i32);
        sheet.blit(&session.scaled_tile(i, cell).pixels, at);
    }
    sheet
}

fn caption(font_file: Option<&Path>, family: Option<&str>, text: &str) -> Result<PixelBuffer, Box<dyn Error>> {
    let mut config = FontConfig::default();
    if let Some(family) = family {
        config.family = family.to_string();
    }
    let mut library = FontLibrary::new();
    if let Some(path) = font_file {
        library.load_file(&config.family, path)?;
    }
    let renderer = library.renderer(&config, FontBackend::default())?;
    let colors = ColorPair::new(Pixel::WHITE, Pixel::rgba(0, 0, 0, 160));
    Ok(renderer.render_or_placeholder(text, colors, DrawFeatures::SUBPIXEL))
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut session = TilesetSession::load(&args.tileset)?;
    let native = session.tile_size();
    let cell = args.zoom.cell_size(native, args.window);

    println!("format:     {}", session.format());
    println!("tile size:  {native}");
    println!(
        "catalog:    {} tiles ({} x {})",
        session.tile_count(),
        session.catalog().columns(),
        session.catalog().rows()
    );
    match session.palette() {
        Some(p) => println!("palette:    {} colors", p.len()),
        None => println!("palette:    none (true color)"),
    }
    if let Some(desc) = session.image_desc() {
        println!("desc:       {desc}");
    }
    println!("zoom:       {} -> cell {cell}", args.zoom.description());

    let mut sheet = tile_sheet(&mut session, cell);
    if args.font.is_some() || args.family.is_some() {
        let text = format!("{} tiles at {cell}", session.tile_count());
        let label = caption(args.font.as_deref(), args.family.as_deref(), &text)?;
        sheet.composite(&label, Point::ZERO);
    }

    let image = image::RgbaImage::from_raw(sheet.width(), sheet.height(), sheet.to_rgba_bytes())
        .ok_or("tile sheet has an inconsistent size")?;
    image.save(&args.out)?;
    info!("wrote {} ({})", args.out.display(), sheet.size());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("tileset-info: {e}");
            return ExitCode::from(2);
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
