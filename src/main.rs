use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use spritegrid::backend::raster::RasterBackend;
use spritegrid::{compositor, SheetConfig, SourceFrame};

#[derive(Parser, Debug)]
#[command(name = "spritegrid", version, about = "Compose PNG frames into a grid sprite sheet")]
struct Cli {
    /// Frame images in placement order; all must share one canvas size
    #[arg(required = true)]
    frames: Vec<PathBuf>,

    /// Number of grid columns
    #[arg(long, default_value_t = 10)]
    columns: u32,

    /// File name for the composited sheet image
    #[arg(long, default_value = "sheet.png")]
    sheet_name: String,

    /// File name for the placement manifest
    #[arg(long, default_value = "sprites.json")]
    manifest_name: String,

    /// Directory to write the sheet and manifest into
    #[arg(long, default_value = ".")]
    output_folder: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SheetConfig {
        columns: cli.columns,
        output_name: cli.manifest_name,
        output_folder: cli.output_folder,
    };

    let mut backend = RasterBackend::new();
    let mut frames = Vec::with_capacity(cli.frames.len());
    let mut canvas: Option<(u32, u32)> = None;

    for (index, path) in cli.frames.iter().enumerate() {
        let pixels = image::open(path)
            .with_context(|| format!("Failed to load frame {}", path.display()))?
            .to_rgba8();
        let dims = (pixels.width(), pixels.height());
        match canvas {
            None => canvas = Some(dims),
            Some(expected) if expected != dims => bail!(
                "Frame {} is {}x{} but earlier frames are {}x{}",
                path.display(),
                dims.0,
                dims.1,
                expected.0,
                expected.1
            ),
            Some(_) => {}
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("frame_{}", index));
        frames.push(SourceFrame {
            index,
            name,
            width: dims.0,
            height: dims.1,
            // PNG inputs carry no trim metadata; content fills the canvas
            offset_x: 0,
            offset_y: 0,
        });
        backend.insert_frame(index, pixels);
    }

    let (cell_width, cell_height) = canvas.context("No input frames")?;
    let out = compositor::compose(&frames, cell_width, cell_height, config.columns, &mut backend)?;
    let payload = out.manifest.render()?;

    let sheet_path = config.output_folder.join(&cli.sheet_name);
    let manifest_path = config.output_folder.join(&config.output_name);

    let pixels = backend
        .layer_pixels(out.layer)
        .context("Backend lost the destination layer")?;
    pixels
        .save(&sheet_path)
        .with_context(|| format!("Failed to write {}", sheet_path.display()))?;
    fs::write(&manifest_path, payload)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    println!(
        "Wrote {}x{} sheet ({} frames, {} columns) to {}",
        out.plan.sheet_width,
        out.plan.sheet_height,
        frames.len(),
        out.plan.columns,
        sheet_path.display()
    );
    println!("Wrote manifest to {}", manifest_path.display());
    Ok(())
}
