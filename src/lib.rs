//! Spritegrid
//!
//! A grid sprite-sheet compositor: arranges same-canvas-origin source frames
//! (animation cels) into a single grid-tiled sheet and emits a manifest
//! describing where each frame landed.
//!
//! # Features
//!
//! - **Raster Backend** (default): real RGBA compositing over in-memory
//!   pixel buffers
//! - **Capability Design**: all pixel mutation goes through the
//!   [`ImageEditingBackend`](backend::ImageEditingBackend) trait, so any
//!   layer-based image runtime can be substituted
//! - **Pure Core**: layout planning and manifest rendering are pure
//!   functions, testable without a backend
//!
//! # Example
//!
//! ```
//! use spritegrid::{compositor, SourceFrame};
//! use spritegrid::backend::ScratchBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frames: Vec<SourceFrame> = (0..4)
//!     .map(|i| SourceFrame {
//!         index: i,
//!         name: format!("walk_{}", i),
//!         width: 32,
//!         height: 32,
//!         offset_x: 0,
//!         offset_y: 0,
//!     })
//!     .collect();
//!
//! let mut backend = ScratchBackend::new();
//! let out = compositor::compose(&frames, 32, 32, 2, &mut backend)?;
//! println!("{}", out.manifest.render()?);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use serde::Serialize;

pub mod error;
pub use error::{Error, Result};

pub mod backend;
pub mod compositor;
pub mod layout;
pub mod manifest;

pub use compositor::Composite;
pub use layout::SheetPlan;
pub use manifest::{Manifest, PlacedFrame};

/// One input frame: a single sprite/animation cel.
///
/// `index` is the 0-based insertion order and the sole determinant of grid
/// placement. `width`/`height` are the frame's own trimmed pixel extent;
/// `offset_x`/`offset_y` locate that trimmed content relative to the shared
/// source canvas origin, so frames sharing one logical canvas may still
/// carry different offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFrame {
    pub index: usize,
    /// Identifier recorded in the manifest; need not be unique
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Configuration surface for a sheet run.
///
/// Owned by the caller (typically the CLI); the core library consumes these
/// as already-validated plain values and performs no argument parsing of its
/// own.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Number of grid columns
    pub columns: u32,
    /// Manifest file name
    pub output_name: String,
    /// Directory the sheet and manifest are written to
    pub output_folder: PathBuf,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            output_name: "sprites.json".to_string(),
            output_folder: PathBuf::from("."),
        }
    }
}

/// Create a backend instance with the default implementation.
///
/// With the `raster` feature (default) this is the pixel-compositing
/// [`RasterBackend`](backend::raster::RasterBackend); without it, the
/// bookkeeping [`ScratchBackend`](backend::ScratchBackend).
#[cfg(feature = "raster")]
pub fn new_backend() -> impl backend::ImageEditingBackend {
    backend::raster::RasterBackend::new()
}

#[cfg(not(feature = "raster"))]
pub fn new_backend() -> impl backend::ImageEditingBackend {
    backend::ScratchBackend::new()
}
