//! Frame compositing: drives the backend to place each frame into its grid
//! cell and accumulates the placement manifest.
//!
//! The pipeline is strictly sequential. Each frame's composite step leans on
//! transient backend state (the active paste buffer) left by the previous
//! step, so no two frames may be composited concurrently against the same
//! destination canvas.

use log::debug;

use crate::backend::{CanvasId, ImageEditingBackend, LayerId};
use crate::layout::{plan, SheetPlan};
use crate::manifest::{Manifest, PlacedFrame};
use crate::{Error, Result, SourceFrame};

/// Output of a whole-sheet composite: the backend handles for the finished
/// sheet plus the frozen manifest.
#[derive(Debug)]
pub struct Composite {
    pub canvas: CanvasId,
    pub layer: LayerId,
    pub plan: SheetPlan,
    pub manifest: Manifest,
}

/// Composite one frame into its grid cell.
///
/// The backend pastes the frame as a floating buffer at an offset of its own
/// choosing, which may differ from the frame's declared offset within the
/// source canvas. The translation reconciles the three coordinate spaces:
///
/// ```text
/// dx = cell_x - paste_x + frame.offset_x
/// dy = cell_y - paste_y + frame.offset_y
/// ```
///
/// The reported rectangle is `(cell + paste offset, frame extent)`, which is
/// deliberately not the same combination of offsets as the translation. That
/// mismatch is the established wire contract for the manifest and is kept
/// as-is; golden fixtures pin it down.
///
/// Once the paste has succeeded the buffer is anchored on every path, even
/// when the translate fails, so no stray floating buffer survives into the
/// next frame's composite step.
pub fn place(
    frame: &SourceFrame,
    cell_origin: (i32, i32),
    dest: LayerId,
    backend: &mut dyn ImageEditingBackend,
) -> Result<PlacedFrame> {
    let i = frame.index;
    let (cell_x, cell_y) = cell_origin;

    backend
        .copy_content(frame)
        .map_err(|e| Error::backend(i, "copy_content", e.0))?;
    let paste = backend
        .paste_as_floating(dest)
        .map_err(|e| Error::backend(i, "paste_as_floating", e.0))?;

    let dx = cell_x - paste.offset_x + frame.offset_x;
    let dy = cell_y - paste.offset_y + frame.offset_y;
    debug!(
        "frame {} '{}': cell ({}, {}), paste ({}, {}), translate ({}, {})",
        i, frame.name, cell_x, cell_y, paste.offset_x, paste.offset_y, dx, dy
    );

    let translated = backend
        .translate(paste.handle, dx, dy)
        .map_err(|e| Error::backend(i, "translate", e.0));
    // the paste buffer must be released whether or not the translate landed
    let anchored = backend
        .anchor(paste.handle)
        .map_err(|e| Error::backend(i, "anchor", e.0));
    translated?;
    anchored?;

    Ok(PlacedFrame {
        name: frame.name.clone(),
        pixel_x: cell_x + paste.offset_x,
        pixel_y: cell_y + paste.offset_y,
        width: frame.width,
        height: frame.height,
    })
}

/// Run the full pipeline: plan the grid, prepare a destination canvas, place
/// every frame in index order, and return the frozen manifest.
///
/// All-or-nothing at the manifest boundary: a failure at frame `i` returns
/// the error without a manifest, and no rollback is attempted on the canvas
/// mutations already committed for frames `0..i`.
pub fn compose(
    frames: &[SourceFrame],
    cell_width: u32,
    cell_height: u32,
    columns: u32,
    backend: &mut dyn ImageEditingBackend,
) -> Result<Composite> {
    let sheet_plan = plan(frames.len(), columns, cell_width, cell_height)?;
    for (pos, frame) in frames.iter().enumerate() {
        if frame.index != pos {
            return Err(Error::InvalidInput(format!(
                "frame '{}' has index {} but sits at position {}",
                frame.name, frame.index, pos
            )));
        }
    }

    let canvas = backend
        .create_canvas(sheet_plan.sheet_width, sheet_plan.sheet_height)
        .map_err(|e| Error::Setup {
            operation: "create_canvas",
            message: e.0,
        })?;
    let layer = backend
        .create_layer(canvas, sheet_plan.sheet_width, sheet_plan.sheet_height)
        .map_err(|e| Error::Setup {
            operation: "create_layer",
            message: e.0,
        })?;
    backend.add_layer(canvas, layer).map_err(|e| Error::Setup {
        operation: "add_layer",
        message: e.0,
    })?;

    let mut manifest = Manifest::new(sheet_plan.sheet_width, sheet_plan.sheet_height);
    for frame in frames {
        let origin = sheet_plan.cell_origin(frame.index);
        let placed = place(frame, origin, layer, backend)?;
        manifest.push(placed);
    }

    debug!(
        "composited {} frames into {}x{} sheet",
        frames.len(),
        sheet_plan.sheet_width,
        sheet_plan.sheet_height
    );
    Ok(Composite {
        canvas,
        layer,
        plan: sheet_plan,
        manifest,
    })
}
