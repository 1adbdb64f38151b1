//! Grid layout planning: sheet dimensions and per-frame cell origins.
//!
//! Everything here is pure arithmetic over the inputs; no backend calls, no
//! shared state. The planner is safe to call concurrently for different
//! inputs.

use serde::Serialize;

use crate::{Error, Result};

/// The computed grid layout for one sheet. Immutable once planned.
///
/// `cell_width`/`cell_height` are the shared source canvas dimensions, not
/// any individual frame's trimmed extent: every cell in the grid is the same
/// size so that frames keep their original in-canvas alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetPlan {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub sheet_width: u32,
    pub sheet_height: u32,
}

impl SheetPlan {
    /// Top-left corner of the grid cell for frame `index` (0-based), in
    /// sheet-pixel space.
    ///
    /// Fill order is row-major: left-to-right, top-to-bottom. This order is
    /// part of the contract — when the frame count is not a multiple of the
    /// column count, the blank cells are always the trailing cells of the
    /// last row.
    pub fn cell_origin(&self, index: usize) -> (i32, i32) {
        let col = index as u32 % self.columns;
        let row = index as u32 / self.columns;
        ((col * self.cell_width) as i32, (row * self.cell_height) as i32)
    }
}

/// Compute the sheet layout for `frame_count` frames arranged in `columns`
/// columns of `cell_width` x `cell_height` cells.
///
/// Fails with [`Error::InvalidInput`] if any argument is zero. Row count is
/// integer ceiling division, so an exact multiple of `columns` adds no empty
/// trailing row.
pub fn plan(frame_count: usize, columns: u32, cell_width: u32, cell_height: u32) -> Result<SheetPlan> {
    if frame_count == 0 {
        return Err(Error::InvalidInput("frame count must be positive".into()));
    }
    if columns == 0 {
        return Err(Error::InvalidInput("column count must be positive".into()));
    }
    if cell_width == 0 || cell_height == 0 {
        return Err(Error::InvalidInput(format!(
            "cell dimensions must be positive, got {}x{}",
            cell_width, cell_height
        )));
    }

    let frame_count = frame_count as u32;
    let rows = frame_count.div_ceil(columns);

    Ok(SheetPlan {
        columns,
        rows,
        cell_width,
        cell_height,
        sheet_width: cell_width * columns,
        sheet_height: cell_height * rows,
    })
}
