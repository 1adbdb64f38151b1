//! Pixel-buffer backend over in-memory RGBA images.
//!
//! Frames are registered up front as RGBA buffers keyed by frame index;
//! `copy_content` pulls from that registry, pastes land at the destination
//! origin, and `anchor` blits the floating buffer into the layer at its
//! translated position, clipping to the layer bounds. Fully transparent
//! source pixels are skipped so stacked pastes behave like layer flattening.

use std::collections::HashMap;

use image::RgbaImage;
use log::warn;

use super::{
    BackendError, BackendResult, CanvasId, ContentId, FloatingId, FloatingPaste,
    ImageEditingBackend, LayerId,
};
use crate::SourceFrame;

/// An [`ImageEditingBackend`] that composites real pixels.
#[derive(Debug, Default)]
pub struct RasterBackend {
    next_id: u32,
    frames: HashMap<usize, RgbaImage>,
    canvases: HashMap<CanvasId, (u32, u32)>,
    layers: HashMap<LayerId, LayerState>,
    clipboard: Option<RgbaImage>,
    floating: Option<Floating>,
}

#[derive(Debug)]
struct LayerState {
    canvas: CanvasId,
    pixels: RgbaImage,
}

#[derive(Debug)]
struct Floating {
    handle: FloatingId,
    dest: LayerId,
    pixels: RgbaImage,
    x: i32,
    y: i32,
}

impl RasterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pixel source for a frame index. Must happen before the
    /// compositor copies that frame.
    pub fn insert_frame(&mut self, index: usize, pixels: RgbaImage) {
        self.frames.insert(index, pixels);
    }

    /// The composited pixels of a layer, once frames have been anchored into
    /// it.
    pub fn layer_pixels(&self, layer: LayerId) -> Option<&RgbaImage> {
        self.layers.get(&layer).map(|l| &l.pixels)
    }

    fn fresh_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl ImageEditingBackend for RasterBackend {
    fn create_canvas(&mut self, width: u32, height: u32) -> BackendResult<CanvasId> {
        if width == 0 || height == 0 {
            return Err(BackendError::new("zero-sized canvas"));
        }
        let id = CanvasId(self.fresh_id());
        self.canvases.insert(id, (width, height));
        Ok(id)
    }

    fn create_layer(&mut self, canvas: CanvasId, width: u32, height: u32) -> BackendResult<LayerId> {
        if !self.canvases.contains_key(&canvas) {
            return Err(BackendError::new("unknown canvas"));
        }
        if width == 0 || height == 0 {
            return Err(BackendError::new("zero-sized layer"));
        }
        let id = LayerId(self.fresh_id());
        self.layers.insert(
            id,
            LayerState {
                canvas,
                pixels: RgbaImage::new(width, height),
            },
        );
        Ok(id)
    }

    fn add_layer(&mut self, canvas: CanvasId, layer: LayerId) -> BackendResult<()> {
        match self.layers.get(&layer) {
            Some(state) if state.canvas == canvas => Ok(()),
            Some(_) => Err(BackendError::new("layer belongs to another canvas")),
            None => Err(BackendError::new("unknown layer")),
        }
    }

    fn copy_content(&mut self, frame: &SourceFrame) -> BackendResult<ContentId> {
        let pixels = self
            .frames
            .get(&frame.index)
            .ok_or_else(|| BackendError::new(format!("no pixels registered for frame {}", frame.index)))?;
        if pixels.width() != frame.width || pixels.height() != frame.height {
            warn!(
                "frame {} declares {}x{} but its pixels are {}x{}",
                frame.index,
                frame.width,
                frame.height,
                pixels.width(),
                pixels.height()
            );
        }
        self.clipboard = Some(pixels.clone());
        Ok(ContentId(self.fresh_id()))
    }

    fn paste_as_floating(&mut self, dest: LayerId) -> BackendResult<FloatingPaste> {
        if !self.layers.contains_key(&dest) {
            return Err(BackendError::new("unknown destination layer"));
        }
        if self.floating.is_some() {
            return Err(BackendError::new(
                "previous floating buffer was never anchored",
            ));
        }
        // the clipboard survives the paste, as layer-based editors do
        let pixels = self
            .clipboard
            .clone()
            .ok_or_else(|| BackendError::new("clipboard is empty"))?;
        let handle = FloatingId(self.fresh_id());
        self.floating = Some(Floating {
            handle,
            dest,
            pixels,
            x: 0,
            y: 0,
        });
        Ok(FloatingPaste {
            handle,
            offset_x: 0,
            offset_y: 0,
        })
    }

    fn translate(&mut self, handle: FloatingId, dx: i32, dy: i32) -> BackendResult<()> {
        match self.floating.as_mut() {
            Some(f) if f.handle == handle => {
                f.x += dx;
                f.y += dy;
                Ok(())
            }
            _ => Err(BackendError::new("no such floating buffer")),
        }
    }

    fn anchor(&mut self, handle: FloatingId) -> BackendResult<()> {
        let f = match self.floating.take() {
            Some(f) if f.handle == handle => f,
            Some(f) => {
                self.floating = Some(f);
                return Err(BackendError::new("no such floating buffer"));
            }
            None => return Err(BackendError::new("no floating buffer to anchor")),
        };
        let layer = self
            .layers
            .get_mut(&f.dest)
            .ok_or_else(|| BackendError::new("destination layer vanished"))?;

        let (lw, lh) = (layer.pixels.width() as i32, layer.pixels.height() as i32);
        for (sx, sy, px) in f.pixels.enumerate_pixels() {
            if px[3] == 0 {
                continue;
            }
            let dx = f.x + sx as i32;
            let dy = f.y + sy as i32;
            if dx < 0 || dy < 0 || dx >= lw || dy >= lh {
                continue;
            }
            layer.pixels.put_pixel(dx as u32, dy as u32, *px);
        }
        Ok(())
    }
}
