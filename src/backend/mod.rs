//! Image-editing backend capability.
//!
//! The core never talks to a concrete image runtime. All pixel mutation is
//! expressed against the [`ImageEditingBackend`] trait, mirroring the
//! copy/paste/translate/anchor primitives of layer-based editors: copying a
//! frame fills the backend's clipboard slot, pasting produces a floating
//! buffer at a backend-chosen offset, and anchoring commits that buffer into
//! the destination layer. A backend has exactly one active floating buffer
//! at a time.
//!
//! [`ScratchBackend`] is a deterministic bookkeeping implementation used by
//! unit tests and as a pixel-less default.

#[cfg(feature = "raster")]
pub mod raster;

use std::collections::HashMap;

use log::debug;

use crate::SourceFrame;

/// Failure raised by an image-editing primitive.
///
/// Carries only the backend's own message; the compositor wraps it with the
/// frame index and operation name before surfacing it to the caller.
#[derive(Debug, Clone)]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        BackendError(message.into())
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for BackendError {}

/// Result type for backend primitives
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Opaque handle to a destination canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(pub u32);

/// Opaque handle to a layer within a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

/// Opaque handle to copied frame content (the clipboard slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId(pub u32);

/// Opaque handle to the active floating paste buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatingId(pub u32);

/// Result of a paste: the floating buffer handle plus the offset the backend
/// chose for it. Paste may re-center content relative to the destination, so
/// this offset need not match the frame's own declared offset.
#[derive(Debug, Clone, Copy)]
pub struct FloatingPaste {
    pub handle: FloatingId,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// The image-editing primitives the compositor needs.
///
/// All methods are synchronous and may fail; the core propagates failures
/// without retrying. Implementations own the single floating-buffer slot:
/// after [`anchor`](Self::anchor) the handle is dead and must not be reused.
pub trait ImageEditingBackend {
    /// Create a destination canvas of the given size.
    fn create_canvas(&mut self, width: u32, height: u32) -> BackendResult<CanvasId>;

    /// Create a layer sized for the given canvas.
    fn create_layer(&mut self, canvas: CanvasId, width: u32, height: u32) -> BackendResult<LayerId>;

    /// Attach a layer to a canvas.
    fn add_layer(&mut self, canvas: CanvasId, layer: LayerId) -> BackendResult<()>;

    /// Copy a frame's content into the clipboard slot.
    fn copy_content(&mut self, frame: &SourceFrame) -> BackendResult<ContentId>;

    /// Paste the clipboard as a floating buffer over `dest`.
    fn paste_as_floating(&mut self, dest: LayerId) -> BackendResult<FloatingPaste>;

    /// Move the floating buffer by the given delta.
    fn translate(&mut self, handle: FloatingId, dx: i32, dy: i32) -> BackendResult<()>;

    /// Commit the floating buffer into its destination layer. The handle is
    /// invalid afterwards.
    fn anchor(&mut self, handle: FloatingId) -> BackendResult<()>;
}

/// One committed paste as observed by [`ScratchBackend`]: which frame landed
/// where after translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchoredPaste {
    pub frame_index: usize,
    pub x: i32,
    pub y: i32,
}

/// A deterministic, pixel-less backend.
///
/// Tracks canvases, layers, the clipboard and the floating-buffer slot with
/// plain bookkeeping, and records every operation name in call order so
/// tests can assert on sequencing and resource discipline. The paste offset
/// it reports is configurable to model editors that re-center pasted
/// content.
#[derive(Debug, Default)]
pub struct ScratchBackend {
    next_id: u32,
    paste_offset: (i32, i32),
    /// Operation that should fail, if any (test hook)
    fail_on: Option<&'static str>,
    clipboard: Option<usize>,
    floating: Option<FloatingState>,
    canvases: HashMap<CanvasId, (u32, u32)>,
    layers: HashMap<LayerId, CanvasId>,
    pub ops: Vec<&'static str>,
    pub anchored: Vec<AnchoredPaste>,
}

#[derive(Debug, Clone, Copy)]
struct FloatingState {
    handle: FloatingId,
    frame_index: usize,
    x: i32,
    y: i32,
}

impl ScratchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that reports the given offset for every paste.
    pub fn with_paste_offset(offset_x: i32, offset_y: i32) -> Self {
        Self {
            paste_offset: (offset_x, offset_y),
            ..Self::default()
        }
    }

    /// Make the named operation fail on its next invocation and afterwards.
    pub fn fail_on(&mut self, operation: &'static str) {
        self.fail_on = Some(operation);
    }

    /// True when no floating buffer is pending an anchor.
    pub fn floating_slot_is_free(&self) -> bool {
        self.floating.is_none()
    }

    fn check(&mut self, operation: &'static str) -> BackendResult<()> {
        self.ops.push(operation);
        if self.fail_on == Some(operation) {
            return Err(BackendError::new(format!("injected {} failure", operation)));
        }
        Ok(())
    }

    fn fresh_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl ImageEditingBackend for ScratchBackend {
    fn create_canvas(&mut self, width: u32, height: u32) -> BackendResult<CanvasId> {
        self.check("create_canvas")?;
        if width == 0 || height == 0 {
            return Err(BackendError::new("zero-sized canvas"));
        }
        let id = CanvasId(self.fresh_id());
        self.canvases.insert(id, (width, height));
        debug!("scratch: canvas {:?} {}x{}", id, width, height);
        Ok(id)
    }

    fn create_layer(&mut self, canvas: CanvasId, width: u32, height: u32) -> BackendResult<LayerId> {
        self.check("create_layer")?;
        if !self.canvases.contains_key(&canvas) {
            return Err(BackendError::new("unknown canvas"));
        }
        if width == 0 || height == 0 {
            return Err(BackendError::new("zero-sized layer"));
        }
        let id = LayerId(self.fresh_id());
        self.layers.insert(id, canvas);
        Ok(id)
    }

    fn add_layer(&mut self, canvas: CanvasId, layer: LayerId) -> BackendResult<()> {
        self.check("add_layer")?;
        match self.layers.get(&layer) {
            Some(owner) if *owner == canvas => Ok(()),
            Some(_) => Err(BackendError::new("layer belongs to another canvas")),
            None => Err(BackendError::new("unknown layer")),
        }
    }

    fn copy_content(&mut self, frame: &SourceFrame) -> BackendResult<ContentId> {
        self.check("copy_content")?;
        self.clipboard = Some(frame.index);
        Ok(ContentId(self.fresh_id()))
    }

    fn paste_as_floating(&mut self, dest: LayerId) -> BackendResult<FloatingPaste> {
        self.check("paste_as_floating")?;
        if !self.layers.contains_key(&dest) {
            return Err(BackendError::new("unknown destination layer"));
        }
        let frame_index = self
            .clipboard
            .ok_or_else(|| BackendError::new("clipboard is empty"))?;
        if self.floating.is_some() {
            return Err(BackendError::new(
                "previous floating buffer was never anchored",
            ));
        }
        let handle = FloatingId(self.fresh_id());
        let (ox, oy) = self.paste_offset;
        self.floating = Some(FloatingState {
            handle,
            frame_index,
            x: ox,
            y: oy,
        });
        Ok(FloatingPaste {
            handle,
            offset_x: ox,
            offset_y: oy,
        })
    }

    fn translate(&mut self, handle: FloatingId, dx: i32, dy: i32) -> BackendResult<()> {
        self.check("translate")?;
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
        self.check("anchor")?;
        match self.floating.take() {
            Some(f) if f.handle == handle => {
                debug!("scratch: anchor frame {} at ({}, {})", f.frame_index, f.x, f.y);
                self.anchored.push(AnchoredPaste {
                    frame_index: f.frame_index,
                    x: f.x,
                    y: f.y,
                });
                Ok(())
            }
            Some(f) => {
                // put it back; the caller anchored the wrong handle
                self.floating = Some(f);
                Err(BackendError::new("no such floating buffer"))
            }
            None => Err(BackendError::new("no floating buffer to anchor")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize) -> SourceFrame {
        SourceFrame {
            index,
            name: format!("frame_{}", index),
            width: 16,
            height: 16,
            offset_x: 0,
            offset_y: 0,
        }
    }

    #[test]
    fn paste_requires_copied_content() {
        let mut b = ScratchBackend::new();
        let canvas = b.create_canvas(64, 64).unwrap();
        let layer = b.create_layer(canvas, 64, 64).unwrap();
        assert!(b.paste_as_floating(layer).is_err());
    }

    #[test]
    fn translate_then_anchor_records_final_position() {
        let mut b = ScratchBackend::with_paste_offset(5, 5);
        let canvas = b.create_canvas(64, 64).unwrap();
        let layer = b.create_layer(canvas, 64, 64).unwrap();
        b.add_layer(canvas, layer).unwrap();

        b.copy_content(&frame(0)).unwrap();
        let paste = b.paste_as_floating(layer).unwrap();
        assert_eq!((paste.offset_x, paste.offset_y), (5, 5));
        b.translate(paste.handle, 27, -5).unwrap();
        b.anchor(paste.handle).unwrap();

        assert!(b.floating_slot_is_free());
        assert_eq!(
            b.anchored,
            vec![AnchoredPaste {
                frame_index: 0,
                x: 32,
                y: 0
            }]
        );
    }

    #[test]
    fn second_paste_without_anchor_is_refused() {
        let mut b = ScratchBackend::new();
        let canvas = b.create_canvas(64, 64).unwrap();
        let layer = b.create_layer(canvas, 64, 64).unwrap();
        b.copy_content(&frame(0)).unwrap();
        let _ = b.paste_as_floating(layer).unwrap();
        b.copy_content(&frame(1)).unwrap();
        assert!(b.paste_as_floating(layer).is_err());
    }

    #[test]
    fn anchored_handle_is_dead() {
        let mut b = ScratchBackend::new();
        let canvas = b.create_canvas(64, 64).unwrap();
        let layer = b.create_layer(canvas, 64, 64).unwrap();
        b.copy_content(&frame(0)).unwrap();
        let paste = b.paste_as_floating(layer).unwrap();
        b.anchor(paste.handle).unwrap();
        assert!(b.translate(paste.handle, 1, 1).is_err());
        assert!(b.anchor(paste.handle).is_err());
    }
}
