//! Placement manifest: typed per-frame records plus the wire serializer.
//!
//! The payload format is fixed: tab-indented JSON with `imageSize` first,
//! then a `tiles` array of `{id, loc}` objects in placement order. Rendering
//! goes through a single formatting function over the typed records, so
//! separator and ordering mistakes cannot creep in from incremental string
//! building.

use std::fmt::Write as _;

use serde::Serialize;

use crate::{Error, Result};

/// Final placement record for one frame: where its trimmed content landed in
/// sheet-pixel space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedFrame {
    pub name: String,
    pub pixel_x: i32,
    pub pixel_y: i32,
    pub width: u32,
    pub height: u32,
}

/// The ordered set of placement records for one composited sheet.
///
/// Tiles are appended in ascending frame-index order as the compositor
/// places them and are never removed or reordered, so manifest order always
/// matches input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub sheet_width: u32,
    pub sheet_height: u32,
    pub tiles: Vec<PlacedFrame>,
}

impl Manifest {
    pub fn new(sheet_width: u32, sheet_height: u32) -> Self {
        Self {
            sheet_width,
            sheet_height,
            tiles: Vec::new(),
        }
    }

    /// Append the next placement record. Call order defines manifest order.
    pub fn push(&mut self, tile: PlacedFrame) {
        self.tiles.push(tile);
    }

    /// Render the wire payload.
    ///
    /// Fails with [`Error::InvalidInput`] if there are no tiles (a sheet
    /// with zero tiles is not emitted) or if any tile has a negative
    /// coordinate or zero extent. The output is deterministic: rendering the
    /// same manifest twice yields byte-identical text.
    pub fn render(&self) -> Result<String> {
        if self.tiles.is_empty() {
            return Err(Error::InvalidInput("manifest has no tiles".into()));
        }
        for tile in &self.tiles {
            if tile.pixel_x < 0 || tile.pixel_y < 0 {
                return Err(Error::InvalidInput(format!(
                    "tile '{}' has negative position ({}, {})",
                    tile.name, tile.pixel_x, tile.pixel_y
                )));
            }
            if tile.width == 0 || tile.height == 0 {
                return Err(Error::InvalidInput(format!(
                    "tile '{}' has zero extent {}x{}",
                    tile.name, tile.width, tile.height
                )));
            }
        }

        let mut out = String::new();
        out.push_str("{\n");
        let _ = writeln!(
            out,
            "\t\"imageSize\": [{}, {}],",
            self.sheet_width, self.sheet_height
        );
        out.push_str("\t\"tiles\": [\n");
        let last = self.tiles.len() - 1;
        for (i, tile) in self.tiles.iter().enumerate() {
            out.push_str("\t\t{\n");
            let _ = writeln!(out, "\t\t\t\"id\": \"{}\",", tile.name);
            let _ = writeln!(
                out,
                "\t\t\t\"loc\": [{}, {}, {}, {}]",
                tile.pixel_x, tile.pixel_y, tile.width, tile.height
            );
            // position decides the separator; the last tile gets none
            if i == last {
                out.push_str("\t\t}\n");
            } else {
                out.push_str("\t\t},\n");
            }
        }
        out.push_str("\t]\n}");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(name: &str, x: i32, y: i32) -> PlacedFrame {
        PlacedFrame {
            name: name.to_string(),
            pixel_x: x,
            pixel_y: y,
            width: 32,
            height: 32,
        }
    }

    #[test]
    fn single_tile_has_no_trailing_separator() {
        let mut m = Manifest::new(64, 64);
        m.push(tile("walk_0", 0, 0));
        let text = m.render().unwrap();
        assert_eq!(text.matches("},").count(), 0);
        assert!(text.contains("\t\t}\n\t]\n}"));
    }

    #[test]
    fn n_tiles_have_n_minus_one_separators() {
        let mut m = Manifest::new(128, 64);
        for i in 0..4 {
            m.push(tile(&format!("f{}", i), i * 32, 0));
        }
        let text = m.render().unwrap();
        assert_eq!(text.matches("},").count(), 3);
    }

    #[test]
    fn payload_matches_wire_format_exactly() {
        let mut m = Manifest::new(64, 32);
        m.push(tile("a", 0, 0));
        m.push(tile("b", 32, 0));
        let expected = "{\n\
            \t\"imageSize\": [64, 32],\n\
            \t\"tiles\": [\n\
            \t\t{\n\
            \t\t\t\"id\": \"a\",\n\
            \t\t\t\"loc\": [0, 0, 32, 32]\n\
            \t\t},\n\
            \t\t{\n\
            \t\t\t\"id\": \"b\",\n\
            \t\t\t\"loc\": [32, 0, 32, 32]\n\
            \t\t}\n\
            \t]\n\
            }";
        assert_eq!(m.render().unwrap(), expected);
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut m = Manifest::new(96, 96);
        m.push(tile("x", 0, 0));
        m.push(tile("y", 32, 0));
        m.push(tile("z", 64, 0));
        assert_eq!(m.render().unwrap(), m.render().unwrap());
    }

    #[test]
    fn payload_is_valid_json() {
        let mut m = Manifest::new(64, 64);
        m.push(tile("idle", 0, 0));
        m.push(tile("run", 32, 0));
        let text = m.render().unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).expect("payload parses as JSON");
        assert_eq!(v["imageSize"][0], 64);
        assert_eq!(v["tiles"].as_array().unwrap().len(), 2);
        assert_eq!(v["tiles"][1]["id"], "run");
        assert_eq!(v["tiles"][1]["loc"][0], 32);
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let m = Manifest::new(64, 64);
        assert!(matches!(m.render(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn negative_position_is_rejected() {
        let mut m = Manifest::new(64, 64);
        m.push(tile("bad", -1, 0));
        assert!(matches!(m.render(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn zero_extent_is_rejected() {
        let mut m = Manifest::new(64, 64);
        m.push(PlacedFrame {
            name: "flat".into(),
            pixel_x: 0,
            pixel_y: 0,
            width: 32,
            height: 0,
        });
        assert!(matches!(m.render(), Err(Error::InvalidInput(_))));
    }
}
