//! Pixel overlay that stamps numeric scale labels into image buffers.
//!
//! Consumes the glyph table and formatter: the label for a value is drawn
//! glyph by glyph into a row-major 2-D buffer, the way the viewer annotates
//! its scale bar.

use crate::viewer::fonts::{self, GlyphBitmap, GLYPH_COLS};
use crate::viewer::label::{value_to_glyphs, ValueLabel};

/// Stamp the label for `value` into a row-major `width x height` buffer.
///
/// Glyphs advance by 7 pixels starting at `(x0, y0)`. Lit glyph pixels are
/// written as `intensity`; unlit pixels leave the buffer untouched, so labels
/// overlay existing image data. Drawing stops at the terminator glyph and
/// clips at the buffer edges. The formatted label is returned so callers can
/// inspect soft formatting issues.
pub fn stamp_label(
    buf: &mut [f64],
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    value: f64,
    intensity: f64,
) -> ValueLabel {
    debug_assert_eq!(buf.len(), width * height, "buffer must be width * height");
    let label = value_to_glyphs(value);
    let font = fonts::font_bitmaps();
    for (slot, &glyph) in label.glyphs.iter().enumerate() {
        if glyph == fonts::GLYPH_END {
            break;
        }
        let bitmap = &font[glyph as usize];
        stamp_glyph(buf, width, height, x0 + slot * GLYPH_COLS, y0, bitmap, intensity);
    }
    label
}

fn stamp_glyph(
    buf: &mut [f64],
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    bitmap: &GlyphBitmap,
    intensity: f64,
) {
    for (row, pixels) in bitmap.iter().enumerate() {
        let y = y0 + row;
        if y >= height {
            break;
        }
        for (col, &on) in pixels.iter().enumerate() {
            let x = x0 + col;
            if x >= width {
                break;
            }
            if on != 0 {
                buf[y * width + x] = intensity;
            }
        }
    }
}
