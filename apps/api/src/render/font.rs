//! Font resolution, measurement, and glyph drawing.
//!
//! `resolve` walks an ordered list of scalable font candidates and falls back
//! to a built-in non-scalable bitmap font, so it never fails. Each candidate
//! failure is logged at `warn` rather than swallowed, which makes degraded
//! font rendering observable in the request trace.

use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};
use tracing::warn;

/// Scalable font candidates tried in order before the built-in fallback.
const SCALABLE_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
];

// Built-in bitmap font geometry: 5x7 glyph data in a 6x10 cell.
const BUILTIN_ADVANCE: u32 = 6;
const BUILTIN_LINE_HEIGHT: u32 = 10;
const BUILTIN_GLYPH_TOP: i64 = 1;

/// A size-bound text measurement and rendering capability.
///
/// `Scalable` wraps a TrueType font at a fixed pixel scale. `Builtin` is the
/// guaranteed-available bitmap font; it ignores the requested size.
pub enum FontHandle {
    Scalable { font: Font<'static>, scale: Scale },
    Builtin,
}

impl FontHandle {
    /// Measures the pixel bounding box of `text`: `(width, height)`.
    ///
    /// For the scalable path this is the tight box over positioned glyph
    /// outlines, so height varies with the characters actually present
    /// (no descenders → shorter line).
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            FontHandle::Scalable { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                let mut min_x = i32::MAX;
                let mut min_y = i32::MAX;
                let mut max_x = i32::MIN;
                let mut max_y = i32::MIN;
                for glyph in font.layout(text, *scale, point(0.0, v_metrics.ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        min_x = min_x.min(bb.min.x);
                        min_y = min_y.min(bb.min.y);
                        max_x = max_x.max(bb.max.x);
                        max_y = max_y.max(bb.max.y);
                    }
                }
                if max_x < min_x {
                    (0, 0)
                } else {
                    ((max_x - min_x) as u32, (max_y - min_y) as u32)
                }
            }
            FontHandle::Builtin => {
                let chars = text.chars().count() as u32;
                if chars == 0 {
                    (0, 0)
                } else {
                    (chars * BUILTIN_ADVANCE, BUILTIN_LINE_HEIGHT)
                }
            }
        }
    }

    /// Draws `text` with its top-left corner at `(x, y)`, alpha-blending glyph
    /// coverage into the image. Pixels outside the image are clipped.
    pub fn draw(&self, image: &mut RgbImage, x: i64, y: i64, text: &str, color: Rgb<u8>) {
        match self {
            FontHandle::Scalable { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                let baseline = y as f32 + v_metrics.ascent;
                for glyph in font.layout(text, *scale, point(x as f32, baseline)) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        let px = gx as i64 + bb.min.x as i64;
                        let py = gy as i64 + bb.min.y as i64;
                        blend_pixel(image, px, py, color, coverage);
                    });
                }
            }
            FontHandle::Builtin => {
                let mut caret = x;
                for ch in text.chars() {
                    let glyph = builtin_glyph(ch);
                    for (col, bits) in glyph.iter().enumerate() {
                        for row in 0..7 {
                            if bits & (1 << row) != 0 {
                                blend_pixel(
                                    image,
                                    caret + col as i64,
                                    y + BUILTIN_GLYPH_TOP + row as i64,
                                    color,
                                    1.0,
                                );
                            }
                        }
                    }
                    caret += BUILTIN_ADVANCE as i64;
                }
            }
        }
    }
}

fn blend_pixel(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return;
    }
    if coverage <= 0.0 {
        return;
    }
    let alpha = coverage.min(1.0);
    let inverse = 1.0 - alpha;
    let dst = image.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        dst.0[channel] =
            (color.0[channel] as f32 * alpha + dst.0[channel] as f32 * inverse).round() as u8;
    }
}

/// Returns a usable font at the requested pixel size.
///
/// Never fails: the built-in bitmap font terminates the candidate chain.
pub fn resolve(size: u32) -> FontHandle {
    for path in SCALABLE_CANDIDATES {
        match load_scalable(path, size) {
            Ok(handle) => return handle,
            Err(err) => warn!("font candidate {path} unavailable: {err}"),
        }
    }
    warn!("no scalable font available, falling back to built-in bitmap font");
    FontHandle::Builtin
}

fn load_scalable(path: &str, size: u32) -> anyhow::Result<FontHandle> {
    let bytes = std::fs::read(path)?;
    let font =
        Font::try_from_vec(bytes).ok_or_else(|| anyhow::anyhow!("unparseable font data"))?;
    Ok(FontHandle::Scalable {
        font,
        scale: Scale::uniform(size as f32),
    })
}

fn builtin_glyph(ch: char) -> &'static [u8; 5] {
    let code = ch as usize;
    if (0x20..=0x7E).contains(&code) {
        &BUILTIN_GLYPHS[code - 0x20]
    } else {
        // Non-ASCII renders as '?'.
        &BUILTIN_GLYPHS[b'?' as usize - 0x20]
    }
}

/// Classic 5x7 bitmap font, ASCII 0x20..=0x7E. Column-major: each byte is one
/// column, bit 0 the top row.
#[rustfmt::skip]
static BUILTIN_GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];
