//! Quote poster text compositor.
//!
//! Takes an RGB bitmap and overlays word-wrapped, shadowed text: optional
//! 90° rotation for vertical posters, wrap at 80% of the (post-rotation)
//! width, vertical centering of the whole block, per-line alignment, and a
//! 2px black drop shadow under the main color.

use image::{imageops, Rgb, RgbImage};

use crate::render::font;
use crate::render::wrap::wrap;

/// Fixed left/right margin for `left` and `right` alignment, in pixels.
const EDGE_MARGIN: i64 = 50;
/// Extra vertical spacing between consecutive lines, in pixels.
const LINE_SPACING: i64 = 10;
/// Shadow offset below and right of the main text, in pixels.
const SHADOW_OFFSET: i64 = 2;
/// Fraction of the image width available to the text block.
const TEXT_WIDTH_FRACTION: f64 = 0.8;

/// Horizontal placement of each wrapped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Case-insensitive parse. Unrecognized values fall back to `Left`,
    /// matching the drawing default.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "center" => Alignment::Center,
            "right" => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}

/// Poster orientation. `Vertical` rotates the canvas 90° counter-clockwise
/// before any text is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "vertical" => Orientation::Vertical,
            _ => Orientation::Horizontal,
        }
    }
}

/// Overlays `text` on `image` and returns the modified bitmap.
///
/// Infallible for normal inputs: the font resolver always produces a handle
/// and out-of-bounds drawing (a block taller than the image starts at a
/// negative y) clips instead of failing.
pub fn draw_quote(
    image: RgbImage,
    text: &str,
    font_size: u32,
    color: Rgb<u8>,
    alignment: Alignment,
    orientation: Orientation,
) -> RgbImage {
    let mut image = match orientation {
        // 90° counter-clockwise with width/height swap, no cropping.
        Orientation::Vertical => imageops::rotate270(&image),
        Orientation::Horizontal => image,
    };

    let font = font::resolve(font_size);
    let max_width = (image.width() as f64 * TEXT_WIDTH_FRACTION) as u32;
    let lines = wrap(text, &font, max_width);

    let line_heights: Vec<i64> = lines
        .iter()
        .map(|line| font.measure(line).1 as i64)
        .collect();
    let total_height =
        line_heights.iter().sum::<i64>() + LINE_SPACING * lines.len().saturating_sub(1) as i64;

    let mut y = block_top(image.height(), total_height);
    for (line, height) in lines.iter().zip(&line_heights) {
        let (line_width, _) = font.measure(line);
        let x = aligned_x(alignment, image.width(), line_width);

        // Shadow first so the main text sits on top of it.
        font.draw(
            &mut image,
            x + SHADOW_OFFSET,
            y + SHADOW_OFFSET,
            line,
            Rgb([0, 0, 0]),
        );
        font.draw(&mut image, x, y, line, color);

        y += height + LINE_SPACING;
    }

    image
}

/// Top of the vertically centered text block. May be negative when the block
/// is taller than the image; the overflow draws clipped rather than clamped.
pub fn block_top(image_height: u32, total_height: i64) -> i64 {
    (image_height as i64 - total_height).div_euclid(2)
}

/// Horizontal position for a single line under the given alignment.
pub fn aligned_x(alignment: Alignment, image_width: u32, line_width: u32) -> i64 {
    match alignment {
        Alignment::Center => (image_width as i64 - line_width as i64).div_euclid(2),
        Alignment::Right => image_width as i64 - line_width as i64 - EDGE_MARGIN,
        Alignment::Left => EDGE_MARGIN,
    }
}
