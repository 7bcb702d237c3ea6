//! Moodboard grid compositor.

use image::{imageops, imageops::FilterType, Rgb, RgbImage};

use crate::render::layouts::LayoutSpec;

/// Composites `images` onto a white canvas in row-major grid order.
///
/// Each image is stretched (aspect ratio is not preserved) to exactly fill
/// its cell and pasted opaquely. Inputs beyond the grid capacity are dropped.
/// Trailing pixels left over from floor cell division stay white.
pub fn draw_moodboard(layout: &LayoutSpec, images: Vec<RgbImage>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(
        layout.canvas_width,
        layout.canvas_height,
        Rgb([255, 255, 255]),
    );
    let (cell_width, cell_height) = layout.cell_size();

    for (index, image) in images.into_iter().enumerate() {
        if index >= layout.capacity() {
            break;
        }
        let (x, y) = layout.cell_origin(index);
        let resized = imageops::resize(&image, cell_width, cell_height, FilterType::Lanczos3);
        imageops::replace(&mut canvas, &resized, x as i64, y as i64);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layouts;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    // Lanczos resampling of a uniform image can round channels by ±1.
    fn assert_near(actual: Rgb<u8>, expected: [u8; 3]) {
        for channel in 0..3 {
            let diff = (actual.0[channel] as i16 - expected[channel] as i16).abs();
            assert!(diff <= 1, "channel {channel}: {actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_canvas_matches_layout_and_cells_fill_in_order() {
        let layout = layouts::lookup("4x4").unwrap();
        let images = vec![
            solid(100, 50, [200, 0, 0]),
            solid(30, 90, [0, 200, 0]),
            solid(64, 64, [0, 0, 200]),
            solid(10, 10, [200, 200, 0]),
        ];
        let board = draw_moodboard(layout, images);
        assert_eq!(board.dimensions(), (1920, 1920));
        assert_near(*board.get_pixel(10, 10), [200, 0, 0]);
        assert_near(*board.get_pixel(970, 10), [0, 200, 0]);
        assert_near(*board.get_pixel(10, 970), [0, 0, 200]);
        assert_near(*board.get_pixel(970, 970), [200, 200, 0]);
    }

    #[test]
    fn test_excess_images_are_dropped() {
        let layout = layouts::lookup("4x4").unwrap();
        // Five inputs for a 2x2 grid: the fifth (magenta) must not appear.
        let images = vec![
            solid(20, 20, [10, 10, 10]),
            solid(20, 20, [10, 10, 10]),
            solid(20, 20, [10, 10, 10]),
            solid(20, 20, [10, 10, 10]),
            solid(20, 20, [255, 0, 255]),
        ];
        let board = draw_moodboard(layout, images);
        assert_eq!(board.dimensions(), (1920, 1920));
        let magenta = board.pixels().filter(|p| p.0 == [255, 0, 255]).count();
        assert_eq!(magenta, 0, "fifth image must be ignored");
    }

    #[test]
    fn test_partial_fill_leaves_remaining_cells_white() {
        let layout = layouts::lookup("4x4").unwrap();
        let board = draw_moodboard(layout, vec![solid(20, 20, [0, 0, 0])]);
        assert_eq!(*board.get_pixel(1000, 1000), Rgb([255, 255, 255]));
        assert_eq!(*board.get_pixel(1919, 1919), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_cells_stretch_without_preserving_aspect() {
        let layout = layouts::lookup("8-grid").unwrap();
        // A 1x1 source still fills its whole 960x960 cell.
        let board = draw_moodboard(layout, vec![solid(1, 1, [50, 60, 70])]);
        assert_near(*board.get_pixel(0, 0), [50, 60, 70]);
        assert_near(*board.get_pixel(959, 959), [50, 60, 70]);
        assert_eq!(*board.get_pixel(960, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_floor_division_remainder_stays_white() {
        let layout = LayoutSpec {
            name: "test-3x2",
            columns: 3,
            rows: 2,
            canvas_width: 1000,
            canvas_height: 900,
        };
        // cells are 333x450; columns cover 0..999 except the last pixel.
        let images = vec![
            solid(5, 5, [1, 2, 3]),
            solid(5, 5, [1, 2, 3]),
            solid(5, 5, [1, 2, 3]),
        ];
        let board = draw_moodboard(&layout, images);
        assert_eq!(*board.get_pixel(999, 0), Rgb([255, 255, 255]));
    }
}
