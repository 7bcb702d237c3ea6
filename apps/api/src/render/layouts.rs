//! Fixed moodboard layout catalog.
//!
//! The catalog is a closed set — unknown names are rejected with a
//! `Validation` error before any image bytes are decoded.

use crate::errors::AppError;

/// Named grid geometry for a moodboard canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSpec {
    pub name: &'static str,
    pub columns: u32,
    pub rows: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl LayoutSpec {
    /// Maximum number of images the grid can hold. Excess inputs are dropped.
    pub fn capacity(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Cell dimensions via floor division. Trailing pixels on the right and
    /// bottom edges stay uncovered (white) when the canvas does not divide evenly.
    pub fn cell_size(&self) -> (u32, u32) {
        (
            self.canvas_width / self.columns,
            self.canvas_height / self.rows,
        )
    }

    /// Top-left pixel offset of the cell for the image at `index` (row-major).
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let (cell_width, cell_height) = self.cell_size();
        let row = index as u32 / self.columns;
        let col = index as u32 % self.columns;
        (col * cell_width, row * cell_height)
    }
}

static LAYOUTS: &[LayoutSpec] = &[
    LayoutSpec {
        name: "4x4",
        columns: 2,
        rows: 2,
        canvas_width: 1920,
        canvas_height: 1920,
    },
    LayoutSpec {
        name: "8-grid",
        columns: 2,
        rows: 4,
        canvas_width: 1920,
        canvas_height: 3840,
    },
    LayoutSpec {
        name: "16-grid",
        columns: 4,
        rows: 4,
        canvas_width: 1920,
        canvas_height: 1920,
    },
    LayoutSpec {
        name: "portrait-8",
        columns: 2,
        rows: 4,
        canvas_width: 1080,
        canvas_height: 1920,
    },
    LayoutSpec {
        name: "portrait-16",
        columns: 4,
        rows: 4,
        canvas_width: 1080,
        canvas_height: 1920,
    },
];

/// Resolves a layout by name. Fails fast on unknown names.
pub fn lookup(name: &str) -> Result<&'static LayoutSpec, AppError> {
    LAYOUTS
        .iter()
        .find(|layout| layout.name == name)
        .ok_or_else(|| AppError::Validation(format!("Invalid layout '{name}'")))
}

/// Names of all known layouts, in catalog order.
pub fn names() -> Vec<&'static str> {
    LAYOUTS.iter().map(|layout| layout.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_catalog_entries_resolve() {
        for name in ["4x4", "8-grid", "16-grid", "portrait-8", "portrait-16"] {
            assert!(lookup(name).is_ok(), "layout '{name}' should resolve");
        }
    }

    #[test]
    fn test_unknown_layout_is_validation_error() {
        let err = lookup("9-grid").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_4x4_geometry() {
        let layout = lookup("4x4").unwrap();
        assert_eq!(layout.columns, 2);
        assert_eq!(layout.rows, 2);
        assert_eq!(layout.canvas_width, 1920);
        assert_eq!(layout.canvas_height, 1920);
        assert_eq!(layout.capacity(), 4);
    }

    #[test]
    fn test_8_grid_cell_math() {
        let layout = lookup("8-grid").unwrap();
        assert_eq!(layout.cell_size(), (960, 960));
        // Index 5 in a 2-column grid → row 2, col 1.
        assert_eq!(layout.cell_origin(5), (960, 1920));
    }

    #[test]
    fn test_cell_origin_row_major_order() {
        let layout = lookup("16-grid").unwrap();
        assert_eq!(layout.cell_origin(0), (0, 0));
        assert_eq!(layout.cell_origin(3), (1440, 0));
        assert_eq!(layout.cell_origin(4), (0, 480));
    }

    #[test]
    fn test_names_lists_whole_catalog() {
        assert_eq!(names().len(), 5);
    }
}
