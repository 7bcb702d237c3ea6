// Image composition core: font resolution, text wrapping, quote poster
// overlay, and moodboard grid tiling. Everything here is pure/synchronous —
// CPU-bound composition runs inside tokio::task::spawn_blocking at the
// service layer.

pub mod color;
pub mod font;
pub mod grid;
pub mod layouts;
pub mod text;
pub mod wrap;

// Re-export the public API consumed by the generation service.
pub use color::parse_color;
pub use grid::draw_moodboard;
pub use layouts::LayoutSpec;
pub use text::{draw_quote, Alignment, Orientation};
