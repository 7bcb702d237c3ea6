//! Text color parsing: `#RRGGBB` hex (hash optional) plus common CSS names.

use image::Rgb;

use crate::errors::AppError;

/// Parses a color string into an RGB pixel.
///
/// Malformed input is a rendering error — color strings arrive as free-form
/// form fields and only fail once generation is underway.
pub fn parse_color(input: &str) -> Result<Rgb<u8>, AppError> {
    let trimmed = input.trim();
    if let Some(named) = named_color(trimmed) {
        return Ok(named);
    }

    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 {
        return Err(AppError::Render(format!("invalid color '{input}'")));
    }
    let bytes = hex::decode(digits)
        .map_err(|_| AppError::Render(format!("invalid color '{input}'")))?;
    Ok(Rgb([bytes[0], bytes[1], bytes[2]]))
}

fn named_color(name: &str) -> Option<Rgb<u8>> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "white" => [255, 255, 255],
        "black" => [0, 0, 0],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "pink" => [255, 192, 203],
        _ => return None,
    };
    Some(Rgb(rgb))
}
