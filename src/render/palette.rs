//! Chart colors given as `#RRGGBB` strings.

use plotters::style::RGBColor;

use crate::error::{RegistryError, Result};

/// Parse a `#RRGGBB` color
pub fn parse_hex_color(value: &str) -> Result<RGBColor> {
    let invalid = || RegistryError::config(format!("'{value}' is not a #RRGGBB color"));

    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).map_err(|_| invalid());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Parse every color of a palette
pub fn parse_palette(colors: &[String]) -> Result<Vec<RGBColor>> {
    if colors.is_empty() {
        return Err(RegistryError::config("palette must contain at least one color"));
    }
    colors.iter().map(|c| parse_hex_color(c)).collect()
}

/// Color for the `idx`-th series, cycling through the palette
#[must_use]
pub fn cycle(palette: &[RGBColor], idx: usize) -> RGBColor {
    palette[idx % palette.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color = parse_hex_color("#FF8C00").unwrap();
        assert_eq!((color.0, color.1, color.2), (255, 140, 0));
        let color = parse_hex_color("#40e0d0").unwrap();
        assert_eq!((color.0, color.1, color.2), (64, 224, 208));
    }

    #[test]
    fn test_parse_hex_color_rejects_names() {
        assert!(parse_hex_color("turquoise").is_err());
        assert!(parse_hex_color("#FFF").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_palette_cycles() {
        let palette = parse_palette(&["#000000".to_string(), "#FFFFFF".to_string()]).unwrap();
        assert_eq!(cycle(&palette, 3), palette[1]);
        assert!(parse_palette(&[]).is_err());
    }
}
