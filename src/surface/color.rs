//! Fill colors for the raster context

use cssparser::color::{parse_hash_color, parse_named_color};
use cssparser::{Parser, ParserInput, Token};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS color value: a named color, `transparent` or a hash color
    pub fn parse(value: &str) -> Option<Self> {
        let mut input = ParserInput::new(value);
        let mut parser = Parser::new(&mut input);

        let color = match parser.next().ok()? {
            Token::Ident(name) if name.eq_ignore_ascii_case("transparent") => Color::TRANSPARENT,
            Token::Ident(name) => {
                let (r, g, b) = parse_named_color(name).ok()?;
                Color::rgb(r, g, b)
            }
            Token::Hash(hex) | Token::IDHash(hex) => {
                let (r, g, b, alpha) = parse_hash_color(hex.as_bytes()).ok()?;
                Color::rgba(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
            }
            _ => return None,
        };
        parser.expect_exhausted().ok()?;
        Some(color)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("black"), Some(Color::BLACK));
        assert_eq!(Color::parse("Orange"), Some(Color::rgb(255, 165, 0)));
        assert_eq!(Color::parse("  black "), Some(Color::BLACK));
        assert_eq!(Color::parse("transparent"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("chartreuse-ish"), None);
        assert_eq!(Color::parse("black red"), None);
        assert_eq!(Color::parse(""), None);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::parse("#102030"), Some(Color::rgb(16, 32, 48)));
        assert_eq!(Color::parse("#10203080"), Some(Color::rgba(16, 32, 48, 128)));
        assert_eq!(Color::parse("#12"), None);
        assert_eq!(Color::parse("#zzz"), None);
    }
}
