use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Straight (non-premultiplied) sRGB colour with alpha.
///
/// Serialises as a CSS colour string so config files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `alpha` in 0.0..=1.0, as in CSS `rgba()`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Linear interpolation in premultiplied space, so fading to a
    /// transparent stop does not drag the colour toward black.
    pub fn lerp_premultiplied(self, other: Rgba8, t: f32) -> Rgba8 {
        let t = t.clamp(0.0, 1.0);
        let a0 = self.a as f32 / 255.0;
        let a1 = other.a as f32 / 255.0;
        let a = a0 + (a1 - a0) * t;
        if a <= 0.0 {
            return Rgba8::TRANSPARENT;
        }
        let channel = |c0: u8, c1: u8| {
            let p0 = c0 as f32 * a0;
            let p1 = c1 as f32 * a1;
            ((p0 + (p1 - p0) * t) / a).round().clamp(0.0, 255.0) as u8
        };
        Rgba8 {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: (a * 255.0).round() as u8,
        }
    }
}

impl From<egui::Color32> for Rgba8 {
    fn from(color: egui::Color32) -> Self {
        Rgba8::from_array(color.to_srgba_unmultiplied())
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Rgba8> for String {
    fn from(color: Rgba8) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Rgba8 {
    type Err = String;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` and `rgba(r,g,b,a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("invalid colour: {s:?}");

        if let Some(hex) = s.strip_prefix('#') {
            let digit = |i: usize| {
                hex.get(i..i + 1)
                    .and_then(|d| u8::from_str_radix(d, 16).ok())
                    .ok_or_else(invalid)
            };
            let byte = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|d| u8::from_str_radix(d, 16).ok())
                    .ok_or_else(invalid)
            };
            return match hex.len() {
                3 => Ok(Rgba8::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255)),
                6 => Ok(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, 255)),
                8 => Ok(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
                _ => Err(invalid()),
            };
        }

        let (args, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let args = args.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return Err(invalid());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
        let alpha = if has_alpha {
            let a: f32 = parts[3].parse().map_err(|_| invalid())?;
            (a.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            255
        };
        Ok(Rgba8::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_forms() {
        assert_eq!("#fff".parse::<Rgba8>(), Ok(Rgba8::WHITE));
        assert_eq!("#00000066".parse::<Rgba8>(), Ok(Rgba8::new(0, 0, 0, 0x66)));
        assert_eq!("rgba(255,255,255,0.2)".parse::<Rgba8>(), Ok(Rgba8::new(255, 255, 255, 51)));
        assert_eq!("rgb(1, 2, 3)".parse::<Rgba8>(), Ok(Rgba8::new(1, 2, 3, 255)));
        assert!("#12345".parse::<Rgba8>().is_err());
        assert!("blue".parse::<Rgba8>().is_err());
        assert!("rgba(1,2,3)".parse::<Rgba8>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for color in [Rgba8::WHITE, Rgba8::new(10, 20, 30, 40)] {
            assert_eq!(color.to_string().parse::<Rgba8>(), Ok(color));
        }
    }

    #[test]
    fn fade_to_transparent_keeps_hue() {
        let red = Rgba8::new(255, 0, 0, 255);
        let mid = red.lerp_premultiplied(Rgba8::TRANSPARENT, 0.5);
        assert_eq!(mid.r, 255);
        assert_eq!(mid.a, 128);
    }
}
