//! Color handling for Flowboard diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Colors are parsed from any CSS color string and
//! written back as hex strings, which is the form stored in diagram content.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Wrapper around the `DynamicColor` type from the color crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string.
    ///
    /// This parses CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowboard_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the color as a lowercase `#rrggbb` string, or `#rrggbbaa` when
    /// the color is not fully opaque.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowboard_core::color::Color;
    ///
    /// let color = Color::new("rgb(37, 99, 235)").unwrap();
    /// assert_eq!(color.to_hex_string(), "#2563eb");
    /// ```
    pub fn to_hex_string(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        if rgba.a == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        let red = Color::new("#ff0000");
        assert!(red.is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_color_hex_round_trip() {
        for hex in ["#111827", "#2563eb", "#0ea5e9", "#9333ea", "#ffffff"] {
            let color = Color::new(hex).unwrap();
            assert_eq!(color.to_hex_string(), hex);
            assert_eq!(Color::new(&color.to_string()).unwrap(), color);
        }
    }

    #[test]
    fn test_color_named_to_hex() {
        let color = Color::new("white").unwrap();
        assert_eq!(color.to_hex_string(), "#ffffff");
    }

    #[test]
    fn test_color_translucent_keeps_alpha() {
        let color = Color::new("rgba(255, 0, 0, 0.4)").unwrap();
        assert_eq!(color.to_hex_string(), "#ff000066");
    }

    #[test]
    fn test_color_serde_uses_hex() {
        let color = Color::new("rgb(4, 120, 87)").unwrap();
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#047857\"");

        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);

        let invalid: Result<Color, _> = serde_json::from_str("\"nope\"");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("#ff0000").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1.to_hex_string(), color2.to_hex_string());
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color1));
        assert!(!set.contains(&color3));
    }
}
