/// RGBA color stored as `"#RRGGBB"` / `"#RRGGBBAA"` in config files.
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#')?;
        if !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        match s.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Darkens the color by scaling each channel to 19/20. Alpha is kept.
    ///
    /// Used for the background right of the ruler column.
    pub fn dim(self) -> Self {
        let scale = |c: u8| ((c as u16 * 19) / 20) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb_and_rgba() {
        assert_eq!(HexColor::from_hex("#FF8800"), Some(HexColor::rgb(255, 136, 0)));
        assert_eq!(
            HexColor::from_hex("#326ec864"),
            Some(HexColor::rgba(50, 110, 200, 100))
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(HexColor::from_hex("").is_none());
        assert!(HexColor::from_hex("#").is_none());
        assert!(HexColor::from_hex("#GG0000").is_none());
        assert!(HexColor::from_hex("#12345").is_none());
        assert!(HexColor::from_hex("123456").is_none());
        assert!(HexColor::from_hex("#ééé").is_none());
    }

    #[test]
    fn test_to_hex_omits_opaque_alpha() {
        assert_eq!(HexColor::rgb(30, 30, 30).to_hex(), "#1E1E1E");
        assert_eq!(HexColor::rgba(50, 110, 200, 100).to_hex(), "#326EC864");
    }

    #[test]
    fn test_dim_scales_channels() {
        let c = HexColor::rgba(200, 100, 20, 128).dim();
        assert_eq!(c, HexColor::rgba(190, 95, 19, 128));
        assert_eq!(HexColor::rgb(0, 0, 0).dim(), HexColor::rgb(0, 0, 0));
        assert_eq!(HexColor::rgb(255, 255, 255).dim(), HexColor::rgb(242, 242, 242));
    }

    #[test]
    fn test_serde_round_trip() {
        let c = HexColor::rgb(212, 212, 212);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#D4D4D4\"");
        let parsed: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, c);
    }
}
