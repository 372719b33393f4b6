// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Player colors.
//!
//! Overlay files carry colors as 6-hex-digit strings (`"#ff0000"`). This
//! module decodes them into float triples and encodes edited colors back.

/// An opaque RGB color with channels in the 0.0 to 1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse a 6-hex-digit color. A leading `#` and surrounding whitespace
    /// are accepted; anything else returns `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let s = hex.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(s, 16).ok()?;
        Some(Self::from_u8(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }

    /// Channels as rounded 8-bit values.
    pub fn to_u8(self) -> [u8; 3] {
        [channel_to_u8(self.r), channel_to_u8(self.g), channel_to_u8(self.b)]
    }

    /// Encode as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_hex_variants() {
        assert_eq!(Rgb::from_hex("#ff0000"), Some(Rgb::RED));
        assert_eq!(Rgb::from_hex("00ff00"), Some(Rgb::GREEN));
        assert_eq!(Rgb::from_hex("  #FFFFFF \n"), Some(Rgb::WHITE));
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        for bad in ["", "#", "#fff", "#ff00000", "#gg0000", "##ff0000", "+fffff", "red"] {
            assert_eq!(Rgb::from_hex(bad), None, "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_to_hex_lowercase() {
        assert_eq!(Rgb::from_u8(0xab, 0x0c, 0xff).to_hex(), "#ab0cff");
    }

    #[test]
    fn test_to_hex_clamps_out_of_range() {
        assert_eq!(Rgb::new(1.5, -0.2, 0.5).to_hex(), "#ff0080");
    }

    proptest! {
        #[test]
        fn test_hex_roundtrip_within_one_step(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let original = Rgb::from_u8(r, g, b);
            let decoded = Rgb::from_hex(&original.to_hex()).unwrap();
            prop_assert!((decoded.r - original.r).abs() <= 1.0 / 255.0);
            prop_assert!((decoded.g - original.g).abs() <= 1.0 / 255.0);
            prop_assert!((decoded.b - original.b).abs() <= 1.0 / 255.0);
            prop_assert_eq!(decoded.to_u8(), [r, g, b]);
        }
    }

    #[test]
    fn test_hex_roundtrip_every_channel_value() {
        // Channels are independent, so sweeping each one covers all 24-bit colors.
        for v in 0u8..=255 {
            let c = Rgb::from_u8(v, 255 - v, v / 2);
            assert_eq!(Rgb::from_hex(&c.to_hex()).unwrap().to_u8(), [v, 255 - v, v / 2]);
        }
    }
}
