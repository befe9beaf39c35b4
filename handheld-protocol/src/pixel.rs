//! RGB565 pixel packing
//!
//! The panel runs in 16-bit mode: 5 bits red, 6 bits green, 5 bits blue,
//! transmitted high byte first.

/// Bytes per pixel on the wire
pub const BYTES_PER_PIXEL: usize = 2;

/// A packed 16-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565(0x0000);
    pub const WHITE: Rgb565 = Rgb565(0xFFFF);

    /// Pack an 8-bit-per-channel colour, truncating the low bits
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16))
    }

    /// Wire representation: high byte first
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    /// Expand back to 8 bits per channel (low bits are zero)
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let v = self.0;
        (
            ((v >> 8) & 0xF8) as u8,
            ((v >> 3) & 0xFC) as u8,
            ((v & 0x1F) << 3) as u8,
        )
    }
}

impl From<(u8, u8, u8)> for Rgb565 {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::from_rgb888(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primaries() {
        assert_eq!(Rgb565::from_rgb888(255, 0, 0).0, 0xF800);
        assert_eq!(Rgb565::from_rgb888(0, 255, 0).0, 0x07E0);
        assert_eq!(Rgb565::from_rgb888(0, 0, 255).0, 0x001F);
        assert_eq!(Rgb565::from_rgb888(255, 255, 255), Rgb565::WHITE);
        assert_eq!(Rgb565::from_rgb888(0, 0, 0), Rgb565::BLACK);
    }

    #[test]
    fn test_high_byte_first() {
        assert_eq!(Rgb565::from_rgb888(255, 0, 0).to_be_bytes(), [0xF8, 0x00]);
        assert_eq!(Rgb565::from_rgb888(0, 0, 255).to_be_bytes(), [0x00, 0x1F]);
    }

    #[test]
    fn test_accent_colour() {
        // (0, 255, 213): green all ones, blue 213 >> 3 = 26
        let px = Rgb565::from_rgb888(0, 255, 213);
        assert_eq!(px.0, 0x07E0 | 26);
    }

    proptest! {
        #[test]
        fn prop_truncates_low_bits(r: u8, g: u8, b: u8) {
            let (r2, g2, b2) = Rgb565::from_rgb888(r, g, b).to_rgb888();
            prop_assert_eq!(r2, r & 0xF8);
            prop_assert_eq!(g2, g & 0xFC);
            prop_assert_eq!(b2, b & 0xF8);
        }

        #[test]
        fn prop_wire_bytes_match_packing(r: u8, g: u8, b: u8) {
            let px = Rgb565::from_rgb888(r, g, b);
            let [hi, lo] = px.to_be_bytes();
            prop_assert_eq!(hi & 0xF8, r & 0xF8);
            prop_assert_eq!(lo & 0x1F, b >> 3);
            prop_assert_eq!(Rgb565::from_be_bytes([hi, lo]), px);
        }
    }
}
