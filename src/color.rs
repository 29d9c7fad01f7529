//! Color constants and distance math for the 3-tone hardware palette.
//!
//! GB Studio renders each sprite layer with exactly three tones plus
//! transparency. The quantizer rewrites every opaque pixel to one of the
//! [`Shade`] tones below; transparent and out-of-band pixels become the
//! green marker color the engine treats as "no pixel".

use image::{Rgb, Rgba};

/// Output tone for the lightest palette slot.
pub const TONE_LIGHT: Rgb<u8> = Rgb([224, 248, 207]);
/// Output tone for the middle palette slot.
pub const TONE_MID: Rgb<u8> = Rgb([134, 192, 108]);
/// Output tone for the darkest palette slot.
pub const TONE_DARK: Rgb<u8> = Rgb([7, 24, 33]);

/// Marker green written for transparent pixels and reference-row padding.
pub const TRANSPARENT_MARKER: Rgb<u8> = Rgb([0, 255, 0]);

/// One of the three shade slots of a palette layer, lightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    Light,
    Mid,
    Dark,
}

impl Shade {
    /// All shades in slot order.
    pub const ALL: [Shade; 3] = [Shade::Light, Shade::Mid, Shade::Dark];

    /// The fixed output tone written for this slot.
    pub fn tone(self) -> Rgb<u8> {
        match self {
            Shade::Light => TONE_LIGHT,
            Shade::Mid => TONE_MID,
            Shade::Dark => TONE_DARK,
        }
    }

    /// Reverse lookup from an output tone. Lets the quantizer recognize its
    /// own output, which is what makes re-quantization idempotent.
    pub fn from_tone(color: Rgb<u8>) -> Option<Shade> {
        Shade::ALL.into_iter().find(|s| s.tone() == color)
    }
}

/// Squared Euclidean distance between two RGB colors.
pub fn distance_sq(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Drop the alpha channel.
pub fn rgb_of(pixel: Rgba<u8>) -> Rgb<u8> {
    Rgb([pixel[0], pixel[1], pixel[2]])
}

/// Promote an RGB color to a fully opaque RGBA pixel.
pub fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}
