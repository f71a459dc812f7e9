//! Native color model and conversions into it.
//!
//! The buffer stores every pixel as four bytes in B, G, R, A order with
//! premultiplied alpha. That order is the contract with the presentation
//! surface, so the byte positions are spelled out as constants here rather
//! than inferred from struct field order.
//!
//! Any [`Color`] can be written into a buffer. Conversion goes through a
//! 16-bit-per-channel RGBA intermediate and keeps the high byte of each
//! channel; [`Bgra8`] skips the round trip entirely.

use rgb::alt::BGRA;
use rgb::{Rgb, Rgba};

/// The buffer's native pixel: 8-bit premultiplied blue, green, red, alpha.
pub type Bgra8 = BGRA<u8>;

/// Byte index of the blue channel within a pixel.
pub const B: usize = 0;
/// Byte index of the green channel within a pixel.
pub const G: usize = 1;
/// Byte index of the red channel within a pixel.
pub const R: usize = 2;
/// Byte index of the alpha channel within a pixel.
pub const A: usize = 3;
/// Bytes occupied by one pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Fully transparent black, the value of freshly allocated storage.
pub const TRANSPARENT: Bgra8 = BGRA {
    b: 0,
    g: 0,
    r: 0,
    a: 0,
};

/// Encode a native color into its four storage bytes.
#[inline]
pub const fn to_bytes(c: Bgra8) -> [u8; BYTES_PER_PIXEL] {
    let mut px = [0u8; BYTES_PER_PIXEL];
    px[B] = c.b;
    px[G] = c.g;
    px[R] = c.r;
    px[A] = c.a;
    px
}

/// Decode four storage bytes into a native color.
#[inline]
pub const fn from_bytes(px: [u8; BYTES_PER_PIXEL]) -> Bgra8 {
    BGRA {
        b: px[B],
        g: px[G],
        r: px[R],
        a: px[A],
    }
}

/// Widen an 8-bit channel to 16 bits by bit replication, so `0xff` maps to
/// `0xffff` exactly.
#[inline]
pub const fn widen(v: u8) -> u16 {
    let v = v as u16;
    v | (v << 8)
}

/// Narrow a 16-bit channel to 8 bits, keeping the high byte.
#[inline]
pub const fn narrow(v: u16) -> u8 {
    (v >> 8) as u8
}

/// Expand a native color to 16 bits per channel.
#[inline]
pub const fn expand16(c: Bgra8) -> Rgba<u16> {
    Rgba {
        r: widen(c.r),
        g: widen(c.g),
        b: widen(c.b),
        a: widen(c.a),
    }
}

/// A color that can be stored in the buffer.
///
/// Implementors provide the premultiplied 16-bit RGBA form; the default
/// [`to_native`](Color::to_native) truncates it to the native layout.
pub trait Color: Copy {
    /// Premultiplied red, green, blue, alpha at 16 bits per channel.
    fn rgba16(self) -> Rgba<u16>;

    /// The native form of this color.
    #[inline]
    fn to_native(self) -> Bgra8 {
        let c = self.rgba16();
        BGRA {
            b: narrow(c.b),
            g: narrow(c.g),
            r: narrow(c.r),
            a: narrow(c.a),
        }
    }
}

impl Color for Bgra8 {
    #[inline]
    fn rgba16(self) -> Rgba<u16> {
        expand16(self)
    }

    #[inline]
    fn to_native(self) -> Bgra8 {
        self
    }
}

impl Color for BGRA<u16> {
    #[inline]
    fn rgba16(self) -> Rgba<u16> {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: self.a,
        }
    }
}

impl Color for Rgba<u8> {
    #[inline]
    fn rgba16(self) -> Rgba<u16> {
        Rgba {
            r: widen(self.r),
            g: widen(self.g),
            b: widen(self.b),
            a: widen(self.a),
        }
    }
}

impl Color for Rgba<u16> {
    #[inline]
    fn rgba16(self) -> Rgba<u16> {
        self
    }
}

/// Opaque.
impl Color for Rgb<u8> {
    #[inline]
    fn rgba16(self) -> Rgba<u16> {
        Rgba {
            r: widen(self.r),
            g: widen(self.g),
            b: widen(self.b),
            a: u16::MAX,
        }
    }
}

/// Opaque.
impl Color for Rgb<u16> {
    #[inline]
    fn rgba16(self) -> Rgba<u16> {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: u16::MAX,
        }
    }
}

/// Raw storage bytes, already in native order.
impl Color for [u8; BYTES_PER_PIXEL] {
    #[inline]
    fn rgba16(self) -> Rgba<u16> {
        expand16(from_bytes(self))
    }

    #[inline]
    fn to_native(self) -> Bgra8 {
        from_bytes(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Byte layout ---

    #[test]
    fn native_byte_layout_is_bgra() {
        let c = BGRA {
            b: 0x11,
            g: 0x22,
            r: 0x33,
            a: 0x44,
        };
        assert_eq!(to_bytes(c), [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(from_bytes([0x11, 0x22, 0x33, 0x44]), c);
        assert_eq!((B, G, R, A), (0, 1, 2, 3));
    }

    // --- 16-bit expansion ---

    #[test]
    fn widen_replicates_bits() {
        assert_eq!(widen(0), 0);
        assert_eq!(widen(0x01), 0x0101);
        assert_eq!(widen(0x80), 0x8080);
        assert_eq!(widen(0xff), 0xffff);
    }

    #[test]
    fn expand16_maps_each_channel() {
        let c = BGRA {
            b: 30,
            g: 20,
            r: 10,
            a: 255,
        };
        let wide = expand16(c);
        assert_eq!(wide.r, 10 | (10 << 8));
        assert_eq!(wide.g, 20 | (20 << 8));
        assert_eq!(wide.b, 30 | (30 << 8));
        assert_eq!(wide.a, 0xffff);
    }

    // --- Conversion ---

    #[test]
    fn native_is_identity() {
        let c: Bgra8 = BGRA {
            b: 7,
            g: 8,
            r: 9,
            a: 10,
        };
        assert_eq!(c.to_native(), c);
    }

    #[test]
    fn rgba16_keeps_high_byte_and_reorders() {
        let c: Rgba<u16> = Rgba {
            r: 0x12ff,
            g: 0x3400,
            b: 0x56aa,
            a: 0xff01,
        };
        assert_eq!(
            c.to_native(),
            BGRA {
                b: 0x56,
                g: 0x34,
                r: 0x12,
                a: 0xff,
            }
        );
    }

    #[test]
    fn rgba8_roundtrips_through_16_bit() {
        let c = Rgba {
            r: 10u8,
            g: 20,
            b: 30,
            a: 40,
        };
        assert_eq!(
            c.to_native(),
            BGRA {
                b: 30,
                g: 20,
                r: 10,
                a: 40,
            }
        );
    }

    #[test]
    fn bgra16_is_reordered_correctly() {
        let c: BGRA<u16> = BGRA {
            b: 0xaa00,
            g: 0xbb00,
            r: 0xcc00,
            a: 0xdd00,
        };
        assert_eq!(to_bytes(c.to_native()), [0xaa, 0xbb, 0xcc, 0xdd]);
    }

    #[test]
    fn rgb_is_opaque() {
        let c = Rgb { r: 1u8, g: 2, b: 3 };
        assert_eq!(c.to_native().a, 0xff);
        let c = Rgb {
            r: 0x0100u16,
            g: 0x0200,
            b: 0x0300,
        };
        assert_eq!(to_bytes(c.to_native()), [3, 2, 1, 0xff]);
    }

    #[test]
    fn raw_bytes_are_native() {
        let px = [1u8, 2, 3, 4];
        assert_eq!(to_bytes(px.to_native()), px);
        assert_eq!(px.rgba16().a, 0x0404);
    }
}
