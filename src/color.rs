//! Pixel colors for 1-bit and tri-color panels.

use embedded_graphics::pixelcolor::{BinaryColor, PixelColor};

/// A pixel value as stored across the framebuffer bit planes.
///
/// | Color    | Plane 0 bit | Plane 1 bit |
/// |----------|-------------|-------------|
/// | `Off`    | 0           | 0           |
/// | `On`     | 1           | 0           |
/// | `Accent` | 0           | 1           |
///
/// Plane 1 only exists on tri-color panels; on a mono framebuffer `Accent`
/// is drawn as `On`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Pixel clear (unlit OLED pixel, white e-paper).
    #[default]
    Off,
    /// Pixel set in the primary plane (lit OLED pixel, black ink).
    On,
    /// Pixel set in the accent plane (red/yellow ink on tri-color panels).
    Accent,
}

impl Color {
    /// Bit value of this color in the given plane.
    pub fn plane_bit(self, plane: usize) -> bool {
        match (self, plane) {
            (Color::On, 0) => true,
            (Color::Accent, 1) => true,
            _ => false,
        }
    }

    /// Byte that paints all 8 rows of a page column in this color.
    pub fn plane_byte(self, plane: usize) -> u8 {
        if self.plane_bit(plane) {
            0xFF
        } else {
            0x00
        }
    }

    /// Map `Accent` onto `On` for panels without an accent plane.
    pub fn for_planes(self, planes: usize) -> Self {
        match self {
            Color::Accent if planes < 2 => Color::On,
            c => c,
        }
    }
}

impl PixelColor for Color {
    type Raw = ();
}

impl From<BinaryColor> for Color {
    fn from(c: BinaryColor) -> Self {
        match c {
            BinaryColor::On => Color::On,
            BinaryColor::Off => Color::Off,
        }
    }
}
