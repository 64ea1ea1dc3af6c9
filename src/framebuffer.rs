//! Packed 1-bit-per-pixel framebuffer.
//!
//! The byte layout matches the SSD1306/SH1106 family and most page-addressed
//! LCD and e-paper controllers: the surface is split into pages of 8 pixel
//! rows, each page is `width` bytes, and bit `n` of a byte is row `n` of
//! that page (LSB on top).
//!
//! ```text
//!            col 0   col 1   ...   col w-1
//! page 0   [ byte ][ byte ]  ...  [ byte ]    rows 0..8
//! page 1   [ byte ][ byte ]  ...  [ byte ]    rows 8..16
//! ...
//! ```
//!
//! Tri-color framebuffers hold a second plane of the same size directly
//! after the first.

use core::convert::Infallible;

use embedded_graphics::{draw_target::DrawTarget, prelude::*, Pixel};
use heapless::Vec;

use crate::color::Color;
use crate::config::{ColorMode, DisplayConfig};
use crate::error::FramebufferError;

/// Backing memory of a [`Framebuffer`].
enum Storage<'a, const N: usize> {
    /// No memory attached; every draw and scroll is a no-op.
    Unallocated,
    /// Memory owned by the framebuffer, released by [`Framebuffer::free`].
    Owned(Vec<u8, N>),
    /// Memory lent by the caller; never released by the framebuffer.
    Borrowed(&'a mut [u8]),
}

/// An off-screen 1-bit-per-pixel display surface.
///
/// `N` is the capacity of the owned storage used by
/// [`allocate()`](Self::allocate). It is unused when the framebuffer only
/// ever borrows external memory through [`set_buffer()`](Self::set_buffer).
///
/// Width, height and color mode are fixed at construction. A single owner
/// mutates the buffer; nothing here is safe to share with an interrupt
/// handler without external serialisation.
///
/// # Example
///
/// ```
/// use onebit_display_rs::{Color, ColorMode, Framebuffer};
///
/// let mut fb: Framebuffer<'_, 1024> = Framebuffer::new(128, 64, ColorMode::Mono);
/// fb.allocate().unwrap();
/// fb.set_pixel(3, 10, Color::On);
/// assert_eq!(fb.pixel(3, 10), Some(Color::On));
/// ```
pub struct Framebuffer<'a, const N: usize> {
    width: u16,
    height: u16,
    color_mode: ColorMode,
    background: Color,
    storage: Storage<'a, N>,
}

impl<'a, const N: usize> Framebuffer<'a, N> {
    /// Create an unallocated framebuffer.
    pub fn new(width: u16, height: u16, color_mode: ColorMode) -> Self {
        Self {
            width,
            height,
            color_mode,
            background: Color::Off,
            storage: Storage::Unallocated,
        }
    }

    /// Create an unallocated framebuffer with geometry, color mode and
    /// background taken from `config`.
    pub fn from_config(config: &DisplayConfig) -> Self {
        let mut fb = Self::new(config.width, config.height, config.color_mode);
        fb.set_background(config.background);
        fb
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Color mode chosen at construction.
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Number of 8-row pages: `ceil(height / 8)`.
    pub fn pages(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }

    /// Bytes in one bit plane: `width * pages`.
    pub fn plane_size(&self) -> usize {
        self.width as usize * self.pages()
    }

    /// Bytes across all bit planes.
    pub fn buffer_size(&self) -> usize {
        self.plane_size() * self.color_mode.planes()
    }

    // ── Storage lifecycle ────────────────────────────────────────────

    /// Attach owned, zeroed storage of [`buffer_size()`](Self::buffer_size)
    /// bytes.
    ///
    /// Calling this on an allocated framebuffer clears it. A previously
    /// borrowed buffer is released to its owner unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FramebufferError::NoMemory`] if the capacity `N` is smaller
    /// than the required size.
    pub fn allocate(&mut self) -> Result<(), FramebufferError> {
        let required = self.buffer_size();
        let no_memory = FramebufferError::NoMemory {
            required,
            capacity: N,
        };
        if required > N {
            return Err(no_memory);
        }
        let mut bytes = Vec::new();
        bytes.resize(required, 0).map_err(|_| no_memory)?;
        self.storage = Storage::Owned(bytes);
        Ok(())
    }

    /// Draw into caller-supplied memory instead of owned storage.
    ///
    /// Only the first [`buffer_size()`](Self::buffer_size) bytes are used.
    /// The framebuffer never frees this memory; [`free()`](Self::free)
    /// hands it back. Any owned storage is dropped.
    ///
    /// Returns the previously borrowed buffer, if there was one.
    ///
    /// # Errors
    ///
    /// Returns [`FramebufferError::BufferTooSmall`] if `buffer` is shorter
    /// than the framebuffer. The current storage is kept in that case.
    pub fn set_buffer(
        &mut self,
        buffer: &'a mut [u8],
    ) -> Result<Option<&'a mut [u8]>, FramebufferError> {
        let required = self.buffer_size();
        if buffer.len() < required {
            return Err(FramebufferError::BufferTooSmall {
                required,
                actual: buffer.len(),
            });
        }
        match core::mem::replace(&mut self.storage, Storage::Borrowed(buffer)) {
            Storage::Borrowed(previous) => Ok(Some(previous)),
            _ => Ok(None),
        }
    }

    /// Detach the storage.
    ///
    /// Owned memory is released. Borrowed memory is returned to the caller.
    /// Freeing an unallocated framebuffer does nothing.
    pub fn free(&mut self) -> Option<&'a mut [u8]> {
        match core::mem::replace(&mut self.storage, Storage::Unallocated) {
            Storage::Borrowed(buffer) => Some(buffer),
            _ => None,
        }
    }

    /// `true` if owned or borrowed storage is attached.
    pub fn is_allocated(&self) -> bool {
        !matches!(self.storage, Storage::Unallocated)
    }

    /// `true` if the storage is caller-supplied.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.storage, Storage::Borrowed(_))
    }

    /// All planes as one byte slice, or `None` if unallocated.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        let size = self.buffer_size();
        match &self.storage {
            Storage::Unallocated => None,
            Storage::Owned(bytes) => Some(&bytes[..size]),
            Storage::Borrowed(bytes) => Some(&bytes[..size]),
        }
    }

    /// Mutable view of all planes, or `None` if unallocated.
    pub fn as_bytes_mut(&mut self) -> Option<&mut [u8]> {
        let size = self.buffer_size();
        match &mut self.storage {
            Storage::Unallocated => None,
            Storage::Owned(bytes) => Some(&mut bytes[..size]),
            Storage::Borrowed(bytes) => Some(&mut bytes[..size]),
        }
    }

    /// One bit plane, or `None` if unallocated or `plane` does not exist.
    pub fn plane(&self, plane: usize) -> Option<&[u8]> {
        if plane >= self.color_mode.planes() {
            return None;
        }
        let size = self.plane_size();
        self.as_bytes()
            .map(|bytes| &bytes[plane * size..(plane + 1) * size])
    }

    /// Mutable view of one bit plane.
    pub fn plane_mut(&mut self, plane: usize) -> Option<&mut [u8]> {
        if plane >= self.color_mode.planes() {
            return None;
        }
        let size = self.plane_size();
        self.as_bytes_mut()
            .map(|bytes| &mut bytes[plane * size..(plane + 1) * size])
    }

    // ── Background ───────────────────────────────────────────────────

    /// Color written into regions vacated by a scroll.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Set the color written into regions vacated by a scroll.
    pub fn set_background(&mut self, color: Color) {
        self.background = color.for_planes(self.color_mode.planes());
    }

    // ── Pixels ───────────────────────────────────────────────────────

    /// Byte index within a plane and bit mask for `(x, y)`, or `None` if
    /// the point is off-surface.
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some(((y / 8) * self.width as usize + x, 1 << (y % 8)))
    }

    /// Set one pixel. Off-surface points and unallocated storage are
    /// ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        let planes = self.color_mode.planes();
        let color = color.for_planes(planes);
        let plane_size = self.plane_size();
        if let Some(bytes) = self.as_bytes_mut() {
            for plane in 0..planes {
                let byte = &mut bytes[plane * plane_size + index];
                if color.plane_bit(plane) {
                    *byte |= mask;
                } else {
                    *byte &= !mask;
                }
            }
        }
    }

    /// Read one pixel, or `None` if off-surface or unallocated.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (index, mask) = self.locate(x, y)?;
        let bytes = self.as_bytes()?;
        let plane_size = self.plane_size();
        let accent = self.color_mode.planes() > 1 && bytes[plane_size + index] & mask != 0;
        Some(if accent {
            Color::Accent
        } else if bytes[index] & mask != 0 {
            Color::On
        } else {
            Color::Off
        })
    }

    /// Paint the whole surface in one color.
    pub fn fill(&mut self, color: Color) {
        let color = color.for_planes(self.color_mode.planes());
        for plane in 0..self.color_mode.planes() {
            if let Some(bytes) = self.plane_mut(plane) {
                bytes.fill(color.plane_byte(plane));
            }
        }
    }
}

impl<const N: usize> DrawTarget for Framebuffer<'_, N> {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl<const N: usize> OriginDimensions for Framebuffer<'_, N> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        pixelcolor::BinaryColor,
        primitives::{PrimitiveStyle, Rectangle},
    };

    fn mono(width: u16, height: u16) -> Framebuffer<'static, 1024> {
        let mut fb = Framebuffer::new(width, height, ColorMode::Mono);
        fb.allocate().unwrap();
        fb
    }

    #[test]
    fn new_framebuffer_is_unallocated() {
        let fb: Framebuffer<'_, 1024> = Framebuffer::new(128, 64, ColorMode::Mono);
        assert!(!fb.is_allocated());
        assert!(fb.as_bytes().is_none());
        assert_eq!(fb.buffer_size(), 1024);
    }

    #[test]
    fn allocate_sizes_by_rounded_pages() {
        let fb = mono(10, 12);
        assert_eq!(fb.pages(), 2);
        assert_eq!(fb.as_bytes().unwrap().len(), 20);
        assert!(fb.as_bytes().unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn allocate_doubles_for_tri_color() {
        let mut fb: Framebuffer<'_, 2048> = Framebuffer::new(128, 64, ColorMode::TriColor);
        fb.allocate().unwrap();
        assert_eq!(fb.as_bytes().unwrap().len(), 2048);
        assert_eq!(fb.plane(1).unwrap().len(), 1024);
        assert!(fb.plane(2).is_none());
    }

    #[test]
    fn allocate_over_capacity_fails() {
        let mut fb: Framebuffer<'_, 512> = Framebuffer::new(128, 64, ColorMode::Mono);
        assert_eq!(
            fb.allocate(),
            Err(FramebufferError::NoMemory {
                required: 1024,
                capacity: 512
            })
        );
        assert!(!fb.is_allocated());
    }

    #[test]
    fn set_buffer_rejects_short_slice() {
        let mut storage = [0u8; 15];
        let mut fb: Framebuffer<'_, 0> = Framebuffer::new(8, 16, ColorMode::Mono);
        assert_eq!(
            fb.set_buffer(&mut storage),
            Err(FramebufferError::BufferTooSmall {
                required: 16,
                actual: 15
            })
        );
        assert!(!fb.is_allocated());
    }

    #[test]
    fn borrowed_buffer_is_returned_on_free() {
        let mut storage = [0u8; 20];
        {
            let mut fb: Framebuffer<'_, 0> = Framebuffer::new(8, 16, ColorMode::Mono);
            assert!(fb.set_buffer(&mut storage).unwrap().is_none());
            assert!(fb.is_borrowed());
            assert_eq!(fb.as_bytes().unwrap().len(), 16);
            fb.fill(Color::On);
            let returned = fb.free().unwrap();
            assert_eq!(returned.len(), 20);
            assert!(!fb.is_allocated());
        }
        assert!(storage[..16].iter().all(|&b| b == 0xFF));
        assert!(storage[16..].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn set_buffer_returns_previous_borrow() {
        let mut first = [0u8; 8];
        let mut second = [0u8; 8];
        let mut fb: Framebuffer<'_, 0> = Framebuffer::new(8, 8, ColorMode::Mono);
        fb.set_buffer(&mut first).unwrap();
        let previous = fb.set_buffer(&mut second).unwrap();
        assert!(previous.is_some());
    }

    #[test]
    fn free_owned_storage_returns_nothing() {
        let mut fb = mono(8, 8);
        assert!(fb.free().is_none());
        assert!(!fb.is_allocated());
    }

    #[test]
    fn pixel_layout_is_page_column_lsb_top() {
        let mut fb = mono(16, 16);
        fb.set_pixel(3, 10, Color::On);
        let bytes = fb.as_bytes().unwrap();
        assert_eq!(bytes[16 + 3], 0b0000_0100);
        assert_eq!(bytes.iter().filter(|&&b| b != 0).count(), 1);
        assert_eq!(fb.pixel(3, 10), Some(Color::On));
        fb.set_pixel(3, 10, Color::Off);
        assert_eq!(fb.pixel(3, 10), Some(Color::Off));
    }

    #[test]
    fn off_surface_pixels_are_ignored() {
        let mut fb = mono(8, 8);
        fb.set_pixel(-1, 0, Color::On);
        fb.set_pixel(8, 0, Color::On);
        fb.set_pixel(0, 8, Color::On);
        assert!(fb.as_bytes().unwrap().iter().all(|&b| b == 0));
        assert_eq!(fb.pixel(8, 0), None);
    }

    #[test]
    fn unallocated_pixel_ops_are_noops() {
        let mut fb: Framebuffer<'_, 64> = Framebuffer::new(8, 8, ColorMode::Mono);
        fb.set_pixel(0, 0, Color::On);
        fb.fill(Color::On);
        assert_eq!(fb.pixel(0, 0), None);
    }

    #[test]
    fn accent_uses_second_plane() {
        let mut fb: Framebuffer<'_, 32> = Framebuffer::new(8, 16, ColorMode::TriColor);
        fb.allocate().unwrap();
        fb.set_pixel(1, 1, Color::On);
        fb.set_pixel(1, 1, Color::Accent);
        assert_eq!(fb.plane(0).unwrap()[1], 0);
        assert_eq!(fb.plane(1).unwrap()[1], 0b10);
        assert_eq!(fb.pixel(1, 1), Some(Color::Accent));
    }

    #[test]
    fn accent_on_mono_draws_on() {
        let mut fb = mono(8, 8);
        fb.set_pixel(0, 0, Color::Accent);
        assert_eq!(fb.pixel(0, 0), Some(Color::On));
    }

    #[test]
    fn fill_paints_each_plane() {
        let mut fb: Framebuffer<'_, 32> = Framebuffer::new(8, 16, ColorMode::TriColor);
        fb.allocate().unwrap();
        fb.fill(Color::Accent);
        assert!(fb.plane(0).unwrap().iter().all(|&b| b == 0x00));
        assert!(fb.plane(1).unwrap().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn draws_embedded_graphics_primitives() {
        let mut fb = mono(16, 16);
        Rectangle::new(Point::new(0, 0), Size::new(2, 8))
            .into_styled(PrimitiveStyle::with_fill(Color::On))
            .draw(&mut fb)
            .unwrap();
        let bytes = fb.as_bytes().unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xFF, 0x00]);
        assert_eq!(fb.size(), Size::new(16, 16));
    }

    #[test]
    fn accepts_binary_color_drawing() {
        let mut fb = mono(8, 8);
        Pixel(Point::new(2, 2), BinaryColor::On)
            .draw(&mut fb.color_converted())
            .unwrap();
        assert_eq!(fb.pixel(2, 2), Some(Color::On));
    }

    #[test]
    fn clear_fills_whole_surface() {
        let mut fb = mono(8, 8);
        fb.clear(Color::On).unwrap();
        assert!(fb.as_bytes().unwrap().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn from_config_copies_background() {
        let config = DisplayConfig {
            background: Color::On,
            ..DisplayConfig::default()
        };
        let fb: Framebuffer<'_, 1024> = Framebuffer::from_config(&config);
        assert_eq!(fb.background(), Color::On);
        assert_eq!(fb.width(), 128);
        assert_eq!(fb.height(), 64);
    }
}
