//! Framebuffer scroll engine.
//!
//! Scrolling happens in place: no shadow buffer is needed. Whole-page
//! scrolls move `width`-byte page rows towards page 0 with a forward block
//! copy (the source always lies ahead of the destination), then paint the
//! vacated trailing pages with the background. Region scrolls shift a
//! rectangle of page rows by a single pixel row, carrying bits across page
//! boundaries.
//!
//! None of this touches hardware. Call
//! [`OledDriver::flush()`](crate::OledDriver::flush) afterwards to show the
//! result.

use core::ops::Range;

use crate::error::FramebufferError;
use crate::framebuffer::Framebuffer;

/// Direction of a single-pixel region scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    /// Content moves towards row 0.
    Up,
    /// Content moves away from row 0.
    Down,
}

/// Scroll `framebuffer` up by `amount_in_pages` pages.
///
/// `None` is accepted and ignored so callers holding an optional display
/// never need to check first. See [`Framebuffer::scroll_one_line`].
pub fn scroll_one_line<const N: usize>(
    framebuffer: Option<&mut Framebuffer<'_, N>>,
    amount_in_pages: usize,
) -> Result<(), FramebufferError> {
    match framebuffer {
        Some(fb) => fb.scroll_one_line(amount_in_pages),
        None => Ok(()),
    }
}

/// Move pages `[amount, pages)` of one plane to `[0, pages - amount)` and
/// fill the last `amount` pages with `fill`.
///
/// `amount` must already be checked against the page count.
fn shift_pages_up(plane: &mut [u8], width: usize, amount: usize, fill: u8) {
    let vacated = plane.len() - amount * width;
    plane.copy_within(amount * width.., 0);
    plane[vacated..].fill(fill);
}

impl<const N: usize> Framebuffer<'_, N> {
    fn check_scroll_amount(&self, amount: usize) -> Result<(), FramebufferError> {
        let pages = self.pages();
        if amount == 0 || amount > pages {
            return Err(FramebufferError::ScrollOutOfRange { amount, pages });
        }
        Ok(())
    }

    /// Shift the visible content up by `amount_in_pages` whole pages.
    ///
    /// Afterwards pages `[0, L - amount)` hold what was in
    /// `[amount, L)`, and the last `amount` pages hold the background
    /// color, where `L` is [`pages()`](Self::pages). On tri-color
    /// framebuffers both planes move together.
    ///
    /// Scrolling an unallocated framebuffer is a no-op and returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`FramebufferError::ScrollOutOfRange`] unless
    /// `0 < amount_in_pages <= L`. The buffer is untouched in that case.
    pub fn scroll_one_line(&mut self, amount_in_pages: usize) -> Result<(), FramebufferError> {
        if !self.is_allocated() {
            return Ok(());
        }
        self.check_scroll_amount(amount_in_pages)?;
        for plane in 0..self.color_mode().planes() {
            self.shift_plane(plane, amount_in_pages);
        }
        Ok(())
    }

    /// Shift a single bit plane up by `amount_in_pages` pages, leaving
    /// the other plane in place.
    ///
    /// Scrolling an unallocated framebuffer is a no-op and returns `Ok`.
    ///
    /// # Errors
    ///
    /// [`FramebufferError::InvalidPlane`] if the color mode has no such
    /// plane, or [`FramebufferError::ScrollOutOfRange`] as for
    /// [`scroll_one_line()`](Self::scroll_one_line).
    pub fn scroll_plane(
        &mut self,
        plane: usize,
        amount_in_pages: usize,
    ) -> Result<(), FramebufferError> {
        if !self.is_allocated() {
            return Ok(());
        }
        if plane >= self.color_mode().planes() {
            return Err(FramebufferError::InvalidPlane(plane));
        }
        self.check_scroll_amount(amount_in_pages)?;
        self.shift_plane(plane, amount_in_pages);
        Ok(())
    }

    fn shift_plane(&mut self, plane: usize, amount: usize) {
        let width = self.width() as usize;
        let fill = self.background().plane_byte(plane);
        if let Some(bytes) = self.plane_mut(plane) {
            shift_pages_up(bytes, width, amount, fill);
        }
    }

    /// Shift the pixels inside a rectangle of page rows by one pixel row.
    ///
    /// `columns` is a pixel range, `pages` a range of 8-row pages. Bits
    /// cross page boundaries inside the region; the row vacated at the
    /// trailing edge takes the background color. Pixels outside the region
    /// are not touched.
    ///
    /// Scrolling an unallocated framebuffer is a no-op and returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`FramebufferError::RegionOutOfBounds`] if either range is
    /// empty or extends past the framebuffer.
    pub fn scroll_region(
        &mut self,
        columns: Range<u16>,
        pages: Range<u16>,
        direction: ScrollDirection,
    ) -> Result<(), FramebufferError> {
        if !self.is_allocated() {
            return Ok(());
        }
        if columns.is_empty()
            || pages.is_empty()
            || columns.end > self.width()
            || pages.end as usize > self.pages()
        {
            return Err(FramebufferError::RegionOutOfBounds);
        }

        let width = self.width() as usize;
        let background = self.background();
        let (first, last) = (pages.start as usize, pages.end as usize - 1);

        for plane in 0..self.color_mode().planes() {
            let fill = background.plane_bit(plane) as u8;
            let Some(bytes) = self.plane_mut(plane) else {
                continue;
            };
            for col in columns.clone().map(usize::from) {
                match direction {
                    ScrollDirection::Up => {
                        // Top page first: each page pulls the top bit of the
                        // page below before that page is shifted.
                        for page in first..=last {
                            let carry = if page < last {
                                bytes[(page + 1) * width + col] & 0x01
                            } else {
                                fill
                            };
                            let byte = &mut bytes[page * width + col];
                            *byte = (*byte >> 1) | (carry << 7);
                        }
                    }
                    ScrollDirection::Down => {
                        for page in (first..=last).rev() {
                            let carry = if page > first {
                                bytes[(page - 1) * width + col] >> 7
                            } else {
                                fill
                            };
                            let byte = &mut bytes[page * width + col];
                            *byte = (*byte << 1) | carry;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::ColorMode;

    /// 8×32 framebuffer with pages filled 0xAA, 0xBB, 0xCC, 0xDD.
    fn four_pages() -> Framebuffer<'static, 64> {
        let mut fb = Framebuffer::new(8, 32, ColorMode::Mono);
        fb.allocate().unwrap();
        let bytes = fb.as_bytes_mut().unwrap();
        for (page, value) in [0xAA, 0xBB, 0xCC, 0xDD].into_iter().enumerate() {
            bytes[page * 8..(page + 1) * 8].fill(value);
        }
        fb
    }

    fn page<'a>(fb: &'a Framebuffer<'_, 64>, index: usize) -> &'a [u8] {
        &fb.as_bytes().unwrap()[index * 8..(index + 1) * 8]
    }

    #[test]
    fn scroll_by_one_page() {
        let mut fb = four_pages();
        fb.scroll_one_line(1).unwrap();
        assert_eq!(page(&fb, 0), &[0xBB; 8]);
        assert_eq!(page(&fb, 1), &[0xCC; 8]);
        assert_eq!(page(&fb, 2), &[0xDD; 8]);
        assert_eq!(page(&fb, 3), &[0x00; 8]);
    }

    #[test]
    fn scroll_by_two_pages() {
        let mut fb = four_pages();
        fb.scroll_one_line(2).unwrap();
        assert_eq!(page(&fb, 0), &[0xCC; 8]);
        assert_eq!(page(&fb, 1), &[0xDD; 8]);
        assert_eq!(page(&fb, 2), &[0x00; 8]);
        assert_eq!(page(&fb, 3), &[0x00; 8]);
    }

    #[test]
    fn scroll_amount_not_dividing_page_count() {
        let mut fb = four_pages();
        fb.scroll_one_line(3).unwrap();
        assert_eq!(page(&fb, 0), &[0xDD; 8]);
        for p in 1..4 {
            assert_eq!(page(&fb, p), &[0x00; 8]);
        }
    }

    #[test]
    fn scroll_by_all_pages_clears_buffer() {
        let mut fb = four_pages();
        fb.scroll_one_line(4).unwrap();
        assert!(fb.as_bytes().unwrap().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn four_single_scrolls_reach_background() {
        let mut fb = four_pages();
        for _ in 0..4 {
            fb.scroll_one_line(1).unwrap();
            assert_eq!(fb.as_bytes().unwrap().len(), 32);
        }
        assert!(fb.as_bytes().unwrap().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn vacated_pages_take_background() {
        let mut fb = four_pages();
        fb.set_background(Color::On);
        fb.scroll_one_line(1).unwrap();
        assert_eq!(page(&fb, 3), &[0xFF; 8]);
    }

    #[test]
    fn out_of_range_amounts_are_rejected() {
        let mut fb = four_pages();
        assert_eq!(
            fb.scroll_one_line(0),
            Err(FramebufferError::ScrollOutOfRange {
                amount: 0,
                pages: 4
            })
        );
        assert_eq!(
            fb.scroll_one_line(5),
            Err(FramebufferError::ScrollOutOfRange {
                amount: 5,
                pages: 4
            })
        );
        assert_eq!(page(&fb, 0), &[0xAA; 8]);
        assert_eq!(page(&fb, 3), &[0xDD; 8]);
    }

    #[test]
    fn unallocated_scroll_is_noop() {
        let mut fb: Framebuffer<'_, 64> = Framebuffer::new(8, 32, ColorMode::Mono);
        assert_eq!(fb.scroll_one_line(1), Ok(()));
        assert_eq!(fb.scroll_one_line(99), Ok(()));
        assert!(!fb.is_allocated());
    }

    #[test]
    fn unallocated_plane_and_region_scrolls_are_noops() {
        let mut fb: Framebuffer<'_, 64> = Framebuffer::new(8, 32, ColorMode::Mono);
        assert_eq!(fb.scroll_plane(5, 1), Ok(()));
        assert_eq!(fb.scroll_region(0..99, 0..1, ScrollDirection::Up), Ok(()));
        assert_eq!(fb.scroll_region(3..3, 0..9, ScrollDirection::Down), Ok(()));
        assert!(!fb.is_allocated());
    }

    #[test]
    fn missing_framebuffer_is_noop() {
        assert_eq!(scroll_one_line::<64>(None, 1), Ok(()));
    }

    #[test]
    fn free_function_scrolls_present_framebuffer() {
        let mut fb = four_pages();
        scroll_one_line(Some(&mut fb), 1).unwrap();
        assert_eq!(page(&fb, 0), &[0xBB; 8]);
    }

    #[test]
    fn borrowed_storage_scrolls_in_place() {
        let mut storage = [0u8; 16];
        storage[8..].fill(0x5A);
        {
            let mut fb: Framebuffer<'_, 0> = Framebuffer::new(8, 16, ColorMode::Mono);
            fb.set_buffer(&mut storage).unwrap();
            fb.scroll_one_line(1).unwrap();
        }
        assert_eq!(&storage[..8], &[0x5A; 8]);
        assert_eq!(&storage[8..], &[0x00; 8]);
    }

    #[test]
    fn tri_color_scrolls_both_planes() {
        let mut fb: Framebuffer<'_, 32> = Framebuffer::new(8, 16, ColorMode::TriColor);
        fb.allocate().unwrap();
        fb.plane_mut(0).unwrap()[8..].fill(0x11);
        fb.plane_mut(1).unwrap()[8..].fill(0x22);
        fb.set_background(Color::Accent);
        fb.scroll_one_line(1).unwrap();
        assert_eq!(&fb.plane(0).unwrap()[..8], &[0x11; 8]);
        assert_eq!(&fb.plane(0).unwrap()[8..], &[0x00; 8]);
        assert_eq!(&fb.plane(1).unwrap()[..8], &[0x22; 8]);
        assert_eq!(&fb.plane(1).unwrap()[8..], &[0xFF; 8]);
    }

    #[test]
    fn scroll_plane_leaves_other_plane() {
        let mut fb: Framebuffer<'_, 32> = Framebuffer::new(8, 16, ColorMode::TriColor);
        fb.allocate().unwrap();
        fb.plane_mut(0).unwrap()[8..].fill(0x11);
        fb.plane_mut(1).unwrap()[8..].fill(0x22);
        fb.scroll_plane(1, 1).unwrap();
        assert_eq!(&fb.plane(0).unwrap()[8..], &[0x11; 8]);
        assert_eq!(&fb.plane(1).unwrap()[..8], &[0x22; 8]);
        assert_eq!(
            fb.scroll_plane(2, 1),
            Err(FramebufferError::InvalidPlane(2))
        );
    }

    #[test]
    fn region_scroll_up_carries_across_pages() {
        let mut fb = four_pages();
        fb.as_bytes_mut().unwrap().fill(0);
        // Row 8 (top of page 1) in column 2.
        fb.set_pixel(2, 8, Color::On);
        fb.scroll_region(0..8, 0..2, ScrollDirection::Up).unwrap();
        assert_eq!(fb.pixel(2, 7), Some(Color::On));
        assert_eq!(fb.pixel(2, 8), Some(Color::Off));
    }

    #[test]
    fn region_scroll_down_carries_across_pages() {
        let mut fb = four_pages();
        fb.as_bytes_mut().unwrap().fill(0);
        fb.set_pixel(5, 7, Color::On);
        fb.scroll_region(0..8, 0..4, ScrollDirection::Down).unwrap();
        assert_eq!(fb.pixel(5, 8), Some(Color::On));
        assert_eq!(fb.pixel(5, 7), Some(Color::Off));
    }

    #[test]
    fn region_scroll_drops_edge_row_and_fills_background() {
        let mut fb = four_pages();
        fb.as_bytes_mut().unwrap().fill(0);
        fb.set_background(Color::On);
        fb.set_pixel(0, 0, Color::On);
        fb.scroll_region(0..1, 0..1, ScrollDirection::Up).unwrap();
        // Row 0 scrolled out, row 7 filled from the background.
        assert_eq!(fb.as_bytes().unwrap()[0], 0b1000_0000);
    }

    #[test]
    fn region_scroll_leaves_outside_untouched() {
        let mut fb = four_pages();
        fb.scroll_region(2..4, 1..3, ScrollDirection::Up).unwrap();
        assert_eq!(page(&fb, 0), &[0xAA; 8]);
        assert_eq!(page(&fb, 3), &[0xDD; 8]);
        assert_eq!(page(&fb, 1)[0], 0xBB);
        assert_eq!(page(&fb, 1)[5], 0xBB);
        // 0xBB >> 1 with the low bit of 0xCC (0) carried into bit 7.
        assert_eq!(page(&fb, 1)[2], 0x5D);
        // 0xCC >> 1 with a background (0) bit carried in.
        assert_eq!(page(&fb, 2)[3], 0x66);
    }

    #[test]
    fn region_out_of_bounds_is_rejected() {
        let mut fb = four_pages();
        assert_eq!(
            fb.scroll_region(0..9, 0..1, ScrollDirection::Up),
            Err(FramebufferError::RegionOutOfBounds)
        );
        assert_eq!(
            fb.scroll_region(0..8, 2..5, ScrollDirection::Up),
            Err(FramebufferError::RegionOutOfBounds)
        );
        assert_eq!(
            fb.scroll_region(3..3, 0..1, ScrollDirection::Down),
            Err(FramebufferError::RegionOutOfBounds)
        );
    }
}
