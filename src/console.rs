//! Scrolling text console on top of a [`Framebuffer`].
//!
//! Lines are page aligned: each line of text occupies a whole number of
//! 8-row pages, so running off the bottom edge is handled by a single
//! [`Framebuffer::scroll_one_line`] call instead of a redraw.

use core::fmt;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_5X8, FONT_8X13},
        MonoFont, MonoTextStyleBuilder,
    },
    prelude::*,
    text::{Baseline, Text},
};

use crate::color::Color;
use crate::config::ConsoleConfig;
use crate::framebuffer::Framebuffer;

/// Glyph sets available to the console.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleFont {
    /// 5×8 glyphs, one page per line.
    #[default]
    Small,
    /// 8×13 glyphs, two pages per line.
    Large,
}

impl ConsoleFont {
    /// Underlying `embedded-graphics` font.
    pub fn mono_font(self) -> &'static MonoFont<'static> {
        match self {
            ConsoleFont::Small => &FONT_5X8,
            ConsoleFont::Large => &FONT_8X13,
        }
    }

    /// Horizontal cursor advance per glyph, in pixels.
    pub fn advance(self) -> u32 {
        let font = self.mono_font();
        font.character_size.width + font.character_spacing
    }

    /// Pages covered by one line of text.
    pub fn line_pages(self) -> usize {
        (self.mono_font().character_size.height as usize).div_ceil(8)
    }

    /// Line pitch in pixels (always a multiple of 8).
    pub fn line_height(self) -> u32 {
        self.line_pages() as u32 * 8
    }
}

/// A text console writing glyphs into an owned [`Framebuffer`].
///
/// Implements [`core::fmt::Write`], so `write!` works directly:
///
/// ```
/// use core::fmt::Write;
/// use onebit_display_rs::{ColorMode, Console, ConsoleConfig, Framebuffer};
///
/// let mut fb: Framebuffer<'_, 1024> = Framebuffer::new(128, 64, ColorMode::Mono);
/// fb.allocate().unwrap();
/// let mut console = Console::new(fb, &ConsoleConfig::default());
/// writeln!(console, "uptime {}s", 42).unwrap();
/// assert_eq!(console.cursor().y, 8);
/// ```
pub struct Console<'a, const N: usize> {
    framebuffer: Framebuffer<'a, N>,
    cursor: Point,
    foreground: Color,
    background: Option<Color>,
    font: ConsoleFont,
    wrap: bool,
    scroll: bool,
}

impl<'a, const N: usize> Console<'a, N> {
    /// Wrap `framebuffer` with the text settings from `config`. The cursor
    /// starts at the top-left corner.
    pub fn new(framebuffer: Framebuffer<'a, N>, config: &ConsoleConfig) -> Self {
        let mut console = Self {
            framebuffer,
            cursor: Point::zero(),
            foreground: Color::On,
            background: None,
            font: config.font,
            wrap: config.wrap,
            scroll: config.scroll,
        };
        console.set_text_color(config.foreground, config.background);
        console
    }

    /// The framebuffer being written to.
    pub fn framebuffer(&self) -> &Framebuffer<'a, N> {
        &self.framebuffer
    }

    /// Mutable access for drawing graphics between lines of text.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<'a, N> {
        &mut self.framebuffer
    }

    /// Give the framebuffer back.
    pub fn into_framebuffer(self) -> Framebuffer<'a, N> {
        self.framebuffer
    }

    /// Top-left corner of the next glyph.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Move the cursor. A negative coordinate leaves that axis unchanged;
    /// coordinates past the right or bottom edge are clamped to it.
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        if x >= 0 {
            self.cursor.x = x.min(self.framebuffer.width() as i32);
        }
        if y >= 0 {
            self.cursor.y = y.min(self.framebuffer.height() as i32);
        }
    }

    /// Set glyph and glyph-cell colors.
    ///
    /// `background = None` draws only the set glyph pixels and leaves the
    /// framebuffer background alone. An opaque background also becomes the
    /// framebuffer background, so lines vacated by scrolling and
    /// [`clear()`](Self::clear) match the glyph cells. `Accent` is drawn as
    /// `On` when the framebuffer has no accent plane.
    pub fn set_text_color(&mut self, foreground: Color, background: Option<Color>) {
        let planes = self.framebuffer.color_mode().planes();
        self.foreground = foreground.for_planes(planes);
        self.background = background.map(|c| c.for_planes(planes));
        if let Some(background) = self.background {
            self.framebuffer.set_background(background);
        }
    }

    /// Current glyph and glyph-cell colors.
    pub fn text_color(&self) -> (Color, Option<Color>) {
        (self.foreground, self.background)
    }

    /// Select the glyph set used for subsequent text.
    pub fn set_font(&mut self, font: ConsoleFont) {
        self.font = font;
    }

    /// Current glyph set.
    pub fn font(&self) -> ConsoleFont {
        self.font
    }

    /// Wrap onto the next line at the right edge (`true`) or clip (`false`).
    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    /// Scroll when a new line would cross the bottom edge (`true`) or
    /// return to the top (`false`).
    pub fn set_scroll(&mut self, scroll: bool) {
        self.scroll = scroll;
    }

    /// Fill the framebuffer with its background color and home the cursor.
    pub fn clear(&mut self) {
        let background = self.framebuffer.background();
        self.framebuffer.fill(background);
        self.cursor = Point::zero();
    }

    /// Move to the start of the next line, scrolling if needed.
    pub fn new_line(&mut self) {
        self.cursor.x = 0;
        let line_height = self.font.line_height() as i32;
        let height = self.framebuffer.height() as i32;
        let next = self.cursor.y.saturating_add(line_height);

        if next.saturating_add(line_height) <= height {
            self.cursor.y = next;
            return;
        }

        let line_pages = self.font.line_pages();
        let pages = self.framebuffer.pages();
        if self.scroll && line_pages <= pages {
            // Amount is within 1..=pages, so this cannot fail.
            self.framebuffer.scroll_one_line(line_pages).ok();
            self.cursor.y = ((pages - line_pages) * 8) as i32;
        } else {
            self.cursor.y = 0;
        }
    }

    /// Render one character at the cursor and advance.
    pub fn write_char(&mut self, c: char) {
        match c {
            '\n' => self.new_line(),
            '\r' => self.cursor.x = 0,
            _ => {
                let advance = self.font.advance() as i32;
                if self.cursor.x.saturating_add(advance) > self.framebuffer.width() as i32 {
                    if !self.wrap {
                        return;
                    }
                    self.new_line();
                }
                self.draw_glyph(c);
                self.cursor.x += advance;
            }
        }
    }

    fn draw_glyph(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        let glyph = c.encode_utf8(&mut utf8);

        let mut style = MonoTextStyleBuilder::new()
            .font(self.font.mono_font())
            .text_color(self.foreground);
        if let Some(background) = self.background {
            style = style.background_color(background);
        }

        Text::with_baseline(glyph, self.cursor, style.build(), Baseline::Top)
            .draw(&mut self.framebuffer)
            .ok();
    }
}

impl<const N: usize> fmt::Write for Console<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.write_char(c);
        }
        Ok(())
    }
}
