//! Panel and console configuration.
//!
//! All geometry and behaviour knobs live in plain structs with a
//! [`Default`] matching a 128×64 mono SSD1306 at I2C address `0x3C`.

use ssd1306::prelude::DisplayRotation;

use crate::color::Color;
use crate::console::ConsoleFont;

// ── ColorMode ────────────────────────────────────────────────────────────

/// Number of bit planes held by the framebuffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorMode {
    /// One plane, one bit per pixel.
    #[default]
    Mono,
    /// Two planes: black/white plus an accent (red/yellow) plane.
    TriColor,
}

impl ColorMode {
    /// Number of bit planes in this mode.
    pub fn planes(self) -> usize {
        match self {
            ColorMode::Mono => 1,
            ColorMode::TriColor => 2,
        }
    }
}

// ── Rotation ─────────────────────────────────────────────────────────────

/// Panel orientation.
///
/// Only the rotations that keep the page layout of the framebuffer are
/// offered: the SSD1306 remaps segments and COM lines for these in
/// hardware, while quarter turns would need the image transposed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Panel mounted upright.
    #[default]
    Rotate0,
    /// Panel mounted upside down.
    Rotate180,
}

impl Rotation {
    /// Rotation angle in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Rotate0 => 0,
            Rotation::Rotate180 => 180,
        }
    }

    /// Parse an angle in degrees. Only 0 and 180 are supported.
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Rotate0),
            180 => Some(Rotation::Rotate180),
            _ => None,
        }
    }
}

impl From<Rotation> for DisplayRotation {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Rotate0 => DisplayRotation::Rotate0,
            Rotation::Rotate180 => DisplayRotation::Rotate180,
        }
    }
}

// ── DisplayFlags ─────────────────────────────────────────────────────────

/// Panel polarity flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayFlags {
    /// Invert every pixel when pushing the framebuffer to hardware.
    pub inverted: bool,
}

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Configuration for the panel, framebuffer and update task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Panel width in pixels. Default: 128.
    pub width: u16,
    /// Panel height in pixels. Default: 64.
    pub height: u16,
    /// Bit planes in the framebuffer. Default: [`ColorMode::Mono`].
    pub color_mode: ColorMode,
    /// Panel orientation. Default: [`Rotation::Rotate0`].
    pub rotation: Rotation,
    /// Polarity. Default: none set.
    pub flags: DisplayFlags,
    /// Color written into rows vacated by a scroll. Default: [`Color::Off`].
    pub background: Color,
    /// 7-bit I2C device address. Default: `0x3C`.
    pub i2c_address: u8,
    /// Contrast register value sent at init. Default: `0x7F`.
    pub contrast: u8,
    /// Maximum refresh rate of the update task in Hz. Default: 30.
    pub update_frequency_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            color_mode: ColorMode::Mono,
            rotation: Rotation::Rotate0,
            flags: DisplayFlags::default(),
            background: Color::Off,
            i2c_address: 0x3C,
            contrast: 0x7F,
            update_frequency_hz: 30,
        }
    }
}

impl DisplayConfig {
    /// Number of 8-row pages: `ceil(height / 8)`.
    pub fn pages(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }

    /// Framebuffer size in bytes, across all bit planes.
    pub fn buffer_size(&self) -> usize {
        self.width as usize * self.pages() * self.color_mode.planes()
    }

    /// Convert the configured frequency to a timer period in milliseconds.
    ///
    /// Formula: `1000 / update_frequency_hz`. A zero frequency is treated
    /// as 1 Hz.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz.max(1) as u64
    }
}

// ── ConsoleConfig ────────────────────────────────────────────────────────

/// Initial text settings for a [`Console`](crate::Console).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleConfig {
    /// Glyph set. Default: [`ConsoleFont::Small`].
    pub font: ConsoleFont,
    /// Text color. Default: [`Color::On`].
    pub foreground: Color,
    /// Glyph background; `None` leaves unset glyph pixels untouched.
    /// Default: `None`.
    pub background: Option<Color>,
    /// Wrap at the right edge instead of clipping. Default: `true`.
    pub wrap: bool,
    /// Scroll the framebuffer when text runs off the bottom. Default: `true`.
    pub scroll: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            font: ConsoleFont::Small,
            foreground: Color::On,
            background: None,
            wrap: true,
            scroll: true,
        }
    }
}
