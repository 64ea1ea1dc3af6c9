//! SSD1306 transport: pushes a [`Framebuffer`] to a 128×64 OLED over I2C.
//!
//! [`OledDriver`] keeps the `ssd1306` crate in basic (unbuffered) mode:
//! the crate-side [`Framebuffer`] is the only copy of the image, and
//! [`OledDriver::flush()`] streams its first plane straight into the
//! controller's GDDRAM, whose page layout it already matches.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use ssd1306::{command::AddrMode, mode::BasicMode, prelude::*, I2CDisplayInterface, Ssd1306Async};

use crate::config::{DisplayConfig, Rotation};
use crate::error::OledError;
use crate::framebuffer::Framebuffer;

/// Panel width in pixels.
pub const PANEL_WIDTH: u16 = 128;
/// Panel height in pixels.
pub const PANEL_HEIGHT: u16 = 64;

/// Bytes staged per write when inverting on the fly.
const INVERT_CHUNK: usize = 32;

/// Default precharge period used alongside a custom contrast.
const PRECHARGE: u8 = 0x2;

/// Concrete display type used internally by [`OledDriver`].
type Display<I2C> = Ssd1306Async<I2CInterface<I2C>, DisplaySize128x64, BasicMode>;

/// Async driver for an SSD1306 128×64 OLED display over I2C.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`]: constructs the driver without any I2C traffic.
/// 2. [`OledDriver::init()`]: sends the SSD1306 initialisation sequence.
/// 3. Draw, print or scroll into a [`Framebuffer`].
/// 4. [`OledDriver::flush()`]: transfers the framebuffer to hardware.
///
/// # Example
///
/// ```no_run
/// use onebit_display_rs::{DisplayConfig, Framebuffer, OledDriver};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let config = DisplayConfig::default();
/// let mut fb: Framebuffer<'_, 1024> = Framebuffer::from_config(&config);
/// fb.allocate().unwrap();
///
/// let mut oled = OledDriver::new(i2c, &config);
/// oled.init().await.unwrap();
/// fb.scroll_one_line(1).unwrap();
/// oled.flush(&fb).await.unwrap();
/// # }
/// ```
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    contrast: u8,
    inverted: bool,
    rotation: Rotation,
    /// Set to `true` after a successful `init()` call.
    initialized: bool,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// No I2C traffic is generated. You **must** call [`init()`](Self::init)
    /// before flushing.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral (takes ownership for exclusive access).
    /// * `config`: address, contrast, rotation and polarity flags.
    pub fn new(i2c: I2C, config: &DisplayConfig) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, config.i2c_address);

        Self {
            display: Ssd1306Async::new(interface, DisplaySize128x64, config.rotation.into()),
            contrast: config.contrast,
            inverted: config.flags.inverted,
            rotation: config.rotation,
            initialized: false,
        }
    }

    /// Initialise the SSD1306 hardware and apply the configured contrast.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::InitializationFailed`] if the display does not
    /// respond, or [`OledError::Display`] on a bus-level failure while
    /// setting contrast.
    pub async fn init(&mut self) -> Result<(), OledError> {
        // Horizontal addressing lets one `draw` fill every page in order.
        self.display
            .init_with_addr_mode(AddrMode::Horizontal)
            .await
            .map_err(|_| OledError::InitializationFailed)?;
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::debug!("SSD1306 initialised, contrast {=u8:#x}", self.contrast);

        self.set_contrast(self.contrast).await
    }

    /// Set the contrast register.
    pub async fn set_contrast(&mut self, contrast: u8) -> Result<(), OledError> {
        self.contrast = contrast;
        self.display
            .set_brightness(Brightness::custom(PRECHARGE, contrast))
            .await?;
        Ok(())
    }

    /// Change the panel orientation. Takes effect on the next flush, as
    /// the image is redrawn through the remapped segments.
    pub async fn set_rotation(&mut self, rotation: Rotation) -> Result<(), OledError> {
        self.display.set_rotation(rotation.into()).await?;
        self.rotation = rotation;
        Ok(())
    }

    /// Current panel orientation. No I2C traffic is generated.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Switch the panel on or off. GDDRAM contents are kept while off.
    pub async fn set_power(&mut self, on: bool) -> Result<(), OledError> {
        self.display.set_display_on(on).await?;
        Ok(())
    }

    /// Transfer the framebuffer to the display via I2C.
    ///
    /// Only plane 0 is sent; the SSD1306 has no accent plane. An
    /// unallocated framebuffer has nothing to show and is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] if [`init()`](Self::init) has
    /// not been called, [`OledError::SizeMismatch`] if the framebuffer is
    /// not 128×64, or [`OledError::Display`] on a bus-level failure.
    pub async fn flush<const N: usize>(
        &mut self,
        framebuffer: &Framebuffer<'_, N>,
    ) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        if framebuffer.width() != PANEL_WIDTH || framebuffer.height() != PANEL_HEIGHT {
            return Err(OledError::SizeMismatch {
                width: framebuffer.width(),
                height: framebuffer.height(),
            });
        }
        let Some(plane) = framebuffer.plane(0) else {
            #[cfg(feature = "defmt")]
            defmt::debug!("flush skipped: framebuffer not allocated");
            return Ok(());
        };

        self.display
            .set_draw_area((0, 0), (PANEL_WIDTH as u8, PANEL_HEIGHT as u8))
            .await?;

        if self.inverted {
            let mut staged = [0u8; INVERT_CHUNK];
            for chunk in plane.chunks(INVERT_CHUNK) {
                let staged = &mut staged[..chunk.len()];
                for (dst, src) in staged.iter_mut().zip(chunk) {
                    *dst = !src;
                }
                self.display.draw(staged).await?;
            }
        } else {
            self.display.draw(plane).await?;
        }
        Ok(())
    }

    /// Check whether the display has been successfully initialised.
    ///
    /// No I2C traffic is generated.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
