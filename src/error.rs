//! Error types for the framebuffer and the OLED display driver.

use core::fmt;

use display_interface::DisplayError;

/// Errors raised by [`Framebuffer`](crate::Framebuffer) storage management
/// and the scroll engine.
///
/// An unallocated framebuffer is never an error: drawing and scrolling into
/// it are silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramebufferError {
    /// The owned storage capacity `N` cannot hold the framebuffer.
    NoMemory {
        /// Bytes needed for the configured geometry and color mode.
        required: usize,
        /// Compile-time capacity of the owned storage.
        capacity: usize,
    },
    /// An externally supplied buffer is shorter than the framebuffer.
    BufferTooSmall {
        /// Bytes needed for the configured geometry and color mode.
        required: usize,
        /// Length of the supplied slice.
        actual: usize,
    },
    /// Scroll amount must satisfy `0 < amount <= pages`.
    ScrollOutOfRange {
        /// Requested scroll amount, in pages.
        amount: usize,
        /// Number of pages in the framebuffer.
        pages: usize,
    },
    /// A scroll region is empty or extends past the framebuffer edge.
    RegionOutOfBounds,
    /// Bit-plane index is not present in this color mode.
    InvalidPlane(usize),
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FramebufferError::NoMemory { required, capacity } => write!(
                f,
                "framebuffer needs {} bytes but capacity is {}",
                required, capacity
            ),
            FramebufferError::BufferTooSmall { required, actual } => write!(
                f,
                "external buffer holds {} bytes, {} required",
                actual, required
            ),
            FramebufferError::ScrollOutOfRange { amount, pages } => write!(
                f,
                "cannot scroll {} pages in a {}-page framebuffer",
                amount, pages
            ),
            FramebufferError::RegionOutOfBounds => write!(f, "scroll region out of bounds"),
            FramebufferError::InvalidPlane(p) => write!(f, "no bit plane {}", p),
        }
    }
}

/// Errors that can occur during OLED display operations.
///
/// The `ssd1306` crate wraps all underlying I2C bus errors into
/// [`DisplayError`], so this enum is non-generic.
#[derive(Debug)]
pub enum OledError {
    /// Display interface error (wraps I2C and other bus-level failures).
    Display(DisplayError),
    /// Display hardware did not respond to initialisation.
    InitializationFailed,
    /// An operation was attempted before [`OledDriver::init()`](crate::OledDriver::init)
    /// was called.
    NotInitialized,
    /// The framebuffer geometry does not match the panel.
    SizeMismatch {
        /// Framebuffer width in pixels.
        width: u16,
        /// Framebuffer height in pixels.
        height: u16,
    },
    /// Framebuffer storage or scroll failure.
    Framebuffer(FramebufferError),
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl From<FramebufferError> for OledError {
    fn from(e: FramebufferError) -> Self {
        OledError::Framebuffer(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "Display interface error: {:?}", e),
            OledError::InitializationFailed => write!(f, "Initialization failed"),
            OledError::NotInitialized => write!(f, "Not initialized"),
            OledError::SizeMismatch { width, height } => {
                write!(f, "Framebuffer {}x{} does not match panel", width, height)
            }
            OledError::Framebuffer(e) => write!(f, "Framebuffer error: {}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_e) => defmt::write!(f, "Display interface error"),
            OledError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
            OledError::SizeMismatch { width, height } => {
                defmt::write!(f, "Framebuffer {}x{} does not match panel", width, height)
            }
            OledError::Framebuffer(e) => defmt::write!(f, "Framebuffer error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framebuffer_error_converts_into_oled_error() {
        let e: OledError = FramebufferError::RegionOutOfBounds.into();
        assert!(matches!(
            e,
            OledError::Framebuffer(FramebufferError::RegionOutOfBounds)
        ));
    }

    #[test]
    fn display_error_converts_into_oled_error() {
        let e: OledError = DisplayError::BusWriteError.into();
        assert!(matches!(e, OledError::Display(DisplayError::BusWriteError)));
    }
}
