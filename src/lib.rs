//! 1-bit-per-pixel framebuffer, scroll engine and SSD1306 driver for
//! monochrome and tri-color OLED, LCD and e-paper panels.
//!
//! This crate provides a page-addressed [`Framebuffer`] that either owns
//! fixed-capacity storage or borrows caller memory, an in-place
//! [`scroll_one_line`] engine for smooth-scroll effects, a text
//! [`Console`] built on it, and [`OledDriver`], which pushes the
//! framebuffer to an SSD1306 over async I2C.
//!
//! # Quick Start
//!
//! ```ignore
//! use core::fmt::Write;
//! use onebit_display_rs::{Console, ConsoleConfig, DisplayConfig, Framebuffer, OledDriver};
//!
//! let config = DisplayConfig::default();
//! let mut fb: Framebuffer<'static, 1024> = Framebuffer::from_config(&config);
//! fb.allocate()?;
//!
//! let mut oled = OledDriver::new(i2c, &config);
//! oled.init().await?;
//!
//! let mut console = Console::new(fb, &ConsoleConfig::default());
//! writeln!(console, "hello")?; // scrolls once the screen is full
//! oled.flush(console.framebuffer()).await?;
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** *(default)*: structured logging via [`defmt`].
//! - **`task`**: [`console_update_task`], an Embassy update loop fed by a
//!   line channel.
//!
//! [`defmt`]: https://docs.rs/defmt

#![no_std]

pub mod color;
pub mod config;
pub mod console;
#[cfg(feature = "task")]
pub mod console_task;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod scroll;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use color::Color;
pub use config::{ColorMode, ConsoleConfig, DisplayConfig, DisplayFlags, Rotation};
pub use console::{Console, ConsoleFont};
#[cfg(feature = "task")]
pub use console_task::{console_update_task, LineChannel};
pub use driver::OledDriver;
pub use error::{FramebufferError, OledError};
pub use framebuffer::Framebuffer;
pub use scroll::{scroll_one_line, ScrollDirection};
