//! Scrolling console example
//!
//! Standalone hardware demonstration that exercises [`Console`] and
//! [`OledDriver`] directly. Prints a counter line every 500 ms; once the
//! eighth line is reached every new line scrolls the framebuffer up by one
//! page instead of redrawing it. Every tenth line is underlined with a
//! progress bar drawn through `embedded-graphics`.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes           |
//! |-----------|------------|-----------------|
//! | I2C0 SDA  | GP20       |                 |
//! | I2C0 SCL  | GP21       |                 |
//! | OLED VCC  | 3V3        |                 |
//! | OLED GND  | GND        |                 |

#![no_std]
#![no_main]

use core::fmt::Write;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use onebit_display_rs::{Color, Console, ConsoleConfig, DisplayConfig, Framebuffer, OledDriver};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

// Wire the I2C0 interrupt to Embassy's handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Scroll console example starting");

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    let config = DisplayConfig::default();
    let mut oled = OledDriver::new(i2c, &config);
    oled.init().await.expect("OLED init failed");
    info!("OLED initialised");

    let mut fb: Framebuffer<'static, 1024> = Framebuffer::from_config(&config);
    fb.allocate().expect("framebuffer does not fit");
    let mut console = Console::new(fb, &ConsoleConfig::default());

    let mut count: u32 = 0;
    loop {
        if count % 10 == 9 {
            // Bar sits on the bottom row of the line just printed.
            let y = console.cursor().y - 1;
            let width = (count / 10 % 16 + 1) * 8;
            Rectangle::new(Point::new(0, y), Size::new(width, 1))
                .into_styled(PrimitiveStyle::with_fill(Color::On))
                .draw(console.framebuffer_mut())
                .ok();
        }
        writeln!(console, "line {}", count).ok();

        if let Err(e) = oled.flush(console.framebuffer()).await {
            error!("Flush failed: {}", e);
        }

        count = count.wrapping_add(1);
        Timer::after(Duration::from_millis(500)).await;
    }
}
